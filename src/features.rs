//! Feature vector assembly.
//!
//! The classifier was trained on a structured block followed by a sentence
//! embedding. The structured block is still a zero placeholder; the
//! embedding portion is resized to whatever room the classifier leaves
//! for it. Truncation drops the tail and padding appends zeros, both in
//! place order, so ported classifier artifacts stay compatible.

use crate::error::{EirError, Result};

/// Width of the structured feature block that precedes the embedding.
pub const STRUCTURED_WIDTH: usize = 10;

/// Concatenate the zero structured block with `embedding` resized to
/// `expected_width - STRUCTURED_WIDTH`.
///
/// The result is always exactly `expected_width` long.
pub fn assemble(embedding: &[f32], expected_width: usize) -> Result<Vec<f32>> {
    if expected_width < STRUCTURED_WIDTH {
        return Err(EirError::Configuration(format!(
            "classifier width {expected_width} is smaller than the structured block ({STRUCTURED_WIDTH})"
        )));
    }

    let embedding_width = expected_width - STRUCTURED_WIDTH;
    let kept = embedding.len().min(embedding_width);

    let mut features = Vec::with_capacity(expected_width);
    features.resize(STRUCTURED_WIDTH, 0.0);
    features.extend_from_slice(&embedding[..kept]);
    features.resize(expected_width, 0.0);

    Ok(features)
}
