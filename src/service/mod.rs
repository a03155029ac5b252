//! Prediction pipeline orchestration.
//!
//! ```text
//! symptom text
//!      │ TextEncoder::encode
//!      ▼
//! embedding (model dims)
//!      │ features::assemble(expected_width)
//!      ▼
//! [0; 10] ++ resized embedding
//!      │ DiseaseClassifier::classify
//!      ▼
//! per-class probabilities ──► top 3 by probability, ties by class index
//!                                  │ LabelSet::name
//!                                  ▼
//!                        predicted disease ──► precautions::resolve
//! ```
//!
//! Steps up to classification abort the call on error. The precaution
//! lookup never fails: an unmatched or empty table yields the sentinel
//! list.

mod builder;

pub use builder::PredictionServiceBuilder;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument};

use crate::error::{EirError, Result};
use crate::features::{self, STRUCTURED_WIDTH};
use crate::labels::LabelSet;
use crate::precautions::{self, PrecautionTable};
use crate::telemetry;
use crate::traits::{DiseaseClassifier, TextEncoder};
use crate::types::{PredictionResult, TopPrediction};

/// Number of ranked classes returned with each prediction.
pub const TOP_K: usize = 3;

/// Symptom text -> disease prediction service.
///
/// Holds the startup artifacts as shared read-only state; cloning is cheap
/// and every clone serves from the same loaded models.
#[derive(Clone)]
pub struct PredictionService {
    encoder: Arc<dyn TextEncoder>,
    classifier: Arc<dyn DiseaseClassifier>,
    labels: Arc<LabelSet>,
    precautions: Arc<PrecautionTable>,
    cutoff: u8,
}

impl PredictionService {
    /// Create a new builder for configuring the service.
    pub fn builder() -> PredictionServiceBuilder {
        PredictionServiceBuilder::new()
    }

    /// Predict the most likely diseases for free-text symptoms.
    ///
    /// Empty or whitespace-only text is rejected with
    /// [`EirError::Encoding`] before the encoder runs.
    #[instrument(skip_all, fields(text_len = text.len()))]
    pub fn predict(&self, text: &str) -> Result<PredictionResult> {
        let start = Instant::now();
        let result = self.run(text);
        Self::record_prediction(start, result.is_ok());
        result
    }

    fn run(&self, text: &str) -> Result<PredictionResult> {
        if text.trim().is_empty() {
            return Err(EirError::Encoding("symptom text is empty".to_string()));
        }

        let embedding = self.encoder.encode(text)?;

        let expected_width = self.classifier.expected_width();
        let features = features::assemble(&embedding, expected_width)?;
        if features.len() != expected_width {
            return Err(EirError::Configuration(format!(
                "assembled {} features, classifier expects {expected_width}",
                features.len()
            )));
        }

        let probs = self.classifier.classify(&features)?;
        if probs.is_empty() {
            return Err(EirError::Classification(
                "classifier returned no probabilities".to_string(),
            ));
        }
        if let Some(index) = probs.iter().position(|p| !p.is_finite()) {
            return Err(EirError::Classification(format!(
                "classifier returned non-finite score {} for class {index}",
                probs[index]
            )));
        }

        let top_predictions = rank_top(&probs, TOP_K)
            .into_iter()
            .map(|index| Ok(TopPrediction(self.labels.name(index)?.to_string(), probs[index])))
            .collect::<Result<Vec<_>>>()?;

        let TopPrediction(predicted_disease, confidence) = top_predictions[0].clone();
        let precautions = precautions::resolve(&predicted_disease, &self.precautions, self.cutoff);

        debug!(
            disease = %predicted_disease,
            confidence,
            embedding_dims = embedding.len(),
            "prediction complete"
        );

        Ok(PredictionResult {
            predicted_disease,
            confidence,
            top_predictions,
            precautions,
        })
    }

    fn record_prediction(start: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        metrics::counter!(telemetry::PREDICTIONS_TOTAL, "status" => status).increment(1);
        metrics::histogram!(telemetry::PREDICTION_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());
    }

    pub fn encoder(&self) -> &dyn TextEncoder {
        self.encoder.as_ref()
    }

    pub fn classifier(&self) -> &dyn DiseaseClassifier {
        self.classifier.as_ref()
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn precautions(&self) -> &PrecautionTable {
        &self.precautions
    }

    /// Minimum fuzzy score for a precaution table match.
    pub fn cutoff(&self) -> u8 {
        self.cutoff
    }

    /// Width of the embedding portion after assembly.
    pub fn embedding_width(&self) -> usize {
        self.classifier.expected_width().saturating_sub(STRUCTURED_WIDTH)
    }
}

/// Indices of the `k` highest probabilities, highest first.
///
/// Equal probabilities rank by ascending class index. Returns every index
/// when there are fewer than `k` classes. NaN sorts above every finite
/// value, so callers must reject non-finite scores first.
pub fn rank_top(probs: &[f32], k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..probs.len()).collect();
    indices.sort_by(|&a, &b| probs[b].total_cmp(&probs[a]).then(a.cmp(&b)));
    indices.truncate(k);
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_top_orders_descending() {
        assert_eq!(rank_top(&[0.1, 0.6, 0.3], 3), vec![1, 2, 0]);
    }

    #[test]
    fn rank_top_ties_by_index() {
        assert_eq!(rank_top(&[0.2, 0.4, 0.4, 0.0, 0.4], 3), vec![1, 2, 4]);
    }

    #[test]
    fn rank_top_with_fewer_classes() {
        assert_eq!(rank_top(&[0.3, 0.7], 3), vec![1, 0]);
        assert!(rank_top(&[], 3).is_empty());
    }
}
