//! Inference traits for the artifacts behind the prediction pipeline.
//!
//! The service talks to its pretrained models through these two narrow
//! traits rather than concrete runtime types. This keeps the pipeline
//! testable with in-memory mocks and lets the encoder backend be swapped
//! (fastembed, raw ONNX) without touching orchestration code.
//!
//! Implementations are shared behind `Arc` across concurrent requests, so
//! both traits require `Send + Sync` and take `&self`. Runtimes that need
//! exclusive access to a session guard it internally.

use crate::Result;

/// Turns free text into a fixed-length dense vector.
pub trait TextEncoder: Send + Sync {
    /// Encoder name for logging/debugging.
    fn name(&self) -> &str;

    /// Native output dimensionality of the underlying model.
    fn dimensions(&self) -> usize;

    /// Encode a single text.
    ///
    /// Returns [`EirError::Encoding`](crate::EirError::Encoding) when the
    /// tokenizer rejects the input and
    /// [`EirError::Inference`](crate::EirError::Inference) when the model
    /// itself fails.
    fn encode(&self, text: &str) -> Result<Vec<f32>>;
}

/// A pretrained multi-class classifier over fixed-width feature vectors.
pub trait DiseaseClassifier: Send + Sync {
    /// Classifier name for logging/debugging.
    fn name(&self) -> &str;

    /// Width of the feature vector the model accepts.
    fn expected_width(&self) -> usize;

    /// Number of classes in the output distribution.
    fn num_classes(&self) -> usize;

    /// Per-class probabilities for one feature vector, indexed by class.
    ///
    /// A vector whose length differs from [`expected_width`](Self::expected_width)
    /// is a configuration error.
    fn classify(&self, features: &[f32]) -> Result<Vec<f32>>;
}
