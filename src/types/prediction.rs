//! Prediction output types.

use serde::{Deserialize, Serialize};

/// A ranked `(disease, probability)` pair.
///
/// Serialized as a two-element JSON array: `["Flu", 0.8]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPrediction(pub String, pub f32);

impl TopPrediction {
    pub fn disease(&self) -> &str {
        &self.0
    }

    pub fn confidence(&self) -> f32 {
        self.1
    }
}

/// Output of a single `predict` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Label of the highest-probability class.
    #[serde(rename = "Predicted Disease")]
    pub predicted_disease: String,
    /// Probability of the predicted class, as reported by the classifier.
    #[serde(rename = "Confidence")]
    pub confidence: f32,
    /// Up to three classes, highest probability first.
    #[serde(rename = "Top Predictions")]
    pub top_predictions: Vec<TopPrediction>,
    /// Precautions for the predicted disease, or the single
    /// "no precautions" sentinel.
    #[serde(rename = "Precautions")]
    pub precautions: Vec<String>,
}
