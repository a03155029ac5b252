//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use eir::{
    DiseaseClassifier, EirError, LabelSet, PrecautionEntry, PrecautionTable, PredictionService,
    Result, TextEncoder,
};

// ============================================================================
// Mock encoders
// ============================================================================

/// Returns the same embedding for every text.
pub struct FixedEncoder {
    pub embedding: Vec<f32>,
}

impl TextEncoder for FixedEncoder {
    fn name(&self) -> &str {
        "fixed-encoder"
    }

    fn dimensions(&self) -> usize {
        self.embedding.len()
    }

    fn encode(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(self.embedding.clone())
    }
}

/// Rejects every text.
pub struct FailingEncoder;

impl TextEncoder for FailingEncoder {
    fn name(&self) -> &str {
        "failing-encoder"
    }

    fn dimensions(&self) -> usize {
        0
    }

    fn encode(&self, _text: &str) -> Result<Vec<f32>> {
        Err(EirError::Encoding("tokenizer rejected input".to_string()))
    }
}

/// Fails like a model whose runtime session broke.
pub struct BrokenEncoder;

impl TextEncoder for BrokenEncoder {
    fn name(&self) -> &str {
        "broken-encoder"
    }

    fn dimensions(&self) -> usize {
        5
    }

    fn encode(&self, _text: &str) -> Result<Vec<f32>> {
        Err(EirError::Inference("encoder session lock poisoned".to_string()))
    }
}

// ============================================================================
// Mock classifier
// ============================================================================

/// Returns fixed probabilities and remembers the last feature vector.
pub struct FixedClassifier {
    pub width: usize,
    pub probs: Vec<f32>,
    pub seen: Mutex<Option<Vec<f32>>>,
}

impl FixedClassifier {
    pub fn new(width: usize, probs: Vec<f32>) -> Self {
        Self {
            width,
            probs,
            seen: Mutex::new(None),
        }
    }

    pub fn last_features(&self) -> Option<Vec<f32>> {
        self.seen.lock().unwrap().clone()
    }
}

impl DiseaseClassifier for FixedClassifier {
    fn name(&self) -> &str {
        "fixed-classifier"
    }

    fn expected_width(&self) -> usize {
        self.width
    }

    fn num_classes(&self) -> usize {
        self.probs.len()
    }

    fn classify(&self, features: &[f32]) -> Result<Vec<f32>> {
        if features.len() != self.width {
            return Err(EirError::Configuration(format!(
                "expected {} features, got {}",
                self.width,
                features.len()
            )));
        }
        *self.seen.lock().unwrap() = Some(features.to_vec());
        Ok(self.probs.clone())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn labels(names: &[&str]) -> LabelSet {
    LabelSet::new(names.iter().map(|name| name.to_string()).collect())
}

/// Flu / Common Cold / Malaria table.
pub fn table() -> PrecautionTable {
    PrecautionTable::new(vec![
        PrecautionEntry::new("Flu", ["Rest", "Hydrate", ""]),
        PrecautionEntry::new(
            "Common Cold",
            ["Drink warm fluids", "Rest", "Wash hands often"],
        ),
        PrecautionEntry::new(
            "Malaria",
            ["Consult nearest hospital", "Avoid oily food", "Keep mosquitoes out"],
        ),
    ])
}

/// Service over a 5-wide embedding, a 15-wide classifier and the flu table.
pub fn flu_service(classifier: Arc<FixedClassifier>) -> PredictionService {
    PredictionService::builder()
        .encoder(Arc::new(FixedEncoder {
            embedding: vec![0.5, -0.25, 1.0, 0.0, 2.0],
        }))
        .classifier(classifier)
        .labels(labels(&["Common Cold", "Flu", "Malaria", "Typhoid"]))
        .precautions(table())
        .build()
        .unwrap()
}
