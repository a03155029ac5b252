//! Builder for configuring prediction service instances

use std::sync::Arc;

use tracing::info;

use super::PredictionService;
use crate::features::STRUCTURED_WIDTH;
use crate::labels::LabelSet;
use crate::precautions::{DEFAULT_CUTOFF, PrecautionTable};
use crate::traits::{DiseaseClassifier, TextEncoder};
use crate::{EirError, Result};

/// Builder for configuring prediction service instances.
///
/// All four artifacts are required. [`build`](Self::build) checks that they
/// agree with each other so that mismatches surface at startup rather than
/// on the first request.
pub struct PredictionServiceBuilder {
    encoder: Option<Arc<dyn TextEncoder>>,
    classifier: Option<Arc<dyn DiseaseClassifier>>,
    labels: Option<Arc<LabelSet>>,
    precautions: Option<Arc<PrecautionTable>>,
    cutoff: u8,
}

impl PredictionServiceBuilder {
    pub fn new() -> Self {
        Self {
            encoder: None,
            classifier: None,
            labels: None,
            precautions: None,
            cutoff: DEFAULT_CUTOFF,
        }
    }

    /// Set the text encoder.
    pub fn encoder(mut self, encoder: Arc<dyn TextEncoder>) -> Self {
        self.encoder = Some(encoder);
        self
    }

    /// Set the disease classifier.
    pub fn classifier(mut self, classifier: Arc<dyn DiseaseClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Set the class index -> disease name mapping.
    pub fn labels(mut self, labels: impl Into<Arc<LabelSet>>) -> Self {
        self.labels = Some(labels.into());
        self
    }

    /// Set the precaution reference table.
    pub fn precautions(mut self, table: impl Into<Arc<PrecautionTable>>) -> Self {
        self.precautions = Some(table.into());
        self
    }

    /// Set the minimum fuzzy score (0-100) for a precaution match (default: 60).
    pub fn cutoff(mut self, cutoff: u8) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Build the service.
    ///
    /// Fails with [`EirError::Configuration`] when an artifact is missing,
    /// the classifier is narrower than the structured feature block, the
    /// label count differs from the classifier's class count, or the
    /// cutoff is above 100.
    pub fn build(self) -> Result<PredictionService> {
        let encoder = self
            .encoder
            .ok_or_else(|| EirError::Configuration("no text encoder configured".to_string()))?;
        let classifier = self
            .classifier
            .ok_or_else(|| EirError::Configuration("no classifier configured".to_string()))?;
        let labels = self
            .labels
            .ok_or_else(|| EirError::Configuration("no label set configured".to_string()))?;
        let precautions = self.precautions.ok_or_else(|| {
            EirError::Configuration("no precaution table configured".to_string())
        })?;

        if self.cutoff > 100 {
            return Err(EirError::Configuration(format!(
                "precaution cutoff {} is outside 0-100",
                self.cutoff
            )));
        }

        let width = classifier.expected_width();
        if width < STRUCTURED_WIDTH {
            return Err(EirError::Configuration(format!(
                "classifier '{}' expects {width} features, fewer than the structured block ({STRUCTURED_WIDTH})",
                classifier.name()
            )));
        }

        if labels.len() != classifier.num_classes() {
            return Err(EirError::Configuration(format!(
                "label set has {} names but classifier '{}' outputs {} classes",
                labels.len(),
                classifier.name(),
                classifier.num_classes()
            )));
        }

        if precautions.is_empty() {
            tracing::warn!("precaution table is empty, every prediction will use the sentinel");
        }

        info!(
            encoder = encoder.name(),
            encoder_dims = encoder.dimensions(),
            classifier = classifier.name(),
            classifier_width = width,
            classes = labels.len(),
            precaution_rows = precautions.len(),
            cutoff = self.cutoff,
            "prediction service ready"
        );

        Ok(PredictionService {
            encoder,
            classifier,
            labels,
            precautions,
            cutoff: self.cutoff,
        })
    }
}

impl Default for PredictionServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
