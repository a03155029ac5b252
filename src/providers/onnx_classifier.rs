//! Disease classification via ONNX Runtime.
//!
//! The classifier is a dense network exported to ONNX that takes a single
//! `[1, width]` float tensor and returns one score per class. Exports that
//! end in a softmax layer emit probabilities directly; exports that stop at
//! the last dense layer emit logits, which are softmaxed here.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ort::session::Session;
use ort::value::TensorRef;
use serde::Deserialize;
use tracing::info;

use crate::error::{EirError, Result};
use crate::model::{Device, build_session};
use crate::traits::DiseaseClassifier;

/// What the classifier's output tensor holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierOutput {
    /// Per-class probabilities (model ends in softmax).
    #[default]
    Probabilities,
    /// Raw scores; softmax is applied after inference.
    Logits,
}

/// Options for [`OnnxClassifier::new`].
#[derive(Debug, Clone)]
pub struct OnnxClassifierOptions {
    /// Path to the `.onnx` file.
    pub model_path: PathBuf,
    /// Feature vector width the model was trained on.
    pub input_width: usize,
    /// Name of the input tensor.
    pub input_name: String,
    /// Name of the output tensor.
    pub output_name: String,
    /// Whether outputs are probabilities or logits.
    pub output: ClassifierOutput,
}

impl OnnxClassifierOptions {
    /// Options with the default tensor names used by `tf2onnx` Keras exports.
    pub fn new(model_path: impl Into<PathBuf>, input_width: usize) -> Self {
        Self {
            model_path: model_path.into(),
            input_width,
            input_name: "input".to_string(),
            output_name: "output_0".to_string(),
            output: ClassifierOutput::default(),
        }
    }
}

/// Disease classifier running an ONNX model.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    options: OnnxClassifierOptions,
    name: String,
    num_classes: usize,
}

impl OnnxClassifier {
    /// Load the model.
    ///
    /// Runs one inference on an all-zero vector of `input_width` features.
    /// A model that rejects that width fails to load; the output length
    /// gives the class count.
    pub fn new(options: OnnxClassifierOptions, device: Device) -> Result<Self> {
        let session = build_session(&options.model_path, &device, "classifier")?;
        let name = model_name(&options.model_path);

        let mut classifier = Self {
            session: Mutex::new(session),
            options,
            name,
            num_classes: 0,
        };

        let width = classifier.options.input_width;
        let probe = classifier.run_inference(&vec![0.0_f32; width]).map_err(|e| {
            EirError::resource_load("classifier", format!("model rejected a {width}-wide input: {e}"))
        })?;
        if probe.is_empty() {
            return Err(EirError::resource_load("classifier", "model produced no class scores"));
        }
        classifier.num_classes = probe.len();

        info!(
            model = %classifier.name,
            width,
            classes = classifier.num_classes,
            device = device.name(),
            "loaded ONNX classifier"
        );

        Ok(classifier)
    }

    /// Run the ONNX session on one feature vector and return the raw scores.
    fn run_inference(&self, features: &[f32]) -> Result<Vec<f32>> {
        let shape = [1_usize, features.len()];
        let input = TensorRef::from_array_view((shape, features))
            .map_err(|e| EirError::Classification(format!("failed to create input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| EirError::Classification(format!("classifier session lock poisoned: {e}")))?;

        let outputs = session
            .run(ort::inputs![self.options.input_name.as_str() => input])
            .map_err(|e| EirError::Classification(format!("ONNX inference failed: {e}")))?;

        let scores = outputs
            .get(self.options.output_name.as_str())
            .ok_or_else(|| {
                EirError::Classification(format!("no '{}' output found", self.options.output_name))
            })?;

        let (_, data) = scores
            .try_extract_tensor::<f32>()
            .map_err(|e| EirError::Classification(format!("failed to extract scores: {e}")))?;

        Ok(data.to_vec())
    }
}

impl DiseaseClassifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn expected_width(&self) -> usize {
        self.options.input_width
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn classify(&self, features: &[f32]) -> Result<Vec<f32>> {
        if features.len() != self.options.input_width {
            return Err(EirError::Configuration(format!(
                "classifier '{}' expects {} features, got {}",
                self.name,
                self.options.input_width,
                features.len()
            )));
        }

        let scores = self.run_inference(features)?;
        match self.options.output {
            ClassifierOutput::Probabilities => Ok(scores),
            ClassifierOutput::Logits => Ok(softmax(&scores)),
        }
    }
}

/// Softmax function.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|x| x / sum).collect()
}

fn model_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("classifier")
        .to_string()
}
