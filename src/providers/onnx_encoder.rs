//! Sentence embeddings via ONNX Runtime and HuggingFace tokenizers.
//!
//! Runs a transformer exported to ONNX and averages its
//! `last_hidden_state` over the token dimension, weighted by the attention
//! mask. No normalization is applied, so vectors match those produced by
//! averaging the transformer output directly, which is what the disease
//! classifier was trained on.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::TensorRef;
use tracing::info;

use crate::error::{EirError, Result};
use crate::model::{Device, ModelSource, build_session};
use crate::traits::TextEncoder;

/// Repository used when no encoder source is configured.
pub const DEFAULT_ENCODER_REPO: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Repository-relative path of the ONNX export.
pub const ONNX_MODEL_FILE: &str = "onnx/model.onnx";

/// Repository-relative path of the tokenizer.
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Text probed at load time to discover the output dimensionality.
const PROBE_TEXT: &str = "headache and mild fever";

/// Options for [`OnnxEncoder::new`].
#[derive(Debug, Clone)]
pub struct OnnxEncoderOptions {
    /// Maximum tokens per input; longer text is truncated.
    pub max_length: usize,
    /// Whether the model takes a `token_type_ids` input (BERT-style).
    pub token_type_ids: bool,
    /// Name of the per-token hidden state output.
    pub output_name: String,
}

impl Default for OnnxEncoderOptions {
    fn default() -> Self {
        Self {
            max_length: 512,
            token_type_ids: true,
            output_name: "last_hidden_state".to_string(),
        }
    }
}

/// Text encoder running an ONNX transformer with mean pooling.
pub struct OnnxEncoder {
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    options: OnnxEncoderOptions,
    name: String,
    dimensions: usize,
}

impl OnnxEncoder {
    /// Load the model and tokenizer from `source`.
    ///
    /// Runs one probe encoding so that a model with an unexpected
    /// input/output layout fails here instead of on the first request.
    pub fn new(
        source: &ModelSource,
        options: OnnxEncoderOptions,
        device: Device,
        cache_dir: &Path,
    ) -> Result<Self> {
        let model_path = source.resolve(ONNX_MODEL_FILE, cache_dir)?;
        let tokenizer_path = source.resolve(TOKENIZER_FILE, cache_dir)?;

        let session = build_session(&model_path, &device, "encoder")?;
        let mut tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| EirError::resource_load("encoder", format!("failed to load tokenizer: {e}")))?;

        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: options.max_length,
                ..Default::default()
            }))
            .map_err(|e| EirError::resource_load("encoder", format!("failed to set truncation: {e}")))?;

        let mut encoder = Self {
            session: Mutex::new(session),
            tokenizer,
            options,
            name: source.name(),
            dimensions: 0,
        };

        let probe = encoder
            .encode(PROBE_TEXT)
            .map_err(|e| EirError::resource_load("encoder", format!("probe encoding failed: {e}")))?;
        encoder.dimensions = probe.len();

        info!(
            model = %encoder.name,
            dims = encoder.dimensions,
            device = device.name(),
            "loaded ONNX encoder"
        );

        Ok(encoder)
    }

    /// Tokenize into `(input_ids, attention_mask, token_type_ids)`.
    fn tokenize(&self, text: &str) -> Result<(Vec<i64>, Vec<i64>, Vec<i64>)> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| EirError::Encoding(format!("tokenization failed: {e}")))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let token_type_ids: Vec<i64> = encoding
            .get_type_ids()
            .iter()
            .map(|&t| t as i64)
            .collect();

        if input_ids.is_empty() {
            return Err(EirError::Encoding("tokenizer produced no tokens".to_string()));
        }

        Ok((input_ids, attention_mask, token_type_ids))
    }

    /// Run the session and mean-pool the hidden state.
    fn run_inference(
        &self,
        input_ids: &[i64],
        attention_mask: &[i64],
        token_type_ids: &[i64],
    ) -> Result<Vec<f32>> {
        let shape = [1_usize, input_ids.len()];

        let input_ids_tensor = TensorRef::from_array_view((shape, input_ids))
            .map_err(|e| EirError::Inference(format!("failed to create input_ids tensor: {e}")))?;
        let attention_mask_tensor = TensorRef::from_array_view((shape, attention_mask))
            .map_err(|e| EirError::Inference(format!("failed to create attention_mask tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| EirError::Inference(format!("encoder session lock poisoned: {e}")))?;

        let outputs = if self.options.token_type_ids {
            let token_type_ids_tensor = TensorRef::from_array_view((shape, token_type_ids))
                .map_err(|e| {
                    EirError::Inference(format!("failed to create token_type_ids tensor: {e}"))
                })?;
            session
                .run(ort::inputs![
                    "input_ids" => input_ids_tensor,
                    "attention_mask" => attention_mask_tensor,
                    "token_type_ids" => token_type_ids_tensor,
                ])
                .map_err(|e| EirError::Inference(format!("ONNX inference failed: {e}")))?
        } else {
            session
                .run(ort::inputs![
                    "input_ids" => input_ids_tensor,
                    "attention_mask" => attention_mask_tensor,
                ])
                .map_err(|e| EirError::Inference(format!("ONNX inference failed: {e}")))?
        };

        let hidden = outputs
            .get(self.options.output_name.as_str())
            .ok_or_else(|| {
                EirError::Inference(format!("no '{}' output found", self.options.output_name))
            })?;

        // try_extract_tensor returns (&Shape, &[T]) laid out as [batch, seq, hidden]
        let (tensor_shape, data) = hidden
            .try_extract_tensor::<f32>()
            .map_err(|e| EirError::Inference(format!("failed to extract hidden state: {e}")))?;

        if tensor_shape.len() != 3 {
            return Err(EirError::Inference(format!(
                "expected a rank-3 hidden state, got rank {}",
                tensor_shape.len()
            )));
        }
        let hidden_dims = tensor_shape[2] as usize;

        Ok(mean_pool(data, attention_mask, hidden_dims))
    }
}

impl TextEncoder for OnnxEncoder {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let (input_ids, attention_mask, token_type_ids) = self.tokenize(text)?;
        self.run_inference(&input_ids, &attention_mask, &token_type_ids)
    }
}

/// Average token vectors of a row-major `[seq_len, hidden]` buffer,
/// counting only tokens whose mask is non-zero.
pub fn mean_pool(hidden_state: &[f32], attention_mask: &[i64], hidden: usize) -> Vec<f32> {
    let mut pooled = vec![0.0_f32; hidden];
    if hidden == 0 {
        return pooled;
    }

    let mut counted = 0_usize;
    for (token, &mask) in hidden_state.chunks_exact(hidden).zip(attention_mask) {
        if mask == 0 {
            continue;
        }
        counted += 1;
        for (acc, &value) in pooled.iter_mut().zip(token) {
            *acc += value;
        }
    }

    if counted > 0 {
        let scale = 1.0 / counted as f32;
        pooled.iter_mut().for_each(|value| *value *= scale);
    }
    pooled
}
