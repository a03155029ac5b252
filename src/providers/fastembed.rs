//! Local sentence embeddings via fastembed-rs.
//!
//! fastembed mean-pools and L2-normalizes its outputs. Classifiers trained
//! on raw mean-pooled vectors should use
//! [`OnnxEncoder`](super::OnnxEncoder) instead.

use std::path::Path;
use std::sync::Mutex;

use serde::Deserialize;
use tracing::info;

use crate::error::{EirError, Result};
use crate::traits::TextEncoder;

/// Supported fastembed models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocalEmbeddingModel {
    /// all-MiniLM-L6-v2 (384 dims, fast, good quality).
    #[default]
    #[serde(rename = "all-minilm-l6-v2")]
    AllMiniLmL6V2,
    /// all-MiniLM-L12-v2 (384 dims, slightly better).
    #[serde(rename = "all-minilm-l12-v2")]
    AllMiniLmL12V2,
    /// BGE-small-en (384 dims, strong retrieval).
    BgeSmallEn,
    /// BGE-base-en (768 dims, higher quality).
    BgeBaseEn,
}

impl LocalEmbeddingModel {
    /// Get the model name for display.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AllMiniLmL6V2 => "all-MiniLM-L6-v2",
            Self::AllMiniLmL12V2 => "all-MiniLM-L12-v2",
            Self::BgeSmallEn => "BGE-small-en",
            Self::BgeBaseEn => "BGE-base-en",
        }
    }

    /// Get the embedding dimensions.
    pub fn dimensions(&self) -> usize {
        match self {
            Self::AllMiniLmL6V2 | Self::AllMiniLmL12V2 | Self::BgeSmallEn => 384,
            Self::BgeBaseEn => 768,
        }
    }
}

impl From<LocalEmbeddingModel> for fastembed::EmbeddingModel {
    fn from(model: LocalEmbeddingModel) -> Self {
        match model {
            LocalEmbeddingModel::AllMiniLmL6V2 => fastembed::EmbeddingModel::AllMiniLML6V2,
            LocalEmbeddingModel::AllMiniLmL12V2 => fastembed::EmbeddingModel::AllMiniLML12V2,
            LocalEmbeddingModel::BgeSmallEn => fastembed::EmbeddingModel::BGESmallENV15,
            LocalEmbeddingModel::BgeBaseEn => fastembed::EmbeddingModel::BGEBaseENV15,
        }
    }
}

/// Text encoder backed by fastembed.
pub struct FastEmbedEncoder {
    model: Mutex<fastembed::TextEmbedding>,
    kind: LocalEmbeddingModel,
}

impl FastEmbedEncoder {
    /// Load the model, downloading it into `cache_dir` if not cached.
    pub fn new(model: LocalEmbeddingModel, cache_dir: &Path) -> Result<Self> {
        let options = fastembed::InitOptions::new(model.into())
            .with_show_download_progress(true)
            .with_cache_dir(cache_dir.to_path_buf());

        let instance = fastembed::TextEmbedding::try_new(options)
            .map_err(|e| EirError::resource_load("encoder", e))?;

        info!(model = model.name(), dims = model.dimensions(), "loaded fastembed encoder");

        Ok(Self {
            model: Mutex::new(instance),
            kind: model,
        })
    }

    pub fn model(&self) -> LocalEmbeddingModel {
        self.kind
    }
}

impl TextEncoder for FastEmbedEncoder {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn dimensions(&self) -> usize {
        self.kind.dimensions()
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut model = self
            .model
            .lock()
            .map_err(|e| EirError::Inference(format!("embedding model lock poisoned: {e}")))?;

        let vectors = model
            .embed(vec![text.to_string()], None)
            .map_err(|e| EirError::Inference(format!("embedding failed: {e}")))?;

        vectors
            .into_iter()
            .next()
            .ok_or_else(|| EirError::Inference("no embedding returned".to_string()))
    }
}
