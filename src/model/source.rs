//! Model source and download logic.

use std::path::{Path, PathBuf};

use crate::error::{EirError, Result};

/// Where a model's files live.
///
/// File names passed to [`resolve`](Self::resolve) are repository-relative
/// (e.g. `onnx/model.onnx`, `tokenizer.json`); a local source uses the same
/// layout under its root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Load from HuggingFace Hub repository.
    HuggingFace {
        /// Repository ID (e.g., "sentence-transformers/all-MiniLM-L6-v2").
        repo_id: String,
    },

    /// Load from a local directory.
    Local {
        /// Root directory of the model files.
        path: PathBuf,
    },
}

impl ModelSource {
    /// Create a HuggingFace source.
    pub fn huggingface(repo_id: impl Into<String>) -> Self {
        Self::HuggingFace {
            repo_id: repo_id.into(),
        }
    }

    /// Create a local source.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local { path: path.into() }
    }

    /// Short name for logging: the repo ID or the directory name.
    pub fn name(&self) -> String {
        match self {
            Self::HuggingFace { repo_id } => repo_id.clone(),
            Self::Local { path } => path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("local")
                .to_string(),
        }
    }

    /// Download or locate `file`, returning its local path.
    ///
    /// HuggingFace files are cached under `cache_dir` and only downloaded
    /// once.
    pub fn resolve(&self, file: &str, cache_dir: &Path) -> Result<PathBuf> {
        match self {
            Self::HuggingFace { repo_id } => {
                let api = hf_hub::api::sync::ApiBuilder::new()
                    .with_cache_dir(cache_dir.to_path_buf())
                    .build()
                    .map_err(|e| {
                        EirError::resource_load("model", format!("failed to initialize HF API: {e}"))
                    })?;

                api.model(repo_id.clone()).get(file).map_err(|e| {
                    EirError::resource_load(
                        "model",
                        format!("failed to download {file} from {repo_id}: {e}"),
                    )
                })
            }
            Self::Local { path } => {
                let resolved = path.join(file);
                if !resolved.exists() {
                    return Err(EirError::resource_load(
                        "model",
                        format!("local model file does not exist: {}", resolved.display()),
                    ));
                }
                Ok(resolved)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_names() {
        assert_eq!(
            ModelSource::huggingface("sentence-transformers/all-MiniLM-L6-v2").name(),
            "sentence-transformers/all-MiniLM-L6-v2"
        );
        assert_eq!(ModelSource::local("/opt/models/minilm").name(), "minilm");
    }

    #[test]
    fn missing_local_file_is_resource_error() {
        let source = ModelSource::local("/nonexistent/model");
        let err = source
            .resolve("tokenizer.json", Path::new("/tmp"))
            .unwrap_err();
        assert!(matches!(err, EirError::ResourceLoad { .. }));
    }
}
