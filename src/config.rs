//! Configuration loading for eird and the eir CLI.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.eir/config.toml` (user)
//! 3. `/etc/eir/config.toml` (system)
//!
//! A minimal file names the classifier and the two reference tables:
//!
//! ```toml
//! [models]
//! labels_path = "models/labels.json"
//!
//! [models.classifier]
//! model_path = "models/disease_classifier.onnx"
//! input_width = 394
//!
//! [precautions]
//! path = "data/precautions.csv"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::precautions::DEFAULT_CUTOFF;
use crate::providers::{ClassifierOutput, LocalEmbeddingModel, OnnxEncoderOptions};
use crate::{EirError, Result};

/// Service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub models: ModelsConfig,
    pub precautions: PrecautionsConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000).
    #[serde(default = "default_address")]
    pub address: String,
    /// Allow cross-origin requests from any origin (default: true).
    #[serde(default = "default_true")]
    pub cors: bool,
    /// Log output format (default: text).
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            cors: true,
            log_format: LogFormat::default(),
            limits: LimitsConfig::default(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_true() -> bool {
    true
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Resource limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum concurrent requests (default: 64).
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes (default: 64 KiB).
    #[serde(default = "default_max_body")]
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: default_max_concurrent(),
            request_timeout_secs: default_timeout(),
            max_body_bytes: default_max_body(),
        }
    }
}

fn default_max_concurrent() -> usize {
    64
}

fn default_timeout() -> u64 {
    30
}

fn default_max_body() -> usize {
    64 * 1024
}

/// Model artifact configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Device to use: "cpu", "cuda" or "cuda:<id>" (default: "cpu").
    #[serde(default = "default_device")]
    pub device: String,
    /// Directory for model downloads (default: platform cache dir).
    #[serde(default)]
    pub models_dir: Option<PathBuf>,
    #[serde(default)]
    pub encoder: EncoderConfig,
    pub classifier: ClassifierConfig,
    /// Class index -> disease name file (JSON array or one name per line).
    pub labels_path: PathBuf,
}

fn default_device() -> String {
    "cpu".to_string()
}

/// Text encoder backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum EncoderConfig {
    /// fastembed-rs model (mean-pooled, normalized).
    #[serde(rename = "fastembed")]
    FastEmbed {
        #[serde(default)]
        model: LocalEmbeddingModel,
    },
    /// ONNX transformer with unnormalized mean pooling.
    Onnx {
        /// HuggingFace repository (default: sentence-transformers/all-MiniLM-L6-v2).
        #[serde(default)]
        repo_id: Option<String>,
        /// Local directory with `onnx/model.onnx` and `tokenizer.json`;
        /// takes precedence over `repo_id`.
        #[serde(default)]
        model_dir: Option<PathBuf>,
        #[serde(default = "default_max_length")]
        max_length: usize,
        #[serde(default = "default_true")]
        token_type_ids: bool,
        #[serde(default = "default_hidden_output")]
        output_name: String,
    },
}

impl Default for EncoderConfig {
    fn default() -> Self {
        let options = OnnxEncoderOptions::default();
        Self::Onnx {
            repo_id: None,
            model_dir: None,
            max_length: options.max_length,
            token_type_ids: options.token_type_ids,
            output_name: options.output_name,
        }
    }
}

fn default_max_length() -> usize {
    OnnxEncoderOptions::default().max_length
}

fn default_hidden_output() -> String {
    OnnxEncoderOptions::default().output_name
}

/// Classifier artifact configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Path to the `.onnx` classifier.
    pub model_path: PathBuf,
    /// Feature vector width the classifier was trained on.
    pub input_width: usize,
    #[serde(default = "default_input_name")]
    pub input_name: String,
    #[serde(default = "default_output_name")]
    pub output_name: String,
    /// "probabilities" (default) or "logits".
    #[serde(default)]
    pub output: ClassifierOutput,
}

fn default_input_name() -> String {
    "input".to_string()
}

fn default_output_name() -> String {
    "output_0".to_string()
}

/// Precaution table configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PrecautionsConfig {
    /// CSV file: disease column followed by precaution columns.
    pub path: PathBuf,
    /// Minimum fuzzy score (0-100) for a match (default: 60).
    #[serde(default = "default_cutoff")]
    pub cutoff: u8,
}

fn default_cutoff() -> u8 {
    DEFAULT_CUTOFF
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.eir/config.toml`
    /// 3. `/etc/eir/config.toml`
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit_path)?;
        let content = fs::read_to_string(&path).map_err(|e| {
            EirError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            EirError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(EirError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".eir").join("config.toml");
            if user_config.exists() {
                return Ok(user_config);
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/eir/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }

        Err(EirError::Configuration(
            "No config file found. Create ~/.eir/config.toml or /etc/eir/config.toml".to_string(),
        ))
    }
}
