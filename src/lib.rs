//! Eir - symptom-to-disease prediction
//!
//! This crate turns a free-text description of symptoms into a ranked
//! disease prediction with recommended precautions. A sentence encoder
//! embeds the text, the embedding is placed after a zeroed block of
//! structured features, and a pretrained classifier scores every known
//! disease. The top class is then matched, tolerating naming differences,
//! against a precaution reference table.
//!
//! The pipeline only depends on the [`TextEncoder`] and
//! [`DiseaseClassifier`] traits, so it runs the same way against local
//! ONNX models or in-memory test doubles.
//!
//! # Example (requires `local-inference` feature)
//!
//! ```rust,no_run
//! use eir::config::Config;
//!
//! fn main() -> eir::Result<()> {
//!     let config = Config::load(None)?;
//!     let service = eir::loader::build_service(&config)?;
//!
//!     let result = service.predict("high fever, chills and body aches")?;
//!     println!("{} ({:.2})", result.predicted_disease, result.confidence);
//!     for precaution in &result.precautions {
//!         println!("- {precaution}");
//!     }
//!     Ok(())
//! }
//! ```

#[cfg(feature = "local-inference")]
pub mod config;
pub mod error;
pub mod features;
pub mod labels;
#[cfg(feature = "local-inference")]
pub mod loader;
#[cfg(feature = "local-inference")]
pub mod model;
pub mod precautions;
#[cfg(feature = "local-inference")]
pub mod providers;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use error::{EirError, Result};
pub use labels::LabelSet;
pub use precautions::{NO_PRECAUTIONS, PrecautionEntry, PrecautionTable};
pub use service::{PredictionService, PredictionServiceBuilder};
pub use traits::{DiseaseClassifier, TextEncoder};
pub use types::{PredictionResult, TopPrediction};
pub use version::{PKG_VERSION, version_string};

// Re-export model types when feature is enabled
#[cfg(feature = "local-inference")]
pub use model::{Device, ModelSource};
#[cfg(feature = "local-inference")]
pub use providers::{FastEmbedEncoder, OnnxClassifier, OnnxEncoder};
