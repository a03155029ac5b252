//! Local inference backends for the pipeline traits.
//!
//! - [`FastEmbedEncoder`]: sentence embeddings through fastembed-rs
//! - [`OnnxEncoder`]: sentence embeddings through a raw ONNX transformer
//! - [`OnnxClassifier`]: the pretrained disease classifier

pub mod fastembed;
pub mod onnx_classifier;
pub mod onnx_encoder;

pub use self::fastembed::{FastEmbedEncoder, LocalEmbeddingModel};
pub use onnx_classifier::{ClassifierOutput, OnnxClassifier, OnnxClassifierOptions};
pub use onnx_encoder::{OnnxEncoder, OnnxEncoderOptions};
