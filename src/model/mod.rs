//! Model location, device selection and ONNX session setup.

pub mod device;
pub mod source;

pub use device::Device;
pub use source::ModelSource;

use std::path::{Path, PathBuf};

use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;

use crate::error::{EirError, Result};

/// Cache directory for downloaded models.
///
/// `EIR_CACHE_DIR` overrides the platform cache directory.
pub fn default_cache_dir() -> PathBuf {
    std::env::var("EIR_CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("eir")
                .join("models")
        })
}

/// Build an ONNX session with the appropriate execution provider.
pub(crate) fn build_session(
    model_path: &Path,
    device: &Device,
    resource: &'static str,
) -> Result<Session> {
    let builder = Session::builder()
        .map_err(|e| EirError::resource_load(resource, format!("failed to create session builder: {e}")))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| EirError::resource_load(resource, format!("failed to set optimization level: {e}")))?;

    // Configure execution provider based on device
    let mut builder = match device {
        Device::Cpu => builder,
        #[cfg(feature = "cuda")]
        Device::Cuda { device_id } => {
            use ort::execution_providers::CUDAExecutionProvider;
            builder
                .with_execution_providers([CUDAExecutionProvider::default()
                    .with_device_id(*device_id as i32)
                    .build()])
                .map_err(|e| EirError::resource_load(resource, format!("failed to configure CUDA: {e}")))?
        }
    };

    builder.commit_from_file(model_path).map_err(|e| {
        EirError::resource_load(
            resource,
            format!("failed to load ONNX model {}: {e}", model_path.display()),
        )
    })
}
