//! Device configuration for local inference.

use crate::error::{EirError, Result};

/// Compute device for local inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    /// CPU execution (default).
    #[default]
    Cpu,

    /// CUDA GPU execution.
    #[cfg(feature = "cuda")]
    Cuda {
        /// GPU device ID (0-indexed).
        device_id: u32,
    },
}

impl Device {
    /// Create CPU device.
    pub fn cpu() -> Self {
        Self::Cpu
    }

    /// Create CUDA device with the given device ID.
    #[cfg(feature = "cuda")]
    pub fn cuda(device_id: u32) -> Self {
        Self::Cuda { device_id }
    }

    /// Parse a config device name: `"cpu"`, `"cuda"` or `"cuda:<id>"`.
    ///
    /// CUDA names are rejected when the crate is built without the `cuda`
    /// feature.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            #[cfg(feature = "cuda")]
            "cuda" => Ok(Self::Cuda { device_id: 0 }),
            #[cfg(feature = "cuda")]
            other if other.starts_with("cuda:") => other["cuda:".len()..]
                .parse()
                .map(|device_id| Self::Cuda { device_id })
                .map_err(|e| EirError::Configuration(format!("invalid CUDA device '{name}': {e}"))),
            _ => Err(EirError::Configuration(format!(
                "unsupported device '{name}'"
            ))),
        }
    }

    /// Get the device name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            #[cfg(feature = "cuda")]
            Self::Cuda { .. } => "CUDA",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_cpu() {
        assert_eq!(Device::default(), Device::Cpu);
    }

    #[test]
    fn cpu_name() {
        assert_eq!(Device::cpu().name(), "CPU");
    }

    #[test]
    fn parse_cpu_any_case() {
        assert_eq!(Device::from_name("CPU").unwrap(), Device::Cpu);
        assert_eq!(Device::from_name(" cpu ").unwrap(), Device::Cpu);
    }

    #[test]
    fn parse_unknown_device_fails() {
        assert!(matches!(
            Device::from_name("tpu"),
            Err(EirError::Configuration(_))
        ));
    }

    #[cfg(not(feature = "cuda"))]
    #[test]
    fn cuda_rejected_without_feature() {
        assert!(Device::from_name("cuda").is_err());
    }

    #[cfg(feature = "cuda")]
    #[test]
    fn parse_cuda_with_id() {
        assert_eq!(Device::from_name("cuda:1").unwrap(), Device::cuda(1));
        assert_eq!(Device::from_name("cuda").unwrap().name(), "CUDA");
    }
}
