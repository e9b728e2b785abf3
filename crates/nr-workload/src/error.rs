use nr_tensor::{DataType, TensorError};
use thiserror::Error;

use crate::layer::LayerType;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkloadError {
    #[error("invalid {layer} descriptor: {reason}")]
    InvalidDescriptor { layer: LayerType, reason: String },
    #[error("backend '{backend}' has no {layer} workload for {data_type}")]
    UnsupportedOperation {
        backend: String,
        layer: LayerType,
        data_type: DataType,
    },
    #[error("{layer} execution failed: {reason}")]
    Execution { layer: LayerType, reason: String },
    #[error("tensor error: {0}")]
    Tensor(#[from] TensorError),
}

impl WorkloadError {
    pub fn invalid(layer: LayerType, reason: impl Into<String>) -> Self {
        WorkloadError::InvalidDescriptor {
            layer,
            reason: reason.into(),
        }
    }

    pub fn unsupported(backend: &str, layer: LayerType, data_type: DataType) -> Self {
        WorkloadError::UnsupportedOperation {
            backend: backend.to_string(),
            layer,
            data_type,
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkloadError>;
