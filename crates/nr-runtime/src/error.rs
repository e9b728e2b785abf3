use nr_tensor::{DataType, TensorError};
use nr_workload::{LayerType, WorkloadError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("no registered backend can run {layer} for {data_type} (tried {tried:?})")]
    NoBackend {
        layer: LayerType,
        data_type: DataType,
        tried: Vec<String>,
    },
    #[error("backend '{0}' is not registered")]
    UnknownBackend(String),
    #[error("network construction failed earlier: {0}")]
    ConstructionFailed(String),
    #[error("workload error: {0}")]
    Workload(#[from] WorkloadError),
    #[error("tensor error: {0}")]
    Tensor(#[from] TensorError),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
