//! `nr-tensor` - Tensor descriptions and memory for neural-runtime.
//!
//! This crate provides:
//! - `TensorInfo`: immutable shape / data type / quantization description
//! - `TensorArena` and `TensorHandle`: owning buffers and aliasing views
//! - `CpuStorage` and `ConstTensor`: typed element storage and layer parameters
//! - Shape utilities, broadcasting and asymmetric 8-bit quantization

pub mod arena;
pub mod const_tensor;
pub mod dtype;
pub mod error;
pub mod handle;
pub mod info;
pub mod quantize;
pub mod shape;
pub mod storage;

// Re-export primary types at the crate root for convenience.
pub use arena::TensorArena;
pub use const_tensor::ConstTensor;
pub use dtype::DataType;
pub use error::{Result, TensorError};
pub use handle::{AllocationId, HandleId, HandleKind, TensorHandle};
pub use info::TensorInfo;
pub use shape::Shape;
pub use storage::CpuStorage;
