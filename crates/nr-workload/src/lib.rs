//! `nr-workload` - The layer-to-workload contract for neural-runtime.
//!
//! This crate provides:
//! - `LayerType` and the per-layer arity table
//! - Per-operation parameter descriptors and `QueueDescriptor<P>`
//! - Construction-time validation with shape inference
//! - The `Workload` and `WorkloadFactory` traits every backend implements

pub mod descriptors;
pub mod error;
pub mod factory;
pub mod layer;
pub mod queue;
mod validate;
pub mod workload;

pub use descriptors::*;
pub use error::{Result, WorkloadError};
pub use factory::WorkloadFactory;
pub use layer::{Arity, LayerType};
pub use queue::*;
pub use workload::{
    make_float_workload, make_single_type_workload, make_workload, BaseWorkload, TypedWorkload,
    Workload,
};
