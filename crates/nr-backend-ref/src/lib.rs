//! `nr-backend-ref` - Reference CPU backend for neural-runtime.
//!
//! Straightforward loops optimized for correctness rather than speed. The
//! factory here is the canonical implementation of the workload contract
//! other backends are measured against.

pub mod factory;
pub mod kernels;
pub mod repr;
pub mod workloads;

pub use factory::{RefWorkloadFactory, REF_BACKEND_ID};
pub use repr::{Float32, Representation, Uint8};
pub use workloads::*;
