//! `nr-runtime` - Drives workload construction and execution for a network.
//!
//! This crate provides:
//! - `BackendRegistry`: the explicit table of available backends
//! - `RuntimeConfig`: backend preference order, arena budget, sub-tensor use
//! - `NetworkBuilder` and `LoadedNetwork`: fail-fast construction with
//!   backend fallback, then ordered execution

pub mod config;
pub mod error;
pub mod network;
pub mod registry;

pub use config::{RuntimeConfig, DEFAULT_BACKEND};
pub use error::{Result, RuntimeError};
pub use network::{LoadedNetwork, NetworkBuilder};
pub use registry::BackendRegistry;
