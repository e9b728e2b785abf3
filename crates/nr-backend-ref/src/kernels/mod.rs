//! Correctness-first f32 kernels over flat NCHW buffers.
//!
//! Shapes are validated when a workload is built, so kernels index without
//! further checks.

pub mod activation;
pub mod conv;
pub mod elementwise;
pub mod fully_connected;
pub mod normalization;
pub mod pooling;
pub mod region;
pub mod resize;
pub mod softmax;
