//! Shared utilities for kubeforge
//!
//! Tracing setup used by the binary and the polling primitive used by tasks
//! that wait on external systems.

pub mod tracing;
pub mod wait;

pub use wait::{wait_until, WaitOptions};
