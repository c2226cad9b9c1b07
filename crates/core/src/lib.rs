//! Core building blocks shared by every kubeforge crate.
//!
//! ## Key Components
//!
//! - **`errors`**: the `Error` enum and `Result` alias. Configuration conflicts,
//!   capability gaps, insufficient resources and task failures are distinct
//!   variants so callers can react to each without inspecting strings.
//! - **`constants`**: defaults shared by planning and provisioning (timeouts,
//!   network sizing, node counts).
//! - **`output`**: the explicit operator-facing output sink that is threaded
//!   through the provisioning workflow instead of a process-wide writer.

pub mod constants;
pub mod errors;
pub mod output;

pub use self::{
    constants::*,
    errors::{Error, Result, TaskFailureKind},
    output::{CapturedOutput, MuteGuard, OutputSink},
};
