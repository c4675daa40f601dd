// Port Layer - Interfaces for external dependencies

pub mod command_runner;
pub mod time_provider;

// Re-exports
pub use command_runner::{CapturedLine, CommandOutput, CommandRunner, RunError, MAX_LINE_BYTES};
pub use time_provider::TimeProvider;
