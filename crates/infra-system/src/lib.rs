// illdb Infrastructure - System Adapters
// Implements: CommandRunner, profile loading

pub mod profile_loader;
pub mod subprocess_runner;

pub use profile_loader::{ConfigError, ProfileLoader};
pub use subprocess_runner::SubprocessRunner;
