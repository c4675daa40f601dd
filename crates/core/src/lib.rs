// illdb Core - Domain Logic & Ports
// NO infrastructure dependencies (Hexagonal Architecture)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{StoreAdapter, StoreResponse};
pub use error::{AdapterError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
