// Domain Layer - Profiles, connection descriptors and browser invocations

pub mod error;
pub mod invocation;
pub mod profile;
pub mod registry;

// Re-exports
pub use error::DomainError;
pub use invocation::{BrowserCommand, Invocation, Verb};
pub use profile::{definition_key, ConnectionDescriptor, Profile, ProfileField};
pub use registry::ProfileRegistry;
