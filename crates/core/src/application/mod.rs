// Application Layer - Use Cases

pub mod store_adapter;

// Re-exports
pub use store_adapter::{StoreAdapter, StoreResponse};
