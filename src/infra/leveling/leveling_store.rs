// Implementations for the leveling system.

pub mod json_store;

// Re-export for convenience
pub use json_store::JsonProgressionStore;
