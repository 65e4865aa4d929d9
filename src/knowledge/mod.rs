//! Cross-attempt memory and its file store

pub mod memory;
pub mod store;

pub use memory::{DeathContext, Knowledge};
pub use store::KnowledgeStore;
