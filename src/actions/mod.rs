//! Closed action set and its executor

pub mod catalog;
pub mod execute;

pub use catalog::{Action, ActionCategory};
pub use execute::{execute, ActionOutcome};
