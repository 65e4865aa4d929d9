//! Attempt composition and the multi-attempt runner

pub mod attempt;
pub mod runner;

pub use attempt::{Attempt, AttemptOutcome};
pub use runner::{absorb_outcome, run_attempt, run_attempts, run_attempts_parallel};
