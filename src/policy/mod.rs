//! Decision making: tabular Q-learning, daily profiles and the engine
//! that composes them with hard survival overrides

pub mod decision;
pub mod profile;
pub mod qlearning;

pub use decision::DecisionEngine;
pub use profile::DayProfile;
pub use qlearning::{QLearningPolicy, QState};
