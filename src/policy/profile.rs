//! Daily tactical profiles
//!
//! Once per day the agent's situation is classified into a coarse
//! profile. The profile does not pick actions itself; it multiplicatively
//! re-weights Q-values by action category before the final argmax, so the
//! learned policy keeps the last word.

use serde::{Deserialize, Serialize};

use crate::actions::catalog::ActionCategory;
use crate::agent::state::AgentState;
use crate::knowledge::memory::Knowledge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayProfile {
    /// Needs are collapsing: get safe, eat, rest
    Emergency,
    /// The last deaths repeat one cause: play it safe
    Defensive,
    /// Stores are thin: gather and expand
    Aggressive,
    /// The camp is falling apart: repair and build
    Maintenance,
}

impl DayProfile {
    pub fn name(&self) -> &'static str {
        match self {
            DayProfile::Emergency => "Emergency",
            DayProfile::Defensive => "Defensive",
            DayProfile::Aggressive => "Aggressive",
            DayProfile::Maintenance => "Maintenance",
        }
    }

    /// Classify the day from current needs, death repetition, storage
    /// levels and structure wear
    pub fn classify(agent: &AgentState, knowledge: &Knowledge) -> Self {
        if agent.needs.hp < 30.0 || agent.needs.hunger < 20.0 || agent.needs.thirst < 20.0 {
            return DayProfile::Emergency;
        }
        if knowledge.repeated_recent_cause().is_some() {
            return DayProfile::Defensive;
        }
        if agent.camp.storage_total() < 20 {
            return DayProfile::Aggressive;
        }
        if agent.camp.any_in_disrepair() {
            return DayProfile::Maintenance;
        }
        if !agent.in_camp {
            // Caught far from home with healthy stores: spend the day
            // getting back rather than ranging further.
            return DayProfile::Emergency;
        }
        DayProfile::Aggressive
    }

    /// Multiplicative Q-value weight for an action category
    pub fn weight(&self, category: ActionCategory) -> f32 {
        use ActionCategory::*;
        match self {
            DayProfile::Emergency => match category {
                Survival => 2.0,
                Logistics => 1.8,
                Gather => 0.6,
                Work => 0.4,
                Exploration => 0.3,
            },
            DayProfile::Defensive => match category {
                Survival => 1.6,
                Logistics => 1.4,
                Gather => 0.8,
                Work => 0.8,
                Exploration => 0.5,
            },
            DayProfile::Aggressive => match category {
                Gather => 1.5,
                Exploration => 1.3,
                Work => 1.0,
                Survival => 0.8,
                Logistics => 0.8,
            },
            DayProfile::Maintenance => match category {
                Work => 1.8,
                Gather => 1.2,
                Survival => 1.0,
                Logistics => 1.0,
                Exploration => 0.6,
            },
        }
    }
}
