//! Cross-attempt memory
//!
//! Everything the agent carries from one life to the next: how it died,
//! how long it lasted, how bold it should be, and which resources deserve
//! extra attention. The core reads it for decision biasing and appends to
//! it at attempt boundaries; persistence lives in `store`.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{Day, DeathCause};
use crate::world::resource::ResourceKind;

/// One recorded death
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeathRecord {
    pub day: Day,
    pub cause: DeathCause,
}

/// Success/attempt counters for one action label
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActionStat {
    pub attempts: u32,
    pub successes: u32,
}

/// Snapshot of the final state of a fatal attempt, for death analysis
///
/// Kept deliberately flat so the knowledge layer never has to look inside
/// live agent state.
#[derive(Debug, Clone)]
pub struct DeathContext {
    pub day: Day,
    pub cause: DeathCause,
    pub food_held: u32,
    pub water_held: u32,
    pub stored_food: u32,
    pub stored_water: u32,
    pub structures_built: usize,
    pub tiles_discovered: usize,
    pub storage_total: u32,
    pub caution_score: u32,
    pub died_outside_at_night: bool,
}

/// Persistent cross-attempt knowledge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Knowledge {
    pub attempts: u32,
    pub best_survival_days: Day,
    pub death_causes: AHashMap<DeathCause, u32>,
    pub death_log: Vec<DeathRecord>,
    /// Boldness scalar in [0, 1]; scales the exploration rate
    pub risk_tolerance: f32,
    /// Gather-reward multipliers, nudged up for resources whose absence
    /// has killed the agent
    pub priority_weights: AHashMap<ResourceKind, f32>,
    pub caution_deaths: u32,
    pub action_stats: AHashMap<String, ActionStat>,
}

impl Default for Knowledge {
    fn default() -> Self {
        let mut priority_weights = AHashMap::new();
        for kind in ResourceKind::ALL {
            priority_weights.insert(kind, 1.0);
        }
        Self {
            attempts: 0,
            best_survival_days: 0,
            death_causes: AHashMap::new(),
            death_log: Vec::new(),
            risk_tolerance: 0.5,
            priority_weights,
            caution_deaths: 0,
            action_stats: AHashMap::new(),
        }
    }
}

impl Knowledge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a death at the end of an attempt
    pub fn record_death(&mut self, day: Day, cause: DeathCause) {
        self.attempts += 1;
        self.best_survival_days = self.best_survival_days.max(day);
        *self.death_causes.entry(cause).or_insert(0) += 1;
        self.death_log.push(DeathRecord { day, cause });
    }

    /// Record an attempt that reached the day cap alive
    pub fn record_survival(&mut self, day: Day) {
        self.attempts += 1;
        self.best_survival_days = self.best_survival_days.max(day);
    }

    /// Record an executed action
    pub fn record_action(&mut self, _day: Day, label: &str, success: bool) {
        let stat = self.action_stats.entry(label.to_string()).or_default();
        stat.attempts += 1;
        if success {
            stat.successes += 1;
        }
    }

    /// The last up-to-`n` death causes, oldest first
    pub fn recent_causes(&self, n: usize) -> Vec<DeathCause> {
        let start = self.death_log.len().saturating_sub(n);
        self.death_log[start..].iter().map(|r| r.cause).collect()
    }

    /// The cause shared by the last few deaths, if they agree
    ///
    /// Two or more consecutive identical causes trigger defensive play.
    pub fn repeated_recent_cause(&self) -> Option<DeathCause> {
        let recent = self.recent_causes(3);
        if recent.len() >= 2 && recent.iter().all(|c| *c == recent[0]) {
            Some(recent[0])
        } else {
            None
        }
    }

    pub fn priority_weight(&self, kind: ResourceKind) -> f32 {
        self.priority_weights.get(&kind).copied().unwrap_or(1.0)
    }

    fn bump_priority(&mut self, kind: ResourceKind, delta: f32) {
        let entry = self.priority_weights.entry(kind).or_insert(1.0);
        *entry = (*entry + delta).clamp(0.5, 3.0);
    }

    /// Post-mortem: shift risk tolerance and priority weights
    ///
    /// Deaths from shortage make the agent more cautious and raise the
    /// missing resource's weight; deaths from stagnation (little explored,
    /// hoarded storage, high caution score) push tolerance the other way.
    /// The tolerance always lands back in [0, 1].
    pub fn analyze_death(&mut self, ctx: &DeathContext) {
        match ctx.cause {
            DeathCause::Hunger if ctx.food_held == 0 && ctx.stored_food == 0 => {
                self.risk_tolerance -= 0.05;
                self.bump_priority(ResourceKind::Food, 0.25);
            }
            DeathCause::Thirst if ctx.water_held == 0 && ctx.stored_water == 0 => {
                self.risk_tolerance -= 0.05;
                self.bump_priority(ResourceKind::Water, 0.25);
            }
            DeathCause::Cold if ctx.structures_built < 2 => {
                self.risk_tolerance -= 0.05;
                self.bump_priority(ResourceKind::Wood, 0.25);
            }
            _ => {}
        }

        if ctx.day < 15 && ctx.tiles_discovered < 30 {
            self.risk_tolerance += 0.1;
        }
        if ctx.storage_total > 100 && ctx.structures_built < 3 {
            self.risk_tolerance += 0.1;
        }
        if ctx.caution_score > 5 {
            self.caution_deaths += 1;
            self.risk_tolerance += 0.1;
        }

        self.risk_tolerance = self.risk_tolerance.clamp(0.0, 1.0);
    }
}
