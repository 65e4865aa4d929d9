//! Tabular Q-learning over a coarse state discretization
//!
//! Gauges are bucketed into fixed-width tiers and combined with a night
//! flag and a distance-from-camp tier, keeping the table small enough to
//! generalize across attempts. Argmax and the Bellman max both walk the
//! canonical learnable action list in declaration order, so ties resolve
//! the same way every run.

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::actions::catalog::Action;
use crate::agent::state::AgentState;
use crate::core::config::config;
use crate::world::map::WorldMap;

/// Discretized state key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QState {
    pub hunger_tier: u8,
    pub thirst_tier: u8,
    pub stamina_tier: u8,
    pub night: bool,
    pub camp_dist_tier: u8,
}

impl QState {
    /// Bucket the live state into the lookup key
    pub fn discretize(agent: &AgentState, world: &WorldMap) -> Self {
        let cfg = config();
        let width = cfg.gauge_bucket_width;
        let dist = agent.pos.distance(&world.camp_center);

        Self {
            hunger_tier: (agent.needs.hunger / width) as u8,
            thirst_tier: (agent.needs.thirst / width) as u8,
            stamina_tier: (agent.needs.stamina / width) as u8,
            night: agent.is_night,
            camp_dist_tier: (dist / cfg.camp_distance_bucket) as u8,
        }
    }
}

/// State -> action -> estimated value
pub type QTable = AHashMap<QState, AHashMap<Action, f32>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QLearningPolicy {
    table: QTable,
    pub epsilon: f32,
}

impl QLearningPolicy {
    pub fn new() -> Self {
        Self {
            table: QTable::new(),
            epsilon: config().epsilon_start,
        }
    }

    pub fn value(&self, state: &QState, action: Action) -> f32 {
        self.table
            .get(state)
            .and_then(|actions| actions.get(&action))
            .copied()
            .unwrap_or(0.0)
    }

    /// True once the state has at least one learned entry
    pub fn knows(&self, state: &QState) -> bool {
        self.table.get(state).is_some_and(|a| !a.is_empty())
    }

    pub fn states_learned(&self) -> usize {
        self.table.len()
    }

    /// Every learned entry in a stable order, for diffing and display
    pub fn entries(&self) -> Vec<(QState, Action, f32)> {
        let mut entries: Vec<(QState, Action, f32)> = self
            .table
            .iter()
            .flat_map(|(state, actions)| {
                actions.iter().map(move |(action, value)| (*state, *action, *value))
            })
            .collect();
        entries.sort_by_key(|(state, action, _)| (*state, *action));
        entries
    }

    /// Best learnable action by stored value, ties to the earliest in the
    /// canonical list
    pub fn best_action(&self, state: &QState) -> Action {
        let mut best = Action::LEARNABLE[0];
        let mut best_value = OrderedFloat(f32::NEG_INFINITY);
        for action in Action::LEARNABLE {
            let value = OrderedFloat(self.value(state, action));
            if value > best_value {
                best_value = value;
                best = action;
            }
        }
        best
    }

    /// Epsilon-greedy selection
    ///
    /// The effective exploration rate is scaled by `1 - risk_tolerance`,
    /// so a history of cautious deaths (high tolerance) explores more and
    /// a history of reckless ones explores less.
    pub fn choose_action<R: Rng>(
        &self,
        state: &QState,
        risk_tolerance: f32,
        rng: &mut R,
    ) -> Action {
        let effective_epsilon = self.epsilon * (1.0 - risk_tolerance.clamp(0.0, 1.0));
        if rng.gen::<f32>() < effective_epsilon || !self.knows(state) {
            let index = rng.gen_range(0..Action::LEARNABLE.len());
            Action::LEARNABLE[index]
        } else {
            self.best_action(state)
        }
    }

    /// Highest stored value in a state, 0 when unseen
    fn max_value(&self, state: &QState) -> f32 {
        self.table
            .get(state)
            .filter(|actions| !actions.is_empty())
            .map(|actions| {
                actions
                    .values()
                    .copied()
                    .fold(f32::NEG_INFINITY, f32::max)
            })
            .unwrap_or(0.0)
    }

    /// One-step temporal-difference update
    ///
    /// `Q[s][a] += alpha * (r + gamma * max_a' Q[s'][a'] - Q[s][a])`,
    /// with unknown pairs defaulting to 0. Every update also decays
    /// epsilon toward its floor.
    pub fn update(&mut self, state: QState, action: Action, reward: f32, next_state: QState) {
        let cfg = config();
        let old = self.value(&state, action);
        let next_max = self.max_value(&next_state);
        let new = old + cfg.learning_rate * (reward + cfg.discount_factor * next_max - old);

        self.table.entry(state).or_default().insert(action, new);
        self.decay_epsilon();
    }

    /// Direct penalty used by the loop-breaker
    pub fn penalize(&mut self, state: QState, action: Action, penalty: f32) {
        self.update(state, action, penalty, state);
    }

    fn decay_epsilon(&mut self) {
        let cfg = config();
        if self.epsilon > cfg.epsilon_min {
            self.epsilon = (self.epsilon * cfg.epsilon_decay).max(cfg.epsilon_min);
        }
    }
}

impl Default for QLearningPolicy {
    fn default() -> Self {
        Self::new()
    }
}
