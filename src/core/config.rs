//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. A tuning file (TOML) can override
//! any field; the binary loads it once at startup.

use serde::Deserialize;
use std::path::Path;

use crate::core::error::{Result, SimError};

/// Configuration for the simulation systems
///
/// These values have been tuned so that an unlearned agent dies within the
/// first handful of days and a learned one can reach the 180-day cap.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === TIME ===
    /// Length of one in-world day in simulated seconds
    ///
    /// Need drain rates are expressed per day and divided by this value,
    /// so shortening the day makes everything more lethal.
    pub day_length_secs: f32,

    /// Fraction of the day at which night begins
    ///
    /// Past this point the return-to-camp override fires and agents caught
    /// outside start losing hp and warmth.
    pub night_start: f32,

    /// Day count at which an attempt is considered won
    pub max_days: u32,

    // === NEED DRAIN ===
    /// Hunger lost over one full day
    pub hunger_drain_per_day: f32,

    /// Thirst lost over one full day (thirst kills faster than hunger)
    pub thirst_drain_per_day: f32,

    /// Hp lost per second at night outside camp
    pub night_hp_drain: f32,

    /// Warmth lost per second at night outside camp
    ///
    /// 0.1/s over the 36-second night (40% of a 90s day) costs ~3.6 warmth
    /// per night spent outside; cold deaths come from repeated exposure
    /// plus storage deficits, not a single bad night.
    pub night_warmth_drain: f32,

    // === RECOVERY ===
    /// Seconds of standing still before passive regeneration starts
    pub idle_regen_delay_secs: f32,

    /// Base stamina regenerated per idle second (before vitality scaling)
    pub base_stamina_regen: f32,

    /// Regeneration multiplier while inside the camp square
    pub camp_regen_multiplier: f32,

    // === MOVEMENT ===
    /// Seconds between steps
    pub move_cooldown_secs: f32,

    /// Stamina cost per step (perks and development paths reduce it)
    pub move_stamina_cost: f32,

    /// Minimum stamina required to start moving
    ///
    /// Below this the agent refuses to move at all, which forces idle
    /// regeneration instead of a death spiral of half-finished trips.
    pub min_move_stamina: f32,

    // === PATHFINDING ===
    /// Multiplier applied to per-cell risk when computing traversal cost
    ///
    /// Cost of entering a cell is `1 + risk * risk_weight`. At 10.0 a
    /// max-risk cell costs as much as an 11-cell detour, so paths route
    /// around danger unless the detour is very long.
    pub risk_weight: f32,

    // === WORLD GENERATION ===
    /// World grid width/height in cells
    pub map_width: i32,
    pub map_height: i32,

    /// Side length of the square camp region (risk 0, centered on anchor)
    pub camp_size: i32,

    // === Q-LEARNING ===
    /// Temporal-difference learning rate (alpha)
    pub learning_rate: f32,

    /// Future reward discount (gamma)
    pub discount_factor: f32,

    /// Starting exploration rate, scaled by (1 - risk tolerance) at
    /// selection time
    pub epsilon_start: f32,

    /// Multiplicative epsilon decay applied after every update
    pub epsilon_decay: f32,

    /// Exploration floor; epsilon never decays below this
    pub epsilon_min: f32,

    /// Bucket width for the hunger/thirst/stamina state tiers
    ///
    /// Width 25 over the 0-100 range yields 5 tiers per gauge; together
    /// with the night flag and distance tier this keeps the Q-table at a
    /// few thousand states even over long runs.
    pub gauge_bucket_width: f32,

    /// Bucket width (in Manhattan cells) for the distance-from-camp tier
    pub camp_distance_bucket: i32,

    // === DECISION ENGINE ===
    /// Window size for repetition detection
    pub loop_window: usize,

    /// Maximum distinct actions in the window before the loop-break fires
    pub loop_distinct_max: usize,

    /// Q penalty applied to each repeated action when the loop-break fires
    pub loop_penalty: f32,

    /// Hunger/thirst level below which the emergency overrides fire
    pub critical_need: f32,

    /// Fraction of max hp below which the rest-in-camp override fires
    pub critical_hp_fraction: f32,

    /// Reward fed to the policy when an action fails its preconditions
    pub failure_reward: f32,

    /// Floor for the delay between decisions, seconds
    pub min_action_delay: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Time
            day_length_secs: 90.0,
            night_start: 0.6,
            max_days: 180,

            // Need drain (thirst > hunger)
            hunger_drain_per_day: 20.0,
            thirst_drain_per_day: 25.0,
            night_hp_drain: 0.02,
            night_warmth_drain: 0.1,

            // Recovery
            idle_regen_delay_secs: 1.0,
            base_stamina_regen: 2.0,
            camp_regen_multiplier: 1.5,

            // Movement
            move_cooldown_secs: 0.5,
            move_stamina_cost: 2.0,
            min_move_stamina: 5.0,

            // Pathfinding
            risk_weight: 10.0,

            // World
            map_width: 20,
            map_height: 20,
            camp_size: 5,

            // Q-learning
            learning_rate: 0.1,
            discount_factor: 0.9,
            epsilon_start: 0.9,
            epsilon_decay: 0.995,
            epsilon_min: 0.05,
            gauge_bucket_width: 25.0,
            camp_distance_bucket: 5,

            // Decisions
            loop_window: 10,
            loop_distinct_max: 2,
            loop_penalty: -20.0,
            critical_need: 15.0,
            critical_hp_fraction: 0.2,
            failure_reward: -10.0,
            min_action_delay: 0.1,
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a TOML tuning file over the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SimConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.day_length_secs <= 0.0 {
            return Err(SimError::ConfigError(
                "day_length_secs must be positive".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.night_start) {
            return Err(SimError::ConfigError(format!(
                "night_start ({}) must be in [0, 1)",
                self.night_start
            )));
        }
        if self.epsilon_min > self.epsilon_start {
            return Err(SimError::ConfigError(format!(
                "epsilon_min ({}) must not exceed epsilon_start ({})",
                self.epsilon_min, self.epsilon_start
            )));
        }
        if self.gauge_bucket_width <= 0.0 || self.camp_distance_bucket <= 0 {
            return Err(SimError::ConfigError(
                "state bucket widths must be positive".into(),
            ));
        }
        if self.camp_size > self.map_width || self.camp_size > self.map_height {
            return Err(SimError::ConfigError(format!(
                "camp_size ({}) does not fit the map ({}x{})",
                self.camp_size, self.map_width, self.map_height
            )));
        }
        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<SimConfig> = OnceLock::new();

/// Get the global simulation config (initializes with defaults if not set)
pub fn config() -> &'static SimConfig {
    CONFIG.get_or_init(SimConfig::default)
}

/// Set the global simulation config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: SimConfig) -> std::result::Result<(), SimConfig> {
    CONFIG.set(config)
}
