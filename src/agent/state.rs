//! The agent state machine
//!
//! `advance` is the per-tick entry point: movement, need decay, idle
//! regeneration, the night penalty and end-of-day settlement all happen
//! here. Action effects are applied by the executor; decisions are made
//! by the policy layer. Gauges can only move through the clamped helpers
//! in `needs`, so invariants hold no matter which layer mutates.

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::actions::catalog::{Action, ActionCategory};
use crate::agent::camp::Camp;
use crate::agent::equipment::Equipment;
use crate::agent::inventory::Inventory;
use crate::agent::needs::Needs;
use crate::agent::perks::{DevelopmentPath, PerkSet};
use crate::agent::stats::BaseStats;
use crate::core::config::config;
use crate::core::types::{Day, DeathCause, GridPos};
use crate::knowledge::memory::Knowledge;
use crate::world::map::WorldMap;
use crate::world::pathfinding;

/// Stamina level at which an in-flight move is aborted
const MOVE_ABORT_STAMINA: f32 = 2.0;

/// Entries kept in the action history ring
const ACTION_HISTORY_LEN: usize = 20;

/// Per-day decay of the action-frequency counters
const FREQUENCY_DECAY: f32 = 0.2;

/// How many recent deaths inform stat allocation
const DEATH_MEMORY: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    pub pos: GridPos,
    pub stats: BaseStats,
    pub needs: Needs,

    pub level: u32,
    pub exp: i64,
    pub exp_to_next: i64,
    pub stat_points: u32,
    pub perk_points: u32,
    pub development_path: Option<DevelopmentPath>,
    pub perks: PerkSet,

    pub inventory: Inventory,
    pub equipment: Equipment,
    pub camp: Camp,

    /// Remaining A* cells toward the current destination
    pub path: VecDeque<GridPos>,
    /// Straight-line fallback when no path was found
    pub fallback_target: Option<GridPos>,
    move_cooldown: f32,
    idle_timer: f32,

    pub day: Day,
    pub day_progress: f32,
    pub is_night: bool,
    pub in_camp: bool,

    pub alive: bool,
    pub death_cause: Option<DeathCause>,

    pub discovered_tiles: AHashSet<GridPos>,
    pub action_history: VecDeque<Action>,
    pub action_frequency: AHashMap<Action, f32>,
    pub caution_score: u32,
    pub days_without_exploration: u32,
    pub consecutive_camp_days: u32,

    events: Vec<String>,
}

impl AgentState {
    /// Spawn at the camp center with fresh gauges
    pub fn new(world: &WorldMap) -> Self {
        let stats = BaseStats::default();
        let needs = Needs::new(stats.max_hp(), stats.max_stamina());
        let pos = world.camp_center;

        let mut discovered_tiles = AHashSet::new();
        discovered_tiles.insert(pos);

        Self {
            pos,
            stats,
            needs,
            level: 1,
            exp: 0,
            exp_to_next: 100,
            stat_points: 0,
            perk_points: 0,
            development_path: None,
            perks: PerkSet::new(),
            inventory: Inventory::new(),
            equipment: Equipment::new(),
            camp: Camp::new(),
            path: VecDeque::new(),
            fallback_target: None,
            move_cooldown: 0.0,
            idle_timer: 0.0,
            day: 0,
            day_progress: 0.0,
            is_night: false,
            in_camp: true,
            alive: true,
            death_cause: None,
            discovered_tiles,
            action_history: VecDeque::new(),
            action_frequency: AHashMap::new(),
            caution_score: 0,
            days_without_exploration: 0,
            consecutive_camp_days: 0,
            events: Vec::new(),
        }
    }

    /// Carry capacity including the backpack bonus
    pub fn carry_capacity(&self) -> u32 {
        self.stats.carry_capacity() + self.equipment.carry_bonus()
    }

    /// True while a movement target is pending
    pub fn is_moving(&self) -> bool {
        !self.path.is_empty() || self.fallback_target.is_some()
    }

    /// Drain buffered human-readable events
    pub fn take_events(&mut self) -> Vec<String> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, message: impl Into<String>) {
        self.events.push(message.into());
    }

    /// Advance the state machine by `dt` seconds
    pub fn advance(
        &mut self,
        dt: f32,
        world: &mut WorldMap,
        knowledge: &Knowledge,
        rng: &mut ChaCha8Rng,
    ) {
        if !self.alive {
            return;
        }
        let cfg = config();

        self.move_cooldown = (self.move_cooldown - dt).max(0.0);

        // A move in progress is abandoned when stamina is nearly gone so
        // the idle regeneration below can kick in.
        if self.needs.stamina <= MOVE_ABORT_STAMINA && self.is_moving() {
            self.path.clear();
            self.fallback_target = None;
            self.push_event("Stamina exhausted, stopping to rest".to_string());
        }

        if self.is_moving() && self.move_cooldown <= 0.0 {
            self.step_movement(world);
        }

        // Continuous need decay, softened by perks
        let effects = self.perks.total_effects();
        let day_fraction = dt / cfg.day_length_secs;
        self.needs
            .change_hunger(-cfg.hunger_drain_per_day * (1.0 - effects.hunger_reduction) * day_fraction);
        self.needs
            .change_thirst(-cfg.thirst_drain_per_day * (1.0 - effects.thirst_reduction) * day_fraction);

        // Idle regeneration during daytime
        if self.move_cooldown <= 0.0 && !self.is_moving() {
            self.idle_timer += dt;
        } else {
            self.idle_timer = 0.0;
        }
        if self.idle_timer >= cfg.idle_regen_delay_secs && !self.is_night {
            let camp_bonus = if self.in_camp {
                cfg.camp_regen_multiplier
            } else {
                1.0
            };
            let regen = (cfg.base_stamina_regen + self.stats.vitality as f32 * 0.5) * dt;
            self.needs.change_stamina(regen * camp_bonus);
            self.needs.change_hp(self.stats.vitality as f32 * 0.05 * dt);
        }

        self.day_progress += day_fraction;
        self.is_night = self.day_progress >= cfg.night_start;

        if self.is_night && !self.in_camp {
            // Each point of armor warmth shaves 1% off the exposure drain
            let insulation = (1.0 - self.equipment.warmth_bonus() / 100.0).max(0.0);
            self.needs.change_hp(-cfg.night_hp_drain * dt);
            self.needs
                .change_warmth(-cfg.night_warmth_drain * insulation * dt);
        }

        if self.day_progress >= 1.0 {
            self.end_day(world, knowledge, rng);
        }

        self.update_death();
    }

    /// Begin moving toward a target cell
    ///
    /// Refuses below the stamina floor. When the pathfinder finds no
    /// route the target is kept for naive straight-line stepping.
    pub fn start_move(&mut self, target: GridPos, world: &WorldMap) -> bool {
        if self.needs.stamina < config().min_move_stamina {
            self.path.clear();
            return false;
        }
        if self.pos == target {
            return false;
        }

        match pathfinding::find_path(world, self.pos, target) {
            Some(cells) if !cells.is_empty() => {
                self.path = cells.into();
                self.fallback_target = None;
            }
            _ => {
                self.path.clear();
                self.fallback_target = Some(target);
            }
        }
        true
    }

    /// Take one step along the path or toward the fallback target
    fn step_movement(&mut self, world: &WorldMap) {
        let cfg = config();

        if let Some(next) = self.path.pop_front() {
            if self.needs.stamina < cfg.min_move_stamina {
                self.path.clear();
                return;
            }
            self.pos = next;
        } else if let Some(target) = self.fallback_target {
            self.pos = self.pos.step_toward(&target);
            if self.pos == target {
                self.fallback_target = None;
            }
        } else {
            return;
        }

        if self.discovered_tiles.insert(self.pos) {
            self.days_without_exploration = 0;
        }

        let effects = self.perks.total_effects();
        let path_reduction = self
            .development_path
            .map_or(0.0, |p| p.stamina_reduction());
        let cost = cfg.move_stamina_cost
            * (1.0 - effects.stamina_reduction)
            * (1.0 - path_reduction);
        self.needs.change_stamina(-cost);

        self.move_cooldown = cfg.move_cooldown_secs;
        self.idle_timer = 0.0;
        self.in_camp = world.is_in_camp(self.pos);
    }

    /// Grant (or deduct) experience, with diminishing returns for spam
    ///
    /// Later days and higher intelligence yield more; repeating the same
    /// action taxes the multiplier down to a floor of 0.1.
    pub fn gain_exp(
        &mut self,
        base: i64,
        action: Option<Action>,
        knowledge: &Knowledge,
        rng: &mut ChaCha8Rng,
    ) -> i64 {
        let day_bonus = 1.0 + self.day as f32 * 0.08;
        let int_bonus = 1.0 + self.stats.intelligence as f32 * 0.02;

        let mut multiplier = match action {
            Some(action) => {
                let frequency = self.action_frequency.get(&action).copied().unwrap_or(0.0);
                (1.0 - frequency * 0.1).max(0.1)
            }
            None => 1.0,
        };
        if let (Some(action), Some(path)) = (action, self.development_path) {
            if action.category() == ActionCategory::Gather {
                multiplier += path.gathering_bonus();
            }
        }

        let total = (base as f32 * day_bonus * int_bonus * multiplier) as i64;
        self.exp = (self.exp + total).max(0);

        while self.exp >= self.exp_to_next {
            self.level_up(knowledge, rng);
        }

        if let Some(action) = action {
            *self.action_frequency.entry(action).or_insert(0.0) += 1.0;
        }
        total
    }

    fn level_up(&mut self, knowledge: &Knowledge, rng: &mut ChaCha8Rng) {
        self.level += 1;
        self.exp -= self.exp_to_next;
        self.exp_to_next = (self.exp_to_next as f32 * 1.12) as i64 + 10;
        self.stat_points += 5;

        self.choose_development_path();

        if self.level % 6 == 0 {
            self.perk_points += 1;
        }
        while self.perk_points > 0 {
            if let Some(perk) = self.perks.auto_choose(&knowledge.death_causes, rng) {
                self.push_event(format!("Learned perk: {}", perk.name()));
            }
            self.perk_points -= 1;
        }

        let recent = knowledge.recent_causes(DEATH_MEMORY);
        let points = std::mem::take(&mut self.stat_points);
        self.stats.allocate_points(points, &recent, rng);

        self.recompute_caps();
        self.push_event(format!("Level up! Now level {}", self.level));
    }

    /// Re-derive gauge caps from stats and perks
    fn recompute_caps(&mut self) {
        let effects = self.perks.total_effects();
        self.needs.set_caps(
            self.stats.max_hp() + effects.max_hp_bonus,
            self.stats.max_stamina() + effects.max_stamina_bonus,
        );
    }

    /// Pick a development path once level 5 is reached
    fn choose_development_path(&mut self) {
        if self.level < 5 || self.development_path.is_some() {
            return;
        }

        // Sorted accumulation keeps the float sums identical across runs
        let mut entries: Vec<(&Action, &f32)> = self.action_frequency.iter().collect();
        entries.sort_by_key(|(action, _)| action.label());

        let mut work = 0.0;
        let mut roaming = 0.0;
        let mut other = 0.0;
        for (action, frequency) in entries {
            match action.category() {
                ActionCategory::Gather | ActionCategory::Work => work += frequency,
                ActionCategory::Exploration | ActionCategory::Logistics => roaming += frequency,
                _ => other += frequency,
            }
        }

        let path = DevelopmentPath::from_behavior(work, roaming, other);
        self.development_path = Some(path);
        self.push_event(format!("Chose development path: {}", path.name()));
    }

    /// End-of-day settlement
    ///
    /// Consumption runs before the death check on purpose: a night with
    /// empty stores can kill the agent at that same rollover.
    fn end_day(&mut self, world: &mut WorldMap, knowledge: &Knowledge, rng: &mut ChaCha8Rng) {
        self.day += 1;
        self.day_progress = 0.0;
        self.is_night = false;

        self.days_without_exploration += 1;
        if self.in_camp {
            self.consecutive_camp_days += 1;
        } else {
            self.consecutive_camp_days = 0;
        }

        // Old habits fade: frequency counters decay toward zero
        self.action_frequency.retain(|_, frequency| {
            *frequency -= FREQUENCY_DECAY;
            *frequency > 0.0
        });

        self.apply_caution_penalties();

        if self.in_camp {
            let deficit = self.camp.consume_overnight();
            if deficit.food > 0 {
                self.needs.change_hunger(-(deficit.food as f32 * 10.0));
            }
            if deficit.water > 0 {
                self.needs.change_thirst(-(deficit.water as f32 * 10.0));
            }
            if deficit.wood > 0 {
                self.needs.change_warmth(-(deficit.wood as f32 * 5.0));
            }

            let camp_exp = (60 + self.camp.level * 10) as i64;
            let gained = self.gain_exp(camp_exp, None, knowledge, rng);
            self.push_event(format!("Day {} survived in camp (+{} exp)", self.day, gained));
        } else {
            self.gain_exp(-150, None, knowledge, rng);
            self.push_event(format!("Day {} ended outside camp (exp penalty)", self.day));
        }

        world.advance_day();
        tracing::debug!(day = self.day, level = self.level, "day rollover");
    }

    /// Punish overly cautious play at the day boundary
    fn apply_caution_penalties(&mut self) {
        if self.days_without_exploration >= 3 && self.day < 30 {
            self.needs.change_hp(-5.0);
            self.needs.change_stamina(-10.0);
            self.caution_score += 1;
            self.push_event("Stagnation is taking its toll".to_string());
        }

        if self.camp.storage_total() > 80 && self.camp.structures.len() < 4 && self.day < 20 {
            self.needs.change_hunger(-10.0);
            self.needs.change_thirst(-10.0);
            self.caution_score += 1;
        }

        if self.consecutive_camp_days >= 4 && self.day > 5 {
            self.needs.change_hp(-8.0);
            self.caution_score += 1;
        }

        if (self.discovered_tiles.len() as u32) < self.day * 3 && self.day >= 5 {
            self.needs.change_stamina(-15.0);
            self.caution_score += 1;
        }
    }

    /// Record an executed action in the history ring
    pub fn record_action(&mut self, action: Action) {
        self.action_history.push_back(action);
        while self.action_history.len() > ACTION_HISTORY_LEN {
            self.action_history.pop_front();
        }
    }

    fn update_death(&mut self) {
        if !self.alive {
            return;
        }
        if let Some(cause) = self.needs.death_cause() {
            self.alive = false;
            self.death_cause = Some(cause);
            self.push_event(format!("Died of {} on day {}", cause.as_str(), self.day));
            tracing::info!(day = self.day, cause = cause.as_str(), "agent died");
        }
    }
}
