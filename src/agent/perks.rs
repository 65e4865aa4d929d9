//! Passive perks and development paths
//!
//! Perk points arrive every sixth level and are spent automatically: the
//! category roll is weighted by what has been killing the agent, then a
//! perk inside the category is rolled uniformly. Development paths are a
//! one-time specialization picked from observed behavior at level 5.

use ahash::AHashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::sampler::weighted_choice;
use crate::core::types::DeathCause;

/// Per-level passive effects, summed over all learned perks
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerkEffects {
    /// Fractional reduction of hunger drain
    pub hunger_reduction: f32,
    /// Fractional reduction of thirst drain
    pub thirst_reduction: f32,
    /// Fractional reduction of movement stamina cost
    pub stamina_reduction: f32,
    /// Fractional bonus to harvest yields
    pub gathering_bonus: f32,
    /// Flat max hp bonus
    pub max_hp_bonus: f32,
    /// Flat max stamina bonus
    pub max_stamina_bonus: f32,
}

impl PerkEffects {
    fn scaled(&self, level: u32) -> Self {
        let level = level as f32;
        Self {
            hunger_reduction: self.hunger_reduction * level,
            thirst_reduction: self.thirst_reduction * level,
            stamina_reduction: self.stamina_reduction * level,
            gathering_bonus: self.gathering_bonus * level,
            max_hp_bonus: self.max_hp_bonus * level,
            max_stamina_bonus: self.max_stamina_bonus * level,
        }
    }

    fn add(&mut self, other: Self) {
        self.hunger_reduction += other.hunger_reduction;
        self.thirst_reduction += other.thirst_reduction;
        self.stamina_reduction += other.stamina_reduction;
        self.gathering_bonus += other.gathering_bonus;
        self.max_hp_bonus += other.max_hp_bonus;
        self.max_stamina_bonus += other.max_stamina_bonus;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerkCategory {
    Survival,
    Combat,
    Crafting,
    Intelligence,
    Exploration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerkId {
    Forager,
    Survivalist,
    WaterFinder,
    Warrior,
    Craftsman,
    Scholar,
    Medic,
    Athlete,
}

impl PerkId {
    pub const ALL: [PerkId; 8] = [
        PerkId::Forager,
        PerkId::Survivalist,
        PerkId::WaterFinder,
        PerkId::Warrior,
        PerkId::Craftsman,
        PerkId::Scholar,
        PerkId::Medic,
        PerkId::Athlete,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PerkId::Forager => "Forager",
            PerkId::Survivalist => "Survivalist",
            PerkId::WaterFinder => "Water Finder",
            PerkId::Warrior => "Warrior",
            PerkId::Craftsman => "Craftsman",
            PerkId::Scholar => "Scholar",
            PerkId::Medic => "Medic",
            PerkId::Athlete => "Athlete",
        }
    }

    pub fn category(&self) -> PerkCategory {
        match self {
            PerkId::Forager | PerkId::Survivalist | PerkId::WaterFinder => PerkCategory::Survival,
            PerkId::Warrior => PerkCategory::Combat,
            PerkId::Craftsman => PerkCategory::Crafting,
            PerkId::Scholar | PerkId::Medic => PerkCategory::Intelligence,
            PerkId::Athlete => PerkCategory::Exploration,
        }
    }

    /// Effects granted per perk level
    pub fn effects_per_level(&self) -> PerkEffects {
        match self {
            PerkId::Forager => PerkEffects {
                gathering_bonus: 0.2,
                ..Default::default()
            },
            PerkId::Survivalist => PerkEffects {
                hunger_reduction: 0.15,
                thirst_reduction: 0.15,
                ..Default::default()
            },
            PerkId::WaterFinder => PerkEffects {
                thirst_reduction: 0.15,
                ..Default::default()
            },
            PerkId::Warrior => PerkEffects {
                max_hp_bonus: 10.0,
                ..Default::default()
            },
            PerkId::Craftsman => PerkEffects {
                gathering_bonus: 0.1,
                ..Default::default()
            },
            PerkId::Scholar => PerkEffects {
                max_stamina_bonus: 5.0,
                ..Default::default()
            },
            PerkId::Medic => PerkEffects {
                max_hp_bonus: 10.0,
                ..Default::default()
            },
            PerkId::Athlete => PerkEffects {
                max_stamina_bonus: 20.0,
                stamina_reduction: 0.2,
                ..Default::default()
            },
        }
    }

    fn in_category(category: PerkCategory) -> &'static [PerkId] {
        match category {
            PerkCategory::Survival => &[PerkId::Forager, PerkId::Survivalist, PerkId::WaterFinder],
            PerkCategory::Combat => &[PerkId::Warrior],
            PerkCategory::Crafting => &[PerkId::Craftsman],
            PerkCategory::Intelligence => &[PerkId::Scholar, PerkId::Medic],
            PerkCategory::Exploration => &[PerkId::Athlete],
        }
    }
}

const PERK_MAX_LEVEL: u32 = 5;

/// The agent's learned perks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerkSet {
    levels: AHashMap<PerkId, u32>,
}

impl PerkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, id: PerkId) -> u32 {
        self.levels.get(&id).copied().unwrap_or(0)
    }

    /// Combined effects of everything learned
    ///
    /// Summation walks the canonical perk list so float accumulation is
    /// identical across runs regardless of map iteration order.
    pub fn total_effects(&self) -> PerkEffects {
        let mut total = PerkEffects::default();
        for id in PerkId::ALL {
            let level = self.level(id);
            if level > 0 {
                total.add(id.effects_per_level().scaled(level));
            }
        }
        // Fractional reductions saturate below 1 so drains never invert
        total.hunger_reduction = total.hunger_reduction.min(0.9);
        total.thirst_reduction = total.thirst_reduction.min(0.9);
        total.stamina_reduction = total.stamina_reduction.min(0.9);
        total
    }

    /// Spend one perk point, weighted by recent death causes
    ///
    /// Deaths pick the category that would have helped: starvation favors
    /// Survival, violent deaths favor Combat, cold favors Crafting (fires
    /// and shelter upkeep). With no history every category is equal.
    pub fn auto_choose<R: Rng>(
        &mut self,
        death_causes: &AHashMap<DeathCause, u32>,
        rng: &mut R,
    ) -> Option<PerkId> {
        let starvation = death_causes.get(&DeathCause::Hunger).copied().unwrap_or(0)
            + death_causes.get(&DeathCause::Thirst).copied().unwrap_or(0);
        let violent = death_causes
            .get(&DeathCause::HpDepletion)
            .copied()
            .unwrap_or(0);
        let cold = death_causes.get(&DeathCause::Cold).copied().unwrap_or(0);

        let weights = [
            (PerkCategory::Survival, 1.0 + starvation as f32),
            (PerkCategory::Combat, 1.0 + violent as f32),
            (PerkCategory::Crafting, 1.0 + cold as f32),
            (PerkCategory::Intelligence, 1.0),
            (PerkCategory::Exploration, 1.0),
        ];
        let category = *weighted_choice(&weights, rng)?;

        let candidates: Vec<(PerkId, f32)> = PerkId::in_category(category)
            .iter()
            .filter(|id| self.level(**id) < PERK_MAX_LEVEL)
            .map(|id| (*id, 1.0))
            .collect();
        let chosen = *weighted_choice(&candidates, rng)?;

        *self.levels.entry(chosen).or_insert(0) += 1;
        Some(chosen)
    }
}

/// One-time behavioral specialization chosen at level 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DevelopmentPath {
    Combat,
    Survival,
    Nomad,
}

impl DevelopmentPath {
    pub fn name(&self) -> &'static str {
        match self {
            DevelopmentPath::Combat => "Combat",
            DevelopmentPath::Survival => "Survival",
            DevelopmentPath::Nomad => "Nomad",
        }
    }

    /// Fractional bonus to harvest yields
    pub fn gathering_bonus(&self) -> f32 {
        match self {
            DevelopmentPath::Survival => 0.2,
            _ => 0.0,
        }
    }

    /// Fractional reduction of movement stamina cost
    pub fn stamina_reduction(&self) -> f32 {
        match self {
            DevelopmentPath::Nomad => 0.15,
            _ => 0.0,
        }
    }

    /// Flat melee damage bonus
    pub fn damage_bonus(&self) -> f32 {
        match self {
            DevelopmentPath::Combat => 2.0,
            _ => 0.0,
        }
    }

    /// Pick the path matching the dominant behavior counters
    pub fn from_behavior(gather_craft_build: f32, explore_move: f32, other: f32) -> Self {
        if gather_craft_build >= explore_move && gather_craft_build >= other {
            DevelopmentPath::Survival
        } else if explore_move >= other {
            DevelopmentPath::Nomad
        } else {
            DevelopmentPath::Combat
        }
    }
}
