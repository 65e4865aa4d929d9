//! Base attributes and derived caps
//!
//! Stat points earned on level-up are auto-allocated by a weighted roll
//! biased toward whatever has been killing the agent lately.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::sampler::weighted_choice;
use crate::core::types::DeathCause;

/// Base carry capacity before strength and backpack bonuses
pub const BASE_CARRY_CAPACITY: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Strength,
    Dexterity,
    Perception,
    Intelligence,
    Vitality,
}

/// The five base attributes, all starting at 5
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseStats {
    pub strength: u32,
    pub dexterity: u32,
    pub perception: u32,
    pub intelligence: u32,
    pub vitality: u32,
}

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            strength: 5,
            dexterity: 5,
            perception: 5,
            intelligence: 5,
            vitality: 5,
        }
    }
}

impl BaseStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derived hp cap
    pub fn max_hp(&self) -> f32 {
        (self.vitality * 20) as f32
    }

    /// Derived stamina cap
    pub fn max_stamina(&self) -> f32 {
        (100 + self.vitality * 5) as f32
    }

    /// Derived carry capacity before equipment bonuses
    pub fn carry_capacity(&self) -> u32 {
        BASE_CARRY_CAPACITY + self.strength
    }

    fn bump(&mut self, kind: StatKind) {
        match kind {
            StatKind::Strength => self.strength += 1,
            StatKind::Dexterity => self.dexterity += 1,
            StatKind::Perception => self.perception += 1,
            StatKind::Intelligence => self.intelligence += 1,
            StatKind::Vitality => self.vitality += 1,
        }
    }

    /// Spend `points` one at a time via a weighted roll
    ///
    /// Every stat keeps a base weight of 1; each recent death adds weight
    /// to the stats that would have prevented it. Starvation pushes
    /// perception (finding food) and vitality, combat deaths push the
    /// physical stats, cold pushes vitality and intelligence.
    pub fn allocate_points<R: Rng>(
        &mut self,
        points: u32,
        recent_deaths: &[DeathCause],
        rng: &mut R,
    ) {
        for _ in 0..points {
            let mut weights = [
                (StatKind::Strength, 1.0f32),
                (StatKind::Dexterity, 1.0),
                (StatKind::Perception, 1.0),
                (StatKind::Intelligence, 1.0),
                (StatKind::Vitality, 1.0),
            ];

            for cause in recent_deaths {
                match cause {
                    DeathCause::Hunger | DeathCause::Thirst => {
                        weights[2].1 += 3.0;
                        weights[4].1 += 2.0;
                    }
                    DeathCause::HpDepletion => {
                        weights[0].1 += 2.0;
                        weights[1].1 += 2.0;
                        weights[4].1 += 3.0;
                    }
                    DeathCause::Cold => {
                        weights[4].1 += 3.0;
                        weights[3].1 += 2.0;
                    }
                }
            }

            if let Some(kind) = weighted_choice(&weights, rng) {
                self.bump(*kind);
            }
        }
    }
}
