//! The five survival gauges
//!
//! Every mutation goes through clamped helpers, so a gauge can never leave
//! `[0, max]` no matter what the callers do. Death detection lives here
//! because its priority order over the gauges must never change.

use serde::{Deserialize, Serialize};

use crate::core::types::DeathCause;

/// Cap for the hunger/thirst/warmth gauges
pub const GAUGE_MAX: f32 = 100.0;

/// The agent's bounded survival gauges and their caps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Needs {
    pub hp: f32,
    pub hunger: f32,
    pub thirst: f32,
    pub warmth: f32,
    pub stamina: f32,
    pub max_hp: f32,
    pub max_stamina: f32,
}

impl Needs {
    /// Fresh gauges at full, capped by the given derived maxima
    pub fn new(max_hp: f32, max_stamina: f32) -> Self {
        Self {
            hp: max_hp,
            hunger: GAUGE_MAX,
            thirst: GAUGE_MAX,
            warmth: GAUGE_MAX,
            stamina: max_stamina,
            max_hp,
            max_stamina,
        }
    }

    pub fn change_hp(&mut self, delta: f32) {
        self.hp = (self.hp + delta).clamp(0.0, self.max_hp);
    }

    pub fn change_hunger(&mut self, delta: f32) {
        self.hunger = (self.hunger + delta).clamp(0.0, GAUGE_MAX);
    }

    pub fn change_thirst(&mut self, delta: f32) {
        self.thirst = (self.thirst + delta).clamp(0.0, GAUGE_MAX);
    }

    pub fn change_warmth(&mut self, delta: f32) {
        self.warmth = (self.warmth + delta).clamp(0.0, GAUGE_MAX);
    }

    pub fn change_stamina(&mut self, delta: f32) {
        self.stamina = (self.stamina + delta).clamp(0.0, self.max_stamina);
    }

    /// Update the caps after a level-up or perk change
    ///
    /// Current values are re-clamped so lowering a cap can never leave a
    /// gauge above it.
    pub fn set_caps(&mut self, max_hp: f32, max_stamina: f32) {
        self.max_hp = max_hp.max(1.0);
        self.max_stamina = max_stamina.max(1.0);
        self.hp = self.hp.min(self.max_hp);
        self.stamina = self.stamina.min(self.max_stamina);
    }

    /// Fixed-priority death check: hunger, thirst, cold, hp
    ///
    /// Exactly one cause is reported even when several gauges hit zero in
    /// the same tick; the ordering is part of the determinism contract.
    pub fn death_cause(&self) -> Option<DeathCause> {
        if self.hunger <= 0.0 {
            Some(DeathCause::Hunger)
        } else if self.thirst <= 0.0 {
            Some(DeathCause::Thirst)
        } else if self.warmth <= 0.0 {
            Some(DeathCause::Cold)
        } else if self.hp <= 0.0 {
            Some(DeathCause::HpDepletion)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauges_clamp_low() {
        let mut needs = Needs::new(100.0, 125.0);
        needs.change_hunger(-500.0);
        needs.change_stamina(-500.0);
        assert_eq!(needs.hunger, 0.0);
        assert_eq!(needs.stamina, 0.0);
    }

    #[test]
    fn test_gauges_clamp_high() {
        let mut needs = Needs::new(100.0, 125.0);
        needs.change_hp(-30.0);
        needs.change_hp(1000.0);
        assert_eq!(needs.hp, 100.0);
        needs.change_thirst(50.0);
        assert_eq!(needs.thirst, GAUGE_MAX);
    }

    #[test]
    fn test_no_death_while_gauges_positive() {
        let needs = Needs::new(100.0, 125.0);
        assert_eq!(needs.death_cause(), None);
    }

    #[test]
    fn test_death_priority_hunger_beats_thirst() {
        let mut needs = Needs::new(100.0, 125.0);
        needs.change_hunger(-GAUGE_MAX);
        needs.change_thirst(-GAUGE_MAX);
        assert_eq!(needs.death_cause(), Some(DeathCause::Hunger));
    }

    #[test]
    fn test_death_priority_full_order() {
        let mut needs = Needs::new(100.0, 125.0);
        needs.change_hp(-200.0);
        assert_eq!(needs.death_cause(), Some(DeathCause::HpDepletion));

        needs.change_warmth(-200.0);
        assert_eq!(needs.death_cause(), Some(DeathCause::Cold));

        needs.change_thirst(-200.0);
        assert_eq!(needs.death_cause(), Some(DeathCause::Thirst));

        needs.change_hunger(-200.0);
        assert_eq!(needs.death_cause(), Some(DeathCause::Hunger));
    }

    #[test]
    fn test_cap_change_reclamps_current() {
        let mut needs = Needs::new(100.0, 125.0);
        needs.set_caps(60.0, 80.0);
        assert_eq!(needs.hp, 60.0);
        assert_eq!(needs.stamina, 80.0);

        needs.set_caps(120.0, 150.0);
        assert_eq!(needs.hp, 60.0, "raising a cap must not refill the gauge");
    }
}
