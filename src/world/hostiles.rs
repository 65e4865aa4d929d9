//! Simple hostile NPCs
//!
//! A hostile chases the agent in straight lines once aggroed and bites at
//! melee range. Camp walls block its steps. No packs, no learning.

use serde::{Deserialize, Serialize};

use crate::core::types::GridPos;
use crate::world::map::WorldMap;

/// What a hostile did this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostileAction {
    /// Landed a melee hit for this much hp
    Attacked(f32),
    Moved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostileKind {
    Wolf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostile {
    pub kind: HostileKind,
    pub pos: GridPos,
    pub hp: f32,
    pub max_hp: f32,
    pub damage: f32,
    /// Seconds between steps; lower is faster than the agent's 0.5
    pub move_speed: f32,
    pub aggro_radius: i32,
    pub aggro: bool,
    move_cooldown: f32,
}

impl Hostile {
    pub fn wolf(pos: GridPos) -> Self {
        Self {
            kind: HostileKind::Wolf,
            pos,
            hp: 30.0,
            max_hp: 30.0,
            damage: 5.0,
            move_speed: 0.8,
            aggro_radius: 5,
            aggro: false,
            move_cooldown: 0.0,
        }
    }

    pub fn alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Chase-and-bite behavior
    ///
    /// `wall_cells` are world positions occupied by camp walls; a step into
    /// one is simply refused.
    pub fn update(
        &mut self,
        dt: f32,
        agent_pos: GridPos,
        wall_cells: &[GridPos],
        world: &WorldMap,
    ) -> Option<HostileAction> {
        if !self.alive() {
            return None;
        }

        self.move_cooldown = (self.move_cooldown - dt).max(0.0);

        let dist = self.pos.distance(&agent_pos);
        if dist <= self.aggro_radius {
            self.aggro = true;
        }

        if !self.aggro || self.move_cooldown > 0.0 {
            return None;
        }

        if dist <= 1 {
            self.move_cooldown = 1.0;
            return Some(HostileAction::Attacked(self.damage));
        }

        let next = self.pos.step_toward(&agent_pos);
        if wall_cells.contains(&next) || !world.in_bounds(next) {
            return None;
        }
        self.pos = next;
        self.move_cooldown = self.move_speed;
        Some(HostileAction::Moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_world() -> WorldMap {
        WorldMap::flat(20, 20, 0.1)
    }

    #[test]
    fn test_wolf_ignores_distant_agent() {
        let world = flat_world();
        let mut wolf = Hostile::wolf(GridPos::new(0, 0));
        let action = wolf.update(1.0, GridPos::new(15, 15), &[], &world);
        assert_eq!(action, None);
        assert!(!wolf.aggro);
        assert_eq!(wolf.pos, GridPos::new(0, 0));
    }

    #[test]
    fn test_wolf_chases_once_aggroed() {
        let world = flat_world();
        let mut wolf = Hostile::wolf(GridPos::new(0, 0));
        let agent = GridPos::new(4, 0);

        let action = wolf.update(1.0, agent, &[], &world);
        assert_eq!(action, Some(HostileAction::Moved));
        assert_eq!(wolf.pos, GridPos::new(1, 0));

        // Aggro persists even if the agent runs out of radius
        let far = GridPos::new(19, 19);
        wolf.move_cooldown = 0.0;
        let action = wolf.update(1.0, far, &[], &world);
        assert_eq!(action, Some(HostileAction::Moved));
    }

    #[test]
    fn test_wolf_attacks_at_melee_range() {
        let world = flat_world();
        let mut wolf = Hostile::wolf(GridPos::new(3, 3));
        let action = wolf.update(1.0, GridPos::new(3, 4), &[], &world);
        assert_eq!(action, Some(HostileAction::Attacked(5.0)));
        // Attack sets a cooldown
        let action = wolf.update(0.1, GridPos::new(3, 4), &[], &world);
        assert_eq!(action, None);
    }

    #[test]
    fn test_wall_blocks_the_chase() {
        let world = flat_world();
        let mut wolf = Hostile::wolf(GridPos::new(2, 5));
        let agent = GridPos::new(6, 5);
        let wall = vec![GridPos::new(3, 5)];

        let action = wolf.update(1.0, agent, &wall, &world);
        assert_eq!(action, None);
        assert_eq!(wolf.pos, GridPos::new(2, 5));
    }

    #[test]
    fn test_dead_wolf_does_nothing() {
        let world = flat_world();
        let mut wolf = Hostile::wolf(GridPos::new(3, 3));
        wolf.hp = 0.0;
        assert_eq!(wolf.update(1.0, GridPos::new(3, 4), &[], &world), None);
    }
}
