//! Harvestable resource nodes
//!
//! A node holds a finite stock of one resource kind. Harvesting to zero
//! flags it depleted; depleted nodes are invisible to resource search until
//! their respawn countdown elapses and the stock resets to full.

use serde::{Deserialize, Serialize};

use crate::core::types::GridPos;

/// The resource kinds that exist in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Wood,
    Stone,
    Food,
    Water,
    Fiber,
    Metal,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Wood,
        ResourceKind::Stone,
        ResourceKind::Food,
        ResourceKind::Water,
        ResourceKind::Fiber,
        ResourceKind::Metal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Wood => "wood",
            ResourceKind::Stone => "stone",
            ResourceKind::Food => "food",
            ResourceKind::Water => "water",
            ResourceKind::Fiber => "fiber",
            ResourceKind::Metal => "metal",
        }
    }
}

/// A harvestable resource location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceNode {
    pub kind: ResourceKind,
    pub pos: GridPos,
    pub max_amount: u32,
    pub current_amount: u32,
    pub depleted: bool,
    /// Days a depleted node waits before restocking
    pub respawn_days: u32,
    pub days_since_depleted: u32,
}

impl ResourceNode {
    pub fn new(kind: ResourceKind, pos: GridPos, amount: u32, respawn_days: u32) -> Self {
        Self {
            kind,
            pos,
            max_amount: amount,
            current_amount: amount,
            depleted: false,
            respawn_days,
            days_since_depleted: 0,
        }
    }

    /// Take up to `requested` units out of the node
    ///
    /// Returns the amount actually removed: never negative, never more than
    /// the remaining stock. Draining the node flags it depleted and resets
    /// the respawn countdown.
    pub fn harvest(&mut self, requested: u32) -> u32 {
        if self.current_amount == 0 {
            self.depleted = true;
            return 0;
        }

        let actual = requested.min(self.current_amount);
        self.current_amount -= actual;
        if self.current_amount == 0 {
            self.depleted = true;
            self.days_since_depleted = 0;
        }
        actual
    }

    /// Advance the respawn countdown by one day
    pub fn advance_day(&mut self) {
        if self.depleted {
            self.days_since_depleted += 1;
            if self.days_since_depleted >= self.respawn_days {
                self.current_amount = self.max_amount;
                self.depleted = false;
                self.days_since_depleted = 0;
            }
        }
    }
}
