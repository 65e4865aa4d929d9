//! The agent's camp: structures on a small grid plus resource storage
//!
//! Structure positions are camp-local (within the fixed camp square).
//! No two structures may share a cell; placement scans row-major for the
//! first free cell.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::agent::crafting::StructureKind;
use crate::core::config::config;
use crate::core::types::GridPos;
use crate::world::resource::ResourceKind;

/// A built structure inside the camp square
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampStructure {
    pub kind: StructureKind,
    /// Camp-local cell, 0..camp_size on both axes
    pub pos: GridPos,
    pub durability: u32,
    pub max_durability: u32,
    pub maintenance_cost: u32,
}

impl CampStructure {
    pub fn new(kind: StructureKind, pos: GridPos) -> Self {
        Self {
            kind,
            pos,
            durability: 100,
            max_durability: 100,
            maintenance_cost: kind.maintenance_cost(),
        }
    }

    pub fn repair(&mut self, amount: u32) {
        self.durability = (self.durability + amount).min(self.max_durability);
    }

    pub fn is_damaged(&self) -> bool {
        self.durability < self.max_durability
    }

    pub fn in_disrepair(&self) -> bool {
        self.durability * 2 < self.max_durability
    }
}

/// Resource shortfall after an overnight settlement
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OvernightDeficit {
    pub food: u32,
    pub water: u32,
    pub wood: u32,
}

/// Camp state: level, storage and structures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camp {
    pub level: u32,
    pub storage: AHashMap<ResourceKind, u32>,
    pub structures: Vec<CampStructure>,
}

impl Camp {
    /// A fresh camp starts with a shelter in the middle cell
    pub fn new() -> Self {
        let mid = config().camp_size / 2;
        Self {
            level: 1,
            storage: AHashMap::new(),
            structures: vec![CampStructure::new(
                StructureKind::Shelter,
                GridPos::new(mid, mid),
            )],
        }
    }

    pub fn stored(&self, kind: ResourceKind) -> u32 {
        self.storage.get(&kind).copied().unwrap_or(0)
    }

    pub fn storage_total(&self) -> u32 {
        self.storage.values().sum()
    }

    pub fn deposit(&mut self, kind: ResourceKind, amount: u32) {
        if amount > 0 {
            *self.storage.entry(kind).or_insert(0) += amount;
        }
    }

    /// Withdraw up to `amount`, returning what was actually available
    pub fn withdraw(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let held = self.stored(kind);
        let taken = amount.min(held);
        if taken > 0 {
            if taken == held {
                self.storage.remove(&kind);
            } else if let Some(entry) = self.storage.get_mut(&kind) {
                *entry -= taken;
            }
        }
        taken
    }

    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.structures.iter().any(|s| s.pos == pos)
    }

    /// First free camp cell in row-major order
    pub fn first_free_cell(&self) -> Option<GridPos> {
        let size = config().camp_size;
        for cy in 0..size {
            for cx in 0..size {
                let pos = GridPos::new(cx, cy);
                if !self.is_occupied(pos) {
                    return Some(pos);
                }
            }
        }
        None
    }

    /// Place a structure, enforcing the one-per-cell invariant
    ///
    /// Returns false (and changes nothing) when the cell is taken or
    /// outside the camp grid. A successful build raises the camp level.
    pub fn place(&mut self, kind: StructureKind, pos: GridPos) -> bool {
        let size = config().camp_size;
        if pos.x < 0 || pos.x >= size || pos.y < 0 || pos.y >= size {
            return false;
        }
        if self.is_occupied(pos) {
            return false;
        }
        self.structures.push(CampStructure::new(kind, pos));
        self.level += 1;
        true
    }

    pub fn has_structure(&self, kind: StructureKind) -> bool {
        self.structures.iter().any(|s| s.kind == kind)
    }

    /// Total daily wood cost of keeping every structure standing
    pub fn maintenance_total(&self) -> u32 {
        self.structures.iter().map(|s| s.maintenance_cost).sum()
    }

    /// First structure below full durability, for repairs
    pub fn most_damaged_mut(&mut self) -> Option<&mut CampStructure> {
        self.structures.iter_mut().find(|s| s.is_damaged())
    }

    pub fn any_in_disrepair(&self) -> bool {
        self.structures.iter().any(|s| s.in_disrepair())
    }

    /// Overnight settlement: 1 food, 1 water and maintenance wood
    ///
    /// Whatever the storage cannot cover is returned as a deficit; the
    /// caller converts deficits into need damage.
    pub fn consume_overnight(&mut self) -> OvernightDeficit {
        let wood_needed = self.maintenance_total();
        OvernightDeficit {
            food: 1 - self.withdraw(ResourceKind::Food, 1),
            water: 1 - self.withdraw(ResourceKind::Water, 1),
            wood: wood_needed - self.withdraw(ResourceKind::Wood, wood_needed),
        }
    }

    /// World positions of wall structures, for hostile blocking
    pub fn wall_cells(&self, camp_origin: GridPos) -> Vec<GridPos> {
        self.structures
            .iter()
            .filter(|s| s.kind == StructureKind::Wall)
            .map(|s| GridPos::new(camp_origin.x + s.pos.x, camp_origin.y + s.pos.y))
            .collect()
    }
}

impl Default for Camp {
    fn default() -> Self {
        Self::new()
    }
}
