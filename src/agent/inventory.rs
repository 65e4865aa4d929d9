//! Carried resources, bounded by carry capacity

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::world::resource::ResourceKind;

/// What the agent is carrying
///
/// Counts are non-negative by construction; the total never exceeds the
/// capacity passed to `add` because `add` returns how much actually fit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    items: AHashMap<ResourceKind, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: ResourceKind) -> u32 {
        self.items.get(&kind).copied().unwrap_or(0)
    }

    /// Total units carried across all kinds
    pub fn total(&self) -> u32 {
        self.items.values().sum()
    }

    pub fn space_left(&self, capacity: u32) -> u32 {
        capacity.saturating_sub(self.total())
    }

    pub fn is_full(&self, capacity: u32) -> bool {
        self.total() >= capacity
    }

    /// Add up to `amount` units, returns how many fit under `capacity`
    pub fn add(&mut self, kind: ResourceKind, amount: u32, capacity: u32) -> u32 {
        let added = amount.min(self.space_left(capacity));
        if added > 0 {
            *self.items.entry(kind).or_insert(0) += added;
        }
        added
    }

    /// Remove up to `amount` units, returns how many were actually held
    pub fn remove(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let held = self.count(kind);
        let removed = amount.min(held);
        if removed > 0 {
            if removed == held {
                self.items.remove(&kind);
            } else if let Some(entry) = self.items.get_mut(&kind) {
                *entry -= removed;
            }
        }
        removed
    }

    /// Check a requirements list without mutating
    pub fn has_materials(&self, requirements: &[(ResourceKind, u32)]) -> bool {
        requirements
            .iter()
            .all(|(kind, amount)| self.count(*kind) >= *amount)
    }

    /// Consume a requirements list atomically
    ///
    /// Either everything is deducted or nothing is; a failed craft must
    /// not eat materials.
    pub fn consume_materials(&mut self, requirements: &[(ResourceKind, u32)]) -> bool {
        if !self.has_materials(requirements) {
            return false;
        }
        for (kind, amount) in requirements {
            self.remove(*kind, *amount);
        }
        true
    }

    /// Drain everything, yielding (kind, count) pairs in kind order
    pub fn drain_all(&mut self) -> Vec<(ResourceKind, u32)> {
        let mut drained = Vec::new();
        for kind in ResourceKind::ALL {
            if let Some(count) = self.items.remove(&kind) {
                if count > 0 {
                    drained.push((kind, count));
                }
            }
        }
        drained
    }
}
