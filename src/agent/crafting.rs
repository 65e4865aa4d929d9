//! Crafting recipes for items and camp structures

use serde::{Deserialize, Serialize};

use crate::agent::equipment::{EquipSlot, Item, ItemBonuses};
use crate::agent::inventory::Inventory;
use crate::agent::stats::BaseStats;
use crate::world::resource::ResourceKind;

/// Craftable equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecipeKind {
    StoneAxe,
    IronAxe,
    WoodenSpear,
    FiberClothes,
    BasicBackpack,
}

impl RecipeKind {
    pub fn name(&self) -> &'static str {
        match self {
            RecipeKind::StoneAxe => "Stone Axe",
            RecipeKind::IronAxe => "Iron Axe",
            RecipeKind::WoodenSpear => "Wooden Spear",
            RecipeKind::FiberClothes => "Fiber Clothes",
            RecipeKind::BasicBackpack => "Basic Backpack",
        }
    }

    pub fn requirements(&self) -> &'static [(ResourceKind, u32)] {
        match self {
            RecipeKind::StoneAxe => &[(ResourceKind::Wood, 3), (ResourceKind::Stone, 2)],
            RecipeKind::IronAxe => &[(ResourceKind::Wood, 2), (ResourceKind::Metal, 3)],
            RecipeKind::WoodenSpear => &[(ResourceKind::Wood, 5), (ResourceKind::Fiber, 2)],
            RecipeKind::FiberClothes => &[(ResourceKind::Fiber, 10)],
            RecipeKind::BasicBackpack => &[(ResourceKind::Fiber, 8), (ResourceKind::Wood, 2)],
        }
    }

    pub fn level_req(&self) -> u32 {
        match self {
            RecipeKind::StoneAxe | RecipeKind::WoodenSpear => 1,
            RecipeKind::FiberClothes => 2,
            RecipeKind::IronAxe => 5,
            RecipeKind::BasicBackpack => 6,
        }
    }

    pub fn strength_req(&self) -> u32 {
        match self {
            RecipeKind::StoneAxe | RecipeKind::WoodenSpear => 3,
            RecipeKind::IronAxe => 6,
            RecipeKind::FiberClothes | RecipeKind::BasicBackpack => 0,
        }
    }

    pub fn dexterity_req(&self) -> u32 {
        match self {
            RecipeKind::WoodenSpear => 3,
            _ => 0,
        }
    }

    /// The item this recipe produces
    pub fn result(&self) -> Item {
        match self {
            RecipeKind::StoneAxe => Item::new(
                "Stone Axe",
                EquipSlot::Tool,
                50,
                ItemBonuses {
                    harvest_speed: 1.5,
                    ..Default::default()
                },
            ),
            RecipeKind::IronAxe => Item::new(
                "Iron Axe",
                EquipSlot::Tool,
                100,
                ItemBonuses {
                    harvest_speed: 2.0,
                    ..Default::default()
                },
            ),
            RecipeKind::WoodenSpear => Item::new(
                "Wooden Spear",
                EquipSlot::Weapon,
                40,
                ItemBonuses {
                    damage: 5.0,
                    ..Default::default()
                },
            ),
            RecipeKind::FiberClothes => Item::new(
                "Fiber Clothes",
                EquipSlot::Armor,
                60,
                ItemBonuses {
                    warmth: 10.0,
                    defense: 2.0,
                    ..Default::default()
                },
            ),
            RecipeKind::BasicBackpack => Item::new(
                "Basic Backpack",
                EquipSlot::Backpack,
                999,
                ItemBonuses {
                    carry_capacity: 5,
                    ..Default::default()
                },
            ),
        }
    }

    /// Check every precondition without consuming anything
    pub fn can_craft(
        &self,
        level: u32,
        stats: &BaseStats,
        inventory: &Inventory,
    ) -> Result<(), String> {
        if level < self.level_req() {
            return Err(format!("requires level {}", self.level_req()));
        }
        if stats.strength < self.strength_req() {
            return Err(format!("requires strength {}", self.strength_req()));
        }
        if stats.dexterity < self.dexterity_req() {
            return Err(format!("requires dexterity {}", self.dexterity_req()));
        }
        for (kind, amount) in self.requirements() {
            if inventory.count(*kind) < *amount {
                return Err(format!("missing {}", kind.as_str()));
            }
        }
        Ok(())
    }
}

/// Buildable camp structures
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Shelter,
    Fire,
    Workbench,
    Storage,
    Wall,
}

impl StructureKind {
    pub fn name(&self) -> &'static str {
        match self {
            StructureKind::Shelter => "Shelter",
            StructureKind::Fire => "Fire",
            StructureKind::Workbench => "Workbench",
            StructureKind::Storage => "Storage",
            StructureKind::Wall => "Wall",
        }
    }

    pub fn requirements(&self) -> &'static [(ResourceKind, u32)] {
        match self {
            StructureKind::Shelter => &[(ResourceKind::Wood, 15), (ResourceKind::Fiber, 5)],
            StructureKind::Fire => &[(ResourceKind::Wood, 10), (ResourceKind::Stone, 3)],
            StructureKind::Workbench => &[(ResourceKind::Wood, 12), (ResourceKind::Stone, 8)],
            StructureKind::Storage => &[(ResourceKind::Wood, 20), (ResourceKind::Stone, 10)],
            StructureKind::Wall => &[(ResourceKind::Stone, 15), (ResourceKind::Wood, 5)],
        }
    }

    pub fn level_req(&self) -> u32 {
        match self {
            StructureKind::Shelter => 1,
            StructureKind::Fire => 2,
            StructureKind::Workbench => 3,
            StructureKind::Storage => 4,
            StructureKind::Wall => 5,
        }
    }

    /// Wood drawn from storage per day to keep the structure standing
    pub fn maintenance_cost(&self) -> u32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stone_axe_craftable_at_start() {
        let stats = BaseStats::default();
        let mut inventory = Inventory::new();
        inventory.add(ResourceKind::Wood, 3, 20);
        inventory.add(ResourceKind::Stone, 2, 20);
        assert!(RecipeKind::StoneAxe.can_craft(1, &stats, &inventory).is_ok());
    }

    #[test]
    fn test_missing_materials_refused_with_reason() {
        let stats = BaseStats::default();
        let inventory = Inventory::new();
        let err = RecipeKind::StoneAxe
            .can_craft(1, &stats, &inventory)
            .unwrap_err();
        assert!(err.contains("wood"));
    }

    #[test]
    fn test_level_gate() {
        let stats = BaseStats::default();
        let mut inventory = Inventory::new();
        inventory.add(ResourceKind::Wood, 2, 20);
        inventory.add(ResourceKind::Metal, 3, 20);
        let err = RecipeKind::IronAxe
            .can_craft(1, &stats, &inventory)
            .unwrap_err();
        assert!(err.contains("level"));
    }

    #[test]
    fn test_strength_gate() {
        let mut stats = BaseStats::default();
        stats.strength = 2;
        let mut inventory = Inventory::new();
        inventory.add(ResourceKind::Wood, 3, 20);
        inventory.add(ResourceKind::Stone, 2, 20);
        let err = RecipeKind::StoneAxe
            .can_craft(1, &stats, &inventory)
            .unwrap_err();
        assert!(err.contains("strength"));
    }

    #[test]
    fn test_recipe_results_land_in_right_slots() {
        assert_eq!(RecipeKind::StoneAxe.result().slot, EquipSlot::Tool);
        assert_eq!(RecipeKind::WoodenSpear.result().slot, EquipSlot::Weapon);
        assert_eq!(RecipeKind::FiberClothes.result().slot, EquipSlot::Armor);
        assert_eq!(RecipeKind::BasicBackpack.result().slot, EquipSlot::Backpack);
    }
}
