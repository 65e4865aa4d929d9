//! Equipped items and durability

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Tool,
    Armor,
    Backpack,
}

/// Typed stat bonuses an item can carry
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ItemBonuses {
    /// Harvest yield multiplier (tools)
    pub harvest_speed: f32,
    /// Extra melee damage (weapons)
    pub damage: f32,
    /// Incoming damage reduction (armor)
    pub defense: f32,
    /// Passive warmth bonus (armor)
    pub warmth: f32,
    /// Extra carry capacity (backpacks)
    pub carry_capacity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub slot: EquipSlot,
    pub durability: u32,
    pub max_durability: u32,
    pub bonuses: ItemBonuses,
    pub broken: bool,
}

impl Item {
    pub fn new(
        name: impl Into<String>,
        slot: EquipSlot,
        durability: u32,
        bonuses: ItemBonuses,
    ) -> Self {
        Self {
            name: name.into(),
            slot,
            durability,
            max_durability: durability,
            bonuses,
            broken: false,
        }
    }

    /// Wear the item by one use; backpacks never wear
    ///
    /// Returns false once the item is broken and unusable.
    pub fn wear(&mut self) -> bool {
        if self.slot == EquipSlot::Backpack {
            return true;
        }
        self.durability = self.durability.saturating_sub(1);
        if self.durability == 0 {
            self.broken = true;
        }
        !self.broken
    }

    pub fn repair_full(&mut self) {
        self.durability = self.max_durability;
        self.broken = false;
    }
}

/// The four equipment slots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub tool: Option<Item>,
    pub armor: Option<Item>,
    pub backpack: Option<Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equip an item into its slot, replacing whatever was there
    pub fn equip(&mut self, item: Item) {
        match item.slot {
            EquipSlot::Weapon => self.weapon = Some(item),
            EquipSlot::Tool => self.tool = Some(item),
            EquipSlot::Armor => self.armor = Some(item),
            EquipSlot::Backpack => self.backpack = Some(item),
        }
    }

    pub fn carry_bonus(&self) -> u32 {
        self.backpack
            .as_ref()
            .map_or(0, |item| item.bonuses.carry_capacity)
    }

    pub fn weapon_damage(&self) -> f32 {
        self.weapon
            .as_ref()
            .filter(|item| !item.broken)
            .map_or(0.0, |item| item.bonuses.damage)
    }

    pub fn defense(&self) -> f32 {
        self.armor
            .as_ref()
            .filter(|item| !item.broken)
            .map_or(0.0, |item| item.bonuses.defense)
    }

    /// Warmth points of intact armor; dampens exposure at night
    pub fn warmth_bonus(&self) -> f32 {
        self.armor
            .as_ref()
            .filter(|item| !item.broken)
            .map_or(0.0, |item| item.bonuses.warmth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axe() -> Item {
        Item::new(
            "Stone Axe",
            EquipSlot::Tool,
            2,
            ItemBonuses {
                harvest_speed: 1.5,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_tool_wears_out() {
        let mut tool = axe();
        assert!(tool.wear());
        assert!(!tool.wear());
        assert!(tool.broken);
        assert_eq!(tool.durability, 0);
    }

    #[test]
    fn test_backpack_never_wears() {
        let mut pack = Item::new(
            "Basic Backpack",
            EquipSlot::Backpack,
            1,
            ItemBonuses {
                carry_capacity: 5,
                ..Default::default()
            },
        );
        for _ in 0..100 {
            assert!(pack.wear());
        }
        assert!(!pack.broken);
    }

    #[test]
    fn test_repair_restores_durability() {
        let mut tool = axe();
        tool.wear();
        tool.wear();
        assert!(tool.broken);
        tool.repair_full();
        assert!(!tool.broken);
        assert_eq!(tool.durability, tool.max_durability);
    }

    #[test]
    fn test_equip_replaces_slot() {
        let mut equipment = Equipment::new();
        equipment.equip(axe());
        assert_eq!(
            equipment.tool.as_ref().map(|t| t.name.as_str()),
            Some("Stone Axe")
        );

        let better = Item::new(
            "Iron Axe",
            EquipSlot::Tool,
            100,
            ItemBonuses {
                harvest_speed: 2.0,
                ..Default::default()
            },
        );
        equipment.equip(better);
        assert_eq!(
            equipment.tool.as_ref().map(|t| t.name.as_str()),
            Some("Iron Axe")
        );
    }

    #[test]
    fn test_broken_armor_gives_no_defense() {
        let mut equipment = Equipment::new();
        let mut clothes = Item::new(
            "Fiber Clothes",
            EquipSlot::Armor,
            1,
            ItemBonuses {
                defense: 2.0,
                warmth: 10.0,
                ..Default::default()
            },
        );
        clothes.wear();
        equipment.equip(clothes);
        assert_eq!(equipment.defense(), 0.0);
    }
}
