//! The closed set of actions the agent can take
//!
//! Every decision resolves to one of these variants; the decision engine
//! and the executor both match exhaustively, so an unknown action cannot
//! silently fall through.

use serde::{Deserialize, Serialize};

use crate::agent::crafting::{RecipeKind, StructureKind};
use crate::world::resource::ResourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    Eat,
    Drink,
    Rest,
    Deposit,
    Craft(RecipeKind),
    Build(StructureKind),
    Explore,
    FindResource(ResourceKind),
    MoveToCamp,
    RepairStructure,
    RepairTool,
}

/// Coarse action grouping used by the daily-profile bias
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionCategory {
    /// Direct need satisfaction: eat, drink, rest
    Survival,
    /// Hauling and homing: deposit, return to camp
    Logistics,
    /// Crafting, building and repairs
    Work,
    /// Resource node harvesting trips
    Gather,
    /// Discovering new tiles
    Exploration,
}

impl Action {
    /// The canonical learnable set, in fixed declaration order
    ///
    /// This ordering is the tie-break for every argmax over Q-values and
    /// the index space for uniform exploration rolls, so it must stay
    /// stable for runs to reproduce.
    pub const LEARNABLE: [Action; 12] = [
        Action::Eat,
        Action::Drink,
        Action::Rest,
        Action::Deposit,
        Action::Craft(RecipeKind::StoneAxe),
        Action::Build(StructureKind::Fire),
        Action::Explore,
        Action::FindResource(ResourceKind::Wood),
        Action::FindResource(ResourceKind::Stone),
        Action::FindResource(ResourceKind::Food),
        Action::FindResource(ResourceKind::Water),
        Action::FindResource(ResourceKind::Fiber),
    ];

    pub fn category(&self) -> ActionCategory {
        match self {
            Action::Eat | Action::Drink | Action::Rest => ActionCategory::Survival,
            Action::Deposit | Action::MoveToCamp => ActionCategory::Logistics,
            Action::Craft(_)
            | Action::Build(_)
            | Action::RepairStructure
            | Action::RepairTool => ActionCategory::Work,
            Action::FindResource(_) => ActionCategory::Gather,
            Action::Explore => ActionCategory::Exploration,
        }
    }

    /// True for actions whose execution is a movement step when the agent
    /// is not yet at the destination
    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            Action::FindResource(_) | Action::MoveToCamp | Action::Explore
        )
    }

    /// Stable label for logs and the knowledge store
    pub fn label(&self) -> String {
        match self {
            Action::Eat => "eat".into(),
            Action::Drink => "drink".into(),
            Action::Rest => "rest".into(),
            Action::Deposit => "deposit".into(),
            Action::Craft(recipe) => format!("craft_{}", recipe.name().to_lowercase().replace(' ', "_")),
            Action::Build(kind) => format!("build_{}", kind.name().to_lowercase()),
            Action::Explore => "explore".into(),
            Action::FindResource(kind) => format!("find_resource_{}", kind.as_str()),
            Action::MoveToCamp => "move_to_camp".into(),
            Action::RepairStructure => "repair_structure".into(),
            Action::RepairTool => "repair_tool".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learnable_set_has_no_duplicates() {
        for (i, a) in Action::LEARNABLE.iter().enumerate() {
            for b in &Action::LEARNABLE[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_categories() {
        assert_eq!(Action::Eat.category(), ActionCategory::Survival);
        assert_eq!(Action::MoveToCamp.category(), ActionCategory::Logistics);
        assert_eq!(
            Action::Build(StructureKind::Fire).category(),
            ActionCategory::Work
        );
        assert_eq!(
            Action::FindResource(ResourceKind::Wood).category(),
            ActionCategory::Gather
        );
        assert_eq!(Action::Explore.category(), ActionCategory::Exploration);
    }

    #[test]
    fn test_labels_distinguish_payloads() {
        assert_eq!(
            Action::FindResource(ResourceKind::Wood).label(),
            "find_resource_wood"
        );
        assert_eq!(
            Action::FindResource(ResourceKind::Water).label(),
            "find_resource_water"
        );
        assert_eq!(Action::Craft(RecipeKind::StoneAxe).label(), "craft_stone_axe");
    }

    #[test]
    fn test_movement_classification() {
        assert!(Action::MoveToCamp.is_movement());
        assert!(Action::Explore.is_movement());
        assert!(Action::FindResource(ResourceKind::Food).is_movement());
        assert!(!Action::Eat.is_movement());
        assert!(!Action::Build(StructureKind::Wall).is_movement());
    }
}
