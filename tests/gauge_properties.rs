//! Property tests for the range invariants that must survive anything

use proptest::prelude::*;

use emberward::agent::needs::Needs;
use emberward::agent::state::AgentState;
use emberward::knowledge::memory::Knowledge;
use emberward::world::map::WorldMap;
use emberward::world::resource::{ResourceKind, ResourceNode};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

proptest! {
    /// Arbitrary mutation sequences can never push a gauge out of range
    #[test]
    fn needs_stay_bounded(deltas in prop::collection::vec((-200.0f32..200.0, 0u8..5), 1..200)) {
        let mut needs = Needs::new(100.0, 125.0);
        for (delta, which) in deltas {
            match which {
                0 => needs.change_hp(delta),
                1 => needs.change_hunger(delta),
                2 => needs.change_thirst(delta),
                3 => needs.change_warmth(delta),
                _ => needs.change_stamina(delta),
            }
            prop_assert!(needs.hp >= 0.0 && needs.hp <= needs.max_hp);
            prop_assert!(needs.hunger >= 0.0 && needs.hunger <= 100.0);
            prop_assert!(needs.thirst >= 0.0 && needs.thirst <= 100.0);
            prop_assert!(needs.warmth >= 0.0 && needs.warmth <= 100.0);
            prop_assert!(needs.stamina >= 0.0 && needs.stamina <= needs.max_stamina);
        }
    }

    /// The harvest contract: never negative, never more than stock, and
    /// exhaustion flips the depleted flag
    #[test]
    fn harvest_respects_stock(stock in 0u32..200, requests in prop::collection::vec(0u32..50, 1..30)) {
        let mut node = ResourceNode::new(
            ResourceKind::Wood,
            emberward::core::types::GridPos::new(0, 0),
            stock,
            3,
        );
        let mut remaining = stock;
        for request in requests {
            let before = node.current_amount;
            let actual = node.harvest(request);
            prop_assert!(actual <= request);
            prop_assert!(actual <= before);
            remaining -= actual;
            prop_assert_eq!(node.current_amount, remaining);
        }
        if node.current_amount == 0 {
            prop_assert!(node.depleted);
        }
    }

    /// Ticking a live attempt with arbitrary (sane) deltas keeps every
    /// gauge inside its range
    #[test]
    fn advancing_agent_keeps_gauges_bounded(
        seed in 0u64..5000,
        deltas in prop::collection::vec(0.01f32..2.0, 1..150),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut world = WorldMap::generate(&mut rng);
        let mut agent = AgentState::new(&world);
        let knowledge = Knowledge::default();

        for delta in deltas {
            agent.advance(delta, &mut world, &knowledge, &mut rng);
            let needs = &agent.needs;
            prop_assert!(needs.hp >= 0.0 && needs.hp <= needs.max_hp);
            prop_assert!(needs.hunger >= 0.0 && needs.hunger <= 100.0);
            prop_assert!(needs.thirst >= 0.0 && needs.thirst <= 100.0);
            prop_assert!(needs.warmth >= 0.0 && needs.warmth <= 100.0);
            prop_assert!(needs.stamina >= 0.0 && needs.stamina <= needs.max_stamina);
        }
    }
}
