//! Action execution
//!
//! Applies one action's effects to the agent and world and reports a
//! structured outcome. Failures are always local: a refused action
//! changes nothing (a failed craft keeps its materials) and simply comes
//! back with a reason and a short retry delay. Movement-class actions
//! either advance toward the destination or, once there, perform the
//! terminal effect in the same call.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::actions::catalog::Action;
use crate::agent::state::AgentState;
use crate::core::config::config;
use crate::knowledge::memory::Knowledge;
use crate::world::map::WorldMap;
use crate::world::resource::ResourceKind;

/// Result of one executed action
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
    /// Seconds until the next decision tick
    pub next_delay: f32,
    /// Set when a harvest landed resources in the inventory
    pub harvested: Option<(ResourceKind, u32)>,
}

impl ActionOutcome {
    fn ok(message: impl Into<String>, next_delay: f32) -> Self {
        Self {
            success: true,
            message: message.into(),
            next_delay,
            harvested: None,
        }
    }

    fn fail(message: impl Into<String>, next_delay: f32) -> Self {
        Self {
            success: false,
            message: message.into(),
            next_delay,
            harvested: None,
        }
    }
}

/// Execute an action against the agent/world pair
pub fn execute(
    action: Action,
    agent: &mut AgentState,
    world: &mut WorldMap,
    knowledge: &Knowledge,
    rng: &mut ChaCha8Rng,
) -> ActionOutcome {
    agent.record_action(action);

    let outcome = match action {
        Action::Eat => eat(agent),
        Action::Drink => drink(agent),
        Action::Rest => rest(agent),
        Action::Deposit => deposit(agent),
        Action::Craft(recipe) => craft(agent, recipe, knowledge, rng),
        Action::Build(kind) => build(agent, kind, knowledge, rng),
        Action::Explore => explore(agent, world, rng),
        Action::FindResource(kind) => find_resource(agent, world, kind, knowledge, rng),
        Action::MoveToCamp => move_to_camp(agent, world),
        Action::RepairStructure => repair_structure(agent),
        Action::RepairTool => repair_tool(agent),
    };

    tracing::debug!(
        action = %action.label(),
        success = outcome.success,
        message = %outcome.message,
        "executed"
    );
    outcome
}

fn eat(agent: &mut AgentState) -> ActionOutcome {
    let duration = (0.5 - agent.stats.dexterity as f32 * 0.01).max(0.3);
    if agent.inventory.remove(ResourceKind::Food, 1) == 0 {
        return ActionOutcome::fail("No food to eat", duration);
    }
    agent.needs.change_hunger(35.0);
    ActionOutcome::ok("Ate a meal", duration)
}

fn drink(agent: &mut AgentState) -> ActionOutcome {
    let duration = (0.5 - agent.stats.dexterity as f32 * 0.01).max(0.3);
    if agent.inventory.remove(ResourceKind::Water, 1) == 0 {
        return ActionOutcome::fail("No water to drink", duration);
    }
    agent.needs.change_thirst(45.0);
    ActionOutcome::ok("Drank water", duration)
}

fn rest(agent: &mut AgentState) -> ActionOutcome {
    if !agent.in_camp {
        return ActionOutcome::fail("Can only rest in camp", 0.5);
    }
    let regen = agent.stats.vitality as f32 * 5.0;
    agent.needs.change_hp(regen);
    agent.needs.change_stamina(regen * 2.0);
    agent.needs.change_warmth(10.0);
    ActionOutcome::ok(format!("Rested (+{regen:.0} hp)"), 0.5)
}

fn deposit(agent: &mut AgentState) -> ActionOutcome {
    let duration = (0.5 - agent.stats.strength as f32 * 0.01).max(0.3);
    if !agent.in_camp {
        return ActionOutcome::fail("Not in camp", duration);
    }
    if agent.inventory.total() == 0 {
        return ActionOutcome::fail("Nothing to deposit", 0.1);
    }

    let mut total = 0;
    for (kind, count) in agent.inventory.drain_all() {
        agent.camp.deposit(kind, count);
        total += count;
    }
    ActionOutcome::ok(format!("Deposited {total} items in storage"), duration)
}

fn craft(
    agent: &mut AgentState,
    recipe: crate::agent::crafting::RecipeKind,
    knowledge: &Knowledge,
    rng: &mut ChaCha8Rng,
) -> ActionOutcome {
    let duration = (2.0 - agent.stats.intelligence as f32 * 0.1).max(0.3);

    if let Err(reason) = recipe.can_craft(agent.level, &agent.stats, &agent.inventory) {
        return ActionOutcome::fail(format!("Cannot craft {}: {}", recipe.name(), reason), duration);
    }

    // Preconditions hold, so consumption cannot fail halfway
    agent.inventory.consume_materials(recipe.requirements());
    agent.equipment.equip(recipe.result());
    let exp = agent.gain_exp(15, Some(Action::Craft(recipe)), knowledge, rng);
    ActionOutcome::ok(format!("Crafted {} (+{exp} exp)", recipe.name()), duration)
}

fn build(
    agent: &mut AgentState,
    kind: crate::agent::crafting::StructureKind,
    knowledge: &Knowledge,
    rng: &mut ChaCha8Rng,
) -> ActionOutcome {
    let duration = (3.0 - agent.stats.strength as f32 * 0.15).max(0.3);

    if !agent.in_camp {
        return ActionOutcome::fail("Must be in camp to build", duration);
    }
    if agent.level < kind.level_req() {
        return ActionOutcome::fail(
            format!("{} requires level {}", kind.name(), kind.level_req()),
            duration,
        );
    }
    if !agent.inventory.has_materials(kind.requirements()) {
        return ActionOutcome::fail(format!("Missing materials for {}", kind.name()), duration);
    }
    let Some(cell) = agent.camp.first_free_cell() else {
        return ActionOutcome::fail("No free space in camp", duration);
    };

    agent.inventory.consume_materials(kind.requirements());
    agent.camp.place(kind, cell);
    let exp = agent.gain_exp(25, Some(Action::Build(kind)), knowledge, rng);
    ActionOutcome::ok(format!("Built {} (+{exp} exp)", kind.name()), duration)
}

fn explore(agent: &mut AgentState, world: &WorldMap, rng: &mut ChaCha8Rng) -> ActionOutcome {
    let target = crate::core::types::GridPos::new(
        (agent.pos.x + rng.gen_range(-1..=1)).clamp(0, world.width - 1),
        (agent.pos.y + rng.gen_range(-1..=1)).clamp(0, world.height - 1),
    );
    if target == agent.pos {
        return ActionOutcome::fail("Wandered in place", 0.1);
    }
    if !agent.start_move(target, world) {
        return ActionOutcome::fail("Too tired to explore", 0.1);
    }
    ActionOutcome::ok("Exploring...", config().move_cooldown_secs)
}

fn find_resource(
    agent: &mut AgentState,
    world: &mut WorldMap,
    kind: ResourceKind,
    knowledge: &Knowledge,
    rng: &mut ChaCha8Rng,
) -> ActionOutcome {
    let Some(node_pos) = world
        .find_closest_resource(agent.pos, kind)
        .map(|node| node.pos)
    else {
        return ActionOutcome::fail(format!("No {} left anywhere", kind.as_str()), 1.0);
    };

    if agent.pos != node_pos {
        if !agent.start_move(node_pos, world) {
            return ActionOutcome::fail("Not enough stamina to travel", 0.1);
        }
        return ActionOutcome::ok(
            format!("Heading for {}", kind.as_str()),
            config().move_cooldown_secs,
        );
    }

    // Standing on the node: harvest is the terminal effect
    let capacity = agent.carry_capacity();
    if agent.inventory.is_full(capacity) {
        return ActionOutcome::fail("Inventory full, deposit first", 0.1);
    }

    let duration = (1.5 * (1.0 - agent.stats.strength as f32 * 0.05)).max(0.3);
    let tool_efficiency = match &agent.equipment.tool {
        Some(tool) if tool.broken => {
            return ActionOutcome::fail(format!("{} is broken", tool.name), duration);
        }
        Some(tool) => tool.bonuses.harvest_speed,
        None => 1.0,
    };

    let gather_bonus = agent.perks.total_effects().gathering_bonus
        + agent
            .development_path
            .map_or(0.0, |path| path.gathering_bonus());
    let predicted =
        ((rng.gen_range(1..=3) as f32 * tool_efficiency * (1.0 + gather_bonus)) as u32).max(1);
    let wanted = predicted.min(agent.inventory.space_left(capacity));
    if wanted == 0 {
        return ActionOutcome::fail("No room to carry more", 0.1);
    }

    let Some(node) = world.node_at_mut(node_pos) else {
        return ActionOutcome::fail(format!("The {} is gone", kind.as_str()), duration);
    };
    let harvested = node.harvest(wanted);
    if harvested == 0 {
        return ActionOutcome::fail(format!("The {} is exhausted", kind.as_str()), duration);
    }

    if let Some(tool) = &mut agent.equipment.tool {
        tool.wear();
    }
    agent.inventory.add(kind, harvested, capacity);
    agent.needs.change_stamina(-5.0);
    let exp = agent.gain_exp(8, Some(Action::FindResource(kind)), knowledge, rng);

    let mut outcome = ActionOutcome::ok(
        format!("Gathered {harvested} {} (+{exp} exp)", kind.as_str()),
        duration,
    );
    outcome.harvested = Some((kind, harvested));
    outcome
}

fn move_to_camp(agent: &mut AgentState, world: &WorldMap) -> ActionOutcome {
    if agent.in_camp {
        return ActionOutcome::fail("Already in camp", 0.1);
    }
    if !agent.start_move(world.camp_center, world) {
        return ActionOutcome::fail("Not enough stamina to travel", 0.1);
    }
    ActionOutcome::ok("Returning to camp...", config().move_cooldown_secs)
}

fn repair_structure(agent: &mut AgentState) -> ActionOutcome {
    const COST: [(ResourceKind, u32); 2] = [(ResourceKind::Wood, 2), (ResourceKind::Stone, 1)];
    const REPAIR_AMOUNT: u32 = 50;

    if !agent.in_camp {
        return ActionOutcome::fail("Not in camp", 1.0);
    }
    if agent.camp.most_damaged_mut().is_none() {
        return ActionOutcome::fail("Nothing needs repair", 1.0);
    }
    if !agent.inventory.consume_materials(&COST) {
        return ActionOutcome::fail("Missing repair materials", 1.0);
    }
    if let Some(structure) = agent.camp.most_damaged_mut() {
        structure.repair(REPAIR_AMOUNT);
        let name = structure.kind.name();
        return ActionOutcome::ok(format!("Repaired {name}"), 2.0);
    }
    ActionOutcome::fail("Nothing needs repair", 1.0)
}

fn repair_tool(agent: &mut AgentState) -> ActionOutcome {
    const COST: [(ResourceKind, u32); 2] = [(ResourceKind::Wood, 1), (ResourceKind::Stone, 1)];

    if !agent.in_camp {
        return ActionOutcome::fail("Not in camp", 1.0);
    }
    if agent.equipment.tool.is_none() {
        return ActionOutcome::fail("No tool to repair", 1.0);
    }
    if !agent.inventory.consume_materials(&COST) {
        return ActionOutcome::fail("Missing repair materials", 1.0);
    }
    if let Some(tool) = &mut agent.equipment.tool {
        tool.repair_full();
        return ActionOutcome::ok(format!("Repaired {}", tool.name), 1.5);
    }
    ActionOutcome::fail("No tool to repair", 1.0)
}
