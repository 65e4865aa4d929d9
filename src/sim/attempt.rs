//! One attempt: world + agent + policy wired into a tick loop
//!
//! The host loop owns pacing and calls `tick(delta_seconds)`. Each tick
//! advances hostiles and the agent state machine; when the action
//! cooldown has elapsed, one decide/execute/reward/update cycle runs.
//! The attempt ends on death or at the day cap, and its outcome is
//! merged into shared knowledge by the runner.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::actions::catalog::Action;
use crate::actions::execute::execute;
use crate::agent::crafting::{RecipeKind, StructureKind};
use crate::agent::state::AgentState;
use crate::core::config::config;
use crate::core::types::{Day, DeathCause, GridPos};
use crate::knowledge::memory::{DeathContext, Knowledge};
use crate::policy::decision::DecisionEngine;
use crate::policy::qlearning::QState;
use crate::world::hostiles::{Hostile, HostileAction};
use crate::world::map::WorldMap;
use crate::world::resource::ResourceKind;

/// Wolves roaming the map at attempt start
const HOSTILE_COUNT: usize = 2;

/// What one attempt produced, for knowledge merging and reporting
#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    pub seed: u64,
    pub days_survived: Day,
    pub death_cause: Option<DeathCause>,
    pub death_context: Option<DeathContext>,
    /// Reached the day cap alive
    pub completed: bool,
    pub final_level: u32,
    pub states_learned: usize,
    pub action_records: Vec<(Day, String, bool)>,
}

pub struct Attempt {
    pub world: WorldMap,
    pub agent: AgentState,
    pub engine: DecisionEngine,
    pub hostiles: Vec<Hostile>,
    knowledge: Knowledge,
    rng: ChaCha8Rng,
    seed: u64,
    action_cooldown: f32,
    events: Vec<String>,
    action_records: Vec<(Day, String, bool)>,
}

impl Attempt {
    /// Start an attempt from a seed and a snapshot of shared knowledge
    pub fn new(seed: u64, knowledge: Knowledge) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let world = WorldMap::generate(&mut rng);
        let agent = AgentState::new(&world);
        let hostiles = spawn_hostiles(&world, &mut rng);

        tracing::info!(
            seed,
            attempt = knowledge.attempts + 1,
            best = knowledge.best_survival_days,
            risk_tolerance = knowledge.risk_tolerance,
            "attempt started"
        );

        Self {
            world,
            agent,
            engine: DecisionEngine::new(),
            hostiles,
            knowledge,
            rng,
            seed,
            action_cooldown: 0.0,
            events: Vec::new(),
            action_records: Vec::new(),
        }
    }

    /// The attempt is finished: dead, or alive at the day cap
    pub fn is_over(&self) -> bool {
        !self.agent.alive || self.agent.day >= config().max_days
    }

    /// The discretized state the policy currently sees, for display
    pub fn current_qstate(&self) -> QState {
        QState::discretize(&self.agent, &self.world)
    }

    /// Human-readable events accumulated since the last drain
    pub fn take_events(&mut self) -> Vec<String> {
        let mut events = std::mem::take(&mut self.events);
        events.extend(self.agent.take_events());
        events
    }

    /// Advance the simulation by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if self.is_over() {
            return;
        }
        let cfg = config();

        self.update_hostiles(dt);
        self.agent
            .advance(dt, &mut self.world, &self.knowledge, &mut self.rng);
        self.events.extend(self.agent.take_events());

        self.action_cooldown -= dt;
        if self.action_cooldown <= 0.0
            && self.agent.alive
            && self.agent.needs.stamina > cfg.min_move_stamina
        {
            self.decision_cycle();
        }
    }

    /// One decide -> execute -> reward -> learn cycle
    fn decision_cycle(&mut self) {
        let cfg = config();
        let state = QState::discretize(&self.agent, &self.world);

        let action = self
            .engine
            .decide(&self.agent, &self.world, &self.knowledge, &mut self.rng);
        let outcome = execute(
            action,
            &mut self.agent,
            &mut self.world,
            &self.knowledge,
            &mut self.rng,
        );

        let mut reward = if outcome.success {
            base_reward(action)
        } else {
            cfg.failure_reward
        };
        if let Some((kind, _)) = outcome.harvested {
            reward += gather_reward(kind) * self.knowledge.priority_weight(kind);
        }

        let next_state = QState::discretize(&self.agent, &self.world);
        self.engine.policy.update(state, action, reward, next_state);

        self.action_records
            .push((self.agent.day, action.label(), outcome.success));

        // Movement progress messages would flood the log; keep arrivals
        // and terminal effects.
        if outcome.success && (!action.is_movement() || outcome.harvested.is_some()) {
            self.events.push(outcome.message);
        }

        self.action_cooldown = outcome.next_delay.max(cfg.min_action_delay);
    }

    /// Hostile chases, attacks and the agent's reflexive counterattack
    fn update_hostiles(&mut self, dt: f32) {
        let wall_cells = self.agent.camp.wall_cells(self.world.camp_origin());

        for hostile in &mut self.hostiles {
            let Some(action) = hostile.update(dt, self.agent.pos, &wall_cells, &self.world) else {
                continue;
            };
            if let HostileAction::Attacked(damage) = action {
                let net = (damage - self.agent.equipment.defense()).max(1.0);
                self.agent.needs.change_hp(-net);
                self.events.push(format!("A wolf attacks! Lost {net:.0} hp"));

                // Fighting back is reflexive, not a learned action
                let retaliation = self.agent.stats.strength as f32
                    + self.agent.equipment.weapon_damage()
                    + self
                        .agent
                        .development_path
                        .map_or(0.0, |path| path.damage_bonus());
                hostile.hp = (hostile.hp - retaliation).max(0.0);
                if !hostile.alive() {
                    self.events.push("The wolf is slain".to_string());
                }
            }
        }
    }

    /// Finish the attempt and summarize it for knowledge merging
    pub fn into_outcome(mut self) -> AttemptOutcome {
        let agent = &self.agent;
        let death_context = agent.death_cause.map(|cause| DeathContext {
            day: agent.day,
            cause,
            food_held: agent.inventory.count(ResourceKind::Food),
            water_held: agent.inventory.count(ResourceKind::Water),
            stored_food: agent.camp.stored(ResourceKind::Food),
            stored_water: agent.camp.stored(ResourceKind::Water),
            structures_built: agent.camp.structures.len(),
            tiles_discovered: agent.discovered_tiles.len(),
            storage_total: agent.camp.storage_total(),
            caution_score: agent.caution_score,
            died_outside_at_night: agent.is_night && !agent.in_camp,
        });

        AttemptOutcome {
            seed: self.seed,
            days_survived: agent.day,
            death_cause: agent.death_cause,
            death_context,
            completed: agent.alive && agent.day >= config().max_days,
            final_level: agent.level,
            states_learned: self.engine.policy.states_learned(),
            action_records: std::mem::take(&mut self.action_records),
        }
    }
}

/// Minimum spawn distance between a wolf and the camp center
const HOSTILE_SPAWN_DISTANCE: i32 = 8;

/// Wolves start scattered well away from the camp square
fn spawn_hostiles(world: &WorldMap, rng: &mut ChaCha8Rng) -> Vec<Hostile> {
    let mut hostiles = Vec::with_capacity(HOSTILE_COUNT);
    let mut attempts = 0;
    while hostiles.len() < HOSTILE_COUNT && attempts < 100 {
        attempts += 1;
        let pos = GridPos::new(
            rng.gen_range(0..world.width),
            rng.gen_range(0..world.height),
        );
        if pos.distance(&world.camp_center) >= HOSTILE_SPAWN_DISTANCE {
            hostiles.push(Hostile::wolf(pos));
        }
    }
    hostiles
}

/// Per-action reward for a successful execution
///
/// Construction pays best, crafting next; the routine actions rely on
/// gather bonuses and failure penalties for their learning signal.
fn base_reward(action: Action) -> f32 {
    match action {
        Action::Build(StructureKind::Shelter) => 15.0,
        Action::Build(StructureKind::Fire) => 18.0,
        Action::Build(StructureKind::Workbench) => 20.0,
        Action::Build(StructureKind::Storage) => 22.0,
        Action::Build(StructureKind::Wall) => 25.0,
        Action::Craft(RecipeKind::StoneAxe) => 12.0,
        Action::Craft(RecipeKind::IronAxe) => 18.0,
        Action::Craft(_) => 10.0,
        Action::Deposit => 5.0,
        _ => 0.0,
    }
}

/// Reward per harvest, scaled by the knowledge priority weight
fn gather_reward(kind: ResourceKind) -> f32 {
    match kind {
        ResourceKind::Food | ResourceKind::Water => 5.0,
        ResourceKind::Metal => 4.0,
        ResourceKind::Wood | ResourceKind::Stone | ResourceKind::Fiber => 3.0,
    }
}
