//! Simulation engine: the frame driver.
//!
//! `Simulation` owns the world, event bus, RNG and system scheduler,
//! processes queued commands at the start of each frame, then runs every
//! system once over the clamped frame delta. Completely headless, so runs
//! are deterministic for a given seed and input sequence.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use starlance_core::components::{AutoTrace, InputState, StageRunState, Targeting};
use starlance_core::content::ContentDb;
use starlance_core::events::GameEvent;
use starlance_core::tuning::Tuning;
use starlance_core::types::{EntityId, SimTime};

use crate::bridge::RenderBridge;
use crate::ecs::{EcsError, World};
use crate::event_bus::EventBus;
use crate::scheduler::{EventVisibility, GameContext, System, SystemScheduler};
use crate::systems::ai::decision::DecisionSystem;
use crate::systems::ai::enemy_movement::EnemyMovementSystem;
use crate::systems::ai::perception::PerceptionSystem;
use crate::systems::ai::steering::SteeringSystem;
use crate::systems::ai::{shared_tick_scheduler, SharedTickScheduler};
use crate::systems::auto_trace::AutoTraceSystem;
use crate::systems::damage::DamageSystem;
use crate::systems::flight::FlightSystem;
use crate::systems::hit_marker::HitMarkerSystem;
use crate::systems::objective::ObjectiveSystem;
use crate::systems::stage::StageSystem;
use crate::systems::targeting::TargetingSystem;
use crate::systems::weapon::WeaponSystem;
use crate::world_setup::{self, SessionEntities};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Upper bound on a single frame delta (seconds).
    pub max_frame_dt: f64,
    pub event_visibility: EventVisibility,
    /// Stage to run first.
    pub stage_id: String,
    /// Content id of the player's primary weapon.
    pub player_weapon_id: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_frame_dt: 0.05,
            event_visibility: EventVisibility::default(),
            stage_id: "stage_1".to_string(),
            player_weapon_id: "laser_mk1".to_string(),
        }
    }
}

impl SimConfig {
    /// Parse a partial config; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Operator commands applied at the next frame boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimCommand {
    /// Despawn the stage's enemies and start it again.
    RestartStage,
    /// Switch to another stage, restarting.
    SelectStage { stage_id: String },
    /// Debug: remove one live enemy as if killed.
    KillOneEnemy,
    /// Steer toward the current lock target until on target.
    EngageAutoTrace,
}

/// The default system order.
pub fn default_systems(ai: &SharedTickScheduler) -> Vec<Box<dyn System>> {
    vec![
        Box::new(AutoTraceSystem::new()),
        Box::new(FlightSystem::new()),
        Box::new(StageSystem::new()),
        Box::new(ObjectiveSystem::new()),
        Box::new(PerceptionSystem::new(ai.clone())),
        Box::new(DecisionSystem::new(ai.clone())),
        Box::new(SteeringSystem::new(ai.clone())),
        Box::new(EnemyMovementSystem::new()),
        Box::new(TargetingSystem::new()),
        Box::new(WeaponSystem::new()),
        Box::new(DamageSystem::new()),
        Box::new(HitMarkerSystem::new()),
    ]
}

/// The simulation. Owns the world and all sim state.
pub struct Simulation<B: RenderBridge> {
    config: SimConfig,
    tuning: Tuning,
    content: ContentDb,
    renderer: B,
    world: World,
    bus: EventBus,
    rng: ChaCha8Rng,
    time: SimTime,
    scheduler: SystemScheduler,
    ai_ticks: SharedTickScheduler,
    command_queue: VecDeque<SimCommand>,
    entities: SessionEntities,
}

impl<B: RenderBridge> Simulation<B> {
    /// Create a simulation with the player and session entities in place.
    /// Call [`Simulation::init`] before the first update.
    pub fn new(config: SimConfig, tuning: Tuning, content: ContentDb, renderer: B) -> Result<Self, EcsError> {
        let ai_ticks = shared_tick_scheduler();
        let systems = default_systems(&ai_ticks);
        Self::with_systems(config, tuning, content, renderer, ai_ticks, systems)
    }

    /// Create a simulation running a custom system list.
    pub fn with_systems(
        config: SimConfig,
        tuning: Tuning,
        content: ContentDb,
        renderer: B,
        ai_ticks: SharedTickScheduler,
        systems: Vec<Box<dyn System>>,
    ) -> Result<Self, EcsError> {
        let mut world = World::new();
        let entities = world_setup::setup_session(&mut world, &tuning, &config.stage_id, &config.player_weapon_id)?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            scheduler: SystemScheduler::new(systems, config.event_visibility),
            config,
            tuning,
            content,
            renderer,
            world,
            bus: EventBus::new(),
            time: SimTime::default(),
            ai_ticks,
            command_queue: VecDeque::new(),
            entities,
        })
    }

    /// Run every system's one-time setup.
    pub fn init(&mut self) {
        let mut game = GameContext {
            world: &mut self.world,
            bus: &mut self.bus,
            tuning: &self.tuning,
            content: &self.content,
            renderer: &mut self.renderer,
            rng: &mut self.rng,
            time: self.time,
        };
        self.scheduler.init(&mut game);
        log::info!(
            "simulation ready: seed {}, systems {:?}",
            self.config.seed,
            self.scheduler.system_names()
        );
    }

    /// Advance one frame. `dt` is clamped to `[0, max_frame_dt]`.
    pub fn update(&mut self, dt: f64) {
        let dt = dt.clamp(0.0, self.config.max_frame_dt);
        self.process_commands();
        self.time.advance(dt);

        let mut game = GameContext {
            world: &mut self.world,
            bus: &mut self.bus,
            tuning: &self.tuning,
            content: &self.content,
            renderer: &mut self.renderer,
            rng: &mut self.rng,
            time: self.time,
        };
        self.scheduler.update(&mut game, dt);
    }

    /// Queue a command for processing at the next frame boundary.
    pub fn queue_command(&mut self, command: SimCommand) {
        self.command_queue.push_back(command);
    }

    /// Replace the input state read by this and following frames.
    pub fn set_input(&mut self, input: InputState) {
        if let Some(stored) = self.world.get_mut::<InputState>(self.entities.session) {
            *stored = input;
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn renderer(&self) -> &B {
        &self.renderer
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn player(&self) -> EntityId {
        self.entities.player
    }

    pub fn session(&self) -> EntityId {
        self.entities.session
    }

    pub fn stage_state(&self) -> Option<&StageRunState> {
        self.world.get::<StageRunState>(self.entities.session)
    }

    /// Events waiting on the bus. Under `SameFrame` visibility this is empty
    /// between frames; under `NextFrame` it holds the last frame's output.
    pub fn pending_events(&self) -> &[GameEvent] {
        self.bus.peek()
    }

    /// Number of entities tracked by the AI tick scheduler.
    pub fn ai_tracked_entities(&self) -> usize {
        self.ai_ticks.borrow().len()
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: SimCommand) {
        log::debug!("command {command:?}");
        match command {
            SimCommand::RestartStage => {
                if let Some(state) = self.world.get_mut::<StageRunState>(self.entities.session) {
                    state.restart_requested = true;
                }
            }
            SimCommand::SelectStage { stage_id } => {
                if let Some(state) = self.world.get_mut::<StageRunState>(self.entities.session) {
                    state.stage_id = stage_id;
                    state.restart_requested = true;
                }
            }
            SimCommand::KillOneEnemy => {
                if let Some(state) = self.world.get_mut::<StageRunState>(self.entities.session) {
                    state.kill_requested = true;
                }
            }
            SimCommand::EngageAutoTrace => {
                let player = self.entities.player;
                let target = self
                    .world
                    .get::<Targeting>(player)
                    .and_then(|t| t.current_target)
                    .filter(|id| self.world.is_alive(*id));
                if let (Some(target), Some(trace)) = (target, self.world.get_mut::<AutoTrace>(player)) {
                    trace.enabled = true;
                    trace.target = Some(target);
                }
            }
        }
    }
}
