//! Ordered system execution and the per-frame event view.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use starlance_core::content::ContentDb;
use starlance_core::events::GameEvent;
use starlance_core::tuning::Tuning;
use starlance_core::types::SimTime;

use crate::bridge::RenderBridge;
use crate::ecs::World;
use crate::event_bus::EventBus;

/// When events published by one system become readable by others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventVisibility {
    /// Each system sees everything published earlier in the same frame.
    /// The bus is cleared once the last system has run.
    #[default]
    SameFrame,
    /// Every system sees exactly the events published during the previous
    /// frame.
    NextFrame,
}

/// Borrowed simulation state for one frame.
pub struct GameContext<'a> {
    pub world: &'a mut World,
    pub bus: &'a mut EventBus,
    pub tuning: &'a Tuning,
    pub content: &'a ContentDb,
    pub renderer: &'a mut dyn RenderBridge,
    pub rng: &'a mut ChaCha8Rng,
    pub time: SimTime,
}

/// What a system sees while it runs.
pub struct SystemContext<'a> {
    pub world: &'a mut World,
    pub bus: &'a mut EventBus,
    /// Readable events, per the scheduler's [`EventVisibility`].
    pub events: &'a [GameEvent],
    pub tuning: &'a Tuning,
    pub content: &'a ContentDb,
    pub renderer: &'a mut dyn RenderBridge,
    pub rng: &'a mut ChaCha8Rng,
    /// Simulation clock in seconds, including this frame's delta.
    pub now: f64,
    pub frame: u64,
}

impl SystemContext<'_> {
    pub fn publish(&mut self, event: GameEvent) {
        self.bus.publish(event);
    }
}

pub trait System {
    fn name(&self) -> &'static str;

    fn init(&mut self, _ctx: &mut SystemContext<'_>) {}

    fn update(&mut self, ctx: &mut SystemContext<'_>, dt: f64);
}

/// Runs systems in registration order.
pub struct SystemScheduler {
    systems: Vec<Box<dyn System>>,
    visibility: EventVisibility,
    view: Vec<GameEvent>,
}

impl SystemScheduler {
    pub fn new(systems: Vec<Box<dyn System>>, visibility: EventVisibility) -> Self {
        Self {
            systems,
            visibility,
            view: Vec::new(),
        }
    }

    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    pub fn visibility(&self) -> EventVisibility {
        self.visibility
    }

    pub fn init(&mut self, game: &mut GameContext<'_>) {
        self.view.clear();
        for system in &mut self.systems {
            let mut ctx = system_context(game, &self.view);
            system.init(&mut ctx);
        }
    }

    pub fn update(&mut self, game: &mut GameContext<'_>, dt: f64) {
        if self.visibility == EventVisibility::NextFrame {
            game.bus.drain_into(&mut self.view);
        }

        for system in &mut self.systems {
            if self.visibility == EventVisibility::SameFrame {
                self.view.clear();
                self.view.extend_from_slice(game.bus.peek());
            }
            log::trace!("run {} with {} visible events", system.name(), self.view.len());
            let mut ctx = system_context(game, &self.view);
            system.update(&mut ctx, dt);
        }

        if self.visibility == EventVisibility::SameFrame {
            game.bus.clear();
        }
    }
}

fn system_context<'a>(game: &'a mut GameContext<'_>, events: &'a [GameEvent]) -> SystemContext<'a> {
    SystemContext {
        world: &mut *game.world,
        bus: &mut *game.bus,
        events,
        tuning: game.tuning,
        content: game.content,
        renderer: &mut *game.renderer,
        rng: &mut *game.rng,
        now: game.time.elapsed_secs,
        frame: game.time.frame,
    }
}
