//! Steering system: converts each enemy's action into a desired velocity.
//! Steering is the last AI channel of the frame, so it also prunes the tick
//! scheduler.

use glam::DVec3;
use starlance_ai::steering::{compute, SteeringContext};
use starlance_core::components::{AiState, Blackboard, EnemyTag, SteeringIntent, Transform};
use starlance_core::enums::AiChannel;
use starlance_core::types::EntityId;

use crate::ecs::ComponentKind;
use crate::scheduler::{System, SystemContext};
use crate::world_setup::find_player;

use super::SharedTickScheduler;

pub struct SteeringSystem {
    scheduler: SharedTickScheduler,
    enemies: Vec<EntityId>,
    scratch: Vec<EntityId>,
}

impl SteeringSystem {
    pub fn new(scheduler: SharedTickScheduler) -> Self {
        Self {
            scheduler,
            enemies: Vec::new(),
            scratch: Vec::new(),
        }
    }

    fn steer(&mut self, ctx: &mut SystemContext<'_>, player: DVec3) {
        let tuning = &ctx.tuning.ai;
        let interval = 1.0 / tuning.steering_hz;
        ctx.world.query(
            &[
                ComponentKind::of::<EnemyTag>(),
                ComponentKind::of::<AiState>(),
                ComponentKind::of::<Blackboard>(),
                ComponentKind::of::<SteeringIntent>(),
                ComponentKind::of::<Transform>(),
            ],
            &mut self.enemies,
        );

        let mut scheduler = self.scheduler.borrow_mut();
        for &id in &self.enemies {
            if !scheduler.should_run(id, AiChannel::Steering, ctx.now, interval) {
                continue;
            }
            let (Some(ai), Some(transform)) = (ctx.world.get::<AiState>(id), ctx.world.get::<Transform>(id)) else {
                continue;
            };
            let Some(archetype) = ctx.content.enemy(&ai.archetype_id) else {
                continue;
            };

            let output = compute(&SteeringContext {
                action: ai.current_action,
                position: transform.position,
                player_position: player,
                preferred_range: archetype.ai.preferred_range,
                orbit_strength: archetype.ai.orbit_strength,
                orbit_radial_factor: tuning.orbit_radial_factor,
                speed: archetype.stats.speed,
                rng_state: ai.rng_state,
            });

            if let Some(ai) = ctx.world.get_mut::<AiState>(id) {
                ai.rng_state = output.rng_state;
            }
            if let Some(intent) = ctx.world.get_mut::<SteeringIntent>(id) {
                intent.desired_velocity = output.desired_velocity;
            }
        }
    }
}

impl System for SteeringSystem {
    fn name(&self) -> &'static str {
        "steering"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, _dt: f64) {
        let player = find_player(ctx.world, &mut self.scratch)
            .and_then(|id| ctx.world.get::<Transform>(id).map(|t| t.position));
        if let Some(player) = player {
            self.steer(ctx, player);
        }
        self.scheduler.borrow_mut().prune(|id| ctx.world.is_alive(id));
    }
}
