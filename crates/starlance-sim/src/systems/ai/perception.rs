//! Perception system: samples player visibility into each enemy's blackboard.

use starlance_ai::perception::{fov_cos, perceive};
use starlance_core::components::{AiState, Blackboard, EnemyTag, Transform};
use starlance_core::enums::AiChannel;
use starlance_core::types::EntityId;

use crate::ecs::ComponentKind;
use crate::scheduler::{System, SystemContext};
use crate::world_setup::find_player;

use super::SharedTickScheduler;

/// Perception range multiple of an archetype's preferred range.
pub const PERCEPTION_RANGE_FACTOR: f64 = 3.0;

pub struct PerceptionSystem {
    scheduler: SharedTickScheduler,
    enemies: Vec<EntityId>,
    scratch: Vec<EntityId>,
}

impl PerceptionSystem {
    pub fn new(scheduler: SharedTickScheduler) -> Self {
        Self {
            scheduler,
            enemies: Vec::new(),
            scratch: Vec::new(),
        }
    }
}

impl System for PerceptionSystem {
    fn name(&self) -> &'static str {
        "perception"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, _dt: f64) {
        let tuning = &ctx.tuning.ai;
        let interval = 1.0 / tuning.perception_hz;
        let cos_limit = fov_cos(tuning.fov_degrees);

        let Some(player) = find_player(ctx.world, &mut self.scratch)
            .and_then(|id| ctx.world.get::<Transform>(id).copied())
        else {
            return;
        };

        ctx.world.query(
            &[
                ComponentKind::of::<EnemyTag>(),
                ComponentKind::of::<AiState>(),
                ComponentKind::of::<Blackboard>(),
                ComponentKind::of::<Transform>(),
            ],
            &mut self.enemies,
        );

        let mut scheduler = self.scheduler.borrow_mut();
        for &id in &self.enemies {
            if !scheduler.should_run(id, AiChannel::Perception, ctx.now, interval) {
                continue;
            }
            let (Some(ai), Some(transform)) = (ctx.world.get::<AiState>(id), ctx.world.get::<Transform>(id)) else {
                continue;
            };
            let max_range = ctx
                .content
                .enemy(&ai.archetype_id)
                .map_or(tuning.lod_distance, |a| a.ai.preferred_range * PERCEPTION_RANGE_FACTOR);
            let sample = perceive(transform.position, transform.rotation, player.position, max_range, cos_limit);

            if let Some(blackboard) = ctx.world.get_mut::<Blackboard>(id) {
                blackboard.player_distance = sample.distance;
                blackboard.rel_angle = sample.rel_angle;
                blackboard.player_visible = sample.visible;
                if sample.visible {
                    blackboard.last_seen_time = ctx.now;
                }
            }
        }
    }
}
