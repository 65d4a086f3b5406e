//! Enemy movement: velocity eases toward the steering intent every frame and
//! the hull yaws toward its direction of travel.

use starlance_core::components::{EnemyTag, SteeringIntent, Transform, Velocity};
use starlance_core::types::{exp_decay, EntityId};

use crate::ecs::ComponentKind;
use crate::scheduler::{System, SystemContext};

/// Below this squared speed the heading is left alone.
const MIN_HEADING_SPEED_SQ: f64 = 0.01;

#[derive(Default)]
pub struct EnemyMovementSystem {
    enemies: Vec<EntityId>,
}

impl EnemyMovementSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for EnemyMovementSystem {
    fn name(&self) -> &'static str {
        "enemy_movement"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, dt: f64) {
        let tuning = &ctx.tuning.ai;
        let alpha = exp_decay(tuning.move_damping, dt);
        let turn = (tuning.turn_rate * dt).min(1.0);

        ctx.world.query(
            &[
                ComponentKind::of::<EnemyTag>(),
                ComponentKind::of::<Transform>(),
                ComponentKind::of::<Velocity>(),
                ComponentKind::of::<SteeringIntent>(),
            ],
            &mut self.enemies,
        );

        for &id in &self.enemies {
            let Some(intent) = ctx.world.get::<SteeringIntent>(id).copied() else {
                continue;
            };
            let Some(velocity) = ctx.world.get_mut::<Velocity>(id) else {
                continue;
            };
            velocity.linear = velocity.linear.lerp(intent.desired_velocity, alpha);
            let linear = velocity.linear;

            let Some(transform) = ctx.world.get_mut::<Transform>(id) else {
                continue;
            };
            transform.position += linear * dt;
            if linear.length_squared() > MIN_HEADING_SPEED_SQ {
                let heading = linear.normalize();
                let yaw = (-heading.x).atan2(-heading.z);
                transform.rotation.y += (yaw - transform.rotation.y) * turn;
            }
        }
    }
}
