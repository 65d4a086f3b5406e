//! Auto-trace: turns the player ship toward a designated target.
//!
//! Produces a look contribution on the `AutoTrace` component that the flight
//! system adds to manual look. Disengages once on target, when the target
//! dies, or when manual look exceeds the cancel threshold.

use glam::DVec3;

use starlance_core::components::{AutoTrace, InputState, PlayerTag, Transform};
use starlance_core::types::{clamp, orientation, EntityId};

use crate::ecs::ComponentKind;
use crate::scheduler::{System, SystemContext};
use crate::world_setup::first_with;

/// Yaw and pitch error (radians) of a direction in ship-local space.
/// Positive yaw means the target is to the left, positive pitch above.
pub fn compute_aim_error(local_dir: DVec3) -> (f64, f64) {
    let yaw = (-local_dir.x).atan2(-local_dir.z);
    let pitch = local_dir.y.atan2(-local_dir.z);
    (yaw, pitch)
}

/// Convert aim errors into normalized look input, rate-limited to `max_rate`.
pub fn compute_auto_trace_look(
    yaw_error: f64,
    pitch_error: f64,
    strength: f64,
    max_rate: f64,
    turn_rate_yaw: f64,
    turn_rate_pitch: f64,
) -> (f64, f64) {
    let yaw_rate = clamp(yaw_error * strength, -max_rate, max_rate);
    let pitch_rate = clamp(pitch_error * strength, -max_rate, max_rate);
    let x = if turn_rate_yaw != 0.0 {
        clamp(yaw_rate / turn_rate_yaw, -1.0, 1.0)
    } else {
        0.0
    };
    let y = if turn_rate_pitch != 0.0 {
        clamp(pitch_rate / turn_rate_pitch, -1.0, 1.0)
    } else {
        0.0
    };
    (x, y)
}

#[derive(Default)]
pub struct AutoTraceSystem {
    players: Vec<EntityId>,
    scratch: Vec<EntityId>,
}

impl AutoTraceSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for AutoTraceSystem {
    fn name(&self) -> &'static str {
        "auto_trace"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, _dt: f64) {
        ctx.world.query(
            &[
                ComponentKind::of::<PlayerTag>(),
                ComponentKind::of::<Transform>(),
                ComponentKind::of::<AutoTrace>(),
            ],
            &mut self.players,
        );
        let Some(&player) = self.players.first() else {
            return;
        };
        let (Some(ship), Some(mut trace)) = (
            ctx.world.get::<Transform>(player).copied(),
            ctx.world.get::<AutoTrace>(player).copied(),
        ) else {
            return;
        };
        let input = first_with::<InputState>(ctx.world, &mut self.scratch)
            .and_then(|id| ctx.world.get::<InputState>(id).copied());

        trace.look_x = 0.0;
        trace.look_y = 0.0;
        step(ctx, &ship, &mut trace, input.as_ref());

        if let Some(stored) = ctx.world.get_mut::<AutoTrace>(player) {
            *stored = trace;
        }
    }
}

fn step(ctx: &SystemContext<'_>, ship: &Transform, trace: &mut AutoTrace, input: Option<&InputState>) {
    if !trace.enabled {
        return;
    }
    let Some(target) = trace.target else {
        return;
    };
    if !ctx.world.is_alive(target) {
        log::debug!("auto-trace target {target} died, disengaging");
        trace.enabled = false;
        trace.target = None;
        return;
    }

    if let Some(input) = input {
        let look = input.look_x.abs().max(input.look_y.abs());
        if look > trace.cancel_look_threshold {
            trace.enabled = false;
            return;
        }
    }

    let Some(target_transform) = ctx.world.get::<Transform>(target) else {
        trace.enabled = false;
        trace.target = None;
        return;
    };

    let to_target = target_transform.position - ship.position;
    if to_target.length_squared() < 1e-6 {
        return;
    }
    let local_dir = orientation(ship.rotation).inverse() * to_target.normalize();
    let (yaw_error, pitch_error) = compute_aim_error(local_dir);

    let stop_angle = trace.stop_angle_deg.to_radians();
    if yaw_error.abs().max(pitch_error.abs()) <= stop_angle {
        trace.enabled = false;
        trace.target = None;
        return;
    }

    let flight = &ctx.tuning.flight;
    let (x, y) = compute_auto_trace_look(
        yaw_error,
        pitch_error,
        trace.strength,
        ctx.tuning.auto_trace.max_turn_deg_per_sec.to_radians(),
        flight.turn_rate_yaw,
        flight.turn_rate_pitch,
    );
    trace.look_x = x;
    trace.look_y = y;
}
