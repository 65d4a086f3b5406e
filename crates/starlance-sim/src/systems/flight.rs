//! Player flight model: look mapping, angular rate smoothing, boost, and
//! exponential velocity response.

use glam::DVec3;

use starlance_core::components::{AutoTrace, InputState, ShipController, Transform, Velocity};
use starlance_core::enums::InputMode;
use starlance_core::tuning::{FlightTuning, LookTuning};
use starlance_core::types::{basis, clamp, exp_decay, EntityId};

use crate::ecs::ComponentKind;
use crate::scheduler::{System, SystemContext};
use crate::world_setup::first_with;

/// Map raw look axes to yaw/pitch input. Pushing right yaws right, which is
/// a negative yaw, so x is negated before per-mode inversion and sensitivity.
pub fn map_look(raw_x: f64, raw_y: f64, mode: InputMode, tuning: &LookTuning) -> (f64, f64) {
    let base_x = -raw_x;
    let base_y = raw_y;
    let (invert_x, invert_y, sensitivity) = match mode {
        InputMode::Touch => (
            tuning.invert_look_x_touch,
            tuning.invert_look_y_touch,
            tuning.look_sensitivity_touch,
        ),
        InputMode::Gyro => (
            tuning.invert_look_x_gyro,
            tuning.invert_look_y_gyro,
            tuning.look_sensitivity_gyro,
        ),
    };
    let x = if invert_x { -base_x } else { base_x };
    let y = if invert_y { -base_y } else { base_y };
    (x * sensitivity, y * sensitivity)
}

/// Advance boost timers. Returns whether boost is active after this step.
///
/// A boost starts on the rising edge of `boost_pressed` when no boost is
/// running and the cooldown has run out. Starting a boost also arms the
/// cooldown, which only counts down once the boost itself has expired.
pub fn update_boost_state(
    controller: &mut ShipController,
    boost_pressed: bool,
    dt: f64,
    tuning: &FlightTuning,
) -> bool {
    let can_trigger = boost_pressed
        && !controller.was_boost_pressed
        && controller.boost_remaining <= 0.0
        && controller.boost_cooldown <= 0.0;
    controller.was_boost_pressed = boost_pressed;

    if can_trigger {
        controller.boost_remaining = tuning.boost_duration_sec;
        controller.boost_cooldown = tuning.boost_cooldown_sec;
    }

    if controller.boost_remaining > 0.0 {
        controller.boost_remaining = (controller.boost_remaining - dt).max(0.0);
    } else if controller.boost_cooldown > 0.0 {
        controller.boost_cooldown = (controller.boost_cooldown - dt).max(0.0);
    }

    controller.boost_remaining > 0.0
}

#[derive(Default)]
pub struct FlightSystem {
    ships: Vec<EntityId>,
    scratch: Vec<EntityId>,
}

impl FlightSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for FlightSystem {
    fn name(&self) -> &'static str {
        "flight"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, dt: f64) {
        let flight = &ctx.tuning.flight;
        let look = &ctx.tuning.look;
        let dt = dt.min(flight.max_dt);
        if dt <= 0.0 {
            return;
        }

        let Some(input) = first_with::<InputState>(ctx.world, &mut self.scratch)
            .and_then(|id| ctx.world.get::<InputState>(id).copied())
        else {
            return;
        };

        ctx.world.query(
            &[
                ComponentKind::of::<Transform>(),
                ComponentKind::of::<Velocity>(),
                ComponentKind::of::<ShipController>(),
            ],
            &mut self.ships,
        );

        let angular_alpha = exp_decay(flight.damping_angular, dt);
        let linear_alpha = exp_decay(flight.damping_linear, dt);
        let smooth_alpha = 1.0 - clamp(look.look_smoothing, 0.0, 1.0);
        let max_rate = look.max_look_rate_deg_per_sec.to_radians();

        for &id in &self.ships {
            let (Some(mut transform), Some(mut velocity), Some(mut controller)) = (
                ctx.world.get::<Transform>(id).copied(),
                ctx.world.get::<Velocity>(id).copied(),
                ctx.world.get::<ShipController>(id).copied(),
            ) else {
                continue;
            };

            let (mut look_x, mut look_y) = map_look(input.look_x, input.look_y, input.mode, look);
            if let Some(trace) = ctx.world.get::<AutoTrace>(id).filter(|t| t.enabled) {
                look_x += trace.look_x;
                look_y += trace.look_y;
            }

            controller.look_x_smoothed += (look_x - controller.look_x_smoothed) * smooth_alpha;
            controller.look_y_smoothed += (look_y - controller.look_y_smoothed) * smooth_alpha;

            let target_yaw_rate = clamp(controller.look_x_smoothed * flight.turn_rate_yaw, -max_rate, max_rate);
            let target_pitch_rate =
                clamp(controller.look_y_smoothed * flight.turn_rate_pitch, -max_rate, max_rate);
            controller.yaw_rate += (target_yaw_rate - controller.yaw_rate) * angular_alpha;
            controller.pitch_rate += (target_pitch_rate - controller.pitch_rate) * angular_alpha;

            transform.rotation.y += controller.yaw_rate * dt;
            transform.rotation.x = clamp(
                transform.rotation.x + controller.pitch_rate * dt,
                -flight.max_pitch,
                flight.max_pitch,
            );

            let boosting = update_boost_state(&mut controller, input.boost, dt, flight);
            let speed_multiplier = if boosting { flight.boost_multiplier } else { 1.0 };

            let (forward, right, up) = basis(transform.rotation);
            let desired: DVec3 = forward * flight.base_speed * speed_multiplier
                + right * input.move_x * flight.strafe_speed
                + up * input.move_y * flight.vertical_speed;

            velocity.linear = velocity.linear.lerp(desired, linear_alpha);
            transform.position += velocity.linear * dt;
            controller.current_speed = velocity.linear.length();

            if let Some(t) = ctx.world.get_mut::<Transform>(id) {
                *t = transform;
            }
            if let Some(v) = ctx.world.get_mut::<Velocity>(id) {
                *v = velocity;
            }
            if let Some(c) = ctx.world.get_mut::<ShipController>(id) {
                *c = controller;
            }
        }
    }
}
