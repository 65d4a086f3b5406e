//! Desired-velocity computation for each tactical action.

use glam::DVec3;
use starlance_core::enums::AiAction;
use starlance_core::types::{clamp, LOCAL_FORWARD, LOCAL_UP};

use crate::rng::next_random_sign;

/// Lateral speed factor while evading.
pub const EVADE_LATERAL: f64 = 1.2;
/// Fraction of preferred range at which approach speed reaches zero.
pub const APPROACH_STOP_FRACTION: f64 = 0.6;

#[derive(Debug, Clone, Copy)]
pub struct SteeringContext {
    pub action: AiAction,
    pub position: DVec3,
    pub player_position: DVec3,
    pub preferred_range: f64,
    pub orbit_strength: f64,
    pub orbit_radial_factor: f64,
    pub speed: f64,
    pub rng_state: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringOutput {
    pub desired_velocity: DVec3,
    pub rng_state: u32,
}

/// Compute the desired velocity for one enemy. Only Evade advances the RNG.
pub fn compute(ctx: &SteeringContext) -> SteeringOutput {
    let to_player = ctx.player_position - ctx.position;
    let distance = to_player.length();
    let dir = if distance > 0.0 { to_player / distance } else { LOCAL_FORWARD };
    let r = ctx.preferred_range.max(f64::EPSILON);
    let tangent = LOCAL_UP.cross(dir).normalize_or_zero();
    let mut rng_state = ctx.rng_state;

    let mut desired = match ctx.action {
        AiAction::Approach => {
            dir * clamp((distance - r * APPROACH_STOP_FRACTION) / r, 0.0, 1.0)
        }
        AiAction::Orbit => {
            let radial_error = clamp((distance - r) / r, -1.0, 1.0);
            tangent * ctx.orbit_strength + dir * radial_error * ctx.orbit_radial_factor
        }
        AiAction::Evade => {
            let (sign, next) = next_random_sign(rng_state);
            rng_state = next;
            tangent * sign * EVADE_LATERAL
        }
    };

    if desired.length_squared() > 1e-4 {
        desired = desired.normalize();
    }

    SteeringOutput {
        desired_velocity: desired * ctx.speed,
        rng_state,
    }
}
