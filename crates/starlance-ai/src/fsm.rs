//! Enemy action decision FSM.
//!
//! Pure functions that pick the next tactical action for an enemy from its
//! blackboard and archetype parameters. No ECS dependency.

use starlance_core::enums::AiAction;
use starlance_core::types::clamp;

use crate::rng::next_random;

/// Input to the decision FSM for a single entity.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext {
    pub current_action: AiAction,
    pub action_until: f64,
    pub rng_state: u32,
    /// AI clock.
    pub now: f64,
    /// Seconds between decision ticks for this entity (LOD-aware).
    pub interval: f64,
    pub player_visible: bool,
    pub player_distance: f64,
    pub preferred_range: f64,
    pub dodge_rate: f64,
    pub min_action_duration: f64,
    pub evade_duration: f64,
}

/// Output from the decision FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionUpdate {
    pub new_action: AiAction,
    pub action_until: f64,
    pub rng_state: u32,
    /// False while the current action is still held.
    pub decided: bool,
}

/// Preference for closing distance: 0 inside preferred range, 1 at twice it.
pub fn approach_score(distance: f64, preferred_range: f64) -> f64 {
    let r = preferred_range.max(f64::EPSILON);
    clamp((distance - r) / r, 0.0, 1.0)
}

/// Preference for circling: 1 at preferred range, falling off linearly.
pub fn orbit_score(distance: f64, preferred_range: f64) -> f64 {
    let r = preferred_range.max(f64::EPSILON);
    1.0 - (distance - r).abs() / r
}

/// Evaluate the FSM for one enemy.
pub fn evaluate(ctx: &DecisionContext) -> DecisionUpdate {
    if ctx.now < ctx.action_until {
        return DecisionUpdate {
            new_action: ctx.current_action,
            action_until: ctx.action_until,
            rng_state: ctx.rng_state,
            decided: false,
        };
    }

    let mut rng_state = ctx.rng_state;
    let action = if !ctx.player_visible {
        AiAction::Approach
    } else {
        let (roll, next) = next_random(rng_state);
        rng_state = next;
        let dodge_chance = clamp(ctx.dodge_rate, 0.0, 1.0) * ctx.interval;
        if roll < dodge_chance {
            AiAction::Evade
        } else if approach_score(ctx.player_distance, ctx.preferred_range)
            >= orbit_score(ctx.player_distance, ctx.preferred_range)
        {
            AiAction::Approach
        } else {
            AiAction::Orbit
        }
    };

    let hold = match action {
        AiAction::Evade => ctx.evade_duration,
        AiAction::Approach | AiAction::Orbit => ctx.min_action_duration,
    };

    DecisionUpdate {
        new_action: action,
        action_until: ctx.now + hold,
        rng_state,
        decided: true,
    }
}
