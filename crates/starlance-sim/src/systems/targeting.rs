//! Sticky screen-space target selection for the player.
//!
//! Enemies are projected through a camera mounted on the ship. The candidate
//! nearest the screen center wins, but an existing lock is only given up
//! after the sticky time and only to a clearly better candidate.

use glam::DVec3;

use starlance_core::components::{EnemyTag, PlayerTag, Targeting, Transform};
use starlance_core::events::GameEvent;
use starlance_core::tuning::TargetingTuning;
use starlance_core::types::{clamp, EntityId};

use crate::camera::ShipCamera;
use crate::ecs::ComponentKind;
use crate::scheduler::{System, SystemContext};

/// Weight of the depth term in the screen score.
pub const DEPTH_PENALTY_WEIGHT: f64 = 0.15;

/// Lower is better: squared distance from screen center plus a small penalty
/// that grows with depth.
pub fn compute_screen_score(ndc_x: f64, ndc_y: f64, ndc_z: f64) -> f64 {
    let depth_penalty = clamp((ndc_z + 1.0) * 0.5, 0.0, 1.0) * DEPTH_PENALTY_WEIGHT;
    ndc_x * ndc_x + ndc_y * ndc_y + depth_penalty
}

/// Whether to move the lock from a target scoring `current` to one scoring
/// `best`. A non-finite `current` means there is no valid lock.
pub fn should_switch_target(current: f64, best: f64, since_switch: f64, sticky_time: f64, factor: f64) -> bool {
    if !current.is_finite() {
        return true;
    }
    if since_switch < sticky_time {
        return false;
    }
    best < current * factor
}

/// Screen score of a world point, or `None` when out of range or outside the
/// acquisition circle.
fn score_point(camera: &ShipCamera, tuning: &TargetingTuning, ship: DVec3, point: DVec3) -> Option<f64> {
    if point.distance(ship) > tuning.max_acquire_distance {
        return None;
    }
    let ndc = camera.project(point);
    if !(-1.0..=1.0).contains(&ndc.z) {
        return None;
    }
    let radius_sq = tuning.screen_radius_ndc * tuning.screen_radius_ndc;
    if ndc.x * ndc.x + ndc.y * ndc.y > radius_sq {
        return None;
    }
    Some(compute_screen_score(ndc.x, ndc.y, ndc.z))
}

pub struct TargetingSystem {
    camera: Option<ShipCamera>,
    players: Vec<EntityId>,
    enemies: Vec<EntityId>,
}

impl TargetingSystem {
    pub fn new() -> Self {
        Self {
            camera: None,
            players: Vec::new(),
            enemies: Vec::new(),
        }
    }
}

impl Default for TargetingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for TargetingSystem {
    fn name(&self) -> &'static str {
        "targeting"
    }

    fn init(&mut self, ctx: &mut SystemContext<'_>) {
        self.camera = Some(ShipCamera::from_tuning(&ctx.tuning.targeting));
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, _dt: f64) {
        let tuning = &ctx.tuning.targeting;
        let camera = self
            .camera
            .get_or_insert_with(|| ShipCamera::from_tuning(tuning));

        ctx.world.query(
            &[
                ComponentKind::of::<PlayerTag>(),
                ComponentKind::of::<Transform>(),
                ComponentKind::of::<Targeting>(),
            ],
            &mut self.players,
        );
        let Some(&player) = self.players.first() else {
            return;
        };
        let (Some(ship), Some(mut targeting)) = (
            ctx.world.get::<Transform>(player).copied(),
            ctx.world.get::<Targeting>(player).copied(),
        ) else {
            return;
        };
        camera.mount(&ship);

        ctx.world.query(
            &[ComponentKind::of::<EnemyTag>(), ComponentKind::of::<Transform>()],
            &mut self.enemies,
        );

        let mut best: Option<(EntityId, f64)> = None;
        for &id in &self.enemies {
            let Some(transform) = ctx.world.get::<Transform>(id) else {
                continue;
            };
            let Some(score) = score_point(camera, tuning, ship.position, transform.position) else {
                continue;
            };
            if best.map_or(true, |(_, s)| score < s) {
                best = Some((id, score));
            }
        }

        let current_score = targeting
            .current_target
            .filter(|id| ctx.world.is_alive(*id))
            .and_then(|id| ctx.world.get::<Transform>(id))
            .and_then(|t| score_point(camera, tuning, ship.position, t.position))
            .unwrap_or(f64::INFINITY);

        let since_switch = ctx.now - targeting.last_switch_time;
        let switch_to = best.filter(|(_, best_score)| {
            should_switch_target(
                current_score,
                *best_score,
                since_switch,
                tuning.sticky_time_sec,
                tuning.switch_score_factor,
            )
        });

        if let Some((candidate, _)) = switch_to {
            if targeting.current_target != Some(candidate) {
                ctx.bus.publish(GameEvent::TargetChanged {
                    from: targeting.current_target,
                    to: Some(candidate),
                });
            }
            targeting.current_target = Some(candidate);
            targeting.last_switch_time = ctx.now;
            targeting.lock_progress = 1.0;
        } else if current_score.is_infinite() && since_switch >= tuning.sticky_time_sec {
            if let Some(lost) = targeting.current_target {
                ctx.bus.publish(GameEvent::TargetChanged {
                    from: Some(lost),
                    to: None,
                });
            }
            targeting.current_target = None;
            targeting.lock_progress = 0.0;
        }

        if let Some(stored) = ctx.world.get_mut::<Targeting>(player) {
            *stored = targeting;
        }
    }
}
