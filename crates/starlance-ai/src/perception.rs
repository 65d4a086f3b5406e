//! Line-of-sight check from an enemy to the player.

use glam::DVec3;
use starlance_core::types::{orientation, LOCAL_FORWARD};

/// Result of one perception sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    pub visible: bool,
    pub distance: f64,
    /// Angle between the enemy's forward axis and the direction to the player.
    pub rel_angle: f64,
}

/// Cosine of half the full field of view.
pub fn fov_cos(fov_degrees: f64) -> f64 {
    (fov_degrees.to_radians() * 0.5).cos()
}

/// Sample whether `player` is within `max_range` and inside the view cone of
/// an observer at `position` with Euler `rotation`.
pub fn perceive(position: DVec3, rotation: DVec3, player: DVec3, max_range: f64, fov_cos: f64) -> Perception {
    let to_player = player - position;
    let distance = to_player.length();
    let forward = orientation(rotation) * LOCAL_FORWARD;
    let dir = if distance > 0.0 { to_player / distance } else { LOCAL_FORWARD };
    let cos = forward.dot(dir).clamp(-1.0, 1.0);
    Perception {
        visible: distance <= max_range && cos >= fov_cos,
        distance,
        rel_angle: cos.acos(),
    }
}
