//! Fundamental identity, geometric and timing types.

use glam::{DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

/// Opaque entity identity. Ids start at 1 and are recycled after destruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// Local forward axis. Ships and cameras look down -Z.
pub const LOCAL_FORWARD: DVec3 = DVec3::NEG_Z;
/// Local right axis.
pub const LOCAL_RIGHT: DVec3 = DVec3::X;
/// Local and world up axis.
pub const LOCAL_UP: DVec3 = DVec3::Y;

/// Orientation quaternion for Euler angles (x = pitch, y = yaw, z = roll),
/// applied yaw first, then pitch, then roll.
pub fn orientation(rotation: DVec3) -> DQuat {
    DQuat::from_euler(EulerRot::YXZ, rotation.y, rotation.x, rotation.z)
}

/// World-space (forward, right, up) basis for an Euler rotation.
pub fn basis(rotation: DVec3) -> (DVec3, DVec3, DVec3) {
    let q = orientation(rotation);
    (q * LOCAL_FORWARD, q * LOCAL_RIGHT, q * LOCAL_UP)
}

/// Clamp helper that never panics on inverted bounds (returns `min` instead).
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Frame-rate independent smoothing factor: `1 - e^(-rate * dt)`.
pub fn exp_decay(rate: f64, dt: f64) -> f64 {
    1.0 - (-rate * dt).exp()
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Frames advanced so far.
    pub frame: u64,
    /// Elapsed simulation time in seconds (sum of clamped frame deltas).
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one frame of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.frame += 1;
        self.elapsed_secs += dt;
    }
}
