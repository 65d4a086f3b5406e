//! Ship-mounted perspective camera used for screen-space targeting.

use glam::{DMat4, DVec3};
use starlance_core::components::Transform;
use starlance_core::tuning::TargetingTuning;
use starlance_core::types::orientation;

#[derive(Debug, Clone, Copy)]
pub struct ShipCamera {
    projection: DMat4,
    view: DMat4,
}

impl ShipCamera {
    pub fn from_tuning(tuning: &TargetingTuning) -> Self {
        Self {
            projection: DMat4::perspective_rh_gl(
                tuning.camera_fov_deg.to_radians(),
                tuning.camera_aspect,
                tuning.camera_near,
                tuning.camera_far,
            ),
            view: DMat4::IDENTITY,
        }
    }

    /// Place the camera at the ship's position, looking down its forward axis.
    pub fn mount(&mut self, transform: &Transform) {
        let world = DMat4::from_rotation_translation(
            orientation(transform.rotation),
            transform.position,
        );
        self.view = world.inverse();
    }

    /// Project a world point to normalized device coordinates. Points inside
    /// the frustum land in [-1, 1] on every axis.
    pub fn project(&self, point: DVec3) -> DVec3 {
        (self.projection * self.view).project_point3(point)
    }
}
