//! Seam between the simulation and whatever draws it.

use glam::DVec3;
use starlance_core::types::EntityId;

/// Presentation collaborator notified when enemy visuals come and go.
pub trait RenderBridge {
    fn attach(&mut self, id: EntityId, archetype_id: &str, position: DVec3);
    fn detach(&mut self, id: EntityId);
}

/// Bridge for headless runs and tests that don't care about visuals.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessBridge;

impl RenderBridge for HeadlessBridge {
    fn attach(&mut self, _id: EntityId, _archetype_id: &str, _position: DVec3) {}

    fn detach(&mut self, _id: EntityId) {}
}
