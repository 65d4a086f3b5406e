//! Counts down the hit confirmation timer.

use starlance_core::components::HitMarker;
use starlance_core::types::EntityId;

use crate::scheduler::{System, SystemContext};
use crate::world_setup::first_with;

#[derive(Default)]
pub struct HitMarkerSystem {
    scratch: Vec<EntityId>,
}

impl HitMarkerSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for HitMarkerSystem {
    fn name(&self) -> &'static str {
        "hit_marker"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, dt: f64) {
        let marker = first_with::<HitMarker>(ctx.world, &mut self.scratch);
        if let Some(marker) = marker.and_then(|id| ctx.world.get_mut::<HitMarker>(id)) {
            if marker.timer > 0.0 {
                marker.timer = (marker.timer - dt).max(0.0);
            }
        }
    }
}
