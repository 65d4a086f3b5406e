//! KillAll objective tracking for the running stage.

use std::collections::BTreeSet;

use starlance_core::components::StageRunState;
use starlance_core::enums::StageStatus;
use starlance_core::events::GameEvent;
use starlance_core::types::EntityId;

use crate::ecs::{ComponentKind, World};
use crate::scheduler::{System, SystemContext};

pub const KILL_ALL_OBJECTIVE_ID: &str = "KillAll";

/// Count spawned enemies still standing. Dead ids are moved into `killed`
/// so a later reuse of the id by an unrelated entity is not counted.
/// Duplicate ids (a reused id spawned again this run) count once.
pub fn count_remaining_enemies(world: &World, ids: &[EntityId], killed: &mut BTreeSet<EntityId>) -> u32 {
    let mut seen = BTreeSet::new();
    let mut remaining = 0;
    for &id in ids {
        if killed.contains(&id) || !seen.insert(id) {
            continue;
        }
        if world.is_alive(id) {
            remaining += 1;
        } else {
            killed.insert(id);
        }
    }
    remaining
}

#[derive(Default)]
pub struct ObjectiveSystem {
    stages: Vec<EntityId>,
}

impl ObjectiveSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for ObjectiveSystem {
    fn name(&self) -> &'static str {
        "objective"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, _dt: f64) {
        ctx.world
            .query(&[ComponentKind::of::<StageRunState>()], &mut self.stages);

        for &id in &self.stages {
            let Some(status) = ctx.world.get::<StageRunState>(id).map(|s| s.status) else {
                continue;
            };
            if status != StageStatus::Running {
                if let Some(stored) = ctx.world.get_mut::<StageRunState>(id) {
                    stored.killed_ids.clear();
                }
                continue;
            }
            let Some(mut state) = ctx.world.get::<StageRunState>(id).cloned() else {
                continue;
            };

            for event in ctx.events {
                if let GameEvent::EnemyKilled { entity, .. } = event {
                    // A live id here was reused by a newer spawn.
                    if !ctx.world.is_alive(*entity) {
                        state.killed_ids.insert(*entity);
                    }
                }
            }

            let remaining = count_remaining_enemies(ctx.world, &state.spawned_enemy_ids, &mut state.killed_ids);
            let was_complete = state.objective_complete;
            state.remaining_enemies = remaining;
            state.killed_enemies = (state.spawned_enemy_ids.len() as u32).saturating_sub(remaining);
            state.objective_complete = remaining == 0 && state.pending_reinforcements() == 0;

            if state.objective_complete && !was_complete {
                log::debug!("objective {KILL_ALL_OBJECTIVE_ID} complete for '{}'", state.stage_id);
                ctx.bus.publish(GameEvent::ObjectiveCompleted {
                    objective_id: KILL_ALL_OBJECTIVE_ID.to_string(),
                });
            }

            if let Some(stored) = ctx.world.get_mut::<StageRunState>(id) {
                *stored = state;
            }
        }
    }
}
