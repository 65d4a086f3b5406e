//! Decision system: runs the action FSM at a distance-dependent rate.

use starlance_ai::fsm::{evaluate, DecisionContext};
use starlance_core::components::{AiState, Blackboard, EnemyTag};
use starlance_core::enums::AiChannel;
use starlance_core::types::EntityId;

use crate::ecs::ComponentKind;
use crate::scheduler::{System, SystemContext};

use super::SharedTickScheduler;

pub struct DecisionSystem {
    scheduler: SharedTickScheduler,
    enemies: Vec<EntityId>,
}

impl DecisionSystem {
    pub fn new(scheduler: SharedTickScheduler) -> Self {
        Self {
            scheduler,
            enemies: Vec::new(),
        }
    }
}

impl System for DecisionSystem {
    fn name(&self) -> &'static str {
        "decision"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, _dt: f64) {
        let tuning = &ctx.tuning.ai;
        ctx.world.query(
            &[
                ComponentKind::of::<EnemyTag>(),
                ComponentKind::of::<AiState>(),
                ComponentKind::of::<Blackboard>(),
            ],
            &mut self.enemies,
        );

        let mut scheduler = self.scheduler.borrow_mut();
        for &id in &self.enemies {
            let (Some(ai), Some(blackboard)) = (ctx.world.get::<AiState>(id), ctx.world.get::<Blackboard>(id).copied())
            else {
                continue;
            };
            let Some(archetype) = ctx.content.enemy(&ai.archetype_id) else {
                continue;
            };

            let hz = if blackboard.player_distance > tuning.lod_distance {
                tuning.decision_lod_hz
            } else {
                tuning.decision_hz
            };
            let interval = 1.0 / hz;
            if !scheduler.should_run(id, AiChannel::Decision, ctx.now, interval) {
                continue;
            }

            let update = evaluate(&DecisionContext {
                current_action: ai.current_action,
                action_until: ai.action_until,
                rng_state: ai.rng_state,
                now: ctx.now,
                interval,
                player_visible: blackboard.player_visible,
                player_distance: blackboard.player_distance,
                preferred_range: archetype.ai.preferred_range,
                dodge_rate: archetype.ai.dodge_rate,
                min_action_duration: tuning.min_action_duration_sec,
                evade_duration: tuning.evade_duration_sec,
            });
            if !update.decided {
                continue;
            }

            if let Some(ai) = ctx.world.get_mut::<AiState>(id) {
                if ai.current_action != update.new_action {
                    log::trace!("{id}: {:?} -> {:?}", ai.current_action, update.new_action);
                }
                ai.current_action = update.new_action;
                ai.action_until = update.action_until;
                ai.rng_state = update.rng_state;
            }
        }
    }
}
