//! Damage resolution. The only system that lowers health or shields, and
//! the only one that destroys entities on a kill.

use starlance_core::components::{EnemyTag, Health, PlayerTag, Shield};
use starlance_core::events::GameEvent;
use starlance_core::types::EntityId;

use crate::scheduler::{System, SystemContext};
use crate::world_setup::despawn_entity;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageResult {
    pub remaining_hp: f64,
    pub remaining_shield: f64,
    pub killed: bool,
}

/// Shield absorbs first, the rest comes off health (floored at zero).
pub fn apply_damage(health: &mut Health, shield: Option<&mut Shield>, amount: f64) -> DamageResult {
    let mut remaining = amount;
    let mut remaining_shield = 0.0;

    if let Some(shield) = shield {
        if remaining > 0.0 {
            let absorbed = shield.value.min(remaining);
            shield.value -= absorbed;
            remaining -= absorbed;
        }
        remaining_shield = shield.value;
    }

    if remaining > 0.0 {
        health.hp = (health.hp - remaining).max(0.0);
    }

    DamageResult {
        remaining_hp: health.hp,
        remaining_shield,
        killed: health.hp <= 0.0,
    }
}

#[derive(Default)]
pub struct DamageSystem;

impl DamageSystem {
    pub fn new() -> Self {
        Self
    }

    fn apply(&mut self, ctx: &mut SystemContext<'_>, target: EntityId, amount: f64, source: Option<EntityId>) {
        let Some(mut health) = ctx.world.get::<Health>(target).copied() else {
            return;
        };
        let mut shield = ctx.world.get::<Shield>(target).copied();
        let result = apply_damage(&mut health, shield.as_mut(), amount);

        if let Some(stored) = ctx.world.get_mut::<Health>(target) {
            *stored = health;
        }
        if let (Some(updated), Some(stored)) = (shield, ctx.world.get_mut::<Shield>(target)) {
            *stored = updated;
        }

        if ctx.world.has::<PlayerTag>(target) {
            ctx.bus.publish(GameEvent::PlayerDamaged { amount, source });
        }

        if !result.killed {
            return;
        }
        if ctx.world.has::<EnemyTag>(target) {
            ctx.bus.publish(GameEvent::EnemyKilled {
                entity: target,
                by: source,
            });
        }
        log::debug!("{target} destroyed");
        despawn_entity(ctx.world, ctx.renderer, target);
    }
}

impl System for DamageSystem {
    fn name(&self) -> &'static str {
        "damage"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, _dt: f64) {
        let events = ctx.events;
        for event in events {
            if let GameEvent::DamageRequested {
                target,
                amount,
                source,
            } = event
            {
                self.apply(ctx, *target, *amount, *source);
            }
        }
    }
}
