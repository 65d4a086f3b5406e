//! Player laser: cooldown and heat bookkeeping, aim assist toward the lock,
//! and hitscan resolution against enemy hit spheres.

use glam::DVec3;

use starlance_core::components::{
    EnemyTag, HitMarker, HitSphere, InputState, PlayerTag, Targeting, Transform, WeaponSlots,
};
use starlance_core::content::WeaponDef;
use starlance_core::events::GameEvent;
use starlance_core::types::{basis, clamp, EntityId};

use crate::ecs::{ComponentKind, World};
use crate::scheduler::{System, SystemContext};
use crate::world_setup::first_with;

/// Minimum distance to the lock target for aim assist to apply.
const MIN_ASSIST_DISTANCE: f64 = 0.01;

/// Nudge `forward` toward `target_dir` when the target sits inside the cone.
/// Both inputs are unit vectors.
pub fn compute_assisted_aim(forward: DVec3, target_dir: DVec3, strength: f64, cone_deg: f64) -> DVec3 {
    let strength = clamp(strength, 0.0, 1.0);
    if strength <= 0.0 {
        return forward;
    }
    if forward.dot(target_dir) < cone_deg.to_radians().cos() {
        return forward;
    }
    forward.lerp(target_dir, strength).normalize()
}

/// Distance along a unit ray to the first intersection with a sphere, or
/// `None` if the sphere is behind or missed. An origin inside the sphere
/// reports the exit point.
pub fn ray_sphere(origin: DVec3, direction: DVec3, center: DVec3, radius: f64) -> Option<f64> {
    let to_center = center - origin;
    let tca = to_center.dot(direction);
    if tca < 0.0 {
        return None;
    }
    let d2 = to_center.length_squared() - tca * tca;
    let radius2 = radius * radius;
    if d2 > radius2 {
        return None;
    }
    let thc = (radius2 - d2).sqrt();
    let t = if tca - thc < 0.0 { tca + thc } else { tca - thc };
    (t >= 0.0).then_some(t)
}

/// Nearest enemy hit within `range`.
pub fn find_nearest_hit(
    world: &World,
    enemies: &mut Vec<EntityId>,
    origin: DVec3,
    direction: DVec3,
    range: f64,
) -> Option<(EntityId, f64)> {
    world.query(
        &[
            ComponentKind::of::<EnemyTag>(),
            ComponentKind::of::<Transform>(),
            ComponentKind::of::<HitSphere>(),
        ],
        enemies,
    );
    let mut nearest: Option<(EntityId, f64)> = None;
    for &id in enemies.iter() {
        let (Some(transform), Some(sphere)) = (world.get::<Transform>(id), world.get::<HitSphere>(id)) else {
            continue;
        };
        let Some(t) = ray_sphere(origin, direction, transform.position, sphere.radius) else {
            continue;
        };
        let limit = nearest.map_or(range, |(_, d)| d);
        if t < limit {
            nearest = Some((id, t));
        }
    }
    nearest
}

#[derive(Default)]
pub struct WeaponSystem {
    players: Vec<EntityId>,
    enemies: Vec<EntityId>,
    scratch: Vec<EntityId>,
}

impl WeaponSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Firing direction from the ship's nose, assisted toward a live lock.
    fn aim(&self, ctx: &SystemContext<'_>, ship: &Transform, targeting: &Targeting) -> DVec3 {
        let (forward, _, _) = basis(ship.rotation);
        let forward = forward.normalize();
        let Some(target) = targeting.current_target.filter(|id| ctx.world.is_alive(*id)) else {
            return forward;
        };
        let Some(target_transform) = ctx.world.get::<Transform>(target) else {
            return forward;
        };
        let to_target = target_transform.position - ship.position;
        let distance = to_target.length();
        if distance <= MIN_ASSIST_DISTANCE {
            return forward;
        }
        let tuning = &ctx.tuning.targeting;
        compute_assisted_aim(forward, to_target / distance, tuning.assist_strength, tuning.assist_cone_deg)
    }
}

impl System for WeaponSystem {
    fn name(&self) -> &'static str {
        "weapon"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, dt: f64) {
        let tuning = &ctx.tuning.weapons;
        let Some(input) = first_with::<InputState>(ctx.world, &mut self.scratch)
            .and_then(|id| ctx.world.get::<InputState>(id).copied())
        else {
            return;
        };

        ctx.world.query(
            &[
                ComponentKind::of::<PlayerTag>(),
                ComponentKind::of::<Transform>(),
                ComponentKind::of::<WeaponSlots>(),
                ComponentKind::of::<Targeting>(),
            ],
            &mut self.players,
        );
        let Some(&player) = self.players.first() else {
            return;
        };
        let (Some(ship), Some(targeting), Some(mut slots)) = (
            ctx.world.get::<Transform>(player).copied(),
            ctx.world.get::<Targeting>(player).copied(),
            ctx.world.get::<WeaponSlots>(player).cloned(),
        ) else {
            return;
        };

        let Some(WeaponDef::Laser(laser)) = ctx.content.weapon(&slots.active_weapon_id) else {
            return;
        };

        slots.cooldown = (slots.cooldown - dt).max(0.0);
        if slots.heat > 0.0 {
            slots.heat = (slots.heat - laser.cool_rate * dt).max(0.0);
        }
        if slots.overheated && slots.heat <= tuning.heat_recover_threshold {
            slots.overheated = false;
        }

        let fire = input.fire_primary && slots.cooldown <= 0.0 && !slots.overheated;
        if fire {
            slots.cooldown = 1.0 / laser.fire_rate;
            slots.heat = (slots.heat + laser.heat_per_shot).min(tuning.heat_max);
            if slots.heat >= tuning.heat_max {
                slots.overheated = true;
                log::debug!("{} overheated", laser.id);
            }
        }

        if let Some(stored) = ctx.world.get_mut::<WeaponSlots>(player) {
            *stored = slots;
        }
        if !fire {
            return;
        }

        ctx.bus.publish(GameEvent::WeaponFired {
            weapon_id: laser.id.clone(),
            by: player,
        });

        let direction = self.aim(ctx, &ship, &targeting);
        let hit = find_nearest_hit(ctx.world, &mut self.enemies, ship.position, direction, tuning.laser_max_range);
        let Some((target, _)) = hit else {
            return;
        };

        ctx.bus.publish(GameEvent::DamageRequested {
            target,
            amount: laser.base_damage,
            source: Some(player),
        });
        let marker = first_with::<HitMarker>(ctx.world, &mut self.scratch);
        if let Some(marker) = marker.and_then(|id| ctx.world.get_mut::<HitMarker>(id)) {
            marker.timer = tuning.hit_marker_duration;
        }
    }
}
