//! Immutable content tables: weapons, upgrades, enemy archetypes, stages.
//!
//! Tables are authored as JSON with camelCase keys. The simulation trusts
//! referential integrity, so callers run [`ContentDb::check_references`] (or
//! use [`ContentDb::from_json_str`], which does) before handing a table over.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaserWeaponDef {
    pub id: String,
    pub name: String,
    pub base_damage: f64,
    /// Shots per second.
    pub fire_rate: f64,
    pub heat_per_shot: f64,
    /// Heat dissipated per second.
    pub cool_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissileWeaponDef {
    pub id: String,
    pub name: String,
    pub base_damage: f64,
    pub lock_time: f64,
    pub ammo_max: u32,
    pub reload_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WeaponDef {
    Laser(LaserWeaponDef),
    Missile(MissileWeaponDef),
}

impl WeaponDef {
    pub fn id(&self) -> &str {
        match self {
            WeaponDef::Laser(w) => &w.id,
            WeaponDef::Missile(w) => &w.id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeTarget {
    Weapon,
    Ship,
    Targeting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeOp {
    Add,
    Mul,
    Set,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeEffectDef {
    pub target: UpgradeTarget,
    pub stat: String,
    pub op: UpgradeOp,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeDef {
    pub id: String,
    pub name: String,
    pub cost: u32,
    pub effects: Vec<UpgradeEffectDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyStatsDef {
    pub max_hp: f64,
    #[serde(default)]
    pub shield: f64,
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyAiDef {
    pub behavior: String,
    pub aggression: f64,
    pub preferred_range: f64,
    pub orbit_strength: f64,
    /// Evade probability per second of decision interval.
    pub dodge_rate: f64,
    pub bravery: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyArchetypeDef {
    pub id: String,
    pub name: String,
    pub stats: EnemyStatsDef,
    pub weapons: Vec<String>,
    pub ai: EnemyAiDef,
    /// Hit sphere radius; archetypes without one use the factory default.
    #[serde(default)]
    pub hit_radius: Option<f64>,
    #[serde(default)]
    pub counters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageEnemyDef {
    pub archetype_id: String,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StageObjectiveDef {
    KillAll,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageRewardsDef {
    pub credits: u32,
    #[serde(default)]
    pub upgrades: Vec<String>,
}

/// Extra enemies spawned `delay` seconds into the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageReinforcementDef {
    pub delay: f64,
    pub archetype_id: String,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaDef {
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDef {
    pub id: String,
    pub name: String,
    pub arena: ArenaDef,
    pub enemies: Vec<StageEnemyDef>,
    pub objectives: Vec<StageObjectiveDef>,
    pub rewards: StageRewardsDef,
    #[serde(default)]
    pub reinforcements: Vec<StageReinforcementDef>,
    #[serde(default)]
    pub spawn_distance_min: Option<f64>,
    #[serde(default)]
    pub spawn_distance_max: Option<f64>,
}

impl StageDef {
    /// Total enemies in the initial roster (reinforcements excluded).
    pub fn roster_size(&self) -> u32 {
        self.enemies.iter().map(|e| e.count).sum()
    }
}

/// The full validated content table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentDb {
    pub weapons: Vec<WeaponDef>,
    #[serde(default)]
    pub upgrades: Vec<UpgradeDef>,
    pub enemies: Vec<EnemyArchetypeDef>,
    pub stages: Vec<StageDef>,
}

impl ContentDb {
    /// Parse a JSON document and verify its cross-references.
    pub fn from_json_str(json: &str) -> Result<Self, ContentError> {
        let db: ContentDb = serde_json::from_str(json)?;
        db.check_references()?;
        Ok(db)
    }

    pub fn weapon(&self, id: &str) -> Option<&WeaponDef> {
        self.weapons.iter().find(|w| w.id() == id)
    }

    pub fn enemy(&self, id: &str) -> Option<&EnemyArchetypeDef> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn stage(&self, id: &str) -> Option<&StageDef> {
        self.stages.iter().find(|s| s.id == id)
    }

    pub fn upgrade(&self, id: &str) -> Option<&UpgradeDef> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    /// Check id uniqueness and every enemy→weapon, stage→enemy and
    /// stage→upgrade reference.
    pub fn check_references(&self) -> Result<(), ContentError> {
        ensure_unique("weapons", self.weapons.iter().map(|w| w.id()))?;
        ensure_unique("upgrades", self.upgrades.iter().map(|u| u.id.as_str()))?;
        ensure_unique("enemies", self.enemies.iter().map(|e| e.id.as_str()))?;
        ensure_unique("stages", self.stages.iter().map(|s| s.id.as_str()))?;

        for enemy in &self.enemies {
            for weapon in &enemy.weapons {
                if self.weapon(weapon).is_none() {
                    return Err(ContentError::UnknownWeapon {
                        enemy: enemy.id.clone(),
                        weapon: weapon.clone(),
                    });
                }
            }
        }

        for stage in &self.stages {
            let roster = stage.enemies.iter().map(|e| &e.archetype_id);
            let reinforcements = stage.reinforcements.iter().map(|r| &r.archetype_id);
            for archetype_id in roster.chain(reinforcements) {
                if self.enemy(archetype_id).is_none() {
                    return Err(ContentError::UnknownEnemy {
                        stage: stage.id.clone(),
                        enemy: archetype_id.clone(),
                    });
                }
            }
            for upgrade in &stage.rewards.upgrades {
                if self.upgrade(upgrade).is_none() {
                    return Err(ContentError::UnknownUpgrade {
                        stage: stage.id.clone(),
                        upgrade: upgrade.clone(),
                    });
                }
            }
            if let (Some(min), Some(max)) = (stage.spawn_distance_min, stage.spawn_distance_max) {
                if max < min {
                    return Err(ContentError::InvalidSpawnDistance {
                        stage: stage.id.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

fn ensure_unique<'a>(
    table: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ContentError::DuplicateId {
                table,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
