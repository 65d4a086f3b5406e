//! Errors raised at the content boundary, before the simulation starts.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Content parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate {table} id '{id}'")]
    DuplicateId { table: &'static str, id: String },

    #[error("Enemy '{enemy}' references unknown weapon id '{weapon}'")]
    UnknownWeapon { enemy: String, weapon: String },

    #[error("Stage '{stage}' references unknown enemy id '{enemy}'")]
    UnknownEnemy { stage: String, enemy: String },

    #[error("Stage '{stage}' references unknown upgrade id '{upgrade}'")]
    UnknownUpgrade { stage: String, upgrade: String },

    #[error("Stage '{stage}': spawnDistanceMax must be >= spawnDistanceMin")]
    InvalidSpawnDistance { stage: String },
}
