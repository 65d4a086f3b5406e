//! Sparse entity/component store.
//!
//! One hash map per component type, keyed by `EntityId`. Queries intersect
//! the stores of the requested kinds, driving from the smallest.

mod entity;
mod query;
mod storage;
mod world;

use thiserror::Error;

use starlance_core::types::EntityId;

pub use entity::EntityAllocator;
pub use query::ComponentKind;
pub use world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EcsError {
    #[error("Cannot add component to missing entity {0}")]
    DeadEntity(EntityId),
}
