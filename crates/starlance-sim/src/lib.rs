//! Simulation engine for STARLANCE.
//!
//! Owns the entity/component store, runs gameplay systems in a fixed order
//! once per rendered frame, and publishes gameplay events for presentation
//! layers to consume.

pub mod bridge;
pub mod camera;
pub mod ecs;
pub mod engine;
pub mod event_bus;
pub mod scheduler;
pub mod systems;
pub mod world_setup;

pub use starlance_ai as ai;
pub use starlance_core as core;
pub use engine::{SimCommand, SimConfig, Simulation};

#[cfg(test)]
mod tests;
