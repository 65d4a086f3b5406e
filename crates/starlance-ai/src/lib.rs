//! Enemy AI for STARLANCE.
//!
//! Pure functions for perception, the action decision FSM and steering, plus
//! the per-entity tick scheduler that gates how often each of them runs.
//! No ECS dependency: the sim crate gathers inputs from components and
//! writes the outputs back.

pub mod fsm;
pub mod perception;
pub mod rng;
pub mod steering;
pub mod tick_scheduler;

pub use starlance_core as core;
