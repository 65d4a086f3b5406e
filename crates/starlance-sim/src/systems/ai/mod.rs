//! Enemy AI systems. Each one gathers inputs from components, calls the pure
//! functions in `starlance-ai`, and writes the results back.
//!
//! Perception, decision and steering share one [`AiTickScheduler`] so each
//! channel keeps its own cadence per entity.

pub mod decision;
pub mod enemy_movement;
pub mod perception;
pub mod steering;

use std::cell::RefCell;
use std::rc::Rc;

use starlance_ai::tick_scheduler::AiTickScheduler;

pub type SharedTickScheduler = Rc<RefCell<AiTickScheduler>>;

pub fn shared_tick_scheduler() -> SharedTickScheduler {
    Rc::new(RefCell::new(AiTickScheduler::new()))
}
