//! Gameplay systems run by the scheduler each frame.
//!
//! Each system owns only reusable query buffers. All gameplay state lives in
//! components; systems copy what they need out of the world, compute, and
//! write the results back.

pub mod ai;
pub mod auto_trace;
pub mod damage;
pub mod flight;
pub mod hit_marker;
pub mod objective;
pub mod stage;
pub mod targeting;
pub mod weapon;
