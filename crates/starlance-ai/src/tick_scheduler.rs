//! Per-entity, per-channel rate limiter for AI work.
//!
//! Decouples how often perception, decision and steering run from the frame
//! rate. Records must be pruned once per frame or dead entities accumulate.

use std::collections::HashMap;

use starlance_core::enums::AiChannel;
use starlance_core::types::EntityId;

/// Last-run timestamps for one entity. Never-run channels hold -inf.
#[derive(Debug, Clone, Copy)]
struct TickRecord {
    perception: f64,
    decision: f64,
    steering: f64,
}

impl Default for TickRecord {
    fn default() -> Self {
        Self {
            perception: f64::NEG_INFINITY,
            decision: f64::NEG_INFINITY,
            steering: f64::NEG_INFINITY,
        }
    }
}

impl TickRecord {
    fn slot(&mut self, channel: AiChannel) -> &mut f64 {
        match channel {
            AiChannel::Perception => &mut self.perception,
            AiChannel::Decision => &mut self.decision,
            AiChannel::Steering => &mut self.steering,
        }
    }
}

#[derive(Debug, Default)]
pub struct AiTickScheduler {
    records: HashMap<EntityId, TickRecord>,
}

impl AiTickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// True (and records `now`) iff at least `interval` seconds passed since the
    /// channel last ran for this entity. False leaves the record untouched.
    pub fn should_run(&mut self, id: EntityId, channel: AiChannel, now: f64, interval: f64) -> bool {
        let last = self.records.entry(id).or_default().slot(channel);
        if now - *last < interval {
            return false;
        }
        *last = now;
        true
    }

    /// Drop records for entities that are no longer alive.
    pub fn prune(&mut self, is_alive: impl Fn(EntityId) -> bool) {
        self.records.retain(|id, _| is_alive(*id));
    }

    /// Number of tracked entities.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
