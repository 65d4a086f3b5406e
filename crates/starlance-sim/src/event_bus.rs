//! Frame-scoped queue of gameplay events.
//!
//! Producers append with [`EventBus::publish`]. Readers either peek at the
//! pending events or drain them. The bus keeps two buffers and swaps them on
//! [`EventBus::drain`], so neither allocation is dropped between frames.

use starlance_core::events::GameEvent;

#[derive(Debug, Default)]
pub struct EventBus {
    pending: Vec<GameEvent>,
    /// The last drained batch. Cleared and reused as the pending buffer on
    /// the next drain.
    drained: Vec<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, event: GameEvent) {
        log::trace!("publish {}", event.kind());
        self.pending.push(event);
    }

    /// Events published since the last drain or clear, in publish order.
    pub fn peek(&self) -> &[GameEvent] {
        &self.pending
    }

    /// Swap buffers and return the batch that was pending. The bus is empty
    /// afterwards.
    pub fn drain(&mut self) -> &[GameEvent] {
        std::mem::swap(&mut self.pending, &mut self.drained);
        self.pending.clear();
        &self.drained
    }

    /// Move the pending events into `out` (cleared first).
    pub fn drain_into(&mut self, out: &mut Vec<GameEvent>) {
        out.clear();
        out.append(&mut self.pending);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
