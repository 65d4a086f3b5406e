use std::collections::HashSet;

use starlance_core::types::EntityId;

/// Issues entity ids. Ids start at 1; destroyed ids are reused last-in
/// first-out before any fresh id is issued.
#[derive(Debug)]
pub struct EntityAllocator {
    alive: HashSet<EntityId>,
    free_ids: Vec<EntityId>,
    next_id: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            alive: HashSet::new(),
            free_ids: Vec::new(),
            next_id: 1,
        }
    }

    pub fn allocate(&mut self) -> EntityId {
        let id = match self.free_ids.pop() {
            Some(id) => id,
            None => {
                let id = EntityId(self.next_id);
                self.next_id += 1;
                id
            }
        };
        self.alive.insert(id);
        id
    }

    /// Returns false if `id` was not alive.
    pub fn deallocate(&mut self, id: EntityId) -> bool {
        if !self.alive.remove(&id) {
            return false;
        }
        self.free_ids.push(id);
        true
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.alive.contains(&id)
    }

    pub fn count(&self) -> usize {
        self.alive.len()
    }

    /// Write all alive ids to `out` in ascending order.
    pub fn alive_ids(&self, out: &mut Vec<EntityId>) {
        out.clear();
        out.extend(self.alive.iter().copied());
        out.sort_unstable();
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_and_deallocate() {
        let mut alloc = EntityAllocator::new();
        let e1 = alloc.allocate();
        assert_eq!(e1, EntityId(1));
        assert!(alloc.is_alive(e1));

        assert!(alloc.deallocate(e1));
        assert!(!alloc.is_alive(e1));
        assert!(!alloc.deallocate(e1));

        let reused = alloc.allocate();
        assert_eq!(reused, e1);
        assert!(alloc.is_alive(reused));
    }

    #[test]
    fn free_ids_reused_lifo() {
        let mut alloc = EntityAllocator::new();
        let ids: Vec<_> = (0..4).map(|_| alloc.allocate()).collect();
        alloc.deallocate(ids[1]);
        alloc.deallocate(ids[2]);
        assert_eq!(alloc.allocate(), ids[2]);
        assert_eq!(alloc.allocate(), ids[1]);
        assert_eq!(alloc.allocate(), EntityId(5));
    }
}
