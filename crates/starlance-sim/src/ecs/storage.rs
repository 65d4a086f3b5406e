use std::any::Any;
use std::collections::HashMap;

use starlance_core::types::EntityId;

/// Type-erased view of one component store.
pub(crate) trait ComponentStorage {
    fn remove_entity(&mut self, id: EntityId);
    fn contains(&self, id: EntityId) -> bool;
    fn len(&self) -> usize;
    /// Append every id held by this store to `out`.
    fn extend_ids(&self, out: &mut Vec<EntityId>);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

pub(crate) struct Storage<T> {
    pub(crate) data: HashMap<EntityId, T>,
}

impl<T> Storage<T> {
    pub(crate) fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }
}

impl<T: 'static> ComponentStorage for Storage<T> {
    fn remove_entity(&mut self, id: EntityId) {
        self.data.remove(&id);
    }

    fn contains(&self, id: EntityId) -> bool {
        self.data.contains_key(&id)
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn extend_ids(&self, out: &mut Vec<EntityId>) {
        out.extend(self.data.keys().copied());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
