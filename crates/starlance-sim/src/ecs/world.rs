use std::any::TypeId;
use std::collections::HashMap;

use starlance_core::types::EntityId;

use super::entity::EntityAllocator;
use super::storage::{ComponentStorage, Storage};
use super::EcsError;

/// Owns all entities and their components.
#[derive(Default)]
pub struct World {
    allocator: EntityAllocator,
    storages: HashMap<TypeId, Box<dyn ComponentStorage>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self) -> EntityId {
        self.allocator.allocate()
    }

    /// Destroy `id` and drop all of its components. No-op if already dead.
    pub fn destroy(&mut self, id: EntityId) {
        if !self.allocator.deallocate(id) {
            return;
        }
        for storage in self.storages.values_mut() {
            storage.remove_entity(id);
        }
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.allocator.is_alive(id)
    }

    /// Attach or replace a component.
    pub fn insert<T: 'static>(&mut self, id: EntityId, value: T) -> Result<(), EcsError> {
        if !self.is_alive(id) {
            return Err(EcsError::DeadEntity(id));
        }
        self.storage_mut_or_insert::<T>().data.insert(id, value);
        Ok(())
    }

    pub fn remove<T: 'static>(&mut self, id: EntityId) -> Option<T> {
        if !self.is_alive(id) {
            return None;
        }
        self.typed_storage_mut::<T>()?.data.remove(&id)
    }

    pub fn get<T: 'static>(&self, id: EntityId) -> Option<&T> {
        if !self.is_alive(id) {
            return None;
        }
        self.typed_storage::<T>()?.data.get(&id)
    }

    pub fn get_mut<T: 'static>(&mut self, id: EntityId) -> Option<&mut T> {
        if !self.is_alive(id) {
            return None;
        }
        self.typed_storage_mut::<T>()?.data.get_mut(&id)
    }

    pub fn has<T: 'static>(&self, id: EntityId) -> bool {
        self.get::<T>(id).is_some()
    }

    /// Write all alive ids to `out`, ascending.
    pub fn alive_entities(&self, out: &mut Vec<EntityId>) {
        self.allocator.alive_ids(out);
    }

    pub fn entity_count(&self) -> usize {
        self.allocator.count()
    }

    pub(crate) fn storage(&self, type_id: TypeId) -> Option<&dyn ComponentStorage> {
        self.storages.get(&type_id).map(|s| s.as_ref())
    }

    fn typed_storage<T: 'static>(&self) -> Option<&Storage<T>> {
        self.storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<Storage<T>>()
    }

    fn typed_storage_mut<T: 'static>(&mut self) -> Option<&mut Storage<T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<Storage<T>>()
    }

    fn storage_mut_or_insert<T: 'static>(&mut self) -> &mut Storage<T> {
        let storage = self
            .storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Storage::<T>::new()) as Box<dyn ComponentStorage>);
        match storage.as_any_mut().downcast_mut::<Storage<T>>() {
            Some(typed) => typed,
            None => unreachable!("storage keyed by TypeId::of::<T>() holds Storage<T>"),
        }
    }
}
