use std::any::{type_name, TypeId};

use smallvec::SmallVec;
use starlance_core::types::EntityId;

use super::storage::ComponentStorage;
use super::World;

/// Runtime key for a component type, used to build queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentKind {
    pub(crate) type_id: TypeId,
    name: &'static str,
}

impl ComponentKind {
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl World {
    /// Write every alive entity holding all of `kinds` to `out`, ascending.
    ///
    /// No kinds means every alive entity. A kind that was never inserted
    /// yields nothing.
    pub fn query(&self, kinds: &[ComponentKind], out: &mut Vec<EntityId>) {
        out.clear();
        if kinds.is_empty() {
            self.alive_entities(out);
            return;
        }

        let mut stores: SmallVec<[&dyn ComponentStorage; 8]> = SmallVec::new();
        for kind in kinds {
            match self.storage(kind.type_id) {
                Some(store) => stores.push(store),
                None => return,
            }
        }

        let Some(driver) = stores.iter().copied().min_by_key(|s| s.len()) else {
            return;
        };
        if driver.len() == 0 {
            return;
        }

        driver.extend_ids(out);
        out.retain(|id| stores.iter().all(|s| s.contains(*id)));
        out.sort_unstable();
    }
}
