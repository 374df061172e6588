// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! World: the entity store
//!
//! Owns entity identities, their presence masks and the component columns.
//! Every structural change (attach of a new kind, detach, remove) is pushed to
//! the [`QueryEngine`] before the call returns, so no reader can observe a
//! query that disagrees with the store.

use slotmap::SlotMap;

#[cfg(feature = "profiling")]
use tracing::info_span;

use crate::bitset::BitSet;
use crate::component::{Bundle, Component, ComponentKind, ComponentRegistry, StorageType};
use crate::entity::{EntityId, EntityRecord};
use crate::error::{EcsError, Result};
use crate::query::{QueryCacheStats, QueryEngine, QueryFilter, QueryHandle};
use crate::storage::{downcast_mut, downcast_ref, AnyColumn, Column};

/// Central ECS world
pub struct World {
    /// Live entities keyed by SlotMap IDs
    entities: SlotMap<EntityId, EntityRecord>,

    /// Component type to kind mapping
    registry: ComponentRegistry,

    /// One column per table kind, indexed by `ComponentKind`; `None` for tags
    columns: Vec<Option<Box<dyn AnyColumn>>>,

    /// Cached queries, kept in sync on every structural change
    queries: QueryEngine,

    /// Next creation sequence number
    next_sequence: u64,

    /// Removed entity counter (for diagnostics)
    removed_entities: usize,
}

impl World {
    /// Create a new, empty world.
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            registry: ComponentRegistry::new(),
            columns: Vec::new(),
            queries: QueryEngine::new(),
            next_sequence: 0,
            removed_entities: 0,
        }
    }

    // ========== Component registration ==========

    /// Register a component type, returning its kind. Idempotent.
    pub fn register<T: Component>(&mut self) -> ComponentKind {
        let kind = self.registry.register::<T>();
        if self.columns.len() <= kind.index() {
            self.columns.resize_with(kind.index() + 1, || None);
        }
        if T::STORAGE == StorageType::Table && self.columns[kind.index()].is_none() {
            self.columns[kind.index()] = Some(Box::new(Column::<T>::new()));
        }
        kind
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    // ========== Entity lifecycle ==========

    /// Create an entity with no components.
    pub fn create(&mut self) -> EntityId {
        let record = EntityRecord::new(self.next_sequence);
        self.next_sequence += 1;
        let entity = self.entities.insert(record);
        // Queries over the empty kind set match every entity
        self.queries.on_mask_changed(entity, &BitSet::default());
        entity
    }

    /// Create an entity and attach every component of `bundle`.
    ///
    /// All kinds are resolved before the entity exists, so an unregistered
    /// kind leaves the world untouched.
    pub fn spawn<B: Bundle>(&mut self, bundle: B) -> Result<EntityId> {
        #[cfg(feature = "profiling")]
        let _span = info_span!("world.spawn", entities = self.entities.len()).entered();

        B::kinds(&self.registry)?;
        let entity = self.create();
        bundle.attach_to(self, entity)?;
        Ok(entity)
    }

    /// Remove an entity and all of its components.
    ///
    /// Queries drop the entity in the same call. A second removal of the same
    /// id fails with [`EcsError::StaleEntity`] and changes nothing.
    pub fn remove(&mut self, entity: EntityId) -> Result<()> {
        #[cfg(feature = "profiling")]
        let _span = info_span!("world.remove").entered();

        let record = self
            .entities
            .remove(entity)
            .ok_or(EcsError::StaleEntity(entity))?;

        for index in record.mask.ones() {
            if let Some(Some(column)) = self.columns.get_mut(index) {
                column.remove(entity);
            }
        }
        self.queries.on_removed(entity);
        self.removed_entities += 1;
        Ok(())
    }

    /// Check if an entity is alive
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.entities.contains_key(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn removed_entity_count(&self) -> usize {
        self.removed_entities
    }

    /// Iterate live entities in creation order
    pub fn entities(&self) -> Vec<EntityId> {
        let mut live: Vec<_> = self
            .entities
            .iter()
            .map(|(id, record)| (record.sequence, id))
            .collect();
        live.sort_unstable_by_key(|(sequence, _)| *sequence);
        live.into_iter().map(|(_, id)| id).collect()
    }

    // ========== Component access ==========

    /// Attach `value` to `entity`, replacing any existing value of that kind.
    pub fn attach<T: Component>(&mut self, entity: EntityId, value: T) -> Result<()> {
        let kind = self.registry.kind_of::<T>()?;
        let record = self
            .entities
            .get_mut(entity)
            .ok_or(EcsError::StaleEntity(entity))?;

        if T::STORAGE == StorageType::Table {
            let column = self
                .columns
                .get_mut(kind.index())
                .and_then(|c| c.as_deref_mut())
                .and_then(downcast_mut::<T>)
                .ok_or(EcsError::UnknownComponentKind(std::any::type_name::<T>()))?;
            column.insert(entity, value);
        }

        if !record.mask.contains(kind.index()) {
            record.mask.set(kind.index());
            self.queries.on_mask_changed(entity, &record.mask);
        }
        Ok(())
    }

    /// Detach the `T` component. Returns whether the entity had one.
    pub fn detach<T: Component>(&mut self, entity: EntityId) -> Result<bool> {
        let kind = self.registry.kind_of::<T>()?;
        let record = self
            .entities
            .get_mut(entity)
            .ok_or(EcsError::StaleEntity(entity))?;

        if !record.mask.unset(kind.index()) {
            return Ok(false);
        }
        if let Some(Some(column)) = self.columns.get_mut(kind.index()) {
            column.remove(entity);
        }
        self.queries.on_mask_changed(entity, &record.mask);
        Ok(true)
    }

    /// Get immutable reference to a component on an entity
    ///
    /// Tag components carry no value and always read as `None`; use
    /// [`World::has`] for them.
    pub fn get<T: Component>(&self, entity: EntityId) -> Result<Option<&T>> {
        if !self.entities.contains_key(entity) {
            return Err(EcsError::StaleEntity(entity));
        }
        let kind = self.registry.kind_of::<T>()?;
        Ok(self
            .columns
            .get(kind.index())
            .and_then(|c| c.as_deref())
            .and_then(downcast_ref::<T>)
            .and_then(|column| column.get(entity)))
    }

    /// Get mutable reference to a component on an entity
    pub fn get_mut<T: Component>(&mut self, entity: EntityId) -> Result<Option<&mut T>> {
        if !self.entities.contains_key(entity) {
            return Err(EcsError::StaleEntity(entity));
        }
        let kind = self.registry.kind_of::<T>()?;
        Ok(self
            .columns
            .get_mut(kind.index())
            .and_then(|c| c.as_deref_mut())
            .and_then(downcast_mut::<T>)
            .and_then(|column| column.get_mut(entity)))
    }

    /// Check if entity has a specific component. False for stale entities
    /// and unregistered kinds.
    pub fn has<T: Component>(&self, entity: EntityId) -> bool {
        match (self.registry.kind_of::<T>(), self.entities.get(entity)) {
            (Ok(kind), Some(record)) => record.mask.contains(kind.index()),
            _ => false,
        }
    }

    /// Presence mask of a live entity
    pub fn mask(&self, entity: EntityId) -> Result<&BitSet> {
        self.entities
            .get(entity)
            .map(|record| &record.mask)
            .ok_or(EcsError::StaleEntity(entity))
    }

    /// Number of live entities holding `kind`
    pub fn component_count(&self, kind: ComponentKind) -> usize {
        match self.columns.get(kind.index()) {
            Some(Some(column)) => column.len(),
            _ => self
                .entities
                .values()
                .filter(|record| record.mask.contains(kind.index()))
                .count(),
        }
    }

    // ========== Queries ==========

    /// Register (or look up) the query for the kinds of `Q`.
    pub fn register_query<Q: QueryFilter>(&mut self) -> Result<QueryHandle> {
        let kinds = Q::kinds(&self.registry)?;
        self.register_query_kinds(&kinds)
    }

    /// Register (or look up) the query for an explicit kind set.
    pub fn register_query_kinds(&mut self, kinds: &[ComponentKind]) -> Result<QueryHandle> {
        if kinds.iter().any(|kind| kind.index() >= self.registry.len()) {
            return Err(EcsError::UnknownComponentKind("<unregistered kind id>"));
        }
        let required = BitSet::from_indices(kinds.iter().map(|kind| kind.index()));

        let mut existing: Vec<_> = self
            .entities
            .iter()
            .map(|(id, record)| (record.sequence, id, &record.mask))
            .collect();
        existing.sort_unstable_by_key(|(sequence, _, _)| *sequence);

        Ok(self
            .queries
            .register(required, existing.into_iter().map(|(_, id, mask)| (id, mask))))
    }

    /// Current members of a query
    pub fn results(&self, handle: QueryHandle) -> Result<&[EntityId]> {
        self.queries.results(handle)
    }

    /// Owned copy of a query's members, safe to iterate while mutating the world
    pub fn snapshot(&self, handle: QueryHandle) -> Result<Vec<EntityId>> {
        self.queries.results(handle).map(<[EntityId]>::to_vec)
    }

    /// Number of entities currently matching a query
    pub fn query_len(&self, handle: QueryHandle) -> Result<usize> {
        self.queries.results(handle).map(<[EntityId]>::len)
    }

    pub fn queries(&self) -> &QueryEngine {
        &self.queries
    }

    pub fn query_cache_stats(&self) -> QueryCacheStats {
        self.queries.stats()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
