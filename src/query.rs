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


//! Query engine with eagerly maintained membership
//!
//! A query is keyed by the exact set of component kinds it requires. The
//! engine is told about every presence-mask change by the world, so a query's
//! entity list is always current when a system reads it. Members are kept in
//! the order they started qualifying.

use ahash::{AHashMap, AHashSet};
use smallvec::{smallvec, SmallVec};

use crate::bitset::BitSet;
use crate::component::{Component, ComponentKind, ComponentRegistry};
use crate::entity::EntityId;
use crate::error::{EcsError, Result};

const MAX_FILTER_COMPONENTS: usize = 8;

/// Kind set resolved from a component tuple
pub type KindSet = SmallVec<[ComponentKind; MAX_FILTER_COMPONENTS]>;

/// Query filter trait for component tuples
pub trait QueryFilter {
    /// Resolve the required component kinds
    fn kinds(registry: &ComponentRegistry) -> Result<KindSet>;
}

macro_rules! impl_query_filter {
    ($($T:ident),*) => {
        impl<$($T: Component),*> QueryFilter for ($($T,)*) {
            fn kinds(registry: &ComponentRegistry) -> Result<KindSet> {
                Ok(smallvec![$(registry.kind_of::<$T>()?),*])
            }
        }
    };
}

impl_query_filter!(A);
impl_query_filter!(A, B);
impl_query_filter!(A, B, C);
impl_query_filter!(A, B, C, D);
impl_query_filter!(A, B, C, D, E);
impl_query_filter!(A, B, C, D, E, F);
impl_query_filter!(A, B, C, D, E, F, G);
impl_query_filter!(A, B, C, D, E, F, G, H);

/// Handle to a registered query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryHandle(pub(crate) u32);

impl QueryHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Cached membership for one kind set
#[derive(Debug)]
pub struct CachedQuery {
    required: BitSet,
    entities: Vec<EntityId>,
    members: AHashSet<EntityId>,
}

impl CachedQuery {
    fn new(required: BitSet) -> Self {
        Self {
            required,
            entities: Vec::new(),
            members: AHashSet::new(),
        }
    }

    /// Bring `entity` in or out of the result set given its current mask.
    fn sync(&mut self, entity: EntityId, mask: &BitSet) {
        let qualifies = mask.contains_all(&self.required);
        let present = self.members.contains(&entity);

        if qualifies && !present {
            self.members.insert(entity);
            self.entities.push(entity);
        } else if !qualifies && present {
            self.evict(entity);
        }
    }

    fn evict(&mut self, entity: EntityId) {
        if self.members.remove(&entity) {
            // Order-preserving removal; result order is part of the contract
            if let Some(pos) = self.entities.iter().position(|&e| e == entity) {
                self.entities.remove(pos);
            }
        }
    }

    pub fn required(&self) -> &BitSet {
        &self.required
    }

    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }
}

/// All registered queries of a world
#[derive(Debug, Default)]
pub struct QueryEngine {
    queries: Vec<CachedQuery>,
    by_signature: AHashMap<BitSet, QueryHandle>,
}

impl QueryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a query for `required`, seeding it from `existing` entities.
    ///
    /// `existing` must be given in creation order. Identical kind sets share
    /// one handle.
    pub fn register<'a, I>(&mut self, required: BitSet, existing: I) -> QueryHandle
    where
        I: IntoIterator<Item = (EntityId, &'a BitSet)>,
    {
        if let Some(&handle) = self.by_signature.get(&required) {
            return handle;
        }

        let mut query = CachedQuery::new(required.clone());
        for (entity, mask) in existing {
            query.sync(entity, mask);
        }

        let handle = QueryHandle(self.queries.len() as u32);
        tracing::debug!(
            query = handle.0,
            kinds = required.len(),
            initial = query.entities.len(),
            "registered query"
        );
        self.queries.push(query);
        self.by_signature.insert(required, handle);
        handle
    }

    /// Called by the world whenever an entity's presence mask changes.
    pub fn on_mask_changed(&mut self, entity: EntityId, mask: &BitSet) {
        for query in &mut self.queries {
            query.sync(entity, mask);
        }
    }

    /// Called by the world when an entity is removed.
    pub fn on_removed(&mut self, entity: EntityId) {
        for query in &mut self.queries {
            query.evict(entity);
        }
    }

    /// Current members of a query in qualification order
    pub fn results(&self, handle: QueryHandle) -> Result<&[EntityId]> {
        self.get(handle).map(CachedQuery::entities)
    }

    pub fn get(&self, handle: QueryHandle) -> Result<&CachedQuery> {
        self.queries
            .get(handle.index())
            .ok_or(EcsError::UnknownQuery(handle))
    }

    /// Number of registered queries
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QueryHandle, &CachedQuery)> {
        self.queries
            .iter()
            .enumerate()
            .map(|(i, q)| (QueryHandle(i as u32), q))
    }

    /// Get query cache statistics for diagnostics
    pub fn stats(&self) -> QueryCacheStats {
        QueryCacheStats {
            num_cached_queries: self.queries.len(),
            total_cached_entities: self.queries.iter().map(|q| q.entities.len()).sum(),
        }
    }
}

/// Statistics about the query cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryCacheStats {
    /// Number of unique kind sets registered
    pub num_cached_queries: usize,
    /// Sum of result lengths across all queries
    pub total_cached_entities: usize,
}
