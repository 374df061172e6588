//! Type-erased component columns.
//!
//! One column per table-stored kind, indexed by `ComponentKind`. Values live in
//! a `SecondaryMap` keyed by the entity's generational id, so a stale id can
//! never read another entity's slot.

use std::any::Any;

use slotmap::SecondaryMap;

use crate::component::Component;
use crate::entity::EntityId;

/// Object-safe view of a `Column<T>`
pub trait AnyColumn: Send {
    /// Drop the value stored for `entity`. Returns whether one existed.
    fn remove(&mut self, entity: EntityId) -> bool;

    fn len(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Sparse storage for a single component type
pub struct Column<T: Component> {
    values: SecondaryMap<EntityId, T>,
}

impl<T: Component> Column<T> {
    pub fn new() -> Self {
        Self {
            values: SecondaryMap::new(),
        }
    }

    /// Insert or replace; returns the previous value.
    pub fn insert(&mut self, entity: EntityId, value: T) -> Option<T> {
        self.values.insert(entity, value)
    }

    pub fn get(&self, entity: EntityId) -> Option<&T> {
        self.values.get(entity)
    }

    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        self.values.get_mut(entity)
    }

    pub fn take(&mut self, entity: EntityId) -> Option<T> {
        self.values.remove(entity)
    }
}

impl<T: Component> Default for Column<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> AnyColumn for Column<T> {
    fn remove(&mut self, entity: EntityId) -> bool {
        self.values.remove(entity).is_some()
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Downcast helpers
pub(crate) fn downcast_ref<'a, T: Component>(
    column: &'a (dyn AnyColumn + 'static),
) -> Option<&'a Column<T>> {
    column.as_any().downcast_ref::<Column<T>>()
}

pub(crate) fn downcast_mut<'a, T: Component>(
    column: &'a mut (dyn AnyColumn + 'static),
) -> Option<&'a mut Column<T>> {
    column.as_any_mut().downcast_mut::<Column<T>>()
}
