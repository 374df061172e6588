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


//! Component and Bundle traits, plus the registry that assigns kind ids.
//!
//! Components are data attached to entities. Each registered component type
//! gets a small, stable [`ComponentKind`] used to index presence bits and
//! storage columns, so the store never needs reflection at runtime.

use std::any::TypeId;

use ahash::AHashMap;
use smallvec::{smallvec, SmallVec};

use crate::entity::EntityId;
use crate::error::{EcsError, Result};
use crate::world::World;

/// Maximum number of components supported by Bundle implementations
pub const MAX_BUNDLE_COMPONENTS: usize = 8;

/// How a component kind is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// A value column keyed by entity
    Table,
    /// Presence bit only; the type must be zero-sized
    Tag,
}

/// Marker trait for components
///
/// Components must be 'static (no borrowed data). Zero-size markers override
/// `STORAGE` with [`StorageType::Tag`] so attaching them costs one bit.
pub trait Component: 'static + Send + Sized {
    const STORAGE: StorageType = StorageType::Table;
}

/// Registry-assigned component kind identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKind(pub u16);

impl ComponentKind {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Static description of a registered kind
#[derive(Debug, Clone)]
pub struct ComponentInfo {
    pub name: &'static str,
    pub type_id: TypeId,
    pub storage: StorageType,
}

/// Maps component types to kinds in registration order
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    by_type: AHashMap<TypeId, ComponentKind>,
    infos: Vec<ComponentInfo>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T`, returning its kind. Registering twice returns the same kind.
    pub fn register<T: Component>(&mut self) -> ComponentKind {
        let type_id = TypeId::of::<T>();
        if let Some(&kind) = self.by_type.get(&type_id) {
            return kind;
        }

        debug_assert!(
            T::STORAGE == StorageType::Table || std::mem::size_of::<T>() == 0,
            "tag component {} must be zero-sized",
            std::any::type_name::<T>()
        );

        let kind = ComponentKind(self.infos.len() as u16);
        self.infos.push(ComponentInfo {
            name: std::any::type_name::<T>(),
            type_id,
            storage: T::STORAGE,
        });
        self.by_type.insert(type_id, kind);
        kind
    }

    /// Look up the kind of an already-registered type
    pub fn kind_of<T: Component>(&self) -> Result<ComponentKind> {
        self.by_type
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or(EcsError::UnknownComponentKind(std::any::type_name::<T>()))
    }

    pub fn info(&self, kind: ComponentKind) -> Option<&ComponentInfo> {
        self.infos.get(kind.index())
    }

    /// Iterate registered kinds in registration order
    pub fn iter(&self) -> impl Iterator<Item = (ComponentKind, &ComponentInfo)> {
        self.infos
            .iter()
            .enumerate()
            .map(|(i, info)| (ComponentKind(i as u16), info))
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}

/// Bundle of components
///
/// Allows spawning entities with multiple components at once.
pub trait Bundle: Send + 'static {
    /// Resolve the kinds of every component in the bundle
    fn kinds(registry: &ComponentRegistry) -> Result<SmallVec<[ComponentKind; MAX_BUNDLE_COMPONENTS]>>
    where
        Self: Sized;

    /// Attach every component to `entity`
    fn attach_to(self, world: &mut World, entity: EntityId) -> Result<()>;
}

// Macro for tuple Bundle implementations
macro_rules! impl_bundle {
    ($($T:ident),*) => {
        impl<$($T: Component),*> Bundle for ($($T,)*) {
            fn kinds(registry: &ComponentRegistry) -> Result<SmallVec<[ComponentKind; MAX_BUNDLE_COMPONENTS]>> {
                Ok(smallvec![$(registry.kind_of::<$T>()?),*])
            }

            #[allow(non_snake_case)]
            fn attach_to(self, world: &mut World, entity: EntityId) -> Result<()> {
                let ($($T,)*) = self;
                $(world.attach(entity, $T)?;)*
                Ok(())
            }
        }
    };
}

// Implement for tuples of 1-8 components
impl_bundle!(A);
impl_bundle!(A, B);
impl_bundle!(A, B, C);
impl_bundle!(A, B, C, D);
impl_bundle!(A, B, C, D, E);
impl_bundle!(A, B, C, D, E, F);
impl_bundle!(A, B, C, D, E, F, G);
impl_bundle!(A, B, C, D, E, F, G, H);
