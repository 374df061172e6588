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


//! Command buffer for deferred structural changes
//!
//! Systems and host input record spawns, removals and attach/detach requests
//! here; the scheduler applies them at well-defined points (after a system
//! step, or before a tick starts), never in the middle of a step.

use crate::component::{Bundle, Component};
use crate::entity::EntityId;
use crate::error::{EcsError, Result};
use crate::world::World;

/// Type alias for world mutation closures
pub type CommandClosure = Box<dyn FnOnce(&mut World) -> Result<()> + Send>;

/// Deferred command for world mutations
pub enum Command {
    /// Spawn entity with closure
    Spawn(CommandClosure),

    /// Remove entity
    Despawn(EntityId),

    /// Custom world mutation
    Custom(CommandClosure),
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Spawn(_) => write!(f, "Spawn(...)"),
            Command::Despawn(e) => f.debug_tuple("Despawn").field(e).finish(),
            Command::Custom(_) => write!(f, "Custom(...)"),
        }
    }
}

/// Command buffer for deferred operations
#[derive(Default, Debug)]
pub struct CommandBuffer {
    commands: Vec<Command>,
}

impl CommandBuffer {
    /// Create new command buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    /// Queue a spawn of `bundle`
    pub fn spawn<B: Bundle>(&mut self, bundle: B) {
        self.commands.push(Command::Spawn(Box::new(move |world: &mut World| {
            world.spawn(bundle).map(|_| ())
        })));
    }

    /// Queue entity removal
    pub fn despawn(&mut self, entity: EntityId) {
        self.commands.push(Command::Despawn(entity));
    }

    /// Queue a custom world mutation
    pub fn add<F>(&mut self, f: F)
    where
        F: FnOnce(&mut World) -> Result<()> + Send + 'static,
    {
        self.commands.push(Command::Custom(Box::new(f)));
    }

    /// Queue attach command
    pub fn attach<T: Component>(&mut self, entity: EntityId, component: T) {
        self.add(move |world| world.attach(entity, component));
    }

    /// Queue detach command
    pub fn detach<T: Component>(&mut self, entity: EntityId) {
        self.add(move |world| world.detach::<T>(entity).map(|_| ()));
    }

    /// Apply all commands to the world and clear the buffer
    ///
    /// Commands that hit an already-removed entity are skipped with a warning:
    /// removal can legitimately race (an expiry and a manual despawn of the
    /// same entity). Any other failure is returned after the remaining
    /// commands have been applied.
    pub fn apply(&mut self, world: &mut World) -> Result<()> {
        let mut first_error = None;

        for command in self.commands.drain(..) {
            let outcome = match command {
                Command::Spawn(f) | Command::Custom(f) => f(world),
                Command::Despawn(entity) => world.remove(entity),
            };

            match outcome {
                Ok(()) => {}
                Err(EcsError::StaleEntity(entity)) => {
                    tracing::warn!(?entity, "deferred command targeted a removed entity; skipped");
                }
                Err(err) => {
                    tracing::error!(error = %err, "deferred command failed");
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Move all commands of `other` to the end of this buffer
    pub fn append(&mut self, other: &mut CommandBuffer) {
        self.commands.append(&mut other.commands);
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Get length
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Clear buffer
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}
