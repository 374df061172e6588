//! System trait and per-step context

use crate::command::CommandBuffer;
use crate::entity::EntityId;
use crate::error::{EcsError, Result};
use crate::query::QueryHandle;
use crate::World;

/// System ID (registration index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(pub u32);

/// System trait
pub trait System: Send {
    /// Get system name
    fn name(&self) -> &'static str;

    /// Register the queries this system iterates.
    ///
    /// Called once when the system is added to a schedule. Unregistered
    /// component kinds fail here, before any tick runs.
    fn declare(&mut self, world: &mut World) -> Result<Vec<QueryHandle>>;

    /// Run one step
    fn run(&mut self, ctx: &mut SystemContext<'_>) -> Result<()>;
}

/// Boxed system
pub type BoxedSystem = Box<dyn System>;

/// Everything a system step may touch
pub struct SystemContext<'a> {
    world: &'a mut World,
    commands: &'a mut CommandBuffer,
    declared: &'a [QueryHandle],
    system: &'static str,
    delta_ms: f64,
    wall_time_ms: f64,
}

impl<'a> SystemContext<'a> {
    pub fn new(
        world: &'a mut World,
        commands: &'a mut CommandBuffer,
        declared: &'a [QueryHandle],
        system: &'static str,
        delta_ms: f64,
        wall_time_ms: f64,
    ) -> Self {
        Self {
            world,
            commands,
            declared,
            system,
            delta_ms,
            wall_time_ms,
        }
    }

    /// Milliseconds since the previous tick
    pub fn delta_ms(&self) -> f64 {
        self.delta_ms
    }

    /// Monotonic clock reading for this tick
    pub fn wall_time_ms(&self) -> f64 {
        self.wall_time_ms
    }

    /// Snapshot of a declared query's members.
    ///
    /// The copy is taken on entry, so structural changes made while iterating
    /// it cannot disturb the iteration.
    pub fn query(&self, handle: QueryHandle) -> Result<Vec<EntityId>> {
        if !self.declared.contains(&handle) {
            return Err(EcsError::UndeclaredQuery {
                system: self.system,
                query: handle,
            });
        }
        self.world.snapshot(handle)
    }

    pub fn world(&self) -> &World {
        &*self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut *self.world
    }

    /// Deferred commands, applied right after this step returns
    pub fn commands(&mut self) -> &mut CommandBuffer {
        &mut *self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;

    struct Counter(u32);
    impl Component for Counter {}

    #[derive(Default)]
    struct CountingSystem {
        query: Option<QueryHandle>,
        seen: usize,
    }

    impl System for CountingSystem {
        fn name(&self) -> &'static str {
            "counting_system"
        }

        fn declare(&mut self, world: &mut World) -> Result<Vec<QueryHandle>> {
            let query = world.register_query::<(Counter,)>()?;
            self.query = Some(query);
            Ok(vec![query])
        }

        fn run(&mut self, ctx: &mut SystemContext<'_>) -> Result<()> {
            let Some(query) = self.query else {
                return Ok(());
            };
            for entity in ctx.query(query)? {
                if let Some(counter) = ctx.world_mut().get_mut::<Counter>(entity)? {
                    counter.0 += 1;
                }
                self.seen += 1;
            }
            Ok(())
        }
    }

    #[test]
    fn test_system_run_signature() -> Result<()> {
        let mut world = World::new();
        world.register::<Counter>();
        let entity = world.spawn((Counter(0),))?;

        let mut system = CountingSystem::default();
        let declared = system.declare(&mut world)?;
        let mut commands = CommandBuffer::new();
        let mut ctx =
            SystemContext::new(&mut world, &mut commands, &declared, system.name(), 16.0, 16.0);
        system.run(&mut ctx)?;

        assert_eq!(system.seen, 1);
        assert_eq!(world.get::<Counter>(entity)?.map(|c| c.0), Some(1));
        Ok(())
    }

    #[test]
    fn test_undeclared_query_is_rejected() -> Result<()> {
        let mut world = World::new();
        world.register::<Counter>();
        let query = world.register_query::<(Counter,)>()?;

        let mut commands = CommandBuffer::new();
        let ctx = SystemContext::new(&mut world, &mut commands, &[], "nosy", 0.0, 0.0);
        assert_eq!(
            ctx.query(query),
            Err(EcsError::UndeclaredQuery {
                system: "nosy",
                query
            })
        );
        Ok(())
    }
}
