//! Ordered system registration
//!
//! Systems run in the order they were added. Order matters: a system reads
//! whatever the systems before it wrote during the same tick.

use crate::error::{EcsError, Result};
use crate::query::QueryHandle;
use crate::system::{BoxedSystem, System, SystemId};
use crate::World;

/// A system together with the queries it declared
pub struct RegisteredSystem {
    pub(crate) system: BoxedSystem,
    pub(crate) queries: Vec<QueryHandle>,
}

impl RegisteredSystem {
    pub fn name(&self) -> &'static str {
        self.system.name()
    }

    pub fn queries(&self) -> &[QueryHandle] {
        &self.queries
    }
}

/// Complete execution schedule
#[derive(Default)]
pub struct Schedule {
    pub(crate) systems: Vec<RegisteredSystem>,
}

impl Schedule {
    /// Create an empty schedule
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a system, letting it declare its queries against `world`.
    pub fn add_system(&mut self, world: &mut World, mut system: BoxedSystem) -> Result<SystemId> {
        let queries = system.declare(world)?;
        self.add_system_with_queries(world, system, queries)
    }

    /// Append a system with an explicit query list.
    ///
    /// Every handle must have been issued by `world`.
    pub fn add_system_with_queries(
        &mut self,
        world: &World,
        system: BoxedSystem,
        queries: Vec<QueryHandle>,
    ) -> Result<SystemId> {
        for &query in &queries {
            world.queries().get(query)?;
        }

        let id = SystemId(self.systems.len() as u32);
        tracing::debug!(
            system = system.name(),
            id = id.0,
            queries = queries.len(),
            "registered system"
        );
        self.systems.push(RegisteredSystem { system, queries });
        Ok(id)
    }

    /// Get mutable reference to a system by name
    pub fn get_system_mut(&mut self, name: &str) -> Option<&mut (dyn System + 'static)> {
        self.systems
            .iter_mut()
            .find(|entry| entry.system.name() == name)
            .map(|entry| entry.system.as_mut())
    }

    pub fn get(&self, id: SystemId) -> Result<&RegisteredSystem> {
        self.systems
            .get(id.0 as usize)
            .ok_or_else(|| EcsError::SystemFailed(format!("no system with id {}", id.0)))
    }

    /// Names in execution order
    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(RegisteredSystem::name).collect()
    }

    /// Total number of registered systems
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::system::SystemContext;

    struct Tagged;
    impl Component for Tagged {}

    struct MockSystem(&'static str);
    impl System for MockSystem {
        fn name(&self) -> &'static str {
            self.0
        }
        fn declare(&mut self, world: &mut World) -> Result<Vec<QueryHandle>> {
            Ok(vec![world.register_query::<(Tagged,)>()?])
        }
        fn run(&mut self, _ctx: &mut SystemContext<'_>) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_registration_order_is_kept() -> Result<()> {
        let mut world = World::new();
        world.register::<Tagged>();

        let mut schedule = Schedule::new();
        let first = schedule.add_system(&mut world, Box::new(MockSystem("first")))?;
        let second = schedule.add_system(&mut world, Box::new(MockSystem("second")))?;

        assert_eq!(first, SystemId(0));
        assert_eq!(second, SystemId(1));
        assert_eq!(schedule.system_names(), vec!["first", "second"]);
        assert_eq!(schedule.get(first)?.queries().len(), 1);
        assert!(schedule.get_system_mut("second").is_some());
        Ok(())
    }

    #[test]
    fn test_unknown_kind_fails_at_registration() {
        let mut world = World::new();
        let mut schedule = Schedule::new();
        let result = schedule.add_system(&mut world, Box::new(MockSystem("early")));
        assert!(matches!(result, Err(EcsError::UnknownComponentKind(_))));
        assert_eq!(schedule.system_count(), 0);
    }

    #[test]
    fn test_foreign_query_handle_is_rejected() -> Result<()> {
        let mut other = World::new();
        other.register::<Tagged>();
        let foreign = other.register_query::<(Tagged,)>()?;

        let world = World::new();
        let mut schedule = Schedule::new();
        let result = schedule.add_system_with_queries(
            &world,
            Box::new(MockSystem("stray")),
            vec![foreign],
        );
        assert_eq!(result, Err(EcsError::UnknownQuery(foreign)));
        Ok(())
    }
}
