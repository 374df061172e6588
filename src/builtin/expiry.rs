//! Timed removal.

use crate::builtin::components::Expiry;
use crate::error::Result;
use crate::query::QueryHandle;
use crate::system::{System, SystemContext};
use crate::World;

/// Despawns every entity whose [`Expiry`] is due at this tick's wall time.
///
/// Removal goes through the step's command buffer, so it is applied before
/// the next system runs.
#[derive(Default)]
pub struct ExpirySystem {
    query: Option<QueryHandle>,
}

impl ExpirySystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for ExpirySystem {
    fn name(&self) -> &'static str {
        "expiry"
    }

    fn declare(&mut self, world: &mut World) -> Result<Vec<QueryHandle>> {
        let query = world.register_query::<(Expiry,)>()?;
        self.query = Some(query);
        Ok(vec![query])
    }

    fn run(&mut self, ctx: &mut SystemContext<'_>) -> Result<()> {
        let Some(query) = self.query else {
            return Ok(());
        };
        let now = ctx.wall_time_ms();

        let mut due = Vec::new();
        for entity in ctx.query(query)? {
            if let Some(expiry) = ctx.world().get::<Expiry>(entity)? {
                if expiry.is_due(now) {
                    due.push(entity);
                }
            }
        }

        if !due.is_empty() {
            tracing::debug!(count = due.len(), wall_time_ms = now, "expiring entities");
        }
        for entity in due {
            ctx.commands().despawn(entity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandBuffer;

    #[test]
    fn test_due_entities_are_queued_for_despawn() -> Result<()> {
        let mut world = World::new();
        world.register::<Expiry>();
        let early = world.spawn((Expiry::at(100.0),))?;
        let late = world.spawn((Expiry::at(200.0),))?;

        let mut system = ExpirySystem::new();
        let declared = system.declare(&mut world)?;
        let mut commands = CommandBuffer::new();
        {
            let mut ctx =
                SystemContext::new(&mut world, &mut commands, &declared, "expiry", 16.0, 100.0);
            system.run(&mut ctx)?;
        }
        // Nothing removed until the buffer is applied
        assert!(world.is_alive(early));
        commands.apply(&mut world)?;

        assert!(!world.is_alive(early));
        assert!(world.is_alive(late));
        Ok(())
    }
}
