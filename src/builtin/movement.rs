//! Linear integration with optional toroidal wraparound.

use crate::builtin::components::{Position, Size, Velocity};
use crate::config::{BoundaryPolicy, Viewport};
use crate::error::Result;
use crate::query::QueryHandle;
use crate::system::{System, SystemContext};
use crate::World;

/// `position + velocity * delta_ms`
pub fn integrate(position: Position, velocity: Velocity, delta_ms: f64) -> Position {
    Position::from(position.as_dvec2() + velocity.as_dvec2() * delta_ms)
}

/// Move a position that left the viewport by more than `size` to the
/// opposite side. Each axis is checked independently, x first.
pub fn wrap(mut position: Position, size: f64, viewport: Viewport) -> Position {
    let width = f64::from(viewport.width);
    let height = f64::from(viewport.height);

    if position.x > width + size {
        position.x = -size;
    }
    if position.x < -size {
        position.x = width + size;
    }
    if position.y > height + size {
        position.y = -size;
    }
    if position.y < -size {
        position.y = height + size;
    }
    position
}

pub struct MovementSystem {
    viewport: Viewport,
    policy: BoundaryPolicy,
    query: Option<QueryHandle>,
}

impl MovementSystem {
    pub fn new(viewport: Viewport, policy: BoundaryPolicy) -> Self {
        Self {
            viewport,
            policy,
            query: None,
        }
    }

    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }
}

impl System for MovementSystem {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn declare(&mut self, world: &mut World) -> Result<Vec<QueryHandle>> {
        // Size is optional; entities without one move but never wrap
        let query = world.register_query::<(Velocity, Position)>()?;
        self.query = Some(query);
        Ok(vec![query])
    }

    fn run(&mut self, ctx: &mut SystemContext<'_>) -> Result<()> {
        let Some(query) = self.query else {
            return Ok(());
        };
        let delta_ms = ctx.delta_ms();

        for entity in ctx.query(query)? {
            let world = ctx.world_mut();
            let Some(velocity) = world.get::<Velocity>(entity)?.copied() else {
                continue;
            };
            let size = world.get::<Size>(entity)?.map(|s| s.value);
            let Some(position) = world.get_mut::<Position>(entity)? else {
                continue;
            };

            let mut next = integrate(*position, velocity, delta_ms);
            if let (BoundaryPolicy::Wrap, Some(size)) = (self.policy, size) {
                next = wrap(next, size, self.viewport);
            }
            *position = next;
        }
        Ok(())
    }
}
