//! Per-tick redraw of every renderable entity.

use crate::builtin::components::{Position, Primitive, Renderable, Shape, Size};
use crate::config::Viewport;
use crate::error::Result;
use crate::query::QueryHandle;
use crate::surface::{self, DrawCommand, Surface};
use crate::system::{System, SystemContext};
use crate::World;

/// Draw command for one entity
pub fn draw_shape(primitive: Primitive, position: Position, size: f64) -> DrawCommand {
    match primitive {
        Primitive::Box => surface::box_primitive(position.x, position.y, size),
        Primitive::Circle => surface::circle_primitive(position.x, position.y, size),
    }
}

/// Clears the viewport, then draws entities in query order.
///
/// Read-only with respect to components.
pub struct RenderSystem {
    viewport: Viewport,
    surface: Box<dyn Surface>,
    query: Option<QueryHandle>,
}

impl RenderSystem {
    pub fn new(viewport: Viewport, surface: Box<dyn Surface>) -> Self {
        Self {
            viewport,
            surface,
            query: None,
        }
    }
}

impl System for RenderSystem {
    fn name(&self) -> &'static str {
        "render"
    }

    fn declare(&mut self, world: &mut World) -> Result<Vec<QueryHandle>> {
        let query = world.register_query::<(Renderable, Shape, Position, Size)>()?;
        self.query = Some(query);
        Ok(vec![query])
    }

    fn run(&mut self, ctx: &mut SystemContext<'_>) -> Result<()> {
        surface::background(self.viewport).draw_on(self.surface.as_mut());

        let Some(query) = self.query else {
            return Ok(());
        };
        let world = ctx.world();
        for entity in ctx.query(query)? {
            let (Some(shape), Some(position), Some(size)) = (
                world.get::<Shape>(entity)?,
                world.get::<Position>(entity)?,
                world.get::<Size>(entity)?,
            ) else {
                continue;
            };
            draw_shape(shape.primitive, *position, size.value).draw_on(self.surface.as_mut());
        }
        Ok(())
    }
}
