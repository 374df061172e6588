//! Built-in swarm components and systems

pub mod components;
pub mod expiry;
pub mod input;
pub mod movement;
pub mod render;

pub use components::{
    register_components, Expiry, Position, Primitive, Renderable, Shape, Size, Velocity,
};
pub use expiry::ExpirySystem;
pub use input::{PointerDown, PointerQueue};
pub use movement::MovementSystem;
pub use render::RenderSystem;

use crate::app::App;
use crate::error::Result;
use crate::plugin::Plugin;
use crate::surface::Surface;

/// Registers the swarm components and its three systems.
///
/// Execution order is expiry, movement, render: expired entities are gone
/// before anything moves, and render sees this tick's positions.
pub struct SwarmPlugin {
    surface: Box<dyn Surface>,
}

impl SwarmPlugin {
    pub fn new(surface: Box<dyn Surface>) -> Self {
        Self { surface }
    }
}

impl Plugin for SwarmPlugin {
    fn plugin_name(&self) -> &'static str {
        "SwarmPlugin"
    }

    fn build(self, app: &mut App) -> Result<()> {
        register_components(&mut app.world);
        let viewport = app.config().viewport;
        let boundary = app.config().boundary;

        app.add_system(Box::new(ExpirySystem::new()))?
            .add_system(Box::new(MovementSystem::new(viewport, boundary)))?
            .add_system(Box::new(RenderSystem::new(viewport, self.surface)))?;
        Ok(())
    }
}
