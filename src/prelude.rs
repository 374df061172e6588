//! Convenient re-exports of commonly used types.
//!
//! The prelude can be imported with:
//! ```
//! use swarm_ecs::prelude::*;
//! ```

pub use crate::app::App;
pub use crate::builtin::{
    Expiry, ExpirySystem, MovementSystem, PointerDown, Position, Primitive, RenderSystem,
    Renderable, Shape, Size, SwarmPlugin, Velocity,
};
pub use crate::command::CommandBuffer;
pub use crate::component::{Component, StorageType};
pub use crate::config::{BoundaryPolicy, SimulationConfig, Viewport};
pub use crate::debug::{Diagnostics, WorldInspector};
pub use crate::entity::EntityId;
pub use crate::error::{EcsError, Result};
pub use crate::executor::Executor;
pub use crate::plugin::Plugin;
pub use crate::query::QueryHandle;
pub use crate::schedule::Schedule;
pub use crate::surface::{DrawCommand, RecordingSurface, Surface};
pub use crate::system::{System, SystemContext};
pub use crate::time::{Clock, FrameDriver, ManualClock, MonotonicClock};
pub use crate::world::World;
