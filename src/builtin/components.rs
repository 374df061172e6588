//! Swarm components.

use glam::DVec2;

use crate::component::{Component, StorageType};
use crate::World;

/// World-space position
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl From<DVec2> for Position {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl Component for Position {}

/// Displacement per millisecond
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Speed in pixels per millisecond
    pub fn magnitude(&self) -> f64 {
        self.as_dvec2().length()
    }
}

impl From<DVec2> for Velocity {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl Component for Velocity {}

/// Radius / half-extent used for drawing and wrapping
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub value: f64,
}

impl Size {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Component for Size {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Box,
    Circle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    pub primitive: Primitive,
}

impl Shape {
    pub fn new(primitive: Primitive) -> Self {
        Self { primitive }
    }
}

impl Component for Shape {}

/// Marks an entity as drawable
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Renderable;

impl Component for Renderable {
    const STORAGE: StorageType = StorageType::Tag;
}

/// Wall-clock time (ms) at which the entity is removed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Expiry {
    pub at_ms: f64,
}

impl Expiry {
    pub fn at(at_ms: f64) -> Self {
        Self { at_ms }
    }

    pub fn is_due(&self, wall_time_ms: f64) -> bool {
        self.at_ms <= wall_time_ms
    }
}

impl Component for Expiry {}

/// Register every swarm component kind. Idempotent.
pub fn register_components(world: &mut World) {
    world.register::<Position>();
    world.register::<Velocity>();
    world.register::<Size>();
    world.register::<Shape>();
    world.register::<Renderable>();
    world.register::<Expiry>();
}
