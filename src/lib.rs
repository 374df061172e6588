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

//! Swarm ECS - a small Entity Component System driving a frame loop
//!
//! Typed component columns with presence bitsets, eagerly cached queries,
//! an ordered scheduler with per-system failure isolation, and the swarm
//! simulation (movement with wraparound, rendering, timed expiry) built on
//! top of it.
//!
//! ```
//! use swarm_ecs::prelude::*;
//!
//! let surface = RecordingSurface::new();
//! let mut app = App::new(SimulationConfig::wrapping());
//! app.add_plugin(SwarmPlugin::new(Box::new(surface.clone()))).unwrap();
//!
//! app.pointer_down(100.0, 100.0);
//! app.tick(16.0, 16.0).unwrap();
//! assert_eq!(app.world.entity_count(), 40);
//! // Background plus one shape per entity
//! assert_eq!(surface.len(), 41);
//! ```

pub mod app;
pub mod bitset;
pub mod builtin;
pub mod command;
pub mod component;
pub mod config;
pub mod debug;
pub mod entity;
pub mod error;
pub mod executor;
pub mod plugin;
pub mod prelude;
pub mod query;
pub mod schedule;
pub mod spawn;
pub mod storage;
pub mod surface;
pub mod system;
pub mod time;
pub mod world;


pub use app::*;
pub use command::*;
pub use component::*;
pub use config::*;
pub use entity::*;
pub use error::*;
pub use executor::*;
pub use plugin::*;
pub use query::*;
pub use schedule::*;
pub use system::*;
pub use time::*;
pub use world::*;
