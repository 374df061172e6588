use crate::builtin::components::register_components;
use crate::builtin::input::{PointerDown, PointerQueue};
use crate::command::CommandBuffer;
use crate::config::SimulationConfig;
use crate::error::{EcsError, Result, SystemFailure};
use crate::executor::{ExecutionProfile, Executor};
use crate::plugin::Plugin;
use crate::schedule::Schedule;
use crate::spawn::Spawner;
use crate::system::BoxedSystem;
use crate::world::World;

/// Main application entry point
///
/// Owns the world and everything that mutates it. Input and structural
/// requests made between ticks are buffered and applied when the next tick
/// starts, before any system runs.
pub struct App {
    pub world: World,
    pub schedule: Schedule,
    executor: Executor,
    spawner: Spawner,
    config: SimulationConfig,
    pointer_events: PointerQueue,
    pending: CommandBuffer,
}

impl App {
    /// Create new application
    pub fn new(config: SimulationConfig) -> Self {
        let mut world = World::new();
        register_components(&mut world);
        Self {
            world,
            schedule: Schedule::new(),
            executor: Executor::new(),
            spawner: Spawner::new(&config),
            config,
            pointer_events: PointerQueue::new(),
            pending: CommandBuffer::new(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Add a plugin
    pub fn add_plugin<P: Plugin>(&mut self, plugin: P) -> Result<&mut Self> {
        tracing::debug!(plugin = plugin.plugin_name(), "registering plugin");
        plugin.build(self)?;
        Ok(self)
    }

    /// Add a system after every system already registered
    pub fn add_system(&mut self, system: BoxedSystem) -> Result<&mut Self> {
        self.schedule.add_system(&mut self.world, system)?;
        Ok(self)
    }

    /// Queue a pointer-down; the burst spawns when the next tick starts
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.pointer_events.push(PointerDown::new(x, y));
    }

    /// Structural changes to apply when the next tick starts
    pub fn commands(&mut self) -> &mut CommandBuffer {
        &mut self.pending
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Run one tick.
    ///
    /// Pending commands and pointer bursts are applied first, then every
    /// system once. Failures from any stage are collected and returned as a
    /// single [`EcsError::SystemStepFailure`] after the whole tick ran.
    pub fn tick(&mut self, delta_ms: f64, wall_time_ms: f64) -> Result<ExecutionProfile> {
        let mut failures = Vec::new();

        if let Err(err) = self.pending.apply(&mut self.world) {
            failures.push(SystemFailure {
                system: "commands",
                message: err.to_string(),
            });
        }

        for event in self.pointer_events.drain() {
            let burst = self
                .spawner
                .spawn_burst(&mut self.world, event.x, event.y, wall_time_ms);
            if let Err(err) = burst {
                failures.push(SystemFailure {
                    system: "spawn",
                    message: err.to_string(),
                });
            }
        }

        match self
            .executor
            .tick(&mut self.schedule, &mut self.world, delta_ms, wall_time_ms)
        {
            Ok(profile) if failures.is_empty() => Ok(profile),
            Ok(_) => Err(EcsError::SystemStepFailure(failures)),
            Err(EcsError::SystemStepFailure(step_failures)) => {
                failures.extend(step_failures);
                Err(EcsError::SystemStepFailure(failures))
            }
            Err(err) => Err(err),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}
