//! Tick executor with per-system failure isolation and timing

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

#[cfg(feature = "profiling")]
use tracing::info_span;

use crate::command::CommandBuffer;
use crate::error::{EcsError, Result, SystemFailure};
use crate::schedule::Schedule;
use crate::system::{SystemContext, SystemId};
use crate::World;

/// System execution profiler
#[derive(Debug, Clone)]
pub struct SystemStats {
    pub min: Duration,
    pub max: Duration,
    pub avg: Duration,
    /// Calls since the profiler was created or cleared, not just the window
    pub call_count: u64,
}

/// Samples kept per system by default
pub const DEFAULT_PROFILER_WINDOW: usize = 120;

#[derive(Default)]
struct SystemSamples {
    recent: VecDeque<Duration>,
    calls: u64,
}

/// System profiler for collecting timing data.
///
/// Keeps a rolling window of the most recent durations per system, so a
/// frame loop that never ends holds a fixed amount of timing data.
pub struct SystemProfiler {
    timings: FxHashMap<SystemId, SystemSamples>,
    max_samples: usize,
}

impl Default for SystemProfiler {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProfiler {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_PROFILER_WINDOW)
    }

    pub fn with_window(max_samples: usize) -> Self {
        Self {
            timings: FxHashMap::default(),
            max_samples: max_samples.max(1),
        }
    }

    pub fn record_execution(&mut self, id: SystemId, duration: Duration) {
        let samples = self.timings.entry(id).or_default();
        samples.calls += 1;
        samples.recent.push_back(duration);
        if samples.recent.len() > self.max_samples {
            samples.recent.pop_front();
        }
    }

    /// Stats over the retained window
    pub fn get_stats(&self, id: SystemId) -> Option<SystemStats> {
        let samples = self.timings.get(&id)?;
        let min = *samples.recent.iter().min()?;
        let max = *samples.recent.iter().max()?;
        let avg = samples.recent.iter().sum::<Duration>() / samples.recent.len() as u32;

        Some(SystemStats {
            min,
            max,
            avg,
            call_count: samples.calls,
        })
    }

    /// Durations currently held for `id`
    pub fn sample_count(&self, id: SystemId) -> usize {
        self.timings.get(&id).map_or(0, |s| s.recent.len())
    }

    pub fn clear(&mut self) {
        self.timings.clear();
    }
}

/// Per-system timing data for a single tick
#[derive(Debug, Clone)]
pub struct SystemTiming {
    pub name: &'static str,
    pub duration: Duration,
    pub failed: bool,
}

/// Execution profile for a tick
#[derive(Debug, Clone)]
pub struct ExecutionProfile {
    pub tick: u64,
    pub delta_ms: f64,
    pub wall_time_ms: f64,
    pub total_time: Duration,
    pub system_timings: Vec<SystemTiming>,
}

/// Runs a schedule's systems, one tick at a time
#[derive(Default)]
pub struct Executor {
    pub profiler: SystemProfiler,
    ticks: u64,
    last_profile: Option<ExecutionProfile>,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute every system once, in registration order.
    ///
    /// A failing step (error or panic) is logged and recorded, and the
    /// remaining systems still run. After the last system, any failures are
    /// returned together as [`EcsError::SystemStepFailure`].
    pub fn tick(
        &mut self,
        schedule: &mut Schedule,
        world: &mut World,
        delta_ms: f64,
        wall_time_ms: f64,
    ) -> Result<ExecutionProfile> {
        #[cfg(feature = "profiling")]
        let _span = info_span!("executor.tick", tick = self.ticks, delta_ms).entered();

        let tick_start = Instant::now();
        let mut system_timings = Vec::with_capacity(schedule.systems.len());
        let mut failures = Vec::new();

        for (index, entry) in schedule.systems.iter_mut().enumerate() {
            let id = SystemId(index as u32);
            let name = entry.system.name();

            #[cfg(feature = "profiling")]
            let _system_span = info_span!("system", name).entered();

            let mut commands = CommandBuffer::new();
            let start = Instant::now();
            let outcome = {
                let mut ctx = SystemContext::new(
                    world,
                    &mut commands,
                    &entry.queries,
                    name,
                    delta_ms,
                    wall_time_ms,
                );
                catch_unwind(AssertUnwindSafe(|| entry.system.run(&mut ctx)))
            };

            let mut failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(err)) => Some(err.to_string()),
                Err(payload) => Some(panic_message(payload.as_ref())),
            };

            // Structural changes requested by the step land before the next system
            if let Err(err) = commands.apply(world) {
                failure.get_or_insert_with(|| format!("deferred commands: {err}"));
            }

            let duration = start.elapsed();
            self.profiler.record_execution(id, duration);
            system_timings.push(SystemTiming {
                name,
                duration,
                failed: failure.is_some(),
            });

            if let Some(message) = failure {
                tracing::error!(system = name, error = %message, "system step failed");
                failures.push(SystemFailure {
                    system: name,
                    message,
                });
            }
        }

        let profile = ExecutionProfile {
            tick: self.ticks,
            delta_ms,
            wall_time_ms,
            total_time: tick_start.elapsed(),
            system_timings,
        };
        self.ticks += 1;
        self.last_profile = Some(profile.clone());

        if failures.is_empty() {
            Ok(profile)
        } else {
            Err(EcsError::SystemStepFailure(failures))
        }
    }

    /// Number of ticks executed so far
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Profile of the most recent tick, including failed ones
    pub fn last_profile(&self) -> Option<&ExecutionProfile> {
        self.last_profile.as_ref()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::query::QueryHandle;
    use crate::system::System;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Hits(u32);
    impl Component for Hits {}

    /// Records its name into a shared log, optionally failing
    struct Probe {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        mode: Mode,
    }

    #[derive(Clone, Copy)]
    enum Mode {
        Ok,
        Fail,
        Panic,
    }

    impl System for Probe {
        fn name(&self) -> &'static str {
            self.name
        }
        fn declare(&mut self, _world: &mut World) -> Result<Vec<QueryHandle>> {
            Ok(Vec::new())
        }
        fn run(&mut self, _ctx: &mut SystemContext<'_>) -> Result<()> {
            self.log.lock().push(self.name);
            match self.mode {
                Mode::Ok => Ok(()),
                Mode::Fail => Err(EcsError::SystemFailed("probe failure".into())),
                Mode::Panic => panic!("probe panic"),
            }
        }
    }

    fn schedule_with(
        world: &mut World,
        log: &Arc<Mutex<Vec<&'static str>>>,
        modes: &[(&'static str, Mode)],
    ) -> Schedule {
        let mut schedule = Schedule::new();
        for &(name, mode) in modes {
            schedule
                .add_system(
                    world,
                    Box::new(Probe {
                        name,
                        log: Arc::clone(log),
                        mode,
                    }),
                )
                .unwrap();
        }
        schedule
    }

    #[test]
    fn test_runs_in_registration_order() {
        let mut world = World::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut schedule = schedule_with(
            &mut world,
            &log,
            &[("a", Mode::Ok), ("b", Mode::Ok), ("c", Mode::Ok)],
        );

        let mut executor = Executor::new();
        let profile = executor.tick(&mut schedule, &mut world, 16.0, 16.0).unwrap();
        executor.tick(&mut schedule, &mut world, 16.0, 32.0).unwrap();

        assert_eq!(*log.lock(), vec!["a", "b", "c", "a", "b", "c"]);
        assert_eq!(profile.system_timings.len(), 3);
        assert_eq!(executor.tick_count(), 2);
        assert_eq!(
            executor.profiler.get_stats(SystemId(1)).map(|s| s.call_count),
            Some(2)
        );
    }

    #[test]
    fn test_failures_are_isolated_and_reported_after_all_systems() {
        let mut world = World::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut schedule = schedule_with(
            &mut world,
            &log,
            &[("fails", Mode::Fail), ("panics", Mode::Panic), ("last", Mode::Ok)],
        );

        let mut executor = Executor::new();
        let err = executor
            .tick(&mut schedule, &mut world, 16.0, 16.0)
            .unwrap_err();

        assert_eq!(*log.lock(), vec!["fails", "panics", "last"]);
        let EcsError::SystemStepFailure(failures) = &err else {
            panic!("expected step failure, got {err:?}");
        };
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].system, "fails");
        assert_eq!(failures[1].system, "panics");
        assert!(failures[1].message.contains("probe panic"));

        let profile = executor.last_profile().unwrap();
        assert!(!profile.system_timings[2].failed);

        // The next tick runs normally
        log.lock().clear();
        let _ = executor.tick(&mut schedule, &mut world, 16.0, 32.0);
        assert_eq!(log.lock().len(), 3);
    }

    #[test]
    fn test_profiler_window_is_bounded() {
        let mut profiler = SystemProfiler::with_window(4);
        for ms in 1..=10 {
            profiler.record_execution(SystemId(0), Duration::from_millis(ms));
        }

        assert_eq!(profiler.sample_count(SystemId(0)), 4);
        let stats = profiler.get_stats(SystemId(0)).unwrap();
        assert_eq!(stats.call_count, 10);
        assert_eq!(stats.min, Duration::from_millis(7));
        assert_eq!(stats.max, Duration::from_millis(10));
        assert_eq!(profiler.sample_count(SystemId(1)), 0);
    }

    #[test]
    fn test_long_running_executor_keeps_a_fixed_window() {
        let mut world = World::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut schedule = schedule_with(&mut world, &log, &[("only", Mode::Ok)]);

        let mut executor = Executor::new();
        for tick in 0..1000 {
            executor
                .tick(&mut schedule, &mut world, 16.0, tick as f64 * 16.0)
                .unwrap();
            log.lock().clear();
        }

        assert_eq!(
            executor.profiler.sample_count(SystemId(0)),
            DEFAULT_PROFILER_WINDOW
        );
        assert_eq!(
            executor.profiler.get_stats(SystemId(0)).map(|s| s.call_count),
            Some(1000)
        );
    }

    struct Spawner;
    impl System for Spawner {
        fn name(&self) -> &'static str {
            "spawner"
        }
        fn declare(&mut self, _world: &mut World) -> Result<Vec<QueryHandle>> {
            Ok(Vec::new())
        }
        fn run(&mut self, ctx: &mut SystemContext<'_>) -> Result<()> {
            ctx.commands().spawn((Hits(0),));
            Ok(())
        }
    }

    struct Counter {
        query: Option<QueryHandle>,
        seen: Arc<Mutex<usize>>,
    }
    impl System for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }
        fn declare(&mut self, world: &mut World) -> Result<Vec<QueryHandle>> {
            let q = world.register_query::<(Hits,)>()?;
            self.query = Some(q);
            Ok(vec![q])
        }
        fn run(&mut self, ctx: &mut SystemContext<'_>) -> Result<()> {
            if let Some(q) = self.query {
                *self.seen.lock() = ctx.query(q)?.len();
            }
            Ok(())
        }
    }

    #[test]
    fn test_deferred_commands_land_before_next_system() {
        let mut world = World::new();
        world.register::<Hits>();
        let seen = Arc::new(Mutex::new(0));

        let mut schedule = Schedule::new();
        schedule.add_system(&mut world, Box::new(Spawner)).unwrap();
        schedule
            .add_system(
                &mut world,
                Box::new(Counter {
                    query: None,
                    seen: Arc::clone(&seen),
                }),
            )
            .unwrap();

        let mut executor = Executor::new();
        executor.tick(&mut schedule, &mut world, 16.0, 16.0).unwrap();
        assert_eq!(*seen.lock(), 1);
        assert_eq!(world.entity_count(), 1);
    }
}
