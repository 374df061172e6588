//! Clocks and the frame driver.
//!
//! This module provides:
//! - [`Clock`] - monotonic millisecond source ([`MonotonicClock`], [`ManualClock`])
//! - [`FrameDriver`] - turns clock readings into ticks of an [`App`]
//!
//! # Examples
//!
//! ```
//! use swarm_ecs::app::App;
//! use swarm_ecs::time::{FrameDriver, ManualClock};
//!
//! let clock = ManualClock::new();
//! let mut driver = FrameDriver::new(clock.clone());
//! let mut app = App::default();
//!
//! clock.advance(16.0);
//! assert!(driver.frame(&mut app));
//! assert_eq!(driver.frame_count(), 1);
//! ```

use std::sync::Arc;
use std::time::Instant;

use crossbeam::channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

use crate::app::App;
use crate::debug::Diagnostics;
use crate::error::{EcsError, SystemFailure};

/// Monotonic millisecond source
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by `Instant`, zeroed at construction
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock advanced by hand. Clones share the same reading.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now_ms: Arc<Mutex<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        *self.now_ms.lock() += ms;
    }

    pub fn set(&self, ms: f64) {
        *self.now_ms.lock() = ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        *self.now_ms.lock()
    }
}

/// Failures of one frame, as delivered to subscribers
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub wall_time_ms: f64,
    pub failures: Vec<SystemFailure>,
}

/// Drives an [`App`] one tick per host frame.
///
/// Failures never escape [`FrameDriver::frame`]; they are forwarded to every
/// channel handed out by [`FrameDriver::subscribe`] and the loop keeps going.
pub struct FrameDriver<C: Clock> {
    clock: C,
    last_ms: f64,
    frames: u64,
    running: bool,
    diagnostics: Diagnostics,
    subscribers: Vec<Sender<FrameReport>>,
}

impl<C: Clock> FrameDriver<C> {
    pub fn new(clock: C) -> Self {
        let last_ms = clock.now_ms();
        Self {
            clock,
            last_ms,
            frames: 0,
            running: true,
            diagnostics: Diagnostics::new(),
            subscribers: Vec::new(),
        }
    }

    /// Receive a [`FrameReport`] for every frame with failures
    pub fn subscribe(&mut self) -> Receiver<FrameReport> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Run one frame. Returns whether the host should request another.
    pub fn frame(&mut self, app: &mut App) -> bool {
        if !self.running {
            return false;
        }

        let now = self.clock.now_ms();
        let delta_ms = (now - self.last_ms).max(0.0);
        self.last_ms = now;

        if let Err(err) = app.tick(delta_ms, now) {
            let failures = match err {
                EcsError::SystemStepFailure(failures) => failures,
                other => vec![SystemFailure {
                    system: "app",
                    message: other.to_string(),
                }],
            };
            tracing::warn!(
                frame = self.frames,
                failed = failures.len(),
                "frame completed with failures"
            );
            self.report(FrameReport {
                frame: self.frames,
                wall_time_ms: now,
                failures,
            });
        }

        self.diagnostics.record_frame_time(delta_ms);
        self.frames += 1;
        self.running
    }

    /// Stop requesting frames
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn report(&mut self, report: FrameReport) {
        // Drop subscribers whose receiver is gone
        self.subscribers.retain(|tx| tx.send(report.clone()).is_ok());
    }
}
