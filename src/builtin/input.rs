//! Host pointer input.
//!
//! Events arrive between ticks and are buffered until the next tick begins,
//! so structural changes from input never interleave with a running system.
//!
//! ```
//! use swarm_ecs::builtin::{PointerDown, PointerQueue};
//!
//! let mut queue = PointerQueue::new();
//! queue.push(PointerDown::new(10.0, 20.0));
//! assert_eq!(queue.drain().collect::<Vec<_>>(), vec![PointerDown::new(10.0, 20.0)]);
//! assert!(queue.is_empty());
//! ```

use std::collections::VecDeque;

/// Pointer pressed at viewport coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerDown {
    pub x: f64,
    pub y: f64,
}

impl PointerDown {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// FIFO of pointer events waiting for the next tick
#[derive(Clone, Debug, Default)]
pub struct PointerQueue {
    pending: VecDeque<PointerDown>,
}

impl PointerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PointerDown) {
        self.pending.push_back(event);
    }

    /// Take every pending event in arrival order
    pub fn drain(&mut self) -> impl Iterator<Item = PointerDown> + '_ {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
