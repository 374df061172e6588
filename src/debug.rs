use std::collections::VecDeque;
use std::fmt::Write as _;

use crate::component::ComponentKind;
use crate::query::QueryHandle;
use crate::world::World;

/// World inspector for debugging
pub struct WorldInspector;

impl WorldInspector {
    /// Get total entity count
    pub fn entity_count(world: &World) -> usize {
        world.entity_count()
    }

    /// Live instance count per registered kind
    pub fn component_summary(world: &World) -> Vec<ComponentSummary> {
        world
            .registry()
            .iter()
            .map(|(kind, info)| ComponentSummary {
                kind,
                name: info.name,
                count: world.component_count(kind),
            })
            .collect()
    }

    /// Member count per cached query
    pub fn query_summary(world: &World) -> Vec<QuerySummary> {
        world
            .queries()
            .iter()
            .map(|(handle, query)| QuerySummary {
                handle,
                kinds: query.required().ones().collect(),
                entity_count: query.entities().len(),
            })
            .collect()
    }

    /// Multi-line human readable summary
    pub fn summary(world: &World) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== World Summary ===");
        let _ = writeln!(
            out,
            "Entities: {} ({} removed)",
            Self::entity_count(world),
            world.removed_entity_count()
        );
        let _ = writeln!(out, "=== Components ===");
        for component in Self::component_summary(world) {
            let _ = writeln!(out, "{}: {}", component.name, component.count);
        }
        let _ = writeln!(out, "=== Queries ===");
        for query in Self::query_summary(world) {
            let _ = writeln!(
                out,
                "Query {} {:?}: {} entities",
                query.handle.index(),
                query.kinds,
                query.entity_count
            );
        }
        out
    }

    /// Emit the summary at debug level
    pub fn log_summary(world: &World) {
        tracing::debug!("\n{}", Self::summary(world));
    }
}

#[derive(Clone, Debug)]
pub struct ComponentSummary {
    pub kind: ComponentKind,
    pub name: &'static str,
    pub count: usize,
}

#[derive(Clone, Debug)]
pub struct QuerySummary {
    pub handle: QueryHandle,
    pub kinds: Vec<usize>,
    pub entity_count: usize,
}

/// Performance diagnostics
#[derive(Clone, Debug)]
pub struct Diagnostics {
    frame_times: VecDeque<f64>,
    max_samples: usize,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Create new diagnostics tracker
    pub fn new() -> Self {
        Self::with_window(60)
    }

    pub fn with_window(max_samples: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
        }
    }

    /// Record a frame time in milliseconds
    pub fn record_frame_time(&mut self, time_ms: f64) {
        self.frame_times.push_back(time_ms);
        if self.frame_times.len() > self.max_samples {
            self.frame_times.pop_front();
        }
    }

    /// Get average FPS
    pub fn fps(&self) -> f64 {
        let avg_ms = self.avg_frame_time();
        if avg_ms > 0.0 {
            1000.0 / avg_ms
        } else {
            0.0
        }
    }

    /// Get average frame time in milliseconds
    pub fn avg_frame_time(&self) -> f64 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64
    }

    pub fn min_frame_time(&self) -> Option<f64> {
        self.frame_times.iter().copied().reduce(f64::min)
    }

    pub fn max_frame_time(&self) -> Option<f64> {
        self.frame_times.iter().copied().reduce(f64::max)
    }

    pub fn sample_count(&self) -> usize {
        self.frame_times.len()
    }
}
