//! Simulation configuration.
//!
//! Every field has a default, so a config file only needs to name the values
//! it overrides:
//!
//! ```
//! use swarm_ecs::config::{BoundaryPolicy, SimulationConfig};
//!
//! let cfg = SimulationConfig::from_json_str(r#"{ "boundary": "Unbounded", "seed": 7 }"#).unwrap();
//! assert_eq!(cfg.boundary, BoundaryPolicy::Unbounded);
//! assert_eq!(cfg.num_elements, 40);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EcsError, Result};

/// Drawable area, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// What happens when an entity leaves the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    /// Toroidal wraparound, one `size` outside each edge
    #[default]
    Wrap,
    /// No boundary handling; expiry removes stragglers
    Unbounded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub viewport: Viewport,
    /// Entities created per pointer-down
    pub num_elements: usize,
    /// Velocity bound per axis, in pixels per millisecond
    pub speed_multiplier: f64,
    /// Half-open `[min, max)`
    pub size_range: [f64; 2],
    /// Half-open `[lo, hi)`, milliseconds
    pub lifetime_ms: [f64; 2],
    pub boundary: BoundaryPolicy,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::wrapping()
    }
}

impl SimulationConfig {
    /// Wrapping variant: speed 0.1 with toroidal boundary
    pub fn wrapping() -> Self {
        Self {
            viewport: Viewport::default(),
            num_elements: 40,
            speed_multiplier: 0.1,
            size_range: [1.0, 20.0],
            lifetime_ms: [1000.0, 5000.0],
            boundary: BoundaryPolicy::Wrap,
            seed: 0x5eed,
        }
    }

    /// Unbounded variant: speed 0.15, no boundary handling
    pub fn unbounded() -> Self {
        Self {
            speed_multiplier: 0.15,
            boundary: BoundaryPolicy::Unbounded,
            ..Self::wrapping()
        }
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(EcsError::ConfigError(format!(
                "viewport must be non-empty, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        if !self.speed_multiplier.is_finite() || self.speed_multiplier < 0.0 {
            return Err(EcsError::ConfigError(format!(
                "speed_multiplier must be finite and >= 0, got {}",
                self.speed_multiplier
            )));
        }
        check_range("size_range", self.size_range)?;
        check_range("lifetime_ms", self.lifetime_ms)?;
        if self.size_range[0] < 0.0 || self.lifetime_ms[0] < 0.0 {
            return Err(EcsError::ConfigError(
                "size_range and lifetime_ms must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

fn check_range(name: &str, [lo, hi]: [f64; 2]) -> Result<()> {
    if !(lo.is_finite() && hi.is_finite()) || lo >= hi {
        return Err(EcsError::ConfigError(format!(
            "{name} must be a non-empty range, got [{lo}, {hi})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let wrap = SimulationConfig::wrapping();
        assert_eq!(wrap.boundary, BoundaryPolicy::Wrap);
        assert_eq!(wrap.speed_multiplier, 0.1);

        let free = SimulationConfig::unbounded();
        assert_eq!(free.boundary, BoundaryPolicy::Unbounded);
        assert_eq!(free.speed_multiplier, 0.15);
        assert_eq!(free.num_elements, 40);
        assert_eq!(SimulationConfig::default(), wrap);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg =
            SimulationConfig::from_json_str(r#"{"viewport": {"width": 300, "height": 200}}"#)
                .unwrap();
        assert_eq!(cfg.viewport, Viewport::new(300, 200));
        assert_eq!(cfg.lifetime_ms, [1000.0, 5000.0]);
        assert_eq!(cfg.boundary, BoundaryPolicy::Wrap);
    }

    #[test]
    fn test_json_roundtrip_keeps_values() {
        let cfg = SimulationConfig::unbounded().with_seed(99);
        let back = SimulationConfig::from_json_str(&cfg.to_json().unwrap()).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_validation_errors() {
        let mut cfg = SimulationConfig::default();
        cfg.size_range = [20.0, 1.0];
        assert!(matches!(cfg.validate(), Err(EcsError::ConfigError(_))));

        let cfg = SimulationConfig::default().with_viewport(0, 10);
        assert!(matches!(cfg.validate(), Err(EcsError::ConfigError(_))));

        assert!(matches!(
            SimulationConfig::from_json_str("{ not json"),
            Err(EcsError::ConfigError(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = SimulationConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, EcsError::IoError(_)));
    }
}
