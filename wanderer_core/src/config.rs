//! Lifecycle configuration.

use crate::error::LifecycleError;
use serde::{Deserialize, Serialize};

/// Configuration for an [`AgentLifecycleManager`](crate::AgentLifecycleManager).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Steady-state number of live agents (default: 10)
    pub target_population: usize,

    /// Distance a virtual agent covers per tick, in world units (default: 0.1)
    pub step_distance: f64,

    /// Planar radius around the goal that counts as arrived (default: 5.0)
    pub arrival_radius: f64,

    /// Ticks between status reports, 0 disables them (default: 200)
    pub status_interval_ticks: u64,

    /// Placement seed; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            target_population: 10,
            step_distance: 0.1,
            arrival_radius: 5.0,
            status_interval_ticks: 200,
            seed: None,
        }
    }
}

impl LifecycleConfig {
    /// Sets the placement seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the target population.
    pub fn with_target_population(mut self, target: usize) -> Self {
        self.target_population = target;
        self
    }

    /// Sets the per-tick step distance.
    pub fn with_step_distance(mut self, step: f64) -> Self {
        self.step_distance = step;
        self
    }

    /// Squared arrival radius, compared against planar squared distance.
    pub fn arrival_radius_sq(&self) -> f64 {
        self.arrival_radius * self.arrival_radius
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), LifecycleError> {
        if !self.step_distance.is_finite() || self.step_distance <= 0.0 {
            return Err(LifecycleError::config(format!(
                "step_distance must be positive, got {}",
                self.step_distance
            )));
        }
        if !self.arrival_radius.is_finite() || self.arrival_radius < 0.0 {
            return Err(LifecycleError::config(format!(
                "arrival_radius must be non-negative, got {}",
                self.arrival_radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LifecycleConfig::default();
        assert_eq!(config.target_population, 10);
        assert_eq!(config.arrival_radius_sq(), 25.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_step() {
        let config = LifecycleConfig::default().with_step_distance(0.0);
        assert!(matches!(config.validate(), Err(LifecycleError::InvalidConfig(_))));

        let config = LifecycleConfig::default().with_step_distance(f64::NAN);
        assert!(config.validate().is_err());
    }
}
