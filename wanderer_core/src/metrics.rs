//! Lifecycle counters.

use serde::{Deserialize, Serialize};

/// Running totals kept by the manager since the last `initialize`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleStats {
    /// Agents created by `initialize`
    pub spawned_initial: u64,
    /// Agents created to refill the population
    pub spawned_replacement: u64,
    /// Agents created on external request
    pub spawned_external: u64,
    /// Virtual -> Physical transitions
    pub materialized: u64,
    /// Physical -> Virtual transitions
    pub dematerialized: u64,
    /// Factory calls that returned no object
    pub creation_failures: u64,
    /// Agents retired at their goal
    pub arrived: u64,
    /// Agents retired by a kill notification
    pub killed: u64,
}

impl LifecycleStats {
    pub fn total_spawned(&self) -> u64 {
        self.spawned_initial + self.spawned_replacement + self.spawned_external
    }

    pub fn total_removed(&self) -> u64 {
        self.arrived + self.killed
    }

    /// Agents that should currently be alive according to the counters.
    pub fn expected_live(&self) -> u64 {
        self.total_spawned() - self.total_removed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_live() {
        let stats = LifecycleStats {
            spawned_initial: 10,
            spawned_replacement: 4,
            spawned_external: 3,
            arrived: 5,
            killed: 2,
            ..Default::default()
        };
        assert_eq!(stats.total_spawned(), 17);
        assert_eq!(stats.expected_live(), 10);
    }
}
