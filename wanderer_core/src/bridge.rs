//! Host event bridge.
//!
//! Hosts usually expose lifecycle hooks as events (world ready, per-frame
//! update, entity died, world unloading). [`HostEvent`] mirrors those hooks so
//! a host integration is a single `match`-free forwarding call.

use crate::error::LifecycleError;
use crate::lifecycle::AgentLifecycleManager;

use tracing::{debug, info};
use wanderer_env::{HostWorld, PhysicalHandle, WorldBounds};

/// A host-side notification the manager reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// The world finished loading and its extent is known
    WorldReady { bounds: WorldBounds },

    /// One simulation step
    Update {
        bounds: WorldBounds,
        has_active_observers: bool,
    },

    /// Some simulated object died. Sent for every death, ours or not.
    EntityKilled { handle: PhysicalHandle },

    /// The world is being torn down
    WorldShuttingDown,
}

impl AgentLifecycleManager {
    /// Forwards a host event to the matching lifecycle operation.
    ///
    /// Only `WorldReady` can fail (degenerate bounds).
    pub fn handle_event<H>(&mut self, host: &mut H, event: HostEvent) -> Result<(), LifecycleError>
    where
        H: HostWorld + ?Sized,
    {
        match event {
            HostEvent::WorldReady { bounds } => {
                info!("World ready, populating");
                let created = self.initialize(&*host, &bounds)?;
                info!("Populated world with {} virtual agents", created);
            }
            HostEvent::Update {
                bounds,
                has_active_observers,
            } => {
                self.tick(host, &bounds, has_active_observers);
            }
            HostEvent::EntityKilled { handle } => {
                if self.is_managed_handle(handle) {
                    self.notify_killed(handle);
                } else {
                    debug!("Ignoring death of foreign {}", handle);
                }
            }
            HostEvent::WorldShuttingDown => {
                self.shutdown();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LifecycleConfig;
    use std::collections::HashMap;
    use wanderer_env::{
        FixedPresence, FlatTerrain, PhysicalAgentFactory, Position, PresenceOracle,
        TerrainHeightOracle,
    };

    /// Host where everything is observed.
    #[derive(Default)]
    struct ArenaHost {
        objects: HashMap<PhysicalHandle, Position>,
        next: u64,
    }

    impl TerrainHeightOracle for ArenaHost {
        fn height(&self, x: f64, z: f64) -> f64 {
            FlatTerrain::new(1.0).height(x, z)
        }
    }

    impl PresenceOracle for ArenaHost {
        fn is_active_area(&self, position: &Position) -> bool {
            FixedPresence::Everywhere.is_active_area(position)
        }
    }

    impl PhysicalAgentFactory for ArenaHost {
        fn create(&mut self, position: Position) -> Option<PhysicalHandle> {
            self.next += 1;
            let handle = PhysicalHandle(self.next);
            self.objects.insert(handle, position);
            Some(handle)
        }

        fn destroy(&mut self, handle: PhysicalHandle) {
            self.objects.remove(&handle);
        }

        fn position(&self, handle: PhysicalHandle) -> Option<Position> {
            self.objects.get(&handle).copied()
        }
    }

    #[test]
    fn test_event_sequence() {
        let bounds = WorldBounds::planar(0.0, 0.0, 200.0, 200.0);
        let mut host = ArenaHost::default();
        let mut m = AgentLifecycleManager::new(LifecycleConfig::default().with_seed(11)).unwrap();

        m.handle_event(&mut host, HostEvent::WorldReady { bounds }).unwrap();
        assert_eq!(m.len(), 10);

        let update = HostEvent::Update {
            bounds,
            has_active_observers: true,
        };
        m.handle_event(&mut host, update).unwrap();
        assert_eq!(m.physical_count(), 10);

        // Foreign death is filtered
        m.handle_event(&mut host, HostEvent::EntityKilled { handle: PhysicalHandle(999) })
            .unwrap();
        assert_eq!(m.len(), 10);

        let ours = m.agents().next().and_then(|a| a.physical_handle()).unwrap();
        host.objects.remove(&ours);
        m.handle_event(&mut host, HostEvent::EntityKilled { handle: ours }).unwrap();
        assert_eq!(m.len(), 9);

        m.handle_event(&mut host, update).unwrap();
        assert_eq!(m.len(), 10);

        m.handle_event(&mut host, HostEvent::WorldShuttingDown).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn test_world_ready_with_bad_bounds_fails() {
        let mut host = ArenaHost::default();
        let mut m = AgentLifecycleManager::new(LifecycleConfig::default()).unwrap();
        let bounds = WorldBounds::planar(5.0, 5.0, 5.0, 5.0);

        assert!(m.handle_event(&mut host, HostEvent::WorldReady { bounds }).is_err());
        assert!(m.is_empty());
    }
}
