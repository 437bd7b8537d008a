//! SimWorld - The simulation harness container.

use crate::command::SpawnCommand;
use crate::error::SimError;
use crate::exporter::{AgentPosition, ObserverPosition, SimEvent, SimFrame};
use crate::observers::ObserverSet;
use crate::oracle::Oracle;
use crate::terrain::SimTerrain;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};
use wanderer_core::{AgentId, AgentLifecycleManager, HostEvent, LifecycleConfig};
use wanderer_env::{
    PhysicalAgentFactory, PhysicalHandle, Position, PresenceOracle, TerrainHeightOracle,
    WorldBounds,
};

/// Configuration for a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Tick rate in Hz
    pub tick_rate_hz: u32,

    /// Simulation duration in seconds
    pub max_duration_secs: f64,

    /// World extent
    pub bounds: WorldBounds,

    /// Number of walking observers
    pub num_observers: usize,

    /// Active radius around each observer
    pub observer_radius: f64,

    /// Observer walking speed (units/s)
    pub observer_speed: f64,

    /// Terrain hill height
    pub terrain_amplitude: f64,

    /// Terrain hill wavelength
    pub terrain_wavelength: f64,

    /// Maximum number of managed physical objects (None = unlimited)
    pub host_capacity: Option<usize>,

    /// Chance per tick that the host kills one random object
    pub kill_probability: f64,

    /// Host-owned objects unrelated to the population
    pub foreign_entities: usize,

    /// Physical drift noise (units/s per tick)
    pub drift_std: f64,

    /// Lifecycle manager settings; its seed is derived from `seed`
    pub lifecycle: LifecycleConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_rate_hz: 30,
            max_duration_secs: 20.0,
            bounds: WorldBounds::planar(0.0, 0.0, 200.0, 200.0),
            num_observers: 2,
            observer_radius: 40.0,
            observer_speed: 8.0,
            terrain_amplitude: 6.0,
            terrain_wavelength: 120.0,
            host_capacity: None,
            kill_probability: 0.0,
            foreign_entities: 0,
            drift_std: 0.5,
            lifecycle: LifecycleConfig {
                step_distance: 1.0,
                status_interval_ticks: 150,
                ..Default::default()
            },
        }
    }
}

/// The simulated host: terrain, observers and physical objects.
///
/// Implements every collaborator trait, so it is what the manager ticks
/// against.
pub struct SimHost {
    pub terrain: SimTerrain,
    pub observers: ObserverSet,
    pub oracle: Oracle,
}

impl TerrainHeightOracle for SimHost {
    fn height(&self, x: f64, z: f64) -> f64 {
        self.terrain.height(x, z)
    }
}

impl PresenceOracle for SimHost {
    fn is_active_area(&self, position: &Position) -> bool {
        self.observers.is_active_area(position)
    }
}

impl PhysicalAgentFactory for SimHost {
    fn create(&mut self, position: Position) -> Option<PhysicalHandle> {
        self.oracle.spawn(position)
    }

    fn destroy(&mut self, handle: PhysicalHandle) {
        self.oracle.remove(handle);
    }

    fn position(&self, handle: PhysicalHandle) -> Option<Position> {
        self.oracle.position(handle)
    }
}

/// A host-side death during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillEvent {
    /// Handle of the dead object
    pub handle: PhysicalHandle,

    /// Agent it materialized, `None` for foreign objects
    pub agent: Option<AgentId>,
}

/// The SimWorld - host plus lifecycle manager, stepped together.
pub struct SimWorld {
    /// Configuration
    pub config: SimConfig,

    /// Simulated host
    pub host: SimHost,

    /// The system under test
    pub manager: AgentLifecycleManager,

    /// RNG for host events (kills, foreign placement)
    event_rng: ChaCha8Rng,

    /// Current tick count
    tick_count: u64,
}

impl SimWorld {
    /// Creates a new SimWorld. Call [`start`](Self::start) to populate it.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        // Derive separate seeds for different subsystems
        let placement_seed = config.seed;
        let physics_seed = config.seed.wrapping_mul(0x9e3779b97f4a7c15);
        let observer_seed = config.seed.wrapping_mul(0x517cc1b727220a95);
        let terrain_seed = config.seed ^ 0x3c6ef372fe94f82b;
        let event_seed = physics_seed ^ observer_seed;

        let mut lifecycle = config.lifecycle.clone();
        lifecycle.seed = Some(placement_seed);
        let manager = AgentLifecycleManager::new(lifecycle)?;

        let terrain = SimTerrain::new(terrain_seed, config.terrain_amplitude, config.terrain_wavelength);

        let mut observers = ObserverSet::new(observer_seed);
        for _ in 0..config.num_observers {
            observers.spawn_walker(&config.bounds, config.observer_radius, config.observer_speed);
        }

        let mut oracle = Oracle::new(physics_seed);
        oracle.set_capacity(config.host_capacity);
        oracle.set_drift(config.drift_std, config.lifecycle.step_distance * config.tick_rate_hz as f64);

        let mut event_rng = ChaCha8Rng::seed_from_u64(event_seed);
        if !config.bounds.is_degenerate() {
            for _ in 0..config.foreign_entities {
                let x = event_rng.gen_range(config.bounds.min.x..config.bounds.max.x);
                let z = event_rng.gen_range(config.bounds.min.z..config.bounds.max.z);
                oracle.spawn_foreign(terrain.ground(x, z));
            }
        }

        Ok(Self {
            config,
            host: SimHost {
                terrain,
                observers,
                oracle,
            },
            manager,
            event_rng,
            tick_count: 0,
        })
    }

    /// Signals "world ready" to the manager, populating the world.
    pub fn start(&mut self) -> Result<usize, SimError> {
        let bounds = self.config.bounds;
        self.manager
            .handle_event(&mut self.host, HostEvent::WorldReady { bounds })?;
        Ok(self.manager.len())
    }

    /// Advances simulation by one tick and returns the host deaths it caused.
    pub fn tick(&mut self) -> Vec<KillEvent> {
        let dt = 1.0 / self.config.tick_rate_hz.max(1) as f64;
        let bounds = self.config.bounds;

        self.host.observers.step(dt, &bounds);
        self.host.oracle.step(dt, &bounds, &self.host.terrain);

        let mut kills = Vec::new();
        let p = self.config.kill_probability.clamp(0.0, 1.0);
        if p > 0.0 && self.event_rng.gen_bool(p) {
            if let Some(handle) = self.host.oracle.kill_random() {
                let agent = self.manager.agent_id_for_handle(handle);
                self.notify(HostEvent::EntityKilled { handle });
                kills.push(KillEvent { handle, agent });
            }
        }

        self.notify(HostEvent::Update {
            bounds,
            has_active_observers: !self.host.observers.is_empty(),
        });

        self.tick_count += 1;
        kills
    }

    /// Kills a specific object in the host and reports it.
    pub fn kill(&mut self, handle: PhysicalHandle) -> Option<KillEvent> {
        if !self.host.oracle.kill(handle) {
            return None;
        }
        let agent = self.manager.agent_id_for_handle(handle);
        self.notify(HostEvent::EntityKilled { handle });
        Some(KillEvent { handle, agent })
    }

    /// Runs an operator console line against this world.
    pub fn run_command(&mut self, line: &str) -> Result<Vec<String>, SimError> {
        let command: SpawnCommand = line.parse()?;
        let output = command.execute(&mut self.manager, &self.host.terrain, &self.config.bounds)?;
        Ok(output)
    }

    /// Signals world teardown. The host's objects go with the world.
    pub fn shutdown(&mut self) {
        self.notify(HostEvent::WorldShuttingDown);
        self.host.oracle = Oracle::new(0);
    }

    fn notify(&mut self, event: HostEvent) {
        if let Err(e) = self.manager.handle_event(&mut self.host, event) {
            warn!("Host event {:?} failed: {}", event, e);
        }
    }

    /// Checks the lifecycle invariants against the host's ground truth.
    pub fn check_invariants(&self) -> Result<(), SimError> {
        let tick = self.tick_count;

        self.manager
            .audit()
            .map_err(|e| SimError::invariant(tick, e.to_string()))?;

        let mut seen = HashSet::new();
        for agent in self.manager.agents() {
            let Some(handle) = agent.physical_handle() else {
                continue;
            };
            if !seen.insert(handle) {
                return Err(SimError::invariant(tick, format!("{} shared by two agents", handle)));
            }
            if self.host.oracle.entity(handle).is_none() {
                return Err(SimError::invariant(
                    tick,
                    format!("agent {} points at missing {}", agent.id(), handle),
                ));
            }
        }

        let managed = self.host.oracle.managed_count();
        if managed != self.manager.physical_count() {
            return Err(SimError::invariant(
                tick,
                format!(
                    "host holds {} managed objects but {} agents are physical",
                    managed,
                    self.manager.physical_count()
                ),
            ));
        }

        let target = self.manager.config().target_population;
        let observed = !self.host.observers.is_empty();
        if observed && self.manager.tick_count() > 0 && self.manager.len() < target {
            return Err(SimError::invariant(
                tick,
                format!("population {} below target {}", self.manager.len(), target),
            ));
        }

        debug!("Invariants hold at tick {}", tick);
        Ok(())
    }

    /// Captures the current state for export.
    pub fn frame(&self, events: Vec<SimEvent>) -> SimFrame {
        SimFrame {
            tick: self.tick_count,
            time_sec: self.time(),
            agents: self
                .manager
                .agents()
                .map(|a| AgentPosition::new(a.id(), a.position(), a.physical_handle()))
                .collect(),
            observers: self
                .host
                .observers
                .iter()
                .map(|o| ObserverPosition::new(o.position, o.radius))
                .collect(),
            events,
        }
    }

    /// Returns the current simulation time in seconds.
    pub fn time(&self) -> f64 {
        self.tick_count as f64 / self.config.tick_rate_hz.max(1) as f64
    }

    /// Returns the current tick count.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
