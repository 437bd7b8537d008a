//! Agent Lifecycle Manager - owns the roaming population.
//!
//! The manager is a plain owned value: build one per world, feed it host
//! ticks and kill notifications, and drop or [`shutdown`] it with the world.
//! Several managers can coexist (one per test, one per world shard).
//!
//! # Bookkeeping
//!
//! ```text
//! agents:       AgentId        -> Agent { representation: Physical(h) | Virtual }
//! handle_index: PhysicalHandle -> AgentId        (physical agents only)
//! ```
//!
//! `handle_index` is written in exactly four places: materialize and
//! dematerialize (the two transitions), arrival and kill (the two removal
//! paths). It is always the inverse of the handles stored in `agents`.
//!
//! [`shutdown`]: AgentLifecycleManager::shutdown

use crate::agent::{Agent, AgentId, Representation};
use crate::config::LifecycleConfig;
use crate::error::LifecycleError;
use crate::metrics::LifecycleStats;
use crate::movement;
use crate::placement;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};
use wanderer_env::{HostWorld, PhysicalHandle, TerrainHeightOracle, WorldBounds};

/// Why an agent was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpawnReason {
    Initial,
    Replacement,
    External,
}

/// Outcome of the per-state update for one agent.
enum Transition {
    Stay,
    Materialize,
    Dematerialize(PhysicalHandle),
}

/// Owns every agent's logical state and drives the Virtual/Physical protocol.
pub struct AgentLifecycleManager {
    /// Configuration
    config: LifecycleConfig,

    /// Live agents, iterated in creation order
    agents: BTreeMap<AgentId, Agent>,

    /// Inverse of the physical agents' handles
    handle_index: HashMap<PhysicalHandle, AgentId>,

    /// Next id to hand out
    next_id: u64,

    /// Placement RNG
    rng: ChaCha8Rng,

    /// Counters since the last initialize
    stats: LifecycleStats,

    /// Effective ticks since the last initialize or shutdown
    tick_count: u64,
}

impl AgentLifecycleManager {
    /// Creates an empty manager. Call [`initialize`](Self::initialize) once the
    /// world extent is known.
    pub fn new(config: LifecycleConfig) -> Result<Self, LifecycleError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            config,
            agents: BTreeMap::new(),
            handle_index: HashMap::new(),
            next_id: 1,
            rng,
            stats: LifecycleStats::default(),
            tick_count: 0,
        })
    }

    /// Clears all state and creates the target population on the world edges.
    ///
    /// Returns the number of agents created. With degenerate bounds the
    /// manager is left empty and the error is returned.
    pub fn initialize<T>(&mut self, terrain: &T, bounds: &WorldBounds) -> Result<usize, LifecycleError>
    where
        T: TerrainHeightOracle + ?Sized,
    {
        self.clear();
        self.stats = LifecycleStats::default();
        self.tick_count = 0;

        info!("Initializing population: bounds {}", bounds);
        bounds.validate()?;

        for _ in 0..self.config.target_population {
            self.spawn_at_edge(terrain, bounds, SpawnReason::Initial);
        }

        Ok(self.agents.len())
    }

    /// Advances the population by one host step.
    ///
    /// Does nothing when the population is empty or nobody is observing.
    /// Never fails: creation failures are retried on the next tick, and
    /// degenerate bounds only skip replenishment.
    pub fn tick<H>(&mut self, host: &mut H, bounds: &WorldBounds, has_active_observers: bool)
    where
        H: HostWorld + ?Sized,
    {
        if self.agents.is_empty() || !has_active_observers {
            return;
        }

        self.tick_count += 1;

        // Removals below only touch `agents`, never this snapshot.
        let snapshot: Vec<AgentId> = self.agents.keys().copied().collect();
        for id in snapshot {
            self.update_agent(host, id);
        }

        self.replenish(host, bounds);

        let interval = self.config.status_interval_ticks;
        if interval > 0 && self.tick_count % interval == 0 {
            self.log_status();
        }
    }

    /// Retires the agent materialized as `handle`, if any.
    ///
    /// The host already removed the object, so nothing is destroyed. Unknown
    /// handles (foreign objects, repeated notifications) are ignored.
    pub fn notify_killed(&mut self, handle: PhysicalHandle) -> Option<AgentId> {
        let id = self.handle_index.remove(&handle)?;
        self.agents.remove(&id);
        self.stats.killed += 1;

        info!("Agent {} killed ({}), removed from population", id, handle);
        Some(id)
    }

    /// Creates `count` extra edge-placed agents on top of the population.
    ///
    /// The target population is unchanged, so the surplus drains naturally as
    /// agents arrive or die.
    pub fn request_external_spawn<T>(
        &mut self,
        terrain: &T,
        bounds: &WorldBounds,
        count: usize,
    ) -> Result<Vec<AgentId>, LifecycleError>
    where
        T: TerrainHeightOracle + ?Sized,
    {
        bounds.validate()?;

        Ok((0..count)
            .map(|_| self.spawn_at_edge(terrain, bounds, SpawnReason::External))
            .collect())
    }

    /// Drops every agent and mapping without touching the host.
    ///
    /// Used while the host tears its world down; its objects die with it.
    pub fn shutdown(&mut self) {
        info!(
            "Shutting down: dropping {} agents ({} physical)",
            self.agents.len(),
            self.handle_index.len()
        );
        self.clear();
        self.tick_count = 0;
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Number of live agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Number of live agents currently materialized.
    pub fn physical_count(&self) -> usize {
        self.handle_index.len()
    }

    /// Live agents in creation order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Returns true if `handle` belongs to one of our physical agents.
    pub fn is_managed_handle(&self, handle: PhysicalHandle) -> bool {
        self.handle_index.contains_key(&handle)
    }

    /// Maps a host handle back to the agent it materializes.
    pub fn agent_id_for_handle(&self, handle: PhysicalHandle) -> Option<AgentId> {
        self.handle_index.get(&handle).copied()
    }

    pub fn stats(&self) -> LifecycleStats {
        self.stats
    }

    /// Effective ticks (ticks that did work) since the last initialize or shutdown.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Checks that `handle_index` is exactly the inverse of the agents'
    /// physical handles.
    pub fn audit(&self) -> Result<(), LifecycleError> {
        for (handle, id) in &self.handle_index {
            match self.agents.get(id).map(Agent::representation) {
                Some(Representation::Physical(h)) if h == *handle => {}
                Some(other) => {
                    return Err(LifecycleError::IndexMismatch {
                        handle: *handle,
                        reason: format!("agent {} is {:?}", id, other),
                    })
                }
                None => {
                    return Err(LifecycleError::IndexMismatch {
                        handle: *handle,
                        reason: format!("agent {} is not live", id),
                    })
                }
            }
        }

        // Index -> agent is injective on a HashMap, so equal counts make it a bijection.
        let physical = self.agents.values().filter(|a| a.is_physical()).count();
        if physical != self.handle_index.len() {
            if let Some(agent) = self
                .agents
                .values()
                .find(|a| a.physical_handle().is_some_and(|h| !self.handle_index.contains_key(&h)))
            {
                return Err(LifecycleError::UnindexedAgent(agent.id));
            }
        }

        Ok(())
    }

    // =========================================================================
    // STATE MACHINE
    // =========================================================================

    /// Runs one agent through its per-state update and the arrival check.
    fn update_agent<H>(&mut self, host: &mut H, id: AgentId)
    where
        H: HostWorld + ?Sized,
    {
        let transition = {
            let Some(agent) = self.agents.get_mut(&id) else {
                return;
            };

            match agent.representation {
                Representation::Physical(handle) => {
                    match host.position(handle) {
                        Some(position) => agent.position = position,
                        None => debug!(
                            "Agent {}: host has no position for {}, keeping {:?}",
                            id, handle, agent.position
                        ),
                    }

                    if host.is_active_area(&agent.position) {
                        Transition::Stay
                    } else {
                        Transition::Dematerialize(handle)
                    }
                }
                Representation::Virtual => {
                    agent.position =
                        movement::step_toward(&*host, &agent.position, &agent.goal, agent.step_distance);

                    if host.is_active_area(&agent.position) {
                        Transition::Materialize
                    } else {
                        Transition::Stay
                    }
                }
            }
        };

        match transition {
            Transition::Stay => {}
            Transition::Materialize => self.materialize(host, id),
            Transition::Dematerialize(handle) => self.dematerialize(host, id, handle),
        }

        let arrived = self
            .agents
            .get(&id)
            .is_some_and(|a| a.has_arrived(self.config.arrival_radius_sq()));
        if arrived {
            self.retire_arrived(host, id);
        }
    }

    /// Virtual -> Physical. Leaves the agent virtual if the host refuses.
    fn materialize<H>(&mut self, host: &mut H, id: AgentId)
    where
        H: HostWorld + ?Sized,
    {
        let Some(agent) = self.agents.get_mut(&id) else {
            return;
        };

        let Some(handle) = host.create(agent.position) else {
            self.stats.creation_failures += 1;
            debug!("Agent {}: host created no object at {:?}, retrying next tick", id, agent.position);
            return;
        };

        if let Some(owner) = self.handle_index.get(&handle) {
            // A live handle handed out twice; recording it would alias two agents.
            self.stats.creation_failures += 1;
            warn!(
                "Agent {}: host returned {} which already belongs to agent {}, staying virtual",
                id, handle, owner
            );
            return;
        }

        agent.representation = Representation::Physical(handle);
        self.handle_index.insert(handle, id);
        self.stats.materialized += 1;

        info!("Agent {} materialized as {} at {:?}", id, handle, agent.position);
    }

    /// Physical -> Virtual. The current position is where virtual walking resumes.
    fn dematerialize<H>(&mut self, host: &mut H, id: AgentId, handle: PhysicalHandle)
    where
        H: HostWorld + ?Sized,
    {
        let Some(agent) = self.agents.get_mut(&id) else {
            return;
        };

        host.destroy(handle);
        self.handle_index.remove(&handle);
        agent.representation = Representation::Virtual;
        self.stats.dematerialized += 1;

        info!("Agent {} dematerialized from {} at {:?}", id, handle, agent.position);
    }

    /// Removes an agent that reached its goal, destroying its object first.
    fn retire_arrived<H>(&mut self, host: &mut H, id: AgentId)
    where
        H: HostWorld + ?Sized,
    {
        let Some(agent) = self.agents.remove(&id) else {
            return;
        };

        if let Representation::Physical(handle) = agent.representation {
            host.destroy(handle);
            self.handle_index.remove(&handle);
        }
        self.stats.arrived += 1;

        info!("Agent {} reached its goal at {:?}, removed", id, agent.position);
    }

    // =========================================================================
    // POPULATION
    // =========================================================================

    /// Tops the population back up to target.
    fn replenish<T>(&mut self, terrain: &T, bounds: &WorldBounds)
    where
        T: TerrainHeightOracle + ?Sized,
    {
        if self.agents.len() >= self.config.target_population {
            return;
        }

        if let Err(e) = bounds.validate() {
            warn!("Skipping replenishment: {}", e);
            return;
        }

        while self.agents.len() < self.config.target_population {
            self.spawn_at_edge(terrain, bounds, SpawnReason::Replacement);
        }
    }

    /// Creates one virtual agent on a random edge. Bounds must be valid.
    fn spawn_at_edge<T>(&mut self, terrain: &T, bounds: &WorldBounds, reason: SpawnReason) -> AgentId
    where
        T: TerrainHeightOracle + ?Sized,
    {
        let route = placement::edge_route(&mut self.rng, bounds, terrain);
        let id = AgentId(self.next_id);
        self.next_id += 1;

        self.agents
            .insert(id, Agent::new(id, route.origin, route.goal, self.config.step_distance));

        match reason {
            SpawnReason::Initial => self.stats.spawned_initial += 1,
            SpawnReason::Replacement => self.stats.spawned_replacement += 1,
            SpawnReason::External => self.stats.spawned_external += 1,
        }

        info!(
            "Agent {} created ({:?}) on {:?} edge: {:?} -> {:?}",
            id, reason, route.edge, route.origin, route.goal
        );
        id
    }

    fn clear(&mut self) {
        self.agents.clear();
        self.handle_index.clear();
        self.next_id = 1;
    }

    fn log_status(&self) {
        info!(
            "Status at tick {}: {} agents, {} physical",
            self.tick_count,
            self.agents.len(),
            self.handle_index.len()
        );
        for agent in self.agents.values() {
            info!(
                "  Agent {} ({}) at {:?} heading to {:?}",
                agent.id,
                agent.representation.label(),
                agent.position,
                agent.goal
            );
        }
    }
}
