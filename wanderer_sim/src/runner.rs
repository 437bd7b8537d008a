//! Scenario runner - executes lifecycle scenarios and checks invariants.

use crate::command::SpawnCommand;
use crate::exporter::{SimEvent, SimExport};
use crate::scenarios::ScenarioId;
use crate::world::{SimConfig, SimWorld};

use tracing::{debug, info, warn};
use wanderer_core::LifecycleStats;

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether scenario passed all assertions
    pub passed: bool,

    /// Total ticks executed
    pub total_ticks: u64,

    /// Final simulation time in seconds
    pub final_time_secs: f64,

    /// Number of live agents at end
    pub final_population: usize,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default)]
pub struct ScenarioMetrics {
    /// Lifecycle counters at the end of the run
    pub stats: LifecycleStats,

    /// Most agents physical at once
    pub peak_physical: usize,

    /// Smallest population seen after a tick
    pub min_population: usize,

    /// Largest population seen after a tick
    pub max_population: usize,

    /// Host deaths of managed objects
    pub managed_kills: u64,

    /// Host deaths of foreign objects (must not touch the population)
    pub foreign_kills: u64,
}

/// Runs lifecycle scenarios.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Tick rate in Hz
    tick_rate_hz: u32,

    /// Maximum duration in seconds
    max_duration_secs: f64,

    /// Extra operator spawn applied at start
    external_spawn: Option<SpawnCommand>,

    /// Ticks between exported frames
    export_interval: u64,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            tick_rate_hz: 30,
            max_duration_secs: 20.0,
            external_spawn: None,
            export_interval: 10,
        }
    }

    /// Sets the tick rate.
    pub fn with_tick_rate(mut self, hz: u32) -> Self {
        self.tick_rate_hz = hz.max(1);
        self
    }

    /// Sets the maximum duration.
    pub fn with_duration(mut self, secs: f64) -> Self {
        self.max_duration_secs = secs;
        self
    }

    /// Adds an operator spawn at the start of every run.
    pub fn with_external_spawn(mut self, command: SpawnCommand) -> Self {
        self.external_spawn = Some(command);
        self
    }

    /// Sets how often frames are exported.
    pub fn with_export_interval(mut self, ticks: u64) -> Self {
        self.export_interval = ticks.max(1);
        self
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        self.execute(scenario, None)
    }

    /// Runs a scenario while recording frames.
    pub fn run_with_export(&self, scenario: ScenarioId) -> (ScenarioResult, SimExport) {
        let mut export = SimExport::new(scenario.name(), self.seed);
        let result = self.execute(scenario, Some(&mut export));
        export.finalize(result.passed, result.metrics.stats, result.failure_reason.clone());
        (result, export)
    }

    /// Builds the world configuration for a scenario.
    pub fn config_for(&self, scenario: ScenarioId) -> SimConfig {
        let base = SimConfig {
            seed: self.seed,
            tick_rate_hz: self.tick_rate_hz,
            max_duration_secs: self.max_duration_secs,
            ..Default::default()
        };

        match scenario {
            ScenarioId::QuietWorld => SimConfig {
                num_observers: 0,
                ..base
            },
            ScenarioId::Patrol | ScenarioId::Reinforcements => base,
            ScenarioId::Crossfire => SimConfig {
                num_observers: 1,
                observer_radius: 1000.0,
                kill_probability: 0.25,
                foreign_entities: 5,
                ..base
            },
            ScenarioId::Saturation => SimConfig {
                num_observers: 1,
                observer_radius: 1000.0,
                host_capacity: Some(3),
                ..base
            },
            ScenarioId::Landslide => SimConfig {
                terrain_amplitude: 10.0,
                ..base
            },
        }
    }

    fn execute(&self, scenario: ScenarioId, mut export: Option<&mut SimExport>) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);
        debug!("  {}", scenario.description());

        let config = self.config_for(scenario);
        let target_ticks = (config.max_duration_secs * config.tick_rate_hz as f64) as u64;
        let mut metrics = ScenarioMetrics::default();

        let mut world = match SimWorld::new(config) {
            Ok(world) => world,
            Err(e) => return self.finish(scenario, None, metrics, Some(e.to_string())),
        };
        if let Err(e) = world.start() {
            return self.finish(scenario, Some(&world), metrics, Some(e.to_string()));
        }

        let mut events = Vec::new();
        let bounds = world.config.bounds;

        if scenario == ScenarioId::Reinforcements {
            match world.run_command("spawnagents 5") {
                Ok(lines) => events.extend(lines.into_iter().map(SimEvent::info)),
                Err(e) => return self.finish(scenario, Some(&world), metrics, Some(e.to_string())),
            }
        }
        if let Some(command) = self.external_spawn {
            match command.execute(&mut world.manager, &world.host.terrain, &bounds) {
                Ok(lines) => events.extend(lines.into_iter().map(SimEvent::info)),
                Err(e) => return self.finish(scenario, Some(&world), metrics, Some(e.to_string())),
            }
        }

        metrics.min_population = world.manager.len();
        metrics.max_population = world.manager.len();
        let landslide_tick = target_ticks / 2;

        for tick in 0..target_ticks {
            if scenario == ScenarioId::Landslide && tick == landslide_tick {
                world.host.terrain.shift(1.3);
                world.host.terrain.raise(4.0);
                events.push(SimEvent::warn("terrain shifted"));
            }

            for kill in world.tick() {
                match kill.agent {
                    Some(id) => {
                        metrics.managed_kills += 1;
                        events.push(SimEvent::warn(format!("agent {} killed ({})", id, kill.handle)));
                    }
                    None => metrics.foreign_kills += 1,
                }
            }

            let population = world.manager.len();
            metrics.peak_physical = metrics.peak_physical.max(world.manager.physical_count());
            metrics.min_population = metrics.min_population.min(population);
            metrics.max_population = metrics.max_population.max(population);

            let check = world
                .check_invariants()
                .map_err(|e| e.to_string())
                .and_then(|_| Self::check_tick(scenario, &world));
            if let Err(reason) = check {
                warn!("Scenario {} failed at tick {}: {}", scenario.name(), tick, reason);
                return self.finish(scenario, Some(&world), metrics, Some(reason));
            }

            if let Some(export) = export.as_deref_mut() {
                if tick % self.export_interval == 0 {
                    export.add_frame(world.frame(std::mem::take(&mut events)));
                }
            }

            if tick % 30 == 0 {
                debug!(
                    "  t={:.1}s | agents={} | physical={} | host objects={}",
                    world.time(),
                    population,
                    world.manager.physical_count(),
                    world.host.oracle.managed_count()
                );
            }
        }

        metrics.stats = world.manager.stats();
        let failure = Self::check_end(scenario, &world, &metrics).err();
        self.finish(scenario, Some(&world), metrics, failure)
    }

    /// Scenario-specific assertions after every tick.
    fn check_tick(scenario: ScenarioId, world: &SimWorld) -> Result<(), String> {
        match scenario {
            ScenarioId::QuietWorld => {
                if world.manager.physical_count() > 0 {
                    return Err("agent materialized without observers".to_string());
                }
                if let Some(agent) = world.manager.agents().find(|a| a.position() != a.origin()) {
                    return Err(format!("agent {} moved without observers", agent.id()));
                }
            }
            ScenarioId::Saturation => {
                let cap = world.config.host_capacity.unwrap_or(usize::MAX);
                if world.manager.physical_count() > cap {
                    return Err(format!(
                        "{} physical agents exceed host capacity {}",
                        world.manager.physical_count(),
                        cap
                    ));
                }
            }
            ScenarioId::Landslide => {
                let terrain = &world.host.terrain;
                for agent in world.manager.agents() {
                    let p = agent.position();
                    let ground = wanderer_env::TerrainHeightOracle::height(terrain, p.x, p.z);
                    if (p.y - ground).abs() > 1e-9 {
                        return Err(format!(
                            "agent {} at elevation {:.3}, ground is {:.3}",
                            agent.id(),
                            p.y,
                            ground
                        ));
                    }
                }
            }
            ScenarioId::Patrol | ScenarioId::Crossfire | ScenarioId::Reinforcements => {}
        }
        Ok(())
    }

    /// Scenario-specific assertions at the end of the run.
    fn check_end(scenario: ScenarioId, world: &SimWorld, metrics: &ScenarioMetrics) -> Result<(), String> {
        let stats = &metrics.stats;
        let target = world.manager.config().target_population;

        match scenario {
            ScenarioId::QuietWorld => {
                if world.manager.len() != target || stats.materialized != 0 {
                    return Err(format!(
                        "expected frozen population of {}, got {} ({} materialized)",
                        target,
                        world.manager.len(),
                        stats.materialized
                    ));
                }
            }
            ScenarioId::Crossfire => {
                if metrics.managed_kills == 0 || stats.killed != metrics.managed_kills {
                    return Err(format!(
                        "host reported {} managed kills, manager retired {}",
                        metrics.managed_kills, stats.killed
                    ));
                }
            }
            ScenarioId::Saturation => {
                let cap = world.config.host_capacity.unwrap_or(usize::MAX);
                if stats.creation_failures == 0 || metrics.peak_physical != cap.min(target) {
                    return Err(format!(
                        "expected refused creations and {} physical, got {} failures, peak {}",
                        cap.min(target),
                        stats.creation_failures,
                        metrics.peak_physical
                    ));
                }
            }
            ScenarioId::Reinforcements => {
                if stats.spawned_external < 5 || metrics.max_population < target + 5 {
                    return Err(format!(
                        "expected at least {} agents after reinforcements, peak was {}",
                        target + 5,
                        metrics.max_population
                    ));
                }
            }
            ScenarioId::Patrol | ScenarioId::Landslide => {}
        }

        if stats.expected_live() != world.manager.len() as u64 {
            return Err(format!(
                "counters say {} live agents, manager holds {}",
                stats.expected_live(),
                world.manager.len()
            ));
        }
        Ok(())
    }

    fn finish(
        &self,
        scenario: ScenarioId,
        world: Option<&SimWorld>,
        mut metrics: ScenarioMetrics,
        failure_reason: Option<String>,
    ) -> ScenarioResult {
        if let Some(world) = world {
            metrics.stats = world.manager.stats();
        }

        ScenarioResult {
            scenario,
            seed: self.seed,
            passed: failure_reason.is_none(),
            total_ticks: world.map_or(0, SimWorld::tick_count),
            final_time_secs: world.map_or(0.0, SimWorld::time),
            final_population: world.map_or(0, |w| w.manager.len()),
            failure_reason,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_all_scenarios_pass_default_seed() {
        let runner = ScenarioRunner::new(42).with_duration(10.0);
        for scenario in ScenarioId::all() {
            let result = runner.run(scenario);
            assert!(result.passed, "{}: {:?}", scenario, result.failure_reason);
            assert_eq!(result.total_ticks, 300);
        }
    }

    #[test]
    fn test_tick_rate_sets_tick_count() {
        let result = ScenarioRunner::new(2)
            .with_tick_rate(10)
            .with_duration(2.0)
            .run(ScenarioId::Patrol);

        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.total_ticks, 20);
        assert!((result.final_time_secs - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_saturation_metrics() {
        let result = ScenarioRunner::new(1).with_duration(2.0).run(ScenarioId::Saturation);
        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.metrics.peak_physical, 3);
        assert!(result.metrics.stats.creation_failures >= 7);
    }

    #[test]
    fn test_reinforcements_with_extra_command() {
        let result = ScenarioRunner::new(5)
            .with_duration(1.0)
            .with_external_spawn(SpawnCommand { count: 2 })
            .run(ScenarioId::Reinforcements);

        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.metrics.stats.spawned_external, 7);
        assert_eq!(result.metrics.max_population, 17);
    }

    #[test]
    fn test_export_records_frames() {
        let (result, export) = ScenarioRunner::new(9)
            .with_duration(2.0)
            .with_export_interval(15)
            .run_with_export(ScenarioId::Crossfire);

        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(export.frames.len(), 4);
        assert!(export.passed);
        assert_eq!(export.stats, Some(result.metrics.stats));
        assert!(export.frames.iter().all(|f| f.observers.len() == 1));
    }

    #[test]
    fn test_zero_duration_run() {
        let runner = ScenarioRunner::new(3).with_duration(0.0);
        let result = runner.run(ScenarioId::Patrol);
        assert!(result.passed);
        assert_eq!(result.total_ticks, 0);
        assert_eq!(result.final_population, 10);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(12))]

        #[test]
        fn prop_invariants_hold_across_seeds(seed in any::<u64>()) {
            let runner = ScenarioRunner::new(seed).with_duration(3.0);
            for scenario in ScenarioId::all() {
                let result = runner.run(scenario);
                prop_assert!(result.passed, "{} seed={}: {:?}", scenario, seed, result.failure_reason);
                prop_assert!(result.metrics.min_population >= 10);
            }
        }
    }
}
