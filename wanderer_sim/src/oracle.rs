//! Ground truth oracle for simulation.
//!
//! The Oracle plays the host world's physics for materialized agents:
//! - Owns every physical object and its authoritative position
//! - Moves objects on its own (Gaussian drift), so synced positions differ
//!   from what the virtual integrator would have produced
//! - Can refuse creation (capacity) and kill objects

use nalgebra::Vector3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wanderer_env::{PhysicalHandle, Position, TerrainHeightOracle, WorldBounds};

/// A physical object in the host world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalEntity {
    /// Host handle
    pub handle: PhysicalHandle,

    /// Position [x, y, z], y glued to terrain
    pub position: Position,

    /// Planar velocity in units per second
    pub velocity: Vector3<f64>,

    /// Spawned by the host itself, not on behalf of the lifecycle manager
    pub foreign: bool,
}

/// The Oracle - authoritative state of all physical objects.
pub struct Oracle {
    /// RNG for drift and kills (separate from placement)
    physics_rng: ChaCha8Rng,

    /// Live objects by handle
    entities: BTreeMap<PhysicalHandle, PhysicalEntity>,

    /// Next handle
    next_id: u64,

    /// Maximum number of non-foreign objects; `None` is unlimited
    capacity: Option<usize>,

    /// Velocity noise standard deviation (units/s per tick)
    drift_std: f64,

    /// Speed cap in units per second
    max_speed: f64,

    /// Total objects removed by kills
    kills: u64,

    /// Current simulation time (seconds)
    current_time: f64,
}

impl Oracle {
    /// Creates an Oracle with the given physics seed.
    ///
    /// Handles start at 1000 so they never look like agent ids in logs.
    pub fn new(physics_seed: u64) -> Self {
        Self {
            physics_rng: ChaCha8Rng::seed_from_u64(physics_seed),
            entities: BTreeMap::new(),
            next_id: 1000,
            capacity: None,
            drift_std: 0.5,
            max_speed: 3.0,
            kills: 0,
            current_time: 0.0,
        }
    }

    /// Limits how many managed objects may exist at once.
    pub fn set_capacity(&mut self, capacity: Option<usize>) {
        self.capacity = capacity;
    }

    /// Sets the drift noise.
    pub fn set_drift(&mut self, std_dev: f64, max_speed: f64) {
        self.drift_std = std_dev.max(0.0);
        self.max_speed = max_speed.max(0.0);
    }

    /// Spawns a managed object, unless at capacity.
    pub fn spawn(&mut self, position: Position) -> Option<PhysicalHandle> {
        if let Some(capacity) = self.capacity {
            if self.managed_count() >= capacity {
                return None;
            }
        }
        Some(self.insert(position, false))
    }

    /// Spawns a host-owned object the lifecycle manager knows nothing about.
    pub fn spawn_foreign(&mut self, position: Position) -> PhysicalHandle {
        self.insert(position, true)
    }

    fn insert(&mut self, position: Position, foreign: bool) -> PhysicalHandle {
        let handle = PhysicalHandle(self.next_id);
        self.next_id += 1;
        self.entities.insert(
            handle,
            PhysicalEntity {
                handle,
                position,
                velocity: Vector3::zeros(),
                foreign,
            },
        );
        handle
    }

    /// Unloads an object (no death).
    pub fn remove(&mut self, handle: PhysicalHandle) -> bool {
        self.entities.remove(&handle).is_some()
    }

    /// Kills a random object and returns its handle.
    pub fn kill_random(&mut self) -> Option<PhysicalHandle> {
        if self.entities.is_empty() {
            return None;
        }
        let index = self.physics_rng.gen_range(0..self.entities.len());
        let handle = *self.entities.keys().nth(index)?;
        self.kill(handle).then_some(handle)
    }

    /// Kills a specific object.
    pub fn kill(&mut self, handle: PhysicalHandle) -> bool {
        let removed = self.entities.remove(&handle).is_some();
        if removed {
            self.kills += 1;
        }
        removed
    }

    /// Advances physics by dt seconds.
    ///
    /// Velocities take a Gaussian kick, positions integrate and are clamped to
    /// the world, elevation is re-read from terrain.
    pub fn step<T>(&mut self, dt: f64, bounds: &WorldBounds, terrain: &T)
    where
        T: TerrainHeightOracle + ?Sized,
    {
        self.current_time += dt;

        for entity in self.entities.values_mut() {
            let kx: f64 = self.physics_rng.sample(StandardNormal);
            let kz: f64 = self.physics_rng.sample(StandardNormal);
            entity.velocity.x += kx * self.drift_std;
            entity.velocity.z += kz * self.drift_std;

            let speed = entity.velocity.norm();
            if speed > self.max_speed {
                entity.velocity *= self.max_speed / speed;
            }

            let x = (entity.position.x + entity.velocity.x * dt).clamp(bounds.min.x, bounds.max.x);
            let z = (entity.position.z + entity.velocity.z * dt).clamp(bounds.min.z, bounds.max.z);
            entity.position = terrain.ground(x, z);
        }
    }

    pub fn position(&self, handle: PhysicalHandle) -> Option<Position> {
        self.entities.get(&handle).map(|e| e.position)
    }

    pub fn entity(&self, handle: PhysicalHandle) -> Option<&PhysicalEntity> {
        self.entities.get(&handle)
    }

    /// Managed (non-foreign) objects.
    pub fn managed(&self) -> impl Iterator<Item = &PhysicalEntity> {
        self.entities.values().filter(|e| !e.foreign)
    }

    pub fn managed_count(&self) -> usize {
        self.managed().count()
    }

    pub fn foreign_count(&self) -> usize {
        self.entities.values().filter(|e| e.foreign).count()
    }

    pub fn kills(&self) -> u64 {
        self.kills
    }

    pub fn time(&self) -> f64 {
        self.current_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::SimTerrain;

    fn bounds() -> WorldBounds {
        WorldBounds::planar(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn test_oracle_spawn_and_remove() {
        let mut oracle = Oracle::new(42);
        let handle = oracle.spawn(Position::new(10.0, 0.0, 10.0)).unwrap();

        assert_eq!(oracle.position(handle), Some(Position::new(10.0, 0.0, 10.0)));
        assert!(oracle.remove(handle));
        assert!(!oracle.remove(handle));
        assert_eq!(oracle.kills(), 0);
    }

    #[test]
    fn test_oracle_capacity_ignores_foreign() {
        let mut oracle = Oracle::new(42);
        oracle.set_capacity(Some(1));
        oracle.spawn_foreign(Position::zeros());

        assert!(oracle.spawn(Position::zeros()).is_some());
        assert!(oracle.spawn(Position::zeros()).is_none());
        assert_eq!(oracle.managed_count(), 1);
        assert_eq!(oracle.foreign_count(), 1);
    }

    #[test]
    fn test_oracle_step_stays_in_bounds_and_on_ground() {
        let mut oracle = Oracle::new(7);
        let terrain = SimTerrain::new(7, 5.0, 40.0);
        oracle.set_drift(5.0, 50.0);
        let handle = oracle.spawn(Position::new(1.0, 0.0, 99.0)).unwrap();

        for _ in 0..500 {
            oracle.step(1.0 / 30.0, &bounds(), &terrain);
            let p = oracle.position(handle).unwrap();
            assert!(bounds().contains_planar(&p));
            assert_eq!(p.y, terrain.height(p.x, p.z));
        }
        assert!((oracle.time() - 500.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_oracle_kill_random() {
        let mut oracle = Oracle::new(42);
        assert_eq!(oracle.kill_random(), None);

        let a = oracle.spawn(Position::zeros()).unwrap();
        let b = oracle.spawn_foreign(Position::zeros());
        let first = oracle.kill_random().unwrap();
        let second = oracle.kill_random().unwrap();

        let mut killed = vec![first, second];
        killed.sort();
        assert_eq!(killed, vec![a, b]);
        assert_eq!(oracle.kills(), 2);
    }

    #[test]
    fn test_oracle_deterministic_drift() {
        let terrain = SimTerrain::flat(0.0);
        let mut o1 = Oracle::new(42);
        let mut o2 = Oracle::new(42);
        let h1 = o1.spawn(Position::new(50.0, 0.0, 50.0)).unwrap();
        let h2 = o2.spawn(Position::new(50.0, 0.0, 50.0)).unwrap();

        for _ in 0..10 {
            o1.step(0.1, &bounds(), &terrain);
            o2.step(0.1, &bounds(), &terrain);
        }
        assert_eq!(o1.position(h1), o2.position(h2));
    }
}
