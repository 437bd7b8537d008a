//! Observers (players, cameras) and the active areas around them.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use wanderer_env::{planar_distance_sq, Position, PresenceOracle, WorldBounds};

/// Something the host fully simulates the world around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    /// Planar position (elevation unused)
    pub position: Position,

    /// Active radius
    pub radius: f64,

    /// Walking speed in units per second (0 = stationary)
    pub speed: f64,

    /// Current walk target
    target: Position,
}

impl Observer {
    /// Creates a stationary observer.
    pub fn stationary(position: Position, radius: f64) -> Self {
        Self {
            position,
            radius,
            speed: 0.0,
            target: position,
        }
    }

    /// Returns true if `position` lies within the active radius.
    pub fn covers(&self, position: &Position) -> bool {
        planar_distance_sq(&self.position, position) <= self.radius * self.radius
    }
}

/// All observers in the world.
pub struct ObserverSet {
    observers: Vec<Observer>,
    rng: ChaCha8Rng,
}

impl ObserverSet {
    /// Creates an empty set with its own walk RNG.
    pub fn new(seed: u64) -> Self {
        Self {
            observers: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Adds a walking observer at a random point inside `bounds`.
    pub fn spawn_walker(&mut self, bounds: &WorldBounds, radius: f64, speed: f64) {
        let position = self.random_point(bounds);
        let target = self.random_point(bounds);
        self.observers.push(Observer {
            position,
            radius,
            speed,
            target,
        });
    }

    /// Adds an observer as-is.
    pub fn push(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    /// Removes every observer.
    pub fn clear(&mut self) {
        self.observers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observer> {
        self.observers.iter()
    }

    /// Walks every observer toward its target, picking a new one on arrival.
    pub fn step(&mut self, dt: f64, bounds: &WorldBounds) {
        for i in 0..self.observers.len() {
            let reach = self.observers[i].speed * dt;
            if reach <= 0.0 {
                continue;
            }

            let (position, target) = (self.observers[i].position, self.observers[i].target);
            let delta = Position::new(target.x - position.x, 0.0, target.z - position.z);
            let distance = delta.norm();

            if distance <= reach {
                self.observers[i].position = target;
                self.observers[i].target = self.random_point(bounds);
            } else {
                self.observers[i].position = position + delta * (reach / distance);
            }
        }
    }

    fn random_point(&mut self, bounds: &WorldBounds) -> Position {
        if bounds.is_degenerate() {
            return bounds.min;
        }
        Position::new(
            self.rng.gen_range(bounds.min.x..bounds.max.x),
            0.0,
            self.rng.gen_range(bounds.min.z..bounds.max.z),
        )
    }
}

impl PresenceOracle for ObserverSet {
    fn is_active_area(&self, position: &Position) -> bool {
        self.observers.iter().any(|o| o.covers(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> WorldBounds {
        WorldBounds::planar(0.0, 0.0, 200.0, 200.0)
    }

    #[test]
    fn test_presence_uses_planar_radius() {
        let mut set = ObserverSet::new(1);
        set.push(Observer::stationary(Position::new(100.0, 0.0, 100.0), 10.0));

        assert!(set.is_active_area(&Position::new(106.0, 500.0, 108.0)));
        assert!(!set.is_active_area(&Position::new(111.0, 0.0, 100.0)));
    }

    #[test]
    fn test_empty_set_has_no_active_area() {
        let set = ObserverSet::new(1);
        assert!(!set.is_active_area(&Position::zeros()));
    }

    #[test]
    fn test_walkers_stay_in_bounds() {
        let mut set = ObserverSet::new(7);
        set.spawn_walker(&bounds(), 20.0, 15.0);
        set.spawn_walker(&bounds(), 20.0, 40.0);

        for _ in 0..1000 {
            set.step(1.0 / 30.0, &bounds());
            for o in set.iter() {
                assert!(bounds().contains_planar(&o.position));
            }
        }
    }

    #[test]
    fn test_walker_moves_at_speed() {
        let mut set = ObserverSet::new(3);
        set.spawn_walker(&bounds(), 20.0, 30.0);
        let before = set.iter().next().unwrap().position;

        set.step(0.1, &bounds());

        let after = set.iter().next().unwrap().position;
        assert!(planar_distance_sq(&before, &after) <= 9.0 + 1e-9);
        assert_ne!(before, after);
    }
}
