//! Procedural terrain for simulation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;
use wanderer_env::TerrainHeightOracle;

/// Rolling hills built from a few sine waves.
///
/// Deterministic for a seed. [`shift`](Self::shift) moves the hills, which
/// models terrain changing while agents are on their way.
#[derive(Debug, Clone)]
pub struct SimTerrain {
    /// Mean ground elevation
    base: f64,

    /// Peak deviation from the base
    amplitude: f64,

    /// Wavelength of the primary hills in world units
    wavelength: f64,

    /// Seed-derived phase offsets
    phase_x: f64,
    phase_z: f64,

    /// Accumulated shift applied to both phases
    shift: f64,
}

impl SimTerrain {
    /// Creates terrain with seed-derived phases.
    pub fn new(seed: u64, amplitude: f64, wavelength: f64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self {
            base: 0.0,
            amplitude,
            wavelength: wavelength.max(1.0),
            phase_x: rng.gen_range(0.0..TAU),
            phase_z: rng.gen_range(0.0..TAU),
            shift: 0.0,
        }
    }

    /// Terrain with no relief at all.
    pub fn flat(elevation: f64) -> Self {
        Self {
            base: elevation,
            amplitude: 0.0,
            wavelength: 1.0,
            phase_x: 0.0,
            phase_z: 0.0,
            shift: 0.0,
        }
    }

    /// Moves the hills by `radians` of phase.
    pub fn shift(&mut self, radians: f64) {
        self.shift += radians;
    }

    /// Raises or lowers the whole terrain.
    pub fn raise(&mut self, delta: f64) {
        self.base += delta;
    }
}

impl TerrainHeightOracle for SimTerrain {
    fn height(&self, x: f64, z: f64) -> f64 {
        let u = x / self.wavelength * TAU + self.phase_x + self.shift;
        let v = z / self.wavelength * TAU + self.phase_z + self.shift;
        // Secondary ripple at a third of the wavelength
        let ripple = (3.0 * u + 2.0 * v).sin() * 0.25;
        self.base + self.amplitude * (u.sin() * v.cos() + ripple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_deterministic() {
        let a = SimTerrain::new(42, 10.0, 100.0);
        let b = SimTerrain::new(42, 10.0, 100.0);
        assert_eq!(a.height(12.5, -40.0), b.height(12.5, -40.0));
    }

    #[test]
    fn test_terrain_bounded_by_amplitude() {
        let t = SimTerrain::new(3, 8.0, 50.0);
        for i in 0..100 {
            let h = t.height(i as f64 * 7.3, i as f64 * -3.1);
            assert!(h.abs() <= 8.0 * 1.25 + 1e-9);
        }
    }

    #[test]
    fn test_shift_changes_heights() {
        let mut t = SimTerrain::new(9, 10.0, 100.0);
        let before = t.height(30.0, 30.0);
        t.shift(1.0);
        assert_ne!(before, t.height(30.0, 30.0));
    }

    #[test]
    fn test_flat() {
        let t = SimTerrain::flat(3.0);
        assert_eq!(t.height(1.0, 2.0), 3.0);
    }
}
