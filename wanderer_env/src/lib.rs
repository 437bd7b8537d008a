//! Wanderer Host Boundary
//!
//! This crate describes everything the lifecycle manager needs from the
//! host world, and nothing more:
//! - **Terrain**: ground elevation at a planar coordinate
//! - **Presence**: whether a position lies inside an observer's active radius
//! - **Physical objects**: creation, destruction and authoritative position
//!   of materialized agents
//!
//! The manager in `wanderer_core` is written against these traits only, so the
//! same code drives a real game host or the deterministic harness in
//! `wanderer_sim`.
//!
//! # Coordinate space
//!
//! Positions are `nalgebra::Vector3<f64>` with `y` as elevation. "Planar"
//! always means the `(x, z)` ground plane.
//!
//! # Example
//!
//! ```ignore
//! use wanderer_env::{HostWorld, WorldBounds, Position};
//!
//! fn materialize<H: HostWorld>(host: &mut H, at: Position) {
//!     if host.is_active_area(&at) {
//!         let _handle = host.create(at);
//!     }
//! }
//! ```

mod host;
mod factory;
mod types;
mod error;
mod static_impl;

pub use host::{TerrainHeightOracle, PresenceOracle, HostWorld};
pub use factory::PhysicalAgentFactory;
pub use types::{Position, PhysicalHandle, WorldBounds, planar_distance_sq};
pub use error::EnvError;
pub use static_impl::{FlatTerrain, FixedPresence};
