//! Wanderer Deterministic Simulation Harness
//!
//! This crate hosts the lifecycle manager inside a fully simulated world so
//! every transition, kill and replenishment can be replayed from one seed.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         SimWorld                            │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │ AgentLifecycleManager (virtual + physical agents)    │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │       │ HostEvent              ▲ create / destroy / sync    │
//! │  ┌────▼────────────────────────┴─────┐                      │
//! │  │              SimHost              │                      │
//! │  │  SimTerrain   ObserverSet  Oracle │                      │
//! │  │  (heights)    (presence)   (objs) │                      │
//! │  └───────────────────────────────────┘                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use wanderer_sim::{ScenarioRunner, ScenarioId};
//!
//! let result = ScenarioRunner::new(42)
//!     .with_duration(10.0)
//!     .run(ScenarioId::Crossfire);
//! assert!(result.passed);
//! ```

mod command;
mod error;
mod exporter;
mod observers;
mod oracle;
mod runner;
pub mod scenarios;
mod terrain;
mod world;

pub use command::{CommandError, SpawnCommand, SPAWN_COMMAND, SPAWN_USAGE};
pub use error::SimError;
pub use exporter::{AgentPosition, ObserverPosition, SimEvent, SimExport, SimFrame};
pub use observers::{Observer, ObserverSet};
pub use oracle::{Oracle, PhysicalEntity};
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use scenarios::ScenarioId;
pub use terrain::SimTerrain;
pub use world::{KillEvent, SimConfig, SimHost, SimWorld};
