//! Wanderer Core - Lifecycle manager for a roaming agent population
//!
//! Keeps a large world looking populated while paying almost nothing for it:
//! 1. **Virtual agents**: far from every observer an agent is just a position
//!    walking a straight line from one world edge to the opposite one
//! 2. **Physical agents**: inside an observer's active radius the agent is
//!    materialized as a host-simulated object and the host moves it
//! 3. **Population control**: arrivals and kills are retired and replaced in
//!    the same tick, so the target population is always met
//!
//! # Tick Flow
//!
//! ```text
//!   host step ──► AgentLifecycleManager::tick
//!                   │  snapshot ids
//!                   ├─ Virtual:  move ─► active? ─► create()  ─► Physical
//!                   ├─ Physical: sync ─► inactive? ─► destroy() ─► Virtual
//!                   ├─ arrived?  ─► destroy (if physical) ─► remove
//!                   └─ replenish up to target
//!   host kill ───► AgentLifecycleManager::notify_killed
//! ```

pub mod agent;
pub mod bridge;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod metrics;
pub mod movement;
pub mod placement;

// Re-export key types for convenience
pub use agent::{Agent, AgentId, Representation};
pub use bridge::HostEvent;
pub use config::LifecycleConfig;
pub use error::LifecycleError;
pub use lifecycle::AgentLifecycleManager;
pub use metrics::LifecycleStats;
pub use placement::{Edge, EdgeRoute};
