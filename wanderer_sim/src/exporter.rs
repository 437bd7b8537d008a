//! JSON exporter for offline visualization.
//!
//! Exports simulation frames as JSON: agent positions with their
//! representation, observers with their active radius, and lifecycle events.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use wanderer_core::{AgentId, LifecycleStats};
use wanderer_env::{PhysicalHandle, Position};

/// A single frame of simulation data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimFrame {
    /// Tick number
    pub tick: u64,

    /// Simulation time in seconds
    pub time_sec: f64,

    /// Live agents
    pub agents: Vec<AgentPosition>,

    /// Observers and their active areas
    pub observers: Vec<ObserverPosition>,

    /// Events (kills, operator commands, terrain changes)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<SimEvent>,
}

/// Position of an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentPosition {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub physical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<u64>,
}

impl AgentPosition {
    pub fn new(id: AgentId, pos: Position, handle: Option<PhysicalHandle>) -> Self {
        Self {
            id: id.0,
            x: pos.x,
            y: pos.y,
            z: pos.z,
            physical: handle.is_some(),
            handle: handle.map(|h| h.raw()),
        }
    }
}

/// Observer position and radius.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserverPosition {
    pub x: f64,
    pub z: f64,
    pub radius: f64,
}

impl ObserverPosition {
    pub fn new(pos: Position, radius: f64) -> Self {
        Self {
            x: pos.x,
            z: pos.z,
            radius,
        }
    }
}

/// Simulation event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimEvent {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl SimEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: None,
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: Some("warn".to_string()),
        }
    }
}

/// Complete simulation export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Duration in seconds
    pub duration_sec: f64,

    /// All frames
    pub frames: Vec<SimFrame>,

    /// Final results
    pub passed: bool,

    /// Lifecycle counters at the end of the run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<LifecycleStats>,

    /// Failure message if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            duration_sec: 0.0,
            frames: Vec::new(),
            passed: false,
            stats: None,
            failure_reason: None,
        }
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: SimFrame) {
        self.duration_sec = frame.time_sec;
        self.frames.push(frame);
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, passed: bool, stats: LifecycleStats, failure_reason: Option<String>) {
        self.passed = passed;
        self.stats = Some(stats);
        self.failure_reason = failure_reason;
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_position_marks_physical() {
        let virt = AgentPosition::new(AgentId(1), Position::new(1.0, 2.0, 3.0), None);
        let phys = AgentPosition::new(AgentId(2), Position::zeros(), Some(PhysicalHandle(1001)));

        assert!(!virt.physical);
        assert_eq!(phys.handle, Some(1001));

        let json = serde_json::to_value(&virt).unwrap();
        assert!(json.get("handle").is_none());
        assert_eq!(json["z"], 3.0);
    }

    #[test]
    fn test_export_tracks_duration() {
        let mut export = SimExport::new("patrol", 7);
        export.add_frame(SimFrame {
            tick: 30,
            time_sec: 1.0,
            agents: vec![],
            observers: vec![],
            events: vec![SimEvent::warn("agent #3 killed")],
        });
        export.finalize(true, LifecycleStats::default(), None);

        assert_eq!(export.duration_sec, 1.0);
        let json = serde_json::to_string(&export).unwrap();
        assert!(json.contains("\"scenario\":\"patrol\""));
        assert!(json.contains("agent #3 killed"));
        assert!(!json.contains("failure_reason"));
    }
}
