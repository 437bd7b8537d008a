//! Lifecycle scenarios for the simulation harness.

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioId {
    /// WND-001: No observers, nothing may move or materialize
    QuietWorld,

    /// WND-002: Walking observers, agents flip between representations
    Patrol,

    /// WND-003: Everything observed, host kills objects (ours and foreign)
    Crossfire,

    /// WND-004: Host can only hold 3 objects, creation keeps failing
    Saturation,

    /// WND-005: Operator spawns extra agents on top of the target
    Reinforcements,

    /// WND-006: Terrain shifts mid-run, elevations must follow
    Landslide,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::QuietWorld,
            ScenarioId::Patrol,
            ScenarioId::Crossfire,
            ScenarioId::Saturation,
            ScenarioId::Reinforcements,
            ScenarioId::Landslide,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::QuietWorld => "quiet_world",
            ScenarioId::Patrol => "patrol",
            ScenarioId::Crossfire => "crossfire",
            ScenarioId::Saturation => "saturation",
            ScenarioId::Reinforcements => "reinforcements",
            ScenarioId::Landslide => "landslide",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::QuietWorld => "No observers: population frozen, nothing materializes",
            ScenarioId::Patrol => "2 walking observers, agents materialize and dematerialize",
            ScenarioId::Crossfire => "Whole world observed, 25% chance per tick of a host kill",
            ScenarioId::Saturation => "Host capacity 3: creation failures retried, no leaks",
            ScenarioId::Reinforcements => "spawnagents 5 at start, surplus drains without refill",
            ScenarioId::Landslide => "Terrain shifts halfway, every elevation re-resolved",
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quiet_world" | "quietworld" | "quiet" | "wnd-001" => Ok(ScenarioId::QuietWorld),
            "patrol" | "wnd-002" => Ok(ScenarioId::Patrol),
            "crossfire" | "wnd-003" => Ok(ScenarioId::Crossfire),
            "saturation" | "wnd-004" => Ok(ScenarioId::Saturation),
            "reinforcements" | "wnd-005" => Ok(ScenarioId::Reinforcements),
            "landslide" | "wnd-006" => Ok(ScenarioId::Landslide),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
