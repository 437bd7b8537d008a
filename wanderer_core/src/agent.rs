//! The agent data model.

use serde::{Deserialize, Serialize};
use wanderer_env::{planar_distance_sq, PhysicalHandle, Position};

/// Identifier of an agent, unique within one world session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How an agent currently exists in the world.
///
/// The handle lives inside `Physical`, so a virtual agent cannot carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Representation {
    /// Position-only, moved by the manager
    Virtual,

    /// Materialized as a host object, moved by the host
    Physical(PhysicalHandle),
}

impl Representation {
    /// Returns the physical handle, if materialized.
    pub fn handle(&self) -> Option<PhysicalHandle> {
        match self {
            Representation::Virtual => None,
            Representation::Physical(handle) => Some(*handle),
        }
    }

    /// Returns true if materialized.
    pub fn is_physical(&self) -> bool {
        matches!(self, Representation::Physical(_))
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Representation::Virtual => "virtual",
            Representation::Physical(_) => "PHYSICAL",
        }
    }
}

/// One roaming agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub(crate) id: AgentId,
    pub(crate) origin: Position,
    pub(crate) goal: Position,
    pub(crate) position: Position,
    pub(crate) representation: Representation,
    pub(crate) step_distance: f64,
}

impl Agent {
    /// Creates a virtual agent standing at its origin.
    pub fn new(id: AgentId, origin: Position, goal: Position, step_distance: f64) -> Self {
        Self {
            id,
            origin,
            goal,
            position: origin,
            representation: Representation::Virtual,
            step_distance,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Where the agent was created.
    pub fn origin(&self) -> Position {
        self.origin
    }

    /// Where the agent is heading.
    pub fn goal(&self) -> Position {
        self.goal
    }

    /// Current position (virtual estimate or last synced host position).
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// Shorthand for `representation().handle()`.
    pub fn physical_handle(&self) -> Option<PhysicalHandle> {
        self.representation.handle()
    }

    pub fn is_physical(&self) -> bool {
        self.representation.is_physical()
    }

    pub fn step_distance(&self) -> f64 {
        self.step_distance
    }

    /// Planar squared distance left to the goal.
    pub fn remaining_distance_sq(&self) -> f64 {
        planar_distance_sq(&self.position, &self.goal)
    }

    /// Returns true once within the arrival radius of the goal.
    pub fn has_arrived(&self, arrival_radius_sq: f64) -> bool {
        self.remaining_distance_sq() < arrival_radius_sq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_agent_is_virtual_at_origin() {
        let origin = Position::new(0.0, 3.0, 40.0);
        let goal = Position::new(100.0, 7.0, 60.0);
        let agent = Agent::new(AgentId(1), origin, goal, 0.1);

        assert_eq!(agent.position(), origin);
        assert_eq!(agent.representation(), Representation::Virtual);
        assert_eq!(agent.physical_handle(), None);
    }

    #[test]
    fn test_arrival_uses_planar_distance() {
        let goal = Position::new(50.0, 0.0, 52.0);
        // 4.9 units away on the plane, 1000 units below
        let near = Position::new(50.0, -1000.0, 47.1);
        let agent = Agent::new(AgentId(1), near, goal, 0.1);
        assert!(agent.has_arrived(25.0));

        let far = Position::new(50.0, 0.0, 47.0);
        let agent = Agent::new(AgentId(2), far, goal, 0.1);
        assert!(!agent.has_arrived(25.0));
    }

    #[test]
    fn test_representation_handle() {
        let physical = Representation::Physical(PhysicalHandle(9));
        assert_eq!(physical.handle(), Some(PhysicalHandle(9)));
        assert!(physical.is_physical());
        assert_eq!(Representation::Virtual.handle(), None);
    }

    #[test]
    fn test_agent_id_display() {
        assert_eq!(AgentId(17).to_string(), "#17");
    }
}
