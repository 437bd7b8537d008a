//! Operator command surface.
//!
//! Mirrors a game server console: `spawnagents <count>` adds edge-placed
//! agents on top of the steady-state population. All argument checking
//! happens here; the lifecycle manager only ever sees a valid count.

use std::str::FromStr;
use thiserror::Error;
use wanderer_core::{AgentLifecycleManager, LifecycleError};
use wanderer_env::{TerrainHeightOracle, WorldBounds};

/// Console name of the spawn command.
pub const SPAWN_COMMAND: &str = "spawnagents";

/// Usage line printed on malformed input.
pub const SPAWN_USAGE: &str = "Usage: spawnagents <count>  (example: spawnagents 5)";

/// Rejected console input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// First token is not a known command
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    /// Arguments do not form a single positive integer
    #[error("Invalid arguments {args:?}. {usage}")]
    InvalidArguments { args: Vec<String>, usage: &'static str },
}

impl CommandError {
    fn usage(args: &[&str]) -> Self {
        Self::InvalidArguments {
            args: args.iter().map(|a| a.to_string()).collect(),
            usage: SPAWN_USAGE,
        }
    }
}

/// A validated `spawnagents` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnCommand {
    /// Number of agents to add (always > 0)
    pub count: usize,
}

impl SpawnCommand {
    /// Parses the argument tokens following the command name.
    pub fn parse_args(args: &[&str]) -> Result<Self, CommandError> {
        let [token] = args else {
            return Err(CommandError::usage(args));
        };

        match token.parse::<usize>() {
            Ok(count) if count > 0 => Ok(Self { count }),
            _ => Err(CommandError::usage(args)),
        }
    }

    /// Runs the command and returns one console line per created agent.
    pub fn execute<T>(
        &self,
        manager: &mut AgentLifecycleManager,
        terrain: &T,
        bounds: &WorldBounds,
    ) -> Result<Vec<String>, LifecycleError>
    where
        T: TerrainHeightOracle + ?Sized,
    {
        let ids = manager.request_external_spawn(terrain, bounds, self.count)?;

        Ok(ids
            .into_iter()
            .filter_map(|id| manager.agent(id))
            .map(|agent| {
                let (o, g) = (agent.origin(), agent.goal());
                format!(
                    "Agent {} spawned at edge: ({:.1}, {:.1}, {:.1}) -> ({:.1}, {:.1}, {:.1})",
                    agent.id(),
                    o.x,
                    o.y,
                    o.z,
                    g.x,
                    g.y,
                    g.z
                )
            })
            .collect())
    }
}

impl FromStr for SpawnCommand {
    type Err = CommandError;

    /// Parses a full console line, e.g. `"spawnagents 5"`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some(name) if name.eq_ignore_ascii_case(SPAWN_COMMAND) => {
                let args: Vec<&str> = tokens.collect();
                Self::parse_args(&args)
            }
            Some(other) => Err(CommandError::UnknownCommand(other.to_string())),
            None => Err(CommandError::usage(&[])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wanderer_core::LifecycleConfig;
    use wanderer_env::FlatTerrain;

    #[test]
    fn test_parse_valid() {
        assert_eq!(SpawnCommand::parse_args(&["5"]), Ok(SpawnCommand { count: 5 }));
        assert_eq!("spawnagents 12".parse(), Ok(SpawnCommand { count: 12 }));
        assert_eq!("  SPAWNAGENTS   1 ".parse(), Ok(SpawnCommand { count: 1 }));
    }

    #[test]
    fn test_parse_rejects_bad_arguments() {
        let cases: [&[&str]; 6] = [&[], &["0"], &["-3"], &["five"], &["2", "3"], &["1.5"]];
        for args in cases {
            let err = SpawnCommand::parse_args(args).unwrap_err();
            assert!(err.to_string().contains(SPAWN_USAGE), "{:?}", args);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_command() {
        let err = "spawnzombies 3".parse::<SpawnCommand>().unwrap_err();
        assert_eq!(err, CommandError::UnknownCommand("spawnzombies".to_string()));
    }

    #[test]
    fn test_execute_reports_each_agent() {
        let terrain = FlatTerrain::new(2.0);
        let bounds = WorldBounds::planar(0.0, 0.0, 100.0, 100.0);
        let mut manager =
            AgentLifecycleManager::new(LifecycleConfig::default().with_seed(4)).unwrap();
        manager.initialize(&terrain, &bounds).unwrap();

        let lines = SpawnCommand { count: 3 }
            .execute(&mut manager, &terrain, &bounds)
            .unwrap();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Agent #11 spawned at edge"));
        assert!(lines[2].starts_with("Agent #13 spawned at edge"));
        assert_eq!(manager.len(), 13);
    }
}
