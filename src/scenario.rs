//! Board setup
//!
//! Where everything starts and how fast it moves. `SimState::reset` replays
//! a scenario with the run seed, so the same seed always yields the same
//! guard placement.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sim::{Agent, AgentId, Role};

/// Per-role movement limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentStats {
    /// Units per second
    pub max_speed: f32,
    /// Degrees per second
    pub turn_rate: f32,
    pub radius: f32,
    /// Initial facing (degrees)
    #[serde(default)]
    pub facing: f32,
}

impl Default for AgentStats {
    fn default() -> Self {
        Self {
            max_speed: 1.0,
            turn_rate: 360.0,
            radius: 0.5,
            facing: 0.0,
        }
    }
}

/// Axis-aligned spawn area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub min: Vec2,
    pub max: Vec2,
}

impl Zone {
    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Uniform point inside the zone
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            rng.random_range(self.min.x..=self.max.x),
            rng.random_range(self.min.y..=self.max.y),
        )
    }
}

/// Starting layout of a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub hunter_start: Vec2,
    pub quarry_start: Vec2,
    pub guard_zone: Zone,
    pub num_guards: u32,
    pub hunter: AgentStats,
    pub quarry: AgentStats,
    pub guard: AgentStats,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            hunter_start: Vec2::new(0.0, 3.0),
            quarry_start: Vec2::new(0.0, -3.0),
            guard_zone: Zone {
                min: Vec2::splat(-1.0),
                max: Vec2::splat(1.0),
            },
            num_guards: 1,
            hunter: AgentStats {
                facing: -90.0,
                ..Default::default()
            },
            quarry: AgentStats::default(),
            guard: AgentStats {
                facing: 90.0,
                ..Default::default()
            },
        }
    }
}

impl Scenario {
    pub fn stats(&self, role: Role) -> AgentStats {
        match role {
            Role::Hunter => self.hunter,
            Role::Quarry => self.quarry,
            Role::Guard => self.guard,
        }
    }

    /// Roles and positions in spawn order: hunter, quarry, then guards
    pub fn spawn_points<R: Rng>(&self, rng: &mut R) -> Vec<(Role, Vec2)> {
        let mut points = vec![(Role::Hunter, self.hunter_start), (Role::Quarry, self.quarry_start)];
        for _ in 0..self.num_guards {
            points.push((Role::Guard, self.guard_zone.sample(rng)));
        }
        points
    }

    /// Build an agent with this scenario's stats for its role
    pub fn agent(&self, id: AgentId, role: Role, pos: Vec2) -> Agent {
        let stats = self.stats(role);
        Agent {
            facing: stats.facing,
            radius: stats.radius,
            max_speed: stats.max_speed,
            turn_rate: stats.turn_rate,
            ..Agent::new(id, role, pos)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::RngState;

    #[test]
    fn test_default_board() {
        let scenario = Scenario::default();
        let mut rng = RngState::new(1, RngState::SPAWN_STREAM).to_rng();
        let points = scenario.spawn_points(&mut rng);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], (Role::Hunter, Vec2::new(0.0, 3.0)));
        assert_eq!(points[1], (Role::Quarry, Vec2::new(0.0, -3.0)));
        assert_eq!(points[2].0, Role::Guard);
        assert!(scenario.guard_zone.contains(points[2].1));
    }

    #[test]
    fn test_spawn_is_seeded() {
        let scenario = Scenario {
            num_guards: 5,
            ..Default::default()
        };
        let spawn = |seed| scenario.spawn_points(&mut RngState::new(seed, RngState::SPAWN_STREAM).to_rng());
        assert_eq!(spawn(8), spawn(8));
        assert_ne!(spawn(8), spawn(9));
    }

    #[test]
    fn test_agent_uses_role_stats() {
        let scenario = Scenario::default();
        let hunter = scenario.agent(AgentId(1), Role::Hunter, Vec2::ZERO);
        assert_eq!(hunter.facing, -90.0);
        let guard = scenario.agent(AgentId(2), Role::Guard, Vec2::ZERO);
        assert_eq!(guard.facing, 90.0);
        assert_eq!(guard.radius, 0.5);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let scenario: Scenario = serde_json::from_str(r#"{ "num_guards": 4 }"#).unwrap();
        assert_eq!(scenario.num_guards, 4);
        assert_eq!(scenario.hunter_start, Vec2::new(0.0, 3.0));
    }
}
