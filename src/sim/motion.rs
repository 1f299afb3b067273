//! Kinematic motion integrator and the non-hunter steering rules

use glam::Vec2;

use super::geometry::move_towards;
use super::state::{Agent, AgentView};
use crate::consts::{FACING_SPEED_SQ_THRESHOLD, GUARD_LEAD_TIME};
use crate::{delta_degrees, heading_degrees, normalize_degrees};

/// Rotate `current` toward `target` by at most `max_delta` degrees, taking
/// the short way around
pub fn turn_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = delta_degrees(current, target);
    let clamped = delta.clamp(-max_delta, max_delta);
    normalize_degrees(current + clamped)
}

/// Move an agent toward its waypoint for one tick
///
/// Displacement is capped at `max_speed * dt`; velocity is the resulting
/// displacement over `dt`. Facing follows the velocity heading, limited by
/// the turn rate, and only once the agent is actually moving.
pub fn move_to_waypoint(agent: &mut Agent, waypoint: Vec2, dt: f32) {
    let last = agent.pos;
    agent.pos = move_towards(last, waypoint, agent.max_speed * dt);
    agent.vel = (agent.pos - last) / dt;

    if agent.vel.length_squared() > FACING_SPEED_SQ_THRESHOLD {
        let desired = heading_degrees(agent.vel);
        agent.facing = turn_towards(agent.facing, desired, agent.turn_rate * dt);
    }
}

/// Guards aim where their target will be after the lead time
#[inline]
pub fn intercept_point(target: &AgentView) -> Vec2 {
    target.pos + target.vel * GUARD_LEAD_TIME
}
