//! Overlap separation and proximity-based victory
//!
//! Both run on post-move positions. Agents are circles; only same-team
//! pairs are pushed apart, since a hunter touching the other side is what
//! decides the round.

use glam::Vec2;

use super::state::{Agent, Outcome, Role, Target};

/// Share of the penetration each agent of a pair is moved
const DISPLACEMENT_SHARE: f32 = 0.5;

/// Contact between two circles
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Unit direction from the second circle toward the first
    pub normal: Vec2,
    /// Depth of the overlap (for position correction)
    pub penetration: f32,
}

/// Strict overlap test between two circles
///
/// Coincident centers have no defined direction; +X is used so the pair
/// still separates.
pub fn circle_contact(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> Option<Contact> {
    let delta = a - b;
    let radius_sum = a_radius + b_radius;
    if delta.length_squared() >= radius_sum * radius_sum {
        return None;
    }
    let dist = delta.length();
    let normal = if dist > 0.0 { delta / dist } else { Vec2::X };
    Some(Contact {
        normal,
        penetration: radius_sum - dist,
    })
}

/// Inclusive touch test used for captures and rescues
#[inline]
pub fn circles_touch(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let radius_sum = a_radius + b_radius;
    (a - b).length_squared() <= radius_sum * radius_sum
}

/// Push apart every overlapping same-team pair, half the penetration each
///
/// Pairs are visited once in (i, j < i) order. Returns how many pairs
/// were separated.
pub fn resolve_overlaps(agents: &mut [Agent]) -> usize {
    let mut separated = 0;
    for i in 1..agents.len() {
        let (head, tail) = agents.split_at_mut(i);
        let first = &mut tail[0];
        for second in head.iter_mut() {
            if first.team() != second.team() {
                continue;
            }
            if let Some(contact) = circle_contact(first.pos, first.radius, second.pos, second.radius) {
                let displacement = contact.normal * (contact.penetration * DISPLACEMENT_SHARE);
                first.pos += displacement;
                second.pos -= displacement;
                separated += 1;
            }
        }
    }
    separated
}

/// Evaluate the round from current positions
///
/// A hunter touching any guard hands the round to the quarry immediately.
/// A hunter touching its own quarry wins only if no guard touch shows up
/// anywhere else this tick, so a simultaneous rescue beats a capture.
pub fn check_victory(agents: &[Agent]) -> Outcome {
    let mut outcome = Outcome::Undecided;
    for hunter in agents.iter().filter(|a| a.role == Role::Hunter) {
        for other in agents {
            if other.id == hunter.id {
                continue;
            }
            if !circles_touch(hunter.pos, hunter.radius, other.pos, other.radius) {
                continue;
            }
            if other.role == Role::Guard {
                return Outcome::QuarryWins;
            }
            if other.role == Role::Quarry && hunter.target == Target::Agent(other.id) {
                // Keep scanning: a later guard touch still wins for the quarry
                outcome = Outcome::HunterWins;
            }
        }
    }
    outcome
}
