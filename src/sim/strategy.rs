//! Hunter steering strategies
//!
//! The set of strategies is closed: `StrategyKind` is the registry the host
//! picks from, and `Strategy` carries whatever per-instance state a kind
//! needs across ticks (frame counters, pooled blobs).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::blob::GuardBlob;
use super::blob_manager::BlobManager;
use super::geometry::{inverse_square_average, rotate, rotate90};
use super::state::{AgentView, NoiseSource};
use crate::consts::*;

/// Every available steering strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StrategyKind {
    /// Head straight for the target
    #[default]
    Direct,
    /// Orbit inward around the target
    SpiralInward,
    /// Sidestep the nearest guard ahead
    FleeClosest,
    /// Average the sidesteps of every nearby guard ahead
    FleeAll,
    /// Inverse-square push away from every guard
    Repulsion,
    /// Repulsion plus the outline of all guards as one blob
    SingleBlob,
    /// Repulsion plus the outline of each guard cluster
    MultiBlob,
    /// Scripted east/south/west dash, then direct pursuit
    ZigZag,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 8] = [
        StrategyKind::Direct,
        StrategyKind::SpiralInward,
        StrategyKind::FleeClosest,
        StrategyKind::FleeAll,
        StrategyKind::Repulsion,
        StrategyKind::SingleBlob,
        StrategyKind::MultiBlob,
        StrategyKind::ZigZag,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Direct => "Direct",
            StrategyKind::SpiralInward => "SpiralInward",
            StrategyKind::FleeClosest => "FleeClosest",
            StrategyKind::FleeAll => "FleeAll",
            StrategyKind::Repulsion => "Repulsion",
            StrategyKind::SingleBlob => "SingleBlob",
            StrategyKind::MultiBlob => "MultiBlob",
            StrategyKind::ZigZag => "ZigZag",
        }
    }

    /// Case-insensitive lookup; dashes and underscores are ignored
    pub fn from_name(s: &str) -> Option<Self> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().to_lowercase() == wanted)
    }
}

/// A live strategy instance
#[derive(Debug, Clone)]
pub enum Strategy {
    Direct,
    SpiralInward,
    FleeClosest,
    FleeAll,
    Repulsion,
    SingleBlob { blob: GuardBlob },
    MultiBlob { manager: BlobManager },
    ZigZag { frame: u32 },
}

impl Strategy {
    /// Fresh instance with all counters at zero
    pub fn new(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Direct => Strategy::Direct,
            StrategyKind::SpiralInward => Strategy::SpiralInward,
            StrategyKind::FleeClosest => Strategy::FleeClosest,
            StrategyKind::FleeAll => Strategy::FleeAll,
            StrategyKind::Repulsion => Strategy::Repulsion,
            StrategyKind::SingleBlob => Strategy::SingleBlob {
                blob: GuardBlob::default(),
            },
            StrategyKind::MultiBlob => Strategy::MultiBlob {
                manager: BlobManager::new(),
            },
            StrategyKind::ZigZag => Strategy::ZigZag { frame: 0 },
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Direct => StrategyKind::Direct,
            Strategy::SpiralInward => StrategyKind::SpiralInward,
            Strategy::FleeClosest => StrategyKind::FleeClosest,
            Strategy::FleeAll => StrategyKind::FleeAll,
            Strategy::Repulsion => StrategyKind::Repulsion,
            Strategy::SingleBlob { .. } => StrategyKind::SingleBlob,
            Strategy::MultiBlob { .. } => StrategyKind::MultiBlob,
            Strategy::ZigZag { .. } => StrategyKind::ZigZag,
        }
    }

    /// Pick the point the seeker should move toward this tick
    pub fn choose_waypoint(
        &mut self,
        seeker: &AgentView,
        target: &AgentView,
        obstacles: &[AgentView],
        noise: &mut dyn NoiseSource,
    ) -> Vec2 {
        match self {
            Strategy::Direct => target.pos,
            Strategy::SpiralInward => {
                let to_target = target.pos - seeker.pos;
                seeker.pos + to_target + SPIRAL_WINDING * rotate90(to_target)
            }
            Strategy::FleeClosest => flee_closest(seeker, target, obstacles),
            Strategy::FleeAll => flee_all(seeker, target, obstacles),
            Strategy::Repulsion => {
                let repulsion = inverse_square_average(obstacles.iter().map(|g| seeker.pos - g.pos));
                repel(seeker, target, repulsion, noise)
            }
            Strategy::SingleBlob { blob } => {
                blob.reset(seeker.pos);
                for guard in obstacles {
                    blob.add_guard(guard.pos, guard.radius);
                }
                let Some(closest) = blob.closest_point() else {
                    return target.pos;
                };

                let outline = [blob.segment0(), blob.segment1(), closest];
                let offsets = obstacles
                    .iter()
                    .map(|g| g.pos)
                    .chain(outline)
                    .map(|p| seeker.pos - p);
                repel(seeker, target, inverse_square_average(offsets), noise)
            }
            Strategy::MultiBlob { manager } => {
                manager.link_nearby(obstacles, BLOB_SEPARATION_FACTOR);
                let blobs = manager.build_blobs(seeker.pos, obstacles);
                log::trace!("{} guards in {} blobs", obstacles.len(), blobs.len());

                let offsets = obstacles
                    .iter()
                    .map(|g| g.pos)
                    .chain(blobs.iter().map(GuardBlob::segment0))
                    .chain(blobs.iter().map(GuardBlob::segment1))
                    .chain(blobs.iter().filter_map(GuardBlob::closest_point))
                    .map(|p| seeker.pos - p);
                let repulsion = inverse_square_average(offsets);
                repel(seeker, target, repulsion, noise)
            }
            Strategy::ZigZag { frame } => {
                *frame = frame.saturating_add(1);
                let [east, south, west] = ZIGZAG_PHASES;
                if *frame < east {
                    seeker.pos + Vec2::X
                } else if *frame < south {
                    seeker.pos - Vec2::Y
                } else if *frame < west {
                    seeker.pos - Vec2::X
                } else {
                    target.pos
                }
            }
        }
    }
}

/// Combine a repulsion vector with the pull toward the target and take one
/// max-speed step in that direction, rotated by the tie-break noise
fn repel(seeker: &AgentView, target: &AgentView, repulsion: Vec2, noise: &mut dyn NoiseSource) -> Vec2 {
    let to_target = (target.pos - seeker.pos).normalize_or_zero() * TARGET_WEIGHT;
    let step = (repulsion + to_target).normalize_or_zero() * seeker.max_speed;
    seeker.pos + rotate(step, noise.sample() * NOISE_SPREAD_DEG)
}

/// Run away from a threat at an angle, favoring the side that keeps the
/// most progress toward the target
fn escape_step(to_threat: Vec2, to_target: Vec2) -> Vec2 {
    let lateral0 = -rotate(to_threat, ESCAPE_ANGLE_DEG);
    let lateral1 = -rotate(to_threat, -ESCAPE_ANGLE_DEG);
    if lateral0.dot(to_target) > lateral1.dot(to_target) {
        lateral0
    } else {
        lateral1
    }
}

fn flee_closest(seeker: &AgentView, target: &AgentView, obstacles: &[AgentView]) -> Vec2 {
    let to_target = target.pos - seeker.pos;

    // Nearest obstacle in front of the seeker
    let threat = obstacles
        .iter()
        .filter(|g| (g.pos - seeker.pos).dot(to_target) > 0.0)
        .min_by(|a, b| {
            let da = (a.pos - seeker.pos).length_squared();
            let db = (b.pos - seeker.pos).length_squared();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(threat) = threat else {
        return target.pos;
    };

    let to_threat = threat.pos - seeker.pos;
    let max_distance = (threat.radius + seeker.radius) * FLEE_CLOSEST_DANGER_ZONE;
    if to_threat.length_squared() > max_distance * max_distance {
        return target.pos;
    }

    seeker.pos + escape_step(to_threat, to_target)
}

fn flee_all(seeker: &AgentView, target: &AgentView, obstacles: &[AgentView]) -> Vec2 {
    let to_target = target.pos - seeker.pos;
    let forward = to_target.normalize_or_zero();

    let mut sum = Vec2::ZERO;
    let mut threats = 0u32;

    for threat in obstacles {
        let to_threat = threat.pos - seeker.pos;

        // Behind the seeker
        if to_threat.dot(forward) < -threat.radius {
            continue;
        }

        let max_distance = (threat.radius + seeker.radius) * FLEE_ALL_DANGER_ZONE;
        if to_threat.length_squared() > max_distance * max_distance {
            continue;
        }

        threats += 1;
        sum += seeker.pos + escape_step(to_threat, to_target);
    }

    if threats == 0 {
        return target.pos;
    }
    sum / threats as f32
}
