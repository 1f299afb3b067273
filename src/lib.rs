//! Pursuit Sim - hunters, quarries and guards on an open board
//!
//! Core modules:
//! - `sim`: Deterministic simulation (steering, motion, overlap, victory)
//! - `scenario`: Board setup used when the simulation is (re)started
//! - `settings`: Run settings persisted as JSON

pub mod scenario;
pub mod settings;
pub mod sim;

pub use scenario::Scenario;
pub use settings::Settings;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz)
    pub const SIM_DT: f32 = 1.0 / 50.0;

    /// Facing only tracks motion when |velocity|² exceeds this
    pub const FACING_SPEED_SQ_THRESHOLD: f32 = 1e-3;

    /// Vectors shorter than this are skipped by the inverse-square average
    pub const INVERSE_SQUARE_CUTOFF: f32 = 1e-4;

    /// Tangential coefficient of the spiral approach
    pub const SPIRAL_WINDING: f32 = 5.0;

    /// Flee-closest reacts inside (r_threat + r_seeker) * this
    pub const FLEE_CLOSEST_DANGER_ZONE: f32 = 1.1;
    /// Flee-all reacts inside (r_threat + r_seeker) * this
    pub const FLEE_ALL_DANGER_ZONE: f32 = 2.0;
    /// Escape directions are the away-vector rotated by ± this (degrees)
    pub const ESCAPE_ANGLE_DEG: f32 = 20.0;

    /// Weight of the unit to-target pull in the repulsion family
    pub const TARGET_WEIGHT: f32 = 0.5;
    /// Guards closer than (r_i + r_j) * this share a blob
    pub const BLOB_SEPARATION_FACTOR: f32 = 4.0;
    /// Tie-break rotation spread (degrees) applied to repulsion results
    pub const NOISE_SPREAD_DEG: f32 = 1.0;

    /// Zig-zag frame boundaries: east until the first, south until the
    /// second, west until the third, then direct pursuit
    pub const ZIGZAG_PHASES: [u32; 3] = [180, 420, 480];

    /// Guards aim at their target's position this far ahead (seconds)
    pub const GUARD_LEAD_TIME: f32 = 0.25;
}

/// Normalize an angle in degrees to [-180, 180)
#[inline]
pub fn normalize_degrees(mut angle: f32) -> f32 {
    while angle >= 180.0 {
        angle -= 360.0;
    }
    while angle < -180.0 {
        angle += 360.0;
    }
    angle
}

/// Signed shortest rotation from `from` to `to`, in degrees within [-180, 180)
#[inline]
pub fn delta_degrees(from: f32, to: f32) -> f32 {
    normalize_degrees(to - from)
}

/// Heading of a vector in degrees (atan2 convention, +X is 0°)
#[inline]
pub fn heading_degrees(v: Vec2) -> f32 {
    v.y.atan2(v.x).to_degrees()
}
