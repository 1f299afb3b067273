//! Deterministic simulation module
//!
//! All steering and motion logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded (or injected) noise only
//! - Stable iteration order (by agent ID)
//! - No rendering or platform dependencies

pub mod blob;
pub mod blob_manager;
pub mod collision;
pub mod error;
pub mod geometry;
pub mod motion;
pub mod state;
pub mod strategy;
pub mod tick;

pub use blob::GuardBlob;
pub use blob_manager::BlobManager;
pub use collision::{check_victory, resolve_overlaps};
pub use error::SimError;
pub use motion::move_to_waypoint;
pub use state::{
    Agent, AgentId, AgentView, Noise, NoiseSource, Outcome, Role, SimState, Target, Team,
};
pub use strategy::{Strategy, StrategyKind};
pub use tick::{TickInput, TickResult, tick};
