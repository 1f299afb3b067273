//! Guard blob geometry
//!
//! A blob reduces a cluster of guards to a two-point segment that brackets
//! the cluster's closest approach to the seeker, plus the seeker's clamped
//! projection onto that segment.
//!
//! The segment is maintained greedily: each new point is only paired against
//! the two current endpoints, so with three or more points the result can be
//! a locally (not globally) closest segment. Results depend on insertion
//! order, which callers keep deterministic.

use glam::Vec2;

use super::geometry::{closest_point_on_segment, move_towards};

/// Incremental closest-segment approximation of one guard cluster
#[derive(Debug, Clone, Default)]
pub struct GuardBlob {
    seeker: Vec2,
    num_guards: usize,
    segment0: Vec2,
    segment1: Vec2,
    closest: Vec2,
}

impl GuardBlob {
    pub fn new(seeker: Vec2) -> Self {
        Self {
            seeker,
            ..Default::default()
        }
    }

    /// Empty the blob and re-aim it at a seeker
    pub fn reset(&mut self, seeker: Vec2) {
        self.seeker = seeker;
        self.num_guards = 0;
        self.segment0 = Vec2::ZERO;
        self.segment1 = Vec2::ZERO;
        self.closest = Vec2::ZERO;
    }

    /// Add a guard disk; its near edge (toward the seeker) is the point used
    pub fn add_guard(&mut self, pos: Vec2, radius: f32) {
        let near_edge = move_towards(pos, self.seeker, radius);
        self.add_point(near_edge);
    }

    /// Add an already edge-adjusted point
    pub fn add_point(&mut self, point: Vec2) {
        self.num_guards += 1;
        match self.num_guards {
            1 => {
                self.segment0 = point;
                self.segment1 = point;
                self.closest = point;
            }
            2 => {
                self.segment1 = point;
                self.closest = closest_point_on_segment(self.seeker, self.segment0, self.segment1);
            }
            _ => self.update_segment(point),
        }
    }

    fn update_segment(&mut self, point: Vec2) {
        let seeker = self.seeker;
        let old_dist_sq = (seeker - self.closest).length_squared();

        let mut p0 = closest_point_on_segment(seeker, self.segment0, point);
        let mut p1 = closest_point_on_segment(seeker, self.segment1, point);
        let mut p0_sq = (p0 - seeker).length_squared();
        let mut p1_sq = (p1 - seeker).length_squared();

        // segment0 is always the endpoint giving the closer candidate
        if p1_sq < p0_sq {
            std::mem::swap(&mut p0, &mut p1);
            std::mem::swap(&mut p0_sq, &mut p1_sq);
            std::mem::swap(&mut self.segment0, &mut self.segment1);
        }

        if p0_sq < old_dist_sq {
            self.segment1 = point;
            self.closest = p0;
        }
    }

    pub fn num_guards(&self) -> usize {
        self.num_guards
    }

    pub fn is_empty(&self) -> bool {
        self.num_guards == 0
    }

    pub fn seeker(&self) -> Vec2 {
        self.seeker
    }

    pub fn segment0(&self) -> Vec2 {
        self.segment0
    }

    pub fn segment1(&self) -> Vec2 {
        self.segment1
    }

    /// Closest point on the blob segment to the seeker, `None` while empty
    pub fn closest_point(&self) -> Option<Vec2> {
        (self.num_guards > 0).then_some(self.closest)
    }
}
