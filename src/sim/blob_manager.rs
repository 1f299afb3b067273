//! Online clustering of guards into blobs
//!
//! Guards are indices into the slice handed to `link_nearby`, and
//! `build_blobs` must get the same slice. The disjoint-set forest is rebuilt
//! by every `link_nearby`; the pool's slots are reused so a steady guard
//! count allocates nothing after warm-up.

use glam::Vec2;

use super::blob::GuardBlob;
use super::state::AgentView;

/// Union-find over guard indices plus a pool of reusable blobs
#[derive(Debug, Clone, Default)]
pub struct BlobManager {
    /// parent[i] == i for a leader
    parent: Vec<usize>,
    /// Blob slot per leader, indexed by guard
    slot_of: Vec<Option<usize>>,
    pool: Vec<GuardBlob>,
    active: usize,
}

impl BlobManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over with `n` singleton guards
    pub fn reset(&mut self, n: usize) {
        self.parent.clear();
        self.parent.extend(0..n);
        self.slot_of.clear();
        self.slot_of.resize(n, None);
        self.active = 0;
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Leader of the component containing `guard`, compressing the path
    pub fn leader(&mut self, guard: usize) -> usize {
        let mut root = guard;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = guard;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Union the components of `a` and `b`
    pub fn merge(&mut self, a: usize, b: usize) {
        let leader_a = self.leader(a);
        let leader_b = self.leader(b);
        if leader_a != leader_b {
            self.parent[leader_a] = leader_b;
        }
    }

    /// Connected components as sorted index lists, ordered by first member
    pub fn components(&mut self) -> Vec<Vec<usize>> {
        let mut groups: Vec<(usize, Vec<usize>)> = Vec::new();
        for guard in 0..self.len() {
            let leader = self.leader(guard);
            match groups.iter_mut().find(|(l, _)| *l == leader) {
                Some((_, members)) => members.push(guard),
                None => groups.push((leader, vec![guard])),
            }
        }
        groups.into_iter().map(|(_, members)| members).collect()
    }

    /// Reset and merge every pair of guards closer than
    /// `(r_i + r_j) * separation_factor`
    pub fn link_nearby(&mut self, guards: &[AgentView], separation_factor: f32) {
        self.reset(guards.len());
        for i in 1..guards.len() {
            for j in 0..i {
                let threshold = (guards[i].radius + guards[j].radius) * separation_factor;
                let delta = guards[i].pos - guards[j].pos;
                if delta.length_squared() < threshold * threshold {
                    self.merge(i, j);
                }
            }
        }
    }

    /// Build one blob per component, replaying guards in slice order
    ///
    /// `guards` must be the slice the forest was built over.
    pub fn build_blobs(&mut self, seeker: Vec2, guards: &[AgentView]) -> &[GuardBlob] {
        debug_assert_eq!(guards.len(), self.len());

        // Allocate a slot per leader
        let mut count = 0;
        for guard in 0..self.len() {
            if self.leader(guard) == guard {
                self.slot_of[guard] = Some(count);
                count += 1;
            }
        }

        // Grow the pool as needed; surplus slots stay pooled for later ticks
        if self.pool.len() < count {
            self.pool.resize_with(count, GuardBlob::default);
        }
        for blob in &mut self.pool {
            blob.reset(seeker);
        }

        for (guard, view) in guards.iter().enumerate() {
            let leader = self.leader(guard);
            if let Some(slot) = self.slot_of[leader] {
                self.pool[slot].add_guard(view.pos, view.radius);
            }
        }

        self.active = count;
        &self.pool[..count]
    }

    /// Blobs produced by the last `build_blobs`
    pub fn blobs(&self) -> &[GuardBlob] {
        &self.pool[..self.active]
    }

    /// Pooled blob slots, active or not
    pub fn pool_capacity(&self) -> usize {
        self.pool.len()
    }
}
