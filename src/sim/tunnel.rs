//! Procedural tunnel centerline
//!
//! The tunnel is a sliding window of centerline offsets, one per horizontal
//! slot. Each tick drops the oldest entry and appends a new one drifted by a
//! slow sine term plus seeded jitter.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::Viewport;
use crate::consts::*;

/// Number of slots visible across `viewport`, never less than one
pub fn capacity_for(viewport: Viewport, slot_width: f32) -> usize {
    ((viewport.width / slot_width).floor() as usize).max(1)
}

/// Sine drift for a tick. Computed in f64 so tick indices past 2^24 stay
/// distinct.
pub fn drift(tick_index: u64) -> f32 {
    ((tick_index as f64 / DRIFT_PERIOD as f64).sin() * DRIFT_AMPLITUDE as f64) as f32
}

/// Bounded centerline generator
#[derive(Debug, Clone)]
pub struct TunnelGenerator {
    centers: VecDeque<f32>,
    capacity: usize,
    slot_width: f32,
    /// Fallback centerline when the window is empty
    mid_height: f32,
    rng: Pcg32,
}

impl TunnelGenerator {
    /// Create a flat tunnel filling `viewport`
    pub fn new(viewport: Viewport, slot_width: f32, seed: u64) -> Self {
        let mut tunnel = Self {
            centers: VecDeque::new(),
            capacity: capacity_for(viewport, slot_width),
            slot_width,
            mid_height: viewport.mid_height(),
            rng: Pcg32::seed_from_u64(seed),
        };
        tunnel.reseed(viewport);
        tunnel
    }

    /// Build a tunnel from explicit centers; capacity is `centers.len()`
    pub fn from_centers(centers: &[f32], slot_width: f32, seed: u64) -> Self {
        let mid_height = centers.last().copied().unwrap_or_default();
        Self {
            centers: centers.iter().copied().collect(),
            capacity: centers.len().max(1),
            slot_width,
            mid_height,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Clear and fill with a flat centerline at mid height
    pub fn reseed(&mut self, viewport: Viewport) {
        self.capacity = capacity_for(viewport, self.slot_width);
        self.mid_height = viewport.mid_height();
        self.centers.clear();
        self.centers.resize(self.capacity, self.mid_height);
    }

    /// Restart the jitter sequence from `seed`
    pub fn reseed_rng(&mut self, seed: u64) {
        self.rng = Pcg32::seed_from_u64(seed);
    }

    /// Re-derive capacity for a new viewport.
    ///
    /// Shrinking keeps the newest entries. Growing pads the right end with
    /// the newest value so the window stays fully populated.
    pub fn resize(&mut self, viewport: Viewport) {
        let capacity = capacity_for(viewport, self.slot_width);
        self.mid_height = viewport.mid_height();

        while self.centers.len() > capacity {
            self.centers.pop_front();
        }
        let fill = self.centers.back().copied().unwrap_or(self.mid_height);
        self.centers.resize(capacity, fill);

        if capacity != self.capacity {
            log::info!("Tunnel capacity {} -> {}", self.capacity, capacity);
        }
        self.capacity = capacity;
    }

    /// Advance one tick: trim to `capacity - 1`, then append the next offset
    pub fn advance(&mut self, tick_index: u64) {
        while self.centers.len() >= self.capacity {
            self.centers.pop_front();
        }

        let last = self.centers.back().copied().unwrap_or(self.mid_height);
        let drift = drift(tick_index);
        let jitter = (self.rng.random::<f32>() - 0.5) * JITTER_AMPLITUDE;
        self.centers.push_back(last + drift + jitter);
    }

    /// Centerline at `slot`, counted from the left edge
    #[inline]
    pub fn center_at(&self, slot: usize) -> Option<f32> {
        self.centers.get(slot).copied()
    }

    pub fn centers(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.centers.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn slot_width(&self) -> f32 {
        self.slot_width
    }
}
