//! Jitter filter for drag re-anchoring.
//!
//! Ray-cast hits wobble from frame to frame.  Rather than moving the entity
//! to each raw hit we keep the last few candidates and move it to their
//! average, and only when that average is a plausible distance from the
//! camera for an object of the entity's size.

use std::collections::VecDeque;

use glam::Vec3;

use crate::config::{HISTORY_LEN, MAX_JUMP_FACTOR};
use crate::pose;

/// Bounded, insertion-ordered window of candidate positions.
#[derive(Debug, Clone)]
pub struct PositionHistory {
    samples: VecDeque<Vec3>,
    capacity: usize,
}

impl Default for PositionHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_LEN)
    }
}

impl PositionHistory {
    /// A window holding at most `capacity` samples (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a sample, evicting the oldest when full.
    pub fn push(&mut self, sample: Vec3) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn average(&self) -> Option<Vec3> {
        pose::mean(&self.samples)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Vec3> {
        self.samples.iter()
    }
}

/// `distance(camera, position) / scale`; how far away a position is in
/// multiples of the entity's own size.
pub fn jump_factor(camera: Vec3, position: Vec3, scale: f32) -> f32 {
    pose::distance(camera, position) / scale
}

/// Moving average over [`PositionHistory`] plus the jump gate.
#[derive(Debug, Clone)]
pub struct SmoothingFilter {
    history: PositionHistory,
    max_jump_factor: f32,
}

impl Default for SmoothingFilter {
    fn default() -> Self {
        Self::new(HISTORY_LEN, MAX_JUMP_FACTOR)
    }
}

impl SmoothingFilter {
    pub fn new(history_len: usize, max_jump_factor: f32) -> Self {
        Self {
            history: PositionHistory::with_capacity(history_len),
            max_jump_factor,
        }
    }

    /// Records `candidate` and returns the mean of the retained window.
    pub fn push(&mut self, candidate: Vec3) -> Vec3 {
        self.history.push(candidate);
        // never empty right after a push
        self.history.average().unwrap_or(candidate)
    }

    /// Whether a smoothed position may be committed for an entity of
    /// `scale` seen from `camera`.  Degenerate scales and NaN distances are
    /// never accepted.
    pub fn accepts(&self, camera: Vec3, position: Vec3, scale: f32) -> bool {
        if !(scale.is_finite() && scale > 0.0) {
            return false;
        }
        jump_factor(camera, position, scale) < self.max_jump_factor
    }

    pub fn history(&self) -> &PositionHistory {
        &self.history
    }
}
