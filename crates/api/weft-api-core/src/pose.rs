//! Pose: a dense per-channel float buffer, the unit of composition.
//!
//! The scheduler never interprets channels; it only sums them by weight.
//! What a channel means (a bone translation component, a blendshape, a
//! material scalar) is a contract between the host and its `PoseSource`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    channels: Vec<f32>,
}

impl Pose {
    pub fn zeroed(channel_count: usize) -> Self {
        Self {
            channels: vec![0.0; channel_count],
        }
    }

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    #[inline]
    pub fn channels(&self) -> &[f32] {
        &self.channels
    }

    #[inline]
    pub fn channels_mut(&mut self) -> &mut [f32] {
        &mut self.channels
    }

    /// Resize to `channel_count` and zero every channel, reusing the
    /// existing allocation where possible.
    pub fn reset(&mut self, channel_count: usize) {
        self.channels.clear();
        self.channels.resize(channel_count, 0.0);
    }

    /// Zero every channel in place.
    pub fn clear(&mut self) {
        for c in &mut self.channels {
            *c = 0.0;
        }
    }

    /// `self += other * weight`, elementwise over the common prefix.
    pub fn add_scaled(&mut self, other: &Pose, weight: f32) {
        let n = self.channels.len().min(other.channels.len());
        for i in 0..n {
            self.channels[i] += other.channels[i] * weight;
        }
    }

    /// `self *= s`, elementwise.
    pub fn scale(&mut self, s: f32) {
        for c in &mut self.channels {
            *c *= s;
        }
    }
}
