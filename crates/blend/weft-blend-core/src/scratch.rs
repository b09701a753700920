//! Scratch buffers reused across ticks.

use weft_api_core::Pose;

#[derive(Debug, Default)]
pub struct Scratch {
    /// Sample target reused for every active node.
    pub node_pose: Pose,
    /// Accumulation target reused for every layer.
    pub layer_pose: Pose,
}

impl Scratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size both buffers for the sampler's channel count and zero them.
    #[inline]
    pub fn begin_frame(&mut self, channel_count: usize) {
        self.node_pose.reset(channel_count);
        self.layer_pose.reset(channel_count);
    }
}
