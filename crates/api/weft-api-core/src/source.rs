//! Source identity and the pose-sampling collaborator trait.

use serde::{Deserialize, Serialize};

use crate::pose::Pose;

/// Identity of a registered clip source. Allocation is owned by the
/// scheduler; samplers treat the id as opaque.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SourceId(pub u32);

/// External collaborator that turns (source, time) into a pose.
///
/// The scheduler never evaluates curves or bones itself. Each tick it hands
/// every active (source, clip-time) pair to the sampler and composites the
/// returned channel buffers by weight.
pub trait PoseSource {
    /// Number of channels every sampled pose carries.
    fn channel_count(&self) -> usize;

    /// Sample `source` at `time` (seconds, already loop-wrapped or clamped
    /// by the scheduler) into `out`. `out` arrives zeroed at
    /// `channel_count` channels.
    fn sample(&mut self, source: SourceId, time: f32, out: &mut Pose);
}
