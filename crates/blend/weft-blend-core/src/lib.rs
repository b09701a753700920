//! Weft Blend Core (engine-agnostic)
//!
//! A weighted blend-graph scheduler: a graph of clip-playing nodes grouped
//! into layers, pooled fade groups driving weight transitions, and a
//! per-tick evaluate pass that composites weighted poses through an
//! external [`PoseSource`] collaborator. No curve evaluation or skeletal
//! math lives here; the scheduler is pure bookkeeping over channel buffers.

pub mod clip;
pub mod config;
pub mod fade;
pub mod graph;
pub mod ids;
pub mod inputs;
pub mod layer;
pub mod node;
pub mod outputs;
pub mod registry;
pub mod scratch;

// Re-exports for consumers (adapters)
pub use clip::{ClipSource, ClipState};
pub use config::Config;
pub use fade::{FadeGroup, FadeMode, FadePool};
pub use graph::Graph;
pub use ids::{FadeId, IdAllocator, LayerId, NodeId};
pub use inputs::{Command, Inputs};
pub use outputs::{CoreEvent, LayerOutput, Outputs};
pub use registry::{KeyEntry, StateKey, StateRegistry};
pub use scratch::Scratch;
pub use weft_api_core::{ChannelLayout, CoreError, Pose, PoseSource, SourceId};
