//! Output contracts from the core scheduler.
//!
//! Outputs carry the composited poses for this tick plus a list of
//! semantic events. Adapters apply poses to the host and transport events.

use serde::{Deserialize, Serialize};

use weft_api_core::Pose;

use crate::ids::{LayerId, NodeId};

/// One layer's composited pose for this tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayerOutput {
    pub layer: LayerId,
    /// The layer's own blend weight (already applied to `composite`, not
    /// to `pose`).
    pub weight: f32,
    /// Weighted sum of the layer's active nodes' sampled poses.
    pub pose: Pose,
}

/// Discrete semantic signals emitted during stepping.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub enum CoreEvent {
    CurrentStateChanged {
        layer: LayerId,
        node: Option<NodeId>,
        command_count: u64,
    },
    FadeStarted {
        layer: LayerId,
        target: NodeId,
    },
    FadeCompleted {
        node: NodeId,
    },
    NodeStopped {
        node: NodeId,
    },
    ClipLooped {
        node: NodeId,
        loop_count: u64,
    },
    ClipEnded {
        node: NodeId,
    },
    /// Fail-soft channel for batched command application.
    Error {
        message: String,
    },
    /// Catch-all for forward-compatible payloads.
    Custom {
        kind: String,
        data: serde_json::Value,
    },
}

/// Outputs returned by [`crate::graph::Graph::evaluate`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub layers: Vec<LayerOutput>,
    /// Graph-level composite: `sum(layer.weight * layer pose)`.
    #[serde(default)]
    pub composite: Pose,
    #[serde(default)]
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.layers.clear();
        self.composite.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.events.is_empty()
    }
}
