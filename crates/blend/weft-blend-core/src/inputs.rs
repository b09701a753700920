//! Input contracts for the core scheduler.
//!
//! Commands mirror the direct [`crate::graph::Graph`] methods in a
//! serializable batch. Adapters queue these between ticks and apply them
//! just before stepping; failures surface as
//! [`crate::outputs::CoreEvent::Error`] entries rather than aborting the
//! batch.

use serde::{Deserialize, Serialize};

use crate::fade::FadeMode;
use crate::ids::{LayerId, NodeId, SourceId};
use crate::registry::StateKey;

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Inputs {
    #[serde(default)]
    pub commands: Vec<Command>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Command {
    Play {
        layer: LayerId,
        node: NodeId,
    },
    CrossFade {
        layer: LayerId,
        node: NodeId,
        duration: f32,
        mode: FadeMode,
    },
    TryPlay {
        layer: LayerId,
        key: StateKey,
        duration: f32,
        mode: FadeMode,
    },
    Stop {
        node: NodeId,
    },
    SetWeight {
        node: NodeId,
        weight: f32,
    },
    StartFade {
        node: NodeId,
        target: f32,
        duration: f32,
    },
    SetSpeed {
        node: NodeId,
        speed: f32,
    },
    SetTime {
        node: NodeId,
        time: f64,
    },
    MoveTime {
        node: NodeId,
        time: f64,
    },
    SetSource {
        node: NodeId,
        source: SourceId,
    },
    SetLayerWeight {
        layer: LayerId,
        weight: f32,
    },
}
