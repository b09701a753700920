//! Node: base schedulable unit with a blend weight.

use crate::clip::ClipState;
use crate::ids::{FadeId, LayerId, NodeId};

#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    /// Owning layer. A back-reference only; the layer owns the slot.
    /// `None` while detached.
    pub(crate) layer: Option<LayerId>,
    /// Blend weight in [0,1]. Mutation goes through the graph so the fade
    /// cancel and active-set rules always apply.
    pub(crate) weight: f32,
    pub(crate) speed: f32,
    /// In-progress transition, if any. At most one per node; attaching a
    /// new fade detaches the old.
    pub(crate) fade: Option<FadeId>,
    /// Position in the owning layer's dense active list, if contributing.
    pub(crate) active_index: Option<u32>,
    pub clip: ClipState,
    /// Set on restart clones; links back to the family template.
    pub(crate) clone_of: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, layer: LayerId, clip: ClipState) -> Self {
        Self {
            id,
            layer: Some(layer),
            weight: 0.0,
            speed: 1.0,
            fade: None,
            active_index: None,
            clip,
            clone_of: None,
        }
    }

    #[inline]
    pub fn layer(&self) -> Option<LayerId> {
        self.layer
    }

    #[inline]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn fade(&self) -> Option<FadeId> {
        self.fade
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.clip.playing
    }

    #[inline]
    pub fn clone_of(&self) -> Option<NodeId> {
        self.clone_of
    }

    /// Playing, weighted, or mid-fade.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.clip.playing || self.weight > 0.0 || self.fade.is_some()
    }
}
