//! Graph: data ownership and the public scheduling API.
//!
//! Methods: new, register_source, add_layer, add_node, play /
//! play_with_fade / try_play, weight & time setters, evaluate
//! (inputs → fades → clip time → composition).
//!
//! All mutation takes ids. Nodes live in a dense slab indexed by
//! [`NodeId`]; layers hold slot lists plus a dense active set with
//! back-pointers, so membership updates are O(1).

use crate::clip::{ClipSource, ClipState};
use crate::config::Config;
use crate::fade::{FadeMode, FadePool};
use crate::ids::{FadeId, IdAllocator, LayerId, NodeId};
use crate::inputs::{Command, Inputs};
use crate::layer::Layer;
use crate::node::Node;
use crate::outputs::{CoreEvent, LayerOutput, Outputs};
use crate::registry::{StateKey, StateRegistry};
use crate::scratch::Scratch;
use weft_api_core::{CoreError, PoseSource, SourceId};

pub struct Graph {
    // Owned data
    cfg: Config,
    ids: IdAllocator,
    sources: Vec<(SourceId, ClipSource)>,
    nodes: Vec<Node>,
    layers: Vec<Layer>,
    fades: FadePool,
    registry: StateRegistry,

    // Per-tick state
    frame_id: u64,
    scratch: Scratch,
    pending_events: Vec<CoreEvent>,
    outputs: Outputs,
}

impl Graph {
    /// Create a new graph with the given config.
    pub fn new(cfg: Config) -> Self {
        Self {
            fades: FadePool::with_capacity(cfg.fade_pool_capacity),
            cfg,
            ids: IdAllocator::new(),
            sources: Vec::new(),
            nodes: Vec::new(),
            layers: Vec::new(),
            registry: StateRegistry::new(),
            frame_id: 0,
            scratch: Scratch::new(),
            pending_events: Vec::new(),
            outputs: Outputs::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Monotonic tick counter, bumped at the top of every evaluate.
    #[inline]
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    // ---- registration -----------------------------------------------------

    /// Register a clip source, returning its id.
    pub fn register_source(&mut self, mut source: ClipSource) -> Result<SourceId, CoreError> {
        source.validate_basic()?;
        let id = self.ids.alloc_source();
        source.id = Some(id);
        self.sources.push((id, source));
        Ok(id)
    }

    /// Create a new layer with a display name. [`LayerId`] 0 is the base
    /// layer for the skip-first-fade policy.
    pub fn add_layer(&mut self, name: &str) -> LayerId {
        let id = self.ids.alloc_layer();
        debug_assert_eq!(id.index(), self.layers.len());
        self.layers.push(Layer::new(id, name));
        id
    }

    /// Create a node playing `source`, attached to `layer` at the next
    /// free slot. The node starts weightless and not playing.
    pub fn add_node(&mut self, layer: LayerId, source: SourceId) -> Result<NodeId, CoreError> {
        self.ensure_layer(layer)?;
        let (length, looping) = self.source_info(source)?;
        self.ensure_slot_free(layer)?;
        let id = self.ids.alloc_node();
        debug_assert_eq!(id.index(), self.nodes.len());
        self.nodes
            .push(Node::new(id, layer, ClipState::new(source, length, looping)));
        self.layers[layer.index()].children.push(id);
        log::debug!("add_node {:?} on {:?} (source {:?})", id, layer, source);
        Ok(id)
    }

    /// Re-parent a detached node. Attaching a node whose parent is still
    /// set is an error; detach first.
    pub fn attach_node(&mut self, node: NodeId, layer: LayerId) -> Result<(), CoreError> {
        self.ensure_node(node)?;
        self.ensure_layer(layer)?;
        if let Some(current) = self.nodes[node.index()].layer {
            return Err(CoreError::InvalidOperation(format!(
                "node {:?} already parented to {:?}; detach first",
                node, current
            )));
        }
        self.ensure_slot_free(layer)?;
        self.layers[layer.index()].children.push(node);
        self.nodes[node.index()].layer = Some(layer);
        self.sync_active(node);
        Ok(())
    }

    /// Remove a node from its layer. Playback stops; the last child fills
    /// the freed slot so other slots keep their indices.
    pub fn detach_node(&mut self, node: NodeId) -> Result<(), CoreError> {
        self.ensure_node(node)?;
        let Some(layer) = self.nodes[node.index()].layer else {
            return Err(CoreError::InvalidOperation(format!(
                "node {:?} is not attached",
                node
            )));
        };
        self.stop_node(node);
        let lidx = layer.index();
        self.layers[lidx].remove_child(node);
        if self.layers[lidx].current == Some(node) {
            self.layers[lidx].current = None;
        }
        self.nodes[node.index()].layer = None;
        Ok(())
    }

    /// Detach a node and drop its registry bindings. The slab slot remains
    /// as an inert husk; ids are never reused.
    pub fn destroy_node(&mut self, node: NodeId) -> Result<(), CoreError> {
        self.ensure_node(node)?;
        if self.nodes[node.index()].layer.is_some() {
            self.detach_node(node)?;
        }
        self.registry.remove_node(node);
        Ok(())
    }

    /// Bound the number of child slots on a layer. Shrinking below the
    /// current child count is an error.
    pub fn set_child_capacity(
        &mut self,
        layer: LayerId,
        capacity: Option<usize>,
    ) -> Result<(), CoreError> {
        self.ensure_layer(layer)?;
        if let Some(cap) = capacity {
            let have = self.layers[layer.index()].children.len();
            if cap < have {
                return Err(CoreError::InvalidOperation(format!(
                    "capacity {} below current child count {}",
                    cap, have
                )));
            }
        }
        self.layers[layer.index()].capacity = capacity;
        Ok(())
    }

    // ---- registry ---------------------------------------------------------

    pub fn bind_key(&mut self, key: StateKey, node: NodeId) -> Result<(), CoreError> {
        self.ensure_node(node)?;
        self.registry.bind(key, node);
        Ok(())
    }

    pub fn alias_key(&mut self, key: StateKey, to: StateKey) {
        self.registry.alias(key, to);
    }

    pub fn unbind_key(&mut self, key: StateKey) {
        self.registry.unbind(key);
    }

    pub fn resolve_key(&self, key: StateKey) -> Option<NodeId> {
        self.registry.resolve(key, self.cfg.max_key_depth)
    }

    // ---- playback commands ------------------------------------------------

    /// Immediate play: the target snaps to full weight and playback, every
    /// other active sibling stops, and the layer's current state moves.
    /// Atomic within one tick.
    pub fn play(&mut self, layer: LayerId, node: NodeId) -> Result<(), CoreError> {
        self.ensure_child(layer, node)?;
        self.cancel_fade(node);
        let others: Vec<NodeId> = self.layers[layer.index()]
            .active
            .iter()
            .copied()
            .filter(|o| *o != node)
            .collect();
        for other in others {
            self.stop_node(other);
        }
        self.write_weight(node, 1.0);
        self.nodes[node.index()].clip.playing = true;
        self.sync_active(node);
        self.set_current(layer, Some(node));
        log::debug!("play {:?} on {:?}", node, layer);
        Ok(())
    }

    /// Fade the target toward full weight while every other active sibling
    /// fades out in the same group. `duration <= 0` (or a weightless base
    /// layer under the skip-first-fade policy) degrades to immediate play.
    pub fn play_with_fade(
        &mut self,
        layer: LayerId,
        node: NodeId,
        duration: f32,
        mode: FadeMode,
    ) -> Result<(), CoreError> {
        self.ensure_child(layer, node)?;
        if !duration.is_finite() {
            return Err(CoreError::InvalidArgument(format!(
                "fade duration must be finite, got {}",
                duration
            )));
        }
        let skip = duration <= 0.0
            || (self.cfg.skip_first_fade
                && layer.index() == 0
                && self.layers[layer.index()].weight == 0.0);
        if skip {
            return self.play(layer, node);
        }

        let target = if mode.is_from_start() {
            self.acquire_restart_target(layer, node)?
        } else {
            node
        };

        let mut effective_duration = duration;
        if mode.is_normalized() {
            let length = self.nodes[target.index()].clip.length;
            if length <= 0.0 {
                return Err(CoreError::InvalidArgument(format!(
                    "normalized fade requires a positive clip length on {:?}",
                    target
                )));
            }
            effective_duration *= length;
        }
        let distance = mode.fade_distance(self.nodes[target.index()].weight);
        // Degenerate target-already-at-full-weight case: siblings still
        // ramp out at the nominal full-unit speed.
        let speed = if distance > 0.0 {
            distance / effective_duration
        } else {
            1.0 / effective_duration
        };

        self.cancel_fade(target);
        let fid = self.fades.acquire(speed);
        self.fades.push_entry(fid, target, 1.0);
        self.nodes[target.index()].fade = Some(fid);
        self.nodes[target.index()].clip.playing = true;
        self.sync_active(target);

        let others: Vec<NodeId> = self.layers[layer.index()]
            .active
            .iter()
            .copied()
            .filter(|o| *o != target)
            .collect();
        for other in others {
            self.cancel_fade(other);
            self.fades.push_entry(fid, other, 0.0);
            self.nodes[other.index()].fade = Some(fid);
        }

        self.set_current(layer, Some(target));
        self.emit(CoreEvent::FadeStarted { layer, target });
        log::debug!(
            "crossfade to {:?} on {:?}: mode {:?}, speed {}/s",
            target,
            layer,
            mode,
            speed
        );
        Ok(())
    }

    /// Resolve a registry key and play it on `layer`. A key that does not
    /// resolve is a miss (`Ok(None)`), not an error.
    pub fn try_play(
        &mut self,
        layer: LayerId,
        key: StateKey,
        duration: f32,
        mode: FadeMode,
    ) -> Result<Option<NodeId>, CoreError> {
        let Some(node) = self.registry.resolve(key, self.cfg.max_key_depth) else {
            log::trace!("try_play miss for key {:?}", key);
            return Ok(None);
        };
        self.play_with_fade(layer, node, duration, mode)?;
        Ok(Some(node))
    }

    /// Stop a node: cancel its fade, zero its weight, rewind to time zero.
    pub fn stop(&mut self, node: NodeId) -> Result<(), CoreError> {
        self.ensure_node(node)?;
        self.stop_node(node);
        Ok(())
    }

    // ---- node setters -----------------------------------------------------

    /// Set a node's weight directly. Always wins over an in-progress fade
    /// (the fade is cancelled); the value is clamped into [0,1]. Does not
    /// stop a playing node, even at zero.
    pub fn set_weight(&mut self, node: NodeId, weight: f32) -> Result<(), CoreError> {
        self.ensure_node(node)?;
        if !weight.is_finite() {
            return Err(CoreError::InvalidArgument(format!(
                "weight must be finite, got {}",
                weight
            )));
        }
        self.cancel_fade(node);
        self.write_weight(node, weight);
        Ok(())
    }

    /// Fade one node's weight toward `target` over `duration` seconds.
    /// `duration <= 0` sets the weight immediately, with stop-on-zero
    /// semantics.
    pub fn start_fade(
        &mut self,
        node: NodeId,
        target: f32,
        duration: f32,
    ) -> Result<(), CoreError> {
        self.ensure_node(node)?;
        if !target.is_finite() || !duration.is_finite() {
            return Err(CoreError::InvalidArgument(format!(
                "fade target/duration must be finite, got {} over {}",
                target, duration
            )));
        }
        let target = target.clamp(0.0, 1.0);
        self.cancel_fade(node);
        if duration <= 0.0 {
            self.write_weight(node, target);
            if target == 0.0 {
                self.stop_node(node);
            }
            return Ok(());
        }
        let current = self.nodes[node.index()].weight;
        if current == target {
            return Ok(());
        }
        let speed = (target - current).abs() / duration;
        let fid = self.fades.acquire(speed);
        self.fades.push_entry(fid, node, target);
        self.nodes[node.index()].fade = Some(fid);
        self.sync_active(node);
        if let Some(layer) = self.nodes[node.index()].layer {
            self.layers[layer.index()].command_count += 1;
        }
        Ok(())
    }

    pub fn set_speed(&mut self, node: NodeId, speed: f32) -> Result<(), CoreError> {
        self.ensure_node(node)?;
        if !speed.is_finite() {
            return Err(CoreError::InvalidArgument(format!(
                "speed must be finite, got {}",
                speed
            )));
        }
        self.nodes[node.index()].speed = speed;
        Ok(())
    }

    /// Jump the play head. Boundary events between the old and new time
    /// are skipped (the event cursor jumps too).
    pub fn set_time(&mut self, node: NodeId, time: f64) -> Result<(), CoreError> {
        self.ensure_node(node)?;
        if !time.is_finite() {
            return Err(CoreError::InvalidArgument(format!(
                "time must be finite, got {}",
                time
            )));
        }
        let clip = &mut self.nodes[node.index()].clip;
        clip.time = time;
        clip.event_cursor = time;
        Ok(())
    }

    /// Move the play head without touching the event cursor: boundary
    /// events between the old and new time fire on the next tick.
    pub fn move_time(&mut self, node: NodeId, time: f64) -> Result<(), CoreError> {
        self.ensure_node(node)?;
        if !time.is_finite() {
            return Err(CoreError::InvalidArgument(format!(
                "time must be finite, got {}",
                time
            )));
        }
        self.nodes[node.index()].clip.time = time;
        Ok(())
    }

    /// Replace the played source, re-resolving length and looping. The
    /// sampling state rebuilds without retroactive boundary events.
    /// Restart clones reject this: their source belongs to the family
    /// template.
    pub fn set_source(&mut self, node: NodeId, source: SourceId) -> Result<(), CoreError> {
        self.ensure_node(node)?;
        if let Some(template) = self.nodes[node.index()].clone_of {
            return Err(CoreError::NotSupported(format!(
                "node {:?} is a restart clone of {:?}; set the source on the template",
                node, template
            )));
        }
        let (length, looping) = self.source_info(source)?;
        let clip = &mut self.nodes[node.index()].clip;
        clip.source = source;
        clip.length = length;
        clip.looping = looping;
        clip.event_cursor = clip.time;
        Ok(())
    }

    pub fn set_layer_weight(&mut self, layer: LayerId, weight: f32) -> Result<(), CoreError> {
        self.ensure_layer(layer)?;
        if !weight.is_finite() {
            return Err(CoreError::InvalidArgument(format!(
                "layer weight must be finite, got {}",
                weight
            )));
        }
        self.layers[layer.index()].weight = weight.clamp(0.0, 1.0);
        Ok(())
    }

    // ---- read access ------------------------------------------------------

    pub fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node.index())
    }

    pub fn layer(&self, layer: LayerId) -> Option<&Layer> {
        self.layers.get(layer.index())
    }

    pub fn source(&self, source: SourceId) -> Option<&ClipSource> {
        self.sources
            .iter()
            .find_map(|(id, s)| if *id == source { Some(s) } else { None })
    }

    #[inline]
    pub fn live_fade_count(&self) -> usize {
        self.fades.live_count()
    }

    #[inline]
    pub fn fade_pool_slots(&self) -> usize {
        self.fades.slot_count()
    }

    // ---- stepping ---------------------------------------------------------

    /// Step the graph by `dt` with the given inputs, producing outputs.
    /// Within the tick: inputs apply first, then fades step (a node
    /// arriving at weight zero also stops this tick), then playing clips
    /// advance, then layers composite through `sampler`.
    pub fn evaluate(
        &mut self,
        dt: f32,
        inputs: Inputs,
        sampler: &mut dyn PoseSource,
    ) -> &Outputs {
        self.frame_id = self.frame_id.wrapping_add(1);
        self.outputs.clear();
        self.apply_inputs(inputs);
        self.step_fades(dt);
        self.advance_clips(dt);
        self.compose(sampler);
        self.outputs.events.append(&mut self.pending_events);
        &self.outputs
    }

    /// Apply commands fail-soft: a failed command becomes a
    /// [`CoreEvent::Error`] and the rest of the batch still applies.
    fn apply_inputs(&mut self, inputs: Inputs) {
        for cmd in inputs.commands {
            let result = match cmd {
                Command::Play { layer, node } => self.play(layer, node),
                Command::CrossFade {
                    layer,
                    node,
                    duration,
                    mode,
                } => self.play_with_fade(layer, node, duration, mode),
                Command::TryPlay {
                    layer,
                    key,
                    duration,
                    mode,
                } => self.try_play(layer, key, duration, mode).map(|_| ()),
                Command::Stop { node } => self.stop(node),
                Command::SetWeight { node, weight } => self.set_weight(node, weight),
                Command::StartFade {
                    node,
                    target,
                    duration,
                } => self.start_fade(node, target, duration),
                Command::SetSpeed { node, speed } => self.set_speed(node, speed),
                Command::SetTime { node, time } => self.set_time(node, time),
                Command::MoveTime { node, time } => self.move_time(node, time),
                Command::SetSource { node, source } => self.set_source(node, source),
                Command::SetLayerWeight { layer, weight } => self.set_layer_weight(layer, weight),
            };
            if let Err(err) = result {
                log::warn!("command failed: {}", err);
                self.emit(CoreEvent::Error {
                    message: err.to_string(),
                });
            }
        }
    }

    fn step_fades(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let live: Vec<FadeId> = self.fades.live_ids().collect();
        for fid in live {
            if !self.fades.get(fid).is_live() {
                continue;
            }
            let step = self.fades.get(fid).speed() * dt;
            let mut i = 0;
            while i < self.fades.entry_count(fid) {
                let entry = self.fades.entry_at(fid, i);
                let weight = self.nodes[entry.node.index()].weight;
                let remaining = entry.target - weight;
                if remaining.abs() <= step {
                    // Arrival: clamp exactly at target, detach from the
                    // group, stop-on-zero in the same tick.
                    self.fades.remove_entry_at(fid, i);
                    self.nodes[entry.node.index()].fade = None;
                    self.write_weight(entry.node, entry.target);
                    self.emit(CoreEvent::FadeCompleted { node: entry.node });
                    if entry.target == 0.0 {
                        self.stop_node(entry.node);
                    }
                } else {
                    self.write_weight(entry.node, weight + step * remaining.signum());
                    i += 1;
                }
            }
            if self.fades.entry_count(fid) == 0 {
                self.fades.release(fid);
            }
        }
    }

    fn advance_clips(&mut self, dt: f32) {
        for i in 0..self.nodes.len() {
            if !self.nodes[i].clip.playing {
                continue;
            }
            let delta = dt as f64 * self.nodes[i].speed as f64;
            self.nodes[i].clip.time += delta;
            let id = self.nodes[i].id;
            let crossings = self.nodes[i].clip.take_boundary_events();
            if crossings.loops > 0 {
                let loop_count = self.nodes[i].clip.normalized_time().floor().max(0.0) as u64;
                self.emit(CoreEvent::ClipLooped {
                    node: id,
                    loop_count,
                });
            }
            if crossings.ended {
                self.emit(CoreEvent::ClipEnded { node: id });
            }
        }
    }

    fn compose(&mut self, sampler: &mut dyn PoseSource) {
        let channels = sampler.channel_count();
        self.scratch.begin_frame(channels);
        self.outputs.composite.reset(channels);
        for li in 0..self.layers.len() {
            self.scratch.layer_pose.reset(channels);
            for ai in 0..self.layers[li].active.len() {
                let nid = self.layers[li].active[ai];
                let node = &self.nodes[nid.index()];
                let weight = node.weight;
                if weight <= 0.0 {
                    continue;
                }
                let time = node.clip.sample_time();
                let source = node.clip.source;
                self.scratch.node_pose.clear();
                sampler.sample(source, time, &mut self.scratch.node_pose);
                self.scratch.layer_pose.add_scaled(&self.scratch.node_pose, weight);
            }
            let layer_weight = self.layers[li].weight;
            self.outputs
                .composite
                .add_scaled(&self.scratch.layer_pose, layer_weight);
            self.outputs.layers.push(LayerOutput {
                layer: self.layers[li].id,
                weight: layer_weight,
                pose: self.scratch.layer_pose.clone(),
            });
        }
    }

    // ---- internals --------------------------------------------------------

    /// Weight write used by both the setters and the fade step: clamps and
    /// keeps active-set membership in sync. Never cancels fades.
    fn write_weight(&mut self, node: NodeId, weight: f32) {
        self.nodes[node.index()].weight = weight.clamp(0.0, 1.0);
        self.sync_active(node);
    }

    fn sync_active(&mut self, node: NodeId) {
        let idx = node.index();
        let Some(layer) = self.nodes[idx].layer else {
            return;
        };
        let active = self.nodes[idx].is_active();
        self.layers[layer.index()].apply_child_active(&mut self.nodes, node, active);
    }

    /// Detach the node from its fade group, releasing the group when it
    /// was the last tracked node. Other nodes in the group keep fading.
    fn cancel_fade(&mut self, node: NodeId) {
        if let Some(fid) = self.nodes[node.index()].fade.take() {
            if self.fades.remove_entry(fid, node) {
                self.fades.release(fid);
            }
            self.sync_active(node);
        }
    }

    /// Stop: cancel any fade, zero the weight, rewind to time zero.
    fn stop_node(&mut self, node: NodeId) {
        self.cancel_fade(node);
        self.write_weight(node, 0.0);
        let clip = &mut self.nodes[node.index()].clip;
        let was_playing = clip.playing;
        clip.playing = false;
        clip.time = 0.0;
        clip.event_cursor = 0.0;
        self.sync_active(node);
        if was_playing {
            self.emit(CoreEvent::NodeStopped { node });
        }
    }

    fn set_current(&mut self, layer: LayerId, node: Option<NodeId>) {
        let l = &mut self.layers[layer.index()];
        l.current = node;
        l.command_count += 1;
        let command_count = l.command_count;
        self.emit(CoreEvent::CurrentStateChanged {
            layer,
            node,
            command_count,
        });
    }

    /// Pick (or mint) the fade-in target for a restart fade. A node still
    /// carrying weight keeps fading out while a weightless family member
    /// restarts from time zero; the clone pool is bounded.
    fn acquire_restart_target(
        &mut self,
        layer: LayerId,
        node: NodeId,
    ) -> Result<NodeId, CoreError> {
        let threshold = self.cfg.weightless_threshold;
        if self.nodes[node.index()].weight <= threshold {
            self.rewind(node);
            return Ok(node);
        }
        let template = self.nodes[node.index()].clone_of.unwrap_or(node);
        let mut weightless: Option<(NodeId, f32)> = None;
        let mut clones: Vec<(NodeId, f32)> = Vec::new();
        for &child in &self.layers[layer.index()].children {
            if child == node {
                continue;
            }
            let n = &self.nodes[child.index()];
            let in_family = child == template || n.clone_of == Some(template);
            if !in_family {
                continue;
            }
            if n.weight <= threshold && weightless.map_or(true, |(_, w)| n.weight < w) {
                weightless = Some((child, n.weight));
            }
            if n.clone_of == Some(template) {
                clones.push((child, n.weight));
            }
        }
        if let Some((id, _)) = weightless {
            log::trace!("restart fade reusing weightless {:?}", id);
            self.rewind(id);
            return Ok(id);
        }
        if clones.len() < self.cfg.max_clones_per_source {
            let source = self.nodes[template.index()].clip.source;
            let speed = self.nodes[node.index()].speed;
            let id = self.add_node(layer, source)?;
            self.nodes[id.index()].clone_of = Some(template);
            self.nodes[id.index()].speed = speed;
            log::debug!("restart fade created clone {:?} of {:?}", id, template);
            self.rewind(id);
            return Ok(id);
        }
        // Clone budget exhausted: reuse the lowest-weight clone.
        match clones.into_iter().min_by(|a, b| a.1.total_cmp(&b.1)) {
            Some((id, _)) => {
                log::debug!("restart fade reusing clone {:?} at the clone cap", id);
                self.rewind(id);
                Ok(id)
            }
            None => {
                self.rewind(node);
                Ok(node)
            }
        }
    }

    fn rewind(&mut self, node: NodeId) {
        let clip = &mut self.nodes[node.index()].clip;
        clip.time = 0.0;
        clip.event_cursor = 0.0;
        clip.playing = true;
        self.sync_active(node);
    }

    fn emit(&mut self, event: CoreEvent) {
        if self.pending_events.len() < self.cfg.max_events_per_tick {
            self.pending_events.push(event);
        } else {
            log::trace!("event dropped past per-tick cap: {:?}", event);
        }
    }

    fn ensure_node(&self, node: NodeId) -> Result<(), CoreError> {
        if node.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(CoreError::InvalidArgument(format!("unknown node {:?}", node)))
        }
    }

    fn ensure_layer(&self, layer: LayerId) -> Result<(), CoreError> {
        if layer.index() < self.layers.len() {
            Ok(())
        } else {
            Err(CoreError::InvalidArgument(format!(
                "unknown layer {:?}",
                layer
            )))
        }
    }

    /// Play-family precondition: the node must be parented to this layer,
    /// not detached or nested elsewhere.
    fn ensure_child(&self, layer: LayerId, node: NodeId) -> Result<(), CoreError> {
        self.ensure_layer(layer)?;
        self.ensure_node(node)?;
        if self.nodes[node.index()].layer != Some(layer) {
            return Err(CoreError::InvalidOperation(format!(
                "node {:?} is not parented to layer {:?}",
                node, layer
            )));
        }
        Ok(())
    }

    fn source_info(&self, source: SourceId) -> Result<(f32, bool), CoreError> {
        self.sources
            .iter()
            .find(|(id, _)| *id == source)
            .map(|(_, s)| (s.length, s.looping))
            .ok_or_else(|| CoreError::InvalidArgument(format!("unknown source {:?}", source)))
    }

    fn ensure_slot_free(&self, layer: LayerId) -> Result<(), CoreError> {
        let l = &self.layers[layer.index()];
        if let Some(cap) = l.capacity {
            if l.children.len() >= cap {
                return Err(CoreError::InvalidOperation(format!(
                    "layer {:?} is at its child capacity {}",
                    layer, cap
                )));
            }
        }
        Ok(())
    }
}
