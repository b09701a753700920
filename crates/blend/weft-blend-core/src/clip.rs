//! Clip sources and leaf playback state.

use serde::{Deserialize, Serialize};

use weft_api_core::{CoreError, SourceId};

/// A registered clip source descriptor. Shared by reference: any number of
/// nodes may point at the same source.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClipSource {
    /// Internal id assigned when registered with the graph.
    #[serde(skip)]
    pub id: Option<SourceId>,
    pub name: String,
    /// Length in seconds.
    pub length: f32,
    pub looping: bool,
}

impl ClipSource {
    pub fn new(name: &str, length: f32, looping: bool) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            length,
            looping,
        }
    }

    /// Validate basic invariants (finite, non-negative length).
    pub fn validate_basic(&self) -> Result<(), CoreError> {
        if !self.length.is_finite() || self.length < 0.0 {
            return Err(CoreError::InvalidArgument(format!(
                "clip '{}' length must be finite and >= 0, got {}",
                self.name, self.length
            )));
        }
        Ok(())
    }
}

fn fmod64(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

/// Boundary crossings observed since the last event drain.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundaryCrossings {
    /// Loop boundaries passed (looping clips only).
    pub loops: u64,
    /// Whether the play head crossed the clip end (non-looping clips only).
    pub ended: bool,
}

/// Leaf playback state for one node.
///
/// `time` advances monotonically and is never wrapped, even when looping;
/// looping is a presentation concern resolved by [`ClipState::sample_time`]
/// and [`ClipState::normalized_time`].
#[derive(Clone, Debug)]
pub struct ClipState {
    pub source: SourceId,
    /// Cached from the source when bound.
    pub length: f32,
    pub looping: bool,
    /// Monotone play head in seconds.
    pub time: f64,
    /// Boundary-event cursor. Trails `time` until events are drained;
    /// `set_time` snaps it (skipping events), `move_time` leaves it.
    pub event_cursor: f64,
    pub playing: bool,
}

impl ClipState {
    pub fn new(source: SourceId, length: f32, looping: bool) -> Self {
        Self {
            source,
            length,
            looping,
            time: 0.0,
            event_cursor: 0.0,
            playing: false,
        }
    }

    /// time / length. Integer part is the loop count, fraction the phase.
    #[inline]
    pub fn normalized_time(&self) -> f64 {
        if self.length > 0.0 {
            self.time / self.length as f64
        } else {
            0.0
        }
    }

    /// Time handed to the sampler: wrapped for looping clips, clamped to
    /// the clip end otherwise.
    pub fn sample_time(&self) -> f32 {
        let len = self.length as f64;
        if len <= 0.0 {
            return 0.0;
        }
        if self.looping {
            fmod64(self.time, len) as f32
        } else {
            self.time.clamp(0.0, len) as f32
        }
    }

    /// Drain boundary events: loop boundaries or the clip end crossed
    /// between the cursor and the play head. Reverse motion emits nothing;
    /// the cursor only ever catches up.
    pub fn take_boundary_events(&mut self) -> BoundaryCrossings {
        let mut out = BoundaryCrossings::default();
        let len = self.length as f64;
        if self.time < self.event_cursor {
            self.event_cursor = self.time;
            return out;
        }
        if len > 0.0 {
            if self.looping {
                let before = (self.event_cursor / len).floor();
                let after = (self.time / len).floor();
                if after > before {
                    out.loops = (after - before) as u64;
                }
            } else {
                out.ended = self.event_cursor < len && self.time >= len;
            }
        }
        self.event_cursor = self.time;
        out
    }
}
