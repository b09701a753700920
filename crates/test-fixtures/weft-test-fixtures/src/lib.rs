//! Canned clip fixtures and deterministic samplers for Weft tests.

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

use weft_api_core::{Pose, PoseSource, SourceId};

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../fixtures/clips.json");
    serde_json::from_str(raw).expect("clip fixture manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    clips: Vec<ClipFixture>,
}

/// One canned clip description. Mirrors the scheduler's source descriptor
/// without depending on it.
#[derive(Clone, Debug, Deserialize)]
pub struct ClipFixture {
    pub name: String,
    pub length: f32,
    pub looping: bool,
}

pub fn clips() -> &'static [ClipFixture] {
    &MANIFEST.clips
}

pub fn clip(name: &str) -> Result<ClipFixture> {
    MANIFEST
        .clips
        .iter()
        .find(|c| c.name == name)
        .cloned()
        .ok_or_else(|| anyhow!("no clip fixture named '{name}'"))
}

/// Deterministic sampler: channel `c` of source `s` at time `t` reads
/// `s * 100 + c * 10 + t`, so tests can predict any composited value.
#[derive(Debug)]
pub struct RampSource {
    channels: usize,
}

impl RampSource {
    pub fn new(channels: usize) -> Self {
        Self { channels }
    }

    /// The value this sampler writes for (source, channel, time).
    pub fn expected(source: SourceId, channel: usize, time: f32) -> f32 {
        source.0 as f32 * 100.0 + channel as f32 * 10.0 + time
    }
}

impl PoseSource for RampSource {
    fn channel_count(&self) -> usize {
        self.channels
    }

    fn sample(&mut self, source: SourceId, time: f32, out: &mut Pose) {
        for (c, v) in out.channels_mut().iter_mut().enumerate() {
            *v = Self::expected(source, c, time);
        }
    }
}

/// Sampler that writes a constant everywhere, for tests that only watch
/// weights.
#[derive(Debug)]
pub struct ConstSource {
    channels: usize,
    value: f32,
}

impl ConstSource {
    pub fn new(channels: usize, value: f32) -> Self {
        Self { channels, value }
    }
}

impl PoseSource for ConstSource {
    fn channel_count(&self) -> usize {
        self.channels
    }

    fn sample(&mut self, _source: SourceId, _time: f32, out: &mut Pose) {
        for v in out.channels_mut() {
            *v = self.value;
        }
    }
}
