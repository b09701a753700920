//! Core configuration for weft-blend-core.

use serde::{Deserialize, Serialize};

/// Sizing hints and policy knobs for the scheduler.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Weight at or below which a node counts as "weightless" when a
    /// restart fade looks for a fade-in target.
    pub weightless_threshold: f32,

    /// Upper bound on restart clones kept per source family. Past it the
    /// lowest-weight existing clone is reused instead of growing the graph.
    pub max_clones_per_source: usize,

    /// Play immediately instead of fading when the base layer still has
    /// zero weight. Parity behavior; disable to always honor durations.
    pub skip_first_fade: bool,

    /// Hard cap on registry alias-chain hops. A deeper chain resolves as
    /// a miss rather than walking unbounded.
    pub max_key_depth: usize,

    /// Initial capacity of the fade-group pool.
    pub fade_pool_capacity: usize,

    /// Maximum events retained per tick; further events are dropped.
    pub max_events_per_tick: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weightless_threshold: 0.1,
            max_clones_per_source: 3,
            skip_first_fade: true,
            max_key_depth: 4,
            fade_pool_capacity: 16,
            max_events_per_tick: 1024,
        }
    }
}
