//! Channel layout: a stable mapping from channel names to pose indices.
//!
//! Hosts build one layout up front, hand the index side to their
//! `PoseSource`, and read composited poses back by name.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChannelLayout {
    names: Vec<String>,
    index: HashMap<String, u32>,
}

impl ChannelLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel name, returning its index. Idempotent: a name
    /// already present keeps its original index.
    pub fn insert(&mut self, name: &str) -> u32 {
        if let Some(idx) = self.index.get(name) {
            return *idx;
        }
        let idx = self.names.len() as u32;
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.index.get(name).copied()
    }

    #[inline]
    pub fn name_of(&self, idx: u32) -> Option<&str> {
        self.names.get(idx as usize).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
