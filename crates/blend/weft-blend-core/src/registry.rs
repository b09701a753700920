//! State registry: opaque keys resolved to nodes in one bounded pass.
//!
//! A key may bind a node directly or alias another key. Alias chains are
//! resolved with a hard depth cap instead of an open-ended reference walk,
//! so resolution is total even in the presence of cycles.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::ids::NodeId;

/// Opaque registry key. Hosts mint these however they like: hashes,
/// interned ids, enum discriminants widened to u64.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct StateKey(pub u64);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyEntry {
    /// Terminal binding.
    Node(NodeId),
    /// One redirection hop.
    Alias(StateKey),
}

#[derive(Debug, Default)]
pub struct StateRegistry {
    entries: HashMap<StateKey, KeyEntry>,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, key: StateKey, node: NodeId) {
        self.entries.insert(key, KeyEntry::Node(node));
    }

    pub fn alias(&mut self, key: StateKey, to: StateKey) {
        self.entries.insert(key, KeyEntry::Alias(to));
    }

    pub fn unbind(&mut self, key: StateKey) {
        self.entries.remove(&key);
    }

    /// Remove every direct binding to a node (used when it is destroyed).
    /// Aliases pointing at removed keys simply stop resolving.
    pub fn remove_node(&mut self, node: NodeId) {
        self.entries.retain(|_, e| *e != KeyEntry::Node(node));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a key through at most `max_depth` alias hops. A longer (or
    /// cyclic) chain is a miss, not an error.
    pub fn resolve(&self, key: StateKey, max_depth: usize) -> Option<NodeId> {
        let mut key = key;
        for _ in 0..=max_depth {
            match self.entries.get(&key)? {
                KeyEntry::Node(node) => return Some(*node),
                KeyEntry::Alias(next) => key = *next,
            }
        }
        log::warn!(
            "state key {:?} exceeded alias depth {}; treating as unbound",
            key,
            max_depth
        );
        None
    }
}
