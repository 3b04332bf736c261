pub mod requirement;

use hashbrown::HashMap;
use hasterando_game::Item;
use serde::{Deserialize, Serialize};

pub use requirement::Requirement;

/// Multiset of collected item names. It only ever grows during forward
/// reachability, which is what makes every `Requirement` monotonic over it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionState {
    counts: HashMap<String, usize>,
}

impl CollectionState {
    pub fn new() -> Self {
        CollectionState::default()
    }

    pub fn count_of(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn has(&self, name: &str, count: usize) -> bool {
        self.count_of(name) >= count
    }

    pub fn collect_name(&mut self, name: &str) {
        self.collect_count(name, 1);
    }

    pub fn collect_count(&mut self, name: &str, count: usize) {
        if count == 0 {
            return;
        }
        *self.counts.entry_ref(name).or_insert(0) += count;
    }

    /// Collect an item into the state. Only progression items affect logic, so anything
    /// else is skipped. Returns whether the state changed.
    pub fn collect(&mut self, item: &Item) -> bool {
        if !item.is_progression() {
            return false;
        }
        self.collect_name(&item.name);
        true
    }

    /// Functional variant of `collect`, leaving `self` untouched.
    pub fn with_collected(&self, item: &Item) -> CollectionState {
        let mut out = self.clone();
        out.collect(item);
        out
    }

    /// True if every count in `self` is at most the matching count in `other`.
    pub fn is_subset_of(&self, other: &CollectionState) -> bool {
        self.counts
            .iter()
            .all(|(name, &count)| other.count_of(name) >= count)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}
