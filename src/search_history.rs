use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::MAX_RECENT_SEARCHES;

/// Bounded, deduplicated, most-recent-first search history.
///
/// Every insertion funnels through [`SearchHistory::push`], whether it comes
/// from a freshly classified label, a completed translation, or a manual
/// search. An existing occurrence is removed before re-insertion at the
/// front, and the tail is dropped past [`MAX_RECENT_SEARCHES`] entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistory {
    entries: VecDeque<String>,
}

impl SearchHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a search term as the most recent entry.
    ///
    /// Matching is by exact string equality, per the original contract.
    pub fn push(&mut self, term: impl Into<String>) {
        let term = term.into();
        self.entries.retain(|existing| existing != &term);
        self.entries.push_front(term);
        self.entries.truncate(MAX_RECENT_SEARCHES);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, term: &str) -> bool {
        self.entries.iter().any(|existing| existing == term)
    }

    #[must_use]
    pub fn most_recent(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}
