//! Packrat memo table.
//!
//! One table per grammar slot, keyed by `(RuleId, pos)`. A `Pending` entry
//! is inserted before a rule body runs; hitting it again at the same
//! position means the rule is left-recursive there.

use std::collections::HashMap;

use sprout_core::RuleId;

use super::node::Match;

#[derive(Debug, Clone)]
pub enum MemoState<'a> {
    /// Body is being evaluated. `detected` is set when a recursive call
    /// at the same position ran into this sentinel.
    Pending { detected: bool },
    /// Finished; `None` is a stored failure.
    Done(Option<Match<'a>>),
}

#[derive(Debug, Clone)]
pub struct MemoEntry<'a> {
    pub state: MemoState<'a>,
    pub end: usize,
    pub use_count: u32,
}

pub type MemoKey = (RuleId, usize);

#[derive(Debug, Default)]
pub struct MemoTable<'a> {
    entries: HashMap<MemoKey, MemoEntry<'a>>,
}

impl<'a> MemoTable<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: MemoKey) -> Option<&MemoEntry<'a>> {
        self.entries.get(&key)
    }

    pub fn get_mut(&mut self, key: MemoKey) -> Option<&mut MemoEntry<'a>> {
        self.entries.get_mut(&key)
    }

    pub fn insert_pending(&mut self, key: MemoKey) {
        self.entries.insert(
            key,
            MemoEntry {
                state: MemoState::Pending { detected: false },
                end: key.1,
                use_count: 0,
            },
        );
    }

    /// Record a finished result, keeping the hit count of the entry it replaces.
    pub fn store(&mut self, key: MemoKey, ans: Option<Match<'a>>, end: usize) {
        let use_count = self.entries.get(&key).map_or(0, |e| e.use_count);
        self.entries.insert(
            key,
            MemoEntry {
                state: MemoState::Done(ans),
                end,
                use_count,
            },
        );
    }

    /// Whether the pending sentinel at `key` saw a left-recursive call.
    pub fn detected(&self, key: MemoKey) -> bool {
        matches!(
            self.entries.get(&key),
            Some(MemoEntry {
                state: MemoState::Pending { detected: true },
                ..
            })
        )
    }

    pub fn evict(&mut self, key: MemoKey) {
        self.entries.remove(&key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of hit counts over all entries.
    pub fn hits(&self) -> u64 {
        self.entries.values().map(|e| u64::from(e.use_count)).sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Summary of memo activity over one parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub entries: usize,
    pub hits: u64,
    /// Left-recursive applications that entered the growth loop.
    pub growths: u32,
}
