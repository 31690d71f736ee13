#![forbid(unsafe_code)]

//! Snapshot undo/redo history with a live-edit slot.
//!
//! [`History`] keeps whole values (`past`, `present`, `future`). Committed
//! edits go through [`push`](History::push); continuous gestures such as a
//! divider drag replace the present through
//! [`set_direct`](History::set_direct) without recording anything.
//!
//! # Architecture
//!
//! ```text
//! push(t1), push(t2)
//! past:    [t0, t1]     present: t2     future: []
//!
//! set_direct(d1), set_direct(d2)          (drag in progress)
//! past:    [t0, t1]     present: d2     future: []     committed: t2
//!
//! push(t3)                                (drag released)
//! past:    [t0, t1, t2] present: t3     future: []
//!
//! undo()
//! past:    [t0, t1]     present: t2     future: [t3]
//! ```
//!
//! While live edits are pending the history remembers the last committed
//! value, so a whole gesture becomes exactly one undo step and
//! [`discard_live`](History::discard_live) can restore the pre-gesture state.

use std::collections::VecDeque;
use std::fmt;
use std::mem;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Configuration for [`History`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of entries kept in `past`.
    /// Oldest entries are evicted when this limit is exceeded.
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}

impl HistoryConfig {
    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// No eviction.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }
}

/// Undo/redo history over whole snapshots of `T`.
///
/// # Invariants
///
/// 1. `past.len() <= config.max_depth` after every operation.
/// 2. `future` is cleared on every `push`.
/// 3. `committed` is `Some` only while `present` holds live edits.
pub struct History<T> {
    past: VecDeque<T>,
    present: T,
    future: VecDeque<T>,
    committed: Option<T>,
    config: HistoryConfig,
}

impl<T> fmt::Debug for History<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("undo_depth", &self.past.len())
            .field("redo_depth", &self.future.len())
            .field("live", &self.committed.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl<T> History<T> {
    /// Start a history at `initial` with empty stacks.
    #[must_use]
    pub fn new(initial: T, config: HistoryConfig) -> Self {
        Self {
            past: VecDeque::new(),
            present: initial,
            future: VecDeque::new(),
            committed: None,
            config,
        }
    }

    // ====================================================================
    // Core Operations
    // ====================================================================

    /// Commit `next`, recording the last committed value for undo and
    /// dropping every redo entry.
    pub fn push(&mut self, next: T) {
        let previous = mem::replace(&mut self.present, next);
        let recorded = self.committed.take().unwrap_or(previous);
        self.past.push_back(recorded);
        self.future.clear();
        self.enforce_depth();
        trace!(undo_depth = self.past.len(), "history push");
    }

    /// Replace the present without recording a history entry.
    pub fn set_direct(&mut self, next: T) {
        let previous = mem::replace(&mut self.present, next);
        if self.committed.is_none() {
            self.committed = Some(previous);
        }
        trace!("history set_direct");
    }

    /// Restore the last committed value, dropping live edits.
    ///
    /// Returns `false` when no live edits were pending.
    pub fn discard_live(&mut self) -> bool {
        match self.committed.take() {
            Some(committed) => {
                self.present = committed;
                trace!("history live edits discarded");
                true
            }
            None => false,
        }
    }

    /// Step back one committed entry. Live edits are dropped first.
    ///
    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.discard_live();
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        trace!(
            undo_depth = self.past.len(),
            redo_depth = self.future.len(),
            "history undo"
        );
        true
    }

    /// Step forward one undone entry. Live edits are dropped first.
    ///
    /// Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.discard_live();
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = mem::replace(&mut self.present, next);
        self.past.push_back(current);
        self.enforce_depth();
        trace!(
            undo_depth = self.past.len(),
            redo_depth = self.future.len(),
            "history redo"
        );
        true
    }

    /// Clear every stack and start over at `value`.
    pub fn reset(&mut self, value: T) {
        self.past.clear();
        self.future.clear();
        self.committed = None;
        self.present = value;
        trace!("history reset");
    }

    // ====================================================================
    // Query
    // ====================================================================

    /// Current value, including live edits.
    #[must_use]
    pub fn present(&self) -> &T {
        &self.present
    }

    /// Last committed value; equals [`present`](Self::present) unless live
    /// edits are pending.
    #[must_use]
    pub fn committed(&self) -> &T {
        self.committed.as_ref().unwrap_or(&self.present)
    }

    /// True while `present` holds uncommitted live edits.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.committed.is_some()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    // ====================================================================
    // Maintenance
    // ====================================================================

    fn enforce_depth(&mut self) {
        while self.past.len() > self.config.max_depth {
            self.past.pop_front();
        }
    }
}
