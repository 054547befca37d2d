// SPDX-License-Identifier: MPL-2.0
//! Per-session navigation state.
//!
//! A [`WorkingSet`] holds the items discovered for one playlist load, the
//! visitation history and the cursor into that history. Items only grow during
//! a session, so every recorded history index stays valid until [`WorkingSet::reset`].
//!
//! The current item is tracked separately from the cursor: [`WorkingSet::jump`]
//! shows an item without recording it, and the next step continues from the
//! history cursor.

use super::random::generate_smart_random_index;
use crate::domain::media::MediaItem;

/// Items, history and cursor for one viewing session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingSet {
    items: Vec<MediaItem>,
    history: Vec<usize>,
    cursor: Option<usize>,
    current: Option<usize>,
}

impl WorkingSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears everything; nothing is selected afterwards.
    pub fn reset(&mut self) {
        self.items.clear();
        self.history.clear();
        self.cursor = None;
        self.current = None;
    }

    /// Appends items in order.
    ///
    /// When the set goes from empty to non-empty the first item is selected and
    /// recorded as the first history entry. Returns `true` if the selection changed.
    pub fn append(&mut self, items: impl IntoIterator<Item = MediaItem>) -> bool {
        let was_empty = self.items.is_empty();
        self.items.extend(items);
        if was_empty && !self.items.is_empty() {
            self.record(0);
            return true;
        }
        false
    }

    /// Redoes the next forward history entry, or records a fresh random pick.
    ///
    /// Returns the newly shown index, or `None` when the set is empty.
    pub fn next<F>(&mut self, draw: &mut F) -> Option<usize>
    where
        F: FnMut(usize) -> usize + ?Sized,
    {
        if self.items.is_empty() {
            return None;
        }
        if let Some(cursor) = self.cursor {
            if cursor + 1 < self.history.len() {
                return Some(self.show(cursor + 1));
            }
        }
        let index = generate_smart_random_index(self.items.len(), &self.history, draw);
        Some(self.record(index))
    }

    /// Steps back through history, wrapping from the start to the end.
    ///
    /// With no history yet this behaves like [`WorkingSet::next`].
    pub fn previous<F>(&mut self, draw: &mut F) -> Option<usize>
    where
        F: FnMut(usize) -> usize + ?Sized,
    {
        let Some(cursor) = self.cursor.filter(|_| !self.history.is_empty()) else {
            return self.next(draw);
        };
        let target = if cursor == 0 {
            self.history.len() - 1
        } else {
            cursor - 1
        };
        Some(self.show(target))
    }

    /// Shows `item` without touching history or cursor.
    ///
    /// Returns the item's index, or `None` if it is not part of the set.
    pub fn jump(&mut self, item: &MediaItem) -> Option<usize> {
        let index = self.items.iter().position(|candidate| candidate == item)?;
        self.current = Some(index);
        Some(index)
    }

    fn record(&mut self, index: usize) -> usize {
        self.history.push(index);
        self.show(self.history.len() - 1)
    }

    fn show(&mut self, cursor: usize) -> usize {
        let index = self.history[cursor];
        self.cursor = Some(cursor);
        self.current = Some(index);
        index
    }

    #[must_use]
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    #[must_use]
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    #[must_use]
    pub fn current(&self) -> Option<&MediaItem> {
        self.current.and_then(|index| self.items.get(index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
