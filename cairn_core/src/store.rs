// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational slot storage shared by every entity kind.

use alloc::vec::Vec;

use crate::id::{INVALID, SlotKey};

/// Slot arena addressed by generational handles.
///
/// Freed slots are recycled via a free list, and generation counters make
/// handles to a freed slot fail lookup even after the slot is reused.
#[derive(Debug)]
pub(crate) struct Slots<K, T> {
    entries: Vec<Option<T>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
    _key: core::marker::PhantomData<K>,
}

impl<K: SlotKey, T> Default for Slots<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SlotKey, T> Slots<K, T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            _key: core::marker::PhantomData,
        }
    }

    /// Reserves a slot and fills it with the value built from the new handle.
    ///
    /// The builder sees the final handle so values can hold a back index to
    /// their own slot.
    pub(crate) fn insert_with(&mut self, build: impl FnOnce(K) -> T) -> K {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            idx
        } else {
            let len = self.entries.len();
            assert!(len < INVALID as usize, "slot count exceeds u32");
            #[expect(clippy::cast_possible_truncation, reason = "checked above")]
            let idx = len as u32;
            self.entries.push(None);
            self.generation.push(0);
            idx
        };
        let key = K::from_parts(idx, self.generation[idx as usize]);
        self.entries[idx as usize] = Some(build(key));
        key
    }

    /// Removes and returns the value for `key`, or `None` if the handle is
    /// stale.
    pub(crate) fn remove(&mut self, key: K) -> Option<T> {
        if !self.is_alive(key) {
            return None;
        }
        let value = self.entries[key.idx() as usize].take();
        // Bump generation so old handles immediately fail lookup.
        self.generation[key.idx() as usize] += 1;
        self.free_list.push(key.idx());
        value
    }

    /// Returns whether the given handle refers to a live slot.
    #[must_use]
    pub(crate) fn is_alive(&self, key: K) -> bool {
        let idx = key.idx() as usize;
        idx < self.entries.len()
            && self.generation[idx] == key.generation()
            && self.entries[idx].is_some()
    }

    pub(crate) fn get(&self, key: K) -> Option<&T> {
        if !self.is_alive(key) {
            return None;
        }
        self.entries[key.idx() as usize].as_ref()
    }

    pub(crate) fn get_mut(&mut self, key: K) -> Option<&mut T> {
        if !self.is_alive(key) {
            return None;
        }
        self.entries[key.idx() as usize].as_mut()
    }

    /// Returns the handles of all live slots in slot order.
    pub(crate) fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries
            .iter()
            .zip(&self.generation)
            .enumerate()
            .filter(|(_, (entry, _))| entry.is_some())
            .map(|(idx, (_, generation))| {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "slot count is bounded by u32 at insertion"
                )]
                let idx = idx as u32;
                K::from_parts(idx, *generation)
            })
    }

    /// Number of live slots.
    pub(crate) fn len(&self) -> usize {
        self.entries.len() - self.free_list.len()
    }
}
