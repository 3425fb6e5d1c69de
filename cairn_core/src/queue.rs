// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deduplicated FIFO of pending debug-view sync requests.
//!
//! A [`SyncRequestQueue`] holds entity handles, never references. Membership
//! is recorded on the entity itself in a [`QueueSlot`], which makes the
//! "already queued" check O(1) and lets [`remove`](SyncRequestQueue::remove)
//! unlink in O(1) by tombstoning the entry.
//!
//! # Flush semantics
//!
//! [`flush_all`](SyncRequestQueue::flush_all) snapshots the queue before
//! servicing anything. Requests added while the snapshot is being serviced
//! land in the live queue and are serviced by the *next* flush, so an entity
//! marking another entity dirty mid-flush can never cause an unbounded
//! same-frame loop.
//!
//! Each flush advances the queue epoch. A slot remembers the epoch it was
//! linked in, so a slot from a drained snapshot can never unlink an entry of
//! the live queue.

use alloc::vec::Vec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Link {
    epoch: u32,
    index: u32,
}

/// Per-entity membership record for one [`SyncRequestQueue`].
///
/// Stored on the debug view; `Default` is "not queued".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct QueueSlot {
    link: Option<Link>,
}

impl QueueSlot {
    /// Returns whether the owning view has an outstanding request, either in
    /// the live queue or in a snapshot that is being flushed.
    #[inline]
    #[must_use]
    pub const fn is_queued(&self) -> bool {
        self.link.is_some()
    }

    /// Clears the slot if it was linked in `epoch`, returning whether it was.
    ///
    /// Flush drivers call this right before servicing a drained request, so a
    /// request cancelled after the snapshot was taken is skipped and a view
    /// re-queued during the flush keeps its new membership.
    #[inline]
    pub fn release(&mut self, epoch: u32) -> bool {
        match self.link {
            Some(link) if link.epoch == epoch => {
                self.link = None;
                true
            }
            _ => false,
        }
    }
}

/// A request taken out of the queue by [`SyncRequestQueue::flush_all`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrainedRequest<K> {
    /// The entity that requested a sync.
    pub key: K,
    /// The epoch of the snapshot the request was drained from.
    pub epoch: u32,
}

/// Deduplicated FIFO of entities awaiting a sync, scoped to one map and one
/// entity kind.
#[derive(Clone, Debug)]
pub struct SyncRequestQueue<K> {
    /// Insertion-ordered entries; `None` marks a removed request.
    entries: Vec<Option<K>>,
    live: usize,
    epoch: u32,
}

impl<K> Default for SyncRequestQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> SyncRequestQueue<K> {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            live: 0,
            epoch: 0,
        }
    }

    /// Number of outstanding requests.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns whether no request is outstanding.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Appends `key` unless its slot already holds a request.
    ///
    /// Returns whether a request was added. A slot still linked into a
    /// snapshot that is being flushed counts as queued: that snapshot will
    /// service it.
    pub fn add(&mut self, key: K, slot: &mut QueueSlot) -> bool {
        if slot.is_queued() {
            return false;
        }
        let len = self.entries.len();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "queue length is bounded by the u32 entity index space"
        )]
        let index = len as u32;
        self.entries.push(Some(key));
        self.live += 1;
        slot.link = Some(Link {
            epoch: self.epoch,
            index,
        });
        true
    }

    /// Cancels the request recorded in `slot`, returning whether one existed.
    ///
    /// Safe to call when nothing is queued.
    pub fn remove(&mut self, slot: &mut QueueSlot) -> bool {
        match slot.link.take() {
            Some(link) if link.epoch == self.epoch => {
                let removed = self.entries[link.index as usize].take();
                debug_assert!(removed.is_some(), "queue slot linked to an empty entry");
                self.live -= 1;
                true
            }
            // Linked into a snapshot being flushed; clearing the slot makes
            // the flush driver skip it.
            Some(_) => true,
            None => false,
        }
    }
}

impl<K: Copy> SyncRequestQueue<K> {
    /// Returns the live requests in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.iter().flatten().copied()
    }

    /// Snapshots and empties the queue, then calls `sync` once per snapshot
    /// member in insertion order.
    ///
    /// `sync` receives the queue itself so it may queue new requests; those
    /// are serviced by the next flush. Returns the number of requests taken.
    pub fn flush_all(&mut self, mut sync: impl FnMut(&mut Self, DrainedRequest<K>)) -> usize {
        let epoch = self.epoch;
        let snapshot = core::mem::take(&mut self.entries);
        let taken = self.live;
        self.live = 0;
        self.epoch = self.epoch.wrapping_add(1);
        for key in snapshot.into_iter().flatten() {
            sync(self, DrainedRequest { key, epoch });
        }
        taken
    }
}

#[cfg(test)]
impl<K> SyncRequestQueue<K> {
    /// Whether `slot` is linked into the live entries, not a drained snapshot.
    fn contains(&self, slot: &QueueSlot) -> bool {
        matches!(slot.link, Some(link) if link.epoch == self.epoch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn add_twice_keeps_one_entry() {
        let mut q = SyncRequestQueue::new();
        let mut slot = QueueSlot::default();
        assert!(q.add(1_u32, &mut slot));
        assert!(!q.add(1_u32, &mut slot));
        assert_eq!(q.len(), 1);
        assert!(q.contains(&slot));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut q = SyncRequestQueue::new();
        let mut slot = QueueSlot::default();
        assert!(!q.remove(&mut slot));
        q.add(1_u32, &mut slot);
        assert!(q.remove(&mut slot));
        assert!(!q.remove(&mut slot));
        assert!(q.is_empty());
        assert!(!slot.is_queued());
    }

    #[test]
    fn remove_keeps_order_of_others() {
        let mut q = SyncRequestQueue::new();
        let mut slots = [QueueSlot::default(); 3];
        for (i, slot) in slots.iter_mut().enumerate() {
            q.add(i, slot);
        }
        q.remove(&mut slots[1]);
        assert_eq!(q.iter().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn flush_services_each_member_once_in_order() {
        let mut q = SyncRequestQueue::new();
        let mut slots = [QueueSlot::default(); 3];
        for (i, slot) in slots.iter_mut().enumerate() {
            q.add(i, slot);
        }
        let mut seen = Vec::new();
        let taken = q.flush_all(|_, req| {
            assert!(slots[req.key].release(req.epoch), "slot must be linked in the snapshot");
            seen.push(req.key);
        });
        assert_eq!(taken, 3);
        assert_eq!(seen, vec![0, 1, 2]);
        assert!(q.is_empty());
        assert!(slots.iter().all(|s| !s.is_queued()));
    }

    #[test]
    fn requests_added_during_flush_wait_for_next_flush() {
        let mut q = SyncRequestQueue::new();
        let mut slots = [QueueSlot::default(); 2];
        q.add(0_usize, &mut slots[0]);

        let mut seen = Vec::new();
        q.flush_all(|q, req| {
            slots[req.key].release(req.epoch);
            seen.push(req.key);
            // Servicing 0 marks 1 dirty.
            if req.key == 0 {
                q.add(1, &mut slots[1]);
            }
        });
        assert_eq!(seen, vec![0]);
        assert_eq!(q.iter().collect::<Vec<_>>(), vec![1]);

        seen.clear();
        q.flush_all(|_, req| {
            slots[req.key].release(req.epoch);
            seen.push(req.key);
        });
        assert_eq!(seen, vec![1]);
    }

    #[test]
    fn cancel_during_flush_skips_pending_member() {
        let mut q = SyncRequestQueue::new();
        let mut slots = [QueueSlot::default(); 2];
        q.add(0_usize, &mut slots[0]);
        q.add(1_usize, &mut slots[1]);

        let mut seen = Vec::new();
        q.flush_all(|q, req| {
            if !slots[req.key].release(req.epoch) {
                return;
            }
            seen.push(req.key);
            if req.key == 0 {
                // Servicing 0 detaches 1 before its turn.
                assert!(q.remove(&mut slots[1]), "pending member is cancellable");
            }
        });
        assert_eq!(seen, vec![0]);
        assert!(q.is_empty());
    }

    #[test]
    fn stale_slot_cannot_unlink_live_entry() {
        let mut q = SyncRequestQueue::new();
        let mut a = QueueSlot::default();
        let mut b = QueueSlot::default();
        q.add(0_usize, &mut a);
        let stale = a;
        q.flush_all(|_, req| {
            a.release(req.epoch);
        });
        q.add(1_usize, &mut b);

        let mut stale = stale;
        // The stale slot points at index 0 of the previous epoch.
        assert!(q.remove(&mut stale));
        assert_eq!(q.len(), 1);
        assert!(q.contains(&b));
    }
}
