//! An indexed binary heap with O(log n) re-key and removal of interior entries.
//!
//! Each entry is assigned a stable [`EntryId`] on insert. A slot table maps
//! ids to current array positions and is updated on every swap, so a caller
//! holding an id can re-rank or remove that entry without a linear search.

use crate::error::{DispatchError, Result};

/// Slot table value for an entry that has been removed from the heap.
const SLOT_REMOVED: usize = usize::MAX;

/// Stable handle to a heap entry, valid until the entry is removed.
///
/// Ids are never reused, so operations through a handle whose entry has been
/// extracted or removed fail with [`DispatchError::StaleHandle`] instead of
/// touching a recycled slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

impl EntryId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Comparator direction, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapOrder {
    /// Smallest key at the top (`extract_top` yields ascending keys).
    Min,
    /// Largest key at the top.
    Max,
}

#[derive(Debug)]
struct Entry<K, T> {
    id: EntryId,
    key: K,
    payload: T,
}

/// A binary heap whose entries can be re-keyed or removed in place.
#[derive(Debug)]
pub struct IndexedHeap<K, T> {
    order: HeapOrder,
    entries: Vec<Entry<K, T>>,
    /// Maps `EntryId` to the entry's current position in `entries`.
    /// Invariant: `slots[entries[i].id.0] == i` for every valid `i`.
    slots: Vec<usize>,
}

impl<K: Ord, T> IndexedHeap<K, T> {
    pub fn new(order: HeapOrder) -> Self {
        Self {
            order,
            entries: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// A heap that surfaces the smallest key first.
    pub fn min() -> Self {
        Self::new(HeapOrder::Min)
    }

    /// A heap that surfaces the largest key first.
    pub fn max() -> Self {
        Self::new(HeapOrder::Max)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts an entry and returns its stable handle.
    pub fn insert(&mut self, key: K, payload: T) -> EntryId {
        let id = EntryId(self.slots.len());
        let slot = self.entries.len();
        self.slots.push(slot);
        self.entries.push(Entry { id, key, payload });
        self.sift_up(slot);
        id
    }

    /// Removes and returns the top entry.
    pub fn extract_top(&mut self) -> Result<(K, T)> {
        if self.entries.is_empty() {
            return Err(DispatchError::EmptyQueue);
        }
        let last = self.entries.len() - 1;
        self.swap_entries(0, last);
        let entry = self.entries.pop().expect("checked non-empty");
        self.slots[entry.id.0] = SLOT_REMOVED;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Ok((entry.key, entry.payload))
    }

    /// Returns the top entry's key and payload without removing it.
    pub fn peek(&self) -> Result<(&K, &T)> {
        self.entries
            .first()
            .map(|e| (&e.key, &e.payload))
            .ok_or(DispatchError::EmptyQueue)
    }

    /// Returns the top entry's handle, if any.
    pub fn peek_id(&self) -> Option<EntryId> {
        self.entries.first().map(|e| e.id)
    }

    /// Returns the key and payload of a live entry.
    pub fn get(&self, id: EntryId) -> Result<(&K, &T)> {
        let slot = self.slot_of(id)?;
        let entry = &self.entries[slot];
        Ok((&entry.key, &entry.payload))
    }

    /// Replaces an entry's key and restores heap order around its slot.
    ///
    /// A changed key can only violate order against the parent or against the
    /// children, never both, so a sift-up is attempted first and a sift-down
    /// runs only when no upward move happened.
    pub fn update_key(&mut self, id: EntryId, key: K) -> Result<()> {
        let slot = self.slot_of(id)?;
        self.entries[slot].key = key;
        if !self.sift_up(slot) {
            self.sift_down(slot);
        }
        Ok(())
    }

    /// Removes an arbitrary entry by handle.
    ///
    /// Same swap-with-last technique as [`extract_top`](Self::extract_top),
    /// generalized from slot 0; the entry moved into the vacated slot is
    /// re-sifted in whichever direction order demands.
    pub fn remove(&mut self, id: EntryId) -> Result<(K, T)> {
        let slot = self.slot_of(id)?;
        let last = self.entries.len() - 1;
        self.swap_entries(slot, last);
        let entry = self.entries.pop().expect("slot lookup proved non-empty");
        self.slots[entry.id.0] = SLOT_REMOVED;
        if slot < self.entries.len() && !self.sift_up(slot) {
            self.sift_down(slot);
        }
        Ok((entry.key, entry.payload))
    }

    fn slot_of(&self, id: EntryId) -> Result<usize> {
        match self.slots.get(id.0) {
            Some(&slot) if slot != SLOT_REMOVED => Ok(slot),
            _ => Err(DispatchError::StaleHandle(id.0)),
        }
    }

    /// True when `a` belongs above `b` under the configured ordering.
    fn precedes(&self, a: &K, b: &K) -> bool {
        match self.order {
            HeapOrder::Min => a < b,
            HeapOrder::Max => a > b,
        }
    }

    /// Swaps two entries and keeps the slot table exact.
    fn swap_entries(&mut self, i: usize, j: usize) {
        self.entries.swap(i, j);
        self.slots[self.entries[i].id.0] = i;
        self.slots[self.entries[j].id.0] = j;
    }

    /// Moves the entry at `slot` up until order holds. Returns true if the
    /// entry moved.
    fn sift_up(&mut self, mut slot: usize) -> bool {
        let mut moved = false;
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.precedes(&self.entries[slot].key, &self.entries[parent].key) {
                break;
            }
            self.swap_entries(slot, parent);
            slot = parent;
            moved = true;
        }
        moved
    }

    /// Moves the entry at `slot` down until order holds.
    fn sift_down(&mut self, mut slot: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * slot + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < len && self.precedes(&self.entries[right].key, &self.entries[left].key) {
                child = right;
            }
            if !self.precedes(&self.entries[child].key, &self.entries[slot].key) {
                break;
            }
            self.swap_entries(slot, child);
            slot = child;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl<K: Ord, T> IndexedHeap<K, T> {
        /// Checks the slot-table and heap-order invariants.
        fn check_invariants(&self) {
            for (i, entry) in self.entries.iter().enumerate() {
                assert_eq!(
                    self.slots[entry.id.0], i,
                    "slot table out of sync at position {i}"
                );
            }
            for i in 1..self.entries.len() {
                let parent = (i - 1) / 2;
                assert!(
                    !self.precedes(&self.entries[i].key, &self.entries[parent].key),
                    "heap order violated between {parent} and {i}"
                );
            }
        }
    }

    #[test]
    fn test_extract_min_order() {
        let mut heap = IndexedHeap::min();
        for key in [2, 1, 4, 5, 3] {
            heap.insert(key, ());
            heap.check_invariants();
        }
        let mut popped = Vec::new();
        while let Ok((key, ())) = heap.extract_top() {
            heap.check_invariants();
            popped.push(key);
        }
        assert_eq!(popped, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_heap_errors() {
        let mut heap: IndexedHeap<i32, ()> = IndexedHeap::min();
        assert_eq!(heap.extract_top().unwrap_err(), DispatchError::EmptyQueue);
        assert_eq!(heap.peek().unwrap_err(), DispatchError::EmptyQueue);
        assert!(heap.peek_id().is_none());
    }

    #[test]
    fn test_peek_does_not_remove() {
        let mut heap = IndexedHeap::min();
        heap.insert(7, "seven");
        heap.insert(3, "three");
        assert_eq!(heap.peek().unwrap(), (&3, &"three"));
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn test_update_key_reranks_entry() {
        let mut heap = IndexedHeap::min();
        let id = heap.insert(1, "orange");
        heap.insert(2, "apple");
        heap.insert(3, "banana");

        heap.update_key(id, 5).unwrap();
        heap.check_invariants();

        assert_eq!(heap.extract_top().unwrap(), (2, "apple"));
        assert_eq!(heap.extract_top().unwrap(), (3, "banana"));
        assert_eq!(heap.extract_top().unwrap(), (5, "orange"));
    }

    #[test]
    fn test_max_order_priority_scenario() {
        let mut heap = IndexedHeap::max();
        heap.insert(3, "banana");
        heap.insert(2, "apple");
        heap.insert(5, "pear");
        let orange = heap.insert(1, "orange");
        heap.update_key(orange, 5).unwrap();
        heap.check_invariants();

        let first = heap.extract_top().unwrap();
        let second = heap.extract_top().unwrap();
        // pear and orange share priority 5; their relative order is
        // unspecified.
        assert_eq!(first.0, 5);
        assert_eq!(second.0, 5);
        let mut top_two = [first.1, second.1];
        top_two.sort_unstable();
        assert_eq!(top_two, ["orange", "pear"]);

        assert_eq!(heap.extract_top().unwrap(), (3, "banana"));
        assert_eq!(heap.extract_top().unwrap(), (2, "apple"));
    }

    #[test]
    fn test_remove_interior_entry() {
        let mut heap = IndexedHeap::min();
        heap.insert(1, "a");
        let mid = heap.insert(3, "b");
        heap.insert(5, "c");
        heap.insert(4, "d");
        heap.insert(2, "e");

        let (key, payload) = heap.remove(mid).unwrap();
        assert_eq!((key, payload), (3, "b"));
        heap.check_invariants();

        let mut remaining = Vec::new();
        while let Ok((key, _)) = heap.extract_top() {
            remaining.push(key);
        }
        assert_eq!(remaining, vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_stale_handle_detected() {
        let mut heap = IndexedHeap::min();
        let id = heap.insert(1, "only");
        heap.extract_top().unwrap();

        assert_eq!(
            heap.update_key(id, 9).unwrap_err(),
            DispatchError::StaleHandle(id.index())
        );
        assert_eq!(
            heap.remove(id).unwrap_err(),
            DispatchError::StaleHandle(id.index())
        );
        assert_eq!(
            heap.get(id).unwrap_err(),
            DispatchError::StaleHandle(id.index())
        );
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut heap = IndexedHeap::min();
        let old = heap.insert(1, "old");
        heap.extract_top().unwrap();
        let fresh = heap.insert(1, "fresh");

        assert_ne!(old, fresh);
        assert_eq!(
            heap.get(old).unwrap_err(),
            DispatchError::StaleHandle(old.index())
        );
        assert_eq!(heap.get(fresh).unwrap(), (&1, &"fresh"));
    }

    #[test]
    fn test_invariants_after_mixed_operations() {
        let mut heap = IndexedHeap::min();
        let mut ids = Vec::new();
        for key in [9, 4, 7, 1, 8, 2, 6, 3, 5] {
            ids.push(heap.insert(key, key));
            heap.check_invariants();
        }
        heap.update_key(ids[0], 0).unwrap();
        heap.check_invariants();
        heap.remove(ids[4]).unwrap();
        heap.check_invariants();
        heap.update_key(ids[3], 10).unwrap();
        heap.check_invariants();
        heap.extract_top().unwrap();
        heap.check_invariants();

        let mut popped = Vec::new();
        while let Ok((key, _)) = heap.extract_top() {
            heap.check_invariants();
            popped.push(key);
        }
        let mut sorted = popped.clone();
        sorted.sort_unstable();
        assert_eq!(popped, sorted);
    }
}
