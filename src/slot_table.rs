//! SlotTable: structural layer with generational handles, a hash index and
//! a dense entry vector that fixes the enumeration order.

use crate::comparer::KeyComparer;
use core::borrow::Borrow;
use hashbrown::hash_table::Entry as TableEntry;
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};
use tracing::trace;

/// Stable, generational reference to one entry. A handle to a removed entry
/// never resolves again, even if its slot is reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    #[cfg(any(test, feature = "bench_internal"))]
    pub fn key<'a, K, V, C>(&self, table: &'a SlotTable<K, V, C>) -> Option<&'a K> {
        table.handle_key(*self)
    }

    pub fn value<'a, K, V, C>(&self, table: &'a SlotTable<K, V, C>) -> Option<&'a V> {
        table.handle_value(*self)
    }

    pub fn value_mut<'a, K, V, C>(&self, table: &'a mut SlotTable<K, V, C>) -> Option<&'a mut V> {
        table.handle_value_mut(*self)
    }
}

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
    slot: DefaultKey,
}

/// Hash index over generational slots. `index` maps a cached hash to a slot;
/// `slots` maps a slot to its position in `entries`; `entries` is dense and
/// its order is the enumeration order.
#[derive(Clone)]
pub struct SlotTable<K, V, C> {
    comparer: C,
    index: HashTable<DefaultKey>,
    slots: SlotMap<DefaultKey, usize>,
    entries: Vec<Entry<K, V>>,
}

#[derive(Debug, Eq, PartialEq)]
pub enum InsertError {
    DuplicateKey,
}

/// Iterator over entries in enumeration order.
pub struct Iter<'a, K, V> {
    it: core::slice::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (Handle, &'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|e| (Handle(e.slot), &e.key, &e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over entries with mutable values, in enumeration order.
pub struct IterMut<'a, K, V> {
    it: core::slice::IterMut<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (Handle, &'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|e| (Handle(e.slot), &e.key, &mut e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

/// Owning iterator over `(K, V)` in enumeration order.
pub struct IntoIter<K, V> {
    it: std::vec::IntoIter<Entry<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|e| (e.key, e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

/// Draining iterator; the table is already empty when this is returned.
pub struct Drain<'a, K, V> {
    it: std::vec::Drain<'a, Entry<K, V>>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|e| (e.key, e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}

impl<K, V, C> SlotTable<K, V, C> {
    pub fn with_capacity_and_comparer(capacity: usize, comparer: C) -> Self {
        Self {
            comparer,
            index: HashTable::with_capacity(capacity),
            slots: SlotMap::with_capacity_and_key(capacity),
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.index.capacity()
    }

    pub fn find<Q>(&self, q: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: KeyComparer<Q>,
    {
        let hash = <C as KeyComparer<Q>>::hash(&self.comparer, q);
        self.index
            .find(hash, |&s| {
                self.slots.get(s).map_or(false, |&pos| {
                    <C as KeyComparer<Q>>::equals(&self.comparer, self.entries[pos].key.borrow(), q)
                })
            })
            .map(|&s| Handle(s))
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: KeyComparer<Q>,
    {
        self.find(q).is_some()
    }

    /// Unlink and return the entry matching `q`.
    pub fn remove_key<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: KeyComparer<Q>,
    {
        let hash = <C as KeyComparer<Q>>::hash(&self.comparer, q);
        let (comparer, slots, entries) = (&self.comparer, &self.slots, &self.entries);
        let slot = match self.index.find_entry(hash, |&s| {
            slots.get(s).map_or(false, |&pos| {
                <C as KeyComparer<Q>>::equals(comparer, entries[pos].key.borrow(), q)
            })
        }) {
            Ok(occupied) => occupied.remove().0,
            Err(_) => return None,
        };
        self.detach(slot)
    }

    pub fn remove(&mut self, handle: Handle) -> Option<(K, V)> {
        let slot = handle.0;
        let &pos = self.slots.get(slot)?;
        let hash = self.entries[pos].hash;

        // Unlink from index via occupied entry removal
        match self.index.find_entry(hash, |&s| s == slot) {
            Ok(occupied) => {
                occupied.remove();
            }
            Err(_) => debug_assert!(false, "live slot missing from hash index"),
        }
        self.detach(slot)
    }

    // Drop `slot` from the slot map and the dense vector. The caller has
    // already unlinked it from the hash index.
    fn detach(&mut self, slot: DefaultKey) -> Option<(K, V)> {
        let pos = self.slots.remove(slot)?;
        let entry = self.entries.swap_remove(pos);
        debug_assert!(entry.slot == slot);
        // The former last entry now lives at `pos`.
        if let Some(moved) = self.entries.get(pos) {
            self.slots[moved.slot] = pos;
        }
        Some((entry.key, entry.value))
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.entries.clear();
    }

    pub fn drain(&mut self) -> Drain<'_, K, V> {
        self.index.clear();
        self.slots.clear();
        Drain {
            it: self.entries.drain(..),
        }
    }

    /// Remove every entry for which `keep` returns false. Returns the number
    /// of removed entries.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let doomed: Vec<DefaultKey> = self
            .entries
            .iter_mut()
            .filter_map(|e| (!keep(&e.key, &mut e.value)).then_some(e.slot))
            .collect();
        for &slot in &doomed {
            let removed = self.remove(Handle(slot));
            debug_assert!(removed.is_some(), "retain lost track of a doomed slot");
        }
        doomed.len()
    }

    pub fn reserve(&mut self, additional: usize) {
        let before = self.index.capacity();
        let (slots, entries) = (&self.slots, &self.entries);
        self.index
            .reserve(additional, |&s| entries[slots[s]].hash);
        self.slots.reserve(additional);
        self.entries.reserve(additional);
        self.note_capacity_change(before);
    }

    pub fn shrink_to_fit(&mut self) {
        let before = self.index.capacity();
        let (slots, entries) = (&self.slots, &self.entries);
        self.index.shrink_to_fit(|&s| entries[slots[s]].hash);
        self.entries.shrink_to_fit();
        self.note_capacity_change(before);
    }

    fn note_capacity_change(&self, before: usize) {
        let after = self.index.capacity();
        if after != before {
            trace!(before, after, len = self.entries.len(), "slot table resized");
        }
    }

    #[cfg(any(test, feature = "bench_internal"))]
    pub(crate) fn handle_key(&self, h: Handle) -> Option<&K> {
        self.slots.get(h.0).map(|&pos| &self.entries[pos].key)
    }

    pub(crate) fn handle_value(&self, h: Handle) -> Option<&V> {
        self.slots.get(h.0).map(|&pos| &self.entries[pos].value)
    }

    pub(crate) fn handle_entry(&self, h: Handle) -> Option<(&K, &V)> {
        self.slots.get(h.0).map(|&pos| {
            let e = &self.entries[pos];
            (&e.key, &e.value)
        })
    }

    pub(crate) fn handle_value_mut(&mut self, h: Handle) -> Option<&mut V> {
        let &pos = self.slots.get(h.0)?;
        Some(&mut self.entries[pos].value)
    }

    /// Handle of the entry at enumeration position `pos`.
    pub(crate) fn handle_at(&self, pos: usize) -> Option<Handle> {
        self.entries.get(pos).map(|e| Handle(e.slot))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.entries.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.entries.iter_mut(),
        }
    }

    pub fn into_entries(self) -> IntoIter<K, V> {
        IntoIter {
            it: self.entries.into_iter(),
        }
    }
}

impl<K, V, C> SlotTable<K, V, C>
where
    C: KeyComparer<K>,
{
    pub fn insert(&mut self, key: K, value: V) -> Result<Handle, InsertError> {
        let before = self.index.capacity();
        let hash = self.comparer.hash(&key);
        let (comparer, slots, entries) = (&self.comparer, &self.slots, &self.entries);
        let vacant = match self.index.entry(
            hash,
            |&s| {
                slots
                    .get(s)
                    .map_or(false, |&pos| comparer.equals(&entries[pos].key, &key))
            },
            |&s| entries[slots[s]].hash,
        ) {
            TableEntry::Occupied(_) => return Err(InsertError::DuplicateKey),
            TableEntry::Vacant(v) => v,
        };
        let pos = self.entries.len();
        let slot = self.slots.insert(pos);
        let _ = vacant.insert(slot);
        self.entries.push(Entry {
            key,
            value,
            hash,
            slot,
        });
        self.note_capacity_change(before);
        Ok(Handle(slot))
    }

    /// Insert `key`, or overwrite the value of an equal key already present.
    /// The stored key is kept on overwrite. Returns the previous value.
    pub fn upsert(&mut self, key: K, value: V) -> (Handle, Option<V>) {
        let before = self.index.capacity();
        let hash = self.comparer.hash(&key);
        let (comparer, slots, entries) = (&self.comparer, &self.slots, &self.entries);
        let vacant = match self.index.entry(
            hash,
            |&s| {
                slots
                    .get(s)
                    .map_or(false, |&pos| comparer.equals(&entries[pos].key, &key))
            },
            |&s| entries[slots[s]].hash,
        ) {
            TableEntry::Occupied(o) => {
                let slot = *o.get();
                let pos = self.slots[slot];
                let old = core::mem::replace(&mut self.entries[pos].value, value);
                return (Handle(slot), Some(old));
            }
            TableEntry::Vacant(v) => v,
        };
        let pos = self.entries.len();
        let slot = self.slots.insert(pos);
        let _ = vacant.insert(slot);
        self.entries.push(Entry {
            key,
            value,
            hash,
            slot,
        });
        self.note_capacity_change(before);
        (Handle(slot), None)
    }
}
