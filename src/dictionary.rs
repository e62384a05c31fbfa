//! Dictionary: public map API over `SlotTable` with a structural version
//! counter.

use crate::comparer::{DefaultComparer, IdentityComparer, KeyComparer};
use crate::enumerator::{Enumerator, PairEnumerator};
use crate::error::{DictionaryError, Result};
use crate::slot_table::{self, InsertError, SlotTable};
use crate::views::{Keys, Values};
use core::borrow::Borrow;
use core::fmt;
use core::ops::Index;
use std::sync::atomic::{AtomicU64, Ordering};

pub use crate::slot_table::{Drain, IntoIter};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a dictionary instance. Enumerators remember
/// the id of the dictionary that created them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DictionaryId(u64);

impl DictionaryId {
    fn next() -> Self {
        DictionaryId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Hash dictionary with unique keys, a pluggable key comparer and a version
/// counter that changes on every structural mutation.
///
/// Enumeration order is unspecified but stable between mutations, and is the
/// same for `iter`, `keys`, `values` and every enumerator.
pub struct Dictionary<K, V, C = DefaultComparer> {
    table: SlotTable<K, V, C>,
    version: u64,
    id: DictionaryId,
}

/// Dictionary whose keys compare by allocation identity.
pub type IdentityDictionary<K, V> = Dictionary<K, V, IdentityComparer>;

impl<K, V> Dictionary<K, V> {
    pub fn new() -> Self {
        Self::with_comparer(DefaultComparer::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparer(capacity, DefaultComparer::default())
    }
}

impl<K, V, C> Dictionary<K, V, C> {
    pub fn with_comparer(comparer: C) -> Self {
        Self::with_capacity_and_comparer(0, comparer)
    }

    pub fn with_capacity_and_comparer(capacity: usize, comparer: C) -> Self {
        Self {
            table: SlotTable::with_capacity_and_comparer(capacity, comparer),
            version: 0,
            id: DictionaryId::next(),
        }
    }

    pub(crate) fn table(&self) -> &SlotTable<K, V, C> {
        &self.table
    }

    #[inline]
    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Structural version. Reads never change it.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn id(&self) -> DictionaryId {
        self.id
    }

    pub fn comparer(&self) -> &C {
        self.table.comparer()
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Make room for at least `additional` more entries. Capacity changes are
    /// not structural and leave the version alone.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Ensure capacity for `capacity` entries in total; returns the new capacity.
    pub fn ensure_capacity(&mut self, capacity: usize) -> usize {
        if capacity > self.capacity() {
            self.table.reserve(capacity - self.len());
        }
        self.capacity()
    }

    pub fn shrink_to_fit(&mut self) {
        self.table.shrink_to_fit();
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: KeyComparer<Q>,
    {
        self.table.find(key).and_then(|h| h.value(&self.table))
    }

    /// Same as `get`; a null key is simply absent.
    pub fn try_get_value<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: KeyComparer<Q>,
    {
        self.get(key)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: KeyComparer<Q>,
    {
        self.table
            .find(key)
            .and_then(|h| self.table.handle_entry(h))
    }

    /// Checked lookup: fails with `NullKey` for a null key and `KeyNotFound`
    /// when the key is absent.
    pub fn lookup<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: KeyComparer<Q>,
    {
        if <C as KeyComparer<Q>>::is_null(self.table.comparer(), key) {
            return Err(DictionaryError::null_key());
        }
        self.get(key).ok_or(DictionaryError::KeyNotFound)
    }

    /// Mutable access to a value. Changing a value in place is not a
    /// structural mutation and does not invalidate enumerators.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: KeyComparer<Q>,
    {
        let h = self.table.find(key)?;
        h.value_mut(&mut self.table)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: KeyComparer<Q>,
    {
        self.table.contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().contains(value)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: KeyComparer<Q>,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: KeyComparer<Q>,
    {
        let removed = self.table.remove_key(key)?;
        self.bump();
        Some(removed)
    }

    pub fn clear(&mut self) {
        if !self.table.is_empty() {
            self.table.clear();
            self.bump();
        }
    }

    /// Remove all entries, yielding them in enumeration order.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        if !self.table.is_empty() {
            self.bump();
        }
        self.table.drain()
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        if self.table.retain(keep) > 0 {
            self.bump();
        }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.table.iter_mut(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V, C> {
        Keys::new(self)
    }

    pub fn values(&self) -> Values<'_, K, V, C> {
        Values::new(self)
    }

    /// Detached cursor over `(key, value)` pairs bound to the current version.
    pub fn enumerator(&self) -> PairEnumerator<K, V> {
        Enumerator::new(self)
    }
}

impl<K, V, C> Dictionary<K, V, C>
where
    C: KeyComparer<K>,
{
    /// Build a dictionary from `pairs`, failing on a null or repeated key.
    pub fn try_from_pairs<I>(pairs: I, comparer: C) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs = pairs.into_iter();
        let mut dict = Self::with_capacity_and_comparer(pairs.size_hint().0, comparer);
        for (key, value) in pairs {
            dict.add(key, value)?;
        }
        Ok(dict)
    }

    /// Insert `key` if absent. Returns `Ok(false)` without touching the
    /// dictionary when an equal key is already present.
    pub fn try_add(&mut self, key: K, value: V) -> Result<bool> {
        if self.table.comparer().is_null(&key) {
            return Err(DictionaryError::null_key());
        }
        match self.table.insert(key, value) {
            Ok(_) => {
                self.bump();
                Ok(true)
            }
            Err(InsertError::DuplicateKey) => Ok(false),
        }
    }

    /// Insert `key`, failing with `DuplicateKey` when it is already present.
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        if self.try_add(key, value)? {
            Ok(())
        } else {
            Err(DictionaryError::DuplicateKey)
        }
    }

    /// Insert or overwrite. Always a structural mutation, even when only the
    /// value of an existing key changes. Returns the previous value.
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>> {
        if self.table.comparer().is_null(&key) {
            return Err(DictionaryError::null_key());
        }
        let (_, previous) = self.table.upsert(key, value);
        self.bump();
        Ok(previous)
    }
}

impl<K, V> Default for Dictionary<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// The clone is independent of the source: it has its own id and starts at
/// version 0, so enumerators of the source never validate against it.
impl<K, V, C> Clone for Dictionary<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            version: 0,
            id: DictionaryId::next(),
        }
    }
}

impl<K, V, C> fmt::Debug for Dictionary<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Order-independent content equality; each key of `self` is probed in
/// `other` with `other`'s comparer.
impl<K, V, C> PartialEq for Dictionary<K, V, C>
where
    V: PartialEq,
    C: KeyComparer<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, C> Eq for Dictionary<K, V, C>
where
    V: Eq,
    C: KeyComparer<K>,
{
}

/// # Panics
///
/// Panics if the key is absent; use `lookup` for a checked read.
impl<K, V, C, Q> Index<&Q> for Dictionary<K, V, C>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: KeyComparer<Q>,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("{}", DictionaryError::KeyNotFound),
        }
    }
}

/// Uses `set` semantics: later pairs overwrite earlier ones.
///
/// # Panics
///
/// Panics on a null key.
impl<K, V, C> Extend<(K, V)> for Dictionary<K, V, C>
where
    C: KeyComparer<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (key, value) in iter {
            if let Err(e) = self.set(key, value) {
                panic!("{e}");
            }
        }
    }
}

impl<K, V, C> FromIterator<(K, V)> for Dictionary<K, V, C>
where
    C: KeyComparer<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::with_comparer(C::default());
        dict.extend(iter);
        dict
    }
}

impl<K, V, C> IntoIterator for Dictionary<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        self.table.into_entries()
    }
}

impl<'a, K, V, C> IntoIterator for &'a Dictionary<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut Dictionary<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

/// Borrowing iterator over `(key, value)` pairs in enumeration order.
pub struct Iter<'a, K, V> {
    inner: slot_table::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_h, k, v)| (k, v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over pairs with mutable values.
pub struct IterMut<'a, K, V> {
    inner: slot_table::IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_h, k, v)| (k, v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

pub struct ValuesMut<'a, K, V> {
    inner: slot_table::IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_h, _k, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
