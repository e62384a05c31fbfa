//! Key and value views: borrowed projections of a dictionary's live
//! contents with no storage of their own.

use crate::comparer::KeyComparer;
use crate::dictionary::Dictionary;
use crate::enumerator::{Enumerator, KeyEnumerator, ValueEnumerator};
use crate::slot_table;
use core::borrow::Borrow;
use core::fmt;

/// View of a dictionary's keys.
pub struct Keys<'a, K, V, C> {
    dict: &'a Dictionary<K, V, C>,
}

/// View of a dictionary's values.
pub struct Values<'a, K, V, C> {
    dict: &'a Dictionary<K, V, C>,
}

impl<'a, K, V, C> Keys<'a, K, V, C> {
    pub(crate) fn new(dict: &'a Dictionary<K, V, C>) -> Self {
        Self { dict }
    }

    pub fn dictionary(&self) -> &'a Dictionary<K, V, C> {
        self.dict
    }

    pub fn len(&self) -> usize {
        self.dict.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dict.is_empty()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: KeyComparer<Q>,
    {
        self.dict.contains_key(key)
    }

    pub fn iter(&self) -> KeysIter<'a, K, V> {
        KeysIter {
            inner: self.dict.table().iter(),
        }
    }

    /// Detached key cursor; see `Enumerator`.
    pub fn enumerator(&self) -> KeyEnumerator<K, V> {
        Enumerator::new(self.dict)
    }

    /// Keys in enumeration order.
    pub fn to_vec(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<'a, K, V, C> Values<'a, K, V, C> {
    pub(crate) fn new(dict: &'a Dictionary<K, V, C>) -> Self {
        Self { dict }
    }

    pub fn dictionary(&self) -> &'a Dictionary<K, V, C> {
        self.dict
    }

    pub fn len(&self) -> usize {
        self.dict.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dict.is_empty()
    }

    /// Linear scan.
    pub fn contains(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    pub fn iter(&self) -> ValuesIter<'a, K, V> {
        ValuesIter {
            inner: self.dict.table().iter(),
        }
    }

    /// Detached value cursor; see `Enumerator`.
    pub fn enumerator(&self) -> ValueEnumerator<K, V> {
        Enumerator::new(self.dict)
    }

    /// Values in enumeration order.
    pub fn to_vec(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<K, V, C> Clone for Keys<'_, K, V, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, C> Copy for Keys<'_, K, V, C> {}

impl<K, V, C> Clone for Values<'_, K, V, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, C> Copy for Values<'_, K, V, C> {}

impl<K: fmt::Debug, V, C> fmt::Debug for Keys<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K, V: fmt::Debug, C> fmt::Debug for Values<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, K, V, C> IntoIterator for Keys<'a, K, V, C> {
    type Item = &'a K;
    type IntoIter = KeysIter<'a, K, V>;

    fn into_iter(self) -> KeysIter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &Keys<'a, K, V, C> {
    type Item = &'a K;
    type IntoIter = KeysIter<'a, K, V>;

    fn into_iter(self) -> KeysIter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for Values<'a, K, V, C> {
    type Item = &'a V;
    type IntoIter = ValuesIter<'a, K, V>;

    fn into_iter(self) -> ValuesIter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &Values<'a, K, V, C> {
    type Item = &'a V;
    type IntoIter = ValuesIter<'a, K, V>;

    fn into_iter(self) -> ValuesIter<'a, K, V> {
        self.iter()
    }
}

/// Borrowing iterator over keys in enumeration order.
pub struct KeysIter<'a, K, V> {
    inner: slot_table::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for KeysIter<'a, K, V> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(_h, k, _v)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for KeysIter<'_, K, V> {}

/// Borrowing iterator over values in enumeration order.
pub struct ValuesIter<'a, K, V> {
    inner: slot_table::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesIter<'a, K, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_h, _k, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesIter<'_, K, V> {}
