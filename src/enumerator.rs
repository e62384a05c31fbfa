//! Detached, version-checked enumerators.
//!
//! An `Enumerator` does not borrow its dictionary. It remembers the owner's
//! id and the version at creation, and is driven by handing the dictionary
//! back to `advance`/`current`. This lets callers mutate the dictionary while
//! an enumerator is alive; the next `advance` then fails instead of reading
//! a structure that changed underneath it.
//!
//! The cursor position is an index into the dictionary's dense entry order,
//! so pair, key and value enumerators visit entries in exactly the order of
//! `Dictionary::iter`.

use crate::dictionary::{Dictionary, DictionaryId};
use crate::error::{DictionaryError, Result};
use crate::slot_table::Handle;
use core::fmt;
use core::marker::PhantomData;
use tracing::debug;

/// Selects what an enumerator yields for each entry.
pub trait Projection {
    type Item<'a, K: 'a, V: 'a>;

    fn project<'a, K: 'a, V: 'a>(key: &'a K, value: &'a V) -> Self::Item<'a, K, V>;
}

/// Yields `(&K, &V)`.
#[derive(Debug)]
pub enum Pairs {}

/// Yields `&K`.
#[derive(Debug)]
pub enum KeysOnly {}

/// Yields `&V`.
#[derive(Debug)]
pub enum ValuesOnly {}

impl Projection for Pairs {
    type Item<'a, K: 'a, V: 'a> = (&'a K, &'a V);

    #[inline]
    fn project<'a, K: 'a, V: 'a>(key: &'a K, value: &'a V) -> Self::Item<'a, K, V> {
        (key, value)
    }
}

impl Projection for KeysOnly {
    type Item<'a, K: 'a, V: 'a> = &'a K;

    #[inline]
    fn project<'a, K: 'a, V: 'a>(key: &'a K, _value: &'a V) -> Self::Item<'a, K, V> {
        key
    }
}

impl Projection for ValuesOnly {
    type Item<'a, K: 'a, V: 'a> = &'a V;

    #[inline]
    fn project<'a, K: 'a, V: 'a>(_key: &'a K, value: &'a V) -> Self::Item<'a, K, V> {
        value
    }
}

pub type PairEnumerator<K, V> = Enumerator<K, V, Pairs>;
pub type KeyEnumerator<K, V> = Enumerator<K, V, KeysOnly>;
pub type ValueEnumerator<K, V> = Enumerator<K, V, ValuesOnly>;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Position {
    BeforeFirst,
    At { pos: usize, handle: Handle },
    AfterLast,
}

/// Forward-only cursor over a dictionary's entries, invalidated by any
/// structural mutation of that dictionary.
pub struct Enumerator<K, V, M> {
    owner: DictionaryId,
    version: u64,
    position: Position,
    disposed: bool,
    _pd: PhantomData<fn() -> (K, V, M)>,
}

impl<K, V, M> Enumerator<K, V, M>
where
    M: Projection,
{
    pub(crate) fn new<C>(dict: &Dictionary<K, V, C>) -> Self {
        Self {
            owner: dict.id(),
            version: dict.version(),
            position: Position::BeforeFirst,
            disposed: false,
            _pd: PhantomData,
        }
    }

    /// Version snapshot taken when the enumerator was created or reset.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn owner(&self) -> DictionaryId {
        self.owner
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn validate<C>(&self, dict: &Dictionary<K, V, C>) -> Result<()> {
        if dict.id() != self.owner {
            debug!(owner = ?self.owner, presented = ?dict.id(), "enumerator used with foreign dictionary");
            return Err(DictionaryError::WrongDictionary);
        }
        if dict.version() != self.version {
            debug!(
                expected = self.version,
                found = dict.version(),
                "enumerator invalidated by mutation"
            );
            return Err(DictionaryError::EnumerationInvalidated {
                expected: self.version,
                found: dict.version(),
            });
        }
        Ok(())
    }

    /// Step to the next entry. Returns `Ok(false)` once the end is reached.
    /// Fails on every call once `dict` has been structurally mutated since
    /// this enumerator was created, including after exhaustion.
    pub fn advance<C>(&mut self, dict: &Dictionary<K, V, C>) -> Result<bool> {
        self.validate(dict)?;
        let next = match self.position {
            Position::BeforeFirst => 0,
            Position::At { pos, .. } => pos + 1,
            Position::AfterLast => return Ok(false),
        };
        match dict.table().handle_at(next) {
            Some(handle) => {
                self.position = Position::At { pos: next, handle };
                Ok(true)
            }
            None => {
                self.position = Position::AfterLast;
                Ok(false)
            }
        }
    }

    /// The entry under the cursor. `None` before the first `advance`, after
    /// the last, after `dispose`, for a foreign dictionary, or when the entry
    /// has since been removed. Never fails.
    pub fn current<'a, C>(&self, dict: &'a Dictionary<K, V, C>) -> Option<M::Item<'a, K, V>> {
        if dict.id() != self.owner {
            return None;
        }
        match self.position {
            Position::At { handle, .. } => dict
                .table()
                .handle_entry(handle)
                .map(|(k, v)| M::project(k, v)),
            Position::BeforeFirst | Position::AfterLast => None,
        }
    }

    /// Rewind to before the first entry. Fails like `advance` if the
    /// dictionary changed; a stale enumerator cannot be revived.
    pub fn reset<C>(&mut self, dict: &Dictionary<K, V, C>) -> Result<()> {
        self.validate(dict)?;
        self.position = Position::BeforeFirst;
        self.disposed = false;
        Ok(())
    }

    /// Release the cursor. Idempotent.
    pub fn dispose(&mut self) {
        self.position = Position::AfterLast;
        self.disposed = true;
    }
}

impl<K, V, M> Clone for Enumerator<K, V, M> {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner,
            version: self.version,
            position: self.position,
            disposed: self.disposed,
            _pd: PhantomData,
        }
    }
}

impl<K, V, M> fmt::Debug for Enumerator<K, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enumerator")
            .field("owner", &self.owner)
            .field("version", &self.version)
            .field("position", &self.position)
            .field("disposed", &self.disposed)
            .finish()
    }
}
