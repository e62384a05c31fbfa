//! versioned-dict: a single-threaded hash dictionary whose enumerators are
//! invalidated by structural mutation.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a unique-key associative container with pluggable key equality
//!   and a fail-fast enumeration contract, built in small layers.
//! - Layers:
//!   - SlotTable<K, V, C>: structural map. A `hashbrown::HashTable` indexes
//!     generational `slotmap` keys by cached hash; the slot map resolves a
//!     slot to a position in a dense entry vector; the dense vector is the
//!     enumeration order.
//!   - Dictionary<K, V, C>: public API. Adds the structural version counter,
//!     a process-unique id, null-key checks and the checked operations
//!     (`add`, `set`, `lookup`).
//!   - Keys / Values: borrowed views over a dictionary.
//!   - Enumerator<K, V, M>: detached cursor validated against the owner id
//!     and version on every `advance`.
//!
//! Versioning
//! - `version` increments on every successful insert, every `set` (insert
//!   or overwrite), every removal, and on `clear`/`drain`/`retain` when they
//!   remove something. Reads, in-place value mutation and capacity changes
//!   leave it alone.
//! - Enumerators snapshot `(id, version)` at creation. `advance` fails with
//!   `EnumerationInvalidated` once the live version differs and with
//!   `WrongDictionary` when handed another instance.
//! - Borrowing iterators (`iter`, `keys().iter()`, ...) need no check: the
//!   borrow checker already forbids mutation while they are alive.
//!
//! Key equality
//! - `KeyComparer` supplies hash and equality. `DefaultComparer` uses
//!   `Hash + Eq`; `IdentityComparer` compares pointer-like keys by address;
//!   `Nullable<C>` gives `Option<T>` keys a null key (`None`) that inserting
//!   operations reject with `NullKey { param: "key" }`.
//! - Each entry stores its hash; the comparer is never asked to rehash.
//!
//! Order
//! - Unspecified, but identical across `iter`, `keys`, `values` and all
//!   enumerators between mutations. Removal swap-removes, so it moves the
//!   last entry into the hole.
//!
//! Notes and non-goals
//! - Single-threaded; no internal locking.
//! - Not an insertion-ordered map.

mod comparer;
mod dictionary;
mod enumerator;
mod error;
#[cfg(feature = "bench_internal")]
pub mod slot_table;
#[cfg(not(feature = "bench_internal"))]
mod slot_table;
#[cfg(test)]
mod slot_table_proptest;
mod views;

// Public surface
pub use comparer::{DefaultComparer, IdentityComparer, KeyComparer, Nullable};
pub use dictionary::{
    Dictionary, DictionaryId, Drain, IdentityDictionary, IntoIter, Iter, IterMut, ValuesMut,
};
pub use enumerator::{
    Enumerator, KeyEnumerator, KeysOnly, PairEnumerator, Pairs, Projection, ValueEnumerator,
    ValuesOnly,
};
pub use error::{DictionaryError, Result};
pub use views::{Keys, KeysIter, Values, ValuesIter};
