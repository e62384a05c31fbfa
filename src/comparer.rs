//! Key comparers: the hashing and equality strategy a `Dictionary` is
//! parameterized by.
//!
//! A comparer decides which keys collide. `DefaultComparer` uses the key's
//! own `Hash + Eq`; `IdentityComparer` treats two pointer-like keys as the
//! same key only when they point at the same allocation. `Nullable` wraps
//! either one for `Option<T>` keys and reports `None` as the null key, which
//! the dictionary rejects on insertion.

use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;
use std::rc::Rc;
use std::sync::Arc;

/// Hashing and equality strategy for keys of type `Q`.
///
/// Implementations must be consistent: `equals(a, b)` implies
/// `hash(a) == hash(b)`. A dictionary caches each key's hash at insertion,
/// so `hash` is called once per inserted key and once per lookup.
pub trait KeyComparer<Q: ?Sized> {
    fn hash(&self, key: &Q) -> u64;

    fn equals(&self, a: &Q, b: &Q) -> bool;

    /// Whether `key` is the null key for this comparer. Null keys are
    /// rejected by inserting operations.
    #[inline]
    fn is_null(&self, _key: &Q) -> bool {
        false
    }
}

/// Value equality using the key's `Hash` and `Eq` implementations.
#[derive(Clone, Debug, Default)]
pub struct DefaultComparer<S = RandomState> {
    hasher: S,
}

impl<S> DefaultComparer<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }
}

impl<Q, S> KeyComparer<Q> for DefaultComparer<S>
where
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &Q) -> u64 {
        self.hasher.hash_one(key)
    }

    #[inline]
    fn equals(&self, a: &Q, b: &Q) -> bool {
        a == b
    }
}

/// Identity equality for pointer-like keys (`Rc<T>`, `Arc<T>`, `Box<T>` and
/// `&T`). Two keys are equal iff they point at the same address; value-equal
/// keys in distinct allocations are distinct keys.
///
/// Lookups must use the key type itself. A borrowed form such as `&String`
/// for an `Rc<String>` key points somewhere else, so it is not accepted:
///
/// ```compile_fail
/// use std::rc::Rc;
/// use versioned_dict::{Dictionary, IdentityComparer, IdentityDictionary};
///
/// let a = Rc::new("k".to_string());
/// let mut d: IdentityDictionary<Rc<String>, i32> =
///     Dictionary::with_comparer(IdentityComparer::default());
/// d.add(Rc::clone(&a), 1).unwrap();
/// let borrowed: &String = &a;
/// d.get(borrowed);
/// ```
///
/// Zero-sized targets behind `Box` or `&` share a dangling address and are
/// therefore all the same key.
#[derive(Clone, Debug, Default)]
pub struct IdentityComparer<S = RandomState> {
    hasher: S,
}

impl<S> IdentityComparer<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }
}

#[inline]
fn address_of<T: ?Sized>(target: &T) -> *const () {
    (target as *const T).cast::<()>()
}

macro_rules! identity_comparer_for {
    ($($ptr:ty),* $(,)?) => {$(
        impl<T, S> KeyComparer<$ptr> for IdentityComparer<S>
        where
            T: ?Sized,
            S: BuildHasher,
        {
            #[inline]
            fn hash(&self, key: &$ptr) -> u64 {
                self.hasher.hash_one(address_of::<T>(key) as usize)
            }

            #[inline]
            fn equals(&self, a: &$ptr, b: &$ptr) -> bool {
                core::ptr::eq(address_of::<T>(a), address_of::<T>(b))
            }
        }
    )*};
}

identity_comparer_for!(Rc<T>, Arc<T>, Box<T>);

impl<'a, T, S> KeyComparer<&'a T> for IdentityComparer<S>
where
    T: ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &&'a T) -> u64 {
        self.hasher.hash_one(address_of::<T>(*key) as usize)
    }

    #[inline]
    fn equals(&self, a: &&'a T, b: &&'a T) -> bool {
        core::ptr::eq(address_of::<T>(*a), address_of::<T>(*b))
    }
}

/// Adds a null key to an inner comparer: for `Option<T>` keys, `None` is
/// null and `Some(t)` compares with the inner comparer.
#[derive(Clone, Debug, Default)]
pub struct Nullable<C> {
    inner: C,
}

impl<C> Nullable<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<T, C> KeyComparer<Option<T>> for Nullable<C>
where
    C: KeyComparer<T>,
{
    #[inline]
    fn hash(&self, key: &Option<T>) -> u64 {
        match key {
            Some(t) => self.inner.hash(t),
            None => 0,
        }
    }

    #[inline]
    fn equals(&self, a: &Option<T>, b: &Option<T>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => self.inner.equals(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    #[inline]
    fn is_null(&self, key: &Option<T>) -> bool {
        key.is_none()
    }
}
