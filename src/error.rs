//! Error taxonomy for dictionary operations and enumerators.

use thiserror::Error;

/// Failure of a checked dictionary or enumerator operation. All variants are
/// programmer errors; `try_add`, `get` and `remove` are the non-failing
/// alternatives for the expected cases.
#[derive(Debug, Clone, Copy, Error, Eq, PartialEq)]
pub enum DictionaryError {
    /// A null key was passed to an inserting or checked-lookup operation.
    #[error("value cannot be null (parameter '{param}')")]
    NullKey { param: &'static str },

    /// `add` was called with a key that is already present.
    #[error("an item with the same key has already been added")]
    DuplicateKey,

    /// A checked lookup did not find the key.
    #[error("the given key was not present in the dictionary")]
    KeyNotFound,

    /// The dictionary was structurally modified after the enumerator was
    /// created.
    #[error("collection was modified; enumeration operation may not execute (expected version {expected}, found {found})")]
    EnumerationInvalidated { expected: u64, found: u64 },

    /// The enumerator was advanced against a dictionary other than the one
    /// that created it.
    #[error("enumerator does not belong to this dictionary")]
    WrongDictionary,
}

impl DictionaryError {
    pub(crate) const fn null_key() -> Self {
        DictionaryError::NullKey { param: "key" }
    }

    /// Logical parameter name for argument errors.
    pub fn param_name(&self) -> Option<&'static str> {
        match self {
            DictionaryError::NullKey { param } => Some(*param),
            _ => None,
        }
    }

    /// Whether this error reports use of an invalidated or foreign enumerator.
    pub fn is_invalid_enumeration(&self) -> bool {
        matches!(
            self,
            DictionaryError::EnumerationInvalidated { .. } | DictionaryError::WrongDictionary
        )
    }
}

pub type Result<T, E = DictionaryError> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: null-key errors always name the `key` parameter.
    #[test]
    fn null_key_names_parameter() {
        let e = DictionaryError::null_key();
        assert_eq!(e.param_name(), Some("key"));
        assert!(e.to_string().contains("'key'"));
        assert_eq!(DictionaryError::DuplicateKey.param_name(), None);
    }

    /// Invariant: only enumerator faults classify as invalid enumeration.
    #[test]
    fn invalid_enumeration_classification() {
        assert!(DictionaryError::EnumerationInvalidated { expected: 1, found: 2 }
            .is_invalid_enumeration());
        assert!(DictionaryError::WrongDictionary.is_invalid_enumeration());
        assert!(!DictionaryError::KeyNotFound.is_invalid_enumeration());
    }
}
