//! NUL-free strings for keys and regular expressions.
//!
//! Keys and regex parts are written as raw bytes followed by a single NUL,
//! with no length prefix, so an embedded NUL would silently truncate them for
//! every reader. [`CString`] rejects such strings when it is built, which is
//! what lets the encoder stay infallible.

use crate::{Error, Result};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// An owned UTF-8 string guaranteed to contain no NUL byte.
///
/// # Examples
///
/// ```rust
/// use bison::CString;
///
/// let key = CString::new("name").unwrap();
/// assert_eq!(key.as_str(), "name");
/// assert!(CString::new("na\0me").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CString(String);

impl CString {
    /// Validates `value` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InteriorNul`] with the offset of the first NUL byte.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        match value.bytes().position(|b| b == 0x00) {
            Some(position) => Err(Error::interior_nul(&value, position)),
            None => Ok(CString(value)),
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bytes written to the wire, without the terminator.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for CString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets `IndexMap<CString, _>` be queried with a plain `&str`.
impl Borrow<str> for CString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for CString {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        CString::new(value)
    }
}

impl TryFrom<String> for CString {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        CString::new(value)
    }
}

impl From<CString> for String {
    fn from(value: CString) -> Self {
        value.0
    }
}

impl PartialEq<str> for CString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Debug for CString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for CString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl serde::Serialize for CString {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_rejects_interior_nul() {
        let err = CString::new("ab\0c").unwrap_err();
        assert_eq!(err, Error::interior_nul("ab\0c", 2));
        assert!(CString::try_from(String::from("\0")).is_err());
    }

    #[test]
    fn test_accepts_empty_and_unicode() {
        assert_eq!(CString::new("").unwrap().as_str(), "");
        let key = CString::try_from("clé").unwrap();
        assert_eq!(key.as_bytes(), "clé".as_bytes());
        assert_eq!(key, "clé");
    }

    #[test]
    fn test_borrow_hash_matches_str() {
        let key = CString::new("field").unwrap();
        assert_eq!(hash_of(&key), hash_of("field"));
    }
}
