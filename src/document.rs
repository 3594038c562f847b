//! Ordered, key-unique documents with copy-on-write storage.
//!
//! A [`Document`] is a handle to shared storage. Cloning a document copies
//! the handle, not the elements; the first write through either copy detaches
//! it by cloning the storage, after which the copies evolve independently.
//!
//! ## Examples
//!
//! ```rust
//! use bison::{Document, Value};
//!
//! let mut original = Document::new();
//! original.insert("name", "Alice").unwrap();
//!
//! let mut copy = original.clone();
//! assert!(copy.shares_storage_with(&original));
//!
//! copy.insert("name", "Bob").unwrap();
//! assert!(!copy.shares_storage_with(&original));
//! assert_eq!(original.get_str("name"), Some("Alice"));
//! assert_eq!(copy.get_str("name"), Some("Bob"));
//! ```

use crate::storage::Storage;
use crate::{
    Binary, CString, Decimal128, Element, Encoder, JavaScriptWithScope, ObjectId, Regex, Result,
    Timestamp, UtcDateTime, Value,
};
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;
use std::sync::Arc;
use tracing::trace;

/// An ordered collection of elements with unique keys.
///
/// Insertion order is significant: it decides the encoded bytes, and two
/// documents are equal only when they hold equal elements in the same order.
#[derive(Clone, Default)]
pub struct Document {
    storage: Arc<Storage>,
}

macro_rules! typed_getter {
    ($(#[$meta:meta])* $name:ident, $accessor:ident, $ret:ty) => {
        $(#[$meta])*
        #[must_use]
        pub fn $name(&self, key: &str) -> Option<$ret> {
            self.get(key).and_then(Value::$accessor)
        }
    };
}

impl Document {
    /// Creates an empty document.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bison::Document;
    ///
    /// let doc = Document::new();
    /// assert!(doc.is_empty());
    /// assert_eq!(doc.to_bytes(), vec![5, 0, 0, 0, 0]);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Document {
            storage: Arc::new(Storage::new()),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Document {
            storage: Arc::new(Storage::with_capacity(capacity)),
        }
    }

    /// Builds a document from elements in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`](crate::Error::DuplicateKey) if two
    /// elements share a key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bison::{Document, Element};
    ///
    /// let doc = Document::from_elements(vec![
    ///     Element::try_new("a", 1i32).unwrap(),
    ///     Element::try_new("b", 2i32).unwrap(),
    /// ])
    /// .unwrap();
    /// assert_eq!(doc.position("b"), Some(1));
    ///
    /// let dup = Document::from_elements(vec![
    ///     Element::try_new("a", 1i32).unwrap(),
    ///     Element::try_new("a", 2i32).unwrap(),
    /// ]);
    /// assert!(dup.is_err());
    /// ```
    pub fn from_elements<I>(elements: I) -> Result<Self>
    where
        I: IntoIterator<Item = Element>,
    {
        let elements = elements.into_iter();
        let mut storage = Storage::with_capacity(elements.size_hint().0);
        for element in elements {
            storage.append(element)?;
        }
        Ok(Document {
            storage: Arc::new(storage),
        })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.storage.get(key)
    }

    /// Returns a mutable reference to the value under `key`.
    ///
    /// Detaches this document from any copies first, even when the key turns
    /// out to be missing.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.storage_mut().get_mut(key)
    }

    /// The element at `position`, or `None` past the end.
    #[must_use]
    pub fn get_index(&self, position: usize) -> Option<(&CString, &Value)> {
        self.storage.get_index(position)
    }

    /// The element at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.len()`.
    #[must_use]
    pub fn at(&self, position: usize) -> (&CString, &Value) {
        match self.storage.get_index(position) {
            Some(element) => element,
            None => panic!(
                "position {} out of range for document of length {}",
                position,
                self.len()
            ),
        }
    }

    /// The position of `key` in insertion order.
    #[must_use]
    pub fn position(&self, key: &str) -> Option<usize> {
        self.storage.get_index_of(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.storage.contains_key(key)
    }

    /// Inserts `value` under `key`.
    ///
    /// An existing key keeps its position and gets the new value; the old
    /// value is returned. A new key is appended at the end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InteriorNul`](crate::Error::InteriorNul) if `key`
    /// contains a NUL byte. The document is left untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bison::{Document, Value};
    ///
    /// let mut doc = Document::new();
    /// doc.insert("a", 1i32).unwrap();
    /// doc.insert("b", 2i32).unwrap();
    /// let old = doc.insert("a", 3i32).unwrap();
    ///
    /// assert_eq!(old, Some(Value::Int32(1)));
    /// assert_eq!(doc.position("a"), Some(0));
    /// assert_eq!(doc.get_i32("a"), Some(3));
    /// ```
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        let key = CString::new(key)?;
        Ok(self.storage_mut().insert(key, value.into()))
    }

    /// Inserts an element whose key is already validated. Same replacement
    /// rules as [`Document::insert`].
    pub fn insert_element(&mut self, element: Element) -> Option<Value> {
        let (key, value) = element.into_parts();
        self.storage_mut().insert(key, value)
    }

    /// Appends an element without replacement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`](crate::Error::DuplicateKey) if the key
    /// is already present. The document is left untouched.
    pub fn append(&mut self, element: Element) -> Result<()> {
        if self.contains_key(element.key()) {
            return Err(crate::Error::duplicate_key(element.key()));
        }
        self.storage_mut().append(element)
    }

    /// Removes `key`, keeping the remaining elements in order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        if !self.contains_key(key) {
            return None;
        }
        self.storage_mut().shift_remove(key)
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, CString, Value> {
        self.storage.iter()
    }

    /// A snapshot of the keys, taken without copying the elements.
    ///
    /// The view keeps reading the state the document had when it was created,
    /// even if the document is mutated afterwards.
    #[must_use]
    pub fn keys(&self) -> Keys {
        Keys {
            storage: Arc::clone(&self.storage),
        }
    }

    /// A snapshot of the values; see [`Document::keys`].
    #[must_use]
    pub fn values(&self) -> Values {
        Values {
            storage: Arc::clone(&self.storage),
        }
    }

    /// Whether both documents currently read from the same storage.
    #[must_use]
    pub fn shares_storage_with(&self, other: &Document) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }

    /// Encodes the document to its canonical bytes.
    ///
    /// # Panics
    ///
    /// Panics if any length in the encoding exceeds `i32::MAX` bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut encoder = Encoder::new();
        encoder.encode_document(self);
        encoder.finish()
    }

    typed_getter!(get_f64, as_f64, f64);
    typed_getter!(get_str, as_str, &str);
    typed_getter!(get_document, as_document, &Document);
    typed_getter!(get_array, as_array, &[Value]);
    typed_getter!(get_binary, as_binary, &Binary);
    typed_getter!(get_object_id, as_object_id, ObjectId);
    typed_getter!(get_bool, as_bool, bool);
    typed_getter!(get_datetime, as_datetime, UtcDateTime);
    typed_getter!(get_regex, as_regex, &Regex);
    typed_getter!(get_javascript, as_javascript, &str);
    typed_getter!(get_javascript_with_scope, as_javascript_with_scope, &JavaScriptWithScope);
    typed_getter!(
        /// The `Int32` under `key`.
        ///
        /// Like every typed getter, returns `None` both when the key is missing
        /// and when it holds another kind of value; use [`Document::get`] to
        /// tell the two apart.
        get_i32,
        as_i32,
        i32
    );
    typed_getter!(get_timestamp, as_timestamp, Timestamp);
    typed_getter!(get_i64, as_i64, i64);
    typed_getter!(get_decimal128, as_decimal128, Decimal128);

    /// `true` only if `key` is present and holds `Null`.
    #[must_use]
    pub fn is_null(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::Null))
    }

    fn storage_mut(&mut self) -> &mut Storage {
        if Arc::get_mut(&mut self.storage).is_none() {
            trace!(
                elements = self.storage.len(),
                "cloning shared document storage before write"
            );
        }
        Arc::make_mut(&mut self.storage)
    }
}

// Compares element by element with `f64` semantics, so a document holding a
// NaN is unequal even to a copy that shares its storage.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

impl TryFrom<Vec<Element>> for Document {
    type Error = crate::Error;

    fn try_from(elements: Vec<Element>) -> Result<Self> {
        Document::from_elements(elements)
    }
}

impl Extend<Element> for Document {
    /// Inserts every element with [`Document::insert_element`] semantics.
    fn extend<T: IntoIterator<Item = Element>>(&mut self, iter: T) {
        for element in iter {
            self.insert_element(element);
        }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a CString, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, CString, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Document {
    type Item = Element;
    type IntoIter = IntoElements;

    /// Yields owned elements, copying the storage only if it is shared.
    fn into_iter(self) -> Self::IntoIter {
        let storage = Arc::try_unwrap(self.storage).unwrap_or_else(|shared| (*shared).clone());
        IntoElements {
            inner: storage.into_iter(),
        }
    }
}

/// Owning iterator over the elements of a document.
#[derive(Debug)]
pub struct IntoElements {
    inner: indexmap::map::IntoIter<CString, Value>,
}

impl Iterator for IntoElements {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        self.inner.next().map(Element::from)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for IntoElements {
    fn next_back(&mut self) -> Option<Element> {
        self.inner.next_back().map(Element::from)
    }
}

impl ExactSizeIterator for IntoElements {}

/// Snapshot of a document's keys, in insertion order.
#[derive(Clone)]
pub struct Keys {
    storage: Arc<Storage>,
}

impl Keys {
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&CString> {
        self.storage.get_index(position).map(|(key, _)| key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.storage.contains_key(key)
    }

    pub fn iter(&self) -> indexmap::map::Keys<'_, CString, Value> {
        self.storage.keys()
    }
}

impl Index<usize> for Keys {
    type Output = CString;

    fn index(&self, position: usize) -> &CString {
        match self.get(position) {
            Some(key) => key,
            None => panic!("key position {} out of range for {} keys", position, self.len()),
        }
    }
}

impl<'a> IntoIterator for &'a Keys {
    type Item = &'a CString;
    type IntoIter = indexmap::map::Keys<'a, CString, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Snapshot of a document's values, in insertion order.
#[derive(Clone)]
pub struct Values {
    storage: Arc<Storage>,
}

impl Values {
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.storage.get_index(position).map(|(_, value)| value)
    }

    pub fn iter(&self) -> indexmap::map::Values<'_, CString, Value> {
        self.storage.values()
    }
}

impl Index<usize> for Values {
    type Output = Value;

    fn index(&self, position: usize) -> &Value {
        match self.get(position) {
            Some(value) => value,
            None => panic!("value position {} out of range for {} values", position, self.len()),
        }
    }
}

impl<'a> IntoIterator for &'a Values {
    type Item = &'a Value;
    type IntoIter = indexmap::map::Values<'a, CString, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.insert("a", 1i32).unwrap();
        doc.insert("b", "two").unwrap();
        doc.insert("c", Value::Null).unwrap();
        doc
    }

    #[test]
    fn test_clone_shares_until_write() {
        let original = sample();
        let mut copy = original.clone();
        assert!(copy.shares_storage_with(&original));

        copy.remove("a");
        assert!(!copy.shares_storage_with(&original));
        assert_eq!(original.len(), 3);
        assert_eq!(copy.len(), 2);
    }

    #[test]
    fn test_unique_write_does_not_detach() {
        let mut doc = sample();
        let before = Arc::as_ptr(&doc.storage);
        doc.insert("d", true).unwrap();
        assert_eq!(Arc::as_ptr(&doc.storage), before);
    }

    #[test]
    fn test_failed_writes_do_not_detach() {
        let original = sample();
        let mut copy = original.clone();

        assert!(copy.insert("bad\0key", 1i32).is_err());
        assert_eq!(
            copy.append(Element::try_new("a", 5i32).unwrap()),
            Err(Error::duplicate_key("a"))
        );
        assert_eq!(copy.remove("missing"), None);
        assert!(copy.shares_storage_with(&original));
    }

    #[test]
    fn test_at_and_get_index() {
        let doc = sample();
        let (key, value) = doc.at(1);
        assert_eq!(key, "b");
        assert_eq!(value, &Value::from("two"));
        assert!(doc.get_index(3).is_none());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_at_out_of_range_panics() {
        let _ = sample().at(3);
    }

    #[test]
    fn test_typed_getters_absent_on_mismatch() {
        let doc = sample();
        assert_eq!(doc.get_i32("a"), Some(1));
        assert_eq!(doc.get_i64("a"), None);
        assert_eq!(doc.get_str("b"), Some("two"));
        assert_eq!(doc.get_str("missing"), None);
        assert!(doc.is_null("c"));
        assert!(!doc.is_null("missing"));
    }

    #[test]
    fn test_get_mut_detaches() {
        let original = sample();
        let mut copy = original.clone();
        if let Some(value) = copy.get_mut("a") {
            *value = Value::Int32(10);
        }
        assert_eq!(copy.get_i32("a"), Some(10));
        assert_eq!(original.get_i32("a"), Some(1));
    }

    #[test]
    fn test_views_are_snapshots() {
        let mut doc = sample();
        let keys = doc.keys();
        let values = doc.values();
        doc.insert("d", 4i64).unwrap();
        doc.remove("a");

        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0], "a");
        assert!(keys.contains("a"));
        assert_eq!(values[0], Value::Int32(1));

        let current = doc.keys();
        let names: Vec<&str> = current.iter().map(CString::as_str).collect();
        assert_eq!(names, ["b", "c", "d"]);
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let mut ab = Document::new();
        ab.insert("a", 1i32).unwrap();
        ab.insert("b", 2i32).unwrap();
        let mut ba = Document::new();
        ba.insert("b", 2i32).unwrap();
        ba.insert("a", 1i32).unwrap();

        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
        ba.remove("b");
        ba.insert("b", 2i32).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_equality_ignores_sharing() {
        let mut doc = Document::new();
        doc.insert("n", f64::NAN).unwrap();
        let shared = doc.clone();
        let deep = Document::from_elements(doc.clone()).unwrap();

        assert!(shared.shares_storage_with(&doc));
        assert!(!deep.shares_storage_with(&doc));
        assert_eq!(doc == shared, doc == deep);
        assert_ne!(doc, shared);

        let plain = sample();
        let plain_deep = Document::from_elements(plain.clone()).unwrap();
        assert_eq!(plain, plain.clone());
        assert_eq!(plain, plain_deep);
    }

    #[test]
    fn test_into_iter_yields_elements() {
        let doc = sample();
        let keep = doc.clone();
        let elements: Vec<Element> = doc.into_iter().collect();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[2].key(), "c");
        assert_eq!(Document::try_from(elements).unwrap(), keep);
    }

    #[test]
    fn test_extend_replaces_in_place() {
        let mut doc = sample();
        doc.extend(vec![
            Element::try_new("a", 9i32).unwrap(),
            Element::try_new("z", false).unwrap(),
        ]);
        assert_eq!(doc.position("a"), Some(0));
        assert_eq!(doc.get_i32("a"), Some(9));
        assert_eq!(doc.position("z"), Some(3));
    }
}
