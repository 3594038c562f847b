//! Ordered, key-unique backing store for documents.
//!
//! [`Storage`] wraps an [`IndexMap`] so that lookups by key and by position
//! are both cheap and iteration follows insertion order. Order matters for
//! this format: it decides the encoded bytes.
//!
//! A document never owns a `Storage` directly. It holds an `Arc<Storage>`
//! that copies of the document share until one of them writes.

use crate::{CString, Element, Error, Result, Value};
use indexmap::IndexMap;

/// The elements of a document, in insertion order, with unique keys.
#[derive(Debug, Clone, Default)]
pub(crate) struct Storage(IndexMap<CString, Value>);

impl Storage {
    pub(crate) fn new() -> Self {
        Storage(IndexMap::new())
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Storage(IndexMap::with_capacity(capacity))
    }

    pub(crate) fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    pub(crate) fn get_index(&self, position: usize) -> Option<(&CString, &Value)> {
        self.0.get_index(position)
    }

    pub(crate) fn get_index_of(&self, key: &str) -> Option<usize> {
        self.0.get_index_of(key)
    }

    pub(crate) fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Replaces the value of an existing key in place, or appends a new
    /// element at the end. Returns the replaced value.
    pub(crate) fn insert(&mut self, key: CString, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Appends an element whose key must not be present yet.
    pub(crate) fn append(&mut self, element: Element) -> Result<()> {
        let (key, value) = element.into_parts();
        if self.0.contains_key(key.as_str()) {
            return Err(Error::duplicate_key(key.as_str()));
        }
        self.0.insert(key, value);
        Ok(())
    }

    /// Removes an element, shifting the ones after it so order is kept.
    pub(crate) fn shift_remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn iter(&self) -> indexmap::map::Iter<'_, CString, Value> {
        self.0.iter()
    }

    pub(crate) fn keys(&self) -> indexmap::map::Keys<'_, CString, Value> {
        self.0.keys()
    }

    pub(crate) fn values(&self) -> indexmap::map::Values<'_, CString, Value> {
        self.0.values()
    }
}

impl IntoIterator for Storage {
    type Item = (CString, Value);
    type IntoIter = indexmap::map::IntoIter<CString, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
