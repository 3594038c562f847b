//! A named entry of a document.

use crate::{CString, Result, Value};

/// A key together with its value.
///
/// Equality and hashing are pointwise on `(key, value)`.
///
/// # Examples
///
/// ```rust
/// use bison::{Element, Value};
///
/// let element = Element::try_new("count", 3i32).unwrap();
/// assert_eq!(element.key(), "count");
/// assert_eq!(element.value(), &Value::Int32(3));
/// ```
#[derive(Clone, Debug, PartialEq, Hash)]
pub struct Element {
    key: CString,
    value: Value,
}

impl Element {
    /// Builds an element from an already validated key.
    #[must_use]
    pub fn new(key: CString, value: impl Into<Value>) -> Self {
        Element {
            key,
            value: value.into(),
        }
    }

    /// Builds an element, validating the key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InteriorNul`](crate::Error::InteriorNul) if `key`
    /// contains a NUL byte.
    pub fn try_new(key: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        Ok(Element::new(CString::new(key)?, value))
    }

    #[must_use]
    pub fn key(&self) -> &CString {
        &self.key
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    #[must_use]
    pub fn into_parts(self) -> (CString, Value) {
        (self.key, self.value)
    }
}

impl From<(CString, Value)> for Element {
    fn from((key, value): (CString, Value)) -> Self {
        Element { key, value }
    }
}

impl From<Element> for (CString, Value) {
    fn from(element: Element) -> Self {
        element.into_parts()
    }
}
