//! Error types for building and encoding documents.
//!
//! Encoding itself never fails: every invariant of the document model is
//! checked when a document is built or mutated, so the errors below surface
//! as close to the offending call as possible.
//!
//! ## Error Categories
//!
//! - **Invariant violations**: duplicate keys and strings with interior NUL bytes
//! - **Identifier parsing**: malformed ObjectId hex strings
//! - **Primitive reads**: running out of input while reading little-endian fields
//! - **Serde conversion**: Rust values with no mapping into the document model
//!
//! ## Examples
//!
//! ```rust
//! use bison::{Document, Element, Error, Value};
//!
//! let mut doc = Document::new();
//! doc.insert("name", "Alice").unwrap();
//!
//! let dup = Element::try_new("name", Value::from("Bob")).unwrap();
//! match doc.append(dup) {
//!     Err(Error::DuplicateKey { key }) => assert_eq!(key, "name"),
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by the document model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A document already holds an element with this key
    #[error("Duplicate key {key:?}: a document cannot hold two elements with the same key")]
    DuplicateKey { key: String },

    /// A key or regex component contains a NUL byte
    #[error("String {value:?} contains an interior NUL byte at position {position}")]
    InteriorNul { value: String, position: usize },

    /// Malformed ObjectId text or byte length
    #[error("Invalid ObjectId: {0}")]
    InvalidObjectId(String),

    /// Not enough input left to read a fixed-width field
    #[error("Unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// A Rust type with no document-model equivalent
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a duplicate key error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bison::Error;
    ///
    /// let err = Error::duplicate_key("a");
    /// assert!(err.to_string().contains("\"a\""));
    /// ```
    pub fn duplicate_key(key: &str) -> Self {
        Error::DuplicateKey {
            key: key.to_string(),
        }
    }

    /// Creates an interior NUL error for `value`, whose first NUL sits at `position`.
    pub fn interior_nul(value: &str, position: usize) -> Self {
        Error::InteriorNul {
            value: value.to_string(),
            position,
        }
    }

    /// Creates an invalid ObjectId error.
    pub fn invalid_object_id(msg: &str) -> Self {
        Error::InvalidObjectId(msg.to_string())
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(needed: usize, remaining: usize) -> Self {
        Error::UnexpectedEof { needed, remaining }
    }

    /// Creates an unsupported type error.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bison::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
