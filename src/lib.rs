//! # bison
//!
//! An in-memory document model and byte-exact encoder for BSON, the binary,
//! schema-less, ordered key/value format.
//!
//! ## What is in the box?
//!
//! - **Documents**: ordered, key-unique collections of typed values that nest
//!   arbitrarily (documents in documents, arrays, scoped JavaScript)
//! - **Encoding**: a deterministic encoder producing the canonical bytes,
//!   little-endian throughout, with every length prefix patched in place
//! - **Cheap copies**: documents share their storage until one copy writes
//! - **ObjectIds**: 12-byte identifiers built from the time, a host
//!   fingerprint, the process id and a process-wide counter
//! - **Serde**: any `T: Serialize` converts into a [`Value`] or [`Document`]
//!
//! Decoding bytes back into documents is not provided.
//!
//! ## Quick Start
//!
//! ```rust
//! use bison::{Document, ObjectId, Value};
//!
//! let mut address = Document::new();
//! address.insert("city", "Lisbon").unwrap();
//!
//! let mut user = Document::new();
//! user.insert("_id", ObjectId::new()).unwrap();
//! user.insert("name", "Alice").unwrap();
//! user.insert("age", 30i32).unwrap();
//! user.insert("address", address).unwrap();
//! user.insert("tags", vec![Value::from("admin"), Value::from("ops")]).unwrap();
//!
//! let bytes = bison::to_vec(&user);
//! let declared = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
//! assert_eq!(declared as usize, bytes.len());
//! ```
//!
//! ### From Rust types
//!
//! ```rust
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let doc = bison::to_document(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(doc.get_i32("y"), Some(2));
//! ```
//!
//! ## Invariants
//!
//! - Keys are unique within a document and never contain a NUL byte
//! - Element order is insertion order; replacing a value keeps its position
//! - Equal documents always encode to identical bytes
//! - Encoding cannot fail for documents within the format's `i32::MAX`
//!   length limit; larger payloads panic rather than truncate
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and installs no subscriber. ObjectId
//! host fingerprinting logs at `debug`; detaching a shared document storage
//! logs at `trace`.
//!
//! See the [`wire`] module for the byte layout.

mod bytes;
mod cstring;
mod datetime;
mod digest;
mod document;
mod element;
pub mod encoder;
pub mod error;
mod oid;
pub mod options;
pub mod ser;
mod storage;
pub mod value;
pub mod wire;

pub use bytes::{BytesReader, BytesWriter};
pub use cstring::CString;
pub use datetime::{Decimal128, Timestamp, UtcDateTime};
pub use document::{Document, IntoElements, Keys, Values};
pub use element::Element;
pub use encoder::Encoder;
pub use error::{Error, Result};
pub use oid::{ObjectId, ObjectIdGenerator};
pub use options::GeneratorOptions;
pub use ser::ValueSerializer;
pub use value::{Binary, JavaScriptWithScope, Regex, Value};
pub use wire::{BinarySubtype, ElementType};

use serde::Serialize;

/// Encode a document to its canonical bytes.
///
/// # Examples
///
/// ```rust
/// use bison::Document;
///
/// let mut doc = Document::new();
/// doc.insert("x", 1.0).unwrap();
///
/// assert_eq!(
///     bison::to_vec(&doc),
///     [0x10, 0, 0, 0, 0x01, b'x', 0, 0, 0, 0, 0, 0, 0, 0xF0, 0x3F, 0]
/// );
/// ```
///
/// # Panics
///
/// Panics if any length in the encoding exceeds `i32::MAX` bytes.
#[must_use]
pub fn to_vec(doc: &Document) -> Vec<u8> {
    doc.to_bytes()
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// See the [`ser`] module for how Rust types map onto values.
///
/// # Examples
///
/// ```rust
/// use bison::{to_value, Value};
///
/// assert_eq!(to_value(&vec![1i64, 2]).unwrap(), Value::Array(vec![Value::Int64(1), Value::Int64(2)]));
/// assert_eq!(to_value(&Option::<bool>::None).unwrap(), Value::Null);
/// ```
///
/// # Errors
///
/// Returns an error if the value has no mapping into the document model,
/// such as a `u64` above `i64::MAX`, a map key that is neither a string nor
/// an integer, or a key containing a NUL byte.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Convert any `T: Serialize` that serializes as a map or struct to a
/// [`Document`].
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] if `value` does not serialize to a
/// document, plus any error [`to_value`] can return.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_document<T>(value: &T) -> Result<Document>
where
    T: ?Sized + Serialize,
{
    match to_value(value)? {
        Value::Document(doc) => Ok(doc),
        other => Err(Error::unsupported_type(&format!(
            "expected a map or struct at the top level, found {}",
            other.element_type()
        ))),
    }
}
