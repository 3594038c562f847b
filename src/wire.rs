//! Wire format tags and layout.
//!
//! This module holds the one-byte tags of the binary document format and
//! documents the byte layout produced by the [`Encoder`](crate::Encoder).
//!
//! # Documents
//!
//! ```text
//! document := int32 element* 0x00
//! element  := tag key payload
//! key      := utf8-bytes 0x00
//! ```
//!
//! The leading `int32` is the total size of the document in bytes, counting
//! itself and the trailing `0x00`. The same framing is used for every nested
//! document-shaped payload: embedded documents, arrays and the scope of a
//! scoped JavaScript value.
//!
//! **Rules**:
//! - All multi-byte numbers are little-endian
//! - Keys carry no length prefix; they end at the first NUL, which is why
//!   keys can never contain one
//! - Arrays are documents keyed `"0"`, `"1"`, `"2"`, … in order
//! - Element order is preserved exactly as inserted
//!
//! # Payloads
//!
//! | Tag | Kind | Payload |
//! |------|------|---------|
//! | `0x01` | double | 8 bytes IEEE-754 |
//! | `0x02` | string | `int32` byte length (NUL included), UTF-8 bytes, `0x00` |
//! | `0x03` | document | embedded document |
//! | `0x04` | array | embedded document with index keys |
//! | `0x05` | binary | `int32` blob length, subtype byte, blob |
//! | `0x07` | ObjectId | 12 bytes |
//! | `0x08` | boolean | `0x00` or `0x01` |
//! | `0x09` | UTC datetime | `int64` milliseconds since the Unix epoch |
//! | `0x0A` | null | none |
//! | `0x0B` | regex | pattern `0x00` options `0x00` |
//! | `0x0D` | JavaScript | same as string |
//! | `0x0F` | scoped JavaScript | `int32` length of the two parts that follow, string, document |
//! | `0x10` | int32 | 4 bytes |
//! | `0x11` | timestamp | 8 bytes: increment then seconds |
//! | `0x12` | int64 | 8 bytes |
//! | `0x13` | decimal128 | 16 bytes |
//! | `0xFF` | min key | none |
//! | `0x7F` | max key | none |
//!
//! # Example
//!
//! `{"x": 1.0}` encodes to sixteen bytes:
//!
//! ```text
//! 10 00 00 00                length 16
//! 01                         double
//! 78 00                      "x"
//! 00 00 00 00 00 00 F0 3F    1.0
//! 00                         end of document
//! ```

use std::fmt;

/// The one-byte tag written in front of every element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ElementType {
    Double = 0x01,
    String = 0x02,
    EmbeddedDocument = 0x03,
    Array = 0x04,
    Binary = 0x05,
    ObjectId = 0x07,
    Boolean = 0x08,
    DateTime = 0x09,
    Null = 0x0A,
    RegularExpression = 0x0B,
    JavaScript = 0x0D,
    JavaScriptWithScope = 0x0F,
    Int32 = 0x10,
    Timestamp = 0x11,
    Int64 = 0x12,
    Decimal128 = 0x13,
    MaxKey = 0x7F,
    MinKey = 0xFF,
}

impl ElementType {
    /// The tag byte as written to the wire.
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Maps a tag byte back to its element type.
    ///
    /// Returns `None` for bytes that are not tags, including the deprecated
    /// `0x06`, `0x0C` and `0x0E` which this crate never produces.
    #[must_use]
    pub const fn from_u8(tag: u8) -> Option<Self> {
        Some(match tag {
            0x01 => ElementType::Double,
            0x02 => ElementType::String,
            0x03 => ElementType::EmbeddedDocument,
            0x04 => ElementType::Array,
            0x05 => ElementType::Binary,
            0x07 => ElementType::ObjectId,
            0x08 => ElementType::Boolean,
            0x09 => ElementType::DateTime,
            0x0A => ElementType::Null,
            0x0B => ElementType::RegularExpression,
            0x0D => ElementType::JavaScript,
            0x0F => ElementType::JavaScriptWithScope,
            0x10 => ElementType::Int32,
            0x11 => ElementType::Timestamp,
            0x12 => ElementType::Int64,
            0x13 => ElementType::Decimal128,
            0x7F => ElementType::MaxKey,
            0xFF => ElementType::MinKey,
            _ => return None,
        })
    }

    /// `true` for the kinds that carry no payload after their key.
    #[inline]
    #[must_use]
    pub const fn is_unit(self) -> bool {
        matches!(
            self,
            ElementType::Null | ElementType::MinKey | ElementType::MaxKey
        )
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::Double => "double",
            ElementType::String => "string",
            ElementType::EmbeddedDocument => "document",
            ElementType::Array => "array",
            ElementType::Binary => "binary",
            ElementType::ObjectId => "objectId",
            ElementType::Boolean => "bool",
            ElementType::DateTime => "date",
            ElementType::Null => "null",
            ElementType::RegularExpression => "regex",
            ElementType::JavaScript => "javascript",
            ElementType::JavaScriptWithScope => "javascriptWithScope",
            ElementType::Int32 => "int",
            ElementType::Timestamp => "timestamp",
            ElementType::Int64 => "long",
            ElementType::Decimal128 => "decimal",
            ElementType::MaxKey => "maxKey",
            ElementType::MinKey => "minKey",
        };
        f.write_str(name)
    }
}

/// Classifies the bytes of a binary value.
///
/// Every byte maps to exactly one subtype and back: the six well-known
/// values have their own variants, `0x80..=0xFF` is user-defined and the
/// rest is reserved.
///
/// # Examples
///
/// ```rust
/// use bison::BinarySubtype;
///
/// assert_eq!(BinarySubtype::from(0x04), BinarySubtype::Uuid);
/// assert_eq!(BinarySubtype::from(0x90), BinarySubtype::UserDefined(0x90));
/// assert_eq!(u8::from(BinarySubtype::Reserved(0x06)), 0x06);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BinarySubtype {
    #[default]
    Generic,
    Function,
    BinaryOld,
    UuidOld,
    Uuid,
    Md5,
    Reserved(u8),
    UserDefined(u8),
}

impl From<u8> for BinarySubtype {
    fn from(byte: u8) -> Self {
        match byte {
            0x00 => BinarySubtype::Generic,
            0x01 => BinarySubtype::Function,
            0x02 => BinarySubtype::BinaryOld,
            0x03 => BinarySubtype::UuidOld,
            0x04 => BinarySubtype::Uuid,
            0x05 => BinarySubtype::Md5,
            0x06..=0x7F => BinarySubtype::Reserved(byte),
            0x80..=0xFF => BinarySubtype::UserDefined(byte),
        }
    }
}

impl From<BinarySubtype> for u8 {
    fn from(subtype: BinarySubtype) -> Self {
        match subtype {
            BinarySubtype::Generic => 0x00,
            BinarySubtype::Function => 0x01,
            BinarySubtype::BinaryOld => 0x02,
            BinarySubtype::UuidOld => 0x03,
            BinarySubtype::Uuid => 0x04,
            BinarySubtype::Md5 => 0x05,
            BinarySubtype::Reserved(byte) | BinarySubtype::UserDefined(byte) => byte,
        }
    }
}
