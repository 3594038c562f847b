//! The closed set of values a document can hold.
//!
//! This module provides the [`Value`] enum, one variant per wire kind, along
//! with the compound payloads [`Binary`], [`Regex`] and
//! [`JavaScriptWithScope`].
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use bison::{Binary, BinarySubtype, Value};
//!
//! let null = Value::Null;
//! let flag = Value::from(true);
//! let count = Value::from(42i32);
//! let text = Value::from("hello");
//! let blob = Value::from(Binary::new(BinarySubtype::Generic, vec![1, 2, 3]));
//! ```
//!
//! ### Extracting Values
//!
//! Typed accessors return `None` when the variant does not match:
//!
//! ```rust
//! use bison::Value;
//!
//! let value = Value::from(42i64);
//! assert_eq!(value.as_i64(), Some(42));
//! assert_eq!(value.as_i32(), None);
//! ```

use crate::{
    BinarySubtype, CString, Decimal128, Document, ElementType, ObjectId, Result, Timestamp,
    UtcDateTime,
};
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::hash::{Hash, Hasher};

/// A single value of the binary document format.
///
/// The set of variants is closed and every variant has a defined encoding.
/// Values of different variants never compare equal, even when their
/// payloads look alike (`Int32(1) != Int64(1)`).
///
/// # Examples
///
/// ```rust
/// use bison::{ElementType, Value};
///
/// let value = Value::from(1.0);
/// assert_eq!(value.element_type(), ElementType::Double);
/// assert_ne!(Value::Int32(1), Value::Int64(1));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Double(f64),
    String(String),
    Document(Document),
    Array(Vec<Value>),
    Binary(Binary),
    ObjectId(ObjectId),
    Boolean(bool),
    DateTime(UtcDateTime),
    Null,
    RegularExpression(Regex),
    JavaScript(String),
    JavaScriptWithScope(JavaScriptWithScope),
    Int32(i32),
    Timestamp(Timestamp),
    Int64(i64),
    Decimal128(Decimal128),
    MinKey,
    MaxKey,
}

/// A binary blob tagged with its subtype.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Binary {
    pub subtype: BinarySubtype,
    pub bytes: Vec<u8>,
}

impl Binary {
    #[must_use]
    pub fn new(subtype: BinarySubtype, bytes: Vec<u8>) -> Self {
        Binary { subtype, bytes }
    }
}

/// A regular expression pattern and its option letters.
///
/// Both parts are written NUL-terminated, so neither may contain a NUL.
///
/// Option letters are sorted alphabetically when the regex is built, as the
/// format requires. The stored and encoded options can therefore differ in
/// order from the string passed to [`Regex::new`]: `"xi"` is kept and
/// written as `"ix"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Regex {
    pattern: CString,
    options: CString,
}

impl Regex {
    /// Builds a regex, sorting the option letters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InteriorNul`](crate::Error::InteriorNul) if either
    /// part contains a NUL byte.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bison::Regex;
    ///
    /// let regex = Regex::new("^a.*z$", "xi").unwrap();
    /// assert_eq!(regex.options(), "ix");
    /// ```
    pub fn new(pattern: impl Into<String>, options: impl Into<String>) -> Result<Self> {
        let pattern = CString::new(pattern)?;
        let options: String = options.into();
        let mut letters: Vec<char> = options.chars().collect();
        letters.sort_unstable();
        let options = CString::new(letters.into_iter().collect::<String>())?;
        Ok(Regex { pattern, options })
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    #[must_use]
    pub fn options(&self) -> &str {
        self.options.as_str()
    }

    pub(crate) fn pattern_cstr(&self) -> &CString {
        &self.pattern
    }

    pub(crate) fn options_cstr(&self) -> &CString {
        &self.options
    }
}

/// JavaScript code together with the document its free variables bind to.
#[derive(Clone, Debug, PartialEq, Hash)]
pub struct JavaScriptWithScope {
    pub code: String,
    pub scope: Document,
}

impl JavaScriptWithScope {
    #[must_use]
    pub fn new(code: impl Into<String>, scope: Document) -> Self {
        JavaScriptWithScope {
            code: code.into(),
            scope,
        }
    }
}

impl Value {
    /// The tag byte this value is written with.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Value::Double(_) => ElementType::Double,
            Value::String(_) => ElementType::String,
            Value::Document(_) => ElementType::EmbeddedDocument,
            Value::Array(_) => ElementType::Array,
            Value::Binary(_) => ElementType::Binary,
            Value::ObjectId(_) => ElementType::ObjectId,
            Value::Boolean(_) => ElementType::Boolean,
            Value::DateTime(_) => ElementType::DateTime,
            Value::Null => ElementType::Null,
            Value::RegularExpression(_) => ElementType::RegularExpression,
            Value::JavaScript(_) => ElementType::JavaScript,
            Value::JavaScriptWithScope(_) => ElementType::JavaScriptWithScope,
            Value::Int32(_) => ElementType::Int32,
            Value::Timestamp(_) => ElementType::Timestamp,
            Value::Int64(_) => ElementType::Int64,
            Value::Decimal128(_) => ElementType::Decimal128,
            Value::MinKey => ElementType::MinKey,
            Value::MaxKey => ElementType::MaxKey,
        }
    }

    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    ///
    /// JavaScript code is not a string; see [`Value::as_javascript`].
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_document_mut(&mut self) -> Option<&mut Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_binary(&self) -> Option<&Binary> {
        match self {
            Value::Binary(binary) => Some(binary),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            Value::ObjectId(id) => Some(*id),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> Option<UtcDateTime> {
        match self {
            Value::DateTime(date) => Some(*date),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_regex(&self) -> Option<&Regex> {
        match self {
            Value::RegularExpression(regex) => Some(regex),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_javascript(&self) -> Option<&str> {
        match self {
            Value::JavaScript(code) => Some(code),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_javascript_with_scope(&self) -> Option<&JavaScriptWithScope> {
        match self {
            Value::JavaScriptWithScope(js) => Some(js),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_decimal128(&self) -> Option<Decimal128> {
        match self {
            Value::Decimal128(dec) => Some(*dec),
            _ => None,
        }
    }
}

// Hashing agrees with `PartialEq`: -0.0 and 0.0 compare equal, so they hash
// alike; documents compare element by element in order, so they hash that way.
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.element_type().hash(state);
        match self {
            Value::Double(v) => {
                let bits = if *v == 0.0 { 0 } else { v.to_bits() };
                bits.hash(state);
            }
            Value::String(s) | Value::JavaScript(s) => s.hash(state),
            Value::Document(doc) => doc.hash(state),
            Value::Array(values) => values.hash(state),
            Value::Binary(binary) => binary.hash(state),
            Value::ObjectId(id) => id.hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::DateTime(date) => date.hash(state),
            Value::RegularExpression(regex) => regex.hash(state),
            Value::JavaScriptWithScope(js) => js.hash(state),
            Value::Int32(v) => v.hash(state),
            Value::Timestamp(ts) => ts.hash(state),
            Value::Int64(v) => v.hash(state),
            Value::Decimal128(dec) => dec.hash(state),
            Value::Null | Value::MinKey | Value::MaxKey => {}
        }
    }
}

#[derive(Serialize)]
struct TimestampRepr {
    t: u32,
    i: u32,
}

/// Serializes values in a relaxed extended-JSON shape.
///
/// Numbers, strings, booleans, null, documents and arrays map to their
/// natural serde forms. The remaining kinds become single-key maps:
/// `{"$oid": hex}`, `{"$date": rfc3339}`, `{"$binary": hex, "$type": hex}`,
/// `{"$regex": .., "$options": ..}`, `{"$code": ..}` (plus `"$scope"`),
/// `{"$timestamp": {"t": .., "i": ..}}`, `{"$numberDecimalBytes": hex}`,
/// `{"$minKey": 1}` and `{"$maxKey": 1}`.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::String(s) => serializer.serialize_str(s),
            Value::Document(doc) => doc.serialize(serializer),
            Value::Array(values) => serializer.collect_seq(values),
            Value::Binary(binary) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("$binary", &hex::encode(&binary.bytes))?;
                map.serialize_entry("$type", &hex::encode([u8::from(binary.subtype)]))?;
                map.end()
            }
            Value::ObjectId(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$oid", &id.to_hex())?;
                map.end()
            }
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::DateTime(date) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$date", &date.to_string())?;
                map.end()
            }
            Value::Null => serializer.serialize_unit(),
            Value::RegularExpression(regex) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("$regex", regex.pattern())?;
                map.serialize_entry("$options", regex.options())?;
                map.end()
            }
            Value::JavaScript(code) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$code", code)?;
                map.end()
            }
            Value::JavaScriptWithScope(js) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("$code", &js.code)?;
                map.serialize_entry("$scope", &js.scope)?;
                map.end()
            }
            Value::Int32(v) => serializer.serialize_i32(*v),
            Value::Timestamp(ts) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(
                    "$timestamp",
                    &TimestampRepr {
                        t: ts.time,
                        i: ts.increment,
                    },
                )?;
                map.end()
            }
            Value::Int64(v) => serializer.serialize_i64(*v),
            Value::Decimal128(dec) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$numberDecimalBytes", &hex::encode(dec.bytes()))?;
                map.end()
            }
            Value::MinKey => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$minKey", &1)?;
                map.end()
            }
            Value::MaxKey => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$maxKey", &1)?;
                map.end()
            }
        }
    }
}

// TryFrom implementations for extracting owned payloads
macro_rules! impl_try_from_value {
    ($target:ty, $variant:ident, $expected:literal) => {
        impl TryFrom<Value> for $target {
            type Error = crate::Error;

            fn try_from(value: Value) -> crate::Result<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(crate::Error::custom(format!(
                        "expected {}, found {}",
                        $expected,
                        other.element_type()
                    ))),
                }
            }
        }
    };
}

impl_try_from_value!(f64, Double, "double");
impl_try_from_value!(String, String, "string");
impl_try_from_value!(Document, Document, "document");
impl_try_from_value!(Vec<Value>, Array, "array");
impl_try_from_value!(ObjectId, ObjectId, "objectId");
impl_try_from_value!(bool, Boolean, "bool");
impl_try_from_value!(i32, Int32, "int");
impl_try_from_value!(i64, Int64, "long");

// From implementations for creating values from Rust types
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Double(f64::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Document(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Binary> for Value {
    fn from(value: Binary) -> Self {
        Value::Binary(value)
    }
}

impl From<ObjectId> for Value {
    fn from(value: ObjectId) -> Self {
        Value::ObjectId(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<UtcDateTime> for Value {
    fn from(value: UtcDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(UtcDateTime::from(value))
    }
}

impl From<Regex> for Value {
    fn from(value: Regex) -> Self {
        Value::RegularExpression(value)
    }
}

impl From<JavaScriptWithScope> for Value {
    fn from(value: JavaScriptWithScope) -> Self {
        Value::JavaScriptWithScope(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Int32(i32::from(value))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Int32(i32::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Int32(i32::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Int32(i32::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int64(i64::from(value))
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Decimal128> for Value {
    fn from(value: Decimal128) -> Self {
        Value::Decimal128(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_element_types() {
        assert_eq!(Value::from(1.5).element_type(), ElementType::Double);
        assert_eq!(Value::from("s").element_type(), ElementType::String);
        assert_eq!(
            Value::from(Document::new()).element_type(),
            ElementType::EmbeddedDocument
        );
        assert_eq!(Value::from(Vec::<Value>::new()).element_type(), ElementType::Array);
        assert_eq!(Value::JavaScript("f()".into()).element_type(), ElementType::JavaScript);
        assert_eq!(Value::MinKey.element_type().as_u8(), 0xFF);
        assert_eq!(Value::MaxKey.element_type().as_u8(), 0x7F);
    }

    #[test]
    fn test_cross_variant_inequality() {
        assert_ne!(Value::Int32(1), Value::Int64(1));
        assert_ne!(Value::String("x".into()), Value::JavaScript("x".into()));
        assert_ne!(Value::MinKey, Value::MaxKey);
        assert_eq!(Value::Null, Value::Null);
    }

    #[test]
    fn test_typed_accessors() {
        let value = Value::from("hello");
        assert_eq!(value.as_str(), Some("hello"));
        assert_eq!(value.as_javascript(), None);
        assert_eq!(value.as_i32(), None);

        assert_eq!(Value::from(7i32).as_i32(), Some(7));
        assert_eq!(Value::from(7i64).as_i64(), Some(7));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert!(Value::Null.is_null());
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(3u8), Value::Int32(3));
        assert_eq!(Value::from(-3i16), Value::Int32(-3));
        assert_eq!(Value::from(u32::MAX), Value::Int64(i64::from(u32::MAX)));
        assert_eq!(Value::from(2.5f32), Value::Double(2.5));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::String("x".to_string()));
    }

    #[test]
    fn test_try_from_value() {
        assert_eq!(i64::try_from(Value::Int64(9)).unwrap(), 9);
        assert!(i64::try_from(Value::Int32(9)).is_err());
        assert_eq!(String::try_from(Value::from("a")).unwrap(), "a");
        let err = bool::try_from(Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "Error: expected bool, found null");
    }

    #[test]
    fn test_regex_sorts_options() {
        let regex = Regex::new("a+", "smi").unwrap();
        assert_eq!(regex.pattern(), "a+");
        assert_eq!(regex.options(), "ims");
        assert_ne!(Regex::new("a", "xi").unwrap().options(), "xi");
        assert!(Regex::new("a\0", "").is_err());
        assert!(Regex::new("a", "i\0").is_err());
    }

    #[test]
    fn test_hash_agrees_with_eq() {
        assert_eq!(Value::Double(0.0), Value::Double(-0.0));
        assert_eq!(hash_of(&Value::Double(0.0)), hash_of(&Value::Double(-0.0)));
        assert_ne!(hash_of(&Value::Int32(1)), hash_of(&Value::Int64(1)));
    }

    #[test]
    fn test_serialize_relaxed_json() {
        let id = ObjectId::from_bytes([1; 12]);
        let json = serde_json::to_value(Value::ObjectId(id)).unwrap();
        assert_eq!(json, serde_json::json!({ "$oid": "010101010101010101010101" }));

        let json = serde_json::to_value(Value::Timestamp(Timestamp::new(5, 6))).unwrap();
        assert_eq!(json, serde_json::json!({ "$timestamp": { "t": 5, "i": 6 } }));

        let binary = Binary::new(BinarySubtype::Uuid, vec![0xAB, 0xCD]);
        let json = serde_json::to_value(Value::Binary(binary)).unwrap();
        assert_eq!(json, serde_json::json!({ "$binary": "abcd", "$type": "04" }));

        let json = serde_json::to_value(Value::Array(vec![Value::Int32(1), Value::Null])).unwrap();
        assert_eq!(json, serde_json::json!([1, null]));
    }
}
