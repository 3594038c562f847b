//! The byte-encoding engine.
//!
//! [`Encoder`] walks a [`Document`] depth-first and appends its canonical
//! bytes to a [`BytesWriter`]. Every document-shaped payload (documents,
//! arrays, scopes) is framed the same way: a four-byte length placeholder,
//! the elements, a `0x00` terminator, then the placeholder is patched with
//! the byte count from the placeholder to the terminator inclusive.
//!
//! Encoding cannot fail for any document that fits the format. Keys and regex
//! parts are NUL-free by construction and every [`Value`] variant has a
//! defined payload. Every length is a signed 32-bit integer, so a string,
//! blob or (sub)document longer than `i32::MAX` bytes cannot be represented;
//! encoding one panics instead of writing a truncated prefix.
//!
//! ## Examples
//!
//! ```rust
//! use bison::{Document, Encoder};
//!
//! let mut doc = Document::new();
//! doc.insert("x", 1.0).unwrap();
//!
//! let mut encoder = Encoder::new();
//! encoder.encode_document(&doc);
//! assert_eq!(
//!     encoder.finish(),
//!     [0x10, 0, 0, 0, 0x01, b'x', 0, 0, 0, 0, 0, 0, 0, 0xF0, 0x3F, 0]
//! );
//! ```

use crate::bytes::{wire_len, BytesWriter};
use crate::{Document, Value};

/// Appends encoded documents to an output buffer.
#[derive(Debug, Default)]
pub struct Encoder {
    output: BytesWriter,
}

impl Encoder {
    #[must_use]
    pub fn new() -> Self {
        Encoder {
            output: BytesWriter::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Encoder {
            output: BytesWriter::with_capacity(capacity),
        }
    }

    /// Appends the encoding of `doc`. Calling this repeatedly concatenates
    /// documents, which is how a stream of them is laid out.
    ///
    /// # Panics
    ///
    /// Panics if any length in the encoding exceeds `i32::MAX` bytes.
    pub fn encode_document(&mut self, doc: &Document) {
        let start = self.begin_document();
        for (key, value) in doc {
            self.write_element(key.as_bytes(), value);
        }
        self.end_document(start);
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.output.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.output.finalize()
    }

    fn begin_document(&mut self) -> usize {
        self.output.reserve_i32()
    }

    fn end_document(&mut self, start: usize) {
        self.output.push_byte(0x00);
        let len = self.output.len() - start;
        self.output.patch_i32(start, wire_len(len));
    }

    fn encode_array(&mut self, values: &[Value]) {
        let start = self.begin_document();
        for (index, value) in values.iter().enumerate() {
            self.write_element(index.to_string().as_bytes(), value);
        }
        self.end_document(start);
    }

    fn write_element(&mut self, key: &[u8], value: &Value) {
        self.output.push_byte(value.element_type().as_u8());
        self.output.push_cstr(key);
        self.write_payload(value);
    }

    fn write_payload(&mut self, value: &Value) {
        match value {
            Value::Double(v) => self.output.push_f64(*v),
            Value::String(s) | Value::JavaScript(s) => self.output.push_string(s),
            Value::Document(doc) => self.encode_document(doc),
            Value::Array(values) => self.encode_array(values),
            Value::Binary(binary) => {
                self.output.push_i32(wire_len(binary.bytes.len()));
                self.output.push_byte(u8::from(binary.subtype));
                self.output.push_bytes(&binary.bytes);
            }
            Value::ObjectId(id) => self.output.push_bytes(&id.bytes()),
            Value::Boolean(b) => self.output.push_bool(*b),
            Value::DateTime(date) => self.output.push_i64(date.timestamp_millis()),
            Value::RegularExpression(regex) => {
                self.output.push_cstr(regex.pattern_cstr().as_bytes());
                self.output.push_cstr(regex.options_cstr().as_bytes());
            }
            Value::JavaScriptWithScope(js) => {
                // The prefix covers the code string and the scope, not itself.
                let start = self.output.reserve_i32();
                self.output.push_string(&js.code);
                self.encode_document(&js.scope);
                let len = self.output.len() - start - 4;
                self.output.patch_i32(start, wire_len(len));
            }
            Value::Int32(v) => self.output.push_i32(*v),
            Value::Timestamp(ts) => self.output.push_u64(ts.as_u64()),
            Value::Int64(v) => self.output.push_i64(*v),
            Value::Decimal128(dec) => self.output.push_bytes(&dec.bytes()),
            Value::Null | Value::MinKey | Value::MaxKey => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytes::BytesReader;
    use crate::{Binary, BinarySubtype, JavaScriptWithScope, Regex, Timestamp};

    fn encode(doc: &Document) -> Vec<u8> {
        let mut encoder = Encoder::new();
        encoder.encode_document(doc);
        encoder.finish()
    }

    fn single(key: &str, value: impl Into<Value>) -> Vec<u8> {
        let mut doc = Document::new();
        doc.insert(key, value).unwrap();
        encode(&doc)
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(encode(&Document::new()), vec![5, 0, 0, 0, 0]);
    }

    #[test]
    fn test_string_payload() {
        let bytes = single("s", "hi");
        assert_eq!(
            bytes,
            vec![
                0x0F, 0, 0, 0, // total length 15
                0x02, b's', 0, // tag, key
                3, 0, 0, 0, b'h', b'i', 0, // length incl. NUL, bytes, NUL
                0,
            ]
        );
    }

    #[test]
    fn test_unit_kinds_have_no_payload() {
        for value in [Value::Null, Value::MinKey, Value::MaxKey] {
            let tag = value.element_type().as_u8();
            assert_eq!(single("k", value), vec![8, 0, 0, 0, tag, b'k', 0, 0]);
        }
    }

    #[test]
    fn test_binary_payload() {
        let bytes = single("b", Binary::new(BinarySubtype::BinaryOld, vec![0xAA, 0xBB]));
        assert_eq!(&bytes[4..7], &[0x05, b'b', 0]);
        assert_eq!(&bytes[7..11], &[2, 0, 0, 0]);
        assert_eq!(bytes[11], 0x02);
        assert_eq!(&bytes[12..14], &[0xAA, 0xBB]);
        assert_eq!(bytes.len(), 15);
    }

    #[test]
    fn test_regex_payload() {
        let bytes = single("r", Regex::new("^a", "mi").unwrap());
        assert_eq!(&bytes[4..], &[0x0B, b'r', 0, b'^', b'a', 0, b'i', b'm', 0, 0]);
    }

    #[test]
    fn test_timestamp_payload() {
        let bytes = single("t", Timestamp::new(1, 2));
        // increment in the low four bytes, seconds in the high four
        assert_eq!(&bytes[7..15], &[2, 0, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn test_scoped_javascript_length() {
        let mut scope = Document::new();
        scope.insert("n", 1i32).unwrap();
        let js = JavaScriptWithScope::new("n", scope.clone());
        let bytes = single("f", js);

        let mut reader = BytesReader::new(&bytes[7..]);
        let prefix = reader.read_i32().unwrap() as usize;
        let code_len = 4 + 2;
        let scope_len = scope.to_bytes().len();
        assert_eq!(prefix, code_len + scope_len);
        assert_eq!(bytes.len(), 7 + 4 + prefix + 1);
    }

    #[test]
    fn test_nested_document_lengths() {
        let mut inner = Document::new();
        inner.insert("b", 1i64).unwrap();
        let mut outer = Document::new();
        outer.insert("a", inner.clone()).unwrap();

        let inner_bytes = encode(&inner);
        let outer_bytes = encode(&outer);
        assert_eq!(inner_bytes.len(), 16);
        assert_eq!(outer_bytes.len(), 4 + 1 + 2 + inner_bytes.len() + 1);
        assert_eq!(&outer_bytes[7..7 + inner_bytes.len()], &inner_bytes[..]);
    }

    #[test]
    fn test_array_uses_index_keys() {
        let bytes = single("a", vec![Value::from("x"), Value::from("y")]);
        let array = &bytes[7..bytes.len() - 1];
        assert_eq!(
            array,
            &[
                0x17, 0, 0, 0, // 23 bytes
                0x02, b'0', 0, 2, 0, 0, 0, b'x', 0, //
                0x02, b'1', 0, 2, 0, 0, 0, b'y', 0, //
                0,
            ]
        );
    }

    #[test]
    fn test_encoding_appends() {
        let mut encoder = Encoder::with_capacity(16);
        assert!(encoder.is_empty());
        encoder.encode_document(&Document::new());
        encoder.encode_document(&Document::new());
        assert_eq!(encoder.len(), 10);
    }
}
