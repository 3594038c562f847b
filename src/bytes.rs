//! Fixed-width little-endian primitives.
//!
//! [`BytesWriter`] is the output buffer behind the [`Encoder`](crate::Encoder):
//! every multi-byte number in the wire format is little-endian, strings come
//! either NUL-terminated (keys, regex parts) or length-prefixed (string and
//! JavaScript payloads), and document lengths are patched in place once the
//! body has been written.
//!
//! [`BytesReader`] performs the symmetric reads. The crate never decodes whole
//! documents; the reader exists so callers can check individual fields of an
//! encoded buffer.

use crate::{Error, Result};

/// Growable little-endian output buffer.
#[derive(Debug, Clone, Default)]
pub struct BytesWriter {
    buf: Vec<u8>,
}

impl BytesWriter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    #[inline]
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    #[inline]
    pub fn push_bool(&mut self, value: bool) {
        self.push_byte(u8::from(value));
    }

    #[inline]
    pub fn push_i32(&mut self, value: i32) {
        self.push_bytes(&value.to_le_bytes());
    }

    #[inline]
    pub fn push_i64(&mut self, value: i64) {
        self.push_bytes(&value.to_le_bytes());
    }

    #[inline]
    pub fn push_u64(&mut self, value: u64) {
        self.push_bytes(&value.to_le_bytes());
    }

    #[inline]
    pub fn push_f64(&mut self, value: f64) {
        self.push_bytes(&value.to_le_bytes());
    }

    /// Writes `bytes` followed by a single NUL terminator, with no length prefix.
    ///
    /// Callers must guarantee `bytes` holds no NUL of its own; keys and regex
    /// parts get that guarantee from [`CString`](crate::CString).
    #[inline]
    pub fn push_cstr(&mut self, bytes: &[u8]) {
        self.push_bytes(bytes);
        self.push_byte(0x00);
    }

    /// Writes an `i32` byte count (terminator included), the UTF-8 bytes and a NUL.
    pub fn push_string(&mut self, value: &str) {
        self.push_i32(wire_len(value.len() + 1));
        self.push_cstr(value.as_bytes());
    }

    /// Reserves four bytes for a length that is only known later.
    ///
    /// Returns the offset to hand back to [`BytesWriter::patch_i32`].
    #[must_use]
    pub fn reserve_i32(&mut self) -> usize {
        let at = self.buf.len();
        self.push_i32(0);
        at
    }

    /// Overwrites the four bytes at `at` with `value`.
    ///
    /// # Panics
    ///
    /// Panics if `at + 4` is past the end of the buffer.
    pub fn patch_i32(&mut self, at: usize, value: i32) {
        self.buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn finalize(self) -> Vec<u8> {
        self.buf
    }
}

/// Converts an in-memory length to the wire format's signed 32-bit length.
///
/// # Panics
///
/// Panics if `len` exceeds `i32::MAX`; such a payload has no valid encoding.
#[inline]
pub(crate) fn wire_len(len: usize) -> i32 {
    match i32::try_from(len) {
        Ok(len) => len,
        Err(_) => panic!("length {} exceeds the i32::MAX limit of the wire format", len),
    }
}

/// Cursor over an encoded buffer reading little-endian primitives.
#[derive(Debug, Clone)]
pub struct BytesReader<'a> {
    buf: &'a [u8],
    off: usize,
}

impl<'a> BytesReader<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, off: 0 }
    }

    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.off)
    }

    /// Number of bytes consumed so far.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.off
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        match self.off.checked_add(len) {
            Some(end) if end <= self.buf.len() => {
                let start = self.off;
                self.off = end;
                Ok(&self.buf[start..end])
            }
            _ => Err(Error::unexpected_eof(len, self.remaining())),
        }
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Reads a boolean byte; anything other than `0x00` is `true`.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0x00)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Reads a 3-byte little-endian unsigned integer.
    pub fn read_u24(&mut self) -> Result<u32> {
        let [a, b, c] = self.read_array::<3>()?;
        Ok(u32::from_le_bytes([a, b, c, 0]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    /// Reads bytes up to the next NUL and consumes the terminator.
    pub fn read_cstr(&mut self) -> Result<&'a [u8]> {
        let rest = &self.buf[self.off.min(self.buf.len())..];
        match rest.iter().position(|&b| b == 0x00) {
            Some(nul) => {
                let bytes = self.read_bytes(nul)?;
                self.off += 1;
                Ok(bytes)
            }
            None => Err(Error::unexpected_eof(rest.len() + 1, rest.len())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_round_trip() {
        let mut w = BytesWriter::new();
        w.push_i32(-42);
        w.push_i64(i64::MIN);
        w.push_u64(u64::MAX);
        w.push_f64(1.5);
        w.push_bool(true);
        w.push_bool(false);
        let buf = w.finalize();
        assert_eq!(buf.len(), 4 + 8 + 8 + 8 + 2);

        let mut r = BytesReader::new(&buf);
        assert_eq!(r.read_i32().unwrap(), -42);
        assert_eq!(r.read_i64().unwrap(), i64::MIN);
        assert_eq!(r.read_u64().unwrap(), u64::MAX);
        assert_eq!(r.read_f64().unwrap(), 1.5);
        assert!(r.read_bool().unwrap());
        assert!(!r.read_bool().unwrap());
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_little_endian_layout() {
        let mut w = BytesWriter::new();
        w.push_i32(0x0102_0304);
        assert_eq!(w.finalize(), vec![0x04, 0x03, 0x02, 0x01]);

        let mut w = BytesWriter::new();
        w.push_f64(1.0);
        assert_eq!(
            w.finalize(),
            vec![0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0x3F]
        );
    }

    #[test]
    fn test_string_encodings() {
        let mut w = BytesWriter::new();
        w.push_cstr(b"key");
        w.push_string("héllo");
        let buf = w.finalize();
        assert_eq!(&buf[..4], b"key\0");

        let mut r = BytesReader::new(&buf);
        assert_eq!(r.read_cstr().unwrap(), b"key");
        // "héllo" is six UTF-8 bytes plus the terminator
        assert_eq!(r.read_i32().unwrap(), 7);
        assert_eq!(r.read_cstr().unwrap(), "héllo".as_bytes());
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_patch_reserved_length() {
        let mut w = BytesWriter::new();
        let at = w.reserve_i32();
        w.push_bytes(&[1, 2, 3]);
        let len = w.len() as i32;
        w.patch_i32(at, len);
        assert_eq!(w.finalize(), vec![7, 0, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn test_reader_out_of_bounds() {
        let mut r = BytesReader::new(&[1, 2]);
        assert_eq!(r.read_i32(), Err(Error::unexpected_eof(4, 2)));
        assert_eq!(r.position(), 0);
        assert_eq!(r.read_u16().unwrap(), 0x0201);
        assert!(r.read_u8().is_err());

        let mut r = BytesReader::new(b"no terminator");
        assert!(r.read_cstr().is_err());
    }

    #[test]
    fn test_wire_len_limit() {
        assert_eq!(wire_len(0), 0);
        assert_eq!(wire_len(i32::MAX as usize), i32::MAX);
    }

    #[test]
    #[should_panic(expected = "exceeds the i32::MAX limit")]
    fn test_wire_len_rejects_oversized() {
        let _ = wire_len(i32::MAX as usize + 1);
    }

    #[test]
    fn test_read_u24() {
        let mut r = BytesReader::new(&[0xFF, 0xFF, 0xFF, 0x01, 0x00, 0x00]);
        assert_eq!(r.read_u24().unwrap(), 0x00FF_FFFF);
        assert_eq!(r.read_u24().unwrap(), 1);
    }
}
