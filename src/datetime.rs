//! Fixed-width payload types: UTC datetimes, logical timestamps and decimal128.

use chrono::{DateTime, TimeZone, Utc};
use std::fmt;

/// A UTC instant with millisecond resolution, stored as milliseconds since
/// the Unix epoch.
///
/// # Examples
///
/// ```rust
/// use bison::UtcDateTime;
/// use chrono::{TimeZone, Utc};
///
/// let instant = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
/// let date = UtcDateTime::from(instant);
/// assert_eq!(date.timestamp_millis(), 1_705_314_600_000);
/// assert_eq!(date.to_chrono(), Some(instant));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct UtcDateTime(i64);

impl UtcDateTime {
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        UtcDateTime(millis)
    }

    /// The current time, truncated to whole milliseconds.
    #[must_use]
    pub fn now() -> Self {
        UtcDateTime(Utc::now().timestamp_millis())
    }

    #[inline]
    #[must_use]
    pub const fn timestamp_millis(self) -> i64 {
        self.0
    }

    /// Converts to a chrono datetime, or `None` if the instant is outside
    /// chrono's representable range.
    #[must_use]
    pub fn to_chrono(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0).single()
    }
}

impl From<DateTime<Utc>> for UtcDateTime {
    fn from(value: DateTime<Utc>) -> Self {
        UtcDateTime(value.timestamp_millis())
    }
}

impl fmt::Display for UtcDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_chrono() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
            None => write!(f, "{}ms", self.0),
        }
    }
}

/// A 64-bit logical timestamp: seconds plus an ordinal within that second.
///
/// On the wire it is a single little-endian `u64` whose high half is `time`
/// and low half is `increment`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Timestamp {
    pub time: u32,
    pub increment: u32,
}

impl Timestamp {
    #[must_use]
    pub const fn new(time: u32, increment: u32) -> Self {
        Timestamp { time, increment }
    }

    #[must_use]
    pub const fn from_u64(value: u64) -> Self {
        Timestamp {
            time: (value >> 32) as u32,
            increment: value as u32,
        }
    }

    #[must_use]
    pub const fn as_u64(self) -> u64 {
        ((self.time as u64) << 32) | self.increment as u64
    }
}

/// A 128-bit IEEE-754 decimal carried as its 16 raw bytes.
///
/// The crate does no decimal arithmetic; it only preserves the bit pattern.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Decimal128 {
    bytes: [u8; 16],
}

impl Decimal128 {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Decimal128 { bytes }
    }

    /// Builds the value from its two 64-bit halves, low half first on the wire.
    #[must_use]
    pub fn from_halves(low: u64, high: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&low.to_le_bytes());
        bytes[8..].copy_from_slice(&high.to_le_bytes());
        Decimal128 { bytes }
    }

    #[must_use]
    pub const fn bytes(&self) -> [u8; 16] {
        self.bytes
    }

    #[must_use]
    pub fn low(&self) -> u64 {
        let mut half = [0u8; 8];
        half.copy_from_slice(&self.bytes[..8]);
        u64::from_le_bytes(half)
    }

    #[must_use]
    pub fn high(&self) -> u64 {
        let mut half = [0u8; 8];
        half.copy_from_slice(&self.bytes[8..]);
        u64::from_le_bytes(half)
    }
}

impl fmt::Debug for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal128({})", hex::encode(self.bytes))
    }
}
