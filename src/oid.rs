//! 12-byte globally distinguishable identifiers.
//!
//! ## Layout
//!
//! ```text
//! 0       4        7     9        12
//! | time  | host   | pid | counter |
//! ```
//!
//! - **time**: Unix seconds, `u32` little-endian
//! - **host**: first three bytes of the MD5 digest of the host name
//! - **pid**: OS process id truncated to `u16`, little-endian
//! - **counter**: low three bytes of a per-generator counter, little-endian
//!
//! The counter is incremented under a lock on every call. It starts from a
//! random seed and wraps from `0xFF_FFFF` back to 1, never to 0.
//!
//! ## Examples
//!
//! ```rust
//! use bison::ObjectId;
//!
//! let a = ObjectId::new();
//! let b = ObjectId::new();
//! assert_ne!(a, b);
//!
//! let parsed: ObjectId = a.to_hex().parse().unwrap();
//! assert_eq!(parsed, a);
//! ```

use crate::digest::md5;
use crate::{Error, GeneratorOptions, Result, UtcDateTime};
use chrono::Utc;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Largest value the 3-byte counter field can hold.
pub(crate) const COUNTER_MAX: u32 = 0x00FF_FFFF;

static HOST_FINGERPRINT: Lazy<[u8; 3]> = Lazy::new(host_fingerprint);

static PROCESS_ID: Lazy<u16> = Lazy::new(|| std::process::id() as u16);

static DEFAULT_GENERATOR: Lazy<ObjectIdGenerator> =
    Lazy::new(|| ObjectIdGenerator::new(GeneratorOptions::default()));

/// An immutable 12-byte identifier.
///
/// Equality, ordering and hashing all follow the raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    bytes: [u8; 12],
}

impl ObjectId {
    /// Generates a fresh identifier from the process-wide generator.
    #[must_use]
    pub fn new() -> Self {
        DEFAULT_GENERATOR.generate()
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        ObjectId { bytes }
    }

    /// Parses the 24-character hex rendering produced by [`ObjectId::to_hex`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidObjectId`] for non-hex input or a decoded
    /// length other than 12 bytes.
    pub fn parse_str(s: impl AsRef<str>) -> Result<Self> {
        let decoded =
            hex::decode(s.as_ref()).map_err(|e| Error::invalid_object_id(&e.to_string()))?;
        let bytes: [u8; 12] = decoded.as_slice().try_into().map_err(|_| {
            Error::invalid_object_id(&format!("expected 12 bytes, got {}", decoded.len()))
        })?;
        Ok(ObjectId { bytes })
    }

    #[must_use]
    pub const fn bytes(&self) -> [u8; 12] {
        self.bytes
    }

    /// Lowercase hex, 24 characters.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Creation time in seconds since the Unix epoch.
    #[must_use]
    pub fn timestamp(&self) -> u32 {
        u32::from_le_bytes([self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]])
    }

    /// Creation time as a datetime (second resolution).
    #[must_use]
    pub fn datetime(&self) -> UtcDateTime {
        UtcDateTime::from_millis(i64::from(self.timestamp()) * 1000)
    }

    #[must_use]
    pub fn fingerprint(&self) -> [u8; 3] {
        [self.bytes[4], self.bytes[5], self.bytes[6]]
    }

    #[must_use]
    pub fn process_id(&self) -> u16 {
        u16::from_le_bytes([self.bytes[7], self.bytes[8]])
    }

    #[must_use]
    pub fn counter(&self) -> u32 {
        u32::from_le_bytes([self.bytes[9], self.bytes[10], self.bytes[11], 0])
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[u8; 12]> for ObjectId {
    fn from(bytes: [u8; 12]) -> Self {
        ObjectId { bytes }
    }
}

impl From<ObjectId> for [u8; 12] {
    fn from(id: ObjectId) -> Self {
        id.bytes
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ObjectId::parse_str(s)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl serde::Serialize for ObjectId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Mints [`ObjectId`]s sharing one fingerprint, process id and counter.
///
/// [`ObjectId::new`] uses a lazily created process-wide instance; build your
/// own to pin fields through [`GeneratorOptions`]. `generate` takes `&self`
/// and is safe to call from many threads at once.
pub struct ObjectIdGenerator {
    fingerprint: [u8; 3],
    process_id: u16,
    counter: Mutex<u32>,
}

impl ObjectIdGenerator {
    #[must_use]
    pub fn new(options: GeneratorOptions) -> Self {
        let fingerprint = options.fingerprint.unwrap_or(*HOST_FINGERPRINT);
        let process_id = options.process_id.unwrap_or(*PROCESS_ID);
        let seed = options
            .counter_seed
            .map(|seed| seed & COUNTER_MAX)
            .unwrap_or_else(|| rand::thread_rng().gen_range(0..=COUNTER_MAX));

        ObjectIdGenerator {
            fingerprint,
            process_id,
            counter: Mutex::new(seed),
        }
    }

    /// Mints the next identifier.
    pub fn generate(&self) -> ObjectId {
        let counter = self.next_counter();
        let seconds = Utc::now().timestamp() as u32;

        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&seconds.to_le_bytes());
        bytes[4..7].copy_from_slice(&self.fingerprint);
        bytes[7..9].copy_from_slice(&self.process_id.to_le_bytes());
        bytes[9..12].copy_from_slice(&counter.to_le_bytes()[..3]);
        ObjectId { bytes }
    }

    #[must_use]
    pub fn fingerprint(&self) -> [u8; 3] {
        self.fingerprint
    }

    #[must_use]
    pub fn process_id(&self) -> u16 {
        self.process_id
    }

    fn next_counter(&self) -> u32 {
        let mut counter = self.counter.lock();
        *counter += 1;
        if *counter > COUNTER_MAX {
            *counter = 1;
        }
        *counter
    }
}

impl Default for ObjectIdGenerator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

impl fmt::Debug for ObjectIdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectIdGenerator")
            .field("fingerprint", &hex::encode(self.fingerprint))
            .field("process_id", &self.process_id)
            .finish_non_exhaustive()
    }
}

fn host_fingerprint() -> [u8; 3] {
    match hostname::get() {
        Ok(name) => {
            let name = name.to_string_lossy();
            let digest = md5(name.as_bytes());
            debug!(host = %name, "derived ObjectId host fingerprint");
            [digest[0], digest[1], digest[2]]
        }
        Err(err) => {
            debug!(error = %err, "host name unavailable, using a random ObjectId fingerprint");
            rand::thread_rng().gen()
        }
    }
}
