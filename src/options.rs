//! Configuration for [`ObjectIdGenerator`](crate::ObjectIdGenerator).
//!
//! By default every identifier field that is not time-based is derived from
//! the environment: the host fingerprint from the host name, the process id
//! from the OS and the counter seed from the thread RNG. Each of them can be
//! pinned, which is useful for reproducible output and for exercising the
//! counter wraparound.
//!
//! ## Examples
//!
//! ```rust
//! use bison::{GeneratorOptions, ObjectIdGenerator};
//!
//! let options = GeneratorOptions::new()
//!     .with_fingerprint([0xAA, 0xBB, 0xCC])
//!     .with_process_id(7)
//!     .with_counter_seed(41);
//!
//! let generator = ObjectIdGenerator::new(options);
//! let id = generator.generate();
//! assert_eq!(id.fingerprint(), [0xAA, 0xBB, 0xCC]);
//! assert_eq!(id.process_id(), 7);
//! assert_eq!(id.counter(), 42);
//! ```

/// Configuration options for an identifier generator.
///
/// Fields left as `None` are derived when the generator is built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub fingerprint: Option<[u8; 3]>,
    pub process_id: Option<u16>,
    pub counter_seed: Option<u32>,
}

impl GeneratorOptions {
    /// Creates options that derive everything from the host and process.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bison::GeneratorOptions;
    ///
    /// let options = GeneratorOptions::new();
    /// assert!(options.fingerprint.is_none());
    /// assert!(options.counter_seed.is_none());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the three host bytes instead of hashing the host name.
    #[must_use]
    pub fn with_fingerprint(mut self, fingerprint: [u8; 3]) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    /// Pins the process id bytes.
    #[must_use]
    pub fn with_process_id(mut self, process_id: u16) -> Self {
        self.process_id = Some(process_id);
        self
    }

    /// Sets the counter value the first identifier increments from.
    ///
    /// Only the low 24 bits are kept, whether the seed comes through here or
    /// through the public field. A seed of `0x00FF_FFFF` makes the
    /// very first identifier wrap to a counter of 1.
    #[must_use]
    pub fn with_counter_seed(mut self, seed: u32) -> Self {
        self.counter_seed = Some(seed & crate::oid::COUNTER_MAX);
        self
    }
}
