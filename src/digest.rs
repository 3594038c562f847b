//! MD5 digest used to fingerprint the generating host.
//!
//! Not a general hashing facility: the only caller derives the three host
//! bytes of an [`ObjectId`](crate::ObjectId).

use md5::{Digest, Md5};

/// Computes the 16-byte MD5 digest of `data`.
pub(crate) fn md5(data: &[u8]) -> [u8; 16] {
    let mut out = [0u8; 16];
    out.copy_from_slice(&Md5::digest(data));
    out
}
