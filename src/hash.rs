//! Hash primitives used for bucket-based partition assignment.
//!
//! The partitioner only needs the low bits of a digest, so a hasher reports
//! the trailing 64 bits of its digest as a big-endian integer. Any modulus
//! that divides `2^64` (the bucket space is `2^27`) then reduces exactly as
//! the full digest would.

use sha1::{Digest, Sha1};

/// Source of stable hash values for grouping keys.
///
/// Implemented by [`Sha1Buckets`] for real assignments and by any
/// `Fn(&[u8]) -> u64` closure, which lets tests pin bucket values directly.
pub trait BucketHasher: Send + Sync {
    /// Trailing 64 bits of the digest of `key`, read big-endian.
    fn hash_key(&self, key: &[u8]) -> u64;
}

/// SHA-1 based hasher; the default for partition assignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sha1Buckets;

impl BucketHasher for Sha1Buckets {
    fn hash_key(&self, key: &[u8]) -> u64 {
        let digest = Sha1::digest(key);
        trailing_u64(&digest)
    }
}

impl<F> BucketHasher for F
where
    F: Fn(&[u8]) -> u64 + Send + Sync,
{
    fn hash_key(&self, key: &[u8]) -> u64 {
        self(key)
    }
}

fn trailing_u64(digest: &[u8]) -> u64 {
    let start = digest.len().saturating_sub(8);
    digest[start..]
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))
}
