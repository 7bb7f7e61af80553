//! Hash Function Module
//!
//! Seeded 32-bit MurmurHash2 mapping opaque byte keys to bucket indices.
//! Dispersion only; the output is not stable across seeds and is not
//! meant to resist adversarial keys.

use std::time::{SystemTime, UNIX_EPOCH};

const MULTIPLIER: u32 = 0x5bd1_e995;
const SHIFT: u32 = 24;

// == Murmur ==
/// Computes the MurmurHash2 of `key` under `seed`.
///
/// Words are read little-endian so results do not depend on the host.
pub fn murmur2(seed: u32, key: &[u8]) -> u32 {
    let mut h = seed ^ (key.len() as u32);

    let mut words = key.chunks_exact(4);
    for word in &mut words {
        let mut k = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
        k = k.wrapping_mul(MULTIPLIER);
        k ^= k >> SHIFT;
        k = k.wrapping_mul(MULTIPLIER);
        h = h.wrapping_mul(MULTIPLIER);
        h ^= k;
    }

    let tail = words.remainder();
    if tail.len() == 3 {
        h ^= u32::from(tail[2]) << 16;
    }
    if tail.len() >= 2 {
        h ^= u32::from(tail[1]) << 8;
    }
    if !tail.is_empty() {
        h ^= u32::from(tail[0]);
        h = h.wrapping_mul(MULTIPLIER);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(MULTIPLIER);
    h ^= h >> 15;
    h
}

// == Bucket Index ==
/// Maps `key` to a bucket in `[0, bucket_count)`.
///
/// `bucket_count` must be non-zero; the table guarantees this at creation.
pub fn bucket_index(seed: u32, key: &[u8], bucket_count: usize) -> usize {
    debug_assert!(bucket_count > 0);
    murmur2(seed, key) as usize % bucket_count
}

// == Clock Seed ==
/// Derives a per-cache seed from the wall clock (seconds since the epoch).
///
/// A clock set before the epoch yields seed 0 rather than failing.
pub fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as u32)
        .unwrap_or_default()
}
