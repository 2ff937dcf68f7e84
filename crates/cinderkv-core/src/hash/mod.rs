//! Key fingerprinting.
//!
//! The key table selects buckets with MurmurHash3 (x86_32 variant), the same
//! fingerprint the wire-compatible implementations of this engine use. It is
//! fast and well-distributed; it is not cryptographic.

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// Compute the 32-bit MurmurHash3 (x86_32) of `data` with the given seed.
///
/// # Algorithm
///
/// ```text
/// h = seed
/// for each 4-byte little-endian block k:
///     k *= c1; k = rotl(k, 15); k *= c2
///     h ^= k; h = rotl(h, 13); h = h * 5 + 0xe6546b64
/// mix the 0..=3 tail bytes the same way (no rotation of h)
/// h ^= len; h = fmix32(h)
/// ```
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    let mut h = seed;

    let mut chunks = data.chunks_exact(4);
    for block in chunks.by_ref() {
        let mut k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        k = k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
        h ^= k;
        h = h.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        let mut k: u32 = 0;
        for (i, &b) in tail.iter().enumerate() {
            k |= u32::from(b) << (8 * i);
        }
        k = k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
        h ^= k;
    }

    h ^= data.len() as u32;
    fmix32(h)
}

/// Final avalanche mix.
#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^ (h >> 16)
}
