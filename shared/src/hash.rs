//! Stable 32-bit hashing used for trace entries.
//!
//! Every peer must derive identical hashes from identical inputs, regardless
//! of platform or process, so neither `std`'s randomly-seeded hasher nor
//! pointer-width dependent hashers can be used here.

use crate::TraceHash;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;
const GOLDEN_RATIO: i32 = 0x9e37_79b9_u32 as i32;

/// 32-bit FNV-1a over the UTF-8 bytes of `value`
pub fn hash_str(value: &str) -> TraceHash {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in value.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash as TraceHash
}

/// Folds `value` into `seed`
pub fn hash_combine(seed: TraceHash, value: TraceHash) -> TraceHash {
    seed ^ value
        .wrapping_add(GOLDEN_RATIO)
        .wrapping_add(seed.wrapping_shl(6))
        .wrapping_add(seed >> 2)
}

/// Folds every value of `values` into `seed`, left to right
pub fn hash_combine_all(seed: TraceHash, values: &[TraceHash]) -> TraceHash {
    values
        .iter()
        .fold(seed, |acc, value| hash_combine(acc, *value))
}
