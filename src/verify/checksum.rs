// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Rolling checksum over the live elements and the element count.
//!
//! Polynomial rolling hash, element by element in index order:
//!
//! ```text
//! acc_0     = 0
//! acc_{i+1} = (acc_i * HASH_MUL + hash(e_i) mod HASH_MOD) mod HASH_MOD
//! checksum  = acc_n XOR n
//! ```
//!
//! Position-weighted, so reordering changes the result. Folding in `n` catches
//! truncation to a prefix whose partial sum happens to collide. The arithmetic
//! never overflows: `acc < HASH_MOD < 2^30`, so `acc * HASH_MUL < 2^35`.
//!
//! Recomputed in full after every mutation. That is O(size) per push/pop and
//! intentional: an incremental update would trust the very bytes we're checking.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Multiplier applied to the accumulator before each element.
pub const HASH_MUL: u64 = 29;

/// Prime modulus keeping the accumulator bounded.
pub const HASH_MOD: u64 = 1_000_000_007;

/// Element hash used by the checksum.
pub type HashFn<T> = fn(&T) -> u64;

/// Default element hash: the type's `Hash` impl through `DefaultHasher`.
///
/// `DefaultHasher::new()` uses fixed keys, so the result is stable for the life
/// of the process, which is all a checksum needs.
pub fn default_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// One step of the rolling hash.
#[inline]
pub const fn mix(acc: u64, element_hash: u64) -> u64 {
    let acc = (acc * HASH_MUL) % HASH_MOD;
    (acc + element_hash % HASH_MOD) % HASH_MOD
}

/// Checksum of `elements` under `hash`.
pub fn compute<T>(elements: &[T], hash: HashFn<T>) -> u64 {
    let acc = elements.iter().fold(0, |acc, e| mix(acc, hash(e)));
    acc ^ elements.len() as u64
}
