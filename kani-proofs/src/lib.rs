// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Kani model checking proofs for guardstack arithmetic.
//!
//! This standalone crate extracts the checksum step and the capacity growth
//! rule and proves them for every input using Kani.
//!
//! Run with: `cargo kani`
//!
//! ## Verified Properties
//!
//! 1. **No overflow**: `mix` never overflows for any accumulator it can see
//! 2. **Closure**: `mix` always lands back in `[0, HASH_MOD)`
//! 3. **Growth**: `next_capacity` always makes room for one more element
//!
//! `cargo xtask verify` checks that the constants here match
//! `src/verify/checksum.rs`.

/// Polynomial multiplier.
pub const HASH_MUL: u64 = 29;

/// Prime modulus.
pub const HASH_MOD: u64 = 1_000_000_007;

// ============================================================================
// CHECKSUM STEP (copied from src/verify/checksum.rs)
// ============================================================================

/// One step of the rolling hash.
pub const fn mix(acc: u64, element_hash: u64) -> u64 {
    let acc = (acc * HASH_MUL) % HASH_MOD;
    (acc + element_hash % HASH_MOD) % HASH_MOD
}

// ============================================================================
// GROWTH RULE (mirrors GuardedStack::grow)
// ============================================================================

/// Capacity after one growth step, or `None` if doubling overflows.
pub fn next_capacity(previous: usize) -> Option<usize> {
    if previous == 0 {
        Some(1)
    } else {
        previous.checked_mul(2)
    }
}

// ============================================================================
// KANI MODEL CHECKING PROOFS
// ============================================================================

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// mix never overflows and stays in the field, for any reachable accumulator.
    #[kani::proof]
    fn verify_mix_closed() {
        let acc: u64 = kani::any_where(|&a| a < HASH_MOD);
        let element_hash: u64 = kani::any();

        let next = mix(acc, element_hash);
        kani::assert(next < HASH_MOD, "mix must stay below HASH_MOD");
    }

    /// Starting from zero, two steps stay in the field.
    #[kani::proof]
    fn verify_mix_chain_from_zero() {
        let a: u64 = kani::any();
        let b: u64 = kani::any();
        let acc = mix(mix(0, a), b);
        kani::assert(acc < HASH_MOD, "chained mix must stay below HASH_MOD");
    }

    /// Growth from a full stack always leaves a free slot.
    #[kani::proof]
    fn verify_growth_makes_room() {
        let previous: usize = kani::any();
        match next_capacity(previous) {
            Some(next) => {
                kani::assert(next > previous, "growth must strictly increase capacity");
                kani::assert(
                    previous == 0 || next == previous * 2,
                    "growth from a non-empty buffer must double",
                );
            }
            None => {
                kani::assert(previous > usize::MAX / 2, "only huge capacities overflow");
            }
        }
    }
}
