// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts for the stack's own bookkeeping.
//!
//! The invariant check (`GuardedStack::verify`) catches damage done *to* the
//! stack from outside. These contracts catch mistakes *in* the stack: a growth
//! step that didn't double, a push that didn't count. They:
//!
//! 1. Are **zero-cost in release builds** (use `debug_assert!`)
//! 2. Fire at the line that broke the rule, not at the next entry check
//!
//! # INVARIANTS (DO NOT REMOVE THESE CHECKS)
//!
//! | Contract Function        | Rule                                        |
//! |--------------------------|---------------------------------------------|
//! | `check_growth`           | capacity doubles, starting from 1           |
//! | `check_capacity_kept`    | capacity never shrinks                      |
//! | `check_push_counted`     | push adds exactly one element               |
//! | `check_pop_counted`      | pop removes exactly one element             |
//! | `check_clone_faithful`   | a copy keeps size, capacity and checksum    |

// ============================================================================
// COMPILE-TIME ASSERTIONS (evaluated at build time)
// ============================================================================

/// Static assertions over the checksum constants.
/// If these fail, the crate won't build.
const _: () = {
    use crate::verify::checksum::{HASH_MOD, HASH_MUL};

    // INVARIANT: multiplier is a proper residue
    assert!(HASH_MUL > 1 && HASH_MUL < HASH_MOD);

    // INVARIANT: mix() can't overflow
    // acc <= HASH_MOD - 1, element term <= HASH_MOD - 1
    assert!((HASH_MOD - 1) * HASH_MUL < u64::MAX - HASH_MOD);

    // INVARIANT: accumulator fits below 2^30 so xor with size stays readable
    assert!(HASH_MOD < (1 << 30));
};

// ============================================================================
// CAPACITY CONTRACTS
// ============================================================================

/// Check one growth step.
///
/// # Panics (debug builds only)
/// Panics unless `next == 1` for an unallocated stack or `next == 2 * previous`.
#[inline]
pub fn check_growth(previous: usize, next: usize) {
    let expected = if previous == 0 { 1 } else { previous * 2 };
    debug_assert_eq!(
        next, expected,
        "Contract violation: growth from {} produced {} (expected {})",
        previous, next, expected
    );
}

/// Check that an operation other than `take` left capacity at least where it was.
#[inline]
pub fn check_capacity_kept(before: usize, after: usize) {
    debug_assert!(
        after >= before,
        "Contract violation: capacity shrank from {} to {}",
        before,
        after
    );
}

// ============================================================================
// SIZE CONTRACTS
// ============================================================================

/// Check that a push added exactly one element.
#[inline]
pub fn check_push_counted(before: usize, after: usize) {
    debug_assert_eq!(
        after,
        before + 1,
        "Contract violation: push moved size from {} to {}",
        before,
        after
    );
}

/// Check that a pop removed exactly one element.
#[inline]
pub fn check_pop_counted(before: usize, after: usize) {
    debug_assert!(
        before > 0 && after == before - 1,
        "Contract violation: pop moved size from {} to {}",
        before,
        after
    );
}

// ============================================================================
// COPY CONTRACTS
// ============================================================================

/// Check that a deep copy reproduced the source's shape and contents.
///
/// The checksum covers contents, so equal checksums under the same hash
/// function stand in for an element-by-element comparison.
#[inline]
pub fn check_clone_faithful(
    source: (usize, usize, u64),
    copy: (usize, usize, u64),
    diagnostics: bool,
) {
    let (source_size, source_capacity, source_checksum) = source;
    let (copy_size, copy_capacity, copy_checksum) = copy;

    debug_assert_eq!(
        copy_size, source_size,
        "Contract violation: copy has size {} (source {})",
        copy_size, source_size
    );
    debug_assert_eq!(
        copy_capacity, source_capacity,
        "Contract violation: copy has capacity {} (source {})",
        copy_capacity, source_capacity
    );
    if diagnostics {
        debug_assert_eq!(
            copy_checksum, source_checksum,
            "Contract violation: copy checksum {} != source checksum {}",
            copy_checksum, source_checksum
        );
    }
}
