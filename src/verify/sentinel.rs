// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Guard words around the element region.
//!
//! The trailing word is the same constant for every stack. The leading word is
//! derived from the stack's instance id, so a buffer that somehow ends up owned
//! by the wrong stack (or a stale copy of one) fails the check too.

use std::sync::atomic::{AtomicU64, Ordering};

/// Value of the word immediately after the last reserved slot.
pub const TRAILING_CANARY: u32 = 0xBEDA_BEDA;

/// Mixed into the instance id to form the leading word.
///
/// Keeps small ids (1, 2, 3...) away from zero and from each other's bit patterns.
pub const LEADING_SALT: u64 = 0xC0FF_EE00_BEDA_0000;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Hand out a process-unique instance id.
pub fn next_instance() -> u64 {
    NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed)
}

/// The leading word a stack with this instance id must carry.
#[inline]
pub const fn leading_marker(instance: u64) -> u64 {
    LEADING_SALT ^ instance
}

/// The pair of guard words stored outside the element slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentinels {
    pub leading: u64,
    pub trailing: u32,
}

impl Sentinels {
    /// Correct sentinels for `instance`.
    pub const fn stamped(instance: u64) -> Self {
        Self {
            leading: leading_marker(instance),
            trailing: TRAILING_CANARY,
        }
    }

    /// Both words cleared, as in a freshly reserved region.
    pub const fn cleared() -> Self {
        Self {
            leading: 0,
            trailing: 0,
        }
    }

    pub fn leading_ok(&self, instance: u64) -> bool {
        self.leading == leading_marker(instance)
    }

    pub fn trailing_ok(&self) -> bool {
        self.trailing == TRAILING_CANARY
    }
}
