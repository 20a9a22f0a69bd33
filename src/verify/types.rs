// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error type for integrity violations.
//!
//! Each variant corresponds to one clause of the stack invariant, in the order
//! the checks run:
//!
//! | Variant               | Clause                                   | Cost     |
//! |-----------------------|------------------------------------------|----------|
//! | `SizeExceedsCapacity` | `size <= capacity`                       | O(1)     |
//! | `MissingBuffer`       | `size > 0` implies a buffer              | O(1)     |
//! | `ShadowSizeMismatch`  | `shadow_size == size`                    | O(1)     |
//! | `SlotCountMismatch`   | constructed slots == `size`              | O(1)     |
//! | `LeadingSentinel`     | leading word == instance marker          | O(1)     |
//! | `TrailingSentinel`    | trailing word == `TRAILING_CANARY`       | O(1)     |
//! | `ChecksumMismatch`    | stored checksum == recomputed checksum   | O(size)  |

use std::fmt;

/// Error type for invariant violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityError {
    /// More elements than reserved slots.
    SizeExceedsCapacity { size: usize, capacity: usize },
    /// Non-empty stack with no backing buffer.
    MissingBuffer { size: usize },
    /// The redundant copy of `size` disagrees with `size`.
    ShadowSizeMismatch { size: usize, shadow: usize },
    /// The buffer holds a different number of constructed elements than `size` says.
    SlotCountMismatch { size: usize, slots: usize },
    /// The word before the element region was overwritten.
    LeadingSentinel { expected: u64, found: u64 },
    /// The word after the element region was overwritten.
    TrailingSentinel { expected: u32, found: u32 },
    /// Element contents or count changed without going through the stack.
    ChecksumMismatch { stored: u64, computed: u64 },
}

impl IntegrityError {
    /// Short name of the failed check, stable enough for log filtering.
    pub fn check_name(&self) -> &'static str {
        match self {
            IntegrityError::SizeExceedsCapacity { .. } => "size-capacity",
            IntegrityError::MissingBuffer { .. } => "buffer",
            IntegrityError::ShadowSizeMismatch { .. } => "shadow-size",
            IntegrityError::SlotCountMismatch { .. } => "slot-count",
            IntegrityError::LeadingSentinel { .. } => "leading-sentinel",
            IntegrityError::TrailingSentinel { .. } => "trailing-sentinel",
            IntegrityError::ChecksumMismatch { .. } => "checksum",
        }
    }

    /// Whether this violation can only be seen with diagnostics enabled.
    pub fn is_diagnostic(&self) -> bool {
        matches!(
            self,
            IntegrityError::ShadowSizeMismatch { .. }
                | IntegrityError::LeadingSentinel { .. }
                | IntegrityError::TrailingSentinel { .. }
                | IntegrityError::ChecksumMismatch { .. }
        )
    }
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityError::SizeExceedsCapacity { size, capacity } => {
                write!(f, "size {} > capacity {}", size, capacity)
            }
            IntegrityError::MissingBuffer { size } => {
                write!(f, "size {} but no buffer is allocated", size)
            }
            IntegrityError::ShadowSizeMismatch { size, shadow } => {
                write!(f, "shadow size {} != size {}", shadow, size)
            }
            IntegrityError::SlotCountMismatch { size, slots } => {
                write!(f, "buffer holds {} elements but size is {}", slots, size)
            }
            IntegrityError::LeadingSentinel { expected, found } => {
                write!(
                    f,
                    "leading sentinel {:#018x} != expected {:#018x}",
                    found, expected
                )
            }
            IntegrityError::TrailingSentinel { expected, found } => {
                write!(
                    f,
                    "trailing sentinel {:#010x} != expected {:#010x}",
                    found, expected
                )
            }
            IntegrityError::ChecksumMismatch { stored, computed } => {
                write!(
                    f,
                    "checksum mismatch: stored {} but contents hash to {}",
                    stored, computed
                )
            }
        }
    }
}

impl std::error::Error for IntegrityError {}
