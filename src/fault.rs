// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fatal faults and the single exit path for them.
//!
//! Nothing here is recoverable. A usage error means the caller broke the
//! contract; an integrity failure means something outside the stack wrote
//! where it shouldn't. Either way the state can't be trusted, so [`halt`] logs
//! the fault and panics. With `panic = "abort"` (the release profile) that
//! ends the process.

use std::fmt;
use std::panic::Location;

use crate::verify::IntegrityError;

/// Where in a guarded operation an integrity check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Place {
    /// Entry check: the stack was already corrupt when the operation started.
    Beginning,
    /// Exit check: the operation itself left the stack corrupt.
    End,
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Beginning => f.write_str("beginning"),
            Place::End => f.write_str("end"),
        }
    }
}

/// A fatal condition detected by the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Contract violation by the caller (pop on empty, index out of range).
    Usage {
        operation: &'static str,
        condition: String,
    },
    /// Growth could not reserve the requested number of slots.
    Allocation {
        operation: &'static str,
        requested: usize,
    },
    /// The invariant failed around a guarded operation.
    Corruption {
        operation: &'static str,
        place: Place,
        error: IntegrityError,
    },
    /// Clone or take was asked to read from a stack that already fails its invariant.
    InvalidSource {
        operation: &'static str,
        error: IntegrityError,
    },
}

impl Fault {
    pub fn operation(&self) -> &'static str {
        match self {
            Fault::Usage { operation, .. }
            | Fault::Allocation { operation, .. }
            | Fault::Corruption { operation, .. }
            | Fault::InvalidSource { operation, .. } => operation,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Fault::Usage { .. } => "usage",
            Fault::Allocation { .. } => "allocation",
            Fault::Corruption { .. } => "corruption",
            Fault::InvalidSource { .. } => "invalid-source",
        }
    }

    /// The integrity error behind this fault, if any.
    pub fn integrity_error(&self) -> Option<&IntegrityError> {
        match self {
            Fault::Corruption { error, .. } | Fault::InvalidSource { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Usage {
                operation,
                condition,
            } => write!(f, "usage error in `{}`: {}", operation, condition),
            Fault::Allocation {
                operation,
                requested,
            } => write!(
                f,
                "allocation failure in `{}`: unable to reserve {} slots",
                operation, requested
            ),
            Fault::Corruption {
                operation,
                place,
                error,
            } => write!(
                f,
                "integrity failure at {} of `{}`: {}",
                place, operation, error
            ),
            Fault::InvalidSource { operation, error } => {
                write!(f, "source of `{}` is not ok: {}", operation, error)
            }
        }
    }
}

impl std::error::Error for Fault {}

/// Log `fault` and stop.
///
/// The panic message carries the fault text and the caller's location, so a
/// `#[should_panic(expected = "...")]` test can match on either.
#[cold]
#[inline(never)]
#[track_caller]
pub fn halt(fault: Fault) -> ! {
    let location = Location::caller();
    tracing::error!(
        kind = fault.kind(),
        operation = fault.operation(),
        check = fault.integrity_error().map_or("none", IntegrityError::check_name),
        %location,
        "{}",
        fault
    );
    panic!("{} (at {})", fault, location)
}
