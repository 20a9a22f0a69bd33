// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scope guard that brackets an operation with invariant checks.
//!
//! ```ignore
//! pub fn push(&mut self, value: T) {
//!     let mut stack = Sentry::enter(self, "push"); // checks on entry
//!     stack.push_raw(value);
//! }                                                // checks again on drop
//! ```
//!
//! The sentry derefs to whatever it wraps, so the body of the operation reads
//! the same as unguarded code. The exit check lives in `Drop`, which means it
//! also runs on early returns and while unwinding from a halt raised inside
//! the operation. In the unwinding case it reports but doesn't panic again.

use std::io::{self, Write};
use std::ops::{Deref, DerefMut};

use crate::fault::{halt, Fault, Place};
use crate::verify::IntegrityError;

/// Reason string passed to `dump_to` when a guarded check fails.
pub const INTEGRITY_FAILURE: &str = "integrity failure";

/// Anything a [`Sentry`] can watch.
pub trait Audited {
    /// Run every invariant check, returning the first failure.
    fn verify(&self) -> Result<(), IntegrityError>;

    /// Write a human-readable report of the full internal state.
    fn dump_to(&self, out: &mut dyn Write, reason: &str) -> io::Result<()>;
}

/// Entry/exit invariant check bound to one operation call.
pub struct Sentry<R>
where
    R: Deref,
    R::Target: Audited,
{
    target: R,
    operation: &'static str,
}

impl<R> Sentry<R>
where
    R: Deref,
    R::Target: Audited,
{
    /// Check `target` and bind to it for the rest of the scope.
    #[track_caller]
    pub fn enter(target: R, operation: &'static str) -> Self {
        if let Err(error) = target.verify() {
            report(&*target, operation, Place::Beginning, &error);
            halt(Fault::Corruption {
                operation,
                place: Place::Beginning,
                error,
            });
        }
        Self { target, operation }
    }
}

impl<R> Deref for Sentry<R>
where
    R: Deref,
    R::Target: Audited,
{
    type Target = R::Target;

    fn deref(&self) -> &Self::Target {
        &self.target
    }
}

impl<R> DerefMut for Sentry<R>
where
    R: DerefMut,
    R::Target: Audited,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.target
    }
}

impl<R> Drop for Sentry<R>
where
    R: Deref,
    R::Target: Audited,
{
    fn drop(&mut self) {
        let Err(error) = self.target.verify() else {
            return;
        };
        report(&*self.target, self.operation, Place::End, &error);
        if std::thread::panicking() {
            return;
        }
        halt(Fault::Corruption {
            operation: self.operation,
            place: Place::End,
            error,
        });
    }
}

/// Log the failure and dump the object to stderr. Never fails.
fn report<S>(target: &S, operation: &'static str, place: Place, error: &IntegrityError)
where
    S: Audited + ?Sized,
{
    tracing::error!(
        operation,
        %place,
        check = error.check_name(),
        diagnostic = error.is_diagnostic(),
        "invariant check failed"
    );

    let stderr = io::stderr();
    let mut out = stderr.lock();
    let _ = writeln!(out, "Object failed during ok(): {}", error);
    let _ = writeln!(out, "Function: {}", operation);
    let _ = writeln!(out, "Place: {}", place);
    let _ = target.dump_to(&mut out, INTEGRITY_FAILURE);
    let _ = out.flush();
}
