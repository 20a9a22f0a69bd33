//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::panic::{self, AssertUnwindSafe};

use guardstack::{GuardedStack, IntegrityError};

// Re-export canonical fixtures from guardstack::testing
pub use guardstack::testing::{diagnostic_stack, filled_stack, release_stack};

// ============================================================================
// FAULT CAPTURE
// ============================================================================

/// Run `f`, expecting it to halt. Returns the halt message.
///
/// Panics (failing the test) if `f` returns normally.
pub fn expect_halt<F: FnOnce()>(f: F) -> String {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => panic!("expected the operation to halt, but it returned"),
        Err(payload) => {
            if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = payload.downcast_ref::<&str>() {
                s.to_string()
            } else {
                String::from("<non-string panic payload>")
            }
        }
    }
}

/// Assert that `message` is an entry-check integrity failure of `operation`
/// caused by the `check` named check.
pub fn assert_corruption_at_entry(message: &str, operation: &str, check: &str) {
    let prefix = format!("integrity failure at beginning of `{}`", operation);
    assert!(
        message.starts_with(&prefix),
        "expected '{}...', got '{}'",
        prefix,
        message
    );
    assert!(
        message.contains(check),
        "expected '{}' in '{}'",
        check,
        message
    );
}

// ============================================================================
// STACK ASSERTIONS
// ============================================================================

/// Assert `stack` passes every check, with a dump on failure.
pub fn assert_healthy<T: std::fmt::Debug>(stack: &GuardedStack<T>) {
    if let Err(e) = stack.verify() {
        panic!("stack is not ok: {}\n{}", e, stack.report("test assertion"));
    }
}

/// Assert the first failed check is the expected kind.
pub fn assert_fails_check<T: std::fmt::Debug>(stack: &GuardedStack<T>, check: &str) {
    match stack.verify() {
        Ok(()) => panic!("expected '{}' failure, stack is ok", check),
        Err(e) => assert_eq!(e.check_name(), check, "wrong check failed: {}", e),
    }
}

/// Checksum mismatch, regardless of values.
pub fn is_checksum_mismatch(result: Result<(), IntegrityError>) -> bool {
    matches!(result, Err(IntegrityError::ChecksumMismatch { .. }))
}
