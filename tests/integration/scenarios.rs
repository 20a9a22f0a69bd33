//! Corruption scenarios, each ending in a halt on the next guarded operation.

use super::common::{
    assert_corruption_at_entry, assert_fails_check, assert_healthy, diagnostic_stack,
    expect_halt, filled_stack,
};

// ============================================================================
// CHECKSUM DETECTION
// ============================================================================

#[test]
fn zeroed_elements_halt_next_push() {
    let mut stack = filled_stack(15, "a".to_string());
    stack.tamper().zero_slot(5).zero_slot(6);

    let message = expect_halt(|| stack.push("hash_sum".to_string()));
    assert_corruption_at_entry(&message, "push", "checksum mismatch");

    // The push never happened.
    assert_eq!(stack.snapshot().size, 15);
    assert!(!stack.snapshot().elements.contains(&"\"hash_sum\"".to_string()));
}

#[test]
fn corruption_after_shrinking_detected_on_push() {
    let mut stack = filled_stack(1000, "aaa".to_string());
    while stack.len() > 15 {
        stack.pop();
    }
    assert_eq!(stack.capacity(), 1000);
    assert_healthy(&stack);

    if let Some(slot) = stack.tamper().slot_mut(7) {
        slot.replace_range(0..1, "z");
    }
    assert_fails_check(&stack, "checksum");

    let message = expect_halt(|| stack.push("aaa".to_string()));
    assert_corruption_at_entry(&message, "push", "checksum mismatch");
}

#[test]
fn checksum_field_overwrite_detected() {
    let mut stack = filled_stack(4, 42u64);
    stack.tamper().set_checksum(0);
    let message = expect_halt(|| {
        stack.top();
    });
    assert_corruption_at_entry(&message, "top", "checksum mismatch");
}

#[test]
fn reordered_elements_detected() {
    let mut stack = diagnostic_stack::<&str>();
    stack.push("first");
    stack.push("second");
    stack.tamper().swap_slots(0, 1);
    assert_fails_check(&stack, "checksum");
}

// ============================================================================
// SENTINEL DETECTION
// ============================================================================

#[test]
fn trailing_sentinel_byte_detected() {
    let mut stack = filled_stack(8, 1i32);
    stack.tamper().poke_trailing_byte(3, 0xFF);
    assert_fails_check(&stack, "trailing-sentinel");

    let message = expect_halt(|| stack.pop());
    assert_corruption_at_entry(&message, "pop", "trailing sentinel");
}

#[test]
fn leading_sentinel_detected() {
    let mut stack = filled_stack(3, 'q');
    stack.tamper().set_leading_sentinel(0xDEAD_BEEF);
    assert_fails_check(&stack, "leading-sentinel");

    let message = expect_halt(|| {
        stack.len();
    });
    assert_corruption_at_entry(&message, "size", "leading sentinel");
}

#[test]
fn sentinels_survive_growth() {
    let mut stack = diagnostic_stack::<u32>();
    for i in 0..1025 {
        stack.push(i);
        assert_healthy(&stack);
    }
    assert_eq!(stack.capacity(), 2048);

    // Corrupting the freshly placed trailing word is still caught.
    stack.tamper().set_trailing_sentinel(0);
    assert_fails_check(&stack, "trailing-sentinel");
}

// ============================================================================
// SIZE FIELD DETECTION
// ============================================================================

#[test]
fn shadow_size_mismatch_detected() {
    let mut stack = filled_stack(6, 0u8);
    stack.tamper().set_shadow_size(2);
    let message = expect_halt(|| stack.push(1));
    assert_corruption_at_entry(&message, "push", "shadow size 2 != size 6");
}

#[test]
fn size_written_alone_detected_by_shadow() {
    let mut stack = filled_stack(6, 0u8);
    stack.tamper().set_size(5);
    assert_fails_check(&stack, "shadow-size");
}

#[test]
fn size_beyond_capacity_detected_first() {
    let mut stack = filled_stack(4, 0u8);
    stack.tamper().set_size(9).set_shadow_size(9);
    assert_fails_check(&stack, "size-capacity");
}

#[test]
fn missing_buffer_detected() {
    let mut stack = filled_stack(2, "x".to_string());
    stack.tamper().drop_buffer();
    let message = expect_halt(|| {
        stack.iter().count();
    });
    assert_corruption_at_entry(&message, "iter", "no buffer");
}

// ============================================================================
// USAGE ERRORS
// ============================================================================

#[test]
fn hundred_pushes_then_extra_pop_halts() {
    let mut stack = diagnostic_stack::<String>();
    for _ in 0..100 {
        stack.push("a".to_string());
    }
    assert_eq!(stack.top(), "a");
    assert_eq!(stack.capacity(), 128);

    for _ in 0..100 {
        stack.pop();
    }
    assert_eq!(stack.size(), 0);
    assert_healthy(&stack);

    let message = expect_halt(|| stack.pop());
    assert!(
        message.starts_with("usage error in `pop`: called on an empty stack"),
        "got '{}'",
        message
    );
    // A usage error leaves the stack intact.
    assert_healthy(&stack);
}

#[test]
fn usage_error_reports_caller_location() {
    let stack = diagnostic_stack::<u8>();
    let message = expect_halt(|| {
        stack.top();
    });
    assert!(message.contains("scenarios.rs"), "got '{}'", message);
}

#[test]
fn index_out_of_range_halts() {
    let stack = filled_stack(2, 5u8);
    assert_eq!(stack[1], 5);
    let message = expect_halt(|| {
        let _value: u8 = stack[2];
    });
    assert!(message.contains("index 2 out of range for size 2"));
}

// ============================================================================
// DUMP
// ============================================================================

#[test]
fn dump_of_corrupt_stack_shows_failure() {
    let mut stack = filled_stack(3, "a".to_string());
    stack.tamper().zero_slot(1);

    let report = stack.report("integrity failure");
    assert!(report.contains("[FAIL]"));
    assert!(report.contains("Reason: integrity failure"));
    assert!(report.contains("Checksum:"));
    assert!(report.contains("FAIL, contents hash to"));
    assert!(report.contains("[       1]* \"\""));
    assert!(report.contains("SENTINEL OK"));
}
