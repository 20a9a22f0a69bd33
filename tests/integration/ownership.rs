//! Copy and move: deep copies, ownership transfer, and refusing bad sources.

use super::common::{assert_healthy, diagnostic_stack, expect_halt, filled_stack};

#[test]
fn clone_is_independent() {
    let mut original = diagnostic_stack::<String>();
    for word in ["one", "two", "three"] {
        original.push(word.to_string());
    }

    let mut copy = original.clone();
    assert_healthy(&copy);
    assert_ne!(copy.instance(), original.instance());
    assert!(copy.iter().eq(original.iter()));

    copy.pop();
    copy.push("four".to_string());
    assert_eq!(original.top(), "three");
    assert_eq!(copy.top(), "four");
    assert_healthy(&original);
}

#[test]
fn clone_of_corrupt_source_halts_before_copying() {
    let mut original = filled_stack(5, 1u32);
    original.tamper().set_trailing_sentinel(0x0BAD_F00D);

    let message = expect_halt(|| {
        let _copy = original.clone();
    });
    assert!(
        message.starts_with("source of `clone` is not ok: trailing sentinel"),
        "got '{}'",
        message
    );
}

#[test]
fn clone_from_of_corrupt_source_leaves_target_untouched() {
    let mut source = filled_stack(3, 'x');
    source.tamper().set_shadow_size(0);
    let mut target = filled_stack(2, 'y');

    let message = expect_halt(|| target.clone_from(&source));
    assert!(message.starts_with("source of `clone_from` is not ok"));

    assert_healthy(&target);
    assert!(target.iter().all(|&c| c == 'y'));
}

#[test]
fn take_transfers_and_empties() {
    let mut source = filled_stack(6, 3i16);
    let capacity = source.capacity();

    let taken = source.take();
    assert_healthy(&taken);
    assert_eq!(taken.len(), 6);
    assert_eq!(taken.capacity(), capacity);

    assert_healthy(&source);
    assert_eq!(source.len(), 0);
    assert_eq!(source.capacity(), 0);
    assert!(source.snapshot().buffer.is_none());
}

#[test]
fn taken_from_stack_is_reusable() {
    let mut source = filled_stack(2, 0u8);
    let _taken = source.take();

    for i in 0..5 {
        source.push(i);
    }
    assert_eq!(source.capacity(), 8);
    assert_eq!(*source.top(), 4);
    assert_healthy(&source);
}

#[test]
fn take_of_corrupt_source_halts() {
    let mut source = filled_stack(4, "z".to_string());
    source.tamper().zero_slot(0);

    let message = expect_halt(|| {
        let _taken = source.take();
    });
    assert!(message.starts_with("source of `take` is not ok: checksum mismatch"));
    // Nothing was moved.
    assert_eq!(source.snapshot().size, 4);
    assert!(source.snapshot().buffer.is_some());
}

#[test]
fn assign_from_moves_between_stacks() {
    let mut target = filled_stack(1, 100u64);
    let mut source = filled_stack(10, 7u64);

    target.assign_from(&mut source);
    assert_eq!(target.len(), 10);
    assert_eq!(*target.top(), 7);
    assert_healthy(&target);
    assert!(source.is_empty());
    assert_healthy(&source);
}

#[test]
fn dropping_runs_element_destructors() {
    use std::rc::Rc;

    let tracker = Rc::new(());
    {
        let mut stack = diagnostic_stack::<TrackedRc>();
        for _ in 0..10 {
            stack.push(TrackedRc(Rc::clone(&tracker)));
        }
        stack.pop();
        assert_eq!(Rc::strong_count(&tracker), 10);
    }
    assert_eq!(Rc::strong_count(&tracker), 1);
}

/// Rc wrapper hashed by address, so it can live in a checksummed stack.
#[derive(Debug)]
struct TrackedRc(std::rc::Rc<()>);

impl std::hash::Hash for TrackedRc {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::rc::Rc::as_ptr(&self.0).hash(state);
    }
}
