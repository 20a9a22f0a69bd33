// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for arbitrary operation sequences.
//!
//! A healthy stack driven only through its public API must never fail its own
//! invariant, and must always agree with a plain `Vec`.

#![no_main]

use arbitrary::Arbitrary;
use guardstack::{default_hash, GuardedStack, StackConfig};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Push(u16),
    Pop,
    PopValue,
    Top,
    Index(u8),
    Clone,
    CloneFrom,
    Take,
}

fuzz_target!(|input: (bool, Vec<Op>)| {
    let (diagnostics, ops) = input;
    let config = StackConfig { diagnostics };
    let mut stack = GuardedStack::with_config(config, default_hash::<u16>);
    let mut model: Vec<u16> = Vec::new();

    for op in ops.into_iter().take(512) {
        match op {
            Op::Push(v) => {
                stack.push(v);
                model.push(v);
            }
            // Popping an empty stack halts by contract; skip it.
            Op::Pop if !model.is_empty() => {
                stack.pop();
                model.pop();
            }
            Op::PopValue if !model.is_empty() => {
                assert_eq!(Some(stack.pop_value()), model.pop());
            }
            Op::Top if !model.is_empty() => {
                assert_eq!(Some(stack.top()), model.last());
            }
            Op::Index(i) if (i as usize) < model.len() => {
                assert_eq!(stack[i as usize], model[i as usize]);
            }
            Op::Clone => {
                stack = stack.clone();
            }
            Op::CloneFrom => {
                let source = stack.clone();
                stack.clone_from(&source);
            }
            Op::Take => {
                stack = stack.take();
            }
            _ => {}
        }

        // Property 1: the invariant holds after every operation
        if let Err(e) = stack.verify() {
            panic!("healthy stack failed its invariant: {}\n{}", e, stack.report("fuzz"));
        }

        // Property 2: contents match the model
        assert_eq!(stack.len(), model.len());
        assert!(stack.iter().eq(model.iter()));
        assert!(stack.capacity() >= stack.len());
    }
});
