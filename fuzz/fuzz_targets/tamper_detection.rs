// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for corruption detection.
//!
//! Build a diagnostic stack, apply one arbitrary corruption, and check that
//! `verify()` notices whenever the corruption actually changed something.

#![no_main]

use arbitrary::Arbitrary;
use guardstack::testing::filled_stack;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Corruption {
    Leading(u64),
    Trailing(u32),
    TrailingByte(u8, u8),
    Element(u8, u32),
    Size(u8),
    Shadow(u8),
    Checksum(u64),
}

fuzz_target!(|input: (u8, u32, Corruption)| {
    let (count, fill, corruption) = input;
    let count = usize::from(count).max(1);
    let mut stack = filled_stack(count, fill);
    let before = stack.snapshot();

    let changed = match corruption {
        Corruption::Leading(v) => {
            stack.tamper().set_leading_sentinel(v);
            before.leading.map_or(false, |s| s.value != v)
        }
        Corruption::Trailing(v) => {
            stack.tamper().set_trailing_sentinel(v);
            before.trailing.map_or(false, |s| s.value != u64::from(v))
        }
        Corruption::TrailingByte(byte, v) => {
            stack.tamper().poke_trailing_byte(usize::from(byte), v);
            let canary = guardstack::TRAILING_CANARY.to_le_bytes();
            canary[usize::from(byte) % canary.len()] != v
        }
        Corruption::Element(i, v) => {
            let i = usize::from(i) % count;
            if let Some(slot) = stack.tamper().slot_mut(i) {
                *slot = v;
            }
            // Only a change the checksum can see counts; equal hashes mod p
            // are possible in principle.
            stack.snapshot().checksum.map_or(false, |c| c.computed != c.stored)
        }
        Corruption::Size(s) => {
            stack.tamper().set_size(usize::from(s));
            usize::from(s) != count
        }
        Corruption::Shadow(s) => {
            stack.tamper().set_shadow_size(usize::from(s));
            usize::from(s) != count
        }
        Corruption::Checksum(v) => {
            stack.tamper().set_checksum(v);
            before.checksum.map_or(false, |c| c.stored != v)
        }
    };

    if changed {
        assert!(
            stack.verify().is_err(),
            "corruption went unnoticed: {:?}",
            stack
        );
    }
});
