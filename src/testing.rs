// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fault injection and fixtures shared across unit tests, integration tests,
//! the fuzz targets and the CLI's `inject` command.
//!
//! This module is always compiled but hidden from documentation. [`Tamper`]
//! writes to a stack's internals *without* going through a guarded operation
//! and without updating the checksum: exactly what a stray pointer would do.

#![doc(hidden)]

use std::fmt;
use std::hash::Hash;

use crate::config::StackConfig;
use crate::stack::GuardedStack;
use crate::verify::checksum;

/// Build an empty stack with diagnostics forced on, whatever the build profile.
pub fn diagnostic_stack<T: Hash + fmt::Debug>() -> GuardedStack<T> {
    GuardedStack::with_config(StackConfig::diagnostic(), checksum::default_hash::<T>)
}

/// `count` copies of `value` with diagnostics forced on.
pub fn filled_stack<T: Clone + Hash + fmt::Debug>(count: usize, value: T) -> GuardedStack<T> {
    GuardedStack::from_elem_with(
        count,
        value,
        StackConfig::diagnostic(),
        checksum::default_hash::<T>,
    )
}

/// `count` copies of `value` with diagnostics off.
pub fn release_stack<T: Clone + Hash + fmt::Debug>(count: usize, value: T) -> GuardedStack<T> {
    GuardedStack::from_elem_with(count, value, StackConfig::release(), checksum::default_hash::<T>)
}

/// Unchecked write access to a stack's internals.
pub struct Tamper<'a, T> {
    stack: &'a mut GuardedStack<T>,
}

impl<T: fmt::Debug> GuardedStack<T> {
    /// Get a handle that corrupts this stack on purpose.
    #[doc(hidden)]
    pub fn tamper(&mut self) -> Tamper<'_, T> {
        Tamper { stack: self }
    }
}

impl<T> Tamper<'_, T> {
    /// Overwrite the word before slot 0.
    pub fn set_leading_sentinel(&mut self, value: u64) -> &mut Self {
        if let Some(buffer) = self.stack.buffer.as_mut() {
            buffer.sentinels.leading = value;
        }
        self
    }

    /// Overwrite the word after the last reserved slot.
    pub fn set_trailing_sentinel(&mut self, value: u32) -> &mut Self {
        if let Some(buffer) = self.stack.buffer.as_mut() {
            buffer.sentinels.trailing = value;
        }
        self
    }

    /// Overwrite one byte of the trailing word, as an off-by-a-few write would.
    pub fn poke_trailing_byte(&mut self, byte: usize, value: u8) -> &mut Self {
        if let Some(buffer) = self.stack.buffer.as_mut() {
            let mut bytes = buffer.sentinels.trailing.to_le_bytes();
            bytes[byte % bytes.len()] = value;
            buffer.sentinels.trailing = u32::from_le_bytes(bytes);
        }
        self
    }

    /// Mutable access to a live slot, bypassing the checksum.
    pub fn slot_mut(&mut self, i: usize) -> Option<&mut T> {
        self.stack.buffer.as_mut().and_then(|b| b.slots.get_mut(i))
    }

    /// Replace the element at `i` with `T::default()`, the closest safe
    /// equivalent of zeroing its memory. Out-of-range indices are ignored.
    pub fn zero_slot(&mut self, i: usize) -> &mut Self
    where
        T: Default,
    {
        if let Some(slot) = self.slot_mut(i) {
            *slot = T::default();
        }
        self
    }

    /// Swap two live elements without touching the checksum.
    pub fn swap_slots(&mut self, a: usize, b: usize) -> &mut Self {
        if let Some(buffer) = self.stack.buffer.as_mut() {
            if a < buffer.slots.len() && b < buffer.slots.len() {
                buffer.slots.swap(a, b);
            }
        }
        self
    }

    /// Overwrite `size` alone, leaving `shadow_size` stale.
    pub fn set_size(&mut self, size: usize) -> &mut Self {
        self.stack.size = size;
        self
    }

    /// Overwrite `shadow_size` alone.
    pub fn set_shadow_size(&mut self, shadow: usize) -> &mut Self {
        self.stack.shadow_size = shadow;
        self
    }

    pub fn set_capacity(&mut self, capacity: usize) -> &mut Self {
        self.stack.capacity = capacity;
        self
    }

    pub fn set_checksum(&mut self, checksum: u64) -> &mut Self {
        self.stack.checksum = checksum;
        self
    }

    /// Drop the buffer but keep the counters, as a dangling pointer would.
    pub fn drop_buffer(&mut self) -> &mut Self {
        self.stack.buffer = None;
        self
    }
}
