// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The guarded stack.
//!
//! A LIFO container that checks itself on the way into and out of every
//! operation. Layout, conceptually:
//!
//! ```text
//! ┌──────────────┬────────┬────────┬─────┬──────────────┬───────────────┐
//! │ leading: u64 │ slot 0 │ slot 1 │ ... │ slot cap - 1 │ trailing: u32 │
//! └──────────────┴────────┴────────┴─────┴──────────────┴───────────────┘
//!   instance       ◀── size constructed ──▶  reserved       0xBEDABEDA
//!   marker
//! ```
//!
//! The slots live in a `Vec<T>` whose length is the number of constructed
//! elements; the two guard words are separate fields of the same [`Buffer`].
//! Alongside the buffer the stack keeps `size`, a `shadow_size` copy of it, and
//! a checksum over the contents (see [`crate::verify::checksum`]).
//!
//! # Failure model
//!
//! There is no `Result` in the operation API. Misuse (pop on empty, index out
//! of range) and detected corruption both end in [`halt`]. Call [`len`] first
//! if you'd rather not find out the hard way. [`verify`] is the one
//! non-fatal way to ask whether the stack is healthy.
//!
//! [`len`]: GuardedStack::len
//! [`verify`]: GuardedStack::verify

use std::fmt;
use std::hash::Hash;
use std::io::{self, Write};
use std::ops::Index;

use crate::config::StackConfig;
use crate::contracts;
use crate::fault::{halt, Fault};
use crate::guard::{Audited, Sentry, INTEGRITY_FAILURE};
use crate::report::{ChecksumState, SentinelState, Snapshot};
use crate::verify::checksum::{self, HashFn};
use crate::verify::sentinel::{self, Sentinels, TRAILING_CANARY};
use crate::verify::IntegrityError;

/// Slot storage plus the guard words on either side of it.
pub(crate) struct Buffer<T> {
    pub(crate) sentinels: Sentinels,
    pub(crate) slots: Vec<T>,
}

impl<T> Buffer<T> {
    /// Reserve `capacity` slots, halting if the allocator refuses.
    #[track_caller]
    fn allocate(capacity: usize, operation: &'static str) -> Self {
        let mut slots = Vec::new();
        if slots.try_reserve_exact(capacity).is_err() {
            halt(Fault::Allocation {
                operation,
                requested: capacity,
            });
        }
        Self {
            sentinels: Sentinels::cleared(),
            slots,
        }
    }
}

/// Self-verifying LIFO stack.
///
/// `T: Debug` is required by every guarded operation because a failed check
/// dumps every live element.
pub struct GuardedStack<T> {
    pub(crate) buffer: Option<Buffer<T>>,
    pub(crate) size: usize,
    pub(crate) capacity: usize,
    pub(crate) checksum: u64,
    pub(crate) shadow_size: usize,
    pub(crate) instance: u64,
    hasher: HashFn<T>,
    config: StackConfig,
}

impl<T: Hash + fmt::Debug> GuardedStack<T> {
    /// Empty stack with capacity 1, configured by [`StackConfig::from_env`].
    pub fn new() -> Self {
        Self::with_config(StackConfig::from_env(), checksum::default_hash::<T>)
    }

    /// `count` copies of `value`, capacity exactly `count`, configured by
    /// [`StackConfig::from_env`].
    pub fn from_elem(count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_elem_with(
            count,
            value,
            StackConfig::from_env(),
            checksum::default_hash::<T>,
        )
    }
}

impl<T: Hash + fmt::Debug> Default for GuardedStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> GuardedStack<T> {
    /// Empty stack with capacity 1, an explicit config and element hash.
    pub fn with_config(config: StackConfig, hasher: HashFn<T>) -> Self {
        let mut stack = Self::unsealed(config, hasher);
        stack.buffer = Some(Buffer::allocate(1, "new"));
        stack.capacity = 1;
        stack.stamp();
        stack.seal();
        stack.checkpoint("new");
        stack
    }

    /// `count` copies of `value` with an explicit config and element hash.
    ///
    /// `count == 0` gives a buffer-less stack with capacity 0; the first push
    /// allocates a single slot.
    pub fn from_elem_with(count: usize, value: T, config: StackConfig, hasher: HashFn<T>) -> Self
    where
        T: Clone,
    {
        let mut stack = Self::unsealed(config, hasher);
        if count > 0 {
            let mut buffer = Buffer::allocate(count, "from_elem");
            buffer.slots.resize(count, value);
            stack.buffer = Some(buffer);
        }
        stack.size = count;
        stack.shadow_size = count;
        stack.capacity = count;
        stack.stamp();
        stack.seal();
        stack.checkpoint("from_elem");
        stack
    }

    fn unsealed(config: StackConfig, hasher: HashFn<T>) -> Self {
        Self {
            buffer: None,
            size: 0,
            capacity: 0,
            checksum: 0,
            shadow_size: 0,
            instance: sentinel::next_instance(),
            hasher,
            config,
        }
    }

    // ------------------------------------------------------------------------
    // Guarded operations
    // ------------------------------------------------------------------------

    /// Push `value` on top, doubling capacity first if every slot is taken.
    #[track_caller]
    pub fn push(&mut self, value: T) {
        let mut stack = Sentry::enter(self, "push");
        let (size_before, capacity_before) = (stack.size, stack.capacity);

        if stack.size == stack.capacity {
            stack.grow("push");
        }
        let capacity = stack.capacity;
        stack
            .buffer
            .get_or_insert_with(|| Buffer::allocate(capacity, "push"))
            .slots
            .push(value);
        stack.size += 1;
        // Unchecked without diagnostics, so it may hold anything.
        stack.shadow_size = stack.shadow_size.wrapping_add(1);
        stack.seal();

        contracts::check_push_counted(size_before, stack.size);
        contracts::check_capacity_kept(capacity_before, stack.capacity);
    }

    /// Drop the top element. Halts if the stack is empty.
    #[track_caller]
    pub fn pop(&mut self) {
        drop(self.remove_top("pop"));
    }

    /// Remove and return the top element. Halts if the stack is empty.
    #[track_caller]
    pub fn pop_value(&mut self) -> T {
        self.remove_top("pop_value")
    }

    #[track_caller]
    fn remove_top(&mut self, operation: &'static str) -> T {
        let mut stack = Sentry::enter(self, operation);
        let size_before = stack.size;

        let Some(value) = stack.buffer.as_mut().and_then(|b| b.slots.pop()) else {
            halt(Fault::Usage {
                operation,
                condition: "called on an empty stack".to_string(),
            });
        };
        stack.size -= 1;
        stack.shadow_size = stack.shadow_size.wrapping_sub(1);
        stack.seal();

        contracts::check_pop_counted(size_before, stack.size);
        value
    }

    /// The top element. Halts if the stack is empty.
    #[track_caller]
    pub fn top(&self) -> &T {
        let _sentry = Sentry::enter(self, "top");
        match self.slots().last() {
            Some(top) => top,
            None => halt(Fault::Usage {
                operation: "top",
                condition: "called on an empty stack".to_string(),
            }),
        }
    }

    /// Element `i`, counting from the bottom. Halts unless `i < len()`.
    #[track_caller]
    pub fn index(&self, i: usize) -> &T {
        self.element(i, "index")
    }

    #[track_caller]
    fn element(&self, i: usize, operation: &'static str) -> &T {
        let _sentry = Sentry::enter(self, operation);
        match self.slots().get(i) {
            Some(element) => element,
            None => halt(Fault::Usage {
                operation,
                condition: format!("index {} out of range for size {}", i, self.size),
            }),
        }
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        let _sentry = Sentry::enter(self, "size");
        self.size
    }

    /// Alias for [`len`](Self::len).
    pub fn size(&self) -> usize {
        self.len()
    }

    /// Number of reserved slots. Only ever grows, except through [`take`](Self::take).
    pub fn capacity(&self) -> usize {
        let _sentry = Sentry::enter(self, "capacity");
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live elements, bottom to top. Checked once, when the iterator is created.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        let _sentry = Sentry::enter(self, "iter");
        self.slots().iter()
    }

    /// Move the contents into a new stack, leaving this one empty.
    ///
    /// Halts before touching anything if `self` already fails its invariant.
    /// The emptied stack has no buffer and capacity 0, passes `ok()`, and can be
    /// pushed to again.
    #[track_caller]
    pub fn take(&mut self) -> Self {
        self.require_ok("take");

        let mut taken = Self {
            buffer: self.buffer.take(),
            size: self.size,
            capacity: self.capacity,
            checksum: self.checksum,
            shadow_size: self.shadow_size,
            instance: sentinel::next_instance(),
            hasher: self.hasher,
            config: self.config,
        };
        taken.stamp();

        self.size = 0;
        self.shadow_size = 0;
        self.capacity = 0;
        self.seal();

        tracing::debug!(
            from = self.instance,
            to = taken.instance,
            size = taken.size,
            "stack contents moved"
        );
        self.checkpoint("take");
        taken.checkpoint("take");
        taken
    }

    /// Replace this stack's contents with `source`'s, leaving `source` empty.
    ///
    /// Both stacks must pass their invariant first. Keeps this stack's identity.
    #[track_caller]
    pub fn assign_from(&mut self, source: &mut Self) {
        source.require_ok("assign_from");
        let mut stack = Sentry::enter(self, "assign_from");

        let taken = source.take();
        stack.buffer = taken.buffer;
        stack.size = taken.size;
        stack.shadow_size = taken.shadow_size;
        stack.capacity = taken.capacity;
        stack.hasher = taken.hasher;
        stack.config = taken.config;
        stack.stamp();
        stack.seal();
    }

    // ------------------------------------------------------------------------
    // Invariant and diagnostics
    // ------------------------------------------------------------------------

    /// True when every invariant check passes.
    pub fn ok(&self) -> bool {
        self.check_invariant().is_ok()
    }

    /// Run every invariant check, cheapest first, and return the first failure.
    ///
    /// Never halts, never mutates. With diagnostics off only the structural
    /// checks run.
    pub fn verify(&self) -> Result<(), IntegrityError> {
        self.check_invariant()
    }

    fn check_invariant(&self) -> Result<(), IntegrityError> {
        let diagnostics = self.config.diagnostics;

        // INVARIANT: size never exceeds capacity
        if self.size > self.capacity {
            return Err(IntegrityError::SizeExceedsCapacity {
                size: self.size,
                capacity: self.capacity,
            });
        }
        if self.size > 0 && self.buffer.is_none() {
            return Err(IntegrityError::MissingBuffer { size: self.size });
        }
        // INVARIANT: every size write is mirrored into shadow_size
        if diagnostics && self.shadow_size != self.size {
            return Err(IntegrityError::ShadowSizeMismatch {
                size: self.size,
                shadow: self.shadow_size,
            });
        }
        let slots = self.slots();
        if slots.len() != self.size {
            return Err(IntegrityError::SlotCountMismatch {
                size: self.size,
                slots: slots.len(),
            });
        }
        if !diagnostics {
            return Ok(());
        }

        // INVARIANT: both guard words hold their stamped values
        if let Some(buffer) = &self.buffer {
            if !buffer.sentinels.leading_ok(self.instance) {
                return Err(IntegrityError::LeadingSentinel {
                    expected: sentinel::leading_marker(self.instance),
                    found: buffer.sentinels.leading,
                });
            }
            if !buffer.sentinels.trailing_ok() {
                return Err(IntegrityError::TrailingSentinel {
                    expected: TRAILING_CANARY,
                    found: buffer.sentinels.trailing,
                });
            }
        }

        // INVARIANT: stored checksum matches the live contents
        let computed = checksum::compute(slots, self.hasher);
        if computed != self.checksum {
            return Err(IntegrityError::ChecksumMismatch {
                stored: self.checksum,
                computed,
            });
        }
        Ok(())
    }

    /// Capture the full internal state without running any guarded operation.
    pub fn snapshot(&self) -> Snapshot {
        let diagnostics = self.config.diagnostics;
        let failure = self.check_invariant().err();
        let sentinels = self.buffer.as_ref().map(|b| b.sentinels);

        let leading = sentinels.filter(|_| diagnostics).map(|s| SentinelState {
            value: s.leading,
            expected: sentinel::leading_marker(self.instance),
            ok: s.leading_ok(self.instance),
        });
        let trailing = sentinels.filter(|_| diagnostics).map(|s| SentinelState {
            value: u64::from(s.trailing),
            expected: u64::from(TRAILING_CANARY),
            ok: s.trailing_ok(),
        });
        let checksum = diagnostics.then(|| {
            let computed = checksum::compute(self.slots(), self.hasher);
            ChecksumState {
                stored: self.checksum,
                computed,
                ok: computed == self.checksum,
            }
        });

        Snapshot {
            instance: self.instance,
            buffer: self
                .buffer
                .as_ref()
                .map(|b| format!("{:p}", b.slots.as_ptr())),
            ok: failure.is_none(),
            failure: failure.map(|e| e.to_string()),
            size: self.size,
            capacity: self.capacity,
            shadow_size: self.shadow_size,
            diagnostics,
            leading,
            trailing,
            checksum,
            elements: self.slots().iter().map(|e| format!("{:?}", e)).collect(),
        }
    }

    /// Write the diagnostic dump to `out`.
    pub fn dump_to<W: Write>(&self, out: &mut W, reason: &str) -> io::Result<()> {
        self.snapshot().render(out, reason)
    }

    /// Write the diagnostic dump to stderr. Output errors are ignored.
    pub fn dump(&self, reason: &str) {
        let stderr = io::stderr();
        let mut out = stderr.lock();
        let _ = self.dump_to(&mut out, reason);
    }

    /// The diagnostic dump as a string.
    pub fn report(&self, reason: &str) -> String {
        let mut out = Vec::new();
        let _ = self.dump_to(&mut out, reason);
        String::from_utf8_lossy(&out).into_owned()
    }

    pub fn config(&self) -> StackConfig {
        self.config
    }

    /// Process-unique id, the basis of the leading sentinel.
    pub fn instance(&self) -> u64 {
        self.instance
    }

    /// Stored checksum (0 when diagnostics are off).
    pub fn checksum(&self) -> u64 {
        self.checksum
    }

    // ------------------------------------------------------------------------
    // Internals (no checks)
    // ------------------------------------------------------------------------

    pub(crate) fn slots(&self) -> &[T] {
        self.buffer.as_ref().map_or(&[], |b| b.slots.as_slice())
    }

    /// Double capacity (0 becomes 1), re-placing both sentinels.
    #[track_caller]
    fn grow(&mut self, operation: &'static str) {
        let previous = self.capacity;
        let next = if previous == 0 {
            1
        } else {
            match previous.checked_mul(2) {
                Some(next) => next,
                None => halt(Fault::Allocation {
                    operation,
                    requested: usize::MAX,
                }),
            }
        };

        let buffer = self
            .buffer
            .get_or_insert_with(|| Buffer::allocate(0, operation));
        let additional = next - buffer.slots.len();
        if buffer.slots.try_reserve_exact(additional).is_err() {
            halt(Fault::Allocation {
                operation,
                requested: next,
            });
        }
        // The old trailing word sits where the new slots begin.
        buffer.sentinels.trailing = 0;
        self.capacity = next;
        self.stamp();

        contracts::check_growth(previous, next);
        tracing::trace!(instance = self.instance, from = previous, to = next, "stack grew");
    }

    /// Write both sentinels for the current instance.
    fn stamp(&mut self) {
        if !self.config.diagnostics {
            return;
        }
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.sentinels = Sentinels::stamped(self.instance);
        }
    }

    /// Recompute the checksum after a mutation.
    fn seal(&mut self) {
        if self.config.diagnostics {
            self.checksum = checksum::compute(self.slots(), self.hasher);
        }
    }

    /// Entry and exit check with nothing in between.
    #[track_caller]
    fn checkpoint(&self, operation: &'static str) {
        drop(Sentry::enter(self, operation));
    }

    /// Halt with `InvalidSource` unless the invariant holds.
    #[track_caller]
    fn require_ok(&self, operation: &'static str) {
        if let Err(error) = self.check_invariant() {
            self.dump(INTEGRITY_FAILURE);
            halt(Fault::InvalidSource { operation, error });
        }
    }
}

impl<T: fmt::Debug> Audited for GuardedStack<T> {
    fn verify(&self) -> Result<(), IntegrityError> {
        self.check_invariant()
    }

    fn dump_to(&self, out: &mut dyn Write, reason: &str) -> io::Result<()> {
        self.snapshot().render(out, reason)
    }
}

impl<T: Clone + fmt::Debug> Clone for GuardedStack<T> {
    /// Deep copy into a fresh buffer of the same capacity.
    #[track_caller]
    fn clone(&self) -> Self {
        self.require_ok("clone");

        let mut copy = Self::unsealed(self.config, self.hasher);
        if let Some(source) = &self.buffer {
            let mut buffer = Buffer::allocate(self.capacity, "clone");
            buffer.slots.extend(source.slots.iter().cloned());
            copy.buffer = Some(buffer);
        }
        copy.size = self.size;
        copy.shadow_size = self.size;
        copy.capacity = self.capacity;
        copy.stamp();
        copy.seal();

        contracts::check_clone_faithful(
            (self.size, self.capacity, self.checksum),
            (copy.size, copy.capacity, copy.checksum),
            self.config.diagnostics,
        );
        tracing::debug!(from = self.instance, to = copy.instance, size = copy.size, "stack cloned");
        copy.checkpoint("clone");
        copy
    }

    /// Copy-assignment: validate `source`, then replace contents. Keeps this
    /// stack's identity.
    #[track_caller]
    fn clone_from(&mut self, source: &Self) {
        source.require_ok("clone_from");
        let mut stack = Sentry::enter(self, "clone_from");

        let mut buffer = None;
        if let Some(from) = &source.buffer {
            let mut fresh = Buffer::allocate(source.capacity, "clone_from");
            fresh.slots.extend(from.slots.iter().cloned());
            buffer = Some(fresh);
        }
        stack.buffer = buffer;
        stack.size = source.size;
        stack.shadow_size = source.size;
        stack.capacity = source.capacity;
        stack.hasher = source.hasher;
        stack.config = source.config;
        stack.stamp();
        stack.seal();
    }
}

impl<T: fmt::Debug> Index<usize> for GuardedStack<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, i: usize) -> &T {
        self.element(i, "index")
    }
}

impl<'a, T: fmt::Debug> IntoIterator for &'a GuardedStack<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for GuardedStack<T> {
    /// Unchecked: safe to call on a corrupt stack.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedStack")
            .field("instance", &self.instance)
            .field("size", &self.size)
            .field("capacity", &self.capacity)
            .field("elements", &self.slots())
            .finish()
    }
}
