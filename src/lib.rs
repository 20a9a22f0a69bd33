// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! A LIFO stack that checks its own integrity on every operation.
//!
//! Out-of-bounds writes into the stack's storage and in-place corruption of its
//! elements are caught the next time anyone touches the stack, with a full dump
//! of its state, instead of surfacing later as wrong answers.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐
//! │ verify::sentinel │  │ verify::checksum │  │  verify::types   │
//! │  (guard words)   │  │ (rolling hash)   │  │ (IntegrityError) │
//! └────────┬─────────┘  └────────┬─────────┘  └────────┬─────────┘
//!          └─────────────────────┼─────────────────────┘
//!                                ▼
//! ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐
//! │     guard.rs     │◀─│     stack.rs     │─▶│    report.rs     │
//! │ (Sentry: entry/  │  │  (GuardedStack)  │  │ (Snapshot, dump) │
//! │   exit checks)   │  └────────┬─────────┘  └──────────────────┘
//! └────────┬─────────┘           │
//!          ▼                     ▼
//! ┌──────────────────┐  ┌──────────────────┐
//! │     fault.rs     │  │   contracts.rs   │
//! │  (Fault, halt)   │  │ (debug_asserts)  │
//! └──────────────────┘  └──────────────────┘
//! ```
//!
//! # Invariant
//!
//! | Check               | Catches                                 | Mode        |
//! |---------------------|-----------------------------------------|-------------|
//! | `size <= capacity`  | corrupted counters                      | always      |
//! | buffer when size>0  | lost or freed storage                   | always      |
//! | slot count == size  | counter/storage disagreement            | always      |
//! | shadow size         | a write to the `size` field             | diagnostics |
//! | leading sentinel    | underrun, or a buffer from another stack| diagnostics |
//! | trailing sentinel   | overrun past the last slot              | diagnostics |
//! | checksum            | element contents changed in place       | diagnostics |
//!
//! # Usage
//!
//! ```
//! use guardstack::GuardedStack;
//!
//! let mut stack = GuardedStack::new();
//! stack.push("a".to_string());
//! stack.push("b".to_string());
//! assert_eq!(stack.top(), "b");
//! stack.pop();
//! assert_eq!(stack.len(), 1);
//! assert!(stack.ok());
//! ```

pub mod config;
pub mod contracts;
pub mod fault;
pub mod guard;
pub mod report;
mod stack;
pub mod testing;
pub mod verify;

// Re-exports for public API
pub use config::{StackConfig, DIAGNOSTICS_ENV};
pub use fault::{halt, Fault, Place};
pub use guard::{Audited, Sentry};
pub use report::Snapshot;
pub use stack::GuardedStack;
pub use verify::checksum::{default_hash, HashFn, HASH_MOD, HASH_MUL};
pub use verify::sentinel::TRAILING_CANARY;
pub use verify::IntegrityError;
