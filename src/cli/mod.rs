// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the guardstack command-line interface.
//!
//! Three subcommands: `demo` walks a stack through a few operations and dumps
//! it, `inject` corrupts a stack on purpose and shows the detection firing,
//! and `stress` runs a long push/pop cycle with every check enabled.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "guardstack",
    about = "Self-verifying stack: demos and corruption injection",
    version
)]
pub struct Cli {
    /// Log filter, e.g. "debug" or "guardstack=trace" (defaults to RUST_LOG, then "warn")
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build five copies of "aac", pop, push "aap", then dump the stack
    Demo {
        /// Print the dump as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Corrupt a stack, then push onto it (the push is expected to halt)
    Inject {
        /// What to corrupt
        #[arg(value_enum)]
        target: InjectTarget,

        /// Number of "a" elements to start with
        #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u64).range(2..))]
        size: u64,

        /// Print the corrupted stack as JSON before the push
        #[arg(long)]
        json: bool,
    },

    /// Push COUNT copies of "a", check the top, pop them all
    Stress {
        /// Number of elements
        #[arg(short, long, default_value = "100")]
        count: usize,

        /// Structural checks only (no sentinels or checksum)
        #[arg(long)]
        release_mode: bool,
    },
}

/// Part of the stack `inject` overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InjectTarget {
    /// The word before the first slot
    Leading,
    /// One byte of the word after the last slot
    Trailing,
    /// Two live elements, replaced with empty strings
    Element,
    /// The redundant copy of the size
    Shadow,
    /// The stored checksum itself
    Checksum,
}
