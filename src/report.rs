// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Diagnostic dump: a point-in-time capture of a stack's internals.
//!
//! [`Snapshot`] is collected without going through any guarded operation, so it
//! works on a stack that is already corrupt. That's the only time anyone reads
//! it. Text rendering is for humans; the JSON form (via serde) is for the CLI's
//! `--json` flag. Neither format is a stable contract.

use serde::Serialize;
use std::io::{self, Write};

/// State of one sentinel word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SentinelState {
    pub value: u64,
    pub expected: u64,
    pub ok: bool,
}

/// State of the stored checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecksumState {
    pub stored: u64,
    pub computed: u64,
    pub ok: bool,
}

/// Everything a dump prints.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub instance: u64,
    /// Address of the element region, or `None` for a buffer-less stack.
    pub buffer: Option<String>,
    pub ok: bool,
    /// First failed check, when `ok` is false.
    pub failure: Option<String>,
    pub size: usize,
    pub capacity: usize,
    pub shadow_size: usize,
    pub diagnostics: bool,
    /// `None` when diagnostics are off or there is no buffer.
    pub leading: Option<SentinelState>,
    pub trailing: Option<SentinelState>,
    /// `None` when diagnostics are off.
    pub checksum: Option<ChecksumState>,
    /// `Debug` rendering of every constructed element, bottom first.
    pub elements: Vec<String>,
}

fn verdict(ok: bool) -> &'static str {
    if ok {
        "OK"
    } else {
        "FAIL"
    }
}

impl Snapshot {
    /// Write the human-readable dump.
    pub fn render(&self, out: &mut dyn Write, reason: &str) -> io::Result<()> {
        writeln!(
            out,
            "DUMP for GuardedStack [instance = {}][buffer = {}][{}]",
            self.instance,
            self.buffer.as_deref().unwrap_or("null"),
            verdict(self.ok)
        )?;
        writeln!(out, "Dump was called. Reason: {}", reason)?;
        if let Some(failure) = &self.failure {
            writeln!(out, "First failed check: {}", failure)?;
        }
        writeln!(
            out,
            "Size: {}, Capacity: {}, Shadow size: {}",
            self.size, self.capacity, self.shadow_size
        )?;

        if !self.diagnostics {
            writeln!(out, "Sentinels: disabled")?;
        }

        writeln!(out, "Elements:")?;
        if let Some(leading) = &self.leading {
            writeln!(
                out,
                "  [leading ]  {:#018x} (SENTINEL {})",
                leading.value,
                verdict(leading.ok)
            )?;
        }
        for (i, element) in self.elements.iter().enumerate() {
            writeln!(out, "  [{:>8}]* {}", i, element)?;
        }
        if let Some(trailing) = &self.trailing {
            writeln!(
                out,
                "  [trailing]  {:#010x} (SENTINEL {})",
                trailing.value,
                verdict(trailing.ok)
            )?;
        }

        match &self.checksum {
            Some(checksum) => writeln!(
                out,
                "Checksum: {} ({}, contents hash to {})",
                checksum.stored,
                verdict(checksum.ok),
                checksum.computed
            )?,
            None => writeln!(out, "Checksum: disabled")?,
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
