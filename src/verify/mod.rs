// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The verification layer: the raw material every integrity check is built from.
//!
//! Two complementary detectors:
//!
//! 1. **Sentinels** (`sentinel`) sit on either side of the element region. A write
//!    that runs off the end of the slots lands on a sentinel and changes it.
//!
//! 2. **Checksums** (`checksum`) cover the bytes the sentinels can't see: the live
//!    elements themselves and the element count. Scribble over slot 5 and the
//!    sentinels stay intact, but the checksum no longer matches.
//!
//! Neither is enough alone. `types` holds the error each check reports when it
//! fails.

pub mod checksum;
pub mod sentinel;
mod types;

pub use types::*;
