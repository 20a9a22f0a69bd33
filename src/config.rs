// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Construction-time configuration.
//!
//! One switch: whether the diagnostic machinery (sentinels, checksum, shadow
//! size, full dumps) is maintained. Structural checks run either way.
//!
//! # Resolution order
//!
//! 1. Explicit `StackConfig { diagnostics }` passed to `with_config` or
//!    `from_elem_with`
//! 2. `GUARDSTACK_DIAGNOSTICS` env var, read by `GuardedStack::new` and
//!    `from_elem` through [`StackConfig::from_env`]
//! 3. Build profile: on for debug builds, off for release

use serde::{Deserialize, Serialize};

/// Environment variable read by [`StackConfig::from_env`].
pub const DIAGNOSTICS_ENV: &str = "GUARDSTACK_DIAGNOSTICS";

/// Per-stack configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackConfig {
    /// Maintain and check sentinels, checksum and shadow size.
    pub diagnostics: bool,
}

impl StackConfig {
    /// Everything on.
    pub const fn diagnostic() -> Self {
        Self { diagnostics: true }
    }

    /// Structural checks only.
    pub const fn release() -> Self {
        Self { diagnostics: false }
    }

    /// Default config, overridden by `GUARDSTACK_DIAGNOSTICS` when set to a
    /// recognizable value. Anything else is ignored.
    pub fn from_env() -> Self {
        std::env::var(DIAGNOSTICS_ENV)
            .ok()
            .and_then(|v| parse_switch(&v))
            .map(|diagnostics| Self { diagnostics })
            .unwrap_or_default()
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            diagnostics: cfg!(debug_assertions),
        }
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
