// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! String formatting utilities for hot paths.
use std::fmt::{self, Arguments};

#[inline]
pub fn format_string(args: Arguments<'_>) -> String {
    fmt::format(args)
}

/// Shell-style glob pattern matching (`*` matches any run of characters).
///
/// Shared by the access-control rules engine (`security::access::rules`)
/// and the PARTITION QoS matcher, both of which need the same "is this
/// pattern a match for that name" primitive without pulling the
/// `security`-feature-gated rules module into the always-compiled QoS
/// matcher.
///
/// # Examples
///
/// ```
/// # use hdds_secure_core::core::string_utils::glob_match;
/// assert!(glob_match("sensor/*", "sensor/temperature"));
/// assert!(glob_match("*", "any/topic"));
/// assert!(!glob_match("sensor/*", "actuator/motor"));
/// ```
pub fn glob_match(pattern: &str, name: &str) -> bool {
    if pattern == "*" {
        return true;
    }

    if pattern == name {
        return true;
    }

    // Handle "prefix/*" pattern
    if let Some(prefix) = pattern.strip_suffix("/*") {
        return name.starts_with(prefix);
    }

    // Handle "*/suffix" pattern
    if let Some(suffix) = pattern.strip_prefix("*/") {
        return name.ends_with(suffix);
    }

    // Handle "*middle*" pattern (contains)
    if pattern.starts_with('*') && pattern.ends_with('*') && pattern.len() > 2 {
        let middle = &pattern[1..pattern.len() - 1];
        return name.contains(middle);
    }

    false
}
