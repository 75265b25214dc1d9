// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Rules engine for access control (allow/deny logic with wildcard matching)
//!
//! # Security Model: Deny-by-Default
//!
//! This implementation follows a **deny-by-default** security model per DDS Security v1.1:
//!
//! - **Implicit Deny**: If no explicit `allow_rule` matches, access is DENIED
//! - **Deny Takes Precedence**: `deny_rule` is checked BEFORE `allow_rule`
//! - **Zero Trust**: No permissions are granted without explicit authorization
//!
//! ## Rule Evaluation Order
//!
//! 1. Check all `deny_rule` entries - if ANY matches, return DENIED
//! 2. Check all `allow_rule` entries - if ANY matches, return ALLOWED
//! 3. If no rules match, return DENIED (implicit deny)
//!
//! This model ensures security-by-default even with misconfigured permissions.

use crate::security::access::{GovernanceConfig, PermissionsConfig};
use crate::security::SecurityError;

/// Rules engine for access control
///
/// Implements **deny-by-default** semantics per DDS Security v1.1 Sec.8.4.
/// See module documentation for detailed security model explanation.
pub struct RulesEngine {
    governance: GovernanceConfig,
    permissions: PermissionsConfig,
}

impl RulesEngine {
    /// Create new rules engine
    pub fn new(governance: GovernanceConfig, permissions: PermissionsConfig) -> Self {
        Self {
            governance,
            permissions,
        }
    }

    /// Check if domain access is allowed
    pub fn check_domain_access(&self, domain_id: u32) -> Result<(), SecurityError> {
        // Check governance rules
        for rule in &self.governance.domain_rules {
            if rule.domains.contains(&domain_id) {
                return Ok(());
            }
        }

        Err(SecurityError::PermissionsDenied(format!(
            "Domain {} not allowed by governance",
            domain_id
        )))
    }

    /// Check if topic publish is allowed
    ///
    /// # Security Model
    ///
    /// Uses **deny-by-default** semantics:
    /// 1. Deny rules checked first (deny takes precedence)
    /// 2. Allow rules checked second
    /// 3. Default: DENY if no rules match
    pub fn check_topic_publish(
        &self,
        topic: &str,
        _partition: Option<&str>,
    ) -> Result<(), SecurityError> {
        // Step 1: Check deny rules first (deny takes precedence)
        for grant in &self.permissions.grants {
            for deny_rule in &grant.deny_rules {
                for pattern in &deny_rule.publish_topics {
                    if Self::wildcard_match(pattern, topic) {
                        return Err(SecurityError::PermissionsDenied(format!(
                            "Topic '{}' denied by rule '{}'",
                            topic, pattern
                        )));
                    }
                }
            }
        }

        // Step 2: Check allow rules
        for grant in &self.permissions.grants {
            for allow_rule in &grant.allow_rules {
                for pattern in &allow_rule.publish_topics {
                    if Self::wildcard_match(pattern, topic) {
                        return Ok(());
                    }
                }
            }
        }

        // Step 3: Default DENY (deny-by-default security model)
        Err(SecurityError::PermissionsDenied(format!(
            "Topic '{}' not allowed for publish (no matching allow_rule)",
            topic
        )))
    }

    /// Check if topic subscribe is allowed
    ///
    /// # Security Model
    ///
    /// Uses **deny-by-default** semantics:
    /// 1. Deny rules checked first (deny takes precedence)
    /// 2. Allow rules checked second
    /// 3. Default: DENY if no rules match
    pub fn check_topic_subscribe(
        &self,
        topic: &str,
        _partition: Option<&str>,
    ) -> Result<(), SecurityError> {
        // Step 1: Check deny rules first (deny takes precedence)
        for grant in &self.permissions.grants {
            for deny_rule in &grant.deny_rules {
                for pattern in &deny_rule.subscribe_topics {
                    if Self::wildcard_match(pattern, topic) {
                        return Err(SecurityError::PermissionsDenied(format!(
                            "Topic '{}' denied by rule '{}'",
                            topic, pattern
                        )));
                    }
                }
            }
        }

        // Step 2: Check allow rules
        for grant in &self.permissions.grants {
            for allow_rule in &grant.allow_rules {
                for pattern in &allow_rule.subscribe_topics {
                    if Self::wildcard_match(pattern, topic) {
                        return Ok(());
                    }
                }
            }
        }

        // Step 3: Default DENY (deny-by-default security model)
        Err(SecurityError::PermissionsDenied(format!(
            "Topic '{}' not allowed for subscribe (no matching allow_rule)",
            topic
        )))
    }

    /// Wildcard pattern matching (glob-style)
    ///
    /// Supports:
    /// - `*` -- Matches any sequence of characters
    /// - `?` -- Matches any single character
    ///
    /// # Examples
    ///
    /// ```
    /// # use hdds_secure_core::security::access::rules::RulesEngine;
    /// assert!(RulesEngine::wildcard_match("sensor/*", "sensor/temperature"));
    /// assert!(RulesEngine::wildcard_match("*", "any/topic"));
    /// assert!(!RulesEngine::wildcard_match("sensor/*", "actuator/motor"));
    /// ```
    pub fn wildcard_match(pattern: &str, topic: &str) -> bool {
        crate::core::string_utils::glob_match(pattern, topic)
    }
}
