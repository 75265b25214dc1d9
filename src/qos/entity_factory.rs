// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! ENTITY_FACTORY QoS policy (DDS v1.4 Sec.2.2.3.5)
//!
//! Controls whether entities (DataReader, DataWriter, Topic, etc.) are
//! automatically enabled when they are created.
//!
//! # QoS Compatibility (Request vs Offered)
//!
//! **Rule:** ENTITY_FACTORY is not part of RxO compatibility checking
//!
//! This policy controls entity lifecycle behavior and does not affect
//! compatibility between readers and writers.
//!
//! # Policy Semantics
//!
//! - **autoenable_created_entities = true** (default): Entities are automatically
//!   enabled when created. They can immediately send/receive data.
//! - **autoenable_created_entities = false**: Entities are created in a disabled
//!   state and must be explicitly enabled via `entity.enable()`.
//!
//! # Use Cases
//!
//! - **Auto-enable (default)**: Simplifies application code - entities are ready
//!   immediately after creation
//! - **Manual enable**: Allows batch configuration of multiple entities before
//!   enabling them atomically, useful for:
//!   - Configuring multiple related entities before starting discovery
//!   - Testing scenarios where controlled activation is needed
//!   - Performance optimization (batch enable reduces discovery overhead)
//!
//! # Examples
//!
//! ```no_run
//! use hdds_secure_core::qos::entity_factory::EntityFactory;
//!
//! // Default: auto-enable entities
//! let factory = EntityFactory::auto_enable();
//! assert!(factory.autoenable_created_entities);
//!
//! // Manual enable: entities created disabled, require explicit enable()
//! let factory = EntityFactory::manual_enable();
//! assert!(!factory.autoenable_created_entities);
//! ```

/// ENTITY_FACTORY QoS policy (DDS v1.4 Sec.2.2.3.5)
///
/// Controls whether entities are automatically enabled upon creation.
///
/// Default: auto-enable (true).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityFactory {
    /// Whether to automatically enable entities when created
    pub autoenable_created_entities: bool,
}

impl Default for EntityFactory {
    /// Default: auto-enable entities
    fn default() -> Self {
        Self::auto_enable()
    }
}

impl EntityFactory {
    /// Create ENTITY_FACTORY with custom auto-enable setting
    ///
    /// # Arguments
    ///
    /// * `autoenable` - Whether to automatically enable entities
    ///
    /// # Examples
    ///
    /// ```
    /// use hdds_secure_core::qos::entity_factory::EntityFactory;
    ///
    /// let factory = EntityFactory::new(true);
    /// assert!(factory.autoenable_created_entities);
    /// ```
    pub fn new(autoenable: bool) -> Self {
        Self {
            autoenable_created_entities: autoenable,
        }
    }

    /// Create ENTITY_FACTORY with auto-enable (default)
    ///
    /// Entities are automatically enabled when created.
    ///
    /// # Examples
    ///
    /// ```
    /// use hdds_secure_core::qos::entity_factory::EntityFactory;
    ///
    /// let factory = EntityFactory::auto_enable();
    /// assert!(factory.autoenable_created_entities);
    /// ```
    pub fn auto_enable() -> Self {
        Self {
            autoenable_created_entities: true,
        }
    }

    /// Create ENTITY_FACTORY with manual enable
    ///
    /// Entities are created disabled and must be explicitly enabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use hdds_secure_core::qos::entity_factory::EntityFactory;
    ///
    /// let factory = EntityFactory::manual_enable();
    /// assert!(!factory.autoenable_created_entities);
    /// ```
    pub fn manual_enable() -> Self {
        Self {
            autoenable_created_entities: false,
        }
    }

    /// Check if auto-enable is enabled
    pub fn is_auto_enable(&self) -> bool {
        self.autoenable_created_entities
    }

    /// Check if manual enable is required
    pub fn is_manual_enable(&self) -> bool {
        !self.autoenable_created_entities
    }
}
