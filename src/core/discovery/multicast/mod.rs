// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Participant discovery state tracking (SPDP) and its handshake-triggering FSM.
//!
//! The participant-discovery state machine owns the `ParticipantDB` and decides
//! when a newly-seen remote participant needs a secure handshake before its
//! endpoints are handed to the matcher.
//!
//! # Modules
//!
//! - [`spdp`]: Participant liveliness record and discovery FSM states
//! - [`fsm`]: `DiscoveryFsm`, the security validator seam, and endpoint bookkeeping
pub mod fsm;
pub mod spdp;

pub use fsm::{
    DiscoveryFsm, DiscoveryListener, DiscoveryMetrics, EndpointInfo, EndpointKind, ParticipantDB,
    SecurityValidator, TopicRegistry,
};

// Re-export config constants for backward compatibility
pub use crate::config::{MULTICAST_GROUP, SPDP_MULTICAST_PORT_DOMAIN0 as MULTICAST_PORT};
pub use spdp::{FsmState, ParticipantInfo};
