// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crypto Token Transport.
//!
//! After a PSMP handshake authenticates a peer, CTT carries the crypto
//! key material needed to decrypt/verify its RTPS traffic.
//! It reuses the same `ParticipantStatelessMessage`-shaped envelope as
//! PSMP (here `VolatileMessage`, since it rides the volatile-secure
//! builtin endpoints rather than the stateless ones) and dispatches on
//! `message_class_id` plus destination participant key.

use std::collections::HashMap;

use crate::core::discovery::GUID;
use crate::token::DataHolder;

/// The four CTT message classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageClass {
    ParticipantCryptoTokens,
    DatawriterCryptoTokens,
    DatareaderCryptoTokens,
    VolData,
}

impl MessageClass {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MessageClass::ParticipantCryptoTokens => "dds.sec.participant_crypto_tokens",
            MessageClass::DatawriterCryptoTokens => "dds.sec.datawriter_crypto_tokens",
            MessageClass::DatareaderCryptoTokens => "dds.sec.datareader_crypto_tokens",
            MessageClass::VolData => "dds.sec.vol_data",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dds.sec.participant_crypto_tokens" => Some(MessageClass::ParticipantCryptoTokens),
            "dds.sec.datawriter_crypto_tokens" => Some(MessageClass::DatawriterCryptoTokens),
            "dds.sec.datareader_crypto_tokens" => Some(MessageClass::DatareaderCryptoTokens),
            "dds.sec.vol_data" => Some(MessageClass::VolData),
            _ => None,
        }
    }
}

/// A `ParticipantVolatileSecureMessage`: shares the
/// `ParticipantStatelessMessage` shape but travels over the reliable
/// volatile-secure builtin endpoints instead of the stateless ones.
#[derive(Clone, Debug)]
pub struct VolatileMessage {
    pub source_guid: GUID,
    pub source_seq: u64,
    pub destination_participant_key: [u8; 16],
    pub destination_endpoint_key: [u8; 16],
    pub source_endpoint_key: [u8; 16],
    pub message_class_id: String,
    pub message_data: Vec<DataHolder>,
}

const ALL_ZERO_KEY: [u8; 16] = [0; 16];

/// Tokens addressed to an endpoint that has not yet been discovered
/// locally are remembered here, keyed by the remote entity id's last 4
/// bytes, until the matcher discovers that endpoint.
#[derive(Default)]
pub struct RememberedTokens {
    by_entity_id: HashMap<[u8; 4], Vec<VolatileMessage>>,
}

impl RememberedTokens {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remember(&mut self, entity_id: [u8; 4], msg: VolatileMessage) {
        self.by_entity_id.entry(entity_id).or_default().push(msg);
    }

    /// Drain and return every token remembered for `entity_id`, e.g. once
    /// the corresponding endpoint is discovered by SEDP.
    pub fn take(&mut self, entity_id: [u8; 4]) -> Vec<VolatileMessage> {
        self.by_entity_id.remove(&entity_id).unwrap_or_default()
    }
}

/// Result of dispatching one received [`VolatileMessage`].
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Token applies to the participant as a whole.
    Participant,
    /// Token applies to a locally-known endpoint; install immediately.
    Endpoint { local_entity_id: [u8; 4] },
    /// The addressed local endpoint is not discovered yet; caller should
    /// remember it via [`RememberedTokens::remember`].
    Pending { local_entity_id: [u8; 4] },
    /// Not addressed to us (wrong participant key) or unparseable class id;
    /// dropped silently. Reception errors are logged and the message is
    /// dropped; no negative acknowledgment is emitted.
    Ignored,
}

/// Decide what to do with an inbound CTT message.
///
/// `own_prefix` is this participant's GUID prefix; `endpoint_known`
/// reports whether `local_entity_id` already has a matcher-visible
/// endpoint so the token can be installed immediately rather than
/// remembered.
pub fn dispatch(
    msg: &VolatileMessage,
    own_prefix: [u8; 12],
    endpoint_known: impl FnOnce([u8; 4]) -> bool,
) -> Dispatch {
    let mut own_key = [0u8; 16];
    own_key[..12].copy_from_slice(&own_prefix);
    if msg.destination_participant_key != own_key && msg.destination_participant_key != ALL_ZERO_KEY
    {
        return Dispatch::Ignored;
    }
    let Some(class) = MessageClass::parse(&msg.message_class_id) else {
        return Dispatch::Ignored;
    };
    if class == MessageClass::ParticipantCryptoTokens || class == MessageClass::VolData {
        return Dispatch::Participant;
    }
    let mut local_entity_id = [0u8; 4];
    local_entity_id.copy_from_slice(&msg.destination_endpoint_key[12..16]);
    if endpoint_known(local_entity_id) {
        Dispatch::Endpoint { local_entity_id }
    } else {
        Dispatch::Pending { local_entity_id }
    }
}
