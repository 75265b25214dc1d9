// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Participant Stateless Message Protocol handshake state machine.
//!
//! One instance of [`PsmpFsm`] exists per peer participant discovered by
//! SPDP. It drives the three-message PKI-RSA (or DSA-DH)
//! handshake to completion, retrying on timeout and dropping replayed or
//! out-of-transaction tokens, and hands the authenticated (or failed)
//! outcome to SPDP/SEDP so endpoints can be enabled or ignored.

use std::time::Duration;

use crate::core::discovery::GUID;
use crate::token::DataHolder;

/// Identity-validation retry interval.
pub const PSMP_V_RETRY_TO: Duration = Duration::from_millis(200);
/// Handshake-request retry interval.
pub const PSMP_REQ_RETRY_TO: Duration = Duration::from_millis(900);
/// Reply retry interval.
pub const PSMP_REPLY_RETRY_TO: Duration = Duration::from_millis(900);
/// Replier's wait-for-initial-request interval.
pub const PSMP_WAIT_REQ_TO: Duration = Duration::from_millis(4000);
/// Wait-for-continuation-message interval.
pub const PSMP_WAIT_MSG_TO: Duration = Duration::from_millis(1000);
/// Authenticated-context cleanup interval.
pub const PSMP_CLEANUP_TO: Duration = Duration::from_millis(40_000);
/// Rearm delay after a FAILED participant is ignored.
pub const PSMP_WAIT_FAILED_TO: Duration = Duration::from_millis(5000);
/// `1 << rand(0..=PSMP_MAX_BACKOFF)` jitter ceiling for W_REQ/W_MSG retries.
pub const PSMP_MAX_BACKOFF: u32 = 3;

pub const MAX_VRI_RETRIES: u32 = 3;
pub const MAX_REQ_RETRIES: u32 = 31;
pub const MAX_REP_RETRIES: u32 = 31;
pub const MAX_HS_RETRIES: u32 = 31;
pub const MAX_WHS_RETRIES: u32 = 8;

/// Nonce length in bytes, including the literal "CHALLENGE:" prefix.
pub const NONCE_LEN: usize = 128;
pub const NONCE_PREFIX: &[u8] = b"CHALLENGE:";

/// The seven PSMP states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PsmpState {
    /// Identity-validation pending retry.
    RVri,
    /// Initiator must (re)send Request.
    RReq,
    /// Replier waiting for initial Request.
    WReq,
    /// Replier must (re)send Reply.
    RReply,
    /// Awaiting continuation (Reply on initiator / Final on replier).
    WMsg,
    /// Process-handshake pending retry.
    RHs,
    /// Authenticated, keeping context around for retransmits.
    WTo,
}

/// Outcome of validating a remote identity before PSMP starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthState {
    Ok,
    PendingHandshakeReq,
    PendingChallengeMsg,
    PendingRetry,
    Failed,
}

/// Role this participant plays in the handshake transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Initiator,
    Replier,
}

/// A `ParticipantStatelessMessage`: message identity, the
/// related (transaction) identity, endpoint addressing, and a class-id
/// tagged payload.
#[derive(Clone, Debug)]
pub struct StatelessMessage {
    pub source_guid: GUID,
    pub source_seq: u64,
    pub related_source_guid: GUID,
    pub related_seq: u64,
    pub destination_participant_key: [u8; 16],
    pub destination_endpoint_key: [u8; 16],
    pub source_endpoint_key: [u8; 16],
    pub message_class_id: String,
    pub message_data: Vec<DataHolder>,
}

/// Event kinds driving FSM transitions.
pub enum Event {
    TokenRx(StatelessMessage),
    Timeout,
}

/// Result of feeding an [`Event`] to the FSM: whether a message should be
/// (re)sent, whether the peer should now be treated as authenticated or
/// permanently failed, and whether the handshake context itself should now
/// be freed.
#[derive(Debug, Default)]
pub struct Action {
    pub send: Option<StatelessMessage>,
    pub authorized: bool,
    pub failed: bool,
    /// Set when the W_TO cleanup timer fires: the caller should free this
    /// `PsmpFsm` and stop tracking the peer's handshake handle.
    pub cleanup: bool,
}

/// Per-peer handshake state machine.
pub struct PsmpFsm {
    pub state: PsmpState,
    pub role: Role,
    peer: GUID,
    local_seq: u64,
    last_seqnr: u64,
    transaction_seq: u64,
    retries: u32,
    backoff_attempt: u32,
    last_sent: Option<StatelessMessage>,
}

impl PsmpFsm {
    #[must_use]
    pub fn new(peer: GUID, role: Role, initial_state: PsmpState) -> Self {
        Self {
            state: initial_state,
            role,
            peer,
            local_seq: 0,
            last_seqnr: 0,
            transaction_seq: 0,
            retries: 0,
            backoff_attempt: 0,
            last_sent: None,
        }
    }

    #[must_use]
    pub fn peer(&self) -> GUID {
        self.peer
    }

    fn next_seq(&mut self) -> u64 {
        self.local_seq += 1;
        self.local_seq
    }

    /// Timeout interval currently armed for `self.state`, honoring backoff
    /// for the two states that retry with exponential backoff (W_REQ, W_MSG).
    #[must_use]
    pub fn current_timeout(&self) -> Duration {
        match self.state {
            PsmpState::RVri => PSMP_V_RETRY_TO,
            PsmpState::RReq => PSMP_REQ_RETRY_TO,
            PsmpState::WReq => crate::timer::backoff_interval(
                PSMP_WAIT_REQ_TO,
                self.backoff_attempt,
                PSMP_MAX_BACKOFF,
            ),
            PsmpState::RReply => PSMP_REPLY_RETRY_TO,
            PsmpState::WMsg => {
                crate::timer::backoff_interval(PSMP_WAIT_MSG_TO, self.backoff_attempt, PSMP_MAX_BACKOFF)
            }
            PsmpState::RHs => PSMP_REQ_RETRY_TO,
            PsmpState::WTo => PSMP_CLEANUP_TO,
        }
    }

    /// Drops a message that is a duplicate or belongs to a stale
    /// transaction.
    fn accepts(&self, msg: &StatelessMessage) -> bool {
        if msg.source_seq <= self.last_seqnr {
            return false;
        }
        if msg.related_seq != self.transaction_seq {
            // A replier may start a new transaction if the new related-seq
            // is greater than the current one; an initiator ignores it.
            return self.role == Role::Replier && msg.related_seq > self.transaction_seq;
        }
        true
    }

    /// Feed one event to the FSM, returning the resulting [`Action`].
    pub fn on_event(&mut self, event: Event) -> Action {
        match event {
            Event::Timeout => self.on_timeout(),
            Event::TokenRx(msg) => {
                if !self.accepts(&msg) {
                    return Action::default();
                }
                self.last_seqnr = msg.source_seq;
                self.transaction_seq = msg.related_seq;
                self.on_token(msg)
            }
        }
    }

    fn on_timeout(&mut self) -> Action {
        self.retries += 1;
        let exhausted = |retries: u32, max: u32| retries > max;
        match self.state {
            PsmpState::RVri => {
                if exhausted(self.retries, MAX_VRI_RETRIES) {
                    self.state = PsmpState::WTo;
                    return Action { failed: true, ..Default::default() };
                }
                Action::default()
            }
            PsmpState::RReq => {
                if exhausted(self.retries, MAX_REQ_RETRIES) {
                    self.state = PsmpState::WTo;
                    return Action { failed: true, ..Default::default() };
                }
                let msg = self.build_request();
                self.state = PsmpState::WMsg;
                self.retries = 0;
                self.last_sent = Some(msg.clone());
                Action { send: Some(msg), ..Default::default() }
            }
            PsmpState::WReq => {
                if exhausted(self.retries, MAX_WHS_RETRIES) {
                    self.state = PsmpState::WTo;
                    return Action { failed: true, ..Default::default() };
                }
                self.backoff_attempt = self.backoff_attempt.saturating_add(1);
                let msg = self.wait_handshake_placeholder();
                Action { send: Some(msg), ..Default::default() }
            }
            PsmpState::RReply => {
                if exhausted(self.retries, MAX_REP_RETRIES) {
                    self.state = PsmpState::WTo;
                    return Action { failed: true, ..Default::default() };
                }
                let msg = self.build_reply();
                self.last_sent = Some(msg.clone());
                Action { send: Some(msg), ..Default::default() }
            }
            PsmpState::WMsg => {
                if exhausted(self.retries, MAX_HS_RETRIES) {
                    self.state = PsmpState::WTo;
                    return Action { failed: true, ..Default::default() };
                }
                self.backoff_attempt = self.backoff_attempt.saturating_add(1);
                Action { send: self.last_sent.clone(), ..Default::default() }
            }
            PsmpState::RHs => {
                if exhausted(self.retries, MAX_HS_RETRIES) {
                    self.state = PsmpState::WTo;
                    return Action { failed: true, ..Default::default() };
                }
                Action::default()
            }
            // W_TO: On Timeout -> Free context. The 40s cleanup window for
            // absorbing Final retransmits has elapsed; signal the caller to
            // release this handshake context.
            PsmpState::WTo => Action { cleanup: true, ..Default::default() },
        }
    }

    fn on_token(&mut self, msg: StatelessMessage) -> Action {
        match (self.state, self.role) {
            (PsmpState::WReq, Role::Replier) if msg.message_class_id == "Request" => {
                let reply = self.build_reply();
                self.state = PsmpState::WMsg;
                self.retries = 0;
                self.last_sent = Some(reply.clone());
                Action { send: Some(reply), ..Default::default() }
            }
            (PsmpState::WMsg, Role::Initiator) if msg.message_class_id == "Reply" => {
                let fin = self.build_final();
                self.state = PsmpState::WTo;
                self.retries = 0;
                self.last_sent = Some(fin.clone());
                Action { send: Some(fin), authorized: true, ..Default::default() }
            }
            (PsmpState::WMsg, Role::Replier) if msg.message_class_id == "Final" => {
                self.state = PsmpState::WTo;
                self.retries = 0;
                Action { authorized: true, ..Default::default() }
            }
            (PsmpState::WTo, _) => {
                // Keep the cleanup timer alive by resending our Final.
                Action { send: self.last_sent.clone(), ..Default::default() }
            }
            _ => Action::default(),
        }
    }

    fn stateless_envelope(&mut self, class_id: &str, data: Vec<DataHolder>) -> StatelessMessage {
        StatelessMessage {
            source_guid: self.peer,
            source_seq: self.next_seq(),
            related_source_guid: self.peer,
            related_seq: self.transaction_seq,
            destination_participant_key: self.peer.as_bytes(),
            destination_endpoint_key: [0; 16],
            source_endpoint_key: [0; 16],
            message_class_id: class_id.to_string(),
            message_data: data,
        }
    }

    fn build_request(&mut self) -> StatelessMessage {
        self.transaction_seq = self.local_seq + 1;
        self.stateless_envelope("Request", vec![])
    }

    fn build_reply(&mut self) -> StatelessMessage {
        self.stateless_envelope("Reply", vec![])
    }

    fn build_final(&mut self) -> StatelessMessage {
        self.stateless_envelope("Final", vec![])
    }

    fn wait_handshake_placeholder(&mut self) -> StatelessMessage {
        self.stateless_envelope("WaitHandshake", vec![])
    }
}

/// Generate a fresh challenge nonce: 128 bytes beginning with the literal
/// "CHALLENGE:" prefix followed by CSPRNG-filled bytes.
///
/// Freshness is what protects the handshake from replay (spec §4.4), so
/// the body is drawn from the system CSPRNG via [`std_crypto::random`],
/// not a non-cryptographic PRNG.
///
/// # Errors
///
/// Returns an error if the system CSPRNG fails, or if this crate was built
/// without the `security` feature (the PKI-RSA handshake that calls this
/// is unavailable in that configuration anyway).
///
/// [`std_crypto::random`]: crate::security::crypto::std_crypto::random
pub fn generate_nonce() -> Result<Vec<u8>, crate::security::SecurityError> {
    let mut nonce = Vec::with_capacity(NONCE_LEN);
    nonce.extend_from_slice(NONCE_PREFIX);

    #[cfg(feature = "security")]
    {
        let body = crate::security::crypto::std_crypto::random(NONCE_LEN - NONCE_PREFIX.len())?;
        nonce.extend_from_slice(&body);
    }
    #[cfg(not(feature = "security"))]
    {
        return Err(crate::security::SecurityError::CryptoError(
            "nonce generation requires the 'security' feature".to_string(),
        ));
    }

    Ok(nonce)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guid(b: u8) -> GUID {
        GUID::from_bytes([b; 16])
    }

    #[test]
    #[cfg(feature = "security")]
    fn test_nonce_has_challenge_prefix_and_length() {
        let nonce = generate_nonce().expect("CSPRNG should succeed in tests");
        assert_eq!(nonce.len(), NONCE_LEN);
        assert!(nonce.starts_with(NONCE_PREFIX));
    }

    #[test]
    #[cfg(feature = "security")]
    fn test_nonce_is_not_deterministic() {
        let a = generate_nonce().expect("CSPRNG should succeed in tests");
        let b = generate_nonce().expect("CSPRNG should succeed in tests");
        assert_ne!(a[NONCE_PREFIX.len()..], b[NONCE_PREFIX.len()..]);
    }

    #[test]
    fn test_r_req_timeout_sends_request_and_moves_to_w_msg() {
        let mut fsm = PsmpFsm::new(guid(1), Role::Initiator, PsmpState::RReq);
        let action = fsm.on_event(Event::Timeout);
        assert!(action.send.is_some());
        assert_eq!(fsm.state, PsmpState::WMsg);
    }

    #[test]
    fn test_r_vri_exhausts_after_max_retries() {
        let mut fsm = PsmpFsm::new(guid(1), Role::Initiator, PsmpState::RVri);
        for _ in 0..MAX_VRI_RETRIES {
            let action = fsm.on_event(Event::Timeout);
            assert!(!action.failed);
        }
        let action = fsm.on_event(Event::Timeout);
        assert!(action.failed);
        assert_eq!(fsm.state, PsmpState::WTo);
    }

    #[test]
    fn test_w_to_timeout_signals_cleanup() {
        let mut fsm = PsmpFsm::new(guid(1), Role::Initiator, PsmpState::WTo);
        let action = fsm.on_event(Event::Timeout);
        assert!(action.cleanup);
        assert!(!action.failed);
        assert!(action.send.is_none());
    }

    #[test]
    fn test_w_req_backoff_base_is_4s() {
        let fsm = PsmpFsm::new(guid(1), Role::Replier, PsmpState::WReq);
        // backoff_attempt starts at 0 -> no jitter shift yet, base must be
        // the full 4s wait-for-initial-request interval, not pre-divided.
        assert_eq!(fsm.current_timeout(), PSMP_WAIT_REQ_TO);
    }

    #[test]
    fn test_replier_completes_on_final() {
        let mut fsm = PsmpFsm::new(guid(2), Role::Replier, PsmpState::WReq);
        let req = StatelessMessage {
            source_guid: guid(9),
            source_seq: 1,
            related_source_guid: guid(9),
            related_seq: 0,
            destination_participant_key: [0; 16],
            destination_endpoint_key: [0; 16],
            source_endpoint_key: [0; 16],
            message_class_id: "Request".into(),
            message_data: vec![],
        };
        let action = fsm.on_event(Event::TokenRx(req));
        assert!(action.send.is_some());
        assert_eq!(fsm.state, PsmpState::WMsg);

        let fin = StatelessMessage {
            source_guid: guid(9),
            source_seq: 2,
            related_source_guid: guid(9),
            related_seq: fsm.transaction_seq,
            destination_participant_key: [0; 16],
            destination_endpoint_key: [0; 16],
            source_endpoint_key: [0; 16],
            message_class_id: "Final".into(),
            message_data: vec![],
        };
        let action = fsm.on_event(Event::TokenRx(fin));
        assert!(action.authorized);
        assert_eq!(fsm.state, PsmpState::WTo);
    }

    #[test]
    fn test_duplicate_sequence_is_dropped() {
        let mut fsm = PsmpFsm::new(guid(3), Role::Replier, PsmpState::WReq);
        let msg = StatelessMessage {
            source_guid: guid(9),
            source_seq: 1,
            related_source_guid: guid(9),
            related_seq: 0,
            destination_participant_key: [0; 16],
            destination_endpoint_key: [0; 16],
            source_endpoint_key: [0; 16],
            message_class_id: "Request".into(),
            message_data: vec![],
        };
        let first = fsm.on_event(Event::TokenRx(msg.clone()));
        assert!(first.send.is_some());
        let replay = fsm.on_event(Event::TokenRx(msg));
        assert!(replay.send.is_none());
        assert!(!replay.authorized);
    }
}
