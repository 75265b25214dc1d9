// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DCPS-facing callback interface.
//!
//! The application never polls this crate for match state; it registers
//! callbacks once via [`DcpsListener`] and the core drains notifications
//! into them from a dedicated dispatch path so no application callback
//! runs while the domain lock is held.

use crate::core::discovery::GUID;

/// Reason an endpoint transitioned to or from "matched".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchChange {
    /// A new compatible peer was found.
    Matched,
    /// A previously matched peer was removed (deleted, lease timeout, or
    /// revoked trust).
    Unmatched,
}

/// Reported when a local endpoint can see a remote endpoint on the same
/// topic but the two are incompatible. On first incompatibility, report
/// the specific policy id to the listener callback but record no match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchFailureReason {
    IncompatibleQos { policy_id: u32 },
    InconsistentTopic,
    DeniedByAccessControl,
}

/// Interface exposed to DCPS / application: callback
/// registration plus the two update entry points the application drives
/// when local QoS changes.
pub trait DcpsListener: Send + Sync {
    /// A local endpoint gained or lost a match against `peer`.
    fn on_match(&self, local: GUID, peer: GUID, change: MatchChange);
    /// A local endpoint saw a remote counterpart that cannot match it.
    fn on_unmatch_reason(&self, local: GUID, peer: GUID, reason: MatchFailureReason);
    /// Handshake/match processing for a participant has fully settled
    /// (authenticated and every topic re-matched, or permanently failed).
    fn on_done(&self, participant: GUID, accepted: bool);
}

/// Interface exposed to DCPS / application: the application
/// calls these when it changes a local writer/reader's QoS, which the
/// core turns into SEDP re-announcements and a matcher re-run.
pub trait DcpsUpdateSource {
    fn disc_writer_update(&self, writer: GUID, qos: &crate::qos::QoS);
    fn disc_reader_update(&self, reader: GUID, qos: &crate::qos::QoS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingListener {
        matches: Mutex<Vec<(GUID, GUID, MatchChange)>>,
    }

    impl DcpsListener for RecordingListener {
        fn on_match(&self, local: GUID, peer: GUID, change: MatchChange) {
            self.matches.lock().push((local, peer, change));
        }
        fn on_unmatch_reason(&self, _local: GUID, _peer: GUID, _reason: MatchFailureReason) {}
        fn on_done(&self, _participant: GUID, _accepted: bool) {}
    }

    #[test]
    fn test_listener_records_match_events() {
        let listener = RecordingListener::default();
        let a = GUID::from_bytes([0; 16]);
        let b = GUID::from_bytes([1; 16]);
        listener.on_match(a, b, MatchChange::Matched);
        assert_eq!(listener.matches.lock().len(), 1);
    }
}
