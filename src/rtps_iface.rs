// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! External RTPS interface.
//!
//! The handshake FSM and endpoint matcher never open a socket, fragment a
//! payload, or touch a history cache directly -- "the core never writes
//! to the wire directly." Every side effect that must reach the RTPS data
//! path is expressed as a call on [`RtpsInterface`], so the core can be
//! driven by a fake in unit tests and wired to the real RTPS engine (the
//! reliability/fragmentation/locator machinery this crate deliberately
//! does not own) in a full participant build.

use std::net::SocketAddr;
use std::time::SystemTime;

use crate::core::discovery::GUID;
use crate::error::Result;
use crate::handle::Handle;

/// Opaque handle to a local endpoint (writer or reader) as known to the
/// RTPS layer. Distinct from [`crate::handle::Handle`]: it is minted and
/// owned by the RTPS layer, not by this crate's handle table.
pub type EndpointHandle = u64;

/// Header/control metadata accompanying a `writer_write` call.
#[derive(Clone, Debug, Default)]
pub struct WriteControl {
    /// Instance handle the sample belongs to.
    pub instance_handle: u64,
    /// Handle-coherent-instance sequence used for ordered delivery.
    pub hci: u32,
    pub source_timestamp: Option<SystemTime>,
}

/// Interface consumed from the RTPS layer: `writer_create/delete`,
/// `reader_create/delete`, `matched_reader_add/remove`,
/// `matched_writer_add/remove`, `endpoint_locators_update`,
/// `endpoint_locality_update`, `writer_write`, `writer_unregister`,
/// `stateless_resend`, `endpoint_assert`, `peer_reader_crypto_get/set`,
/// `peer_writer_crypto_get/set`, `relay_add/remove`, plus the raw-datagram
/// primitives PSMP/CTT/SPDP need to reach a peer without owning a socket.
pub trait RtpsInterface: Send + Sync {
    fn writer_create(&self, guid: GUID) -> Result<EndpointHandle>;
    fn writer_delete(&self, writer: EndpointHandle) -> Result<()>;
    fn reader_create(&self, guid: GUID) -> Result<EndpointHandle>;
    fn reader_delete(&self, reader: EndpointHandle) -> Result<()>;

    /// Build (or tear down) the RTPS proxy for a newly (un)matched reader
    /// on a local writer.
    fn matched_reader_add(&self, writer: EndpointHandle, reader: GUID) -> Result<()>;
    fn matched_reader_remove(&self, writer: EndpointHandle, reader: GUID) -> Result<()>;
    /// Symmetric counterpart for a local reader's matched writers.
    fn matched_writer_add(&self, reader: EndpointHandle, writer: GUID) -> Result<()>;
    fn matched_writer_remove(&self, reader: EndpointHandle, writer: GUID) -> Result<()>;

    /// Notify RTPS that a peer's locator list changed so its proxies rebind.
    fn endpoint_locators_update(
        &self,
        ep: EndpointHandle,
        locators: &[SocketAddr],
        is_mcast: bool,
    ) -> Result<()>;
    /// Notify RTPS that a peer's same-host/same-process locality changed.
    fn endpoint_locality_update(&self, ep: EndpointHandle, is_local: bool) -> Result<()>;

    /// Hand a sample to the RTPS writer for transmission. `dst` is empty
    /// for a best-effort multicast write, non-empty for stateless unicast
    /// addressing (PSMP/CTT messages are always addressed this way).
    fn writer_write(
        &self,
        writer: EndpointHandle,
        data: &[u8],
        ctl: &WriteControl,
        dst: &[GUID],
    ) -> Result<()>;
    fn writer_unregister(&self, writer: EndpointHandle, instance_handle: u64) -> Result<()>;

    /// Re-send the last stateless message (PSMP retry path).
    fn stateless_resend(&self, writer: EndpointHandle) -> Result<()>;
    /// Mark an endpoint as asserted for liveliness purposes.
    fn endpoint_assert(&self, ep: EndpointHandle) -> Result<()>;

    fn peer_reader_crypto_get(&self, reader: GUID) -> Option<Handle>;
    fn peer_reader_crypto_set(&self, reader: GUID, handle: Handle);
    fn peer_writer_crypto_get(&self, writer: GUID) -> Option<Handle>;
    fn peer_writer_crypto_set(&self, writer: GUID, handle: Handle);

    /// Add/remove a relay destination for an endpoint (multi-homed or
    /// TCP-tunnel deployments).
    fn relay_add(&self, ep: EndpointHandle, dst: SocketAddr) -> Result<()>;
    fn relay_remove(&self, ep: EndpointHandle, dst: SocketAddr) -> Result<()>;

    /// Send a raw datagram to the well-known SPDP multicast group.
    fn send_multicast(&self, packet: &[u8]) -> Result<()>;
    /// Send a raw datagram to a specific unicast destination.
    fn send_to(&self, packet: &[u8], dst: SocketAddr) -> Result<()>;
    /// Local metatraffic unicast locators this participant listens on.
    fn unicast_locators(&self) -> Vec<SocketAddr>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use parking_lot::Mutex;

    /// In-memory fake used by unit tests for FSM/matcher code that needs
    /// an `RtpsInterface` without a real socket or history cache.
    #[derive(Default)]
    pub struct FakeRtps {
        pub sent_multicast: Mutex<Vec<Vec<u8>>>,
        pub sent_unicast: Mutex<Vec<(Vec<u8>, SocketAddr)>>,
        pub matched: Mutex<Vec<(EndpointHandle, GUID)>>,
    }

    impl RtpsInterface for FakeRtps {
        fn writer_create(&self, _guid: GUID) -> Result<EndpointHandle> {
            Ok(1)
        }
        fn writer_delete(&self, _writer: EndpointHandle) -> Result<()> {
            Ok(())
        }
        fn reader_create(&self, _guid: GUID) -> Result<EndpointHandle> {
            Ok(1)
        }
        fn reader_delete(&self, _reader: EndpointHandle) -> Result<()> {
            Ok(())
        }
        fn matched_reader_add(&self, writer: EndpointHandle, reader: GUID) -> Result<()> {
            self.matched.lock().push((writer, reader));
            Ok(())
        }
        fn matched_reader_remove(&self, _writer: EndpointHandle, _reader: GUID) -> Result<()> {
            Ok(())
        }
        fn matched_writer_add(&self, reader: EndpointHandle, writer: GUID) -> Result<()> {
            self.matched.lock().push((reader, writer));
            Ok(())
        }
        fn matched_writer_remove(&self, _reader: EndpointHandle, _writer: GUID) -> Result<()> {
            Ok(())
        }
        fn endpoint_locators_update(
            &self,
            _ep: EndpointHandle,
            _locators: &[SocketAddr],
            _is_mcast: bool,
        ) -> Result<()> {
            Ok(())
        }
        fn endpoint_locality_update(&self, _ep: EndpointHandle, _is_local: bool) -> Result<()> {
            Ok(())
        }
        fn writer_write(
            &self,
            _writer: EndpointHandle,
            _data: &[u8],
            _ctl: &WriteControl,
            _dst: &[GUID],
        ) -> Result<()> {
            Ok(())
        }
        fn writer_unregister(&self, _writer: EndpointHandle, _instance_handle: u64) -> Result<()> {
            Ok(())
        }
        fn stateless_resend(&self, _writer: EndpointHandle) -> Result<()> {
            Ok(())
        }
        fn endpoint_assert(&self, _ep: EndpointHandle) -> Result<()> {
            Ok(())
        }
        fn peer_reader_crypto_get(&self, _reader: GUID) -> Option<Handle> {
            None
        }
        fn peer_reader_crypto_set(&self, _reader: GUID, _handle: Handle) {}
        fn peer_writer_crypto_get(&self, _writer: GUID) -> Option<Handle> {
            None
        }
        fn peer_writer_crypto_set(&self, _writer: GUID, _handle: Handle) {}
        fn relay_add(&self, _ep: EndpointHandle, _dst: SocketAddr) -> Result<()> {
            Ok(())
        }
        fn relay_remove(&self, _ep: EndpointHandle, _dst: SocketAddr) -> Result<()> {
            Ok(())
        }
        fn send_multicast(&self, packet: &[u8]) -> Result<()> {
            self.sent_multicast.lock().push(packet.to_vec());
            Ok(())
        }
        fn send_to(&self, packet: &[u8], dst: SocketAddr) -> Result<()> {
            self.sent_unicast.lock().push((packet.to_vec(), dst));
            Ok(())
        }
        fn unicast_locators(&self) -> Vec<SocketAddr> {
            vec!["127.0.0.1:7411".parse().unwrap()]
        }
    }

    #[test]
    fn test_fake_rtps_records_multicast_sends() {
        let fake = FakeRtps::default();
        fake.send_multicast(b"hello").unwrap();
        assert_eq!(fake.sent_multicast.lock().len(), 1);
    }
}
