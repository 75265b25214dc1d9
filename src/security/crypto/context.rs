// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crypto context registry: per-entity key material for the `StdCrypto`
//! plugin.
//!
//! A [`CryptoContext`] holds one entity's (participant or endpoint) key
//! material: data master+session key, optional Tx/Rx signing keys, and --
//! for remote participants -- the KxKey pair used solely to protect crypto
//! tokens in transit, plus a skiplist of per-endpoint key records so
//! tokens that arrive before the corresponding endpoint is locally
//! discovered can be installed once it is (mirrors [`crate::ctt::RememberedTokens`]).

use std::collections::BTreeMap;

use crate::handle::{Handle, HandleTable};
use crate::security::crypto::std_crypto::{
    self, DataCipher, DataHash, MasterKey, SessionKey, MAX_BPSESSION,
};
use crate::security::SecurityError;

/// Label used to derive `KxKey` from the handshake shared secret, following
/// the same labeled-HMAC style as the session-key derivation.
const KX_KEY_LABEL: &[u8] = b"dds.sec.kx_key";
/// Label used to derive `KxMacKey` from the handshake shared secret.
const KX_MAC_KEY_LABEL: &[u8] = b"dds.sec.kx_mac_key";

/// The two 256-bit keys derived from a PSMP handshake's shared secret,
/// used only to protect CTT tokens in transit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KxKeys {
    pub kx_key: [u8; 32],
    pub kx_mac_key: [u8; 32],
}

/// Derive the [`KxKeys`] pair from a handshake's 32-byte shared secret.
/// Both participants derive identical keys from the same secret since the
/// derivation is a pure function of `secret`.
#[must_use]
pub fn derive_kx_keys(secret: &[u8; 32]) -> KxKeys {
    KxKeys {
        kx_key: std_crypto::hmac_sha256(KX_KEY_LABEL, secret),
        kx_mac_key: std_crypto::hmac_sha256(KX_MAC_KEY_LABEL, secret),
    }
}

/// Whether this context belongs to a participant or an endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    Participant,
    Endpoint,
}

/// One direction's master+session key pair, rekeying itself once the
/// session counter would cross [`MAX_BPSESSION`].
pub struct KeyedDirection {
    pub master: MasterKey,
    pub session: SessionKey,
    next_session_id: u32,
}

impl KeyedDirection {
    #[must_use]
    pub fn new(master: MasterKey, hash: DataHash) -> Self {
        let session = std_crypto::derive_session_key(&master, 0, hash);
        Self { master, session, next_session_id: 1 }
    }

    /// Encrypt `additional_blocks` more blocks' worth of data under the
    /// current session, rekeying first if that would cross
    /// [`MAX_BPSESSION`]: an encrypt invocation that would advance the
    /// counter to or beyond the threshold first produces a new session id
    /// different from the previous one.
    pub fn prepare_for_blocks(&mut self, additional_blocks: u32, hash: DataHash) -> bool {
        if self.session.needs_rekey(additional_blocks) {
            let id = self.next_session_id;
            self.next_session_id = self.next_session_id.wrapping_add(1);
            self.session = std_crypto::derive_session_key(&self.master, id, hash);
            true
        } else {
            false
        }
    }

    /// Accept a newly observed remote session id on the Rx side, rederiving
    /// the decrypt session whenever it differs from the current one.
    pub fn resync_rx(&mut self, received_session_id: u32, hash: DataHash) {
        if received_session_id != self.session.id {
            self.session = std_crypto::derive_session_key(&self.master, received_session_id, hash);
        }
    }
}

/// Plugin-opaque key block for one entity.
pub struct CryptoContext {
    pub owner: Owner,
    pub data_hash: DataHash,
    pub data_cipher: DataCipher,
    pub sign_hash: DataHash,
    pub data: KeyedDirection,
    pub tx_signing: Option<KeyedDirection>,
    pub rx_signing: Option<KeyedDirection>,
    /// KxKeys, present only for remote-participant contexts.
    pub kx: Option<KxKeys>,
    /// One encode-session and one decode-session for CTT token transport,
    /// present only for remote-participant contexts.
    pub kx_encode_session: Option<SessionKey>,
    pub kx_decode_session: Option<SessionKey>,
    /// Per-remote-entity-id key records stored before the endpoint is
    /// locally known, keyed by remote entity id, so that tokens can be
    /// stored before the endpoint is locally known.
    endpoint_keys: BTreeMap<[u8; 4], MasterKey>,
}

impl CryptoContext {
    #[must_use]
    pub fn new_local(
        owner: Owner,
        data_hash: DataHash,
        data_cipher: DataCipher,
        sign_hash: DataHash,
        data_master: MasterKey,
    ) -> Self {
        assert!(
            std_crypto::consistent(data_hash, data_cipher),
            "data_hash/data_cipher must be mutually consistent"
        );
        Self {
            owner,
            data_hash,
            data_cipher,
            sign_hash,
            data: KeyedDirection::new(data_master, data_hash),
            tx_signing: None,
            rx_signing: None,
            kx: None,
            kx_encode_session: None,
            kx_decode_session: None,
            endpoint_keys: BTreeMap::new(),
        }
    }

    /// Attach the KxKeys pair derived from a PSMP handshake's shared
    /// secret, establishing the encode/decode sessions CTT uses for this
    /// remote participant's tokens.
    pub fn install_kx(&mut self, kx: KxKeys) {
        let encode_master = MasterKey {
            id: 0,
            key: kx.kx_key.to_vec(),
            hmac_key_id: kx.kx_mac_key.to_vec(),
            iv: Some(kx.kx_key.to_vec()),
        };
        self.kx_encode_session = Some(std_crypto::derive_session_key(
            &encode_master,
            0,
            DataHash::HmacSha256,
        ));
        self.kx_decode_session = Some(std_crypto::derive_session_key(
            &encode_master,
            0,
            DataHash::HmacSha256,
        ));
        self.kx = Some(kx);
    }

    /// Remember a master key for `remote_entity_id` before its endpoint is
    /// locally discovered.
    pub fn remember_endpoint_key(&mut self, remote_entity_id: [u8; 4], key: MasterKey) {
        self.endpoint_keys.insert(remote_entity_id, key);
    }

    /// Take the remembered key for `remote_entity_id`, if any, e.g. once
    /// SEDP discovers the corresponding endpoint.
    pub fn take_endpoint_key(&mut self, remote_entity_id: [u8; 4]) -> Option<MasterKey> {
        self.endpoint_keys.remove(&remote_entity_id)
    }

    /// Encrypt `plaintext` in place under the data session, rekeying first
    /// if needed, and returns the session id the ciphertext was produced
    /// under (callers attach it to the wire header).
    pub fn encrypt_data(&mut self, plaintext: &mut [u8]) -> Result<u32, SecurityError> {
        let blocks = plaintext.len().div_ceil(16) as u32;
        self.data.prepare_for_blocks(blocks, self.data_hash);
        let mut counter = self.data.session.counter;
        std_crypto::aes_ctr_apply(
            self.data_cipher,
            &self.data.session.enc_key,
            &self.data.session.salt,
            &mut counter,
            plaintext,
        )?;
        self.data.session.counter = counter;
        Ok(self.data.session.id)
    }
}

/// Process-wide crypto context registry, handle-keyed. Handles start at
/// 32 slots and grow by 32 on exhaustion.
#[derive(Default)]
pub struct CryptoContextRegistry {
    table: HandleTable<CryptoContext>,
}

impl CryptoContextRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { table: HandleTable::new() }
    }

    pub fn register(&mut self, ctx: CryptoContext) -> crate::error::Result<Handle> {
        self.table.alloc(ctx)
    }

    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&CryptoContext> {
        self.table.get(handle)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut CryptoContext> {
        self.table.get_mut(handle)
    }

    /// Release the context's key material. Crypto contexts follow the
    /// lifetime of their owner entity.
    pub fn release(&mut self, handle: Handle) -> crate::error::Result<()> {
        self.table.free(handle).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aes256_master() -> MasterKey {
        MasterKey {
            id: 7,
            key: vec![0xAB; 32],
            hmac_key_id: vec![0xCD; 32],
            iv: Some(vec![0xEF; 32]),
        }
    }

    #[test]
    fn test_kx_keys_are_deterministic_from_secret() {
        let secret = [0x5A; 32];
        let a = derive_kx_keys(&secret);
        let b = derive_kx_keys(&secret);
        assert_eq!(a, b);
        assert_ne!(a.kx_key, a.kx_mac_key);
    }

    #[test]
    fn test_rekey_on_threshold_changes_session_id() {
        let mut dir = KeyedDirection::new(aes256_master(), DataHash::HmacSha256);
        let before_id = dir.session.id;
        dir.session.counter = MAX_BPSESSION - 1;
        let rekeyed = dir.prepare_for_blocks(5, DataHash::HmacSha256);
        assert!(rekeyed);
        assert_ne!(dir.session.id, before_id);
        assert_eq!(dir.session.counter, 0);
    }

    #[test]
    fn test_no_rekey_below_threshold() {
        let mut dir = KeyedDirection::new(aes256_master(), DataHash::HmacSha256);
        assert!(!dir.prepare_for_blocks(3, DataHash::HmacSha256));
    }

    #[test]
    fn test_rx_resync_on_new_session_id() {
        let mut dir = KeyedDirection::new(aes256_master(), DataHash::HmacSha256);
        let original = dir.session.enc_key.clone();
        dir.resync_rx(9, DataHash::HmacSha256);
        assert_ne!(dir.session.enc_key, original);
        assert_eq!(dir.session.id, 9);
    }

    #[test]
    fn test_remember_and_take_endpoint_key() {
        let mut ctx = CryptoContext::new_local(
            Owner::Endpoint,
            DataHash::HmacSha256,
            DataCipher::Aes256,
            DataHash::HmacSha256,
            aes256_master(),
        );
        ctx.remember_endpoint_key([1, 2, 3, 4], aes256_master());
        assert!(ctx.take_endpoint_key([1, 2, 3, 4]).is_some());
        assert!(ctx.take_endpoint_key([1, 2, 3, 4]).is_none());
    }

    #[test]
    fn test_registry_roundtrip() {
        let mut reg = CryptoContextRegistry::new();
        let ctx = CryptoContext::new_local(
            Owner::Participant,
            DataHash::HmacSha256,
            DataCipher::Aes256,
            DataHash::HmacSha256,
            aes256_master(),
        );
        let h = reg.register(ctx).unwrap();
        assert!(reg.get(h).is_some());
        reg.release(h).unwrap();
        assert!(reg.get(h).is_none());
    }

    #[test]
    fn test_encrypt_data_advances_counter_and_can_rekey() {
        let mut ctx = CryptoContext::new_local(
            Owner::Endpoint,
            DataHash::HmacSha256,
            DataCipher::Aes256,
            DataHash::HmacSha256,
            aes256_master(),
        );
        ctx.data.session.counter = MAX_BPSESSION - 1;
        let id_before = ctx.data.session.id;
        let mut payload = vec![0u8; 32];
        let session_id = ctx.encrypt_data(&mut payload).unwrap();
        assert_ne!(session_id, id_before);
    }
}
