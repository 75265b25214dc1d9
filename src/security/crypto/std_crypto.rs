// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! StdCrypto primitives: the AES-CTR/HMAC plugin's key schedule.
//!
//! This is the cryptographic primitive surface the rest of the crypto
//! subsystem (context registry, CTT wire format) builds on: raw
//! random/hash/HMAC/AES-CTR operations plus the exact session-key
//! derivation formula, and a chunked streaming API for fragmented RTPS
//! payloads.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{KeyIvInit, StreamCipher};
use ring::rand::{SecureRandom, SystemRandom};
use ring::signature::{self, UnparsedPublicKey};
use ring::{digest, hmac};

use crate::security::SecurityError;

type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;
type Aes256Ctr = ctr::Ctr128BE<aes::Aes256>;

/// Session counters never exceed this many blocks before a rekey is forced.
pub const MAX_BPSESSION: u32 = 2000;

/// Data-plane hash algorithm selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataHash {
    None,
    HmacSha1,
    HmacSha256,
}

/// Data-plane cipher algorithm selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataCipher {
    None,
    Aes128,
    Aes256,
}

impl DataCipher {
    /// Key size in bytes for this cipher, or 0 for `None`.
    #[must_use]
    pub fn key_len(self) -> usize {
        match self {
            DataCipher::None => 0,
            DataCipher::Aes128 => 16,
            DataCipher::Aes256 => 32,
        }
    }
}

impl DataHash {
    /// Output size in bytes for this HMAC, or 0 for `None`.
    #[must_use]
    pub fn output_len(self) -> usize {
        match self {
            DataHash::None => 0,
            DataHash::HmacSha1 => 20,
            DataHash::HmacSha256 => 32,
        }
    }
}

/// Validates that `data_hash`/`data_cipher` are mutually consistent:
/// AES256 implies SHA256, AES128 implies SHA1, none implies no cipher.
#[must_use]
pub fn consistent(hash: DataHash, cipher: DataCipher) -> bool {
    matches!(
        (hash, cipher),
        (DataHash::None, DataCipher::None)
            | (DataHash::HmacSha1, DataCipher::Aes128)
            | (DataHash::HmacSha256, DataCipher::Aes256)
    )
}

/// A hierarchical, long-lived per-direction master key.
#[derive(Clone, Debug)]
pub struct MasterKey {
    pub id: u32,
    /// 16 or 32 bytes, matching `data_cipher`.
    pub key: Vec<u8>,
    /// HMAC key id, same size as `key`.
    pub hmac_key_id: Vec<u8>,
    /// Initialization vector, same size as `key` if a cipher is enabled.
    pub iv: Option<Vec<u8>>,
}

/// A session key derived from a [`MasterKey`] plus a session id.
#[derive(Clone, Debug)]
pub struct SessionKey {
    pub id: u32,
    pub hmac_key: Vec<u8>,
    pub enc_key: Vec<u8>,
    pub salt: [u8; 16],
    pub counter: u32,
}

impl SessionKey {
    /// `true` once `counter` would advance to or beyond [`MAX_BPSESSION`]
    /// after encrypting `additional_blocks` more blocks.
    #[must_use]
    pub fn needs_rekey(&self, additional_blocks: u32) -> bool {
        self.counter.saturating_add(additional_blocks) >= MAX_BPSESSION
    }
}

fn hmac_raw(key: &[u8], parts: &[&[u8]], algo: hmac::Algorithm) -> hmac::Tag {
    let key = hmac::Key::new(algo, key);
    let mut ctx = hmac::Context::with_key(&key);
    for p in parts {
        ctx.update(p);
    }
    ctx.sign()
}

/// Derive a [`SessionKey`] from `master` for session id `session_id`:
///
/// ```text
/// session.hmac  = HMAC("SessionHMACKey" || H || s, M) truncated to key size
/// session.key   = HMAC("SessionKey" || V || s || 0x01, M)
/// session.salt  = HMAC("SessionSalt" || V || s || 0x00, M) truncated to 16B
/// session.counter = 0
/// ```
///
/// `M` is `master.key`, `H` is `master.hmac_key_id`, `V` is `master.iv`
/// (empty if the cipher is disabled).
#[must_use]
pub fn derive_session_key(master: &MasterKey, session_id: u32, hash: DataHash) -> SessionKey {
    let algo = match hash {
        DataHash::HmacSha256 | DataHash::None => hmac::HMAC_SHA256,
        DataHash::HmacSha1 => hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
    };
    let s = session_id.to_le_bytes();
    let v = master.iv.clone().unwrap_or_default();

    let hmac_tag = hmac_raw(
        &master.key,
        &[b"SessionHMACKey", &master.hmac_key_id, &s],
        algo,
    );
    let key_tag = hmac_raw(&master.key, &[b"SessionKey", &v, &s, &[0x01]], algo);
    let salt_tag = hmac_raw(&master.key, &[b"SessionSalt", &v, &s, &[0x00]], algo);

    let key_len = master.key.len();
    let mut salt = [0u8; 16];
    salt.copy_from_slice(&salt_tag.as_ref()[..16]);

    SessionKey {
        id: session_id,
        hmac_key: hmac_tag.as_ref()[..hash.output_len().max(1).min(hmac_tag.as_ref().len())]
            .to_vec(),
        enc_key: key_tag.as_ref()[..key_len.min(key_tag.as_ref().len())].to_vec(),
        salt,
        counter: 0,
    }
}

/// Fill `n` random bytes via the system CSPRNG.
pub fn random(n: usize) -> Result<Vec<u8>, SecurityError> {
    let rng = SystemRandom::new();
    let mut buf = vec![0u8; n];
    rng.fill(&mut buf)
        .map_err(|_| SecurityError::CryptoError("SystemRandom failed".to_string()))?;
    Ok(buf)
}

/// SHA256 of `data`.
#[must_use]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let digest = digest::digest(&digest::SHA256, data);
    let mut out = [0u8; 32];
    out.copy_from_slice(digest.as_ref());
    out
}

/// HMAC-SHA1 of `msg` under `key`.
#[must_use]
pub fn hmac_sha1(key: &[u8], msg: &[u8]) -> Vec<u8> {
    hmac_raw(key, &[msg], hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY)
        .as_ref()
        .to_vec()
}

/// HMAC-SHA256 of `msg` under `key`.
#[must_use]
pub fn hmac_sha256(key: &[u8], msg: &[u8]) -> [u8; 32] {
    let tag = hmac_raw(key, &[msg], hmac::HMAC_SHA256);
    let mut out = [0u8; 32];
    out.copy_from_slice(tag.as_ref());
    out
}

/// AES-128/256-CTR in place, advancing `counter` so chained blocks
/// continue the keystream.
///
/// `salt` is the 16-byte session salt; the running IV is `salt` with the
/// low 32 bits replaced by the block counter, matching the common DDS
/// Security StdCrypto convention.
pub fn aes_ctr_apply(
    cipher: DataCipher,
    key: &[u8],
    salt: &[u8; 16],
    counter: &mut u32,
    data: &mut [u8],
) -> Result<(), SecurityError> {
    let mut iv = *salt;
    iv[12..16].copy_from_slice(&counter.to_be_bytes());

    match cipher {
        DataCipher::None => {}
        DataCipher::Aes128 => {
            if key.len() != 16 {
                return Err(SecurityError::CryptoError("AES128 key must be 16B".into()));
            }
            let key = GenericArray::from_slice(key);
            let iv = GenericArray::from_slice(&iv);
            let mut c = Aes128Ctr::new(key, iv);
            c.apply_keystream(data);
        }
        DataCipher::Aes256 => {
            if key.len() != 32 {
                return Err(SecurityError::CryptoError("AES256 key must be 32B".into()));
            }
            let key = GenericArray::from_slice(key);
            let iv = GenericArray::from_slice(&iv);
            let mut c = Aes256Ctr::new(key, iv);
            c.apply_keystream(data);
        }
    }

    let blocks = data.len().div_ceil(16) as u32;
    *counter = counter.wrapping_add(blocks.max(1));
    Ok(())
}

/// RSA-PKCS1-SHA256 sign over `data`, parameterized by an identity handle
/// the plugin uses to locate the private key. The handle is opaque here;
/// the caller supplies the PKCS8 private key PEM it resolves to.
pub fn sign_sha256(private_key_pkcs8_pem: &[u8], data: &[u8]) -> Result<Vec<u8>, SecurityError> {
    let pem = ::pem::parse(private_key_pkcs8_pem)
        .map_err(|e| SecurityError::CryptoError(format!("bad private key PEM: {e}")))?;
    let key_pair = signature::RsaKeyPair::from_pkcs8(pem.contents())
        .map_err(|e| SecurityError::CryptoError(format!("bad RSA key: {e:?}")))?;
    let rng = SystemRandom::new();
    let mut sig = vec![0u8; key_pair.public().modulus_len()];
    key_pair
        .sign(&signature::RSA_PKCS1_SHA256, &rng, data, &mut sig)
        .map_err(|e| SecurityError::CryptoError(format!("RSA sign failed: {e:?}")))?;
    Ok(sig)
}

/// RSA-PKCS1-SHA256 verify of `signature` over `data` under the public key
/// embedded in `certificate_der_spki`.
pub fn verify_sha256(
    public_key_spki_der: &[u8],
    data: &[u8],
    signature: &[u8],
) -> Result<bool, SecurityError> {
    let key = UnparsedPublicKey::new(&signature::RSA_PKCS1_2048_8192_SHA256, public_key_spki_der);
    Ok(key.verify(data, signature).is_ok())
}

/// A chunked byte-string node: head pointer, this chunk's length, total
/// remaining length, next pointer. Lets `BEGIN -> UPDATE* -> END` process
/// fragmented RTPS payloads without first concatenating them into one
/// buffer.
pub struct Chunk<'a> {
    pub data: &'a [u8],
    pub next: Option<Box<Chunk<'a>>>,
}

impl<'a> Chunk<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, next: None }
    }

    #[must_use]
    pub fn chain(mut self, next: Chunk<'a>) -> Self {
        self.next = Some(Box::new(next));
        self
    }

    fn for_each(&self, mut f: impl FnMut(&[u8])) {
        let mut cur = Some(self);
        while let Some(c) = cur {
            f(c.data);
            cur = c.next.as_deref();
        }
    }
}

/// Streaming HMAC-SHA256 session signer driven as `BEGIN -> UPDATE* -> END`
/// so a fragmented [`Chunk`] list never needs to be concatenated first.
pub struct StreamingHmac {
    ctx: hmac::Context,
}

impl StreamingHmac {
    /// BEGIN: start a streaming HMAC under `key`.
    #[must_use]
    pub fn begin(key: &[u8]) -> Self {
        let k = hmac::Key::new(hmac::HMAC_SHA256, key);
        Self { ctx: hmac::Context::with_key(&k) }
    }

    /// UPDATE: feed one more chunk.
    pub fn update(&mut self, data: &[u8]) {
        self.ctx.update(data);
    }

    /// UPDATE over a whole chunk chain in one call.
    pub fn update_chunks(&mut self, chunks: &Chunk<'_>) {
        chunks.for_each(|d| self.ctx.update(d));
    }

    /// END: finalize and return the tag.
    #[must_use]
    pub fn end(self) -> [u8; 32] {
        let tag = self.ctx.sign();
        let mut out = [0u8; 32];
        out.copy_from_slice(tag.as_ref());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn master(cipher: DataCipher) -> MasterKey {
        MasterKey {
            id: 1,
            key: vec![0x11; cipher.key_len()],
            hmac_key_id: vec![0x22; cipher.key_len()],
            iv: Some(vec![0x33; cipher.key_len()]),
        }
    }

    #[test]
    fn test_consistency_invariant() {
        assert!(consistent(DataHash::None, DataCipher::None));
        assert!(consistent(DataHash::HmacSha1, DataCipher::Aes128));
        assert!(consistent(DataHash::HmacSha256, DataCipher::Aes256));
        assert!(!consistent(DataHash::HmacSha256, DataCipher::Aes128));
        assert!(!consistent(DataHash::None, DataCipher::Aes128));
    }

    #[test]
    fn test_session_key_derivation_is_deterministic() {
        let m = master(DataCipher::Aes256);
        let a = derive_session_key(&m, 42, DataHash::HmacSha256);
        let b = derive_session_key(&m, 42, DataHash::HmacSha256);
        assert_eq!(a.enc_key, b.enc_key);
        assert_eq!(a.salt, b.salt);
        assert_eq!(a.hmac_key, b.hmac_key);
        assert_eq!(a.counter, 0);
    }

    #[test]
    fn test_session_key_derivation_differs_per_session_id() {
        let m = master(DataCipher::Aes256);
        let a = derive_session_key(&m, 1, DataHash::HmacSha256);
        let b = derive_session_key(&m, 2, DataHash::HmacSha256);
        assert_ne!(a.enc_key, b.enc_key);
    }

    #[test]
    fn test_needs_rekey_at_threshold() {
        let mut sk = derive_session_key(&master(DataCipher::Aes256), 1, DataHash::HmacSha256);
        sk.counter = MAX_BPSESSION - 1;
        assert!(sk.needs_rekey(1));
        sk.counter = MAX_BPSESSION - 2;
        assert!(!sk.needs_rekey(1));
    }

    #[test]
    fn test_aes_ctr_roundtrip_and_counter_advances() {
        let key = vec![0x42u8; 32];
        let salt = [0x01u8; 16];
        let mut counter = 0u32;
        let mut buf = b"hello secure dds world!".to_vec();
        let plaintext = buf.clone();
        aes_ctr_apply(DataCipher::Aes256, &key, &salt, &mut counter, &mut buf).unwrap();
        assert_ne!(buf, plaintext);
        assert!(counter > 0);

        let mut counter2 = 0u32;
        aes_ctr_apply(DataCipher::Aes256, &key, &salt, &mut counter2, &mut buf).unwrap();
        assert_eq!(buf, plaintext);
    }

    #[test]
    fn test_sha256_twice_is_identical() {
        let a = sha256(b"payload");
        let b = sha256(b"payload");
        assert_eq!(a, b);
    }

    #[test]
    fn test_streaming_hmac_matches_whole_buffer() {
        let key = b"k";
        let whole = hmac_sha256(key, b"abcdef");
        let mut s = StreamingHmac::begin(key);
        let c2 = Chunk::new(b"def");
        let c1 = Chunk::new(b"abc").chain(c2);
        s.update_chunks(&c1);
        assert_eq!(s.end(), whole);
    }
}
