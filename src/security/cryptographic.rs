// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cryptographic Plugin SPI.
//!
//! The primitive surface the handshake and CTT layers call into:
//! randomness, hashing, HMAC, AES-CTR, and the RSA sign/verify family
//! parameterized by an identity handle the plugin uses to locate a key.
//! [`crate::security::crypto::std_crypto`] is the concrete AES-CTR/HMAC
//! implementation this trait is modeled on.

use super::SecurityError;
use crate::security::crypto::std_crypto::{self, DataCipher};

/// Cryptographic primitive plugin trait.
///
/// A plugin implementation resolves `identity` to whichever private/public
/// key material it holds; this crate's only implementor,
/// [`StdCryptoPrimitives`], is stateless and expects the caller to pass
/// key bytes directly rather than an opaque handle lookup, since key
/// storage is the job of [`crate::security::crypto::context::CryptoContextRegistry`].
pub trait CryptographicPlugin: Send + Sync {
    /// `random(n)` -- `n` cryptographically secure random bytes.
    fn random(&self, n: usize) -> Result<Vec<u8>, SecurityError>;

    /// `sha256(bytes)` -- 32-byte digest.
    fn sha256(&self, data: &[u8]) -> [u8; 32];

    /// `hmac_sha1(key, msg)`.
    fn hmac_sha1(&self, key: &[u8], msg: &[u8]) -> Vec<u8>;

    /// `hmac_sha256(key, msg)`.
    fn hmac_sha256(&self, key: &[u8], msg: &[u8]) -> [u8; 32];

    /// `aes128_ctr`/`aes256_ctr(key, salt, counter, msg)` in place,
    /// advancing `counter` so chained blocks continue the keystream.
    fn aes_ctr(
        &self,
        cipher: DataCipher,
        key: &[u8],
        salt: &[u8; 16],
        counter: &mut u32,
        data: &mut [u8],
    ) -> Result<(), SecurityError>;

    /// `sign_sha256`, parameterized by the signer's private key.
    fn sign_sha256(&self, private_key_pkcs8_pem: &[u8], data: &[u8]) -> Result<Vec<u8>, SecurityError>;

    /// `verify_sha256`, parameterized by the peer's public key.
    fn verify_sha256(
        &self,
        public_key_spki_der: &[u8],
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, SecurityError>;
}

/// The `StdCrypto` plugin's stateless primitive surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdCryptoPrimitives;

impl CryptographicPlugin for StdCryptoPrimitives {
    fn random(&self, n: usize) -> Result<Vec<u8>, SecurityError> {
        std_crypto::random(n)
    }

    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        std_crypto::sha256(data)
    }

    fn hmac_sha1(&self, key: &[u8], msg: &[u8]) -> Vec<u8> {
        std_crypto::hmac_sha1(key, msg)
    }

    fn hmac_sha256(&self, key: &[u8], msg: &[u8]) -> [u8; 32] {
        std_crypto::hmac_sha256(key, msg)
    }

    fn aes_ctr(
        &self,
        cipher: DataCipher,
        key: &[u8],
        salt: &[u8; 16],
        counter: &mut u32,
        data: &mut [u8],
    ) -> Result<(), SecurityError> {
        std_crypto::aes_ctr_apply(cipher, key, salt, counter, data)
    }

    fn sign_sha256(&self, private_key_pkcs8_pem: &[u8], data: &[u8]) -> Result<Vec<u8>, SecurityError> {
        std_crypto::sign_sha256(private_key_pkcs8_pem, data)
    }

    fn verify_sha256(
        &self,
        public_key_spki_der: &[u8],
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, SecurityError> {
        std_crypto::verify_sha256(public_key_spki_der, data, signature)
    }
}
