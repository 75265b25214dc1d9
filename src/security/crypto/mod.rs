// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cryptographic Plugin for DDS Security v1.1
//!
//! Provides data encryption/decryption using AES-256-GCM and key exchange
//! using ECDH P-256 per OMG DDS Security spec Sec.7.3.
//!
//! # Features
//!
//! - AES-256-GCM encryption for confidentiality
//! - ECDH P-256 key exchange for secure session key establishment
//! - HKDF session key derivation
//! - SecuredPayload submessage format (RTPS v2.5 Sec.9.6.2)
//!
//! # Example
//!
//! ```no_run
//! use hdds_secure_core::security::crypto::CryptoPlugin;
//!
//! let mut plugin = CryptoPlugin::new();
//! let session_key_id = plugin.generate_session_key()?;
//! let encrypted = plugin.encrypt_data(b"secret data", session_key_id)?;
//! let decrypted = plugin.decrypt_data(&encrypted, session_key_id)?;
//! # Ok::<(), hdds_secure_core::security::SecurityError>(())
//! ```

use crate::security::SecurityError;
use ring::agreement::EphemeralPrivateKey;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroize;

/// AES-256-GCM + ECDH-P256 key exchange, reused as the DSA-DH plugin
/// family's key-exchange building block: same shape as StdCrypto, different
/// signature/KX algorithms.
pub mod aes_gcm;
/// Crypto context registry: per-entity key material, KxKeys, rekey.
pub mod context;
pub mod key_exchange;
pub mod session_keys;
/// StdCrypto primitives: AES-CTR/HMAC key schedule.
pub mod std_crypto;
/// CTT crypto token wire layout.
pub mod token_wire;
pub mod transform;

// Re-export main types
pub use aes_gcm::AesGcmCipher;
pub use context::{derive_kx_keys, CryptoContext, CryptoContextRegistry, KxKeys, Owner};
pub use key_exchange::{EcdhKeyExchange, ECDH_P256_PUBLIC_KEY_LEN, ECDH_P256_SHARED_SECRET_LEN};
pub use session_keys::SessionKeyManager;
pub use std_crypto::{DataCipher, DataHash, MasterKey, SessionKey, MAX_BPSESSION};
pub use transform::SecuredPayload;

/// DDS Security v1.1 session key derivation info string
const SESSION_KEY_INFO: &[u8] = b"DDS Security v1.1 Session Key";

/// Cryptographic plugin implementing DDS Security v1.1 Sec.7.3
pub struct CryptoPlugin {
    /// Session key manager for key derivation and rotation
    key_manager: SessionKeyManager,
    /// Our current ECDH keypair (public key bytes, private key)
    /// Regenerated for each new key exchange to ensure forward secrecy
    pending_keypair: Option<(Vec<u8>, EphemeralPrivateKey)>,
}

impl CryptoPlugin {
    /// Create a new crypto plugin
    #[must_use]
    pub fn new() -> Self {
        Self {
            key_manager: SessionKeyManager::new(),
            pending_keypair: None,
        }
    }

    /// Initiate ECDH key exchange by generating our ephemeral keypair
    ///
    /// Returns our public key to send to the peer.
    /// The private key is kept internally for `complete_key_exchange`.
    ///
    /// # Returns
    ///
    /// Our P-256 public key (65 bytes, uncompressed format)
    ///
    /// # Example
    ///
    /// ```
    /// use hdds_secure_core::security::crypto::CryptoPlugin;
    ///
    /// let mut plugin = CryptoPlugin::new();
    /// let our_public_key = plugin.initiate_key_exchange().unwrap();
    /// assert_eq!(our_public_key.len(), 65); // P-256 uncompressed public key
    /// // Send our_public_key to peer...
    /// ```
    pub fn initiate_key_exchange(&mut self) -> Result<Vec<u8>, SecurityError> {
        let (public_key, private_key) = EcdhKeyExchange::generate_keypair()?;
        let public_key_copy = public_key.clone();
        self.pending_keypair = Some((public_key, private_key));
        Ok(public_key_copy)
    }

    /// Complete ECDH key exchange using peer's public key
    ///
    /// Derives a session key from the ECDH shared secret using HKDF.
    /// Must be called after `initiate_key_exchange`.
    ///
    /// # Arguments
    ///
    /// * `peer_public_key` - Peer's P-256 public key (65 bytes, uncompressed)
    ///
    /// # Returns
    ///
    /// Session key ID for use with `encrypt_data`/`decrypt_data`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hdds_secure_core::security::crypto::CryptoPlugin;
    ///
    /// let mut alice = CryptoPlugin::new();
    /// let mut bob = CryptoPlugin::new();
    ///
    /// // Alice initiates
    /// let alice_pub = alice.initiate_key_exchange().unwrap();
    ///
    /// // Bob initiates
    /// let bob_pub = bob.initiate_key_exchange().unwrap();
    ///
    /// // Alice completes with Bob's public key
    /// let alice_key_id = alice.complete_key_exchange(&bob_pub).unwrap();
    ///
    /// // Bob completes with Alice's public key
    /// let bob_key_id = bob.complete_key_exchange(&alice_pub).unwrap();
    ///
    /// // Both now have session keys derived from the same shared secret
    /// ```
    pub fn complete_key_exchange(&mut self, peer_public_key: &[u8]) -> Result<u64, SecurityError> {
        // Take our pending keypair (consumes the private key)
        let (our_public, private_key) = self.pending_keypair.take().ok_or_else(|| {
            SecurityError::CryptoError(
                "No pending key exchange - call initiate_key_exchange first".to_string(),
            )
        })?;

        // Validate peer's public key
        EcdhKeyExchange::deserialize_public_key(peer_public_key)?;

        // Derive ECDH shared secret
        let mut shared_secret =
            EcdhKeyExchange::derive_shared_secret(private_key, peer_public_key)?;

        // Generate unique salt from both public keys (ensures unique session keys)
        // Salt = SHA256(our_public || peer_public) - deterministic for both parties
        let mut salt_input = Vec::with_capacity(our_public.len() + peer_public_key.len());
        // Use consistent ordering: smaller public key first (lexicographic)
        if our_public < peer_public_key.to_vec() {
            salt_input.extend_from_slice(&our_public);
            salt_input.extend_from_slice(peer_public_key);
        } else {
            salt_input.extend_from_slice(peer_public_key);
            salt_input.extend_from_slice(&our_public);
        }

        // Derive session key using HKDF
        let session_key =
            SessionKeyManager::derive_session_key(&shared_secret, &salt_input, SESSION_KEY_INFO)?;

        // Zeroize shared secret immediately after key derivation
        shared_secret.zeroize();

        // Store and return key ID
        Ok(self.key_manager.store_session_key(session_key))
    }

    /// Encrypt data using the specified session key
    ///
    /// Uses the session key ID as AAD (Associated Authenticated Data) to bind
    /// the ciphertext to its session context, preventing cross-session replay.
    pub fn encrypt_data(
        &self,
        plaintext: &[u8],
        session_key_id: u64,
    ) -> Result<Vec<u8>, SecurityError> {
        let key = self
            .key_manager
            .get_session_key(session_key_id)
            .ok_or_else(|| {
                SecurityError::CryptoError(format!("Session key {} not found", session_key_id))
            })?;

        let cipher = AesGcmCipher::new(&key)?;
        let nonce = AesGcmCipher::generate_nonce()?;
        let aad = session_key_id.to_le_bytes();
        let ciphertext = cipher.encrypt(plaintext, &nonce, &aad)?;

        // Build SecuredPayload submessage
        let secured = SecuredPayload {
            session_key_id,
            nonce,
            ciphertext,
        };

        secured.encode()
    }

    /// Decrypt data using the specified session key
    ///
    /// Verifies that the AAD (session key ID) matches, preventing
    /// cross-session ciphertext replay attacks.
    pub fn decrypt_data(
        &self,
        secured_data: &[u8],
        session_key_id: u64,
    ) -> Result<Vec<u8>, SecurityError> {
        let secured = SecuredPayload::decode(secured_data)?;

        if secured.session_key_id != session_key_id {
            return Err(SecurityError::CryptoError(format!(
                "Session key ID mismatch: expected {}, got {}",
                session_key_id, secured.session_key_id
            )));
        }

        let key = self
            .key_manager
            .get_session_key(session_key_id)
            .ok_or_else(|| {
                SecurityError::CryptoError(format!("Session key {} not found", session_key_id))
            })?;

        let cipher = AesGcmCipher::new(&key)?;
        let aad = session_key_id.to_le_bytes();
        cipher.decrypt(&secured.ciphertext, &secured.nonce, &aad)
    }

    /// Generate a random session key (for testing or fallback)
    ///
    /// # Note
    ///
    /// For production use with peer communication, prefer the ECDH-based
    /// `initiate_key_exchange` + `complete_key_exchange` flow which provides
    /// forward secrecy and mutual authentication.
    ///
    /// This method generates a cryptographically random key directly,
    /// suitable for:
    /// - Local encryption (no peer)
    /// - Testing and development
    /// - Fallback when ECDH is not available
    pub fn generate_session_key(&mut self) -> Result<u64, SecurityError> {
        let rng = SystemRandom::new();
        let mut key = [0u8; 32];
        rng.fill(&mut key).map_err(|_| {
            SecurityError::CryptoError("Failed to generate random session key".to_string())
        })?;

        Ok(self.key_manager.store_session_key(key))
    }

    /// Get access to the session key manager
    #[must_use]
    pub fn key_manager(&self) -> &SessionKeyManager {
        &self.key_manager
    }

    /// Get mutable access to the session key manager
    pub fn key_manager_mut(&mut self) -> &mut SessionKeyManager {
        &mut self.key_manager
    }
}

impl Default for CryptoPlugin {
    fn default() -> Self {
        Self::new()
    }
}
