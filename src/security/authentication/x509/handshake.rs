// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The exact three-message PKI-RSA handshake carried over PSMP.
//!
//! [`super::plugin::X509AuthenticationPlugin`] implements the generic
//! two-message [`super::super::AuthenticationPlugin`] challenge-response
//! shape; this module implements the longer-lived per-transaction protocol
//! PSMP actually drives: Request (initiator sends `Na`), Reply (replier
//! sends `Nb` plus an ECDH public key signed over `Na || Nb`), and Final
//! (initiator replies with its own ECDH public key signed over
//! `Nb || dh1`). Both sides then hold the same ECDH shared secret, sealed
//! under RSA-signed messages rather than transmitted in the clear, which
//! [`crate::security::crypto::context::derive_kx_keys`] turns into the
//! KxKey/KxMacKey pair CTT uses.

use crate::psmp::{generate_nonce, Role};
use crate::security::crypto::context::{derive_kx_keys, KxKeys};
use crate::security::crypto::key_exchange::EcdhKeyExchange;
use crate::security::SecurityError;
use crate::token::DataHolder;

use super::crypto::{sign_data, verify_signature};

use ring::agreement::EphemeralPrivateKey;

pub const CLASS_ID_REQUEST: &str = "DDS:Auth:PKI-RSA:1.0+Req";
pub const CLASS_ID_REPLY: &str = "DDS:Auth:PKI-RSA:1.0+Reply";
pub const CLASS_ID_FINAL: &str = "DDS:Auth:PKI-RSA:1.0+Final";

/// Protocol generation; bumped if the wire layout of a message changes.
pub const POLICY_VERSION: u32 = 1;

const PROP_IDENTITY_CERT: &str = "c.id";
const PROP_CHALLENGE1: &str = "challenge1";
const PROP_CHALLENGE2: &str = "challenge2";
const PROP_DH2: &str = "dh2";
const PROP_DH1: &str = "dh1";
const PROP_SIGNATURE: &str = "signature";
const PROP_POLICY_VERSION: &str = "policy_version";

fn get_binary_property<'a>(dh: &'a DataHolder, name: &str) -> Option<&'a [u8]> {
    dh.binary_properties
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_slice())
}

fn get_string_property<'a>(dh: &'a DataHolder, name: &str) -> Option<&'a str> {
    dh.string_properties
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// The local certificate and private key used to sign handshake messages.
pub struct LocalIdentity {
    pub certificate_pem: Vec<u8>,
    pub private_key_pem: Vec<u8>,
}

/// Per-transaction handshake state. One instance tracks a single peer's
/// PSMP transaction from `create_req`/`create_reply` through `get_kx`.
pub struct HandshakeHandle {
    role: Role,
    na: Option<Vec<u8>>,
    nb: Option<Vec<u8>>,
    peer_certificate_pem: Option<Vec<u8>>,
    ecdh_private: Option<EphemeralPrivateKey>,
    ecdh_public: Option<Vec<u8>>,
    peer_ecdh_public: Option<Vec<u8>>,
    shared_secret: Option<[u8; 32]>,
}

impl HandshakeHandle {
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self {
            role,
            na: None,
            nb: None,
            peer_certificate_pem: None,
            ecdh_private: None,
            ecdh_public: None,
            peer_ecdh_public: None,
            shared_secret: None,
        }
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Initiator, step 1: build the Request carrying `Na` and the local
    /// identity certificate.
    pub fn create_req(&mut self, local: &LocalIdentity) -> Result<DataHolder, SecurityError> {
        let na = generate_nonce()?;
        self.na = Some(na.clone());

        Ok(DataHolder {
            class_id: CLASS_ID_REQUEST.to_string(),
            binary_properties: vec![
                (PROP_IDENTITY_CERT.to_string(), local.certificate_pem.clone()),
                (PROP_CHALLENGE1.to_string(), na),
            ],
            string_properties: vec![(PROP_POLICY_VERSION.to_string(), POLICY_VERSION.to_string())],
            ..Default::default()
        })
    }

    /// Replier, step 2: process the Request and build the Reply carrying
    /// `Nb`, an ephemeral ECDH public key, and a signature over `Na || Nb
    /// || dh2` under the replier's private key.
    pub fn create_reply(
        &mut self,
        local: &LocalIdentity,
        request: &DataHolder,
    ) -> Result<DataHolder, SecurityError> {
        let peer_cert = get_binary_property(request, PROP_IDENTITY_CERT)
            .ok_or_else(|| SecurityError::AuthenticationFailed("Request missing c.id".into()))?
            .to_vec();
        let na = get_binary_property(request, PROP_CHALLENGE1)
            .ok_or_else(|| {
                SecurityError::AuthenticationFailed("Request missing challenge1".into())
            })?
            .to_vec();

        let nb = generate_nonce()?;
        let (dh2_public, dh2_private) = EcdhKeyExchange::generate_keypair()?;

        let mut signed = Vec::with_capacity(na.len() + nb.len() + dh2_public.len());
        signed.extend_from_slice(&na);
        signed.extend_from_slice(&nb);
        signed.extend_from_slice(&dh2_public);
        let signature = sign_data(&signed, &local.private_key_pem)?;

        self.na = Some(na);
        self.nb = Some(nb.clone());
        self.peer_certificate_pem = Some(peer_cert);
        self.ecdh_private = Some(dh2_private);
        self.ecdh_public = Some(dh2_public.clone());

        Ok(DataHolder {
            class_id: CLASS_ID_REPLY.to_string(),
            binary_properties: vec![
                (PROP_IDENTITY_CERT.to_string(), local.certificate_pem.clone()),
                (PROP_CHALLENGE2.to_string(), nb),
                (PROP_DH2.to_string(), dh2_public),
                (PROP_SIGNATURE.to_string(), signature),
            ],
            string_properties: vec![(PROP_POLICY_VERSION.to_string(), POLICY_VERSION.to_string())],
            ..Default::default()
        })
    }

    /// Initiator, step 3: verify the Reply's signature, derive the ECDH
    /// shared secret, and build the Final carrying the initiator's own
    /// ephemeral ECDH public key signed over `Nb || dh1`.
    pub fn create_final(
        &mut self,
        local: &LocalIdentity,
        reply: &DataHolder,
    ) -> Result<DataHolder, SecurityError> {
        let na = self
            .na
            .clone()
            .ok_or_else(|| SecurityError::AuthenticationFailed("no pending Na".into()))?;

        let peer_cert = get_binary_property(reply, PROP_IDENTITY_CERT)
            .ok_or_else(|| SecurityError::AuthenticationFailed("Reply missing c.id".into()))?
            .to_vec();
        let nb = get_binary_property(reply, PROP_CHALLENGE2)
            .ok_or_else(|| SecurityError::AuthenticationFailed("Reply missing challenge2".into()))?
            .to_vec();
        let peer_dh2 = get_binary_property(reply, PROP_DH2)
            .ok_or_else(|| SecurityError::AuthenticationFailed("Reply missing dh2".into()))?
            .to_vec();
        let signature = get_binary_property(reply, PROP_SIGNATURE)
            .ok_or_else(|| SecurityError::AuthenticationFailed("Reply missing signature".into()))?
            .to_vec();

        let mut expected = Vec::with_capacity(na.len() + nb.len() + peer_dh2.len());
        expected.extend_from_slice(&na);
        expected.extend_from_slice(&nb);
        expected.extend_from_slice(&peer_dh2);
        if !verify_signature(&expected, &signature, &peer_cert)? {
            return Err(SecurityError::AuthenticationFailed(
                "Reply signature verification failed".into(),
            ));
        }

        let (dh1_public, dh1_private) = EcdhKeyExchange::generate_keypair()?;
        let shared_secret =
            EcdhKeyExchange::derive_shared_secret(dh1_private, &peer_dh2)?;
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&shared_secret);

        let mut signed = Vec::with_capacity(nb.len() + dh1_public.len());
        signed.extend_from_slice(&nb);
        signed.extend_from_slice(&dh1_public);
        let final_signature = sign_data(&signed, &local.private_key_pem)?;

        self.nb = Some(nb);
        self.peer_certificate_pem = Some(peer_cert);
        self.peer_ecdh_public = Some(peer_dh2);
        self.ecdh_public = Some(dh1_public.clone());
        self.shared_secret = Some(secret);

        Ok(DataHolder {
            class_id: CLASS_ID_FINAL.to_string(),
            binary_properties: vec![
                (PROP_DH1.to_string(), dh1_public),
                (PROP_SIGNATURE.to_string(), final_signature),
            ],
            string_properties: vec![(PROP_POLICY_VERSION.to_string(), POLICY_VERSION.to_string())],
            ..Default::default()
        })
    }

    /// Replier, step 4: verify the Final's signature and derive the same
    /// ECDH shared secret the initiator holds.
    pub fn check_final(&mut self, fin: &DataHolder) -> Result<(), SecurityError> {
        let nb = self
            .nb
            .clone()
            .ok_or_else(|| SecurityError::AuthenticationFailed("no pending Nb".into()))?;
        let peer_cert = self
            .peer_certificate_pem
            .clone()
            .ok_or_else(|| SecurityError::AuthenticationFailed("no peer certificate on file".into()))?;

        let peer_dh1 = get_binary_property(fin, PROP_DH1)
            .ok_or_else(|| SecurityError::AuthenticationFailed("Final missing dh1".into()))?
            .to_vec();
        let signature = get_binary_property(fin, PROP_SIGNATURE)
            .ok_or_else(|| SecurityError::AuthenticationFailed("Final missing signature".into()))?
            .to_vec();

        let mut expected = Vec::with_capacity(nb.len() + peer_dh1.len());
        expected.extend_from_slice(&nb);
        expected.extend_from_slice(&peer_dh1);
        if !verify_signature(&expected, &signature, &peer_cert)? {
            return Err(SecurityError::AuthenticationFailed(
                "Final signature verification failed".into(),
            ));
        }

        let own_private = self
            .ecdh_private
            .take()
            .ok_or_else(|| SecurityError::AuthenticationFailed("no local ECDH key on file".into()))?;
        let shared_secret = EcdhKeyExchange::derive_shared_secret(own_private, &peer_dh1)?;
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&shared_secret);

        self.peer_ecdh_public = Some(peer_dh1);
        self.shared_secret = Some(secret);
        Ok(())
    }

    /// The agreed shared secret, once both sides have completed their half
    /// of the exchange.
    #[must_use]
    pub fn shared_secret(&self) -> Option<&[u8; 32]> {
        self.shared_secret.as_ref()
    }

    /// Derive the KxKey/KxMacKey pair CTT uses to protect crypto tokens in
    /// transit, once a shared secret is available.
    #[must_use]
    pub fn get_kx(&self) -> Option<KxKeys> {
        self.shared_secret.map(|secret| derive_kx_keys(&secret))
    }

    /// Drop all key material this handshake holds. Called once the
    /// resulting crypto context has been installed or the handshake is
    /// abandoned.
    pub fn release_secret(&mut self) {
        self.shared_secret = None;
        self.ecdh_private = None;
    }

    /// Check the peer's certificate's policy version is one this side can
    /// interoperate with (only version 1 currently exists).
    #[must_use]
    pub fn accepts_policy_version(dh: &DataHolder) -> bool {
        let expected = POLICY_VERSION.to_string();
        get_string_property(dh, PROP_POLICY_VERSION) == Some(expected.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(cert_tag: u8, key_tag: u8) -> LocalIdentity {
        LocalIdentity {
            certificate_pem: vec![cert_tag; 8],
            private_key_pem: vec![key_tag; 8],
        }
    }

    #[test]
    fn test_request_carries_na_and_certificate() {
        let local = identity(1, 2);
        let mut initiator = HandshakeHandle::new(Role::Initiator);
        let req = initiator.create_req(&local).unwrap();
        assert_eq!(req.class_id, CLASS_ID_REQUEST);
        assert!(get_binary_property(&req, PROP_CHALLENGE1).is_some());
        assert_eq!(
            get_binary_property(&req, PROP_IDENTITY_CERT).unwrap(),
            local.certificate_pem.as_slice()
        );
    }

    #[test]
    fn test_full_handshake_yields_matching_shared_secret() {
        let initiator_identity = identity(1, 2);
        let replier_identity = identity(3, 4);

        let mut initiator = HandshakeHandle::new(Role::Initiator);
        let mut replier = HandshakeHandle::new(Role::Replier);

        let req = initiator.create_req(&initiator_identity).unwrap();
        let reply = replier.create_reply(&replier_identity, &req).unwrap();
        let fin = initiator.create_final(&initiator_identity, &reply).unwrap();
        replier.check_final(&fin).unwrap();

        let initiator_secret = initiator.shared_secret().unwrap();
        let replier_secret = replier.shared_secret().unwrap();
        assert_eq!(initiator_secret, replier_secret);

        assert_eq!(initiator.get_kx(), replier.get_kx());
    }

    #[test]
    fn test_tampered_reply_signature_is_rejected() {
        let initiator_identity = identity(1, 2);
        let replier_identity = identity(3, 4);

        let mut initiator = HandshakeHandle::new(Role::Initiator);
        let mut replier = HandshakeHandle::new(Role::Replier);

        let req = initiator.create_req(&initiator_identity).unwrap();
        let mut reply = replier.create_reply(&replier_identity, &req).unwrap();
        for (k, v) in reply.binary_properties.iter_mut() {
            if k == PROP_SIGNATURE {
                v[0] ^= 0xFF;
            }
        }

        assert!(initiator.create_final(&initiator_identity, &reply).is_err());
    }

    #[test]
    fn test_policy_version_is_accepted() {
        let local = identity(1, 2);
        let mut initiator = HandshakeHandle::new(Role::Initiator);
        let req = initiator.create_req(&local).unwrap();
        assert!(HandshakeHandle::accepts_policy_version(&req));
    }

    #[test]
    fn test_release_secret_clears_key_material() {
        let initiator_identity = identity(1, 2);
        let replier_identity = identity(3, 4);

        let mut initiator = HandshakeHandle::new(Role::Initiator);
        let mut replier = HandshakeHandle::new(Role::Replier);

        let req = initiator.create_req(&initiator_identity).unwrap();
        let reply = replier.create_reply(&replier_identity, &req).unwrap();
        let fin = initiator.create_final(&initiator_identity, &reply).unwrap();
        replier.check_final(&fin).unwrap();

        initiator.release_secret();
        assert!(initiator.shared_secret().is_none());
    }
}
