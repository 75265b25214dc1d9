// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crypto token wire layout for the AES-CTR/HMAC plugin.
//!
//! Builds and parses the `binary_value1`/`binary_value2` pair carried
//! inside a CTT [`crate::token::DataHolder`]: a CDR-encoded
//! [`KeyMaterial`] record encrypted under the receiver-specific KxKey with
//! AES256-CTR, followed by an HMAC-SHA256 over the ciphertext using the
//! KxMacKey.

use crate::security::crypto::context::KxKeys;
use crate::security::crypto::std_crypto::{self, DataCipher};
use crate::security::SecurityError;

/// `transform_kind_id` values for the wire header.
pub const TRANSFORM_NONE: u32 = 0x000;
pub const TRANSFORM_HMAC_SHA1: u32 = 0x100;
pub const TRANSFORM_HMAC_SHA256: u32 = 0x101;
pub const TRANSFORM_AES128_HMAC_SHA1: u32 = 0x200;
pub const TRANSFORM_AES256_HMAC_SHA256: u32 = 0x201;

/// Multiplier relating `transaction_id` to `session_id`.
const TRANSACTION_ID_FACTOR: u32 = 9_812_345;

/// The inner `KeyMaterial` record carried inside the encrypted
/// `binary_value1` payload: id, 16/32-byte key, HMAC key id, optional IV.
/// CDR-encoded with a 4-byte preamble whose second byte encodes
/// endianness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyMaterial {
    pub transformation_kind: u32,
    pub master_key: Vec<u8>,
    pub master_hmac_key_id: Vec<u8>,
    pub master_iv: Vec<u8>,
}

const PREAMBLE_BE: [u8; 4] = [0x00, 0x00, 0x00, 0x00];
const PREAMBLE_LE: [u8; 4] = [0x00, 0x01, 0x00, 0x00];

impl KeyMaterial {
    /// CDR-encode with the little-endian preamble (this crate never emits
    /// big-endian wire data, matching the rest of the discovery codecs).
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(4 + 4 + 4 + self.master_key.len() + 4 + self.master_hmac_key_id.len() + 4 + self.master_iv.len());
        buf.extend_from_slice(&PREAMBLE_LE);
        buf.extend_from_slice(&self.transformation_kind.to_le_bytes());
        write_seq(&mut buf, &self.master_key);
        write_seq(&mut buf, &self.master_hmac_key_id);
        write_seq(&mut buf, &self.master_iv);
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SecurityError> {
        if bytes.len() < 8 {
            return Err(SecurityError::CryptoError("KeyMaterial too short".into()));
        }
        let preamble: [u8; 4] = bytes[0..4].try_into().unwrap();
        if preamble != PREAMBLE_LE && preamble != PREAMBLE_BE {
            return Err(SecurityError::CryptoError("unrecognized KeyMaterial preamble".into()));
        }
        let little_endian = preamble == PREAMBLE_LE;
        let mut off = 4;
        let transformation_kind = read_u32(bytes, &mut off, little_endian)?;
        let master_key = read_seq(bytes, &mut off, little_endian)?;
        let master_hmac_key_id = read_seq(bytes, &mut off, little_endian)?;
        let master_iv = read_seq(bytes, &mut off, little_endian)?;
        Ok(Self { transformation_kind, master_key, master_hmac_key_id, master_iv })
    }
}

fn write_seq(buf: &mut Vec<u8>, data: &[u8]) {
    buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
    buf.extend_from_slice(data);
}

fn read_u32(bytes: &[u8], off: &mut usize, little_endian: bool) -> Result<u32, SecurityError> {
    let slice = bytes
        .get(*off..*off + 4)
        .ok_or_else(|| SecurityError::CryptoError("truncated KeyMaterial".into()))?;
    let arr: [u8; 4] = slice.try_into().unwrap();
    *off += 4;
    Ok(if little_endian { u32::from_le_bytes(arr) } else { u32::from_be_bytes(arr) })
}

fn read_seq(bytes: &[u8], off: &mut usize, little_endian: bool) -> Result<Vec<u8>, SecurityError> {
    let len = read_u32(bytes, off, little_endian)? as usize;
    let slice = bytes
        .get(*off..*off + len)
        .ok_or_else(|| SecurityError::CryptoError("truncated KeyMaterial sequence".into()))?;
    *off += len;
    Ok(slice.to_vec())
}

/// Encrypt `key_material` under `kx.kx_key`/`kx.kx_mac_key` and assemble
/// the `(binary_value1, binary_value2)` pair.
pub fn encrypt_token(
    transform_kind_id: u32,
    key_material: &KeyMaterial,
    kx: &KxKeys,
    session_id: u32,
    session_counter: &mut u32,
) -> Result<(Vec<u8>, Vec<u8>), SecurityError> {
    let mut payload = key_material.encode();
    let payload_length = payload.len() as u32;

    let salt = {
        let mut s = [0u8; 16];
        s.copy_from_slice(&kx.kx_key[0..16]);
        s
    };
    std_crypto::aes_ctr_apply(
        DataCipher::Aes256,
        &kx.kx_key,
        &salt,
        session_counter,
        &mut payload,
    )?;

    let transaction_id = session_id.wrapping_mul(TRANSACTION_ID_FACTOR);
    let mut binary_value1 = Vec::with_capacity(24 + payload.len() + 8);
    binary_value1.extend_from_slice(&transform_kind_id.to_le_bytes());
    binary_value1.extend_from_slice(&transaction_id.to_le_bytes());
    binary_value1.extend_from_slice(&session_id.to_le_bytes()); // transaction_id_echo
    binary_value1.extend_from_slice(&session_id.to_le_bytes());
    binary_value1.extend_from_slice(&session_counter.to_le_bytes());
    binary_value1.extend_from_slice(&payload_length.to_le_bytes());
    binary_value1.extend_from_slice(&payload);
    binary_value1.extend_from_slice(&0u32.to_le_bytes()); // reserved common digest
    binary_value1.extend_from_slice(&0u32.to_le_bytes()); // reserved additional digests

    let binary_value2 = std_crypto::hmac_sha256(&kx.kx_mac_key, &binary_value1).to_vec();

    Ok((binary_value1, binary_value2))
}

/// Verify `binary_value2`'s HMAC and decrypt `binary_value1` back into a
/// [`KeyMaterial`]. The receive session is rederived whenever `session_id`
/// changes; the caller is responsible for that resync via the returned
/// `session_id`.
pub fn decrypt_token(
    binary_value1: &[u8],
    binary_value2: &[u8],
    kx: &KxKeys,
) -> Result<(KeyMaterial, u32, u32), SecurityError> {
    let expected_mac = std_crypto::hmac_sha256(&kx.kx_mac_key, binary_value1);
    if expected_mac.as_slice() != binary_value2 {
        return Err(SecurityError::CryptoError("crypto token HMAC mismatch".into()));
    }
    if binary_value1.len() < 24 {
        return Err(SecurityError::CryptoError("crypto token header too short".into()));
    }
    let transform_kind_id = u32::from_le_bytes(binary_value1[0..4].try_into().unwrap());
    let _transaction_id = u32::from_le_bytes(binary_value1[4..8].try_into().unwrap());
    let _transaction_id_echo = u32::from_le_bytes(binary_value1[8..12].try_into().unwrap());
    let session_id = u32::from_le_bytes(binary_value1[12..16].try_into().unwrap());
    let mut session_counter = u32::from_le_bytes(binary_value1[16..20].try_into().unwrap());
    let payload_length = u32::from_le_bytes(binary_value1[20..24].try_into().unwrap()) as usize;

    let payload_start = 24;
    let payload_end = payload_start + payload_length;
    let mut payload = binary_value1
        .get(payload_start..payload_end)
        .ok_or_else(|| SecurityError::CryptoError("crypto token payload truncated".into()))?
        .to_vec();

    let salt = {
        let mut s = [0u8; 16];
        s.copy_from_slice(&kx.kx_key[0..16]);
        s
    };
    let mut counter_for_decrypt = session_counter.wrapping_sub(payload.len().div_ceil(16) as u32);
    std_crypto::aes_ctr_apply(
        DataCipher::Aes256,
        &kx.kx_key,
        &salt,
        &mut counter_for_decrypt,
        &mut payload,
    )?;
    session_counter = counter_for_decrypt;

    let _ = transform_kind_id;
    let key_material = KeyMaterial::decode(&payload)?;
    Ok((key_material, session_id, session_counter))
}
