// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! CDR2 serialization traits
//!
//!
//! Defines the encoding/decoding contract used by the PL_CDR2 helpers in
//! [`super::pl_cdr2`] and by manual sandbox types until a code generator
//! emits PL_CDR2 directly.
//!
//! # References
//! - XTypes v1.3 Spec: Section 7.3 (CDR2 Encoding)
//! - DDS-XTYPES formal/2020-06-01

use std::fmt;

/// CDR2 encoding trait
///
/// Types implementing this trait can be serialized to CDR2 little-endian format.
#[allow(dead_code)] // Used via trait implementations throughout the ser module
pub trait Cdr2Encode {
    /// Encode this value to CDR2 format.
    ///
    /// # Arguments
    /// * `buf` - Output buffer (must have sufficient capacity)
    ///
    /// # Returns
    /// Number of bytes written.
    fn encode_cdr2(&self, buf: &mut [u8]) -> Result<usize, CdrError>;
}

/// CDR2 decoding trait
///
/// Types implementing this trait can be deserialized from CDR2 little-endian format.
#[allow(dead_code)] // Used via trait implementations throughout the ser module
pub trait Cdr2Decode: Sized {
    /// Decode a value from CDR2 format.
    ///
    /// # Arguments
    /// * `buf` - Input buffer containing CDR2-encoded data
    ///
    /// # Returns
    /// Tuple of (decoded value, bytes consumed).
    fn decode_cdr2(buf: &[u8]) -> Result<(Self, usize), CdrError>;
}

/// Error kind for the PL_CDR2 helpers (`pl_cdr2`) and `Cdr2Encode`/`Cdr2Decode` impls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdrError {
    /// Destination buffer too small to hold the encoding.
    BufferTooSmall,
    /// Source buffer ended before the declared payload/member length.
    UnexpectedEof,
    /// A length or member id could not be represented in the wire encoding
    /// (e.g. a payload longer than `u32::MAX`).
    InvalidEncoding,
}

impl fmt::Display for CdrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CdrError::BufferTooSmall => write!(f, "buffer too small"),
            CdrError::UnexpectedEof => write!(f, "unexpected end of buffer"),
            CdrError::InvalidEncoding => write!(f, "value cannot be represented in CDR2"),
        }
    }
}

impl std::error::Error for CdrError {}

impl From<CdrError> for crate::error::Error {
    fn from(_: CdrError) -> Self {
        crate::error::Error::SerializationError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_variants() {
        assert_eq!(CdrError::BufferTooSmall.to_string(), "buffer too small");
        assert_eq!(
            CdrError::UnexpectedEof.to_string(),
            "unexpected end of buffer"
        );
        assert_eq!(
            CdrError::InvalidEncoding.to_string(),
            "value cannot be represented in CDR2"
        );
    }

    #[test]
    fn converts_to_crate_error() {
        let err: crate::error::Error = CdrError::BufferTooSmall.into();
        matches!(err, crate::error::Error::SerializationError);
    }
}
