// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crate-wide tagged result type.
//!
//! Every fallible operation in the handshake FSM, crypto token transport,
//! and endpoint matcher returns `Result<T, Error>`. The variants mirror the
//! Return Code categories of the underlying DDS specification so a caller
//! can map them onto a vendor-neutral status code without inspecting the
//! message text.

use std::fmt;
use std::io;

/// Crate-wide error type.
#[derive(Debug)]
pub enum Error {
    /// A resource pool (handles, buffers, timers) is exhausted.
    OutOfResources,
    /// An argument was outside its valid range or otherwise malformed.
    BadParameter(String),
    /// The operation is invalid given the current object state.
    PreconditionNotMet(String),
    /// The referenced entity has already been deleted/released.
    AlreadyDeleted,
    /// Access control or authentication rejected the operation.
    NotAllowedBySecurity(String),
    /// The requested capability isn't implemented by this build.
    Unsupported,
    /// Configuration is missing or invalid (certificates, XML, paths).
    Config,
    /// Wire encoding/decoding failed.
    SerializationError,
    /// A network send/receive failed.
    TransportError,
    /// Filesystem access failed while loading configuration or credentials.
    IoError(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfResources => write!(f, "out of resources"),
            Error::BadParameter(msg) => write!(f, "bad parameter: {}", msg),
            Error::PreconditionNotMet(msg) => write!(f, "precondition not met: {}", msg),
            Error::AlreadyDeleted => write!(f, "entity already deleted"),
            Error::NotAllowedBySecurity(msg) => write!(f, "not allowed by security: {}", msg),
            Error::Unsupported => write!(f, "unsupported operation"),
            Error::Config => write!(f, "configuration error"),
            Error::SerializationError => write!(f, "serialization error"),
            Error::TransportError => write!(f, "transport error"),
            Error::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::IoError(e)
    }
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_variants() {
        assert_eq!(Error::OutOfResources.to_string(), "out of resources");
        assert_eq!(Error::AlreadyDeleted.to_string(), "entity already deleted");
        assert_eq!(
            Error::BadParameter("bad handle".into()).to_string(),
            "bad parameter: bad handle"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing file");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::IoError(_)));
    }
}
