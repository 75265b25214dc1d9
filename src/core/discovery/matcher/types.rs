// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type compatibility checking.
//!
//! The type registry that produces canonicalized typecodes is an external
//! collaborator (owned outside this crate); here a typecode is just an
//! opaque, already-canonicalized byte string. Two endpoints match on type
//! when either side omits a typecode (legacy name-only interop) or both
//! typecodes are byte-for-byte identical.

use std::borrow::Cow;

pub(super) fn is_type_compatible(
    local_type_object: Option<&Vec<u8>>,
    remote_type_object: Option<&Vec<u8>>,
    local_type_name: &str,
    remote_type_name: &str,
) -> bool {
    match (local_type_object, remote_type_object) {
        (Some(local), Some(remote)) => local == remote,
        _ => normalize_type_name(local_type_name) == normalize_type_name(remote_type_name),
    }
}

fn normalize_type_name(name: &str) -> Cow<'_, str> {
    let stripped = if let Some(rest) = name.strip_prefix("IDL:") {
        if let Some((core, _version)) = rest.rsplit_once(':') {
            core
        } else {
            rest
        }
    } else {
        name
    };

    let normalized = if stripped.contains('/') {
        stripped.replace('/', "::")
    } else {
        stripped.to_string()
    };

    if normalized.contains("::msg::") {
        Cow::Owned(normalized.replace("::msg::", "::"))
    } else {
        Cow::Owned(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_typecodes_are_compatible() {
        let a = vec![1, 2, 3];
        let b = vec![1, 2, 3];
        assert!(is_type_compatible(Some(&a), Some(&b), "Point", "Point"));
    }

    #[test]
    fn test_mismatched_typecodes_are_incompatible() {
        let a = vec![1, 2, 3];
        let b = vec![1, 2, 4];
        assert!(!is_type_compatible(Some(&a), Some(&b), "Point", "Point"));
    }

    #[test]
    fn test_legacy_mode_falls_back_to_name() {
        assert!(is_type_compatible(None, None, "Temperature", "Temperature"));
        assert!(!is_type_compatible(None, None, "Temperature", "Humidity"));
    }

    #[test]
    fn test_name_normalization_strips_idl_prefix_and_ros2_namespace() {
        assert_eq!(
            normalize_type_name("IDL:sensor_msgs/msg/Temperature:1.0"),
            "sensor_msgs::Temperature"
        );
    }
}
