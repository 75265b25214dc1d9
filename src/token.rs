// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Identity/permissions token cache.
//!
//! Tokens (identity, permissions, handshake, crypto) are immutable once
//! populated and shared by reference-counted handles. This
//! module provides the process-wide cache: a fixed set of hash buckets
//! keyed by the token's class id plus content hash, storing `Arc<Token>`
//! so multiple handshakes referencing the same credential share one
//! allocation. Buckets mirror the bucketed registries used elsewhere in
//! the discovery subsystem (see [`crate::core::discovery::seen_table`]).

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;

use crate::handle::{Handle, HandleTable};

/// Number of hash buckets backing the token cache.
const NUM_BUCKETS: usize = 16;

/// A `DataHolder`: an extensible class-id-tagged record carrying
/// string/binary properties plus raw sequences.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataHolder {
    pub class_id: String,
    pub string_properties: Vec<(String, String)>,
    pub binary_properties: Vec<(String, Vec<u8>)>,
    pub string_values: Vec<String>,
    pub binary_value1: Vec<u8>,
    pub binary_value2: Vec<u8>,
    pub longlongs_value: Vec<i64>,
}

/// Distinguishes the four token families that share this cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identity,
    Permissions,
    Handshake,
    Crypto,
}

/// An immutable, reference-counted token.
///
/// Identity and permissions tokens carry a [`DataHolder`]; handshake and
/// crypto tokens may instead carry a flat marshaled buffer. Either way
/// the value, once constructed, is never mutated -- only its refcount
/// (tracked by the cache, not by `Arc` alone, so `release` can detect the
/// last reference and free the handle deterministically) changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenData {
    Holder(DataHolder),
    Raw(Vec<u8>),
}

/// A populated token plus its kind, stored behind a handle.
pub struct Token {
    pub kind: TokenKind,
    pub data: TokenData,
}

fn bucket_of(kind: TokenKind, data: &TokenData) -> usize {
    use std::hash::{Hash, Hasher};
    let mut h = std::collections::hash_map::DefaultHasher::new();
    kind.hash(&mut h);
    match data {
        TokenData::Holder(d) => {
            d.class_id.hash(&mut h);
            d.binary_value1.hash(&mut h);
        }
        TokenData::Raw(b) => b.hash(&mut h),
    }
    (h.finish() as usize) % NUM_BUCKETS
}

struct Bucket {
    table: RwLock<HandleTable<Arc<Token>>>,
    /// Deduplicates identical token content so repeated credentials share
    /// one handle/refcount instead of allocating a duplicate.
    index: DashMap<Vec<u8>, Handle>,
}

impl Default for Bucket {
    fn default() -> Self {
        Self {
            table: RwLock::new(HandleTable::new()),
            index: DashMap::new(),
        }
    }
}

/// Process-wide, refcounted cache of identity/permissions/handshake/crypto
/// tokens, shared across all domains.
pub struct TokenCache {
    buckets: Vec<Bucket>,
    refcounts: DashMap<Handle, usize>,
}

impl TokenCache {
    #[must_use]
    pub fn new() -> Self {
        let mut buckets = Vec::with_capacity(NUM_BUCKETS);
        buckets.resize_with(NUM_BUCKETS, Bucket::default);
        Self {
            buckets,
            refcounts: DashMap::new(),
        }
    }

    fn fingerprint(data: &TokenData) -> Vec<u8> {
        match data {
            TokenData::Holder(d) => {
                let mut v = d.class_id.clone().into_bytes();
                v.extend_from_slice(&d.binary_value1);
                v
            }
            TokenData::Raw(b) => b.clone(),
        }
    }

    /// Insert a token, returning a handle with refcount 1. If an
    /// identical token is already cached, its refcount is incremented and
    /// the existing handle is returned instead.
    pub fn intern(&self, kind: TokenKind, data: TokenData) -> crate::error::Result<Handle> {
        let bucket = &self.buckets[bucket_of(kind, &data)];
        let fp = Self::fingerprint(&data);
        if let Some(existing) = bucket.index.get(&fp) {
            *self.refcounts.entry(*existing).or_insert(0) += 1;
            return Ok(*existing);
        }
        let token = Arc::new(Token { kind, data });
        let handle = bucket.table.write().alloc(token)?;
        bucket.index.insert(fp, handle);
        self.refcounts.insert(handle, 1);
        Ok(handle)
    }

    /// Look up a token by handle, regardless of which bucket holds it.
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<Arc<Token>> {
        self.buckets
            .iter()
            .find_map(|b| b.table.read().get(handle).cloned())
    }

    /// Drop one reference to `handle`, freeing the slot once the last
    /// reference is released.
    pub fn release(&self, handle: Handle) {
        let Some(mut count) = self.refcounts.get_mut(&handle) else {
            return;
        };
        if *count > 1 {
            *count -= 1;
            return;
        }
        drop(count);
        self.refcounts.remove(&handle);
        for bucket in &self.buckets {
            let mut table = bucket.table.write();
            if table.get(handle).is_some() {
                if let Ok(token) = table.free(handle) {
                    let fp = Self::fingerprint(&token.data);
                    bucket.index.remove(&fp);
                }
                return;
            }
        }
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_token(subject: &str) -> TokenData {
        TokenData::Holder(DataHolder {
            class_id: "DDS:Auth:PKI-RSA:1.0".into(),
            binary_value1: subject.as_bytes().to_vec(),
            ..Default::default()
        })
    }

    #[test]
    fn test_intern_and_get() {
        let cache = TokenCache::new();
        let h = cache.intern(TokenKind::Identity, identity_token("alice")).unwrap();
        let token = cache.get(h).unwrap();
        assert_eq!(token.kind, TokenKind::Identity);
    }

    #[test]
    fn test_duplicate_content_shares_handle() {
        let cache = TokenCache::new();
        let h1 = cache.intern(TokenKind::Identity, identity_token("bob")).unwrap();
        let h2 = cache.intern(TokenKind::Identity, identity_token("bob")).unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_release_frees_at_zero_refcount() {
        let cache = TokenCache::new();
        let h = cache.intern(TokenKind::Permissions, identity_token("carol")).unwrap();
        cache.intern(TokenKind::Permissions, identity_token("carol")).unwrap();
        cache.release(h);
        assert!(cache.get(h).is_some(), "one reference should remain");
        cache.release(h);
        assert!(cache.get(h).is_none(), "last reference should free the slot");
    }
}
