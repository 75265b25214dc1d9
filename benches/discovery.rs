// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Discovery core hot-path benchmarks
//!
//! Measures the operations on the fast path between receiving a discovery
//! sample and the matcher/crypto subsystem deciding what to do with it:
//! - QoS compatibility checks run once per (reader, writer) candidate pair
//! - Session-key derivation run on every PSMP-driven crypto rekey
//! - Handle table alloc/free, the allocation primitive behind every token,
//!   crypto context, and handshake handle in the core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hdds_secure_core::core::discovery::Matcher;
use hdds_secure_core::handle::HandleTable;
use hdds_secure_core::qos::{Durability, History, QoS, Reliability};
use hdds_secure_core::security::crypto::std_crypto::{derive_session_key, DataHash, MasterKey};

fn bench_qos_match_compatible(c: &mut Criterion) {
    let reader = QoS {
        reliability: Reliability::Reliable,
        durability: Durability::TransientLocal,
        history: History::KeepLast(10),
        ..QoS::default()
    };
    let writer = QoS {
        reliability: Reliability::Reliable,
        durability: Durability::TransientLocal,
        history: History::KeepLast(100),
        ..QoS::default()
    };

    c.bench_function("matcher_qos_compatible", |b| {
        b.iter(|| black_box(Matcher::is_compatible(black_box(&reader), black_box(&writer))));
    });
}

fn bench_qos_match_incompatible(c: &mut Criterion) {
    let reader = QoS {
        reliability: Reliability::Reliable,
        ..QoS::default()
    };
    let writer = QoS {
        reliability: Reliability::BestEffort,
        ..QoS::default()
    };

    c.bench_function("matcher_qos_incompatible", |b| {
        b.iter(|| black_box(Matcher::is_compatible(black_box(&reader), black_box(&writer))));
    });
}

fn bench_session_key_derivation(c: &mut Criterion) {
    let master = MasterKey {
        id: 1,
        key: vec![0x42; 32],
        hmac_key_id: vec![0x24; 32],
        iv: Some(vec![0x11; 32]),
    };

    c.bench_function("crypto_derive_session_key", |b| {
        let mut session_id = 0u32;
        b.iter(|| {
            session_id = session_id.wrapping_add(1);
            black_box(derive_session_key(
                black_box(&master),
                black_box(session_id),
                DataHash::HmacSha256,
            ))
        });
    });
}

fn bench_handle_table_alloc_free(c: &mut Criterion) {
    c.bench_function("handle_table_alloc_free_roundtrip", |b| {
        let mut table: HandleTable<u32> = HandleTable::new();
        b.iter(|| {
            let h = table.alloc(black_box(7)).expect("alloc");
            black_box(table.get(h));
            table.free(h).expect("free");
        });
    });
}

criterion_group!(
    discovery_benches,
    bench_qos_match_compatible,
    bench_qos_match_incompatible,
    bench_session_key_derivation,
    bench_handle_table_alloc_free
);
criterion_main!(discovery_benches);
