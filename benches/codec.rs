// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ffcanvas-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ffcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ffcanvas::format::{decode_json, decode_plain_text, encode_json, encode_plain_text};
use ffcanvas::model::{Catalog, SessionId};

mod fixtures;
mod profiler;

use fixtures::Case;

// Group and case ids stay stable so results remain comparable across refactors.
fn benches_codec(c: &mut Criterion) {
    let catalog = Catalog::builtin();
    let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let sid = SessionId::new("bench").expect("session id");

    let mut group = c.benchmark_group("format.plain_text");
    for case in [Case::Sparse, Case::Full { lines: 1 }, Case::Full { lines: 8 }] {
        let answers = fixtures::answers(catalog, case);
        let text = encode_plain_text(catalog, &answers, at);
        group.bench_function(format!("encode_{}", case.id()), |b| {
            b.iter(|| black_box(encode_plain_text(catalog, black_box(&answers), at)))
        });
        group.bench_function(format!("decode_{}", case.id()), |b| {
            b.iter(|| black_box(decode_plain_text(catalog, black_box(&text))))
        });
    }
    group.finish();

    let mut group = c.benchmark_group("format.json");
    let answers = fixtures::answers(catalog, Case::Full { lines: 8 });
    let raw = encode_json(&answers, &sid, at).expect("encode_json");
    group.bench_function("encode_full_8l", |b| {
        b.iter(|| black_box(encode_json(black_box(&answers), &sid, at).expect("encode_json")))
    });
    group.bench_function("decode_full_8l", |b| {
        b.iter(|| black_box(decode_json(black_box(&raw)).expect("decode_json")))
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_codec
}
criterion_main!(benches);
