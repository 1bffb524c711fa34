// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mapwright-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mapwright and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use mapwright::model::Map;
use mapwright::store::transfer::export_map;
use mapwright::store::{FileStorage, MemoryStorage, Query, Store, MAPS_COLLECTION};

mod fixtures;
mod profiler;

use fixtures::Case;

fn store_with(maps: &[Map]) -> Store<MemoryStorage> {
    let mut store = Store::new(MemoryStorage::new());
    for map in maps {
        store.put(map).expect("put");
    }
    store
}

// Group and case ids stay stable so results remain comparable across refactors.
fn benches_store(c: &mut Criterion) {
    let small = fixtures::grid_map(Case::GridSmall);
    let medium = fixtures::grid_map(Case::GridMedium);

    let mut group = c.benchmark_group("store.codec");
    group.bench_function("export_medium", |b| {
        b.iter(|| black_box(export_map(black_box(&medium)).expect("export").len()))
    });
    let store = store_with(std::slice::from_ref(&medium));
    group.bench_function("fetch_medium", |b| {
        b.iter(|| {
            let map = store
                .fetch::<Map>(black_box(medium.id().as_str()))
                .expect("fetch")
                .expect("stored");
            black_box(fixtures::checksum_map(&map))
        })
    });
    group.finish();

    let mut group = c.benchmark_group("store.save");
    for (case_id, map) in [("io_small", &small), ("io_medium", &medium)] {
        group.bench_function(case_id, |b| {
            b.iter_batched_ref(
                || {
                    let tmp = tempfile::tempdir().expect("tempdir");
                    let mut store = Store::new(FileStorage::new(tmp.path(), "bench"));
                    store.put(map).expect("put");
                    (tmp, store)
                },
                |(_tmp, store)| store.save(MAPS_COLLECTION).expect("save"),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();

    let mut group = c.benchmark_group("store.query");
    let many: Vec<Map> = (0..500)
        .map(|n| {
            let mut map = Map::new(format!("map {n}"));
            map.set_zone(if n % 5 == 0 { "coast" } else { "inland" });
            map
        })
        .collect();
    let store = store_with(&many);
    let coast = Query::new().with("zone", "coast");
    group.bench_function("filter_500", |b| {
        b.iter(|| black_box(store.query(MAPS_COLLECTION, black_box(&coast)).len()))
    });
    group.bench_function("paginate_500", |b| {
        b.iter(|| black_box(store.paginate(MAPS_COLLECTION, &coast, black_box(3), 20).items.len()))
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_store
}
criterion_main!(benches);
