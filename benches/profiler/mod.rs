// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mapwright-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mapwright and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::str::FromStr;
use std::time::Duration;

use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};

fn env_or<T: FromStr + Ord>(name: &str, default: T, min: T, max: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<T>().ok())
        .unwrap_or(default)
        .clamp(min, max)
}

/// Criterion with a pprof flamegraph profiler.
///
/// Tunables: `MAPWRIGHT_PROFILE_FREQ`, `MAPWRIGHT_BENCH_SAMPLES`, `MAPWRIGHT_BENCH_WARMUP_SECS`,
/// `MAPWRIGHT_BENCH_SECS`.
pub fn criterion() -> Criterion {
    let frequency = env_or("MAPWRIGHT_PROFILE_FREQ", 99i32, 1, 1000);
    let samples = env_or("MAPWRIGHT_BENCH_SAMPLES", 50usize, 10, 200);
    let warmup = env_or("MAPWRIGHT_BENCH_WARMUP_SECS", 2u64, 1, 60);
    let measure = env_or("MAPWRIGHT_BENCH_SECS", 4u64, 1, 120);

    Criterion::default()
        .sample_size(samples)
        .warm_up_time(Duration::from_secs(warmup))
        .measurement_time(Duration::from_secs(measure))
        .with_profiler(PProfProfiler::new(frequency, Output::Flamegraph(None)))
}
