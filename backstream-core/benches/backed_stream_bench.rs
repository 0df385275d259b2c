// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use backstream_core::{BackedStream, OwnerToken, Producer};
use criterion::{BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

pub fn bench_backed_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("backed_stream");

    let listener_counts = [1usize, 8, 64, 256];

    // Scenario: re-back a stream with a pending producer, then resolve a fresh one
    for &listeners in &listener_counts {
        group.throughput(Throughput::Elements(listeners as u64));
        let id = BenchmarkId::from_parameter(format!("reback_listeners_{listeners}"));
        group.bench_with_input(id, &listeners, |bencher, &listeners| {
            let stream = BackedStream::<Vec<u8>>::new();
            let owner = OwnerToken::new();
            for _ in 0..listeners {
                stream.listen(
                    owner,
                    |value| {
                        black_box(value.len());
                    },
                    |error| {
                        black_box(error);
                    },
                );
            }

            bencher.iter(|| {
                let (stale, _stale_tx) = Producer::pending();
                stream.back_with(stale);
                let (fresh, fresh_tx) = Producer::pending();
                stream.back_with(fresh);
                fresh_tx.succeed(vec![0u8; 256]);
            });
        });
    }

    group.finish();
}
