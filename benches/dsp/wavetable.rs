//! Benchmarks for interpolated wavetable lookup.

use std::f32::consts::TAU;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oscbank::dsp::wavetable::WaveformTable;

use crate::BLOCK_SIZES;

fn sine_table(size: usize) -> WaveformTable {
    let samples: Vec<f32> = (0..size)
        .map(|i| (TAU * i as f32 / size as f32).sin())
        .collect();
    WaveformTable::from_samples(&samples).expect("non-empty table")
}

pub fn bench_wavetable(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/wavetable");
    let increment = 440.0 / 48_000.0;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Table length barely matters to the cost; sweep it anyway to catch
        // cache effects on large tables.
        for table_len in [4usize, 256, 4096] {
            let table = sine_table(table_len);
            let mut phase = 0.0f32;
            let id = format!("lookup_{table_len}");
            group.bench_with_input(BenchmarkId::new(id, size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        phase = (phase + increment).fract();
                        *sample = table.lookup(black_box(phase));
                    }
                })
            });
        }
    }

    group.finish();
}
