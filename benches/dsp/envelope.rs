//! Benchmarks for the attack/sustain/release envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use oscbank::dsp::envelope::Envelope;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn render(env: &mut Envelope, buffer: &mut [f32]) {
    for sample in buffer.iter_mut() {
        env.next_sample(SAMPLE_RATE);
        *sample = env.level();
    }
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up)
        let mut env = Envelope::new(10.0, 0.3);
        env.note_on(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| render(&mut env, black_box(&mut buffer)))
        });

        // Sustain phase (holding steady)
        let mut env = Envelope::new(0.001, 0.3);
        env.note_on(SAMPLE_RATE);
        for _ in 0..200 {
            env.next_sample(SAMPLE_RATE);
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| render(&mut env, black_box(&mut buffer)))
        });

        // Release phase (ramping down); long enough not to finish mid-bench
        let mut env = Envelope::new(0.001, 600.0);
        env.note_on(SAMPLE_RATE);
        for _ in 0..200 {
            env.next_sample(SAMPLE_RATE);
        }
        env.note_off(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| render(&mut env, black_box(&mut buffer)))
        });
    }

    group.finish();
}
