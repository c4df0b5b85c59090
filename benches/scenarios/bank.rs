//! Benchmarks for complete voice banks.

use std::f32::consts::TAU;
use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use oscbank::{BankConfig, VoiceBank, WaveformTable};

use crate::BLOCK_SIZES;

fn bank(polyphony: usize) -> VoiceBank<WaveformTable> {
    let samples: Vec<f32> = (0..2048)
        .map(|i| (TAU * i as f32 / 2048.0).sin())
        .collect();
    let table = WaveformTable::from_samples(&samples).expect("non-empty table");
    let config = BankConfig::default().with_polyphony(polyphony);
    VoiceBank::new(&config, Arc::new(table))
}

pub fn bench_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/bank");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === HELD CHORDS ===
        // Every slot sounding, no events: the steady-state mixing cost.
        for polyphony in [1usize, 8, 32] {
            let mut held = bank(polyphony);
            for i in 0..polyphony as u16 {
                held.start_note(48 + i, 100, None);
            }
            let id = format!("held_{polyphony}");
            group.bench_with_input(BenchmarkId::new(id, size), &size, |b, _| {
                b.iter(|| held.render_block(black_box(&mut buffer)))
            });
        }

        // === NOTE CHURN ===
        // Four new notes per block on a full 16-voice bank, so every start
        // steals. Measures allocation bookkeeping on top of mixing.
        let mut churn = bank(16);
        for i in 0..16u16 {
            churn.start_note(36 + i, 100, None);
        }
        let mut next_note = 52u16;
        group.bench_with_input(BenchmarkId::new("steal_churn", size), &size, |b, _| {
            b.iter(|| {
                for _ in 0..4 {
                    churn.stop_note(next_note.wrapping_sub(16));
                    churn.start_note(next_note, 100, None);
                    next_note = 36 + (next_note - 35) % 64;
                }
                churn.render_block(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
