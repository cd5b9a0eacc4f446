// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for melodist
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Training synthesis and Markov table construction
//! - Candidate weighting and sampling
//! - Rhythm normalization
//! - End-to-end melody generation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use melodist::generators::markov::MarkovTable;
use melodist::generators::training::synthesize;
use melodist::generators::weighting::{weight_candidates, weighted_choice, ContourMode, WeightingConfig};
use melodist::music::{Note, Scale, ScaleType};
use melodist::rhythm::{RhythmSource, Subdivision};
use melodist::{generate_melody, MelodySettings};

/// Benchmark table construction across n-gram orders
fn bench_markov_build(c: &mut Criterion) {
    let scale = Scale::new(Note::C, ScaleType::Major);
    let training = synthesize(&scale, true);
    let mut group = c.benchmark_group("markov_build");

    for order in [1usize, 2, 3, 4].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(order), order, |b, &order| {
            b.iter(|| black_box(MarkovTable::build(black_box(&training), order).len()))
        });
    }

    group.finish();
}

/// Benchmark scoring and sampling the next pitch
fn bench_weighting(c: &mut Criterion) {
    let scale = Scale::new(Note::A, ScaleType::HarmonicMinor);
    let table = MarkovTable::build(&synthesize(&scale, true), 2);
    let config = WeightingConfig {
        contour: ContourMode::Arc,
        ..Default::default()
    };
    let chord = scale.triad(0);
    let transitions = table.lookup(&[Note::A]).cloned().unwrap_or_default();
    let mut rng = StdRng::seed_from_u64(1);

    c.bench_function("weight_and_choose", |b| {
        b.iter(|| {
            let (candidates, weights) =
                weight_candidates(&transitions, Some(Note::A), &scale, &config, Some(chord.as_slice()), Some(0.4));
            black_box(weighted_choice(&candidates, &weights, &mut rng).ok())
        })
    });
}

/// Benchmark the three rhythm converters
fn bench_rhythm_normalize(c: &mut Criterion) {
    let sources = [
        (
            "preset",
            RhythmSource::Preset {
                durations: ["8n", "8n", "4n.", "r8n", "4n"].iter().map(|s| s.to_string()).collect(),
                subdivision: Subdivision::Sixteenth,
            },
        ),
        ("euclidean", RhythmSource::euclidean(7, 16, 3, Subdivision::Sixteenth)),
        (
            "sequencer",
            RhythmSource::Sequencer {
                slots: vec![0.25, -1.0, -1.0, -1.0, 0.0, 0.125, -1.0, 0.5, -1.0, 0.0, 0.0, 0.0, 0.0625, 0.0, 0.0, 0.0],
                subdivision: Subdivision::Sixteenth,
            },
        ),
    ];

    let mut group = c.benchmark_group("rhythm_normalize");
    for (name, source) in sources.iter() {
        group.bench_function(*name, |b| b.iter(|| black_box(source.normalize())));
    }
    group.finish();
}

/// Benchmark full generation for growing bar counts
fn bench_generate(c: &mut Criterion) {
    let scale = Scale::new(Note::D, ScaleType::Dorian);
    let rhythm = RhythmSource::euclidean(5, 16, 0, Subdivision::Sixteenth);
    let mut group = c.benchmark_group("generate_melody");

    for bars in [4usize, 16, 64].iter() {
        for motif in [false, true] {
            let settings = MelodySettings {
                bars: *bars,
                use_motif_repetition: motif,
                call_and_response: motif,
                ..Default::default()
            };
            let label = if motif { "motif" } else { "standard" };
            group.bench_with_input(BenchmarkId::new(label, bars), &settings, |b, settings| {
                let mut rng = StdRng::seed_from_u64(7);
                b.iter(|| {
                    let melody = generate_melody(settings, Some(scale.clone()), Some(&rhythm), &[0, 3, 4], &mut rng);
                    black_box(melody.map(|m| m.len()).unwrap_or(0))
                })
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_markov_build,
    bench_weighting,
    bench_rhythm_normalize,
    bench_generate,
);

criterion_main!(benches);
