//! Criterion benchmarks for strata effects
//!
//! Run with: cargo bench
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use strata_core::{Effect, EffectExt, Oversampled};
use strata_effects::{
    Chorus, Compressor, ConvolutionReverb, Distortion, FreeverbReverb, Imager, LowPassFilter,
    Maximizer, ModernDelay, MultibandEq, Waveshaper,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_effect<E: Effect>(c: &mut Criterion, name: &str, mut effect: E) {
    let mut group = c.benchmark_group(name);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut output = vec![0.0; block_size];
                b.iter(|| {
                    effect.process_block(black_box(&input), &mut output);
                    black_box(output[0])
                })
            },
        );
    }

    group.finish();
}

fn bench_distortion(c: &mut Criterion) {
    let mut effect = Distortion::new(SAMPLE_RATE);
    effect.set_drive_db(20.0);
    effect.set_tone_db(6.0);
    effect.set_mix(1.0);
    bench_effect(c, "Distortion", effect);
}

fn bench_compressor(c: &mut Criterion) {
    let mut effect = Compressor::new(SAMPLE_RATE);
    effect.set_threshold_db(-20.0);
    effect.set_ratio(4.0);
    effect.set_attack_ms(5.0);
    effect.set_release_ms(50.0);
    bench_effect(c, "Compressor", effect);
}

fn bench_chorus(c: &mut Criterion) {
    let mut effect = Chorus::new(SAMPLE_RATE);
    effect.set_rate(2.0);
    effect.set_depth(0.7);
    effect.set_mix(0.5);
    bench_effect(c, "Chorus", effect);
}

fn bench_modern_delay(c: &mut Criterion) {
    let mut effect = ModernDelay::new(SAMPLE_RATE);
    effect.set_time_l_ms(375.0);
    effect.set_time_r_ms(500.0);
    effect.set_feedback_l(0.4);
    effect.set_feedback_r(0.4);
    effect.set_cross(1.0);
    effect.set_mix(0.5);
    bench_effect(c, "ModernDelay", effect);
}

fn bench_lowpass(c: &mut Criterion) {
    let mut effect = LowPassFilter::new(SAMPLE_RATE);
    effect.set_cutoff_hz(1000.0);
    effect.set_q(0.707);
    bench_effect(c, "LowPassFilter", effect);
}

fn bench_freeverb(c: &mut Criterion) {
    let mut effect = FreeverbReverb::new(SAMPLE_RATE);
    effect.set_room_size(0.7);
    effect.set_damping(0.3);
    effect.set_predelay_ms(15.0);
    effect.set_mix(0.5);
    bench_effect(c, "FreeverbReverb", effect);
}

fn bench_convolution_reverb(c: &mut Criterion) {
    let mut effect = ConvolutionReverb::new(SAMPLE_RATE);
    effect.set_size(0.7);
    effect.set_decay(0.6);
    effect.set_damping(0.4);
    effect.set_mix(0.5);
    bench_effect(c, "ConvolutionReverb", effect);
}

fn bench_waveshaper(c: &mut Criterion) {
    let mut effect = Waveshaper::new(SAMPLE_RATE);
    effect.set_drive(4.0);
    effect.set_mix(1.0);
    bench_effect(c, "Waveshaper", effect);
}

fn bench_maximizer(c: &mut Criterion) {
    let mut effect = Maximizer::new(SAMPLE_RATE);
    effect.set_input_gain_db(3.0);
    effect.set_drive(2.0);
    effect.set_ceiling_db(-0.3);
    effect.set_release_ms(80.0);
    bench_effect(c, "Maximizer", effect);
}

fn bench_imager(c: &mut Criterion) {
    let mut effect = Imager::new(SAMPLE_RATE);
    effect.set_width(1.3);
    bench_effect(c, "Imager", effect);
}

fn bench_multiband_eq(c: &mut Criterion) {
    let effect = MultibandEq::new(SAMPLE_RATE);
    bench_effect(c, "MultibandEq", effect);
}

// --- Stereo benchmarks ---

fn generate_stereo_test_signals(size: usize) -> (Vec<f32>, Vec<f32>) {
    let left: Vec<f32> = (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect();
    let right: Vec<f32> = (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t + std::f32::consts::FRAC_PI_3).sin() * 0.5
        })
        .collect();
    (left, right)
}

fn bench_stereo_effect<E: Effect>(c: &mut Criterion, name: &str, mut effect: E) {
    let mut group = c.benchmark_group(name);

    for &block_size in BLOCK_SIZES {
        let (left_in, right_in) = generate_stereo_test_signals(block_size);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, &size| {
                let mut left_out = vec![0.0; size];
                let mut right_out = vec![0.0; size];
                b.iter(|| {
                    effect.process_block_stereo(
                        black_box(&left_in),
                        black_box(&right_in),
                        &mut left_out,
                        &mut right_out,
                    );
                    black_box((left_out[0], right_out[0]))
                })
            },
        );
    }

    group.finish();
}

fn bench_stereo_chorus(c: &mut Criterion) {
    let mut effect = Chorus::new(SAMPLE_RATE);
    effect.set_rate(2.0);
    effect.set_depth(0.7);
    effect.set_mix(0.5);
    bench_stereo_effect(c, "Chorus_Stereo", effect);
}

fn bench_stereo_freeverb(c: &mut Criterion) {
    let mut effect = FreeverbReverb::new(SAMPLE_RATE);
    effect.set_room_size(0.7);
    effect.set_damping(0.3);
    effect.set_predelay_ms(15.0);
    effect.set_mix(0.5);
    bench_stereo_effect(c, "FreeverbReverb_Stereo", effect);
}

fn bench_stereo_modern_delay(c: &mut Criterion) {
    let mut effect = ModernDelay::new(SAMPLE_RATE);
    effect.set_time_l_ms(375.0);
    effect.set_time_r_ms(500.0);
    effect.set_feedback_l(0.5);
    effect.set_feedback_r(0.5);
    effect.set_cross(1.0);
    effect.set_mix(0.3);
    bench_stereo_effect(c, "ModernDelay_Stereo_PingPong", effect);
}

fn bench_stereo_imager(c: &mut Criterion) {
    let mut effect = Imager::new(SAMPLE_RATE);
    effect.set_width(1.5);
    bench_stereo_effect(c, "Imager_Stereo", effect);
}

// --- Oversampling benchmarks ---

fn bench_oversampling(c: &mut Criterion) {
    // Inner effect created at base rate — Oversampled::new() handles the Nx rate internally
    let dist_2x = Oversampled::<2, Distortion>::new(Distortion::new(SAMPLE_RATE), SAMPLE_RATE);
    bench_effect(c, "Oversampled_2x_Distortion", dist_2x);

    let dist_4x = Oversampled::<4, Distortion>::new(Distortion::new(SAMPLE_RATE), SAMPLE_RATE);
    bench_effect(c, "Oversampled_4x_Distortion", dist_4x);

    let dist_8x = Oversampled::<8, Distortion>::new(Distortion::new(SAMPLE_RATE), SAMPLE_RATE);
    bench_effect(c, "Oversampled_8x_Distortion", dist_8x);
}

fn bench_effect_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("EffectChain");

    // Typical mixer insert chain: compressor -> distortion -> chorus -> delay
    let compressor = {
        let mut comp = Compressor::new(SAMPLE_RATE);
        comp.set_threshold_db(-18.0);
        comp.set_ratio(3.0);
        comp
    };
    let distortion = {
        let mut d = Distortion::new(SAMPLE_RATE);
        d.set_drive_db(12.0);
        d.set_mix(0.8);
        d
    };
    let chorus = {
        let mut c = Chorus::new(SAMPLE_RATE);
        c.set_rate(1.5);
        c.set_depth(0.5);
        c.set_mix(0.3);
        c
    };
    let delay = {
        let mut d = ModernDelay::new(SAMPLE_RATE);
        d.set_time_l_ms(300.0);
        d.set_feedback_l(0.4);
        d.set_mix(0.25);
        d
    };

    let mut chain = compressor.chain(distortion).chain(chorus).chain(delay);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut output = vec![0.0; block_size];
                b.iter(|| {
                    chain.process_block(black_box(&input), &mut output);
                    black_box(output[0])
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_distortion,
    bench_compressor,
    bench_chorus,
    bench_modern_delay,
    bench_lowpass,
    bench_freeverb,
    bench_convolution_reverb,
    bench_waveshaper,
    bench_maximizer,
    bench_imager,
    bench_multiband_eq,
    bench_stereo_chorus,
    bench_stereo_freeverb,
    bench_stereo_modern_delay,
    bench_stereo_imager,
    bench_oversampling,
    bench_effect_chain,
);

criterion_main!(benches);
