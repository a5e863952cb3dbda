//! Extreme parameter tests for all strata effects.
//!
//! Verifies that every effect produces finite (non-NaN, non-Inf) output when
//! parameters are set to their minimum and maximum values, and when running
//! at extreme sample rates (8 kHz and 192 kHz).

use strata_core::{Effect, ParameterInfo};
use strata_effects::{
    Chorus, Compressor, ConvolutionReverb, Distortion, FreeverbReverb, Imager, LowPassFilter,
    Maximizer, ModernDelay, MultibandEq, Waveshaper,
};

const DEFAULT_SAMPLE_RATE: f32 = 48000.0;
const LOW_SAMPLE_RATE: f32 = 8000.0;
const HIGH_SAMPLE_RATE: f32 = 192000.0;
const NUM_SAMPLES: usize = 1000;

/// Process `NUM_SAMPLES` through an effect and assert all outputs are finite.
fn assert_finite_output(effect: &mut dyn Effect, label: &str) {
    for i in 0..NUM_SAMPLES {
        let input = if i % 3 == 0 {
            0.5
        } else if i % 3 == 1 {
            -0.5
        } else {
            0.0
        };
        let output = effect.process(input);
        assert!(
            output.is_finite(),
            "{}: non-finite output at sample {}: {}",
            label,
            i,
            output
        );
    }
}

/// Set all parameters to their minimum values using ParameterInfo.
fn set_all_params_min(effect: &mut (impl Effect + ParameterInfo)) {
    for i in 0..effect.param_count() {
        if let Some(desc) = effect.param_info(i) {
            effect.set_param(i, desc.min);
        }
    }
}

/// Set all parameters to their maximum values using ParameterInfo.
fn set_all_params_max(effect: &mut (impl Effect + ParameterInfo)) {
    for i in 0..effect.param_count() {
        if let Some(desc) = effect.param_info(i) {
            effect.set_param(i, desc.max);
        }
    }
}

/// Run the full extreme parameter test suite for a single effect.
fn run_extreme_test<E: Effect + ParameterInfo>(name: &str, mut create: impl FnMut(f32) -> E) {
    // Test 1: All params at minimum
    {
        let mut effect = create(DEFAULT_SAMPLE_RATE);
        set_all_params_min(&mut effect);
        assert_finite_output(&mut effect, &format!("{} (all min)", name));
    }

    // Test 2: All params at maximum
    {
        let mut effect = create(DEFAULT_SAMPLE_RATE);
        set_all_params_max(&mut effect);
        assert_finite_output(&mut effect, &format!("{} (all max)", name));
    }

    // Test 3: Low sample rate (8 kHz)
    {
        let mut effect = create(LOW_SAMPLE_RATE);
        assert_finite_output(&mut effect, &format!("{} (8 kHz)", name));
    }

    // Test 4: High sample rate (192 kHz)
    {
        let mut effect = create(HIGH_SAMPLE_RATE);
        assert_finite_output(&mut effect, &format!("{} (192 kHz)", name));
    }

    // Test 5: Low sample rate with all max params
    {
        let mut effect = create(LOW_SAMPLE_RATE);
        set_all_params_max(&mut effect);
        assert_finite_output(&mut effect, &format!("{} (8 kHz, all max)", name));
    }

    // Test 6: High sample rate with all max params
    {
        let mut effect = create(HIGH_SAMPLE_RATE);
        set_all_params_max(&mut effect);
        assert_finite_output(&mut effect, &format!("{} (192 kHz, all max)", name));
    }
}

#[test]
fn test_extreme_distortion() {
    run_extreme_test("Distortion", Distortion::new);
}

#[test]
fn test_extreme_compressor() {
    run_extreme_test("Compressor", Compressor::new);
}

#[test]
fn test_extreme_chorus() {
    run_extreme_test("Chorus", Chorus::new);
}

#[test]
fn test_extreme_modern_delay() {
    run_extreme_test("ModernDelay", ModernDelay::new);
}

#[test]
fn test_extreme_freeverb() {
    run_extreme_test("FreeverbReverb", FreeverbReverb::new);
}

#[test]
fn test_extreme_convolution_reverb() {
    run_extreme_test("ConvolutionReverb", ConvolutionReverb::new);
}

#[test]
fn test_extreme_lowpass() {
    run_extreme_test("LowPassFilter", LowPassFilter::new);
}

#[test]
fn test_extreme_waveshaper() {
    run_extreme_test("Waveshaper", Waveshaper::new);
}

#[test]
fn test_extreme_maximizer() {
    run_extreme_test("Maximizer", Maximizer::new);
}

#[test]
fn test_extreme_imager() {
    run_extreme_test("Imager", Imager::new);
}

#[test]
fn test_extreme_multiband_eq() {
    run_extreme_test("MultibandEq", MultibandEq::new);
}
