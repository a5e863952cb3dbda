//! Demonstration of effect chaining in Strata
//!
//! This example shows both static dispatch (zero-cost) and dynamic dispatch
//! (runtime flexibility) approaches to chaining effects.
//!
//! Run with: cargo run --example chain_demo

use strata_core::{Effect, EffectExt};
use strata_effects::{Chorus, Compressor, Distortion, LowPassFilter, Maximizer, ModernDelay};

const SAMPLE_RATE: f32 = 48000.0;

fn main() {
    println!("Strata Effect Chain Demo");
    println!("========================\n");

    // Generate a test signal (440 Hz sine wave)
    let test_signal: Vec<f32> = (0..4800)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect();

    // Example 1: Static dispatch chain (zero-cost abstraction)
    println!("1. Static Dispatch Chain (Compile-time, Zero-Cost)");
    println!("-------------------------------------------------");

    let compressor = {
        let mut c = Compressor::new(SAMPLE_RATE);
        c.set_threshold_db(-18.0);
        c.set_ratio(3.0);
        c.set_attack_ms(5.0);
        c.set_release_ms(80.0);
        c
    };

    let distortion = {
        let mut d = Distortion::new(SAMPLE_RATE);
        d.set_drive_db(10.0);
        d.set_tone_db(2.0);
        d.set_mix(0.6);
        d
    };

    let chorus = {
        let mut c = Chorus::new(SAMPLE_RATE);
        c.set_rate(1.2);
        c.set_depth(0.5);
        c.set_mix(0.3);
        c
    };

    let delay = {
        let mut d = ModernDelay::new(SAMPLE_RATE);
        d.set_time_l_ms(375.0);
        d.set_time_r_ms(500.0);
        d.set_feedback_l(0.4);
        d.set_feedback_r(0.4);
        d.set_mix(0.25);
        d
    };

    // Chain using the EffectExt trait - all resolved at compile time
    let mut static_chain = compressor.chain(distortion).chain(chorus).chain(delay);

    let mut output = vec![0.0; test_signal.len()];
    static_chain.process_block(&test_signal, &mut output);

    // Calculate RMS of output
    let rms: f32 = (output.iter().map(|x| x * x).sum::<f32>() / output.len() as f32).sqrt();
    println!("Chain: Compressor -> Distortion -> Chorus -> ModernDelay");
    println!("Output RMS: {:.4}", rms);
    println!(
        "Peak: {:.4}",
        output.iter().map(|x| x.abs()).fold(0.0_f32, f32::max)
    );
    println!("Latency: {} samples\n", static_chain.latency_samples());

    // Example 2: Dynamic dispatch chain (runtime flexibility)
    println!("2. Dynamic Dispatch Chain (Runtime Flexibility)");
    println!("-----------------------------------------------");

    let mut dynamic_chain: Vec<Box<dyn Effect>> = vec![
        Box::new({
            let mut f = LowPassFilter::new(SAMPLE_RATE);
            f.set_cutoff_hz(8000.0);
            f.set_q(0.707);
            f
        }),
        Box::new({
            let mut c = Compressor::new(SAMPLE_RATE);
            c.set_threshold_db(-18.0);
            c.set_ratio(4.0);
            c.set_attack_ms(5.0);
            c.set_release_ms(100.0);
            c
        }),
        Box::new({
            let mut m = Maximizer::new(SAMPLE_RATE);
            m.set_input_gain_db(3.0);
            m.set_ceiling_db(-0.3);
            m
        }),
    ];

    // Process with dynamic dispatch
    let mut output2 = test_signal.clone();
    for sample in output2.iter_mut() {
        for effect in dynamic_chain.iter_mut() {
            *sample = effect.process(*sample);
        }
    }

    let rms2: f32 = (output2.iter().map(|x| x * x).sum::<f32>() / output2.len() as f32).sqrt();
    println!("Chain: LowPass -> Compressor -> Maximizer");
    println!("Output RMS: {:.4}", rms2);
    println!(
        "Peak: {:.4}\n",
        output2.iter().map(|x| x.abs()).fold(0.0_f32, f32::max)
    );

    // Example 3: Individual effect demonstration
    println!("3. Individual Effects");
    println!("--------------------");

    let effects_info = [
        ("Distortion", "5 waveshapes: soft/hard clip, tanh, foldback"),
        ("Compressor", "Soft-knee dynamics with envelope follower"),
        ("Chorus", "Dual-voice modulated delay"),
        ("ModernDelay", "Stereo delay with ping-pong cross-feed"),
        ("LowPassFilter", "Biquad-based resonant filter"),
        ("FreeverbReverb", "Freeverb-style algorithmic reverb"),
        ("ConvolutionReverb", "Procedural impulse response reverb"),
        ("Waveshaper", "Lookup-table waveshaping with oversampling"),
        ("Maximizer", "Brick-wall loudness maximizer"),
        ("Imager", "Mid/side stereo width control"),
        ("MultibandEq", "Configurable-band equalizer"),
    ];

    for (name, desc) in effects_info {
        println!("  {} - {}", name, desc);
    }

    println!("\nDemo complete!");
}
