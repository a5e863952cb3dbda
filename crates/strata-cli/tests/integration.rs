//! Integration tests for strata-cli.
//!
//! Tests cover the CLI binary invocation, effect creation from the registry,
//! and end-to-end file processing workflows.

use std::process::Command;

/// Helper to get the path to the `strata` binary built by cargo.
fn strata_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_strata"))
}

// ---------------------------------------------------------------------------
// CLI binary tests -- `strata effects`
// ---------------------------------------------------------------------------

#[test]
fn cli_effects_lists_all_effects() {
    let output = strata_bin()
        .arg("effects")
        .output()
        .expect("failed to run strata effects");

    assert!(output.status.success(), "strata effects failed");

    let stdout = String::from_utf8_lossy(&output.stdout);

    // Verify the header is present
    assert!(
        stdout.contains("Available Effects"),
        "should show 'Available Effects' header"
    );

    // Verify all 11 CLI-exposed effects are listed
    let expected_effects = [
        "distortion",
        "compressor",
        "chorus",
        "delay",
        "filter",
        "reverb",
        "convolution_reverb",
        "waveshaper",
        "maximizer",
        "imager",
        "multiband_eq",
    ];

    for effect in &expected_effects {
        assert!(
            stdout.contains(effect),
            "effects listing should contain '{effect}'"
        );
    }
}

#[test]
fn cli_effects_detail_shows_parameters() {
    let output = strata_bin()
        .args(["effects", "distortion"])
        .output()
        .expect("failed to run strata effects distortion");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);

    // Should show the effect name as a header
    assert!(stdout.contains("distortion"));

    // Should show parameter table
    assert!(stdout.contains("Parameters"));
    assert!(stdout.contains("drive"));
    assert!(stdout.contains("tone"));
}

#[test]
fn cli_effects_unknown_effect_fails() {
    let output = strata_bin()
        .args(["effects", "nonexistent_effect_xyz"])
        .output()
        .expect("failed to run strata");

    assert!(!output.status.success(), "should fail for unknown effect");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown effect") || stderr.contains("nonexistent_effect_xyz"),
        "error should mention unknown effect, got: {stderr}"
    );
}

// ---------------------------------------------------------------------------
// CLI binary tests -- `strata --help`
// ---------------------------------------------------------------------------

#[test]
fn cli_help_works() {
    let output = strata_bin()
        .arg("--help")
        .output()
        .expect("failed to run strata --help");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Strata DSP Framework CLI"));
    assert!(stdout.contains("process"));
    assert!(stdout.contains("effects"));
    assert!(stdout.contains("generate"));
}

#[test]
fn cli_version_works() {
    let output = strata_bin()
        .arg("--version")
        .output()
        .expect("failed to run strata --version");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("strata"),
        "version output should contain 'strata'"
    );
}

// ---------------------------------------------------------------------------
// CLI binary tests -- `strata process` (end-to-end file processing)
// ---------------------------------------------------------------------------

#[test]
fn cli_process_single_effect() {
    use strata_io::{WavSpec, write_wav};
    use tempfile::TempDir;

    let dir = TempDir::new().unwrap();
    let input_path = dir.path().join("input.wav");
    let output_path = dir.path().join("output.wav");

    // Create a test WAV file
    let sr = 48000;
    let samples: Vec<f32> = (0..sr)
        .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sr as f32).sin())
        .collect();

    let spec = WavSpec {
        channels: 1,
        sample_rate: sr as u32,
        bits_per_sample: 32,
    };
    write_wav(&input_path, &samples, spec).unwrap();

    // Run strata process
    let output = strata_bin()
        .args([
            "process",
            input_path.to_str().unwrap(),
            output_path.to_str().unwrap(),
            "--effect",
            "distortion",
            "--param",
            "drive=12",
        ])
        .output()
        .expect("failed to run strata process");

    assert!(
        output.status.success(),
        "strata process failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    // Verify output file exists and is a valid WAV
    assert!(output_path.exists(), "output WAV should exist");

    let (loaded, loaded_spec) = strata_io::read_wav(&output_path).unwrap();
    assert_eq!(loaded_spec.sample_rate, sr as u32);
    assert!(!loaded.is_empty());
}

#[test]
fn cli_process_chain() {
    use strata_io::{WavSpec, write_wav};
    use tempfile::TempDir;

    let dir = TempDir::new().unwrap();
    let input_path = dir.path().join("input.wav");
    let output_path = dir.path().join("output.wav");

    // Create a test WAV file
    let sr = 48000;
    let samples: Vec<f32> = (0..sr)
        .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sr as f32).sin())
        .collect();

    let spec = WavSpec {
        channels: 1,
        sample_rate: sr as u32,
        bits_per_sample: 32,
    };
    write_wav(&input_path, &samples, spec).unwrap();

    // Run with chain
    let output = strata_bin()
        .args([
            "process",
            input_path.to_str().unwrap(),
            output_path.to_str().unwrap(),
            "--chain",
            "distortion:drive=6|compressor:threshold=-18",
        ])
        .output()
        .expect("failed to run strata process with chain");

    assert!(
        output.status.success(),
        "strata process --chain failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert!(output_path.exists());
    let (loaded, _) = strata_io::read_wav(&output_path).unwrap();
    assert!(!loaded.is_empty());
}

#[test]
fn cli_process_no_effect_fails() {
    use strata_io::{WavSpec, write_wav};
    use tempfile::TempDir;

    let dir = TempDir::new().unwrap();
    let input_path = dir.path().join("input.wav");

    // Create a minimal WAV file
    let spec = WavSpec {
        channels: 1,
        sample_rate: 48000,
        bits_per_sample: 32,
    };
    write_wav(&input_path, &[0.0; 100], spec).unwrap();

    let output = strata_bin()
        .args(["process", input_path.to_str().unwrap()])
        .output()
        .expect("failed to run strata");

    assert!(
        !output.status.success(),
        "process without effect should fail"
    );
}

#[test]
fn cli_process_nonexistent_input_fails() {
    let output = strata_bin()
        .args([
            "process",
            "/tmp/nonexistent_strata_test_file_12345.wav",
            "--effect",
            "distortion",
        ])
        .output()
        .expect("failed to run strata");

    assert!(
        !output.status.success(),
        "process with nonexistent input should fail"
    );
}

// ---------------------------------------------------------------------------
// CLI binary tests -- `strata info`
// ---------------------------------------------------------------------------

#[test]
fn cli_info_shows_wav_metadata() {
    use strata_io::{WavSpec, write_wav};
    use tempfile::NamedTempFile;

    let file = NamedTempFile::with_suffix(".wav").unwrap();

    let sr = 44100u32;
    let samples: Vec<f32> = (0..sr)
        .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sr as f32).sin())
        .collect();

    let spec = WavSpec {
        channels: 1,
        sample_rate: sr,
        bits_per_sample: 32,
    };
    write_wav(file.path(), &samples, spec).unwrap();

    let output = strata_bin()
        .args(["info", file.path().to_str().unwrap()])
        .output()
        .expect("failed to run strata info");

    assert!(
        output.status.success(),
        "strata info failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("44100") || stdout.contains("44,100"),
        "should show sample rate, got: {stdout}"
    );
}

// ---------------------------------------------------------------------------
// CLI binary tests -- `strata generate`
// ---------------------------------------------------------------------------

#[test]
fn cli_generate_tone() {
    use tempfile::TempDir;

    let dir = TempDir::new().unwrap();
    let output_path = dir.path().join("tone.wav");

    let output = strata_bin()
        .args([
            "generate",
            "tone",
            output_path.to_str().unwrap(),
            "--freq",
            "440",
            "--duration",
            "0.1",
        ])
        .output()
        .expect("failed to run strata generate tone");

    assert!(
        output.status.success(),
        "strata generate tone failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert!(output_path.exists());

    let (loaded, spec) = strata_io::read_wav(&output_path).unwrap();
    assert!(!loaded.is_empty());
    // Duration 0.1s at default sample rate should give ~4800 samples
    assert!(loaded.len() > 1000, "tone should have reasonable length");
    assert_eq!(spec.sample_rate, 48000); // default sample rate
}

// ---------------------------------------------------------------------------
// Registry-based effect creation tests (library-level, not binary)
// ---------------------------------------------------------------------------

#[test]
fn registry_creates_all_11_effects() {
    use strata_registry::EffectRegistry;

    let registry = EffectRegistry::new();

    // The registry should have 11 effects
    assert_eq!(registry.len(), 11, "registry should have 11 effects");

    // Verify we can create each one
    let effect_names = [
        "distortion",
        "compressor",
        "chorus",
        "delay",
        "filter",
        "reverb",
        "convolution_reverb",
        "waveshaper",
        "maximizer",
        "imager",
        "multiband_eq",
    ];

    for name in &effect_names {
        let effect = registry.create(name, 48000.0);
        assert!(
            effect.is_some(),
            "should be able to create effect '{name}' from registry"
        );
    }
}

#[test]
fn registry_effect_processes_audio() {
    use strata_registry::EffectRegistry;

    let registry = EffectRegistry::new();
    let mut effect = registry.create("distortion", 48000.0).unwrap();

    // Process some audio through the effect
    let input = 0.5_f32;
    let output = effect.process(input);

    // Distortion with default drive should produce some output
    assert!(output.is_finite(), "output should be finite");
}

#[test]
fn registry_unknown_effect_returns_none() {
    use strata_registry::EffectRegistry;

    let registry = EffectRegistry::new();
    assert!(
        registry.create("nonexistent", 48000.0).is_none(),
        "unknown effect should return None"
    );
}
