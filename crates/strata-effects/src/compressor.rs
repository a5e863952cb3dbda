//! Dynamics compressor with envelope follower and gain reduction.

use strata_core::{Effect, ParamDescriptor, ParameterInfo, SmoothedParam, EnvelopeFollower};
use libm::{log10f, powf};

/// Converts linear amplitude to decibels.
#[inline]
pub(crate) fn linear_to_db(linear: f32) -> f32 {
    20.0 * log10f(linear.max(1e-6))
}

/// Converts decibels to linear amplitude.
#[inline]
pub(crate) fn db_to_linear(db: f32) -> f32 {
    powf(10.0, db / 20.0)
}

/// Gain computer for calculating compression curve.
///
/// Shared between [`Compressor`] and the Maximizer's brick-wall limiting
/// stage -- both reduce to a threshold/ratio/knee curve over a dB input.
#[derive(Debug, Clone)]
pub(crate) struct GainComputer {
    pub(crate) threshold_db: f32,
    pub(crate) ratio: f32,
    pub(crate) knee_db: f32,
}

impl GainComputer {
    pub(crate) fn new() -> Self {
        Self {
            threshold_db: -20.0,
            ratio: 4.0,
            knee_db: 6.0,
        }
    }

    #[inline]
    pub(crate) fn compute_gain_db(&self, input_db: f32) -> f32 {
        let overshoot = input_db - self.threshold_db;

        if overshoot <= -self.knee_db / 2.0 {
            0.0
        } else if overshoot > self.knee_db / 2.0 {
            let gain_reduction = overshoot * (1.0 - 1.0 / self.ratio);
            -gain_reduction
        } else {
            let knee_factor = (overshoot + self.knee_db / 2.0) / self.knee_db;
            let gain_reduction = knee_factor * knee_factor * overshoot * (1.0 - 1.0 / self.ratio);
            -gain_reduction
        }
    }
}

/// Dynamics compressor effect.
///
/// # Example
///
/// ```rust
/// use strata_effects::Compressor;
/// use strata_core::Effect;
///
/// let mut comp = Compressor::new(44100.0);
/// comp.set_threshold_db(-20.0);
/// comp.set_ratio(4.0);
/// comp.set_attack_ms(5.0);
/// comp.set_release_ms(50.0);
///
/// let input = 0.5;
/// let output = comp.process(input);
/// ```
#[derive(Debug, Clone)]
pub struct Compressor {
    envelope_follower: EnvelopeFollower,
    gain_computer: GainComputer,
    makeup_gain: SmoothedParam,
    sample_rate: f32,
}

impl Compressor {
    /// Create a new compressor with default settings.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            envelope_follower: EnvelopeFollower::new(sample_rate),
            gain_computer: GainComputer::new(),
            makeup_gain: SmoothedParam::with_config(1.0, sample_rate, 10.0),
            sample_rate,
        }
    }

    /// Set threshold in dB.
    pub fn set_threshold_db(&mut self, threshold_db: f32) {
        self.gain_computer.threshold_db = threshold_db.clamp(-60.0, 0.0);
    }

    /// Set compression ratio.
    pub fn set_ratio(&mut self, ratio: f32) {
        self.gain_computer.ratio = ratio.clamp(1.0, 20.0);
    }

    /// Set attack time in milliseconds.
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.envelope_follower.set_attack_ms(attack_ms.clamp(0.1, 100.0));
    }

    /// Set release time in milliseconds.
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.envelope_follower.set_release_ms(release_ms.clamp(10.0, 1000.0));
    }

    /// Set knee width in dB.
    pub fn set_knee_db(&mut self, knee_db: f32) {
        self.gain_computer.knee_db = knee_db.clamp(0.0, 12.0);
    }

    /// Set makeup gain in dB.
    pub fn set_makeup_gain_db(&mut self, gain_db: f32) {
        let linear = db_to_linear(gain_db.clamp(0.0, 24.0));
        self.makeup_gain.set_target(linear);
    }
}

impl Effect for Compressor {
    fn process(&mut self, input: f32) -> f32 {
        let envelope = self.envelope_follower.process(input);
        let envelope_db = linear_to_db(envelope);
        let gain_reduction_db = self.gain_computer.compute_gain_db(envelope_db);
        let gain_linear = db_to_linear(gain_reduction_db);
        let makeup = self.makeup_gain.advance();

        input * gain_linear * makeup
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.envelope_follower.set_sample_rate(sample_rate);
        self.makeup_gain.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.envelope_follower.reset();
        self.makeup_gain.snap_to_target();
    }
}

impl ParameterInfo for Compressor {
    fn param_count(&self) -> usize {
        6
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        let desc = match index {
            0 => Some(ParamDescriptor {
                name: "Threshold",
                short_name: "Thresh",
                unit: strata_core::ParamUnit::Decibels,
                min: -60.0,
                max: 0.0,
                default: -20.0,
                step: 0.5,
                ..Default::default()
            }),
            1 => Some(ParamDescriptor {
                name: "Ratio",
                short_name: "Ratio",
                unit: strata_core::ParamUnit::None,
                min: 1.0,
                max: 20.0,
                default: 4.0,
                step: 0.1,
                ..Default::default()
            }),
            2 => Some(ParamDescriptor {
                name: "Attack",
                short_name: "Attack",
                unit: strata_core::ParamUnit::Milliseconds,
                min: 0.1,
                max: 100.0,
                default: 5.0,
                step: 0.1,
                ..Default::default()
            }),
            3 => Some(ParamDescriptor {
                name: "Release",
                short_name: "Release",
                unit: strata_core::ParamUnit::Milliseconds,
                min: 10.0,
                max: 1000.0,
                default: 50.0,
                step: 1.0,
                ..Default::default()
            }),
            4 => Some(ParamDescriptor {
                name: "Knee",
                short_name: "Knee",
                unit: strata_core::ParamUnit::Decibels,
                min: 0.0,
                max: 12.0,
                default: 6.0,
                step: 0.5,
                ..Default::default()
            }),
            5 => Some(ParamDescriptor {
                name: "Makeup Gain",
                short_name: "Makeup",
                unit: strata_core::ParamUnit::Decibels,
                min: 0.0,
                max: 24.0,
                default: 0.0,
                step: 0.1,
                ..Default::default()
            }),
            _ => None,
        };
        desc.map(|d| d.with_stream_index(index))
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.gain_computer.threshold_db,
            1 => self.gain_computer.ratio,
            2 => self.envelope_follower.attack_ms(),
            3 => self.envelope_follower.release_ms(),
            4 => self.gain_computer.knee_db,
            5 => linear_to_db(self.makeup_gain.target()),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_threshold_db(value),
            1 => self.set_ratio(value),
            2 => self.set_attack_ms(value),
            3 => self.set_release_ms(value),
            4 => self.set_knee_db(value),
            5 => self.set_makeup_gain_db(value),
            _ => {}
        }
    }
}
