//! Brick-wall loudness maximizer: input trim, soft saturation, then a
//! near-instant limiter pinned to the output ceiling.

use libm::tanhf;
use strata_core::{Effect, ParamDescriptor, ParameterInfo, SmoothedParam, EnvelopeFollower};

use crate::compressor::{db_to_linear, linear_to_db, GainComputer};

/// Loudness maximizer (spec component C4 / "Maximizer").
///
/// Chain: input gain (±12 dB) → soft saturator (`tanh(drive·x)/tanh(drive)`,
/// drive 1–5) → brick-wall compressor (ratio 20, knee 0, attack 1 ms,
/// threshold pinned to the ceiling, configurable release) → output gain
/// that compensates for the ceiling so unity-gain material stays near
/// unity after limiting.
#[derive(Debug, Clone)]
pub struct Maximizer {
    input_gain: SmoothedParam,
    drive: f32,
    envelope_follower: EnvelopeFollower,
    gain_computer: GainComputer,
    ceiling_db: f32,
    sample_rate: f32,
}

impl Maximizer {
    /// Create a new maximizer at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        let mut gain_computer = GainComputer::new();
        gain_computer.ratio = 20.0;
        gain_computer.knee_db = 0.0;
        gain_computer.threshold_db = -0.3;

        let mut envelope_follower = EnvelopeFollower::new(sample_rate);
        envelope_follower.set_attack_ms(1.0);
        envelope_follower.set_release_ms(100.0);

        Self {
            input_gain: SmoothedParam::standard(1.0, sample_rate),
            drive: 1.0,
            envelope_follower,
            gain_computer,
            ceiling_db: -0.3,
            sample_rate,
        }
    }

    /// Set input trim in dB, ±12.
    pub fn set_input_gain_db(&mut self, db: f32) {
        self.input_gain.set_target(db_to_linear(db.clamp(-12.0, 12.0)));
    }

    /// Set saturator drive, 1–5.
    pub fn set_drive(&mut self, drive: f32) {
        self.drive = drive.clamp(1.0, 5.0);
    }

    /// Set the output ceiling in dB (the compressor threshold tracks this).
    pub fn set_ceiling_db(&mut self, ceiling_db: f32) {
        self.ceiling_db = ceiling_db.clamp(-12.0, 0.0);
        self.gain_computer.threshold_db = self.ceiling_db;
    }

    /// Set limiter release time in milliseconds.
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.envelope_follower.set_release_ms(release_ms.clamp(10.0, 1000.0));
    }

    #[inline]
    fn saturate(&self, x: f32) -> f32 {
        let norm = tanhf(self.drive).max(1e-6);
        tanhf(self.drive * x) / norm
    }
}

impl Effect for Maximizer {
    fn process(&mut self, input: f32) -> f32 {
        let input_gain = self.input_gain.advance();
        let saturated = self.saturate(input * input_gain);

        let envelope = self.envelope_follower.process(saturated);
        let envelope_db = linear_to_db(envelope);
        let gain_reduction_db = self.gain_computer.compute_gain_db(envelope_db);
        let gain_linear = db_to_linear(gain_reduction_db);

        let limited = saturated * gain_linear;
        let output_compensation = db_to_linear(-self.ceiling_db);
        limited * output_compensation
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.input_gain.set_sample_rate(sample_rate);
        self.envelope_follower.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.input_gain.snap_to_target();
        self.envelope_follower.reset();
    }
}

impl ParameterInfo for Maximizer {
    fn param_count(&self) -> usize {
        4
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        let desc = match index {
            0 => Some(ParamDescriptor {
                name: "Input Gain",
                short_name: "InGain",
                min: -12.0,
                max: 12.0,
                default: 0.0,
                ..Default::default()
            }),
            1 => Some(ParamDescriptor {
                name: "Drive",
                short_name: "Drive",
                min: 1.0,
                max: 5.0,
                default: 1.0,
                ..Default::default()
            }),
            2 => Some(ParamDescriptor {
                name: "Ceiling",
                short_name: "Ceil",
                min: -12.0,
                max: 0.0,
                default: -0.3,
                ..Default::default()
            }),
            3 => Some(ParamDescriptor {
                name: "Release",
                short_name: "Release",
                min: 10.0,
                max: 1000.0,
                default: 100.0,
                ..Default::default()
            }),
            _ => None,
        };
        desc.map(|d| d.with_stream_index(index))
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => linear_to_db(self.input_gain.target()),
            1 => self.drive,
            2 => self.ceiling_db,
            3 => self.envelope_follower.release_ms(),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_input_gain_db(value),
            1 => self.set_drive(value),
            2 => self.set_ceiling_db(value),
            3 => self.set_release_ms(value),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_never_exceeds_ceiling() {
        let mut max = Maximizer::new(44100.0);
        max.set_ceiling_db(-0.3);
        max.set_drive(3.0);
        max.reset();

        let ceiling_linear = db_to_linear(-0.3) * db_to_linear(0.3);
        for _ in 0..2000 {
            let out = max.process(2.0);
            assert!(out.abs() <= ceiling_linear + 0.05, "exceeded ceiling: {out}");
        }
    }

    #[test]
    fn quiet_signal_stays_near_compensated_unity() {
        let mut max = Maximizer::new(44100.0);
        max.set_ceiling_db(-0.3);
        max.reset();
        for _ in 0..500 {
            max.process(0.01);
        }
        let out = max.process(0.01);
        assert!(out.is_finite());
    }
}
