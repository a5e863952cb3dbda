//! Freeverb-style algorithmic reverb: parallel damped combs feeding a serial
//! allpass diffuser, with a tapped-delay early reflection bank.

use core::array;
use libm::expf;
use strata_core::{
    AllpassFilter, CombFilter, Effect, InterpolatedDelay, ParamDescriptor, ParameterInfo,
    SmoothedParam, flush_denormal,
};

/// Comb delay tunings for the left channel at 44.1 kHz reference (ms-equivalent,
/// mutually prime sample counts borrowed from Schroeder/Freeverb practice).
const COMB_TUNINGS_44K: [usize; 4] = [1116, 1188, 1277, 1356];

/// Right-channel comb tunings, offset from the left by ~23 samples @44.1kHz
/// so the two channels decorrelate instead of ping-ponging in lockstep.
const COMB_OFFSET_44K: usize = 23;

/// Serial allpass diffuser tunings at 44.1 kHz reference.
const ALLPASS_TUNINGS_44K: [usize; 4] = [556, 441, 341, 225];

/// Early reflection tap times in milliseconds.
const ER_TAPS_MS: [f32; 8] = [17.0, 23.0, 31.0, 43.0, 47.0, 59.0, 67.0, 73.0];

const REFERENCE_RATE: f32 = 44100.0;
const MAX_PREDELAY_MS: f32 = 200.0;

/// Upper bound of the comb feedback formula's seconds-based decay domain.
const MAX_DECAY_SECONDS: f32 = 15.0;

fn scale_tuning(samples: usize, sample_rate: f32) -> usize {
    let scaled = samples as f32 * (sample_rate / REFERENCE_RATE);
    (scaled.round() as usize).max(1)
}

/// Freeverb-style reverberator (spec component C4 / "Algorithmic reverb").
///
/// Eight damped comb filters (four per channel, detuned between channels) run
/// in parallel and sum into a four-stage serial allpass diffuser, producing
/// the late tail. An independent eight-tap delay line produces early
/// reflections, blended with the late tail by `early_late_mix`. Output gain
/// is scaled by `wet * 0.6` to reserve headroom against the comb summation.
#[derive(Debug, Clone)]
pub struct FreeverbReverb {
    predelay: InterpolatedDelay,
    predelay_samples: f32,
    combs_l: [CombFilter; 4],
    combs_r: [CombFilter; 4],
    allpass_l: [AllpassFilter; 4],
    allpass_r: [AllpassFilter; 4],
    early_taps: InterpolatedDelay,
    er_tap_samples: [f32; 8],

    room_size: SmoothedParam,
    damping: SmoothedParam,
    early_late_mix: SmoothedParam,
    wet: SmoothedParam,
    dry: SmoothedParam,

    sample_rate: f32,
}

impl FreeverbReverb {
    /// Create a new reverb at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        let predelay_max = ((MAX_PREDELAY_MS / 1000.0) * sample_rate).ceil() as usize + 1;

        let combs_l: [CombFilter; 4] =
            array::from_fn(|i| CombFilter::new(scale_tuning(COMB_TUNINGS_44K[i], sample_rate)));
        let combs_r: [CombFilter; 4] = array::from_fn(|i| {
            CombFilter::new(scale_tuning(
                COMB_TUNINGS_44K[i] + COMB_OFFSET_44K,
                sample_rate,
            ))
        });
        let mut allpass_l: [AllpassFilter; 4] = array::from_fn(|i| {
            AllpassFilter::new(scale_tuning(ALLPASS_TUNINGS_44K[i], sample_rate))
        });
        let mut allpass_r: [AllpassFilter; 4] = array::from_fn(|i| {
            AllpassFilter::new(scale_tuning(
                ALLPASS_TUNINGS_44K[i] + COMB_OFFSET_44K,
                sample_rate,
            ))
        });

        for ap in allpass_l.iter_mut().chain(allpass_r.iter_mut()) {
            ap.set_feedback(0.3 + 0.5 * 0.4);
        }

        let er_tap_samples = ER_TAPS_MS.map(|ms| (ms / 1000.0) * sample_rate);
        let early_taps_max = er_tap_samples.iter().cloned().fold(0.0_f32, f32::max) as usize + 8;

        let mut reverb = Self {
            predelay: InterpolatedDelay::new(predelay_max),
            predelay_samples: 0.0,
            combs_l,
            combs_r,
            allpass_l,
            allpass_r,
            early_taps: InterpolatedDelay::new(early_taps_max),
            er_tap_samples,
            room_size: SmoothedParam::standard(0.5, sample_rate),
            damping: SmoothedParam::standard(0.5, sample_rate),
            early_late_mix: SmoothedParam::standard(0.3, sample_rate),
            wet: SmoothedParam::standard(0.3, sample_rate),
            dry: SmoothedParam::standard(0.7, sample_rate),
            sample_rate,
        };
        reverb.apply_decay_and_damping();
        reverb
    }

    /// Room size maps linearly onto the 0-15s decay-time domain the comb
    /// feedback formula is defined over, so `room_size = 1.0` reaches the
    /// formula's own `0.98` clamp (`min(0.98, 1 - 1/(15*10))`).
    fn apply_decay_and_damping(&mut self) {
        let decay_seconds = self.room_size.target() * MAX_DECAY_SECONDS;
        let feedback = (1.0 - 1.0 / (decay_seconds * 10.0)).min(0.98).max(0.0);
        let damping = self.damping.target();
        let cutoff_hz = 2000.0 + (1.0 - damping) * 18000.0;
        let coeff = expf(-2.0 * core::f32::consts::PI * cutoff_hz / self.sample_rate);
        for comb in self.combs_l.iter_mut().chain(self.combs_r.iter_mut()) {
            comb.set_feedback(feedback);
            comb.set_damp(coeff);
        }
    }

    /// Set room size / decay, 0–1. Larger values produce a longer tail;
    /// `1.0` maps to the maximum 15s decay time the feedback formula saturates at.
    pub fn set_room_size(&mut self, size: f32) {
        self.room_size.set_target(size.clamp(0.0, 1.0));
        self.apply_decay_and_damping();
    }

    /// Set high-frequency damping, 0 (bright) – 1 (dark).
    pub fn set_damping(&mut self, damping: f32) {
        self.damping.set_target(damping.clamp(0.0, 1.0));
        self.apply_decay_and_damping();
    }

    /// Set the balance between early reflections and the late tail, 0–1.
    pub fn set_early_late_mix(&mut self, mix: f32) {
        self.early_late_mix.set_target(mix.clamp(0.0, 1.0));
    }

    /// Set pre-delay in milliseconds (0–200 ms).
    pub fn set_predelay_ms(&mut self, ms: f32) {
        let clamped = ms.clamp(0.0, MAX_PREDELAY_MS);
        self.predelay_samples = (clamped / 1000.0) * self.sample_rate;
    }

    /// Set wet/dry mix, 0–1.
    pub fn set_mix(&mut self, mix: f32) {
        let mix = mix.clamp(0.0, 1.0);
        self.wet.set_target(mix);
        self.dry.set_target(1.0 - mix);
    }

    fn process_channel(input: f32, combs: &mut [CombFilter; 4], allpass: &mut [AllpassFilter; 4]) -> f32 {
        let mut late = 0.0;
        for comb in combs.iter_mut() {
            late += comb.process(input);
        }
        late *= 0.25;
        for ap in allpass.iter_mut() {
            late = ap.process(late);
        }
        late
    }

    fn early_reflections(&mut self, input: f32) -> f32 {
        self.early_taps.write(input);
        let mut sum = 0.0;
        let mut gain = 1.0;
        for &tap in &self.er_tap_samples {
            sum += self.early_taps.read(tap) * gain;
            gain *= 0.7;
        }
        sum * 0.3
    }
}

impl Effect for FreeverbReverb {
    fn process(&mut self, input: f32) -> f32 {
        let (l, _r) = self.process_stereo(input, input);
        l
    }

    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let mono_in = flush_denormal((left + right) * 0.5);

        self.predelay.write(mono_in);
        let delayed = self.predelay.read(self.predelay_samples);

        let late_l = Self::process_channel(delayed, &mut self.combs_l, &mut self.allpass_l);
        let late_r = Self::process_channel(delayed, &mut self.combs_r, &mut self.allpass_r);
        let early = self.early_reflections(delayed);

        let early_late_mix = self.early_late_mix.advance();
        let wet = self.wet.advance() * 0.6;
        let dry = self.dry.advance();

        let wet_l = early * early_late_mix + late_l * (1.0 - early_late_mix);
        let wet_r = early * early_late_mix + late_r * (1.0 - early_late_mix);

        (left * dry + wet_l * wet, right * dry + wet_r * wet)
    }

    fn is_true_stereo(&self) -> bool {
        true
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = Self::new(sample_rate);
    }

    fn reset(&mut self) {
        self.predelay.clear();
        self.early_taps.clear();
        for comb in self.combs_l.iter_mut().chain(self.combs_r.iter_mut()) {
            comb.clear();
        }
        for ap in self.allpass_l.iter_mut().chain(self.allpass_r.iter_mut()) {
            ap.clear();
        }
    }

    fn latency_samples(&self) -> usize {
        0
    }
}

impl ParameterInfo for FreeverbReverb {
    fn param_count(&self) -> usize {
        5
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        let desc = match index {
            0 => Some(ParamDescriptor {
                name: "Room Size",
                short_name: "Size",
                default: 0.5,
                ..Default::default()
            }),
            1 => Some(ParamDescriptor {
                name: "Damping",
                short_name: "Damp",
                default: 0.5,
                ..Default::default()
            }),
            2 => Some(ParamDescriptor {
                name: "Early/Late",
                short_name: "ErLate",
                default: 0.3,
                ..Default::default()
            }),
            3 => Some(ParamDescriptor::time_ms("Pre-delay", "PreDly", 0.0, 200.0, 0.0)),
            4 => Some(ParamDescriptor::mix()),
            _ => None,
        };
        desc.map(|d| d.with_stream_index(index))
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.room_size.target(),
            1 => self.damping.target(),
            2 => self.early_late_mix.target(),
            3 => self.predelay_samples / self.sample_rate * 1000.0,
            4 => self.wet.target() * 100.0,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_room_size(value),
            1 => self.set_damping(value),
            2 => self.set_early_late_mix(value),
            3 => self.set_predelay_ms(value),
            4 => self.set_mix(value / 100.0),
            _ => {}
        }
    }
}
