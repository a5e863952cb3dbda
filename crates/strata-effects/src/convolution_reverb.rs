//! Convolution reverb with a procedurally generated stereo impulse response.
//!
//! The impulse is synthesized rather than loaded from a file (strata carries
//! no sample-asset pipeline): white noise shaped by an exponential decay
//! envelope, with a handful of early-reflection impulses injected near the
//! start. Convolution itself is direct (time-domain), consistent with the
//! rest of the crate's choice not to carry an FFT dependency; very large
//! rooms at high sample rates will be CPU-heavy relative to a partitioned
//! FFT convolution, but correctness does not depend on which method is used.

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

use libm::expf;
use strata_core::{Effect, OnePole, ParamDescriptor, ParamKind, ParameterInfo, SmoothedParam, wet_dry_mix};

/// Room size preset, selecting the base impulse length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomSize {
    /// 0.5 s base length.
    Small,
    /// 1.5 s base length.
    Medium,
    /// 3.0 s base length.
    Large,
    /// 5.0 s base length.
    Hall,
}

impl RoomSize {
    fn base_seconds(self) -> f32 {
        match self {
            Self::Small => 0.5,
            Self::Medium => 1.5,
            Self::Large => 3.0,
            Self::Hall => 5.0,
        }
    }

    fn reflection_count(self) -> usize {
        match self {
            Self::Small => 4,
            Self::Medium => 6,
            Self::Large => 8,
            Self::Hall => 10,
        }
    }

    fn names() -> &'static [&'static str] {
        &["Small", "Medium", "Large", "Hall"]
    }

    fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Small,
            1 => Self::Medium,
            2 => Self::Large,
            _ => Self::Hall,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Small => 0,
            Self::Medium => 1,
            Self::Large => 2,
            Self::Hall => 3,
        }
    }
}

/// Maximum impulse length this effect will ever allocate (hall, size = 1.0,
/// at a generous 96 kHz): `5.0 * 2.0 * 96000` samples.
const MAX_IMPULSE_SAMPLES: usize = 960_000;

fn lcg_next(state: &mut u32) -> f32 {
    *state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    let upper = (*state >> 16) as u16;
    (f32::from(upper) / 65_536.0) * 2.0 - 1.0
}

/// Convolution reverb with a procedurally generated impulse response (spec
/// component C4 / "Convolution reverb").
#[derive(Debug, Clone)]
pub struct ConvolutionReverb {
    impulse: Vec<f32>,
    history_l: Vec<f32>,
    history_r: Vec<f32>,
    write_pos: usize,

    room: RoomSize,
    size: f32,
    decay: f32,
    damping: f32,
    mix: SmoothedParam,
    post_filter: OnePole,

    sample_rate: f32,
}

impl ConvolutionReverb {
    /// Create a new convolution reverb at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        let mut reverb = Self {
            impulse: Vec::new(),
            history_l: Vec::new(),
            history_r: Vec::new(),
            write_pos: 0,
            room: RoomSize::Medium,
            size: 0.5,
            decay: 0.5,
            damping: 0.5,
            mix: SmoothedParam::standard(0.3, sample_rate),
            post_filter: OnePole::new(sample_rate, 8000.0),
            sample_rate,
        };
        reverb.regenerate_impulse();
        reverb
    }

    fn regenerate_impulse(&mut self) {
        let length_s = self.room.base_seconds() * (0.5 + self.size * 1.5);
        let length_samples = ((length_s * self.sample_rate) as usize)
            .clamp(1, MAX_IMPULSE_SAMPLES);

        let decay_rate = 3.0 + self.decay * 7.0;
        let mut state: u32 = 0x9E37_79B9 ^ (length_samples as u32);

        self.impulse.clear();
        self.impulse.resize(length_samples, 0.0);

        for (i, sample) in self.impulse.iter_mut().enumerate() {
            let t = i as f32 / self.sample_rate;
            let envelope = expf(-decay_rate * t);
            *sample = lcg_next(&mut state) * envelope;
        }

        // Inject early reflections over the first 50 ms.
        let reflection_count = self.room.reflection_count();
        let tap_spacing_samples = (0.005 * self.sample_rate) as usize;
        for n in 0..reflection_count {
            let idx = n * tap_spacing_samples.max(1);
            if idx >= self.impulse.len() {
                break;
            }
            let gain = libm::powf(0.7, n as f32);
            self.impulse[idx] += gain;
        }

        let peak = self.impulse.iter().fold(0.0_f32, |acc, &s| acc.max(s.abs()));
        if peak > 1e-9 {
            let scale = 0.9 / peak;
            for sample in self.impulse.iter_mut() {
                *sample *= scale;
            }
        }

        self.history_l.clear();
        self.history_l.resize(self.impulse.len(), 0.0);
        self.history_r.clear();
        self.history_r.resize(self.impulse.len(), 0.0);
        self.write_pos = 0;

        let cutoff = 2000.0 + (1.0 - self.damping) * 16000.0;
        self.post_filter.set_frequency(cutoff.clamp(200.0, self.sample_rate * 0.49));
    }

    /// Set room size preset.
    pub fn set_room(&mut self, room: RoomSize) {
        if room != self.room {
            self.room = room;
            self.regenerate_impulse();
        }
    }

    /// Set impulse size scale, 0–1.
    pub fn set_size(&mut self, size: f32) {
        let clamped = size.clamp(0.0, 1.0);
        if (clamped - self.size).abs() > 1e-4 {
            self.size = clamped;
            self.regenerate_impulse();
        }
    }

    /// Set decay rate control, 0–1 (higher decays faster).
    pub fn set_decay(&mut self, decay: f32) {
        let clamped = decay.clamp(0.0, 1.0);
        if (clamped - self.decay).abs() > 1e-4 {
            self.decay = clamped;
            self.regenerate_impulse();
        }
    }

    /// Set high-frequency damping, 0 (bright) – 1 (dark).
    pub fn set_damping(&mut self, damping: f32) {
        let clamped = damping.clamp(0.0, 1.0);
        if (clamped - self.damping).abs() > 1e-4 {
            self.damping = clamped;
            self.regenerate_impulse();
        }
    }

    /// Set wet/dry mix, 0–1.
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(mix.clamp(0.0, 1.0));
    }

    #[inline]
    fn convolve(history: &mut Vec<f32>, impulse: &[f32], write_pos: usize, input: f32) -> f32 {
        history[write_pos] = input;
        let n = history.len();
        let mut acc = 0.0;
        for (k, &coeff) in impulse.iter().enumerate() {
            let idx = (write_pos + n - k) % n;
            acc += coeff * history[idx];
        }
        acc
    }
}

impl Effect for ConvolutionReverb {
    fn process(&mut self, input: f32) -> f32 {
        let (l, _r) = self.process_stereo(input, input);
        l
    }

    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        if self.impulse.is_empty() {
            return (left, right);
        }
        let wet_l = Self::convolve(&mut self.history_l, &self.impulse, self.write_pos, left);
        let wet_r = Self::convolve(&mut self.history_r, &self.impulse, self.write_pos, right);
        self.write_pos = (self.write_pos + 1) % self.impulse.len();

        let filtered_l = self.post_filter.process(wet_l);
        let filtered_r = self.post_filter.process(wet_r);

        let mix = self.mix.advance();
        (
            wet_dry_mix(left, filtered_l, mix),
            wet_dry_mix(right, filtered_r, mix),
        )
    }

    fn is_true_stereo(&self) -> bool {
        true
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.mix.set_sample_rate(sample_rate);
        self.post_filter.set_sample_rate(sample_rate);
        self.regenerate_impulse();
    }

    fn reset(&mut self) {
        for s in self.history_l.iter_mut() {
            *s = 0.0;
        }
        for s in self.history_r.iter_mut() {
            *s = 0.0;
        }
        self.write_pos = 0;
        self.post_filter.reset();
        self.mix.snap_to_target();
    }
}

impl ParameterInfo for ConvolutionReverb {
    fn param_count(&self) -> usize {
        5
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        let desc = match index {
            0 => Some(ParamDescriptor {
                name: "Room",
                short_name: "Room",
                min: 0.0,
                max: (RoomSize::names().len() - 1) as f32,
                default: 1.0,
                step: 1.0,
                kind: ParamKind::Enum,
                options: Some(RoomSize::names()),
                ..Default::default()
            }),
            1 => Some(ParamDescriptor {
                name: "Size",
                short_name: "Size",
                default: 0.5,
                ..Default::default()
            }),
            2 => Some(ParamDescriptor {
                name: "Decay",
                short_name: "Decay",
                default: 0.5,
                ..Default::default()
            }),
            3 => Some(ParamDescriptor {
                name: "Damping",
                short_name: "Damp",
                default: 0.5,
                ..Default::default()
            }),
            4 => Some(ParamDescriptor::mix()),
            _ => None,
        };
        desc.map(|d| d.with_stream_index(index))
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.room.index() as f32,
            1 => self.size,
            2 => self.decay,
            3 => self.damping,
            4 => self.mix.target() * 100.0,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_room(RoomSize::from_index(value.round() as usize)),
            1 => self.set_size(value),
            2 => self.set_decay(value),
            3 => self.set_damping(value),
            4 => self.set_mix(value / 100.0),
            _ => {}
        }
    }
}
