//! Mid/side stereo imager: widen or narrow the side signal without ever
//! phase-inverting the mid signal.

use strata_core::{Effect, ParamDescriptor, ParameterInfo, SmoothedParam};

/// Mid/side stereo imager (spec component C4 / "Imager").
///
/// Encodes `M = (L+R)/2`, `S = (L−R)/2`, scales `S` (and, above unity
/// width, compensates `M`) by the width law, then decodes back to `L`/`R`.
/// For `width ≤ 1`, `S' = S · width`. For `width ∈ (1, 2]`,
/// `M' = M · (1 − 0.3·(width−1))` and `S' = S · width`. `M` is never
/// phase-inverted: its gain only ever shrinks toward (never past) zero.
#[derive(Debug, Clone)]
pub struct Imager {
    width: SmoothedParam,
    sample_rate: f32,
}

impl Imager {
    /// Create a new imager at `sample_rate`. Default width is 1.0 (no change).
    pub fn new(sample_rate: f32) -> Self {
        Self {
            width: SmoothedParam::standard(1.0, sample_rate),
            sample_rate,
        }
    }

    /// Set stereo width, 0 (mono) – 2 (maximally wide).
    pub fn set_width(&mut self, width: f32) {
        self.width.set_target(width.clamp(0.0, 2.0));
    }
}

impl Effect for Imager {
    fn process(&mut self, input: f32) -> f32 {
        input
    }

    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let width = self.width.advance();
        let mid = (left + right) * 0.5;
        let side = (left - right) * 0.5;

        let (mid_scaled, side_scaled) = if width <= 1.0 {
            (mid, side * width)
        } else {
            (mid * (1.0 - 0.3 * (width - 1.0)), side * width)
        };

        (mid_scaled + side_scaled, mid_scaled - side_scaled)
    }

    fn is_true_stereo(&self) -> bool {
        true
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.width.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.width.snap_to_target();
    }
}

impl ParameterInfo for Imager {
    fn param_count(&self) -> usize {
        1
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        let desc = match index {
            0 => Some(ParamDescriptor {
                name: "Width",
                short_name: "Width",
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
            0 => self.width.target(),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if index == 0 {
            self.set_width(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unity_width_is_identity() {
        let mut imager = Imager::new(44100.0);
        imager.reset();
        let (l, r) = imager.process_stereo(0.6, -0.2);
        assert!((l - 0.6).abs() < 1e-5);
        assert!((r - (-0.2)).abs() < 1e-5);
    }

    #[test]
    fn zero_width_collapses_to_mono() {
        let mut imager = Imager::new(44100.0);
        imager.set_width(0.0);
        imager.reset();
        let (l, r) = imager.process_stereo(0.8, -0.4);
        let mid = (0.8 + -0.4_f32) * 0.5;
        assert!((l - mid).abs() < 1e-5);
        assert!((r - mid).abs() < 1e-5);
    }

    #[test]
    fn mid_never_phase_inverts_above_unity_width() {
        let mut imager = Imager::new(44100.0);
        imager.set_width(2.0);
        imager.reset();
        for _ in 0..10 {
            imager.process_stereo(0.5, -0.5);
        }
        let (l, r) = imager.process_stereo(0.5, -0.5);
        // M stays >= 0 for a positive-mid input even at max width.
        let mid_scaled = (l + r) * 0.5;
        assert!(mid_scaled >= 0.0, "mid should not phase-invert, got {mid_scaled}");
    }
}
