//! Stereo cross-feeding delay with independent L/R times, per-path diffusion,
//! damping, and saturation.

use strata_core::{
    AllpassFilter, Effect, InterpolatedDelay, OnePole, ParamDescriptor, ParameterInfo,
    SmoothedParam, fast_tanh, flush_denormal, wet_dry_mix_stereo,
};

const MAX_DELAY_S: f32 = 4.0;

/// One channel's feedback path: delay read/write, optional diffuser, damping
/// lowpass, and saturation -- shared by both the left and right lines.
#[derive(Debug, Clone)]
struct DelayLine {
    delay: InterpolatedDelay,
    diffuser: AllpassFilter,
    damping: OnePole,
    time: SmoothedParam,
    feedback: SmoothedParam,
}

impl DelayLine {
    fn new(sample_rate: f32, default_time_ms: f32, diffuser_samples: usize) -> Self {
        let max_samples = (MAX_DELAY_S * sample_rate).ceil() as usize;
        let default_samples = ((default_time_ms / 1000.0) * sample_rate).min(max_samples as f32 - 1.0);
        Self {
            delay: InterpolatedDelay::new(max_samples),
            diffuser: AllpassFilter::new(diffuser_samples),
            damping: OnePole::new(sample_rate, 8000.0),
            time: SmoothedParam::interpolated(default_samples, sample_rate),
            feedback: SmoothedParam::standard(0.4, sample_rate),
        }
    }

    fn reset(&mut self) {
        self.delay.clear();
        self.diffuser.clear();
        self.damping.reset();
        self.time.snap_to_target();
        self.feedback.snap_to_target();
    }
}

/// Stereo delay with ping-pong cross-feedback (spec component C4 / "Delay
/// with ping-pong").
///
/// Two independently-timed delay lines feed back into themselves and, via a
/// cross-feedback tap, into each other. Each line's own readback is diffused
/// (optional allpass), damped (one-pole LPF at `filter_freq`), and
/// saturated (tanh) before being scaled by the straight tap (`fb · (1 −
/// cross)`) and written back into its own line. The cross tap (`fb · cross ·
/// 0.8`) is drawn from the dry input instead, so it only spends the
/// opposite line's own delay time -- not both lines' times -- before
/// becoming audible.
#[derive(Debug, Clone)]
pub struct ModernDelay {
    left: DelayLine,
    right: DelayLine,
    cross: SmoothedParam,
    mix: SmoothedParam,
    filter_freq: f32,
    diffusion_enabled: bool,
    saturation_enabled: bool,
    sample_rate: f32,
}

impl ModernDelay {
    /// Create a new delay at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            left: DelayLine::new(sample_rate, 375.0, 441),
            right: DelayLine::new(sample_rate, 500.0, 367),
            cross: SmoothedParam::standard(0.5, sample_rate),
            mix: SmoothedParam::standard(0.35, sample_rate),
            filter_freq: 8000.0,
            diffusion_enabled: true,
            saturation_enabled: true,
            sample_rate,
        }
    }

    /// Set the left-channel delay time in milliseconds.
    pub fn set_time_l_ms(&mut self, ms: f32) {
        let max_samples = MAX_DELAY_S * self.sample_rate;
        self.left
            .time
            .set_target(((ms / 1000.0) * self.sample_rate).clamp(1.0, max_samples - 1.0));
    }

    /// Set the right-channel delay time in milliseconds.
    pub fn set_time_r_ms(&mut self, ms: f32) {
        let max_samples = MAX_DELAY_S * self.sample_rate;
        self.right
            .time
            .set_target(((ms / 1000.0) * self.sample_rate).clamp(1.0, max_samples - 1.0));
    }

    /// Set left-channel own-line feedback, 0–0.95.
    pub fn set_feedback_l(&mut self, feedback: f32) {
        self.left.feedback.set_target(feedback.clamp(0.0, 0.95));
    }

    /// Set right-channel own-line feedback, 0–0.95.
    pub fn set_feedback_r(&mut self, feedback: f32) {
        self.right.feedback.set_target(feedback.clamp(0.0, 0.95));
    }

    /// Set cross-feed amount, 0 (independent stereo) – 1 (full ping-pong).
    pub fn set_cross(&mut self, cross: f32) {
        self.cross.set_target(cross.clamp(0.0, 1.0));
    }

    /// Set wet/dry mix, 0–1.
    pub fn set_mix(&mut self, mix: f32) {
        self.mix.set_target(mix.clamp(0.0, 1.0));
    }

    /// Set the damping filter cutoff, in Hz.
    pub fn set_filter_freq(&mut self, freq: f32) {
        self.filter_freq = freq.clamp(200.0, 18000.0);
        self.left.damping.set_frequency(self.filter_freq);
        self.right.damping.set_frequency(self.filter_freq);
    }

    /// Enable or disable the allpass diffuser in the feedback path.
    pub fn set_diffusion_enabled(&mut self, enabled: bool) {
        self.diffusion_enabled = enabled;
    }

    /// Enable or disable tanh saturation in the feedback path.
    pub fn set_saturation_enabled(&mut self, enabled: bool) {
        self.saturation_enabled = enabled;
    }

    fn feedback_path(line: &mut DelayLine, input: f32, diffuse: bool, saturate: bool) -> f32 {
        let mut signal = input;
        if diffuse {
            signal = line.diffuser.process(signal);
        }
        signal = line.damping.process(signal);
        if saturate {
            signal = fast_tanh(signal);
        }
        signal
    }
}

impl Effect for ModernDelay {
    fn process(&mut self, input: f32) -> f32 {
        let (l, r) = self.process_stereo(input, input);
        (l + r) * 0.5
    }

    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let time_l = self.left.time.advance();
        let time_r = self.right.time.advance();
        let fb_l = self.left.feedback.advance();
        let fb_r = self.right.feedback.advance();
        let cross = self.cross.advance();
        let mix = self.mix.advance();

        let delayed_l = self.left.delay.read(time_l);
        let delayed_r = self.right.delay.read(time_r);

        let processed_l = Self::feedback_path(
            &mut self.left,
            delayed_l,
            self.diffusion_enabled,
            self.saturation_enabled,
        );
        let processed_r = Self::feedback_path(
            &mut self.right,
            delayed_r,
            self.diffusion_enabled,
            self.saturation_enabled,
        );

        let straight_l = processed_l * fb_l * (1.0 - cross);
        let straight_r = processed_r * fb_r * (1.0 - cross);
        // Cross tap draws from this sample's dry input, not the other line's
        // processed readback -- that readback already spent one delay hop
        // (the other channel's own time) getting here, and tapping it would
        // cost the cross-fed signal two hops total before it's audible
        // instead of the one hop (this channel's own time) a ping-pong cross
        // feed implies.
        let cross_to_r = left * fb_l * cross * 0.8;
        let cross_to_l = right * fb_r * cross * 0.8;

        self.left
            .delay
            .write(flush_denormal(left + straight_l + cross_to_l));
        self.right
            .delay
            .write(flush_denormal(right + straight_r + cross_to_r));

        wet_dry_mix_stereo(left, right, delayed_l, delayed_r, mix)
    }

    fn is_true_stereo(&self) -> bool {
        true
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = Self::new(sample_rate);
    }

    fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.cross.snap_to_target();
        self.mix.snap_to_target();
    }
}

impl ParameterInfo for ModernDelay {
    fn param_count(&self) -> usize {
        7
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        let desc = match index {
            0 => Some(ParamDescriptor::time_ms("Time L", "TimeL", 1.0, 4000.0, 375.0)),
            1 => Some(ParamDescriptor::time_ms("Time R", "TimeR", 1.0, 4000.0, 500.0)),
            2 => Some(ParamDescriptor {
                name: "Feedback L",
                short_name: "FbL",
                min: 0.0,
                max: 95.0,
                default: 40.0,
                ..Default::default()
            }),
            3 => Some(ParamDescriptor {
                name: "Feedback R",
                short_name: "FbR",
                min: 0.0,
                max: 95.0,
                default: 40.0,
                ..Default::default()
            }),
            4 => Some(ParamDescriptor {
                name: "Cross",
                short_name: "Cross",
                min: 0.0,
                max: 100.0,
                default: 50.0,
                ..Default::default()
            }),
            5 => Some(ParamDescriptor::mix()),
            6 => Some(ParamDescriptor {
                name: "Filter Freq",
                short_name: "Filt",
                min: 200.0,
                max: 18000.0,
                default: 8000.0,
                ..Default::default()
            }),
            _ => None,
        };
        desc.map(|d| d.with_stream_index(index))
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.left.time.target() / self.sample_rate * 1000.0,
            1 => self.right.time.target() / self.sample_rate * 1000.0,
            2 => self.left.feedback.target() * 100.0,
            3 => self.right.feedback.target() * 100.0,
            4 => self.cross.target() * 100.0,
            5 => self.mix.target() * 100.0,
            6 => self.filter_freq,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_time_l_ms(value),
            1 => self.set_time_r_ms(value),
            2 => self.set_feedback_l(value / 100.0),
            3 => self.set_feedback_r(value / 100.0),
            4 => self.set_cross(value / 100.0),
            5 => self.set_mix(value / 100.0),
            6 => self.set_filter_freq(value),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_pong_crosses_to_opposite_channel() {
        let mut delay = ModernDelay::new(44100.0);
        delay.set_time_l_ms(50.0);
        delay.set_time_r_ms(50.0);
        delay.set_feedback_l(0.7);
        delay.set_feedback_r(0.7);
        delay.set_cross(1.0);
        delay.set_mix(1.0);
        delay.reset();

        delay.process_stereo(1.0, 0.0);
        let mut found_right_echo = false;
        for _ in 0..10_000 {
            let (_l, r) = delay.process_stereo(0.0, 0.0);
            if r.abs() > 0.1 {
                found_right_echo = true;
                break;
            }
        }
        assert!(found_right_echo, "cross feed should bleed left input into right channel");
    }

    #[test]
    fn cross_feed_arrives_after_one_delay_hop_not_two() {
        let mut delay = ModernDelay::new(44100.0);
        delay.set_time_l_ms(375.0);
        delay.set_time_r_ms(500.0);
        delay.set_feedback_l(0.5);
        delay.set_feedback_r(0.5);
        delay.set_cross(1.0);
        delay.set_mix(1.0);
        delay.set_diffusion_enabled(false);
        delay.set_saturation_enabled(false);
        delay.reset();

        delay.process_stereo(1.0, 0.0);

        // A single hop through the right line's own delay time (500 ms)
        // should carry the cross-fed sample across, at gain fb_l*cross*0.8
        // = 0.4. A one-channel-then-other two-hop cross feed would need
        // time_l + time_r = 875 ms instead, arriving here far too late.
        let one_hop_window = (0.55 * 44100.0) as usize;
        let mut peak = 0.0_f32;
        for _ in 0..one_hop_window {
            let (_l, r) = delay.process_stereo(0.0, 0.0);
            if r.abs() > peak.abs() {
                peak = r;
            }
        }
        assert!(
            (peak - 0.4).abs() < 0.05,
            "expected right channel cross feed of ~0.4 within one delay hop (~{} samples), got peak {}",
            one_hop_window,
            peak
        );
    }

    #[test]
    fn zero_mix_is_dry_passthrough() {
        let mut delay = ModernDelay::new(44100.0);
        delay.set_mix(0.0);
        delay.reset();
        let (l, r) = delay.process_stereo(0.4, -0.2);
        assert!((l - 0.4).abs() < 1e-5);
        assert!((r - (-0.2)).abs() < 1e-5);
    }

    #[test]
    fn stays_finite_at_high_feedback() {
        let mut delay = ModernDelay::new(44100.0);
        delay.set_feedback_l(0.95);
        delay.set_feedback_r(0.95);
        delay.set_cross(0.8);
        delay.reset();
        for _ in 0..5000 {
            let (l, r) = delay.process_stereo(0.5, -0.5);
            assert!(l.is_finite() && r.is_finite());
        }
    }
}
