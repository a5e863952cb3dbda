//! Voice management for polyphonic synthesis.
//!
//! Provides voice structures and allocation strategies for building
//! monophonic and polyphonic synthesizers.

use crate::oscillator::{Oscillator, OscillatorWaveform};
use crate::envelope::AdsrEnvelope;
use strata_core::{StateVariableFilter, Effect};

/// Maximum number of unison layers a voice can stack onto its primary
/// oscillator (the primary oscillator itself plus up to 6 detuned copies).
pub const MAX_UNISON: u8 = 7;

/// Voice allocation modes for polyphonic synthesizers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VoiceAllocationMode {
    /// Cycle through voices in order (default)
    #[default]
    RoundRobin,
    /// Steal the oldest active note
    Oldest,
    /// Steal the voice with the lowest current output level (envelope
    /// amplitude), i.e. the one that would be least noticeable to cut
    Quietest,
    /// Steal a voice already sounding the incoming note, if one exists;
    /// otherwise falls back to stealing the oldest
    SamePitch,
}

/// A single synthesizer voice.
///
/// Contains an oscillator, filter, and envelopes for amplitude and filter.
/// This is the basic building block for polyphonic synthesizers.
///
/// # Example
///
/// ```rust
/// use strata_synth::Voice;
///
/// let mut voice = Voice::new(48000.0);
/// voice.note_on(60, 100); // Middle C, velocity 100
///
/// // Generate samples
/// for _ in 0..1000 {
///     let sample = voice.process();
/// }
///
/// voice.note_off();
/// ```
#[derive(Debug, Clone)]
pub struct Voice {
    /// Primary oscillator
    pub osc1: Oscillator,
    /// Secondary oscillator (for detuning, sync, etc.)
    pub osc2: Oscillator,
    /// Extra unison layers stacked onto `osc1`, detuned symmetrically around
    /// it. Only the first `unison_count - 1` of these are active.
    unison: [Oscillator; MAX_UNISON as usize - 1],
    /// Filter
    pub filter: StateVariableFilter,
    /// Amplitude envelope
    pub amp_env: AdsrEnvelope,
    /// Filter envelope
    pub filter_env: AdsrEnvelope,

    /// Current MIDI note number
    note: u8,
    /// Current velocity (0-127)
    velocity: u8,
    /// Voice age (for voice stealing)
    age: u64,
    /// Whether this voice is currently active
    active: bool,

    /// Sample rate
    sample_rate: f32,

    // Voice parameters
    /// Oscillator 2 detune in cents
    osc2_detune: f32,
    /// Oscillator mix (0 = osc1 only, 1 = osc2 only)
    osc_mix: f32,
    /// Filter envelope amount
    filter_env_amount: f32,
    /// Base filter cutoff frequency
    filter_cutoff: f32,

    /// Active unison layer count, 1 (no unison) to [`MAX_UNISON`]
    unison_count: u8,
    /// Total detune spread across unison layers, in cents
    unison_detune_cents: f32,

    /// Current (glided) pitch frequency in Hz
    current_freq: f32,
    /// Target pitch frequency in Hz
    target_freq: f32,
    /// Per-sample glide coefficient; 0.0 means glide is disabled (instant retune)
    glide_coeff: f32,

    /// External pitch modulation in semitones, applied on top of `current_freq`
    external_pitch_mod: f32,
    /// External filter modulation in Hz, applied on top of `filter_cutoff`
    external_filter_mod: f32,
    /// External amplitude modulation, -1 to 1, applied as a gain offset
    /// around unity (e.g. from a modulation matrix's `Amplitude` destination)
    external_amp_mod: f32,
}

impl Default for Voice {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Voice {
    /// Create a new voice at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let mut voice = Self {
            osc1: Oscillator::new(sample_rate),
            osc2: Oscillator::new(sample_rate),
            unison: core::array::from_fn(|_| Oscillator::new(sample_rate)),
            filter: StateVariableFilter::new(sample_rate),
            amp_env: AdsrEnvelope::new(sample_rate),
            filter_env: AdsrEnvelope::new(sample_rate),
            note: 0,
            velocity: 0,
            age: 0,
            active: false,
            sample_rate,
            osc2_detune: 0.0,
            osc_mix: 0.0,
            filter_env_amount: 0.0,
            filter_cutoff: 1000.0,
            unison_count: 1,
            unison_detune_cents: 15.0,
            current_freq: midi_to_freq(0),
            target_freq: midi_to_freq(0),
            glide_coeff: 0.0,
            external_pitch_mod: 0.0,
            external_filter_mod: 0.0,
            external_amp_mod: 0.0,
        };

        // Set some reasonable defaults
        voice.osc1.set_waveform(OscillatorWaveform::Saw);
        voice.osc2.set_waveform(OscillatorWaveform::Saw);
        voice.filter.set_cutoff(1000.0);
        voice.filter.set_resonance(1.0);

        voice
    }

    /// Set sample rate for all components.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.osc1.set_sample_rate(sample_rate);
        self.osc2.set_sample_rate(sample_rate);
        for osc in &mut self.unison {
            osc.set_sample_rate(sample_rate);
        }
        self.filter.set_sample_rate(sample_rate);
        self.amp_env.set_sample_rate(sample_rate);
        self.filter_env.set_sample_rate(sample_rate);
    }

    /// Set oscillator 1 waveform (also applied to its unison layers).
    pub fn set_osc1_waveform(&mut self, waveform: OscillatorWaveform) {
        self.osc1.set_waveform(waveform);
        for osc in &mut self.unison {
            osc.set_waveform(waveform);
        }
    }

    /// Set oscillator 2 waveform.
    pub fn set_osc2_waveform(&mut self, waveform: OscillatorWaveform) {
        self.osc2.set_waveform(waveform);
    }

    /// Set the number of active unison layers (1 = no unison, up to
    /// [`MAX_UNISON`]). Layers are detuned symmetrically around `osc1` by
    /// up to `unison_detune_cents() / 2` at the outermost pair.
    pub fn set_unison_count(&mut self, count: u8) {
        self.unison_count = count.clamp(1, MAX_UNISON);
        if self.active {
            self.retune_unison();
        }
    }

    /// Get the active unison layer count.
    pub fn unison_count(&self) -> u8 {
        self.unison_count
    }

    /// Set the total detune spread across unison layers, in cents.
    pub fn set_unison_detune(&mut self, cents: f32) {
        self.unison_detune_cents = cents.max(0.0);
        if self.active {
            self.retune_unison();
        }
    }

    /// Set portamento/glide time in milliseconds. `0` disables glide
    /// (note-on retunes instantly).
    pub fn set_glide_time_ms(&mut self, ms: f32) {
        if ms > 0.1 {
            let samples = (ms / 1000.0) * self.sample_rate;
            self.glide_coeff = libm::expf(-1.0 / samples);
        } else {
            self.glide_coeff = 0.0;
        }
    }

    /// Set external pitch modulation in semitones (e.g. from a modulation
    /// matrix or global LFO), applied on top of the voice's own pitch.
    pub fn set_external_pitch_mod(&mut self, semitones: f32) {
        self.external_pitch_mod = semitones;
    }

    /// Set external filter cutoff modulation in Hz, applied on top of the
    /// voice's own filter envelope modulation.
    pub fn set_external_filter_mod(&mut self, hz: f32) {
        self.external_filter_mod = hz;
    }

    /// Set external amplitude modulation, -1 to 1, applied as a gain offset
    /// around unity on top of the voice's own amplitude envelope.
    pub fn set_external_amp_mod(&mut self, amount: f32) {
        self.external_amp_mod = amount;
    }

    /// Current output level (0.0-1.0), used by quietest-voice stealing.
    /// Combines the amplitude envelope's stage level with velocity, since a
    /// held note at low velocity is quieter than one at high velocity even at
    /// the same envelope stage.
    pub fn current_level(&self) -> f32 {
        self.amp_env.level() * (self.velocity as f32 / 127.0)
    }

    /// Retune the active unison layers relative to `osc1`'s current
    /// frequency, spread symmetrically across `unison_detune_cents`.
    fn retune_unison(&mut self) {
        let extra = (self.unison_count - 1) as usize;
        let base_freq = self.osc1.frequency();
        for (i, osc) in self.unison.iter_mut().enumerate() {
            if i < extra {
                // Layers pair up symmetrically around osc1: +d, -d, +2d, -2d, ...
                let pair = (i / 2) as f32 + 1.0;
                let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                let step_cents = self.unison_detune_cents / (2.0 * (extra as f32 + 1.0).max(1.0));
                let detune = sign * pair * step_cents;
                osc.set_frequency(base_freq * cents_to_ratio(detune));
            }
        }
    }

    /// Trigger note on.
    pub fn note_on(&mut self, note: u8, velocity: u8) {
        self.note = note;
        self.velocity = velocity;
        self.active = true;

        let freq = midi_to_freq(note);
        self.current_freq = freq;
        self.target_freq = freq;
        self.osc1.set_frequency(freq);
        self.osc2.set_frequency(freq * cents_to_ratio(self.osc2_detune));
        self.retune_unison();

        self.osc1.reset();
        self.osc2.reset();
        for osc in &mut self.unison {
            osc.reset();
        }
        self.amp_env.gate_on();
        self.filter_env.gate_on();
    }

    /// Trigger note on without resetting oscillator phase or re-gating the
    /// envelopes (legato/mono-collapse retuning) -- the pitch glides from the
    /// currently-sounding frequency to the new note's frequency instead of
    /// restarting the voice.
    pub fn note_on_glide(&mut self, note: u8, velocity: u8) {
        self.note = note;
        self.velocity = velocity;
        self.target_freq = midi_to_freq(note);
        if !self.active {
            self.current_freq = self.target_freq;
            self.active = true;
            self.amp_env.gate_on();
            self.filter_env.gate_on();
        }
    }

    /// Trigger note off.
    pub fn note_off(&mut self) {
        self.amp_env.gate_off();
        self.filter_env.gate_off();
    }

    /// Force voice to stop immediately.
    pub fn kill(&mut self) {
        self.active = false;
        self.amp_env.reset();
        self.filter_env.reset();
    }

    /// Reset voice to initial state.
    pub fn reset(&mut self) {
        self.kill();
        self.note = 0;
        self.velocity = 0;
        self.age = 0;
        self.osc1.reset();
        self.osc2.reset();
        for osc in &mut self.unison {
            osc.reset();
        }
        self.filter.reset();
        self.current_freq = midi_to_freq(0);
        self.target_freq = midi_to_freq(0);
        self.external_pitch_mod = 0.0;
        self.external_filter_mod = 0.0;
        self.external_amp_mod = 0.0;
    }

    /// Check if voice is currently producing sound.
    pub fn is_active(&self) -> bool {
        self.active && self.amp_env.is_active()
    }

    /// Get the current note number.
    pub fn note(&self) -> u8 {
        self.note
    }

    /// Get the current velocity.
    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    /// Get voice age.
    pub fn age(&self) -> u64 {
        self.age
    }

    /// Set voice age.
    pub fn set_age(&mut self, age: u64) {
        self.age = age;
    }

    /// Set oscillator 2 detune in cents.
    pub fn set_osc2_detune(&mut self, cents: f32) {
        self.osc2_detune = cents;
        if self.active {
            let base_freq = midi_to_freq(self.note);
            self.osc2.set_frequency(base_freq * cents_to_ratio(cents));
        }
    }

    /// Set oscillator mix (0 = osc1 only, 1 = osc2 only).
    pub fn set_osc_mix(&mut self, mix: f32) {
        self.osc_mix = mix.clamp(0.0, 1.0);
    }

    /// Set filter envelope amount (in Hz).
    pub fn set_filter_env_amount(&mut self, amount: f32) {
        self.filter_env_amount = amount;
    }

    /// Set base filter cutoff frequency.
    pub fn set_filter_cutoff(&mut self, freq: f32) {
        self.filter_cutoff = freq;
        self.filter.set_cutoff(freq);
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self) -> f32 {
        if !self.is_active() {
            // Check if envelope just finished
            if self.active && !self.amp_env.is_active() {
                self.active = false;
            }
            return 0.0;
        }

        // Glide osc1's pitch toward target_freq, then retune osc2/unison to match
        if self.glide_coeff > 0.0 {
            self.current_freq =
                self.target_freq + (self.current_freq - self.target_freq) * self.glide_coeff;
        } else {
            self.current_freq = self.target_freq;
        }
        let pitch_mod_ratio = cents_to_ratio(self.external_pitch_mod * 100.0);
        let osc1_freq = self.current_freq * pitch_mod_ratio;
        self.osc1.set_frequency(osc1_freq);
        self.osc2
            .set_frequency(osc1_freq * cents_to_ratio(self.osc2_detune));
        if self.glide_coeff > 0.0 || self.external_pitch_mod != 0.0 {
            self.retune_unison();
        }

        // Generate oscillator output, including unison layers
        let osc1_out = self.osc1.advance();
        let osc2_out = self.osc2.advance();
        let extra = (self.unison_count - 1) as usize;
        let mut unison_out = 0.0;
        for osc in self.unison.iter_mut().take(extra) {
            unison_out += osc.advance();
        }
        let osc1_layer = if extra > 0 {
            (osc1_out + unison_out) / (extra as f32 + 1.0)
        } else {
            osc1_out
        };
        let osc_out = osc1_layer * (1.0 - self.osc_mix) + osc2_out * self.osc_mix;

        // Apply filter with envelope modulation
        let filter_env = self.filter_env.advance();
        let modulated_cutoff =
            self.filter_cutoff + filter_env * self.filter_env_amount + self.external_filter_mod;
        self.filter.set_cutoff(modulated_cutoff.clamp(20.0, 20000.0));
        let filtered = self.filter.process(osc_out);

        // Apply amplitude envelope with velocity scaling
        let amp_env = self.amp_env.advance();
        let velocity_scale = self.velocity as f32 / 127.0;
        let amp_mod_gain = (1.0 + self.external_amp_mod).max(0.0);

        filtered * amp_env * velocity_scale * amp_mod_gain
    }
}

/// Voice manager for polyphonic synthesis.
///
/// Manages a pool of voices and handles note allocation/stealing.
///
/// # Example
///
/// ```rust
/// use strata_synth::{VoiceManager, VoiceAllocationMode};
///
/// let mut manager: VoiceManager<8> = VoiceManager::new(48000.0);
/// manager.set_allocation_mode(VoiceAllocationMode::Oldest);
///
/// // Play notes
/// manager.note_on(60, 100);
/// manager.note_on(64, 100);
/// manager.note_on(67, 100);
///
/// // Process audio
/// for _ in 0..1000 {
///     let sample = manager.process();
/// }
/// ```
#[derive(Debug)]
pub struct VoiceManager<const N: usize> {
    voices: [Voice; N],
    allocation_mode: VoiceAllocationMode,
    sample_rate: f32,
    /// Global voice age counter
    age_counter: u64,
    /// Round-robin index
    round_robin_idx: usize,
    /// Sustain pedal state. While held, `note_off` defers releasing voices
    /// until the pedal lifts.
    sustain_pedal: bool,
    /// Notes held by `note_off` while the sustain pedal is down.
    sustained_notes: [Option<u8>; N],
}

impl<const N: usize> VoiceManager<N> {
    /// Create a new voice manager with the specified number of voices.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            voices: core::array::from_fn(|_| Voice::new(sample_rate)),
            allocation_mode: VoiceAllocationMode::RoundRobin,
            sample_rate,
            age_counter: 0,
            round_robin_idx: 0,
            sustain_pedal: false,
            sustained_notes: [None; N],
        }
    }

    /// Set sample rate for all voices.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
        }
    }

    /// Set voice allocation mode.
    pub fn set_allocation_mode(&mut self, mode: VoiceAllocationMode) {
        self.allocation_mode = mode;
    }

    /// Get current allocation mode.
    pub fn allocation_mode(&self) -> VoiceAllocationMode {
        self.allocation_mode
    }

    /// Get number of voices.
    pub fn voice_count(&self) -> usize {
        N
    }

    /// Get number of active voices.
    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Get mutable access to all voices (for setting parameters).
    pub fn voices_mut(&mut self) -> &mut [Voice; N] {
        &mut self.voices
    }

    /// Get read access to all voices.
    pub fn voices(&self) -> &[Voice; N] {
        &self.voices
    }

    /// Trigger a note on.
    pub fn note_on(&mut self, note: u8, velocity: u8) {
        let voice_idx = self.allocate_voice(note);
        self.age_counter += 1;
        self.voices[voice_idx].set_age(self.age_counter);
        self.voices[voice_idx].note_on(note, velocity);
    }

    /// Trigger a note off. While the sustain pedal is held, the note is
    /// remembered instead of released, and released when the pedal lifts.
    pub fn note_off(&mut self, note: u8) {
        if self.sustain_pedal {
            for slot in &mut self.sustained_notes {
                if slot.is_none() {
                    *slot = Some(note);
                    return;
                }
            }
            return;
        }
        for voice in &mut self.voices {
            if voice.is_active() && voice.note() == note {
                voice.note_off();
                return;
            }
        }
    }

    /// Set the sustain pedal state. Lifting the pedal releases every note
    /// that received a `note_off` while it was held.
    pub fn set_sustain_pedal(&mut self, down: bool) {
        self.sustain_pedal = down;
        if !down {
            for slot in &mut self.sustained_notes {
                if let Some(note) = slot.take() {
                    for voice in &mut self.voices {
                        if voice.is_active() && voice.note() == note {
                            voice.note_off();
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Whether the sustain pedal is currently held.
    pub fn sustain_pedal(&self) -> bool {
        self.sustain_pedal
    }

    /// Stop all notes immediately.
    pub fn all_notes_off(&mut self) {
        for voice in &mut self.voices {
            voice.kill();
        }
        self.sustained_notes = [None; N];
    }

    /// Reset all voices.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.reset();
        }
        self.age_counter = 0;
        self.round_robin_idx = 0;
        self.sustain_pedal = false;
        self.sustained_notes = [None; N];
    }

    /// Process one sample from all voices.
    #[inline]
    pub fn process(&mut self) -> f32 {
        let mut output = 0.0;
        for voice in &mut self.voices {
            output += voice.process();
        }
        output
    }

    /// Process stereo output from all voices.
    #[inline]
    pub fn process_stereo(&mut self) -> (f32, f32) {
        let mono = self.process();
        (mono, mono)
    }

    fn allocate_voice(&mut self, note: u8) -> usize {
        // First, try to find a free voice
        for (i, voice) in self.voices.iter().enumerate() {
            if !voice.is_active() {
                return i;
            }
        }

        // All voices are active, need to steal one
        match self.allocation_mode {
            VoiceAllocationMode::RoundRobin => {
                let idx = self.round_robin_idx;
                self.round_robin_idx = (self.round_robin_idx + 1) % N;
                idx
            }
            VoiceAllocationMode::Oldest => self.oldest_voice_idx(),
            VoiceAllocationMode::Quietest => self
                .voices
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    a.current_level()
                        .partial_cmp(&b.current_level())
                        .unwrap_or(core::cmp::Ordering::Equal)
                })
                .map(|(i, _)| i)
                .unwrap_or(0),
            VoiceAllocationMode::SamePitch => self
                .voices
                .iter()
                .enumerate()
                .find(|(_, v)| v.note() == note)
                .map(|(i, _)| i)
                .unwrap_or_else(|| self.oldest_voice_idx()),
        }
    }

    fn oldest_voice_idx(&self) -> usize {
        self.voices
            .iter()
            .enumerate()
            .min_by_key(|(_, v)| v.age())
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

/// Convert MIDI note number to frequency in Hz.
///
/// Uses standard tuning: A4 (note 69) = 440 Hz.
#[inline]
pub fn midi_to_freq(note: u8) -> f32 {
    440.0 * libm::powf(2.0, (note as f32 - 69.0) / 12.0)
}

/// Convert frequency in Hz to MIDI note number.
#[inline]
pub fn freq_to_midi(freq: f32) -> f32 {
    69.0 + 12.0 * libm::log2f(freq / 440.0)
}

/// Convert cents to frequency ratio.
///
/// 100 cents = 1 semitone.
#[inline]
pub fn cents_to_ratio(cents: f32) -> f32 {
    libm::powf(2.0, cents / 1200.0)
}
