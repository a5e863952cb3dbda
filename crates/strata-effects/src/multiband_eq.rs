//! Multiband equalizer with an out-of-band-declared, atomically-swapped band
//! list rather than a fixed set of scalar parameters.

use strata_core::{
    Biquad, Effect, ParameterInfo, ParamDescriptor,
    high_shelf_coefficients, highpass_coefficients, low_shelf_coefficients, lowpass_coefficients,
    notch_coefficients, peaking_eq_coefficients,
};

/// Maximum number of simultaneously active bands.
pub const MAX_BANDS: usize = 16;

/// The filter type a band applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandKind {
    /// Shelf boost/cut below `frequency`.
    LowShelf,
    /// Bell boost/cut centered on `frequency`.
    Peaking,
    /// Shelf boost/cut above `frequency`.
    HighShelf,
    /// 2-pole lowpass (`gain_db` ignored).
    LowPass,
    /// 2-pole highpass (`gain_db` ignored).
    HighPass,
    /// Narrow reject band (`gain_db` ignored).
    Notch,
}

/// A single equalizer band. Bands are declared out-of-band from the
/// effect's scalar parameter list: a band-vector update is a snapshot
/// replacement, recomputed into biquad coefficients and swapped in
/// atomically at the next block boundary rather than smoothed sample by
/// sample like a normal parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandConfig {
    /// Filter type for this band.
    pub kind: BandKind,
    /// Center/corner frequency, Hz.
    pub frequency: f32,
    /// Gain, dB (ignored by `LowPass`/`HighPass`/`Notch`).
    pub gain_db: f32,
    /// Q factor.
    pub q: f32,
    /// Whether the band is processed at all.
    pub active: bool,
}

impl BandConfig {
    /// Construct a band with the given parameters, active by default.
    pub fn new(kind: BandKind, frequency: f32, gain_db: f32, q: f32) -> Self {
        Self {
            kind,
            frequency,
            gain_db,
            q,
            active: true,
        }
    }

    fn coefficients(self, sample_rate: f32) -> (f32, f32, f32, f32, f32, f32) {
        let freq = self.frequency.clamp(10.0, sample_rate * 0.49);
        let q = self.q.max(0.05);
        match self.kind {
            BandKind::LowShelf => low_shelf_coefficients(freq, q, self.gain_db, sample_rate),
            BandKind::Peaking => peaking_eq_coefficients(freq, q, self.gain_db, sample_rate),
            BandKind::HighShelf => high_shelf_coefficients(freq, q, self.gain_db, sample_rate),
            BandKind::LowPass => lowpass_coefficients(freq, q, sample_rate),
            BandKind::HighPass => highpass_coefficients(freq, q, sample_rate),
            BandKind::Notch => notch_coefficients(freq, q, sample_rate),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    config: BandConfig,
    filter: Biquad,
}

/// Multiband equalizer (spec component C4 / "Multiband EQ").
///
/// Holds up to [`MAX_BANDS`] independently-configured biquad bands. The
/// band vector is replaced wholesale via [`set_bands`](Self::set_bands);
/// there is no per-band scalar automation, matching the "bands declared
/// out-of-band" contract -- a band update recomputes every active band's
/// coefficients and becomes visible atomically on the next call to
/// `process`/`process_block`, never mid-block.
#[derive(Debug, Clone)]
pub struct MultibandEq {
    slots: [Option<Slot>; MAX_BANDS],
    sample_rate: f32,
}

impl MultibandEq {
    /// Create a new equalizer at `sample_rate` with no active bands
    /// (identity wire).
    pub fn new(sample_rate: f32) -> Self {
        Self {
            slots: [None; MAX_BANDS],
            sample_rate,
        }
    }

    /// Replace the entire band vector. Bands beyond [`MAX_BANDS`] are
    /// dropped. Inactive bands keep their slot but are skipped during
    /// processing.
    pub fn set_bands(&mut self, bands: &[BandConfig]) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        for (i, band) in bands.iter().take(MAX_BANDS).enumerate() {
            let mut filter = Biquad::new();
            let (b0, b1, b2, a0, a1, a2) = band.coefficients(self.sample_rate);
            filter.set_coefficients(b0, b1, b2, a0, a1, a2);
            self.slots[i] = Some(Slot {
                config: *band,
                filter,
            });
        }
    }

    /// Current band configuration snapshot.
    pub fn bands(&self) -> impl Iterator<Item = &BandConfig> {
        self.slots.iter().filter_map(|s| s.as_ref().map(|s| &s.config))
    }

    /// Number of configured bands (active or not).
    pub fn band_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

impl Effect for MultibandEq {
    fn process(&mut self, input: f32) -> f32 {
        let mut signal = input;
        for slot in self.slots.iter_mut().flatten() {
            if slot.config.active {
                signal = slot.filter.process(signal);
            }
        }
        signal
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        let mut bands = [BandConfig::new(BandKind::Peaking, 1000.0, 0.0, 1.0); MAX_BANDS];
        let mut count = 0;
        for slot in self.slots.iter().flatten() {
            bands[count] = slot.config;
            count += 1;
        }
        self.set_bands(&bands[..count]);
    }

    fn reset(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            slot.filter.clear();
        }
    }
}

impl ParameterInfo for MultibandEq {
    fn param_count(&self) -> usize {
        0
    }

    fn param_info(&self, _index: usize) -> Option<ParamDescriptor> {
        None
    }

    fn get_param(&self, _index: usize) -> f32 {
        0.0
    }

    fn set_param(&mut self, _index: usize, _value: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_bands_is_identity() {
        let mut eq = MultibandEq::new(44100.0);
        eq.reset();
        assert_eq!(eq.process(0.5), 0.5);
    }

    #[test]
    fn inactive_band_is_skipped() {
        let mut eq = MultibandEq::new(44100.0);
        let mut band = BandConfig::new(BandKind::Peaking, 1000.0, 12.0, 1.0);
        band.active = false;
        eq.set_bands(&[band]);
        eq.reset();
        assert_eq!(eq.process(0.5), 0.5);
    }

    #[test]
    fn lowpass_attenuates_high_frequency_energy() {
        let sample_rate = 48000.0;
        let mut eq = MultibandEq::new(sample_rate);
        eq.set_bands(&[BandConfig::new(BandKind::LowPass, 500.0, 0.0, 0.707)]);
        eq.reset();

        let mut energy = 0.0;
        for i in 0..2000 {
            let x = if i % 2 == 0 { 1.0 } else { -1.0 }; // Nyquist/2-ish square
            energy += eq.process(x).abs();
        }
        assert!(energy < 2000.0 * 0.5, "lowpass should attenuate high-frequency content");
    }

    #[test]
    fn band_vector_swap_replaces_all_bands() {
        let mut eq = MultibandEq::new(44100.0);
        eq.set_bands(&[
            BandConfig::new(BandKind::LowShelf, 100.0, 6.0, 0.707),
            BandConfig::new(BandKind::HighShelf, 8000.0, -6.0, 0.707),
        ]);
        assert_eq!(eq.band_count(), 2);

        eq.set_bands(&[BandConfig::new(BandKind::Notch, 60.0, 0.0, 10.0)]);
        assert_eq!(eq.band_count(), 1);
    }
}
