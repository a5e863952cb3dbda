//! Strata Effects - Audio effect implementations
//!
//! This crate provides the production DSP effects backing the audio graph's
//! mixer inserts:
//!
//! - [`Distortion`] - Waveshaping distortion with multiple algorithms
//! - [`Compressor`] - Dynamics compressor with soft knee
//! - [`Chorus`] - Classic dual-voice chorus
//! - [`ModernDelay`] - Stereo delay with ping-pong cross-feed and diffusion
//! - [`LowPassFilter`] - Biquad-based lowpass filter
//! - [`FreeverbReverb`] - Freeverb-style algorithmic reverb
//! - [`ConvolutionReverb`] - Procedurally generated impulse response reverb
//! - [`Waveshaper`] - Lookup-table waveshaping distortion with oversampling
//! - [`Maximizer`] - Brick-wall loudness maximizer
//! - [`Imager`] - Mid/side stereo width control
//! - [`MultibandEq`] - Configurable-band equalizer
//!
//! ## Example
//!
//! ```rust,ignore
//! use strata_core::{Effect, EffectExt};
//! use strata_effects::{Distortion, Chorus, ModernDelay};
//!
//! let mut dist = Distortion::new(48000.0);
//! dist.set_drive_db(20.0);
//!
//! let chorus = Chorus::new(48000.0);
//! let delay = ModernDelay::new(48000.0);
//!
//! // Chain effects together
//! let mut chain = dist.chain(chorus).chain(delay);
//! let output = chain.process(input);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod chorus;
pub mod compressor;
pub mod convolution_reverb;
pub mod distortion;
pub mod filter;
pub mod freeverb;
pub mod imager;
pub mod maximizer;
pub mod modern_delay;
pub mod multiband_eq;
pub mod waveshaper;

// Re-export main types at crate root
pub use chorus::Chorus;
pub use compressor::Compressor;
pub use convolution_reverb::{ConvolutionReverb, RoomSize};
pub use distortion::{Distortion, WaveShape};
pub use filter::LowPassFilter;
pub use freeverb::FreeverbReverb;
pub use imager::Imager;
pub use maximizer::Maximizer;
pub use modern_delay::ModernDelay;
pub use multiband_eq::{BandConfig, BandKind, MAX_BANDS, MultibandEq};
pub use waveshaper::{Waveshaper, WaveshaperCurve};
