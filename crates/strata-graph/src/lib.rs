//! Mixer graph, instrument dispatch, and host embedding surface for strata.
//!
//! This crate is where the other three timing/DSP crates meet: it owns the
//! per-block [`AudioGraph`] (mixer inserts + master bus, spec components
//! C7/C8), a set of [`strata_synth`] voice-allocating instruments (C6), and
//! drives `strata_transport`'s [`Transport`]/[`Scheduler`]/[`Bridge`]
//! (C9/C10/C11) to turn patterns into sample-accurate note dispatch. The
//! control flow mirrors the spec's own diagram: `Bridge → Transport →
//! Scheduler → Instrument → MixerInsert → AudioGraph`.
//!
//! [`Engine`] is the one type a host embeds; everything else in this crate
//! is a building block it composes.

mod engine;
mod error;
mod graph;
mod insert;

pub use engine::Engine;
pub use error::EngineError;
pub use graph::AudioGraph;
pub use insert::{MixerInsert, Send, MAX_CHAIN_DEPTH};

/// A voice-allocating instrument (spec component C6): a 16-voice
/// polyphonic synth with the stealing/unison/envelope machinery
/// `strata_synth` provides. 16 matches the spec's default voice count
/// (§4.6); hosts that need a different ceiling should size their own
/// instrument type and bypass [`Engine::create_instrument`].
pub type Instrument = strata_synth::PolyphonicSynth<16>;
