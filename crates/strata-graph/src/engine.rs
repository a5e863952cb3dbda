//! [`Engine`]: the host embedding surface tying the timing layer
//! (`strata_transport`) to the DSP layer (this crate's [`crate::AudioGraph`]
//! and `strata_synth` instruments).
//!
//! This is the concrete realization of the spec's control/data flow:
//! `Bridge → Transport → Scheduler → Instrument → MixerInsert →
//! AudioGraph`. A host (CLI, worklet, WASM shim) owns one `Engine`, calls
//! its command methods from whatever it considers its "control thread",
//! and calls [`Engine::process_block`] once per audio callback.

use std::collections::HashMap;

use strata_synth::VoiceAllocationMode;
use strata_transport::{
    Bridge, LoopRange, Pattern, PlaybackState, Scheduler, Transport, TransportCommand,
};

use crate::error::EngineError;
use crate::graph::AudioGraph;
use crate::Instrument;

/// Phase of the smooth-jump (pause → settle → play) protocol (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq)]
enum SmoothSeek {
    /// Waiting for the pause command, enqueued this block, to take effect.
    Pausing { target_step: f64 },
    /// Paused; waiting out the settle window before resuming.
    Settling { target_step: f64, blocks_remaining: u32 },
}

/// One instrument's routing: which insert its rendered audio feeds.
struct InstrumentSlot {
    synth: Instrument,
    insert_id: u32,
}

/// The engine: owns the mixer graph, the instrument set, and the transport
/// timing stack, and renders one block at a time.
pub struct Engine {
    graph: AudioGraph,
    instruments: HashMap<u32, InstrumentSlot>,
    next_instrument_id: u32,

    transport: Transport,
    scheduler: Scheduler,
    bridge: Bridge,

    sample_rate: f32,
    block_size: usize,
    /// Total frames advanced since construction; audio-clock-seconds basis.
    frames_elapsed: u64,

    smooth_seek: Option<SmoothSeek>,

    /// Pre-sized per-instrument scratch (mono instrument render, mixed to
    /// both channels identically) so `process_block` never allocates.
    inst_scratch: HashMap<u32, (Vec<f32>, Vec<f32>)>,
    /// Pre-sized per-insert dry input accumulation, summing every
    /// instrument routed to a given insert.
    insert_inputs: HashMap<u32, (Vec<f32>, Vec<f32>)>,
    master_left: Vec<f32>,
    master_right: Vec<f32>,
}

impl Engine {
    /// Create an engine at the given sample rate and block size. `play()`
    /// will fail until [`Engine::set_device_open`] marks the device ready
    /// (construction assumes the device starts open, matching a host that
    /// only constructs the engine once its audio stream is live).
    pub fn new(sample_rate: f32, block_size: usize) -> Self {
        Self {
            graph: AudioGraph::new(sample_rate, block_size),
            instruments: HashMap::new(),
            next_instrument_id: 0,
            transport: Transport::new(sample_rate as f64, 120.0),
            scheduler: Scheduler::new(),
            bridge: Bridge::new(),
            sample_rate,
            block_size,
            frames_elapsed: 0,
            smooth_seek: None,
            inst_scratch: HashMap::new(),
            insert_inputs: HashMap::new(),
            master_left: vec![0.0; block_size],
            master_right: vec![0.0; block_size],
        }
    }

    /// Mark the audio device open/closed; `play()` fails while closed.
    pub fn set_device_open(&mut self, open: bool) {
        self.transport.set_device_open(open);
    }

    /// Subscribe a UI surface to transport events.
    pub fn subscribe(&mut self) -> strata_transport::EventReceiver {
        self.bridge.subscribe()
    }

    // -- Mixer / instrument topology (control thread only) -----------------

    /// Create a new mixer insert and return its id.
    pub fn add_insert(&mut self, name: impl Into<String>) -> u32 {
        self.graph.add_insert(name)
    }

    /// Remove a mixer insert. Fails if any instrument still routes to it.
    pub fn remove_insert(&mut self, id: u32) -> Result<(), EngineError> {
        if self.instruments.values().any(|slot| slot.insert_id == id) {
            return Err(EngineError::UnknownInsert(id));
        }
        self.graph.remove_insert(id)?;
        self.insert_inputs.remove(&id);
        Ok(())
    }

    /// Create a new 16-voice polyphonic instrument routed to `insert_id`.
    pub fn create_instrument(&mut self, insert_id: u32) -> Result<u32, EngineError> {
        if self.graph.insert(insert_id).is_none() {
            return Err(EngineError::UnknownInsert(insert_id));
        }
        let id = self.next_instrument_id;
        self.next_instrument_id += 1;
        let synth = Instrument::new(self.sample_rate);
        self.instruments.insert(id, InstrumentSlot { synth, insert_id });
        self.inst_scratch
            .insert(id, (vec![0.0; self.block_size], vec![0.0; self.block_size]));
        self.insert_inputs
            .entry(insert_id)
            .or_insert_with(|| (vec![0.0; self.block_size], vec![0.0; self.block_size]));
        Ok(id)
    }

    /// Destroy an instrument, silencing and releasing it immediately.
    pub fn destroy_instrument(&mut self, id: u32) -> Result<(), EngineError> {
        self.instruments
            .remove(&id)
            .map(|_| {
                self.inst_scratch.remove(&id);
            })
            .ok_or(EngineError::UnknownInstrument(id))
    }

    /// Borrow an instrument's synth directly for detailed sound-design
    /// parameters not covered by [`Engine::update_params`].
    pub fn instrument_mut(&mut self, id: u32) -> Option<&mut Instrument> {
        self.instruments.get_mut(&id).map(|slot| &mut slot.synth)
    }

    /// Apply a patch of named scalar parameters to an instrument. Unknown
    /// names are ignored (logged), matching the engine's recoverable-error
    /// policy for `UnknownParameter`.
    pub fn update_params(&mut self, id: u32, patch: &HashMap<String, f32>) -> Result<(), EngineError> {
        let slot = self
            .instruments
            .get_mut(&id)
            .ok_or(EngineError::UnknownInstrument(id))?;
        let synth = &mut slot.synth;
        for (name, value) in patch {
            match name.as_str() {
                "osc2_detune" => synth.set_osc2_detune(*value),
                "osc_mix" => synth.set_osc_mix(*value),
                "filter_cutoff" => synth.set_filter_cutoff(*value),
                "filter_resonance" => synth.set_filter_resonance(*value),
                "filter_env_amount" => synth.set_filter_env_amount(*value),
                "amp_attack" => synth.set_amp_attack(*value),
                "amp_decay" => synth.set_amp_decay(*value),
                "amp_sustain" => synth.set_amp_sustain(*value),
                "amp_release" => synth.set_amp_release(*value),
                "lfo1_rate" => synth.set_lfo1_rate(*value),
                other => tracing::warn!(instrument = id, param = other, "unknown parameter, ignored"),
            }
        }
        Ok(())
    }

    /// Set an instrument's voice-stealing strategy.
    pub fn set_voice_allocation_mode(&mut self, id: u32, mode: VoiceAllocationMode) -> Result<(), EngineError> {
        let slot = self.instruments.get_mut(&id).ok_or(EngineError::UnknownInstrument(id))?;
        slot.synth.set_allocation_mode(mode);
        Ok(())
    }

    /// Dispatch an immediate note-on (bypassing the scheduler), e.g. for
    /// a virtual keyboard / live-play UI surface.
    pub fn note_on(&mut self, instrument_id: u32, pitch: u8, velocity: u8) -> Result<(), EngineError> {
        let slot = self
            .instruments
            .get_mut(&instrument_id)
            .ok_or(EngineError::UnknownInstrument(instrument_id))?;
        slot.synth.note_on(pitch, velocity);
        Ok(())
    }

    /// Dispatch an immediate note-off.
    pub fn note_off(&mut self, instrument_id: u32, pitch: u8) -> Result<(), EngineError> {
        let slot = self
            .instruments
            .get_mut(&instrument_id)
            .ok_or(EngineError::UnknownInstrument(instrument_id))?;
        slot.synth.note_off(pitch);
        Ok(())
    }

    /// Silence every voice on every instrument immediately (next block).
    pub fn all_notes_off(&mut self) {
        for slot in self.instruments.values_mut() {
            slot.synth.all_notes_off();
        }
    }

    /// Set a mixer insert's gain (dB), pan, mute, and solo in one call.
    pub fn set_mixer_insert(
        &mut self,
        id: u32,
        gain_db: f32,
        pan: f32,
        mute: bool,
        solo: bool,
    ) -> Result<(), EngineError> {
        let insert = self.graph.insert_mut(id).ok_or(EngineError::UnknownInsert(id))?;
        insert.set_gain_db(gain_db);
        insert.set_pan(pan);
        insert.set_muted(mute);
        insert.set_solo(solo);
        Ok(())
    }

    /// Append an effect by registry id to an insert's chain.
    pub fn add_effect(&mut self, insert_id: u32, effect_kind: &str) -> Result<(), EngineError> {
        let insert = self.graph.insert_mut(insert_id).ok_or(EngineError::UnknownInsert(insert_id))?;
        insert.add_effect(effect_kind)?;
        self.graph.recompute_latency_compensation();
        Ok(())
    }

    /// Reorder an effect within an insert's chain.
    pub fn reorder_effect(&mut self, insert_id: u32, from: usize, to: usize) -> Result<(), EngineError> {
        let insert = self.graph.insert_mut(insert_id).ok_or(EngineError::UnknownInsert(insert_id))?;
        insert.reorder_effect(from, to);
        Ok(())
    }

    /// Remove the effect at `index` from an insert's chain.
    pub fn remove_effect(&mut self, insert_id: u32, index: usize) -> Result<(), EngineError> {
        let insert = self.graph.insert_mut(insert_id).ok_or(EngineError::UnknownInsert(insert_id))?;
        insert.remove_effect(index);
        self.graph.recompute_latency_compensation();
        Ok(())
    }

    /// Set a named parameter on the effect at `index` of an insert's chain.
    pub fn set_effect_param(
        &mut self,
        insert_id: u32,
        effect_index: usize,
        name: &str,
        value: f32,
    ) -> Result<(), EngineError> {
        let insert = self.graph.insert_mut(insert_id).ok_or(EngineError::UnknownInsert(insert_id))?;
        insert.set_effect_param(effect_index, name, value)
    }

    /// Add a pattern to the scheduler's active set, returning its index.
    pub fn add_pattern(&mut self, pattern: Pattern) -> usize {
        self.scheduler.add_pattern(pattern)
    }

    /// Mute/unmute a pattern by index.
    pub fn set_pattern_muted(&mut self, pattern_index: usize, muted: bool) {
        self.scheduler.set_muted(pattern_index, muted);
    }

    // -- Transport command API (§6) -----------------------------------------

    /// Current audio-clock time, in seconds, as of the last `process_block`.
    pub fn audio_now_s(&self) -> f64 {
        self.frames_elapsed as f64 / self.sample_rate as f64
    }

    /// The position a caller should display right now. Applies the
    /// position-lock protocol (§4.1): each call consumes one of the three
    /// post-`play()` reads that report the snapshot position rather than
    /// the live engine clock, matching a UI poll rather than the audio
    /// thread's own per-block tick (see [`Engine::process_block`], which
    /// reads position non-consumingly via `peek_position` internally).
    pub fn display_position(&mut self) -> f64 {
        self.transport.position_for_display()
    }

    /// Current playback state.
    pub fn playback_state(&self) -> PlaybackState {
        self.transport.state()
    }

    /// Current BPM.
    pub fn bpm(&self) -> f32 {
        self.transport.bpm()
    }

    /// Current loop configuration.
    pub fn loop_range(&self) -> LoopRange {
        self.transport.loop_range()
    }

    /// Start or resume playback, optionally at a given step.
    pub fn play(&mut self, at_step: Option<f64>) -> Result<(), EngineError> {
        self.bridge
            .enqueue(TransportCommand::Play(at_step))
            .map_err(|_| EngineError::DeviceUnavailable)
    }

    /// Pause playback.
    pub fn pause(&mut self) -> Result<(), EngineError> {
        self.bridge
            .enqueue(TransportCommand::Pause)
            .map_err(|_| EngineError::DeviceUnavailable)
    }

    /// Stop playback; the UI position is preserved, pending events cancelled.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        let now_s = self.audio_now_s();
        self.scheduler.cancel_all_pending(now_s);
        self.bridge
            .enqueue(TransportCommand::Stop)
            .map_err(|_| EngineError::DeviceUnavailable)
    }

    /// Play if stopped/paused, pause if playing.
    pub fn toggle(&mut self) -> Result<(), EngineError> {
        self.bridge
            .enqueue(TransportCommand::Toggle)
            .map_err(|_| EngineError::DeviceUnavailable)
    }

    /// Seek to a step. `smooth` performs the pause/settle/play sequence
    /// (§4.5) if currently playing; otherwise both modes are equivalent
    /// (position updates immediately).
    pub fn seek(&mut self, step: f64, smooth: bool) -> Result<(), EngineError> {
        if smooth && self.transport.state() == PlaybackState::Playing {
            self.smooth_seek = Some(SmoothSeek::Pausing { target_step: step });
            self.bridge
                .enqueue(TransportCommand::Pause)
                .map_err(|_| EngineError::DeviceUnavailable)
        } else {
            self.bridge
                .enqueue(TransportCommand::Seek(step))
                .map_err(|_| EngineError::DeviceUnavailable)
        }
    }

    /// Change tempo; already-scheduled events keep their computed times.
    pub fn set_bpm(&mut self, bpm: f32) -> Result<(), EngineError> {
        self.bridge
            .enqueue(TransportCommand::SetBpm(bpm))
            .map_err(|_| EngineError::DeviceUnavailable)
    }

    /// Change the loop range/enablement.
    pub fn set_loop(&mut self, start: f64, end: f64, enabled: bool) -> Result<(), EngineError> {
        self.bridge
            .enqueue(TransportCommand::SetLoop { start, end, enabled })
            .map_err(|_| EngineError::DeviceUnavailable)
    }

    /// Number of settle blocks (~10ms, per the spec's reference value) a
    /// smooth seek waits before resuming playback.
    fn settle_blocks(&self) -> u32 {
        const SETTLE_S: f64 = 0.010;
        let block_s = self.block_size as f64 / self.sample_rate as f64;
        (SETTLE_S / block_s).ceil().max(1.0) as u32
    }

    // -- Per-block rendering -------------------------------------------------

    /// Render one block of audio into `out_left`/`out_right`. Both must be
    /// at least the engine's configured block size; excess is ignored.
    ///
    /// Runs the spec's five-step per-block algorithm (§4.2): drain
    /// transport commands, advance the clock, admit/dispatch scheduled
    /// events, render instruments, then mix through the graph.
    pub fn process_block(&mut self, out_left: &mut [f32], out_right: &mut [f32]) {
        let len = out_left.len().min(out_right.len()).min(self.block_size);
        let now_s = self.audio_now_s();

        self.bridge.drain_and_apply(&mut self.transport, now_s);
        self.advance_smooth_seek();

        self.transport.advance_block(len as u64);
        let step = self.transport.peek_position();
        self.bridge.report_tick(step, now_s + len as f64 / self.sample_rate as f64);

        if self.transport.state() == PlaybackState::Playing && !self.is_settling() {
            let loop_range = self.transport.loop_range();
            let loop_arg = loop_range.enabled.then_some((loop_range.start, loop_range.end));
            self.scheduler.tick(now_s, step, self.transport.bpm(), loop_arg);

            // Latency compensation (§4.2.1): dispatch up to
            // `max_latency/sr` seconds early so output reaches the master
            // bus phase-aligned with the transport.
            let latency_shift_s = self.graph.max_latency_samples() as f64 / self.sample_rate as f64;
            let dispatch_horizon = now_s + len as f64 / self.sample_rate as f64 + latency_shift_s;
            for event in self.scheduler.drain_due(dispatch_horizon) {
                self.dispatch(event.kind);
            }
        }
        self.scheduler.reap(now_s);

        for (_, (buf_l, buf_r)) in self.insert_inputs.iter_mut() {
            buf_l[..len].fill(0.0);
            buf_r[..len].fill(0.0);
        }

        for (id, slot) in self.instruments.iter_mut() {
            let (mono_l, mono_r) = self
                .inst_scratch
                .get_mut(id)
                .expect("instrument scratch buffer missing");
            for i in 0..len {
                let (l, r) = slot.synth.process_stereo();
                mono_l[i] = l;
                mono_r[i] = r;
            }
            if let Some((acc_l, acc_r)) = self.insert_inputs.get_mut(&slot.insert_id) {
                for i in 0..len {
                    acc_l[i] += mono_l[i];
                    acc_r[i] += mono_r[i];
                }
            }
        }

        self.graph
            .process_block(&self.insert_inputs, &mut self.master_left[..len], &mut self.master_right[..len]);

        out_left[..len].copy_from_slice(&self.master_left[..len]);
        out_right[..len].copy_from_slice(&self.master_right[..len]);

        self.frames_elapsed += len as u64;
    }

    fn dispatch(&mut self, kind: strata_transport::EventKind) {
        use strata_transport::EventKind;
        match kind {
            EventKind::NoteOn {
                instrument_id,
                pitch,
                velocity,
            } => {
                if let Some(slot) = self.instruments.get_mut(&instrument_id) {
                    slot.synth.note_on(pitch, velocity);
                }
            }
            EventKind::NoteOff { instrument_id, pitch } => {
                if let Some(slot) = self.instruments.get_mut(&instrument_id) {
                    slot.synth.note_off(pitch);
                }
            }
        }
    }

    fn is_settling(&self) -> bool {
        matches!(self.smooth_seek, Some(SmoothSeek::Settling { .. }))
    }

    /// Advance the smooth-seek FSM by one block. Transitions `Pausing` to
    /// `Settling` once the transport has actually paused (the pause
    /// command enqueued by `seek` takes effect at the next
    /// `drain_and_apply`), counts down the settle window, then enqueues
    /// the resuming seek + play pair.
    fn advance_smooth_seek(&mut self) {
        let Some(phase) = self.smooth_seek else { return };
        match phase {
            SmoothSeek::Pausing { target_step } => {
                if self.transport.state() == PlaybackState::Paused {
                    self.smooth_seek = Some(SmoothSeek::Settling {
                        target_step,
                        blocks_remaining: self.settle_blocks(),
                    });
                }
                // Otherwise the pause hasn't taken effect yet; try again
                // next block.
            }
            SmoothSeek::Settling {
                target_step,
                blocks_remaining,
            } => {
                if blocks_remaining == 0 {
                    let now_s = self.audio_now_s();
                    self.scheduler.reset(now_s);
                    let _ = self.bridge.enqueue(TransportCommand::Seek(target_step));
                    let _ = self.bridge.enqueue(TransportCommand::Play(Some(target_step)));
                    self.smooth_seek = None;
                } else {
                    self.smooth_seek = Some(SmoothSeek::Settling {
                        target_step,
                        blocks_remaining: blocks_remaining - 1,
                    });
                }
            }
        }
    }

    /// Reset all DSP state (mixer chains, instrument voices) without
    /// touching transport position — used when a host wants a clean
    /// re-render (e.g. before an offline bounce) at the current position.
    pub fn reset_dsp(&mut self) {
        self.graph.reset();
        for slot in self.instruments.values_mut() {
            slot.synth.reset();
        }
    }
}
