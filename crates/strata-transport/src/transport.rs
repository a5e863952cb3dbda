//! Master clock and position-authority state machine.
//!
//! The transport owns two notions of "where we are": the UI position (a
//! step the user last navigated to, persisted across stop/play cycles)
//! and the transport position (the engine's actual playhead, derived from
//! sample time while playing). [`Transport::position_for_display`]
//! reconciles the two per the position-lock protocol.

use crate::error::TransportError;

/// Number of audio-driven position reads, after `start()`, for which the
/// transport reports `play_start_snapshot` instead of a live clock read.
const POSITION_LOCK_FRAMES: u32 = 3;

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No audio is advancing; `ui_position` is authoritative.
    #[default]
    Stopped,
    /// Audio is advancing; the engine clock is authoritative after the
    /// position-lock window elapses.
    Playing,
    /// Audio is frozen at its current position; resuming continues from
    /// here rather than from the UI position.
    Paused,
}

/// Loop range and enablement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoopRange {
    /// Whether looping is active.
    pub enabled: bool,
    /// Loop start, in steps.
    pub start: f64,
    /// Loop end, in steps. Invariant: `start < end`.
    pub end: f64,
}

/// Transport events, emitted on state transitions and once per block while
/// playing (`Tick`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportEvent {
    /// Playback started.
    Started,
    /// Playback stopped (UI position preserved).
    Stopped,
    /// Playback paused (transport position frozen).
    Paused,
    /// Emitted once per audio block while playing.
    Tick {
        /// Engine position in steps at the time of this tick.
        step: f64,
    },
    /// BPM changed; takes effect at the next scheduler boundary.
    BpmChanged(f32),
    /// Loop range or enablement changed.
    LoopChanged(LoopRange),
    /// The position-lock protocol overrode a transient clock read; carries
    /// the corrected step that was reported instead.
    PositionCorrected {
        /// The step actually reported to callers.
        step: f64,
    },
}

/// Master clock and position-authority state machine (spec component C10).
///
/// `seconds_per_step = 60 / (bpm * 4)` for 16th-note steps (§3's beat-time
/// derivation). The transport only tracks *where* play/pause/stop/seek
/// leave playback; it is the scheduler's job (see [`crate::Scheduler`]) to
/// turn that position into dispatched note events.
#[derive(Debug, Clone)]
pub struct Transport {
    state: PlaybackState,
    bpm: f32,
    sample_rate: f64,
    loop_range: LoopRange,

    /// UI-visible position, in steps. Persists across stop/play.
    ui_position: f64,
    /// Engine playhead, in audio sample frames since the last `start()`.
    engine_frames: u64,
    /// Step the engine adopted when `start()` was last called.
    play_start_snapshot: f64,
    /// Remaining position-lock reads before the engine clock takes over.
    position_lock_remaining: u32,
    /// Transport position frozen by `pause()`, in steps.
    paused_step: Option<f64>,

    device_open: bool,
}

impl Transport {
    /// Create a transport at the given sample rate and initial BPM.
    pub fn new(sample_rate: f64, bpm: f32) -> Self {
        Self {
            state: PlaybackState::Stopped,
            bpm: bpm.max(1.0),
            sample_rate,
            loop_range: LoopRange::default(),
            ui_position: 0.0,
            engine_frames: 0,
            play_start_snapshot: 0.0,
            position_lock_remaining: 0,
            paused_step: None,
            device_open: true,
        }
    }

    /// Mark the audio device closed; `start()` will fail until this is
    /// cleared by a subsequent call to [`Transport::set_device_open`].
    pub fn set_device_open(&mut self, open: bool) {
        self.device_open = open;
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current BPM.
    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    /// Seconds per 16th-note step at the current BPM.
    pub fn seconds_per_step(&self) -> f64 {
        60.0 / (self.bpm as f64 * 4.0)
    }

    /// The UI-visible position, in steps. Persists across stop/play.
    pub fn ui_position(&self) -> f64 {
        self.ui_position
    }

    /// Current loop configuration.
    pub fn loop_range(&self) -> LoopRange {
        self.loop_range
    }

    /// Raw engine sample-frame counter since the last `start()`.
    pub fn engine_frames(&self) -> u64 {
        self.engine_frames
    }

    /// `start(at)` — begin or resume playback.
    ///
    /// If paused, resumes at the frozen transport position regardless of
    /// `at`. Otherwise adopts `at` (or the current UI position if `None`),
    /// snapshots it, and arms the position-lock protocol.
    pub fn start(&mut self, at: Option<f64>) -> Result<TransportEvent, TransportError> {
        if !self.device_open {
            return Err(TransportError::DeviceUnavailable);
        }

        let resume_step = match (self.state, self.paused_step) {
            (PlaybackState::Paused, Some(step)) => step,
            _ => at.unwrap_or(self.ui_position),
        };

        self.play_start_snapshot = resume_step;
        self.ui_position = resume_step;
        self.engine_frames = 0;
        self.position_lock_remaining = POSITION_LOCK_FRAMES;
        self.paused_step = None;
        self.state = PlaybackState::Playing;
        Ok(TransportEvent::Started)
    }

    /// `pause()` — freeze the transport position, retain the UI position.
    /// No-op if not playing.
    pub fn pause(&mut self) -> Option<TransportEvent> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        self.paused_step = Some(self.current_engine_step());
        self.state = PlaybackState::Paused;
        Some(TransportEvent::Paused)
    }

    /// `stop()` — halt playback. The transport position resets to 0 for
    /// downstream purposes, but the UI position is preserved.
    pub fn stop(&mut self) -> TransportEvent {
        self.state = PlaybackState::Stopped;
        self.engine_frames = 0;
        self.paused_step = None;
        self.position_lock_remaining = 0;
        TransportEvent::Stopped
    }

    /// `seek(step)` — update the UI position (and, if playing, begin a
    /// position-lock window as though transport had just restarted at this
    /// step). Always updates the UI-visible step; the caller (the engine's
    /// smooth-jump state machine, driven from outside this crate) is
    /// responsible for the pause/settle/play sequence when playing.
    pub fn seek(&mut self, step: f64) {
        self.ui_position = step;
        if self.state == PlaybackState::Playing {
            self.play_start_snapshot = step;
            self.engine_frames = 0;
            self.position_lock_remaining = POSITION_LOCK_FRAMES;
        }
    }

    /// `set_bpm(bpm)` — effective at the next scheduler boundary.
    /// Already-scheduled events retain their computed times.
    pub fn set_bpm(&mut self, bpm: f32) -> Result<TransportEvent, TransportError> {
        if bpm <= 0.0 {
            return Err(TransportError::InvalidBpm(bpm));
        }
        self.bpm = bpm;
        Ok(TransportEvent::BpmChanged(bpm))
    }

    /// `set_loop(start, end, enabled)` — requires `start < end`.
    pub fn set_loop(
        &mut self,
        start: f64,
        end: f64,
        enabled: bool,
    ) -> Result<TransportEvent, TransportError> {
        if start >= end {
            return Err(TransportError::InvalidLoopRange { start, end });
        }
        self.loop_range = LoopRange {
            enabled,
            start,
            end,
        };
        Ok(TransportEvent::LoopChanged(self.loop_range))
    }

    /// Advance the engine clock by `frames` audio frames (one block).
    /// Returns the tick event (and, if the loop wrapped, also wraps the
    /// internal frame counter so the *next* `current_engine_step` reflects
    /// post-wrap position).
    ///
    /// No-op while stopped or paused.
    pub fn advance_block(&mut self, frames: u64) -> Option<TransportEvent> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        self.engine_frames += frames;

        if self.loop_range.enabled {
            let step = self.current_engine_step();
            if step >= self.loop_range.end {
                let overshoot = step - self.loop_range.end;
                let wrapped = self.loop_range.start + overshoot;
                self.play_start_snapshot = wrapped;
                self.engine_frames = 0;
            }
        }

        Some(TransportEvent::Tick {
            step: self.current_engine_step(),
        })
    }

    /// The engine's own clock-derived step, ignoring position-lock.
    fn current_engine_step(&self) -> f64 {
        let elapsed_seconds = self.engine_frames as f64 / self.sample_rate;
        self.play_start_snapshot + elapsed_seconds / self.seconds_per_step()
    }

    /// The position a caller should observe right now, applying the
    /// position-lock protocol: for the first [`POSITION_LOCK_FRAMES`]
    /// reads after `start()`/a playing `seek()`, report
    /// `play_start_snapshot` rather than the live engine clock. This is
    /// the only mechanism reconciling an optimistic UI seek with an engine
    /// clock that hasn't advanced yet.
    ///
    /// Each call while playing consumes one position-lock read.
    pub fn position_for_display(&mut self) -> f64 {
        match self.state {
            PlaybackState::Stopped => self.ui_position,
            PlaybackState::Paused => self.paused_step.unwrap_or(self.ui_position),
            PlaybackState::Playing => {
                if self.position_lock_remaining > 0 {
                    self.position_lock_remaining -= 1;
                    self.play_start_snapshot
                } else {
                    self.current_engine_step()
                }
            }
        }
    }

    /// Peek the position a caller would observe, without consuming a
    /// position-lock read. Used for logging/telemetry that shouldn't
    /// perturb the protocol.
    pub fn peek_position(&self) -> f64 {
        match self.state {
            PlaybackState::Stopped => self.ui_position,
            PlaybackState::Paused => self.paused_step.unwrap_or(self.ui_position),
            PlaybackState::Playing => {
                if self.position_lock_remaining > 0 {
                    self.play_start_snapshot
                } else {
                    self.current_engine_step()
                }
            }
        }
    }
}
