//! Error kinds for the transport, scheduler, and UI bridge.

use thiserror::Error;

/// Failures surfaced by the transport command API and scheduler.
///
/// Mirrors the engine-wide error design: recoverable conditions degrade
/// gracefully and are logged rather than propagated as a crash, while
/// [`TransportError::GraphInconsistent`] is the one fatal variant that
/// should stop the engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransportError {
    /// `play()` was called but the audio device has not been opened.
    #[error("audio device unavailable")]
    DeviceUnavailable,

    /// `set_loop` received a range that doesn't satisfy `start < end`.
    #[error("invalid loop range: start={start} end={end}")]
    InvalidLoopRange {
        /// Requested loop start step.
        start: f64,
        /// Requested loop end step.
        end: f64,
    },

    /// `set_bpm` received a non-positive tempo.
    #[error("invalid bpm: {0}")]
    InvalidBpm(f32),

    /// An event's target time was before the current audio time by more
    /// than the scheduler's look-ahead window. Per policy this is not
    /// fatal: the event still dispatches immediately, but the condition is
    /// reported so callers can log or surface it.
    #[error("event scheduled before start: target={target_s:.4}s now={now_s:.4}s")]
    ScheduleBeforeStart {
        /// The event's originally requested time, in audio seconds.
        target_s: f64,
        /// The audio time at which it was actually dispatched.
        now_s: f64,
    },

    /// An internal invariant of the compiled schedule was violated. This
    /// indicates an engine bug, not a user error; the engine should stop.
    #[error("graph inconsistent: {0}")]
    GraphInconsistent(&'static str),
}

/// Failures surfaced by the optimistic UI command bridge.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BridgeError {
    /// The underlying transport rejected the command.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The command queue to the audio thread is full; the command was
    /// dropped. `dropped_total` is the running drop count for the queue,
    /// reported so the control thread can surface a warning.
    #[error("command queue overflow, dropped_total={dropped_total}")]
    QueueOverflow {
        /// Total commands dropped on this queue since construction.
        dropped_total: u64,
    },
}
