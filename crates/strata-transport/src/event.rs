//! The audio-thread-to-control-thread event API.
//!
//! This is distinct from [`crate::pattern::EventKind`] (note on/off, the
//! scheduler's internal dispatch unit): [`SubscriptionEvent`] is the
//! public, UI-facing notification a host subscribes to via
//! [`crate::Bridge::subscribe`].

use crate::transport::PlaybackState;

/// Why a position update or state change occurred, reported alongside the
/// event itself so a UI can distinguish a user-initiated seek from an
/// engine-driven tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    /// Caused directly by a host command (`play`, `seek`, ...).
    Command,
    /// Caused by ordinary playback advancing (per-block tick).
    Playback,
    /// Caused by a loop wrapping back to its start.
    LoopWrap,
    /// Caused by the position-lock protocol substituting a snapshot value
    /// for a transient clock read.
    PositionLock,
}

/// Whether a position update reflects real transport position or an
/// optimistic "ghost" position the UI should render provisionally while
/// waiting for audio-thread confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionMode {
    /// Confirmed position, sourced from the audio thread.
    Confirmed,
    /// Optimistic position set by the control thread ahead of
    /// confirmation (see the UI bridge's optimistic-apply protocol).
    Ghost,
}

/// One notification delivered over the event channel.
///
/// Mirrors the host-facing subscription API shape: every event carries a
/// `state`, a `reason`, and a `timestamp`; position-bearing events also
/// carry a `mode`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubscriptionEvent {
    /// Playback state transitioned.
    StateChange {
        /// The state now in effect.
        state: PlaybackState,
        /// Why the transition happened.
        reason: ChangeReason,
        /// Audio-clock time of the transition, in seconds.
        timestamp: f64,
    },
    /// The playhead moved.
    PositionUpdate {
        /// New position, in steps.
        step: f64,
        /// Why the position changed.
        reason: ChangeReason,
        /// Audio-clock time this update was produced, in seconds.
        timestamp: f64,
        /// Whether this is confirmed or a UI-optimistic ghost value.
        mode: PositionMode,
    },
    /// An optimistic ghost position was superseded (either confirmed or
    /// rolled back) by the real transport position.
    GhostPositionChange {
        /// The resolved step.
        step: f64,
        /// Whether the ghost value matched the confirmed one.
        confirmed: bool,
        /// Audio-clock time of the resolution, in seconds.
        timestamp: f64,
    },
}
