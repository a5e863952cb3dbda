//! Note, Pattern, and Scheduled Event data types.
//!
//! `Note` and `Pattern` are value types (cheap to clone, owned by the
//! control thread); `ScheduledEvent` is the pool-allocated unit the
//! scheduler hands to the audio graph runtime once a note's on/off times
//! fall within the dispatch horizon.

use strata_core::pool::Poolable;

/// A single note within a pattern: pitch, velocity, and its step-domain
/// duration. Step 0 is the pattern's own start, not the transport's.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// MIDI note number, 0-127.
    pub pitch: u8,
    /// Note-on velocity, 0-127.
    pub velocity: u8,
    /// Step at which this note starts, relative to the pattern.
    pub start_step: f64,
    /// Duration in steps.
    pub duration_steps: f64,
}

impl Note {
    /// The step at which this note's note-off fires.
    pub fn end_step(&self) -> f64 {
        self.start_step + self.duration_steps
    }
}

/// An ordered collection of notes addressed to one instrument.
///
/// Patterns are value-like: looping, muting, and length all live on the
/// pattern itself rather than on a separate playback-state object, so a
/// pattern can be freely cloned and handed to the scheduler without
/// aliasing concerns.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    /// Which instrument this pattern's notes target.
    pub instrument_id: u32,
    /// Notes in step order. Not required to be pre-sorted by the caller;
    /// the scheduler sorts on ingestion.
    pub notes: Vec<Note>,
    /// Pattern length in steps. Notes past this length don't fire.
    pub length_steps: f64,
}

impl Pattern {
    /// Construct a pattern, sorting its notes by start step.
    pub fn new(instrument_id: u32, mut notes: Vec<Note>, length_steps: f64) -> Self {
        notes.sort_by(|a, b| a.start_step.total_cmp(&b.start_step));
        Self {
            instrument_id,
            notes,
            length_steps,
        }
    }
}

/// The kind of event a [`ScheduledEvent`] carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    /// Note-on for `instrument_id`/`pitch` at `velocity`.
    NoteOn {
        /// Target instrument.
        instrument_id: u32,
        /// MIDI pitch.
        pitch: u8,
        /// Note-on velocity.
        velocity: u8,
    },
    /// Note-off for `instrument_id`/`pitch`.
    NoteOff {
        /// Target instrument.
        instrument_id: u32,
        /// MIDI pitch.
        pitch: u8,
    },
}

/// A pool-allocated event with its dispatch time resolved to audio
/// seconds. Lives in a [`strata_core::pool::Pool`] between the moment
/// the scheduler admits it (inside the look-ahead window) and the moment
/// the graph runtime drains it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledEvent {
    /// What to do when this event fires.
    pub kind: EventKind,
    /// Absolute audio-clock time, in seconds, at which this event should
    /// dispatch.
    pub target_time_s: f64,
    /// Audio-clock time, in seconds, at which this event was marked
    /// cancelled. `None` while the event is still live. A cancelled event
    /// is reaped (released back to the pool) once the grace period has
    /// elapsed; cancelling an event that already dispatched is a no-op
    /// since the scheduler drops it from its pending list on dispatch.
    pub cancelled_at_s: Option<f64>,
    /// Monotonic id distinguishing events with identical `target_time_s`,
    /// used to give equal-time events a stable FIFO order.
    pub sequence: u64,
}

impl Poolable for ScheduledEvent {
    fn sentinel() -> Self {
        ScheduledEvent {
            kind: EventKind::NoteOff {
                instrument_id: 0,
                pitch: 0,
            },
            target_time_s: 0.0,
            cancelled_at_s: None,
            sequence: 0,
        }
    }

    fn reset(&mut self) {
        *self = Self::sentinel();
    }
}
