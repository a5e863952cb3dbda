//! Look-ahead event scheduler.
//!
//! Runs on the control thread's timer tick, not the audio callback: it
//! walks each active pattern's notes, converts step positions to absolute
//! audio-clock seconds, and admits events into the pool once they fall
//! inside the schedule-ahead window. The audio graph runtime (C8) then
//! drains events whose `target_time_s` has entered the look-ahead window
//! on its own per-block pass.

use strata_core::pool::{Pool, PoolIndex};

use crate::error::TransportError;
use crate::pattern::{EventKind, Note, Pattern, ScheduledEvent};

/// How far ahead of the current audio-clock time the scheduler looks
/// when deciding whether an event has become "due" for dispatch.
pub const LOOK_AHEAD_S: f64 = 0.100;

/// How far ahead of the current audio-clock time the scheduler admits
/// new events into the pool.
pub const SCHEDULE_AHEAD_S: f64 = 0.150;

/// The control-thread timer period driving [`Scheduler::tick`].
pub const TICK_PERIOD_S: f64 = 0.025;

/// Grace period a cancelled event sits in the pool before being reaped.
pub const CANCEL_REAP_S: f64 = 1.0;

/// Default capacity of the scheduler's event pool (spec's events=500 default).
pub const DEFAULT_EVENT_POOL_CAPACITY: usize = 500;

/// One pattern's scheduling cursor: how far into its own step-domain
/// timeline the scheduler has already admitted events for.
struct PatternCursor {
    pattern: Pattern,
    /// Step, relative to the pattern, of the next unscheduled note.
    next_note_index: usize,
    /// How many times the pattern has looped, used to offset admitted
    /// note times back into the transport's absolute step domain.
    loop_count: u64,
    muted: bool,
}

/// A pending (admitted, not yet dispatched) event plus its pool slot.
struct Pending {
    index: PoolIndex,
}

/// Look-ahead scheduler (spec component C9).
pub struct Scheduler {
    pool: Pool<ScheduledEvent>,
    patterns: Vec<PatternCursor>,
    pending: Vec<Pending>,
    next_sequence: u64,
    /// Transport step at which the last `tick` left off scheduling from,
    /// used to detect loop wraps between ticks.
    last_step: f64,
}

impl Scheduler {
    /// Create a scheduler with the default event pool capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_POOL_CAPACITY)
    }

    /// Create a scheduler whose event pool is pre-sized to `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pool: Pool::new(capacity),
            patterns: Vec::new(),
            pending: Vec::new(),
            next_sequence: 0,
            last_step: 0.0,
        }
    }

    /// Add a pattern to the active set. Returns the index used to
    /// address it for mute/remove operations.
    pub fn add_pattern(&mut self, pattern: Pattern) -> usize {
        self.patterns.push(PatternCursor {
            pattern,
            next_note_index: 0,
            loop_count: 0,
            muted: false,
        });
        self.patterns.len() - 1
    }

    /// Mute or unmute a pattern by index. Muted patterns are skipped
    /// during scheduling but keep their cursor position.
    pub fn set_muted(&mut self, pattern_index: usize, muted: bool) {
        if let Some(cursor) = self.patterns.get_mut(pattern_index) {
            cursor.muted = muted;
        }
    }

    /// Number of events currently pending dispatch.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Admit events that fall within the schedule-ahead window of
    /// `now_s` (the current audio-clock time) given the current BPM and
    /// transport step. `loop_range` is `(start, end)` in steps if looping
    /// is active.
    ///
    /// BPM changes are non-retroactive: events already admitted keep the
    /// absolute time they were computed with; only newly admitted events
    /// use the `bpm` passed to this call.
    pub fn tick(
        &mut self,
        now_s: f64,
        current_step: f64,
        bpm: f32,
        loop_range: Option<(f64, f64)>,
    ) -> Vec<TransportError> {
        let step_dur = 60.0 / (bpm as f64 * 4.0);
        let horizon_step = current_step + (SCHEDULE_AHEAD_S / step_dur);
        let mut warnings = Vec::new();

        for cursor in &mut self.patterns {
            if cursor.muted {
                continue;
            }
            Self::schedule_pattern(
                cursor,
                current_step,
                horizon_step,
                now_s,
                step_dur,
                loop_range,
                &mut self.pool,
                &mut self.pending,
                &mut self.next_sequence,
                &mut warnings,
            );
        }

        self.last_step = current_step;
        warnings
    }

    #[allow(clippy::too_many_arguments)]
    fn schedule_pattern(
        cursor: &mut PatternCursor,
        current_step: f64,
        horizon_step: f64,
        now_s: f64,
        step_dur: f64,
        loop_range: Option<(f64, f64)>,
        pool: &mut Pool<ScheduledEvent>,
        pending: &mut Vec<Pending>,
        next_sequence: &mut u64,
        warnings: &mut Vec<TransportError>,
    ) {
        let length = cursor.pattern.length_steps.max(1.0);

        loop {
            let Some(note) = cursor.pattern.notes.get(cursor.next_note_index).copied() else {
                // Reached the end of this pass; loop back to the start.
                cursor.next_note_index = 0;
                cursor.loop_count += 1;
                if cursor.loop_count > 1_000_000 {
                    // Defensive bound: a zero-length or empty pattern
                    // would otherwise spin forever within one tick.
                    break;
                }
                continue;
            };

            let absolute_start_step =
                cursor.loop_count as f64 * length + skip_for_loop(note.start_step, loop_range);
            if absolute_start_step > horizon_step {
                break;
            }

            let on_time_s = now_s + (absolute_start_step - current_step) * step_dur;
            let off_time_s = on_time_s + note.duration_steps * step_dur;

            if on_time_s < now_s - LOOK_AHEAD_S {
                warnings.push(TransportError::ScheduleBeforeStart {
                    target_s: on_time_s,
                    now_s,
                });
            }

            Self::admit(
                pool,
                pending,
                next_sequence,
                EventKind::NoteOn {
                    instrument_id: cursor.pattern.instrument_id,
                    pitch: note.pitch,
                    velocity: note.velocity,
                },
                on_time_s.max(now_s - LOOK_AHEAD_S),
            );
            Self::admit(
                pool,
                pending,
                next_sequence,
                EventKind::NoteOff {
                    instrument_id: cursor.pattern.instrument_id,
                    pitch: note.pitch,
                },
                off_time_s.max(now_s - LOOK_AHEAD_S),
            );

            cursor.next_note_index += 1;
        }
    }

    fn admit(
        pool: &mut Pool<ScheduledEvent>,
        pending: &mut Vec<Pending>,
        next_sequence: &mut u64,
        kind: EventKind,
        target_time_s: f64,
    ) {
        let sequence = *next_sequence;
        *next_sequence += 1;
        let index = pool.acquire(|slot| {
            slot.kind = kind;
            slot.target_time_s = target_time_s;
            slot.cancelled_at_s = None;
            slot.sequence = sequence;
        });
        pending.push(Pending { index });
    }

    /// Drain events whose `target_time_s` has entered the look-ahead
    /// window relative to `now_s`, in FIFO order for ties, releasing
    /// their pool slots. This is the audio-graph-runtime side of the
    /// horizon dispatch rule; it does not itself touch the audio thread,
    /// it only decides which events are ready to be handed off.
    pub fn drain_due(&mut self, now_s: f64) -> Vec<ScheduledEvent> {
        let mut due_indices = Vec::new();
        let pool = &self.pool;
        self.pending.retain(|p| {
            let ev = pool.get(p.index);
            if ev.cancelled_at_s.is_some() {
                return true; // reaped separately, not dispatched
            }
            if ev.target_time_s <= now_s + LOOK_AHEAD_S {
                due_indices.push(p.index);
                false
            } else {
                true
            }
        });

        let pool = &self.pool;
        due_indices.sort_by(|a, b| {
            let ea = pool.get(*a);
            let eb = pool.get(*b);
            ea.target_time_s
                .total_cmp(&eb.target_time_s)
                .then(ea.sequence.cmp(&eb.sequence))
        });

        let mut out = Vec::with_capacity(due_indices.len());
        for idx in due_indices {
            out.push(*self.pool.get(idx));
            self.pool.release(idx);
        }
        out
    }

    /// Mark all currently pending (not yet dispatched) events cancelled.
    /// They remain in the pool for [`CANCEL_REAP_S`] before being freed;
    /// dispatch already skips cancelled events via [`Scheduler::drain_due`].
    pub fn cancel_all_pending(&mut self, now_s: f64) {
        for p in &self.pending {
            self.pool.get_mut(p.index).cancelled_at_s = Some(now_s);
        }
    }

    /// Release pool slots for events that were cancelled more than
    /// [`CANCEL_REAP_S`] ago. Call periodically from the control thread.
    pub fn reap(&mut self, now_s: f64) {
        let pool = &mut self.pool;
        self.pending.retain(|p| {
            let keep = match pool.get(p.index).cancelled_at_s {
                Some(cancelled_at) => now_s - cancelled_at < CANCEL_REAP_S,
                None => true,
            };
            if !keep {
                pool.release(p.index);
            }
            keep
        });
    }

    /// Reset all pattern cursors to the start of their patterns and
    /// cancel everything pending. Used on `stop()` and on a hard seek,
    /// where any in-flight schedule is no longer valid.
    pub fn reset(&mut self, now_s: f64) {
        self.cancel_all_pending(now_s);
        for cursor in &mut self.patterns {
            cursor.next_note_index = 0;
            cursor.loop_count = 0;
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Loop-crossing rescheduling: when looping is active, a note whose
/// absolute step falls before `loop_start` (i.e. belongs to material the
/// loop has already skipped past) is folded forward by the loop length so
/// scheduling never produces a silent gap at the loop boundary.
fn skip_for_loop(step: f64, loop_range: Option<(f64, f64)>) -> f64 {
    match loop_range {
        Some((start, end)) if step < start => {
            let loop_len = (end - start).max(f64::EPSILON);
            start + (step - start).rem_euclid(loop_len)
        }
        _ => step,
    }
}
