//! Master clock, look-ahead scheduler, and position-authority transport.
//!
//! This crate owns the timing layer of the engine: [`Transport`] is the
//! single source of truth for playback state and position, [`Scheduler`]
//! turns patterns into time-stamped note events ahead of when the audio
//! graph needs them, and [`Bridge`] is the command/event seam a host
//! talks to from its own (non-real-time) thread.
//!
//! None of this crate touches DSP; `strata-core`/`strata-graph` own
//! rendering. This crate only ever decides *when*.

mod bridge;
mod error;
mod event;
mod pattern;
mod scheduler;
mod transport;

pub use bridge::{Bridge, EventReceiver, TransportCommand, DEFAULT_QUEUE_CAPACITY};
pub use error::{BridgeError, TransportError};
pub use event::{ChangeReason, PositionMode, SubscriptionEvent};
pub use pattern::{EventKind, Note, Pattern, ScheduledEvent};
pub use scheduler::{
    Scheduler, CANCEL_REAP_S, DEFAULT_EVENT_POOL_CAPACITY, LOOK_AHEAD_S, SCHEDULE_AHEAD_S,
    TICK_PERIOD_S,
};
pub use transport::{LoopRange, PlaybackState, Transport, TransportEvent};
