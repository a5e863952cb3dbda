//! Error kinds for the mixer graph and host embedding surface.

use thiserror::Error;

/// Failures surfaced by [`crate::Engine`]'s public API.
///
/// Mirrors `strata_transport::TransportError`'s design: most variants are
/// recoverable and degrade gracefully (clamp-and-warn, ignore-and-warn,
/// identity-substitution) rather than aborting the caller's request.
/// [`EngineError::GraphInconsistent`] is the sole fatal variant — it means
/// an internal invariant of the compiled graph was violated and the engine
/// should stop rather than continue rendering.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// The audio output device is unavailable (not opened, or disconnected).
    #[error("audio device unavailable")]
    DeviceUnavailable,

    /// `add_effect`/`add_effect_config` named an effect kind the registry
    /// doesn't recognize.
    #[error("unknown effect kind: {0}")]
    UnknownEffectKind(String),

    /// A command referenced an instrument id that was never created or has
    /// since been destroyed.
    #[error("unknown instrument: {0}")]
    UnknownInstrument(u32),

    /// A command referenced a mixer insert id that doesn't exist.
    #[error("unknown insert: {0}")]
    UnknownInsert(u32),

    /// `set_effect_param` received a value outside the parameter's declared
    /// range. Not a hard failure: the engine clamps to range and returns
    /// `Ok` with this carried as a logged warning, per the recoverable-
    /// conditions policy.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}], clamped")]
    ParameterOutOfRange {
        /// Parameter name.
        param: String,
        /// The out-of-range value that was supplied.
        value: f32,
        /// Valid range lower bound.
        min: f32,
        /// Valid range upper bound.
        max: f32,
    },

    /// `set_effect_param`/`update_params` named a parameter the target
    /// effect doesn't have. Ignored rather than failing outright.
    #[error("unknown parameter '{0}' for effect at index {1}")]
    UnknownParameter(String, usize),

    /// `add_effect` would exceed the insert's effect chain depth limit.
    #[error("effect chain on insert {insert_id} is full (max {max_depth})")]
    ChainFull {
        /// The insert whose chain is full.
        insert_id: u32,
        /// The configured maximum chain depth.
        max_depth: usize,
    },

    /// An internal invariant of the compiled graph was violated. Fatal —
    /// the engine should stop rendering rather than continue on
    /// inconsistent state.
    #[error("graph inconsistent: {0}")]
    GraphInconsistent(&'static str),

    /// A scheduled event's target time had already passed the look-ahead
    /// window by the time it was drained. Not fatal: the event still
    /// dispatches immediately.
    #[error("event scheduled before start: target={target_s:.4}s now={now_s:.4}s")]
    ScheduleBeforeStart {
        /// The event's originally requested dispatch time, audio seconds.
        target_s: f64,
        /// The audio time at which it was actually dispatched.
        now_s: f64,
    },

    /// Loading a preset/effect config failed; the engine substitutes an
    /// identity (bypassed) passthrough rather than aborting the chain
    /// load.
    #[error("failed to load '{0}', substituting identity passthrough")]
    LoadFailed(String),

    /// The underlying transport rejected a command.
    #[error(transparent)]
    Transport(#[from] strata_transport::TransportError),
}
