//! Timeline / UI Bridge — command ingress and event fan-out across the
//! control/audio thread split, plus the optimistic UI protocol.
//!
//! The bridge is the only thing a host touches directly. It owns the
//! command queue (host → audio thread, serviced between blocks by
//! whichever side actually drives the transport) and the event channel
//! (audio thread → every subscribed UI), and it tracks enough state to
//! answer UI reads optimistically before the audio thread confirms them.

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};

use crate::error::{BridgeError, TransportError};
use crate::event::{ChangeReason, PositionMode, SubscriptionEvent};
use crate::transport::{LoopRange, PlaybackState, Transport, TransportEvent};

/// A host command, queued from the control thread to whichever side
/// actually owns `Transport::advance_block` (typically the audio thread
/// in a real-time host, or the same thread in an offline render).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportCommand {
    /// Start or resume playback, optionally at a given step.
    Play(Option<f64>),
    /// Pause playback.
    Pause,
    /// Stop playback.
    Stop,
    /// Toggle: play if stopped/paused, pause if playing.
    Toggle,
    /// Seek to a step.
    Seek(f64),
    /// Change tempo.
    SetBpm(f32),
    /// Change loop range/enablement.
    SetLoop {
        /// Loop start, in steps.
        start: f64,
        /// Loop end, in steps.
        end: f64,
        /// Whether looping is enabled.
        enabled: bool,
    },
}

/// Default capacity for the command and event queues.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Cloneable handle for reading events. Each UI surface gets its own
/// receiver off the bridge's broadcast list.
pub type EventReceiver = Receiver<SubscriptionEvent>;

/// Timeline / UI Bridge (spec component C11).
///
/// Commands are applied to `Transport` immediately (the "optimistic"
/// half of the protocol: the UI-visible state updates right away) while
/// also being recorded as the previous-state snapshot, so that if the
/// audio thread later rejects the command (device unavailable, etc.) the
/// bridge can reconcile by emitting a correcting event.
pub struct Bridge {
    command_tx: Sender<TransportCommand>,
    command_rx: Receiver<TransportCommand>,
    event_txs: Vec<Sender<SubscriptionEvent>>,
    dropped_commands: u64,
    /// Snapshot of UI-visible state prior to the most recent optimistic
    /// apply, used to roll back on rejection.
    previous_state: Option<(PlaybackState, f64)>,
}

impl Bridge {
    /// Create a bridge with the default queue capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Create a bridge whose command queue holds at most `capacity`
    /// in-flight commands before applying the drop-oldest-first overflow
    /// policy.
    pub fn with_capacity(capacity: usize) -> Self {
        let (command_tx, command_rx) = bounded(capacity);
        Self {
            command_tx,
            command_rx,
            event_txs: Vec::new(),
            dropped_commands: 0,
            previous_state: None,
        }
    }

    /// Subscribe a new UI surface to the event channel.
    pub fn subscribe(&mut self) -> EventReceiver {
        let (tx, rx) = bounded(DEFAULT_QUEUE_CAPACITY);
        self.event_txs.push(tx);
        rx
    }

    /// Enqueue a command from the control thread. Applies the
    /// drop-oldest-first overflow policy: if the queue is full, the
    /// oldest queued command is discarded to make room rather than
    /// rejecting the new one, and the drop counter increments.
    pub fn enqueue(&mut self, command: TransportCommand) -> Result<(), BridgeError> {
        if self.command_tx.is_full() {
            // Drop the oldest by popping one off the receive side before
            // pushing; the audio thread will simply never see it.
            let _ = self.command_rx.try_recv();
            self.dropped_commands += 1;
        }
        self.command_tx
            .try_send(command)
            .map_err(|_| BridgeError::QueueOverflow {
                dropped_total: {
                    self.dropped_commands += 1;
                    self.dropped_commands
                },
            })
    }

    /// Total commands dropped by the overflow policy since construction.
    pub fn dropped_commands(&self) -> u64 {
        self.dropped_commands
    }

    /// Drain and apply all queued commands against `transport`, emitting
    /// the resulting events to every subscriber. Called once per block
    /// from whichever thread drives the transport.
    pub fn drain_and_apply(&mut self, transport: &mut Transport, now_s: f64) {
        loop {
            match self.command_rx.try_recv() {
                Ok(command) => self.apply(transport, command, now_s),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn apply(&mut self, transport: &mut Transport, command: TransportCommand, now_s: f64) {
        self.previous_state = Some((transport.state(), transport.ui_position()));

        let result = match command {
            TransportCommand::Play(at) => transport.start(at).map(Some),
            TransportCommand::Pause => Ok(transport.pause()),
            TransportCommand::Stop => Ok(Some(transport.stop())),
            TransportCommand::Toggle => {
                if transport.state() == PlaybackState::Playing {
                    Ok(transport.pause())
                } else {
                    transport.start(None).map(Some)
                }
            }
            TransportCommand::Seek(step) => {
                transport.seek(step);
                Ok(None)
            }
            TransportCommand::SetBpm(bpm) => transport.set_bpm(bpm).map(Some),
            TransportCommand::SetLoop { start, end, enabled } => {
                transport.set_loop(start, end, enabled).map(Some)
            }
        };

        match result {
            Ok(Some(event)) => self.emit_from_transport_event(event, transport, now_s),
            Ok(None) => self.emit_position_update(transport, ChangeReason::Command, now_s),
            Err(err) => self.rollback_and_report(transport, err, now_s),
        }
    }

    fn emit_from_transport_event(
        &mut self,
        event: TransportEvent,
        transport: &mut Transport,
        now_s: f64,
    ) {
        let reason = ChangeReason::Command;
        match event {
            TransportEvent::Started => self.broadcast(SubscriptionEvent::StateChange {
                state: PlaybackState::Playing,
                reason,
                timestamp: now_s,
            }),
            TransportEvent::Stopped => self.broadcast(SubscriptionEvent::StateChange {
                state: PlaybackState::Stopped,
                reason,
                timestamp: now_s,
            }),
            TransportEvent::Paused => self.broadcast(SubscriptionEvent::StateChange {
                state: PlaybackState::Paused,
                reason,
                timestamp: now_s,
            }),
            TransportEvent::Tick { step } => {
                self.broadcast(SubscriptionEvent::PositionUpdate {
                    step,
                    reason: ChangeReason::Playback,
                    timestamp: now_s,
                    mode: PositionMode::Confirmed,
                });
                return;
            }
            TransportEvent::BpmChanged(_)
            | TransportEvent::LoopChanged(_)
            | TransportEvent::PositionCorrected { .. } => {}
        }
        self.emit_position_update(transport, reason, now_s);
    }

    fn emit_position_update(&mut self, transport: &mut Transport, reason: ChangeReason, now_s: f64) {
        let step = transport.position_for_display();
        self.broadcast(SubscriptionEvent::PositionUpdate {
            step,
            reason,
            timestamp: now_s,
            mode: PositionMode::Confirmed,
        });
    }

    fn rollback_and_report(&mut self, transport: &mut Transport, err: TransportError, now_s: f64) {
        tracing::warn!(error = %err, "transport command rejected, rolling back");
        if let Some((state, ui_position)) = self.previous_state {
            self.broadcast(SubscriptionEvent::StateChange {
                state,
                reason: ChangeReason::Command,
                timestamp: now_s,
            });
            self.broadcast(SubscriptionEvent::GhostPositionChange {
                step: ui_position,
                confirmed: false,
                timestamp: now_s,
            });
        }
        let _ = transport;
    }

    /// Broadcast one transport-side advance-block tick to every
    /// subscriber as a confirmed position update. Call once per block.
    pub fn report_tick(&mut self, step: f64, now_s: f64) {
        self.broadcast(SubscriptionEvent::PositionUpdate {
            step,
            reason: ChangeReason::Playback,
            timestamp: now_s,
            mode: PositionMode::Confirmed,
        });
    }

    /// Apply an optimistic ("ghost") position update immediately, ahead
    /// of audio-thread confirmation — used by a UI that wants to render a
    /// drag-seek position before the command round-trips.
    pub fn report_ghost_position(&mut self, step: f64, now_s: f64) {
        self.broadcast(SubscriptionEvent::PositionUpdate {
            step,
            reason: ChangeReason::Command,
            timestamp: now_s,
            mode: PositionMode::Ghost,
        });
    }

    /// Broadcast an event to every subscriber. A subscriber whose
    /// channel is full is skipped rather than blocking the fan-out (the
    /// event channel follows the same never-block policy as the audio
    /// thread's side of the command queue).
    fn broadcast(&mut self, event: SubscriptionEvent) {
        for tx in &self.event_txs {
            let _ = tx.try_send(event);
        }
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}
