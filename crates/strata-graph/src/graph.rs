//! Multi-track mixer graph: inserts feed sends and the master bus.
//!
//! Each audio block runs the five-step per-insert algorithm — `input →
//! chain → gain → pan → (latency-comp-delay) → sum_to_master` — then
//! processes the accumulated master bus through its own chain and gain.

use std::collections::HashMap;

use strata_config::EffectChain;
use strata_core::{Effect, SmoothedParam};

use crate::error::EngineError;
use crate::insert::MixerInsert;

/// The mixer graph: a flat set of inserts (no nested buses beyond the
/// single master) plus the master bus itself.
///
/// Latency compensation works the same way `strata-core`'s
/// `ProcessingGraph` compensates parallel DAG paths: each insert reports
/// [`MixerInsert::latency_samples`], the graph takes the max across all
/// inserts, and every insert whose own latency is shorter gets a
/// [`strata_core::CompensationDelay`] sized to the difference so every
/// insert reaches the master bus in phase.
pub struct AudioGraph {
    inserts: Vec<MixerInsert>,
    next_insert_id: u32,
    master: EffectChain,
    master_gain: SmoothedParam,
    sample_rate: f32,
    block_size: usize,
    /// Per-target-insert send taps accumulated by the last `process_block`
    /// call. Buffers are sized once (on insert add / block-size change) so
    /// the per-block accumulation loop itself never allocates.
    pending_sends: HashMap<u32, (Vec<f32>, Vec<f32>)>,
}

impl AudioGraph {
    /// Create a new, empty graph.
    pub fn new(sample_rate: f32, block_size: usize) -> Self {
        Self {
            inserts: Vec::new(),
            next_insert_id: 0,
            master: EffectChain::new(sample_rate),
            master_gain: SmoothedParam::standard(0.0, sample_rate),
            sample_rate,
            block_size,
            pending_sends: HashMap::new(),
        }
    }

    /// Add a new, empty insert and return its id.
    pub fn add_insert(&mut self, name: impl Into<String>) -> u32 {
        let id = self.next_insert_id;
        self.next_insert_id += 1;
        self.inserts.push(MixerInsert::new(id, name, self.sample_rate));
        self.pending_sends
            .insert(id, (vec![0.0; self.block_size], vec![0.0; self.block_size]));
        self.recompute_latency_compensation();
        id
    }

    /// Remove an insert by id.
    pub fn remove_insert(&mut self, id: u32) -> Result<(), EngineError> {
        let before = self.inserts.len();
        self.inserts.retain(|i| i.id() != id);
        if self.inserts.len() == before {
            return Err(EngineError::UnknownInsert(id));
        }
        self.pending_sends.remove(&id);
        self.recompute_latency_compensation();
        Ok(())
    }

    /// Borrow an insert by id.
    pub fn insert(&self, id: u32) -> Option<&MixerInsert> {
        self.inserts.iter().find(|i| i.id() == id)
    }

    /// Mutably borrow an insert by id.
    pub fn insert_mut(&mut self, id: u32) -> Option<&mut MixerInsert> {
        self.inserts.iter_mut().find(|i| i.id() == id)
    }

    /// Iterate all inserts.
    pub fn inserts(&self) -> impl Iterator<Item = &MixerInsert> {
        self.inserts.iter()
    }

    /// The master bus's own effect chain (e.g. final limiter/EQ).
    pub fn master_chain_mut(&mut self) -> &mut EffectChain {
        &mut self.master
    }

    /// Set master bus gain, dB.
    pub fn set_master_gain_db(&mut self, db: f32) {
        self.master_gain.set_target(db);
    }

    /// Call after any insert's effect chain changes (add/remove/reorder
    /// effect) to re-derive compensation delays across the graph. The
    /// spec requires this recompute to only ever shift scheduled event
    /// times earlier by up to `max_latency/sample_rate` seconds — the
    /// per-insert delay itself never changes what's emitted, only when.
    pub fn recompute_latency_compensation(&mut self) {
        let max_latency = self
            .inserts
            .iter()
            .map(MixerInsert::latency_samples)
            .max()
            .unwrap_or(0);

        if max_latency == 0 {
            for insert in &mut self.inserts {
                insert.set_compensation_delay(0);
            }
            return;
        }

        for insert in &mut self.inserts {
            let own = insert.latency_samples();
            insert.set_compensation_delay(max_latency - own);
        }
    }

    /// The combined latency of the slowest insert, in samples — the
    /// amount by which scheduled event times should be shifted earlier
    /// to keep the audible result phase-aligned with the transport.
    pub fn max_latency_samples(&self) -> usize {
        self.inserts
            .iter()
            .map(MixerInsert::latency_samples)
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for insert in &mut self.inserts {
            insert.set_sample_rate(sample_rate);
        }
        self.master.set_sample_rate(sample_rate);
        self.master_gain.set_sample_rate(sample_rate);
    }

    pub(crate) fn set_block_size(&mut self, block_size: usize) {
        self.block_size = block_size;
        for (_, (buf_l, buf_r)) in self.pending_sends.iter_mut() {
            buf_l.resize(block_size, 0.0);
            buf_r.resize(block_size, 0.0);
        }
    }

    /// Read the send-bus taps accumulated by the last `process_block` call
    /// for the given target insert (e.g. a shared reverb aux). Callers that
    /// model send buses add this into that insert's next-block input.
    pub fn send_accumulator(&self, target_id: u32) -> Option<(&[f32], &[f32])> {
        self.pending_sends
            .get(&target_id)
            .map(|(l, r)| (l.as_slice(), r.as_slice()))
    }

    /// Reset all insert and master state (used on transport stop/seek to
    /// avoid carrying stale filter/delay state across a discontinuity).
    pub fn reset(&mut self) {
        for insert in &mut self.inserts {
            insert.reset();
        }
        self.master.reset();
        self.master_gain.snap_to_target();
    }

    /// Process one block of per-insert dry inputs into the master bus
    /// output. `inputs` maps insert id to its dry stereo input block for
    /// this pass (instrument renders, or external input for an input
    /// insert); inserts without an entry in `inputs` process silence.
    pub fn process_block(
        &mut self,
        inputs: &HashMap<u32, (Vec<f32>, Vec<f32>)>,
        master_left: &mut [f32],
        master_right: &mut [f32],
    ) {
        let len = master_left.len().min(master_right.len()).min(self.block_size);
        master_left[..len].fill(0.0);
        master_right[..len].fill(0.0);

        // Solo: if any insert is soloed, only soloed (or solo-safe)
        // inserts reach the master bus this block.
        let any_solo = self.inserts.iter().any(MixerInsert::is_solo);

        // Sends accumulate into pre-sized buffers (one per insert, grown
        // only on `add_insert`/`set_block_size`) so this per-block loop
        // never allocates, even though a send's target insert (e.g. a
        // shared reverb bus) receives pre/post-fader taps from every
        // other insert before its own chain runs.
        for (_, (buf_l, buf_r)) in self.pending_sends.iter_mut() {
            buf_l[..len].fill(0.0);
            buf_r[..len].fill(0.0);
        }

        for insert in &mut self.inserts {
            let silent = (Vec::new(), Vec::new());
            let (in_l, in_r) = inputs.get(&insert.id()).unwrap_or(&silent);

            let audible = !insert.is_muted() && (!any_solo || insert.is_solo() || insert.is_solo_safe());

            for i in 0..len {
                let left_in = in_l.get(i).copied().unwrap_or(0.0);
                let right_in = in_r.get(i).copied().unwrap_or(0.0);
                let (post_l, post_r, dry_l, dry_r) = insert.process_sample(left_in, right_in);

                if !audible {
                    continue;
                }

                master_left[i] += post_l;
                master_right[i] += post_r;

                for send in insert.sends() {
                    let (tap_l, tap_r) = if send.pre_fader { (dry_l, dry_r) } else { (post_l, post_r) };
                    if let Some((buf_l, buf_r)) = self.pending_sends.get_mut(&send.target_id) {
                        buf_l[i] += tap_l * send.level;
                        buf_r[i] += tap_r * send.level;
                    }
                }
            }
        }

        for i in 0..len {
            let (l, r) = self.master.process_stereo(master_left[i], master_right[i]);
            let gain = strata_core::db_to_linear(self.master_gain.advance());
            master_left[i] = l * gain;
            master_right[i] = r * gain;
        }
    }
}
