//! Mixer insert: one track's `input → chain → gain → pan →
//! (latency-comp-delay) → sum_to_master` path.

use strata_config::{EffectChain, EffectConfig};
use strata_core::{CompensationDelay, Effect, SmoothedParam};
use strata_registry::EffectWithParams;

use crate::error::EngineError;

/// Maximum effect chain depth on a single insert (spec's §4.4 bound).
pub const MAX_CHAIN_DEPTH: usize = 8;

/// A post-fader or pre-fader send to another insert (typically a bus).
#[derive(Debug, Clone, Copy)]
pub struct Send {
    /// Target insert id.
    pub target_id: u32,
    /// Send level, linear gain.
    pub level: f32,
    /// If true, tapped before the fader/pan stage rather than after.
    pub pre_fader: bool,
}

/// One channel strip in the mixer: an effect chain, fader, pan, and the
/// sends that feed other inserts (typically an aux/reverb bus).
///
/// `solo_safe` inserts (e.g. a shared reverb return) stay audible even
/// when other inserts are soloed, matching the spec's solo/mute contract.
pub struct MixerInsert {
    id: u32,
    name: String,
    chain: EffectChain,
    gain_db: SmoothedParam,
    pan: SmoothedParam,
    sends: Vec<Send>,
    muted: bool,
    solo: bool,
    solo_safe: bool,
    compensation: Option<CompensationDelay>,
    sample_rate: f32,
}

impl MixerInsert {
    /// Create a new, empty insert at unity gain and centered pan.
    pub fn new(id: u32, name: impl Into<String>, sample_rate: f32) -> Self {
        Self {
            id,
            name: name.into(),
            chain: EffectChain::new(sample_rate),
            gain_db: SmoothedParam::standard(0.0, sample_rate),
            pan: SmoothedParam::standard(0.0, sample_rate),
            sends: Vec::new(),
            muted: false,
            solo: false,
            solo_safe: false,
            compensation: None,
            sample_rate,
        }
    }

    /// Insert id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Insert display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename this insert.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Set fader gain, dB.
    pub fn set_gain_db(&mut self, db: f32) {
        self.gain_db.set_target(db);
    }

    /// Set pan, -1 (left) to 1 (right).
    pub fn set_pan(&mut self, pan: f32) {
        self.pan.set_target(pan.clamp(-1.0, 1.0));
    }

    /// Mute/unmute this insert (independent of solo).
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Solo/unsolo this insert.
    pub fn set_solo(&mut self, solo: bool) {
        self.solo = solo;
    }

    /// Mark this insert as solo-safe: it stays audible even when other
    /// inserts in the graph are soloed.
    pub fn set_solo_safe(&mut self, solo_safe: bool) {
        self.solo_safe = solo_safe;
    }

    /// Whether this insert is soloed.
    pub fn is_solo(&self) -> bool {
        self.solo
    }

    /// Whether this insert is solo-safe.
    pub fn is_solo_safe(&self) -> bool {
        self.solo_safe
    }

    /// Whether this insert is explicitly muted.
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Add a send to another insert.
    pub fn add_send(&mut self, target_id: u32, level: f32, pre_fader: bool) {
        self.sends.push(Send {
            target_id,
            level,
            pre_fader,
        });
    }

    /// Remove all sends targeting `target_id`.
    pub fn remove_send(&mut self, target_id: u32) {
        self.sends.retain(|s| s.target_id != target_id);
    }

    /// Current send list.
    pub fn sends(&self) -> &[Send] {
        &self.sends
    }

    /// Append an effect by registry id.
    pub fn add_effect(&mut self, effect_type: &str) -> Result<(), EngineError> {
        if self.chain.len() >= MAX_CHAIN_DEPTH {
            return Err(EngineError::ChainFull {
                insert_id: self.id,
                max_depth: MAX_CHAIN_DEPTH,
            });
        }
        self.chain
            .add_effect(effect_type)
            .map_err(|_| EngineError::UnknownEffectKind(effect_type.to_string()))
    }

    /// Append an effect from a full configuration (type + bypass + params).
    pub fn add_effect_config(&mut self, config: &EffectConfig) -> Result<(), EngineError> {
        if self.chain.len() >= MAX_CHAIN_DEPTH {
            return Err(EngineError::ChainFull {
                insert_id: self.id,
                max_depth: MAX_CHAIN_DEPTH,
            });
        }
        self.chain
            .add_effect_config(config)
            .map_err(|_| EngineError::UnknownEffectKind(config.effect_type.clone()))
    }

    /// Remove the effect at `index`.
    pub fn remove_effect(&mut self, index: usize) -> bool {
        self.chain.remove(index).is_some()
    }

    /// Move the effect at `from` to position `to`.
    pub fn reorder_effect(&mut self, from: usize, to: usize) -> bool {
        self.chain.move_effect(from, to)
    }

    /// Set a parameter on the effect at `index`. Out-of-range values are
    /// clamped and applied; unknown names are ignored. Both are recoverable
    /// conditions per the engine's error policy — this always returns `Ok`,
    /// logging a warning rather than failing the caller's request. Only a
    /// missing effect at `index` is reported, since there's nothing to warn
    /// about applying to.
    pub fn set_effect_param(
        &mut self,
        index: usize,
        param_name: &str,
        value: f32,
    ) -> Result<(), EngineError> {
        let Some(effect) = self.chain.get_effect_mut(index) else {
            return Err(EngineError::UnknownParameter(param_name.to_string(), index));
        };

        let lower = param_name.to_lowercase();
        let mut found = None;
        for i in 0..effect.effect_param_count() {
            if let Some(desc) = effect.effect_param_info(i)
                && (desc.name.to_lowercase() == lower || desc.short_name.to_lowercase() == lower)
            {
                found = Some((i, desc.min, desc.max));
                break;
            }
        }

        let Some((param_index, min, max)) = found else {
            tracing::warn!(insert = self.id, index, param = param_name, "unknown parameter, ignored");
            return Ok(());
        };

        let clamped = value.clamp(min, max);
        effect.effect_set_param(param_index, clamped);

        if (clamped - value).abs() > f32::EPSILON {
            tracing::warn!(
                insert = self.id,
                index,
                param = param_name,
                value,
                min,
                max,
                "parameter out of range, clamped"
            );
        }
        Ok(())
    }

    /// Toggle bypass on the effect at `index`.
    pub fn set_effect_bypassed(&mut self, index: usize, bypassed: bool) -> bool {
        self.chain.set_bypassed(index, bypassed)
    }

    /// Total reported latency of this insert's effect chain, in samples.
    pub fn latency_samples(&self) -> usize {
        self.chain.latency_samples()
    }

    /// Install (or clear, with `0`) the compensating delay used to align
    /// this insert with the slowest parallel path in the graph.
    pub(crate) fn set_compensation_delay(&mut self, delay_samples: usize) {
        self.compensation = if delay_samples == 0 {
            None
        } else {
            Some(CompensationDelay::new(delay_samples))
        };
    }

    pub(crate) fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.chain.set_sample_rate(sample_rate);
        self.gain_db.set_sample_rate(sample_rate);
        self.pan.set_sample_rate(sample_rate);
    }

    /// Run one sample through chain → gain → pan → compensation delay.
    /// Returns the post-fader stereo pair and, separately, the pre-fader
    /// dry sum (for pre-fader sends).
    pub(crate) fn process_sample(&mut self, left_in: f32, right_in: f32) -> (f32, f32, f32, f32) {
        let (dry_l, dry_r) = self.chain.process_stereo(left_in, right_in);

        let gain = strata_core::db_to_linear(self.gain_db.advance());
        let pan = self.pan.advance();
        // Equal-power pan law: pan in [-1, 1] maps to a quarter-turn sweep.
        let angle = (pan + 1.0) * 0.25 * core::f32::consts::PI;
        let (pan_l, pan_r) = (angle.cos(), angle.sin());

        let post_l = dry_l * gain * pan_l;
        let post_r = dry_r * gain * pan_r;

        let (comp_l, comp_r) = match &mut self.compensation {
            Some(delay) => delay.process(post_l, post_r),
            None => (post_l, post_r),
        };

        (comp_l, comp_r, dry_l, dry_r)
    }

    pub(crate) fn reset(&mut self) {
        self.chain.reset();
        self.gain_db.snap_to_target();
        self.pan.snap_to_target();
        if let Some(delay) = &mut self.compensation {
            delay.clear();
        }
    }
}
