//! Effect chain management.
//!
//! This module provides the `EffectChain` type which manages a chain of audio
//! effects that can be processed as a unit. Effects can be created from a preset
//! or built programmatically.
//!
//! # Example
//!
//! ```rust,no_run
//! use strata_config::{EffectChain, Preset, EffectConfig};
//! use strata_core::Effect;
//!
//! // Create from a preset
//! let preset = Preset::new("My Chain")
//!     .with_effect(EffectConfig::new("distortion").with_param("drive", "0.7"))
//!     .with_effect(EffectConfig::new("reverb"));
//!
//! let mut chain = EffectChain::from_preset(&preset, 48000.0).unwrap();
//!
//! // Process audio
//! let output = chain.process(0.5);
//! ```

use strata_core::Effect;
use strata_registry::{EffectRegistry, EffectWithParams};

use crate::effect_config::EffectConfig;
use crate::error::ConfigError;
use crate::preset::Preset;
use crate::validation::validate_effect;

/// An entry in the effect chain.
struct ChainEntry {
    /// The effect instance.
    effect: Box<dyn EffectWithParams + Send>,
    /// Whether the effect is bypassed.
    bypassed: bool,
    /// The effect type name.
    effect_type: String,
}

/// A chain of effects that can be processed as a unit.
///
/// The chain processes audio through each effect in sequence, respecting
/// bypass states. It implements the `Effect` trait so it can be used
/// anywhere a single effect can be used.
pub struct EffectChain {
    /// Effects in the chain.
    entries: Vec<ChainEntry>,
    /// The current sample rate.
    sample_rate: f32,
    /// Registry for creating effects.
    registry: EffectRegistry,
}

impl EffectChain {
    /// Create a new empty effect chain.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            entries: Vec::new(),
            sample_rate,
            registry: EffectRegistry::new(),
        }
    }

    /// Create an effect chain from a preset.
    ///
    /// Creates each effect in the preset and configures its parameters.
    /// Invalid effect types will result in an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownEffect` if an effect type is not recognized.
    pub fn from_preset(preset: &Preset, sample_rate: f32) -> Result<Self, ConfigError> {
        let mut chain = Self::new(sample_rate);

        for effect_config in &preset.effects {
            chain.add_effect_config(effect_config)?;
        }

        Ok(chain)
    }

    /// Create an effect chain from effect type strings.
    ///
    /// Effect types can be prefixed with `!` to bypass them.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use strata_config::EffectChain;
    ///
    /// // Create a chain with distortion active and reverb bypassed
    /// let chain = EffectChain::from_effect_types(
    ///     &["distortion", "!reverb"],
    ///     48000.0
    /// ).unwrap();
    /// ```
    pub fn from_effect_types(types: &[&str], sample_rate: f32) -> Result<Self, ConfigError> {
        let mut chain = Self::new(sample_rate);

        for effect_type in types {
            let config = EffectConfig::new(*effect_type);
            chain.add_effect_config(&config)?;
        }

        Ok(chain)
    }

    /// Add an effect from a configuration.
    pub fn add_effect_config(&mut self, config: &EffectConfig) -> Result<(), ConfigError> {
        let effect_type = config.canonical_type();

        // Validate the effect type
        validate_effect(effect_type).map_err(|e| ConfigError::Validation(e))?;

        // Create the effect
        let mut effect = self.registry.create(effect_type, self.sample_rate)
            .ok_or_else(|| ConfigError::UnknownEffect(effect_type.to_string()))?;

        // Apply parameters
        self.apply_params(&mut effect, config)?;

        self.entries.push(ChainEntry {
            effect,
            bypassed: config.bypassed,
            effect_type: effect_type.to_string(),
        });

        Ok(())
    }

    /// Apply parameters from config to an effect, matching by parameter
    /// name (case-insensitively, against either the full or short name).
    fn apply_params(
        &self,
        effect: &mut Box<dyn EffectWithParams + Send>,
        config: &EffectConfig,
    ) -> Result<(), ConfigError> {
        for (param_name, param_value) in &config.params {
            if let Some(value) = crate::effect_config::parse_param_value(param_value) {
                if let Some(idx) = Self::find_param_index(effect.as_ref(), param_name) {
                    effect.effect_set_param(idx, value);
                }
            }
        }

        Ok(())
    }

    /// Find a parameter's index by name, matching against either its full
    /// or short display name case-insensitively.
    fn find_param_index(effect: &dyn EffectWithParams, param_name: &str) -> Option<usize> {
        for idx in 0..effect.effect_param_count() {
            if let Some(desc) = effect.effect_param_info(idx) {
                if desc.name.eq_ignore_ascii_case(param_name)
                    || desc.short_name.eq_ignore_ascii_case(param_name)
                {
                    return Some(idx);
                }
            }
        }
        None
    }

    /// Add an effect by type name.
    ///
    /// Use `!` prefix to add as bypassed.
    pub fn add_effect(&mut self, effect_type: &str) -> Result<(), ConfigError> {
        let config = EffectConfig::new(effect_type);
        self.add_effect_config(&config)
    }

    /// Add an already-created effect instance.
    pub fn add_effect_instance(
        &mut self,
        effect: Box<dyn EffectWithParams + Send>,
        effect_type: &str,
        bypassed: bool,
    ) {
        self.entries.push(ChainEntry {
            effect,
            bypassed,
            effect_type: effect_type.to_string(),
        });
    }

    /// Get the sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Get the number of effects in the chain.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get effect types in the chain (with ! prefix for bypassed).
    pub fn effect_types(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| {
                if e.bypassed {
                    format!("!{}", e.effect_type)
                } else {
                    e.effect_type.clone()
                }
            })
            .collect()
    }

    /// Check if an effect at the given index is bypassed.
    pub fn is_bypassed(&self, index: usize) -> Option<bool> {
        self.entries.get(index).map(|e| e.bypassed)
    }

    /// Set the bypass state for an effect at the given index.
    pub fn set_bypassed(&mut self, index: usize, bypassed: bool) -> bool {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.bypassed = bypassed;
            true
        } else {
            false
        }
    }

    /// Toggle bypass for an effect at the given index.
    pub fn toggle_bypass(&mut self, index: usize) -> Option<bool> {
        self.entries.get_mut(index).map(|e| {
            e.bypassed = !e.bypassed;
            e.bypassed
        })
    }

    /// Remove an effect at the given index.
    pub fn remove(&mut self, index: usize) -> Option<Box<dyn EffectWithParams + Send>> {
        if index < self.entries.len() {
            Some(self.entries.remove(index).effect)
        } else {
            None
        }
    }

    /// Move an effect from one position to another, shifting the effects
    /// between the two positions to close the gap. Returns `false` if
    /// either index is out of range.
    pub fn move_effect(&mut self, from: usize, to: usize) -> bool {
        if from >= self.entries.len() || to >= self.entries.len() {
            return false;
        }
        if from == to {
            return true;
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        true
    }

    /// Clear all effects from the chain.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get the effect type at a given index.
    pub fn get_effect_type(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.effect_type.as_str())
    }

    /// Get an effect reference by index.
    pub fn get_effect(&self, index: usize) -> Option<&(dyn EffectWithParams + Send)> {
        self.entries.get(index).map(|e| e.effect.as_ref())
    }

    /// Get a mutable effect reference by index.
    pub fn get_effect_mut(&mut self, index: usize) -> Option<&mut (dyn EffectWithParams + Send)> {
        self.entries.get_mut(index).map(|e| e.effect.as_mut())
    }
}

impl Effect for EffectChain {
    fn process(&mut self, input: f32) -> f32 {
        let mut sample = input;
        for entry in &mut self.entries {
            if !entry.bypassed {
                sample = entry.effect.process(sample);
            }
        }
        sample
    }

    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        // Copy input to output first
        output.copy_from_slice(input);

        // Process through each non-bypassed effect
        for entry in &mut self.entries {
            if !entry.bypassed {
                // Use the effect's block processing if available
                // For in-place processing, we use a temporary buffer approach
                let len = output.len();
                for i in 0..len {
                    output[i] = entry.effect.process(output[i]);
                }
            }
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for entry in &mut self.entries {
            entry.effect.set_sample_rate(sample_rate);
        }
    }

    fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.effect.reset();
        }
    }

    fn latency_samples(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.bypassed)
            .map(|e| e.effect.latency_samples())
            .sum()
    }

    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let (mut l, mut r) = (left, right);
        for entry in &mut self.entries {
            if !entry.bypassed {
                (l, r) = entry.effect.process_stereo(l, r);
            }
        }
        (l, r)
    }

    fn process_block_stereo(
        &mut self,
        left_in: &[f32],
        right_in: &[f32],
        left_out: &mut [f32],
        right_out: &mut [f32],
    ) {
        left_out.copy_from_slice(left_in);
        right_out.copy_from_slice(right_in);
        for entry in &mut self.entries {
            if entry.bypassed {
                continue;
            }
            for i in 0..left_out.len() {
                let (l, r) = entry.effect.process_stereo(left_out[i], right_out[i]);
                left_out[i] = l;
                right_out[i] = r;
            }
        }
    }

    fn is_true_stereo(&self) -> bool {
        self.entries
            .iter()
            .any(|e| !e.bypassed && e.effect.is_true_stereo())
    }
}
