//! Effect factory and parameter parsing.

use strata_core::{Effect, ParameterInfo};
use strata_effects::{
    Chorus, Compressor, ConvolutionReverb, Distortion, FreeverbReverb, Imager, LowPassFilter,
    Maximizer, ModernDelay, MultibandEq, RoomSize, WaveShape, Waveshaper, WaveshaperCurve,
};
use std::collections::HashMap;

/// Error type for effect creation.
#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    #[error("Unknown effect: {0}")]
    UnknownEffect(String),

    #[error("Unknown parameter '{param}' for effect '{effect}'")]
    UnknownParameter { effect: String, param: String },

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidValue { param: String, message: String },

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Information about an available effect.
#[derive(Debug, Clone)]
pub struct EffectInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: &'static [ParameterInfo],
}

/// Information about an effect parameter.
#[derive(Debug, Clone)]
pub struct ParameterInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub default: &'static str,
    pub range: &'static str,
}

/// Get information about all available effects.
pub fn available_effects() -> Vec<EffectInfo> {
    vec![
        EffectInfo {
            name: "distortion",
            description: "Waveshaping distortion with multiple modes",
            parameters: &[
                ParameterInfo {
                    name: "drive",
                    description: "Drive amount in dB",
                    default: "12.0",
                    range: "0-40",
                },
                ParameterInfo {
                    name: "tone",
                    description: "Tone control gain in dB",
                    default: "0.0",
                    range: "-12-12",
                },
                ParameterInfo {
                    name: "output",
                    description: "Output level in dB",
                    default: "0.0",
                    range: "-20-20",
                },
                ParameterInfo {
                    name: "waveshape",
                    description: "Waveshape type",
                    default: "softclip",
                    range: "softclip|hardclip|foldback|asymmetric",
                },
                ParameterInfo {
                    name: "mix",
                    description: "Wet/dry mix (0-1)",
                    default: "1.0",
                    range: "0-1",
                },
            ],
        },
        EffectInfo {
            name: "compressor",
            description: "Dynamics compressor with soft knee",
            parameters: &[
                ParameterInfo {
                    name: "threshold",
                    description: "Threshold in dB",
                    default: "-20.0",
                    range: "-60-0",
                },
                ParameterInfo {
                    name: "ratio",
                    description: "Compression ratio",
                    default: "4.0",
                    range: "1-20",
                },
                ParameterInfo {
                    name: "attack",
                    description: "Attack time in ms",
                    default: "5.0",
                    range: "0.1-100",
                },
                ParameterInfo {
                    name: "release",
                    description: "Release time in ms",
                    default: "50.0",
                    range: "10-1000",
                },
                ParameterInfo {
                    name: "knee",
                    description: "Soft knee width in dB",
                    default: "6.0",
                    range: "0-12",
                },
                ParameterInfo {
                    name: "makeup",
                    description: "Makeup gain in dB",
                    default: "0.0",
                    range: "0-24",
                },
            ],
        },
        EffectInfo {
            name: "chorus",
            description: "Dual-voice modulated delay chorus",
            parameters: &[
                ParameterInfo {
                    name: "rate",
                    description: "LFO rate in Hz",
                    default: "1.0",
                    range: "0.1-10",
                },
                ParameterInfo {
                    name: "depth",
                    description: "Modulation depth (0-1)",
                    default: "0.5",
                    range: "0-1",
                },
                ParameterInfo {
                    name: "mix",
                    description: "Wet/dry mix (0-1)",
                    default: "0.5",
                    range: "0-1",
                },
            ],
        },
        EffectInfo {
            name: "delay",
            description: "Stereo delay with ping-pong cross-feed and diffusion",
            parameters: &[
                ParameterInfo {
                    name: "time_l",
                    description: "Left delay time in ms",
                    default: "375.0",
                    range: "1-4000",
                },
                ParameterInfo {
                    name: "time_r",
                    description: "Right delay time in ms",
                    default: "500.0",
                    range: "1-4000",
                },
                ParameterInfo {
                    name: "feedback_l",
                    description: "Left feedback amount (0-1)",
                    default: "0.4",
                    range: "0-0.95",
                },
                ParameterInfo {
                    name: "feedback_r",
                    description: "Right feedback amount (0-1)",
                    default: "0.4",
                    range: "0-0.95",
                },
                ParameterInfo {
                    name: "cross",
                    description: "Ping-pong cross-feed amount (0-1)",
                    default: "0.5",
                    range: "0-1",
                },
                ParameterInfo {
                    name: "mix",
                    description: "Wet/dry mix (0-1)",
                    default: "0.5",
                    range: "0-1",
                },
                ParameterInfo {
                    name: "filter_freq",
                    description: "Feedback-path lowpass frequency in Hz",
                    default: "8000.0",
                    range: "200-18000",
                },
            ],
        },
        EffectInfo {
            name: "filter",
            description: "Resonant lowpass filter",
            parameters: &[
                ParameterInfo {
                    name: "cutoff",
                    description: "Cutoff frequency in Hz",
                    default: "1000.0",
                    range: "20-20000",
                },
                ParameterInfo {
                    name: "resonance",
                    description: "Resonance (Q)",
                    default: "0.707",
                    range: "0.1-20",
                },
            ],
        },
        EffectInfo {
            name: "reverb",
            description: "Freeverb-style algorithmic reverb",
            parameters: &[
                ParameterInfo {
                    name: "room_size",
                    description: "Room size (0-1)",
                    default: "0.5",
                    range: "0-1",
                },
                ParameterInfo {
                    name: "damping",
                    description: "HF damping (0-1, 0=bright, 1=dark)",
                    default: "0.5",
                    range: "0-1",
                },
                ParameterInfo {
                    name: "early_late",
                    description: "Early reflections / late tail balance (0-1)",
                    default: "0.3",
                    range: "0-1",
                },
                ParameterInfo {
                    name: "predelay",
                    description: "Pre-delay in ms",
                    default: "0.0",
                    range: "0-200",
                },
                ParameterInfo {
                    name: "mix",
                    description: "Wet/dry mix (0-1)",
                    default: "0.5",
                    range: "0-1",
                },
            ],
        },
        EffectInfo {
            name: "convolution_reverb",
            description: "Procedurally generated impulse response reverb",
            parameters: &[
                ParameterInfo {
                    name: "room",
                    description: "Room shape preset",
                    default: "hall",
                    range: "chamber|room|hall|cathedral",
                },
                ParameterInfo {
                    name: "size",
                    description: "Room size (0-1)",
                    default: "0.5",
                    range: "0-1",
                },
                ParameterInfo {
                    name: "decay",
                    description: "Decay time (0-1)",
                    default: "0.5",
                    range: "0-1",
                },
                ParameterInfo {
                    name: "damping",
                    description: "HF damping (0-1)",
                    default: "0.5",
                    range: "0-1",
                },
                ParameterInfo {
                    name: "mix",
                    description: "Wet/dry mix (0-1)",
                    default: "0.5",
                    range: "0-1",
                },
            ],
        },
        EffectInfo {
            name: "waveshaper",
            description: "Lookup-table waveshaping distortion with oversampling",
            parameters: &[
                ParameterInfo {
                    name: "drive",
                    description: "Drive amount",
                    default: "1.0",
                    range: "0.1-20",
                },
                ParameterInfo {
                    name: "curve",
                    description: "Waveshaping curve",
                    default: "tanh",
                    range: "tanh|hardclip|foldback|sine",
                },
                ParameterInfo {
                    name: "mix",
                    description: "Wet/dry mix (0-1)",
                    default: "0.5",
                    range: "0-1",
                },
                ParameterInfo {
                    name: "output",
                    description: "Output gain",
                    default: "1.0",
                    range: "0-2",
                },
            ],
        },
        EffectInfo {
            name: "maximizer",
            description: "Brick-wall loudness maximizer",
            parameters: &[
                ParameterInfo {
                    name: "input_gain",
                    description: "Input gain in dB",
                    default: "0.0",
                    range: "-12-12",
                },
                ParameterInfo {
                    name: "drive",
                    description: "Saturation drive",
                    default: "1.0",
                    range: "1-5",
                },
                ParameterInfo {
                    name: "ceiling",
                    description: "Output ceiling in dB",
                    default: "-0.3",
                    range: "-12-0",
                },
                ParameterInfo {
                    name: "release",
                    description: "Release time in ms",
                    default: "100.0",
                    range: "10-1000",
                },
            ],
        },
        EffectInfo {
            name: "imager",
            description: "Mid/side stereo width control",
            parameters: &[ParameterInfo {
                name: "width",
                description: "Stereo width (0=mono, 1=unity, 2=wide)",
                default: "1.0",
                range: "0-2",
            }],
        },
        EffectInfo {
            name: "multiband_eq",
            description: "Configurable-band equalizer",
            parameters: &[],
        },
    ]
}

/// Create an effect with custom parameters.
pub fn create_effect_with_params(
    name: &str,
    sample_rate: f32,
    params: &HashMap<String, String>,
) -> Result<Box<dyn Effect + Send>, EffectError> {
    match name.to_lowercase().as_str() {
        "distortion" => {
            let mut effect = Distortion::new(sample_rate);
            for (key, value) in params {
                match key.as_str() {
                    "drive" => effect.set_drive_db(parse_f32(key, value)?),
                    "tone" => effect.set_tone_db(parse_f32(key, value)?),
                    "output" | "level" => effect.set_param(2, parse_f32(key, value)?),
                    "waveshape" | "shape" => effect.set_waveshape(parse_waveshape(value)?),
                    "mix" => effect.set_mix(parse_f32(key, value)?),
                    _ => {
                        return Err(EffectError::UnknownParameter {
                            effect: name.to_string(),
                            param: key.to_string(),
                        });
                    }
                }
            }
            Ok(Box::new(effect))
        }
        "compressor" => {
            let mut effect = Compressor::new(sample_rate);
            for (key, value) in params {
                match key.as_str() {
                    "threshold" => effect.set_threshold_db(parse_f32(key, value)?),
                    "ratio" => effect.set_ratio(parse_f32(key, value)?),
                    "attack" => effect.set_attack_ms(parse_f32(key, value)?),
                    "release" => effect.set_release_ms(parse_f32(key, value)?),
                    "knee" => effect.set_knee_db(parse_f32(key, value)?),
                    "makeup" => effect.set_makeup_gain_db(parse_f32(key, value)?),
                    _ => {
                        return Err(EffectError::UnknownParameter {
                            effect: name.to_string(),
                            param: key.to_string(),
                        });
                    }
                }
            }
            Ok(Box::new(effect))
        }
        "chorus" => {
            let mut effect = Chorus::new(sample_rate);
            for (key, value) in params {
                match key.as_str() {
                    "rate" => effect.set_rate(parse_f32(key, value)?),
                    "depth" => effect.set_depth(parse_f32(key, value)?),
                    "mix" => effect.set_mix(parse_f32(key, value)?),
                    _ => {
                        return Err(EffectError::UnknownParameter {
                            effect: name.to_string(),
                            param: key.to_string(),
                        });
                    }
                }
            }
            Ok(Box::new(effect))
        }
        "delay" => {
            let mut effect = ModernDelay::new(sample_rate);
            for (key, value) in params {
                match key.as_str() {
                    "time_l" | "time" => effect.set_time_l_ms(parse_f32(key, value)?),
                    "time_r" => effect.set_time_r_ms(parse_f32(key, value)?),
                    "feedback_l" | "feedback" => effect.set_feedback_l(parse_f32(key, value)?),
                    "feedback_r" => effect.set_feedback_r(parse_f32(key, value)?),
                    "cross" => effect.set_cross(parse_f32(key, value)?),
                    "mix" => effect.set_mix(parse_f32(key, value)?),
                    "filter_freq" | "filter" => effect.set_filter_freq(parse_f32(key, value)?),
                    _ => {
                        return Err(EffectError::UnknownParameter {
                            effect: name.to_string(),
                            param: key.to_string(),
                        });
                    }
                }
            }
            Ok(Box::new(effect))
        }
        "filter" | "lowpass" => {
            let mut effect = LowPassFilter::new(sample_rate);
            for (key, value) in params {
                match key.as_str() {
                    "cutoff" => effect.set_cutoff_hz(parse_f32(key, value)?),
                    "resonance" | "q" => effect.set_q(parse_f32(key, value)?),
                    _ => {
                        return Err(EffectError::UnknownParameter {
                            effect: name.to_string(),
                            param: key.to_string(),
                        });
                    }
                }
            }
            Ok(Box::new(effect))
        }
        "reverb" => {
            let mut effect = FreeverbReverb::new(sample_rate);
            for (key, value) in params {
                match key.as_str() {
                    "room_size" | "room" | "size" => effect.set_room_size(parse_f32(key, value)?),
                    "damping" | "damp" => effect.set_damping(parse_f32(key, value)?),
                    "early_late" => effect.set_early_late_mix(parse_f32(key, value)?),
                    "predelay" | "pre" => effect.set_predelay_ms(parse_f32(key, value)?),
                    "mix" => effect.set_mix(parse_f32(key, value)?),
                    _ => {
                        return Err(EffectError::UnknownParameter {
                            effect: name.to_string(),
                            param: key.to_string(),
                        });
                    }
                }
            }
            Ok(Box::new(effect))
        }
        "convolution_reverb" | "convreverb" => {
            let mut effect = ConvolutionReverb::new(sample_rate);
            for (key, value) in params {
                match key.as_str() {
                    "room" => effect.set_room(parse_room_size(value)?),
                    "size" => effect.set_size(parse_f32(key, value)?),
                    "decay" => effect.set_decay(parse_f32(key, value)?),
                    "damping" | "damp" => effect.set_damping(parse_f32(key, value)?),
                    "mix" => effect.set_mix(parse_f32(key, value)?),
                    _ => {
                        return Err(EffectError::UnknownParameter {
                            effect: name.to_string(),
                            param: key.to_string(),
                        });
                    }
                }
            }
            Ok(Box::new(effect))
        }
        "waveshaper" => {
            let mut effect = Waveshaper::new(sample_rate);
            for (key, value) in params {
                match key.as_str() {
                    "drive" => effect.set_drive(parse_f32(key, value)?),
                    "curve" => effect.set_curve(parse_waveshaper_curve(value)?),
                    "mix" => effect.set_mix(parse_f32(key, value)?),
                    "output" => effect.set_output_gain(parse_f32(key, value)?),
                    _ => {
                        return Err(EffectError::UnknownParameter {
                            effect: name.to_string(),
                            param: key.to_string(),
                        });
                    }
                }
            }
            Ok(Box::new(effect))
        }
        "maximizer" => {
            let mut effect = Maximizer::new(sample_rate);
            for (key, value) in params {
                match key.as_str() {
                    "input_gain" => effect.set_input_gain_db(parse_f32(key, value)?),
                    "drive" => effect.set_drive(parse_f32(key, value)?),
                    "ceiling" => effect.set_ceiling_db(parse_f32(key, value)?),
                    "release" => effect.set_release_ms(parse_f32(key, value)?),
                    _ => {
                        return Err(EffectError::UnknownParameter {
                            effect: name.to_string(),
                            param: key.to_string(),
                        });
                    }
                }
            }
            Ok(Box::new(effect))
        }
        "imager" => {
            let mut effect = Imager::new(sample_rate);
            for (key, value) in params {
                match key.as_str() {
                    "width" => effect.set_width(parse_f32(key, value)?),
                    _ => {
                        return Err(EffectError::UnknownParameter {
                            effect: name.to_string(),
                            param: key.to_string(),
                        });
                    }
                }
            }
            Ok(Box::new(effect))
        }
        "multiband_eq" | "eq" | "mbeq" => {
            let effect = MultibandEq::new(sample_rate);
            if let Some((key, _)) = params.iter().next() {
                return Err(EffectError::UnknownParameter {
                    effect: name.to_string(),
                    param: key.to_string(),
                });
            }
            Ok(Box::new(effect))
        }
        _ => Err(EffectError::UnknownEffect(name.to_string())),
    }
}

/// Parse an effect chain specification.
///
/// Format: "effect1:param1=value1,param2=value2|effect2:param=value"
///
/// Examples:
/// - "distortion:drive=15"
/// - "compressor:threshold=-18|distortion:drive=12|delay:time_l=300,feedback_l=0.4"
pub fn parse_chain(
    spec: &str,
    sample_rate: f32,
) -> Result<Vec<Box<dyn Effect + Send>>, EffectError> {
    let mut effects = Vec::new();

    for effect_spec in spec.split('|') {
        let effect_spec = effect_spec.trim();
        if effect_spec.is_empty() {
            continue;
        }

        let (name, params) = parse_effect_spec(effect_spec)?;
        let effect = create_effect_with_params(&name, sample_rate, &params)?;
        effects.push(effect);
    }

    Ok(effects)
}

/// Parse a single effect specification.
///
/// Format: "effect_name:param1=value1,param2=value2"
fn parse_effect_spec(spec: &str) -> Result<(String, HashMap<String, String>), EffectError> {
    let parts: Vec<&str> = spec.splitn(2, ':').collect();
    let name = parts[0].trim().to_string();

    let params = if parts.len() > 1 {
        parse_params(parts[1])?
    } else {
        HashMap::new()
    };

    Ok((name, params))
}

/// Parse parameter string into a map.
fn parse_params(params_str: &str) -> Result<HashMap<String, String>, EffectError> {
    let mut params = HashMap::new();

    for param in params_str.split(',') {
        let param = param.trim();
        if param.is_empty() {
            continue;
        }

        let kv: Vec<&str> = param.splitn(2, '=').collect();
        if kv.len() != 2 {
            return Err(EffectError::ParseError(format!(
                "Invalid parameter format: '{}' (expected key=value)",
                param
            )));
        }

        params.insert(kv[0].trim().to_string(), kv[1].trim().to_string());
    }

    Ok(params)
}

fn parse_f32(param: &str, value: &str) -> Result<f32, EffectError> {
    value.parse().map_err(|_| EffectError::InvalidValue {
        param: param.to_string(),
        message: format!("'{}' is not a valid number", value),
    })
}

fn parse_waveshape(value: &str) -> Result<WaveShape, EffectError> {
    match value.to_lowercase().as_str() {
        "softclip" | "soft" => Ok(WaveShape::SoftClip),
        "hardclip" | "hard" => Ok(WaveShape::HardClip),
        "foldback" | "fold" => Ok(WaveShape::Foldback),
        "asymmetric" | "asym" => Ok(WaveShape::Asymmetric),
        _ => Err(EffectError::InvalidValue {
            param: "waveshape".to_string(),
            message: format!(
                "'{}' is not a valid waveshape (use: softclip, hardclip, foldback, asymmetric)",
                value
            ),
        }),
    }
}

fn parse_waveshaper_curve(value: &str) -> Result<WaveshaperCurve, EffectError> {
    match value.to_lowercase().as_str() {
        "tanh" => Ok(WaveshaperCurve::Tanh),
        "hardclip" | "hard" => Ok(WaveshaperCurve::HardClip),
        "foldback" | "fold" => Ok(WaveshaperCurve::Foldback),
        "sine" | "sin" => Ok(WaveshaperCurve::Sine),
        _ => Err(EffectError::InvalidValue {
            param: "curve".to_string(),
            message: format!(
                "'{}' is not a valid curve (use: tanh, hardclip, foldback, sine)",
                value
            ),
        }),
    }
}

fn parse_room_size(value: &str) -> Result<RoomSize, EffectError> {
    match value.to_lowercase().as_str() {
        "chamber" => Ok(RoomSize::Chamber),
        "room" => Ok(RoomSize::Room),
        "hall" => Ok(RoomSize::Hall),
        "cathedral" => Ok(RoomSize::Cathedral),
        _ => Err(EffectError::InvalidValue {
            param: "room".to_string(),
            message: format!(
                "'{}' is not a valid room (use: chamber, room, hall, cathedral)",
                value
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_effect_with_params() {
        let params = HashMap::new();
        let effect = create_effect_with_params("distortion", 48000.0, &params);
        assert!(effect.is_ok());

        let effect = create_effect_with_params("unknown", 48000.0, &params);
        assert!(effect.is_err());
    }

    #[test]
    fn test_parse_params() {
        let params = parse_params("drive=15,tone=4").unwrap();
        assert_eq!(params.get("drive"), Some(&"15".to_string()));
        assert_eq!(params.get("tone"), Some(&"4".to_string()));
    }

    #[test]
    fn test_parse_effect_spec() {
        let (name, params) = parse_effect_spec("distortion:drive=15,tone=-2").unwrap();
        assert_eq!(name, "distortion");
        assert_eq!(params.get("drive"), Some(&"15".to_string()));
        assert_eq!(params.get("tone"), Some(&"-2".to_string()));
    }

    #[test]
    fn test_parse_chain() {
        let chain = parse_chain(
            "compressor:threshold=-18|distortion:drive=12|delay:time_l=300",
            48000.0,
        );
        assert!(chain.is_ok());
        assert_eq!(chain.unwrap().len(), 3);
    }

    #[test]
    fn test_parse_chain_simple() {
        let chain = parse_chain("distortion", 48000.0);
        assert!(chain.is_ok());
        assert_eq!(chain.unwrap().len(), 1);
    }

    #[test]
    fn test_create_reverb() {
        let params = HashMap::new();
        let effect = create_effect_with_params("reverb", 48000.0, &params);
        assert!(effect.is_ok());

        // Test with parameters
        let mut params = HashMap::new();
        params.insert("room_size".to_string(), "0.7".to_string());
        params.insert("damping".to_string(), "0.3".to_string());
        params.insert("mix".to_string(), "0.5".to_string());
        let effect = create_effect_with_params("reverb", 48000.0, &params);
        assert!(effect.is_ok());
    }

    #[test]
    fn test_parse_chain_with_reverb() {
        let chain = parse_chain("delay:time_l=300|reverb:damping=0.9,mix=0.6", 48000.0);
        assert!(chain.is_ok());
        assert_eq!(chain.unwrap().len(), 2);
    }

    #[test]
    fn test_create_multiband_eq() {
        let params = HashMap::new();
        let effect = create_effect_with_params("multiband_eq", 48000.0, &params);
        assert!(effect.is_ok());
    }
}
