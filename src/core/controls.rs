use super::error::PadError;
use super::mapping::{EffectKind, SourceKind, Waveform};
use std::fmt;
use std::str::FromStr;

impl FromStr for EffectKind {
    type Err = PadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(EffectKind::None),
            "delay" => Ok(EffectKind::Delay),
            "reverb" => Ok(EffectKind::Reverb),
            "pitchshift" | "pitch-shift" | "pitch" => Ok(EffectKind::PitchShift),
            "lowpass" => Ok(EffectKind::Lowpass),
            other => Err(PadError::Config(format!("unknown effect '{}'", other))),
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EffectKind::None => "none",
            EffectKind::Delay => "delay",
            EffectKind::Reverb => "reverb",
            EffectKind::PitchShift => "pitchshift",
            EffectKind::Lowpass => "lowpass",
        })
    }
}

impl FromStr for Waveform {
    type Err = PadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sine" => Ok(Waveform::Sine),
            "triangle" => Ok(Waveform::Triangle),
            "square" => Ok(Waveform::Square),
            other => Err(PadError::Config(format!("unknown waveform '{}'", other))),
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Waveform::Sine => "sine",
            Waveform::Triangle => "triangle",
            Waveform::Square => "square",
        })
    }
}

impl FromStr for SourceKind {
    type Err = PadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oscillator" | "osc" => Ok(SourceKind::Oscillator),
            "mic" | "microphone" => Ok(SourceKind::Microphone),
            other => Err(PadError::Config(format!("unknown source '{}'", other))),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::Oscillator => "oscillator",
            SourceKind::Microphone => "microphone",
        })
    }
}

/// A control change requested from the keyboard or a form input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlCommand {
    Effect(EffectKind),
    Waveform(Waveform),
    ToggleSource,
    Source(SourceKind),
    Release,
}

#[inline]
pub fn effect_for_digit(key: &str) -> Option<EffectKind> {
    match key {
        "1" => Some(EffectKind::None),
        "2" => Some(EffectKind::Delay),
        "3" => Some(EffectKind::Reverb),
        "4" => Some(EffectKind::PitchShift),
        "5" => Some(EffectKind::Lowpass),
        _ => None,
    }
}

#[inline]
pub fn waveform_for_key(key: &str) -> Option<Waveform> {
    match key {
        "s" | "S" => Some(Waveform::Sine),
        "t" | "T" => Some(Waveform::Triangle),
        "q" | "Q" => Some(Waveform::Square),
        _ => None,
    }
}

pub fn command_for_key(key: &str) -> Option<ControlCommand> {
    if let Some(fx) = effect_for_digit(key) {
        return Some(ControlCommand::Effect(fx));
    }
    if let Some(wf) = waveform_for_key(key) {
        return Some(ControlCommand::Waveform(wf));
    }
    match key {
        "m" | "M" => Some(ControlCommand::ToggleSource),
        "Escape" => Some(ControlCommand::Release),
        _ => None,
    }
}

/// Parse a `change` event from `<input name="effect|waveform|source">`.
pub fn command_for_input(name: &str, value: &str) -> Result<ControlCommand, PadError> {
    match name {
        "effect" | "filter" => value.parse().map(ControlCommand::Effect),
        "waveform" => value.parse().map(ControlCommand::Waveform),
        "source" | "mode" => value.parse().map(ControlCommand::Source),
        other => Err(PadError::Config(format!("unknown control '{}'", other))),
    }
}
