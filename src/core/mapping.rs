//! Pad coordinate → audio parameter mapping.
//!
//! Every curve is linear in the clamped coordinate, so parameters saturate at
//! the pad edges instead of extrapolating. The horizontal axis always drives
//! the oscillator frequency; the vertical axis ("lift", top of pad = 1) drives
//! whatever the active effect exposes.

use super::error::{PadError, PadResult};
use super::note::db_to_gain;
use super::pad::NormalizedCoordinate;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Waveform {
    #[default]
    Sine,
    Triangle,
    Square,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceKind {
    #[default]
    Oscillator,
    Microphone,
}

/// Which processing node sits between the source and the analyser.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EffectKind {
    #[default]
    None,
    Delay,
    Reverb,
    PitchShift,
    Lowpass,
}

impl EffectKind {
    pub const ALL: [EffectKind; 5] = [
        EffectKind::None,
        EffectKind::Delay,
        EffectKind::Reverb,
        EffectKind::PitchShift,
        EffectKind::Lowpass,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DelayParams {
    pub wet: f32,
    pub delay_time_sec: f32,
    pub feedback: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReverbParams {
    pub wet: f32,
    pub room_size: f32,
    pub dampening_hz: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PitchShiftParams {
    pub wet: f32,
    pub semitones: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LowpassParams {
    pub wet: f32,
    pub cutoff_hz: f32,
    pub q: f32,
}

/// Effect values for the active `EffectKind`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectParams {
    None,
    Delay(DelayParams),
    Reverb(ReverbParams),
    PitchShift(PitchShiftParams),
    Lowpass(LowpassParams),
}

impl EffectParams {
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectParams::None => EffectKind::None,
            EffectParams::Delay(_) => EffectKind::Delay,
            EffectParams::Reverb(_) => EffectKind::Reverb,
            EffectParams::PitchShift(_) => EffectKind::PitchShift,
            EffectParams::Lowpass(_) => EffectKind::Lowpass,
        }
    }

    pub fn wet(&self) -> f32 {
        match self {
            EffectParams::None => 0.0,
            EffectParams::Delay(p) => p.wet,
            EffectParams::Reverb(p) => p.wet,
            EffectParams::PitchShift(p) => p.wet,
            EffectParams::Lowpass(p) => p.wet,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterSet {
    pub frequency_hz: f32,
    pub volume_db: f32,
    pub effect: EffectParams,
}

impl ParameterSet {
    /// Linear gain for whichever source is sounding, synth or microphone.
    pub fn source_gain(&self) -> f32 {
        db_to_gain(self.volume_db)
    }
}

/// Endpoints of the linear curves.
#[derive(Clone, Debug, PartialEq)]
pub struct MappingConfig {
    pub freq_min_hz: f32,
    pub freq_max_hz: f32,
    pub volume_min_db: f32,
    pub volume_max_db: f32,
    pub delay_time_base_sec: f32,
    pub delay_time_span_sec: f32,
    pub delay_feedback_max: f32,
    pub reverb_dampening_base_hz: f32,
    pub reverb_dampening_span_hz: f32,
    pub pitch_shift_max_semitones: f32,
    pub lowpass_cutoff_min_hz: f32,
    pub lowpass_cutoff_max_hz: f32,
    pub lowpass_q_min: f32,
    pub lowpass_q_max: f32,
}

impl Default for MappingConfig {
    fn default() -> Self {
        use crate::constants::*;
        Self {
            freq_min_hz: FREQ_MIN_HZ,
            freq_max_hz: FREQ_MAX_HZ,
            volume_min_db: VOLUME_MIN_DB,
            volume_max_db: VOLUME_MAX_DB,
            delay_time_base_sec: DELAY_TIME_BASE_SEC,
            delay_time_span_sec: DELAY_TIME_SPAN_SEC,
            delay_feedback_max: DELAY_FEEDBACK_MAX,
            reverb_dampening_base_hz: REVERB_DAMPENING_BASE_HZ,
            reverb_dampening_span_hz: REVERB_DAMPENING_SPAN_HZ,
            pitch_shift_max_semitones: PITCH_SHIFT_MAX_SEMITONES,
            lowpass_cutoff_min_hz: LOWPASS_CUTOFF_MIN_HZ,
            lowpass_cutoff_max_hz: LOWPASS_CUTOFF_MAX_HZ,
            lowpass_q_min: LOWPASS_Q_MIN,
            lowpass_q_max: LOWPASS_Q_MAX,
        }
    }
}

impl MappingConfig {
    pub fn validate(&self) -> PadResult<()> {
        let finite = [
            self.freq_min_hz,
            self.freq_max_hz,
            self.volume_min_db,
            self.volume_max_db,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(PadError::Config("mapping endpoints must be finite".into()));
        }
        if self.freq_min_hz <= 0.0 {
            return Err(PadError::Config(format!(
                "freq_min_hz must be positive, got {}",
                self.freq_min_hz
            )));
        }
        if self.freq_max_hz <= self.freq_min_hz {
            return Err(PadError::Config(format!(
                "freq_max_hz ({}) must exceed freq_min_hz ({})",
                self.freq_max_hz, self.freq_min_hz
            )));
        }
        if self.volume_max_db < self.volume_min_db {
            return Err(PadError::Config(format!(
                "volume_max_db ({}) below volume_min_db ({})",
                self.volume_max_db, self.volume_min_db
            )));
        }
        if !(0.0..1.0).contains(&self.delay_feedback_max) {
            return Err(PadError::Config(
                "delay_feedback_max must be in [0, 1)".into(),
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn frequency(&self, u: f32) -> f32 {
        lerp(self.freq_min_hz, self.freq_max_hz, u.clamp(0.0, 1.0))
    }

    #[inline]
    pub fn volume_db(&self, lift: f32) -> f32 {
        lerp(self.volume_min_db, self.volume_max_db, lift.clamp(0.0, 1.0))
    }

    /// Effect values for `kind` at vertical position `lift`.
    pub fn effect_params(&self, kind: EffectKind, lift: f32) -> EffectParams {
        let n = lift.clamp(0.0, 1.0);
        match kind {
            EffectKind::None => EffectParams::None,
            EffectKind::Delay => EffectParams::Delay(DelayParams {
                wet: n,
                delay_time_sec: self.delay_time_base_sec + n * self.delay_time_span_sec,
                feedback: n * self.delay_feedback_max,
            }),
            EffectKind::Reverb => EffectParams::Reverb(ReverbParams {
                wet: n,
                room_size: n,
                dampening_hz: self.reverb_dampening_base_hz + n * self.reverb_dampening_span_hz,
            }),
            EffectKind::PitchShift => EffectParams::PitchShift(PitchShiftParams {
                wet: n,
                semitones: n * self.pitch_shift_max_semitones,
            }),
            EffectKind::Lowpass => EffectParams::Lowpass(LowpassParams {
                wet: 1.0,
                cutoff_hz: lerp(self.lowpass_cutoff_min_hz, self.lowpass_cutoff_max_hz, n),
                q: lerp(self.lowpass_q_min, self.lowpass_q_max, n),
            }),
        }
    }

    /// Full parameter set for one coordinate update.
    pub fn map(&self, coord: NormalizedCoordinate, kind: EffectKind) -> ParameterSet {
        let lift = coord.lift();
        let volume_db = match kind {
            EffectKind::None => self.volume_db(lift),
            _ => self.volume_max_db,
        };
        ParameterSet {
            frequency_hz: self.frequency(coord.u),
            volume_db,
            effect: self.effect_params(kind, lift),
        }
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}
