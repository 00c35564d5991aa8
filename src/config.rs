//! Page-level configuration.
//!
//! Defaults come from `constants.rs`. A page can override a few of them with
//! `data-*` attributes on the pad element; the browser glue passes a lookup
//! closure over the element's dataset so this stays host-testable.

use crate::constants::ANALYSER_FFT_SIZE;
use crate::core::{LevelConfig, MappingConfig, PadError, PadResult};

#[derive(Clone, Debug, PartialEq)]
pub struct PadConfig {
    pub mapping: MappingConfig,
    pub level: LevelConfig,
    pub fft_size: u32,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            mapping: MappingConfig::default(),
            level: LevelConfig::default(),
            fft_size: ANALYSER_FFT_SIZE,
        }
    }
}

// dataset keys (camelCase, as exposed by `HTMLElement.dataset`)
pub const KEY_FREQ_MIN: &str = "fMin";
pub const KEY_FREQ_MAX: &str = "fMax";
pub const KEY_VOLUME_MIN: &str = "volMinDb";
pub const KEY_VOLUME_MAX: &str = "volMaxDb";
pub const KEY_LEVEL_SCALE: &str = "levelScale";
pub const KEY_FFT_SIZE: &str = "fftSize";

impl PadConfig {
    /// Defaults overridden by whatever `lookup` returns.
    ///
    /// Unparseable values are skipped with a warning. If the merged result
    /// fails validation the defaults are returned alongside the error.
    pub fn from_lookup<F>(lookup: F) -> (Self, Option<PadError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let parse_f32 = |key: &str| -> Option<f32> {
            let raw = lookup(key)?;
            match raw.trim().parse::<f32>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => {
                    log::warn!("[config] ignoring {}={:?}", key, raw);
                    None
                }
            }
        };
        if let Some(v) = parse_f32(KEY_FREQ_MIN) {
            cfg.mapping.freq_min_hz = v;
        }
        if let Some(v) = parse_f32(KEY_FREQ_MAX) {
            cfg.mapping.freq_max_hz = v;
        }
        if let Some(v) = parse_f32(KEY_VOLUME_MIN) {
            cfg.mapping.volume_min_db = v;
        }
        if let Some(v) = parse_f32(KEY_VOLUME_MAX) {
            cfg.mapping.volume_max_db = v;
        }
        if let Some(v) = parse_f32(KEY_LEVEL_SCALE) {
            cfg.level.rms_scale = v;
        }
        if let Some(raw) = lookup(KEY_FFT_SIZE) {
            match raw.trim().parse::<u32>() {
                Ok(v) => cfg.fft_size = v,
                Err(_) => log::warn!("[config] ignoring {}={:?}", KEY_FFT_SIZE, raw),
            }
        }
        match cfg.validate() {
            Ok(()) => (cfg, None),
            Err(e) => {
                log::warn!("[config] {}; using defaults", e);
                (Self::default(), Some(e))
            }
        }
    }

    pub fn validate(&self) -> PadResult<()> {
        self.mapping.validate()?;
        if !(self.level.rms_scale > 0.0) {
            return Err(PadError::Config(format!(
                "level scale must be positive, got {}",
                self.level.rms_scale
            )));
        }
        // AnalyserNode accepts powers of two in [32, 32768]
        if !self.fft_size.is_power_of_two() || !(32..=32768).contains(&self.fft_size) {
            return Err(PadError::Config(format!(
                "fft size must be a power of two in 32..=32768, got {}",
                self.fft_size
            )));
        }
        Ok(())
    }
}
