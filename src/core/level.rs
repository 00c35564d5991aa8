use crate::constants::{LEVEL_CEILING, LEVEL_RMS_SCALE};

#[derive(Clone, Debug, PartialEq)]
pub struct LevelConfig {
    pub rms_scale: f32,
    pub ceiling: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            rms_scale: LEVEL_RMS_SCALE,
            ceiling: LEVEL_CEILING,
        }
    }
}

/// Root-mean-square of the samples. Non-finite samples count as silence.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples
        .iter()
        .map(|s| if s.is_finite() { s * s } else { 0.0 })
        .sum();
    (sum / samples.len() as f32).sqrt()
}

/// Animation drive in [0, 1]: scaled RMS, clamped to the ceiling.
pub fn level_drive(samples: &[f32], config: &LevelConfig) -> f32 {
    let ceiling = config.ceiling.clamp(0.0, 1.0);
    let v = rms(samples) * config.rms_scale;
    if v.is_finite() {
        v.clamp(0.0, ceiling)
    } else {
        0.0
    }
}

/// Per-frame drive values; rebuilt every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderState {
    pub elapsed_sec: f32,
    pub level: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Inputs handed to the visual backend for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameParams<'a> {
    pub elapsed_sec: f32,
    pub level: f32,
    pub resolution: Viewport,
    pub waveform: &'a [f32],
}

/// Reduce a sample window to `out.len()` points by picking evenly spaced samples.
pub fn decimate_into(samples: &[f32], out: &mut [f32]) {
    if out.is_empty() {
        return;
    }
    if samples.is_empty() {
        out.fill(0.0);
        return;
    }
    let step = samples.len() as f32 / out.len() as f32;
    for (i, slot) in out.iter_mut().enumerate() {
        let idx = ((i as f32 * step) as usize).min(samples.len() - 1);
        let s = samples[idx];
        *slot = if s.is_finite() { s.clamp(-1.0, 1.0) } else { 0.0 };
    }
}
