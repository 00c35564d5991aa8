//! Audio-reactive frame loop.
//!
//! Each frame re-fits the surface if the viewport changed, snapshots the
//! analysis buffer, derives the RMS drive level and hands
//! `{elapsed, level, resolution}` to the visual backend. Missing audio is
//! never an error here: the frame renders with level 0.

use crate::constants::WAVEFORM_UNIFORM_SAMPLES;
use crate::core::{
    decimate_into, level_drive, FrameParams, FrameScheduler, LevelConfig, PadResult,
    RenderState, RenderTick, Viewport,
};

/// Drawing surface driven once per frame.
pub trait RenderBackend {
    fn resize(&mut self, viewport: Viewport);
    fn draw(&mut self, frame: &FrameParams<'_>) -> PadResult<()>;
}

/// Read side of the shared analyser.
pub trait AnalysisSource {
    /// Overwrite `buf` with the latest time-domain samples. Returns false when
    /// the engine has nothing to offer yet.
    fn snapshot(&mut self, buf: &mut Vec<f32>) -> bool;
}

pub struct ReactiveRenderer<B: RenderBackend, S: FrameScheduler> {
    backend: B,
    tick: RenderTick<S>,
    level: LevelConfig,
    samples: Vec<f32>,
    waveform: Vec<f32>,
    surface: Option<Viewport>,
    started_at: f64,
    state: RenderState,
}

impl<B: RenderBackend, S: FrameScheduler> ReactiveRenderer<B, S> {
    pub fn new(backend: B, scheduler: S, level: LevelConfig) -> Self {
        Self {
            backend,
            tick: RenderTick::new(scheduler),
            level,
            samples: Vec::new(),
            waveform: vec![0.0; WAVEFORM_UNIFORM_SAMPLES],
            surface: None,
            started_at: 0.0,
            state: RenderState::default(),
        }
    }

    /// Begin the loop; `now_sec` becomes time zero. No-op while running.
    pub fn start(&mut self, now_sec: f64) -> PadResult<()> {
        if self.tick.start()? {
            self.started_at = now_sec;
            log::info!("[render] loop started");
        }
        Ok(())
    }

    /// Cancel the pending frame. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.tick.is_running() {
            log::info!("[render] loop stopped");
        }
        self.tick.stop();
    }

    /// Run one frame. Returns `None` for a callback that arrived after `stop`.
    pub fn frame(
        &mut self,
        now_sec: f64,
        viewport: Viewport,
        analysis: Option<&mut dyn AnalysisSource>,
    ) -> Option<RenderState> {
        if !self.tick.begin_frame() {
            return None;
        }

        if !viewport.is_empty() && self.surface != Some(viewport) {
            self.backend.resize(viewport);
            self.surface = Some(viewport);
        }

        let has_audio = match analysis {
            Some(src) => src.snapshot(&mut self.samples),
            None => false,
        };
        if !has_audio {
            self.samples.clear();
        }
        let level = level_drive(&self.samples, &self.level);
        decimate_into(&self.samples, &mut self.waveform);

        self.state = RenderState {
            elapsed_sec: (now_sec - self.started_at).max(0.0) as f32,
            level,
        };

        if !viewport.is_empty() {
            let params = FrameParams {
                elapsed_sec: self.state.elapsed_sec,
                level: self.state.level,
                resolution: viewport,
                waveform: &self.waveform,
            };
            if let Err(e) = self.backend.draw(&params) {
                log::error!("[render] {}", e);
            }
        }

        if let Err(e) = self.tick.schedule_next() {
            log::error!("[render] could not schedule next frame: {}", e);
        }
        Some(self.state)
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_running()
    }

    pub fn surface(&self) -> Option<Viewport> {
        self.surface
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn tick(&self) -> &RenderTick<S> {
        &self.tick
    }

    pub fn tick_mut(&mut self) -> &mut RenderTick<S> {
        &mut self.tick
    }
}
