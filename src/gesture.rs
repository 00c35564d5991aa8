//! Pointer gestures → audio parameters.
//!
//! `GestureMapper` owns the live routing model and pushes every parameter
//! change into an `AudioBackend`. Moves are coalesced to one update per
//! animation frame through a `PendingUpdate` cell; the frame callback calls
//! `flush`.

use crate::core::{
    note_name_for_hz, plan_initial, plan_reattach, plan_rewire, EffectKind, FrameScheduler,
    MappingConfig, NormalizedCoordinate, Offer, PadError, PadRect, PadResult, ParameterSet,
    PendingUpdate, PointerSample, Route, RoutingGraph, SourceKind, Waveform, WireOp,
};
use glam::Vec2;

/// The audio engine as seen from the pad.
pub trait AudioBackend {
    /// Start or resume output. Must be called from inside a user gesture.
    fn resume(&mut self) -> PadResult<()>;
    fn trigger_attack(&mut self, frequency_hz: f32, note: &str);
    fn trigger_release(&mut self);
    fn apply(&mut self, params: &ParameterSet);
    fn set_waveform(&mut self, waveform: Waveform);
    /// Replay a routing plan on the real graph, in order.
    fn rewire(&mut self, plan: &[WireOp]);
    /// Whether `source` exists and can carry signal right now.
    fn has_source(&self, source: SourceKind) -> bool;
}

pub type CoordinateListener = Box<dyn FnMut(NormalizedCoordinate)>;

pub struct GestureMapper<A: AudioBackend, S: FrameScheduler> {
    audio: A,
    scheduler: S,
    config: MappingConfig,
    route: Route,
    graph: RoutingGraph,
    waveform: Waveform,
    active: bool,
    coord: Option<NormalizedCoordinate>,
    cursor: Option<Vec2>,
    params: Option<ParameterSet>,
    pending: PendingUpdate<(PointerSample, PadRect)>,
    error: Option<PadError>,
    on_change: Option<CoordinateListener>,
}

impl<A: AudioBackend, S: FrameScheduler> GestureMapper<A, S> {
    pub fn new(mut audio: A, scheduler: S, config: MappingConfig) -> PadResult<Self> {
        config.validate()?;
        let route = Route::default();
        let plan = plan_initial(route);
        let mut graph = RoutingGraph::new();
        graph.apply_all(&plan)?;
        audio.rewire(&plan);
        Ok(Self {
            audio,
            scheduler,
            config,
            route,
            graph,
            waveform: Waveform::default(),
            active: false,
            coord: None,
            cursor: None,
            params: None,
            pending: PendingUpdate::new(),
            error: None,
            on_change: None,
        })
    }

    pub fn set_on_change(&mut self, listener: CoordinateListener) {
        self.on_change = Some(listener);
    }

    /// Begin a gesture at `sample`.
    pub fn on_press(&mut self, sample: PointerSample, rect: PadRect) {
        match self.audio.resume() {
            Ok(()) => {
                if matches!(self.error, Some(PadError::AudioUnavailable(_))) {
                    self.error = None;
                }
            }
            Err(e) => {
                log::warn!("[pad] {}; gesture stays silent", e);
                self.error = Some(e);
            }
        }
        self.pending.clear(&mut self.scheduler);
        self.active = true;
        let params = self.update(sample, rect);
        if self.is_audible() {
            let note = note_name_for_hz(params.frequency_hz);
            log::debug!("[pad] attack {:.1} Hz ({})", params.frequency_hz, note);
            self.audio.trigger_attack(params.frequency_hz, &note);
        }
    }

    /// Queue a position update for the next frame. Ignored outside a gesture.
    pub fn on_move(&mut self, sample: PointerSample, rect: PadRect) {
        if !self.active {
            return;
        }
        if let Offer::Immediate = self.pending.offer((sample, rect), &mut self.scheduler) {
            self.flush();
        }
    }

    /// Apply the latest queued move. Returns whether an update was applied.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some((sample, rect)) if self.active => {
                self.update(sample, rect);
                true
            }
            _ => false,
        }
    }

    /// End the gesture. Returns false when no gesture was active.
    pub fn on_release(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.pending.clear(&mut self.scheduler);
        self.cursor = None;
        self.audio.trigger_release();
        true
    }

    pub fn set_effect_mode(&mut self, effect: EffectKind) -> PadResult<()> {
        let next = Route {
            effect,
            ..self.route
        };
        self.reroute(next)
    }

    /// Swap the signal source. An active gesture is released first so the
    /// old source never keeps sounding.
    pub fn set_source(&mut self, source: SourceKind) -> PadResult<()> {
        if source == self.route.source {
            return Ok(());
        }
        self.on_release();
        let next = Route {
            source,
            ..self.route
        };
        self.reroute(next)
    }

    /// Connect the current source again once its node exists, e.g. after the
    /// microphone stream opens. The model graph is unchanged.
    pub fn reattach_source(&mut self) -> PadResult<()> {
        let plan = plan_reattach(self.route);
        let mut graph = self.graph.clone();
        graph.apply_all(&plan)?;
        self.audio.rewire(&plan);
        self.graph = graph;
        Ok(())
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
        self.audio.set_waveform(waveform);
    }

    /// Record an acquisition failure; the pad keeps working but stays silent.
    pub fn report_error(&mut self, error: PadError) {
        log::warn!("[pad] {}", error);
        self.error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// The audio context refused to start after a press already went
    /// through. Silence the held note; the gesture keeps tracking.
    pub fn audio_blocked(&mut self, error: PadError) {
        let sounding = self.active && self.is_audible();
        self.report_error(error);
        if sounding {
            self.audio.trigger_release();
        }
    }

    /// Record a microphone failure unless the user has already switched
    /// back to the oscillator. Returns whether it was recorded.
    pub fn report_device_error(&mut self, error: PadError) -> bool {
        if self.route.source != SourceKind::Microphone {
            log::debug!("[mic] ignoring late failure: {}", error);
            return false;
        }
        self.report_error(error);
        true
    }

    fn reroute(&mut self, next: Route) -> PadResult<()> {
        let plan = plan_rewire(self.route, next);
        if plan.is_empty() {
            return Ok(());
        }
        // Validate on a copy so a bad plan never reaches the audio graph.
        let mut graph = self.graph.clone();
        graph.apply_all(&plan)?;
        self.audio.rewire(&plan);
        self.graph = graph;
        log::info!(
            "[pad] route {:?}/{} -> {:?}/{}",
            self.route.source,
            self.route.effect,
            next.source,
            next.effect
        );
        self.route = next;
        if self.active {
            if let Some(coord) = self.coord {
                let params = self.config.map(coord, self.route.effect);
                self.audio.apply(&params);
                self.params = Some(params);
            }
        }
        Ok(())
    }

    fn update(&mut self, sample: PointerSample, rect: PadRect) -> ParameterSet {
        let coord = rect.normalize(sample);
        let params = self.config.map(coord, self.route.effect);
        self.audio.apply(&params);
        self.coord = Some(coord);
        self.cursor = Some(rect.clamp_px(sample));
        self.params = Some(params);
        if let Some(cb) = self.on_change.as_mut() {
            cb(coord);
        }
        params
    }

    pub fn is_audible(&self) -> bool {
        !matches!(self.error, Some(PadError::AudioUnavailable(_)))
            && self.audio.has_source(self.route.source)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Clamped cursor position in pad pixels while a gesture is active.
    pub fn cursor_px(&self) -> Option<Vec2> {
        self.cursor
    }

    pub fn coordinate(&self) -> Option<NormalizedCoordinate> {
        self.coord
    }

    pub fn params(&self) -> Option<&ParameterSet> {
        self.params.as_ref()
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn graph(&self) -> &RoutingGraph {
        &self.graph
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn error(&self) -> Option<&PadError> {
        self.error.as_ref()
    }

    pub fn has_pending_move(&self) -> bool {
        self.pending.is_pending()
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
