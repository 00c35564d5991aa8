use crate::audio::WebAnalyser;
use crate::core::{FrameHandle, FrameScheduler, PadError, PadResult, Viewport};
use crate::render::VisualBackend;
use crate::renderer::{AnalysisSource, ReactiveRenderer};
use instant::Instant;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// `requestAnimationFrame` behind `FrameScheduler`.
///
/// The callback is installed after construction because it usually captures
/// (a weak handle to) the object that owns this scheduler.
#[derive(Clone, Default)]
pub struct RafScheduler {
    callback: FrameCallback,
}

impl RafScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_callback(&self, f: impl FnMut() + 'static) {
        *self.callback.borrow_mut() = Some(Closure::wrap(Box::new(f) as Box<dyn FnMut()>));
    }

    /// Drop the installed callback. Must not be called from inside it.
    pub fn clear_callback(&self) {
        self.callback.borrow_mut().take();
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> PadResult<FrameHandle> {
        let window = web::window().ok_or_else(|| PadError::Render("no window".into()))?;
        let slot = self.callback.borrow();
        let cb = slot
            .as_ref()
            .ok_or_else(|| PadError::Render("frame callback not installed".into()))?;
        window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .map_err(|e| PadError::Render(format!("requestAnimationFrame: {:?}", e)))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(w) = web::window() {
            _ = w.cancel_animation_frame(handle);
        }
    }
}

pub type WebRenderer = ReactiveRenderer<VisualBackend, RafScheduler>;

/// Wire the frame callback and start the loop.
pub fn start_loop(
    renderer: &Rc<RefCell<WebRenderer>>,
    scheduler: &RafScheduler,
    canvas: web::HtmlCanvasElement,
    analyser: Rc<RefCell<WebAnalyser>>,
) {
    let origin = Instant::now();
    let weak: Weak<RefCell<WebRenderer>> = Rc::downgrade(renderer);
    scheduler.set_callback(move || {
        let Some(r) = weak.upgrade() else { return };
        let viewport = Viewport::new(canvas.width(), canvas.height());
        let now = origin.elapsed().as_secs_f64();
        let mut a = analyser.borrow_mut();
        r.borrow_mut()
            .frame(now, viewport, Some(&mut *a as &mut dyn AnalysisSource));
    });
    let now = origin.elapsed().as_secs_f64();
    if let Err(e) = renderer.borrow_mut().start(now) {
        log::error!("[render] start failed: {}", e);
    }
}
