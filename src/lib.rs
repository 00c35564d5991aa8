//! Browser touch pad synth.
//!
//! The pure parts (mapping, routing, coalescing, frame loop, config) build on
//! any target and are tested natively. The WebAudio/WebGPU glue only exists
//! on `wasm32`.

pub mod config;
pub mod constants;
pub mod core;
pub mod gesture;
pub mod renderer;

#[cfg(target_arch = "wasm32")]
mod audio;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod mic;
#[cfg(target_arch = "wasm32")]
mod render;
#[cfg(target_arch = "wasm32")]
mod session;
#[cfg(target_arch = "wasm32")]
mod status;

#[cfg(target_arch = "wasm32")]
pub use web_entry::start;

#[cfg(target_arch = "wasm32")]
mod web_entry {
    use crate::audio::WebAudioEngine;
    use crate::config::PadConfig;
    use crate::core::NormalizedCoordinate;
    use crate::frame::{self, RafScheduler, WebRenderer};
    use crate::gesture::GestureMapper;
    use crate::render::{GpuState, VisualBackend};
    use crate::session::Session;
    use crate::{dom, events, status};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys as web;

    static STARTED: AtomicBool = AtomicBool::new(false);

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("playing-pad starting");

        if STARTED.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        spawn_local(async move {
            if let Err(e) = init().await {
                log::error!("init error: {:?}", e);
            }
        });
        Ok(())
    }

    fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
        dom::sync_canvas_backing_size(canvas);
        let Some(window) = web::window() else { return };
        let c = canvas.clone();
        dom::listen(&window, "resize", move |_: web::Event| {
            dom::sync_canvas_backing_size(&c);
        });
    }

    /// Expose the live coordinate to CSS as `--pad-u` / `--pad-v`.
    fn coordinate_to_css(pad: web::HtmlElement) -> Box<dyn FnMut(NormalizedCoordinate)> {
        Box::new(move |c: NormalizedCoordinate| {
            let style = pad.style();
            _ = style.set_property("--pad-u", &format!("{:.4}", c.u));
            _ = style.set_property("--pad-v", &format!("{:.4}", c.v));
        })
    }

    async fn init() -> anyhow::Result<()> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;

        let pad: web::HtmlElement = dom::element_by_id(&document, "pad")?;
        let cursor: web::HtmlElement = dom::element_by_id(&document, "pad-cursor")?;
        let canvas: web::HtmlCanvasElement = dom::element_by_id(&document, "visual-canvas")?;

        let (config, config_err) = PadConfig::from_lookup(dom::dataset_lookup(&pad));
        if let Some(e) = &config_err {
            status::show_error(&document, e);
        }

        let ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let engine = WebAudioEngine::new(ctx, config.fft_size)?;
        let analyser = Rc::new(RefCell::new(engine.analyser()));

        let mut mapper = GestureMapper::new(engine, RafScheduler::new(), config.mapping)?;
        mapper.set_on_change(coordinate_to_css(pad.clone()));

        wire_canvas_resize(&canvas);
        let gpu = match GpuState::new(&canvas).await {
            Ok(g) => Some(g),
            Err(e) => {
                log::warn!("[render] WebGPU unavailable: {:?}", e);
                if config_err.is_none() {
                    status::show(&document, "Visuals unavailable in this browser.");
                }
                None
            }
        };

        let render_scheduler = RafScheduler::new();
        let renderer: Rc<RefCell<WebRenderer>> = Rc::new(RefCell::new(WebRenderer::new(
            VisualBackend::new(gpu),
            render_scheduler.clone(),
            config.level,
        )));
        frame::start_loop(&renderer, &render_scheduler, canvas, analyser);

        let session = Session::new(mapper, renderer, document.clone(), pad, cursor);
        events::wire_pointer(&session);
        events::wire_keyboard(&session);
        events::wire_controls(&session, &document);

        let s = session.clone();
        dom::listen(&window, "pagehide", move |_: web::Event| s.teardown());

        log::info!("[pad] ready");
        Ok(())
    }
}
