use crate::audio::WebAudioEngine;
use crate::constants::CURSOR_RADIUS_PX;
use crate::core::{ControlCommand, PadError, PadResult, PointerSample, SourceKind};
use crate::dom;
use crate::frame::{RafScheduler, WebRenderer};
use crate::gesture::GestureMapper;
use crate::mic::Microphone;
use crate::status;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub type WebMapper = GestureMapper<WebAudioEngine, RafScheduler>;

/// Everything one page needs: the gesture mapper, the visual loop and the
/// optional microphone stream.
pub struct Session {
    mapper: Rc<RefCell<WebMapper>>,
    renderer: Rc<RefCell<WebRenderer>>,
    mic: RefCell<Option<Microphone>>,
    document: web::Document,
    pad: web::HtmlElement,
    cursor: web::HtmlElement,
    closed: Cell<bool>,
}

impl Session {
    pub fn new(
        mapper: WebMapper,
        renderer: Rc<RefCell<WebRenderer>>,
        document: web::Document,
        pad: web::HtmlElement,
        cursor: web::HtmlElement,
    ) -> Rc<Self> {
        let session = Rc::new(Self {
            mapper: Rc::new(RefCell::new(mapper)),
            renderer,
            mic: RefCell::new(None),
            document,
            pad,
            cursor,
            closed: Cell::new(false),
        });
        // Coalesced moves land here once per animation frame.
        let weak = Rc::downgrade(&session);
        session.mapper.borrow().scheduler().set_callback(move || {
            if let Some(s) = weak.upgrade() {
                s.flush_moves();
            }
        });
        let weak = Rc::downgrade(&session);
        session
            .mapper
            .borrow_mut()
            .audio_mut()
            .set_blocked_listener(move |e| {
                if let Some(s) = weak.upgrade() {
                    s.audio_blocked(e);
                }
            });
        session
    }

    pub fn pad(&self) -> &web::HtmlElement {
        &self.pad
    }

    pub fn press(&self, sample: PointerSample) {
        if self.closed.get() {
            return;
        }
        let rect = dom::pad_rect(&self.pad);
        {
            let mut m = self.mapper.borrow_mut();
            m.on_press(sample, rect);
            match m.error() {
                Some(e) => status::show_error(&self.document, e),
                None => status::clear(&self.document),
            }
        }
        self.sync_cursor();
    }

    pub fn move_to(&self, sample: PointerSample) {
        if self.closed.get() {
            return;
        }
        let rect = dom::pad_rect(&self.pad);
        self.mapper.borrow_mut().on_move(sample, rect);
    }

    pub fn release(&self) {
        if self.mapper.borrow_mut().on_release() {
            self.sync_cursor();
        }
    }

    fn audio_blocked(&self, error: PadError) {
        if self.closed.get() {
            return;
        }
        status::show_error(&self.document, &error);
        self.mapper.borrow_mut().audio_blocked(error);
    }

    fn flush_moves(&self) {
        if self.mapper.borrow_mut().flush() {
            self.sync_cursor();
        }
    }

    fn sync_cursor(&self) {
        let pos = self.mapper.borrow().cursor_px();
        dom::place_cursor(&self.cursor, pos, CURSOR_RADIUS_PX);
    }

    pub fn apply(self: &Rc<Self>, command: ControlCommand) {
        if self.closed.get() {
            return;
        }
        log::info!("[pad] {:?}", command);
        match command {
            ControlCommand::Effect(kind) => {
                if let Err(e) = self.mapper.borrow_mut().set_effect_mode(kind) {
                    log::error!("[pad] {}", e);
                    return;
                }
                self.check_control("effect", &kind.to_string());
            }
            ControlCommand::Waveform(w) => {
                self.mapper.borrow_mut().set_waveform(w);
                self.check_control("waveform", &w.to_string());
            }
            ControlCommand::ToggleSource => {
                let next = match self.mapper.borrow().route().source {
                    SourceKind::Oscillator => SourceKind::Microphone,
                    SourceKind::Microphone => SourceKind::Oscillator,
                };
                self.select_source(next);
            }
            ControlCommand::Source(kind) => self.select_source(kind),
            ControlCommand::Release => self.release(),
        }
    }

    fn select_source(self: &Rc<Self>, kind: SourceKind) {
        if self.mapper.borrow().route().source == kind {
            return;
        }
        if let Err(e) = self.mapper.borrow_mut().set_source(kind) {
            log::error!("[pad] {}", e);
            return;
        }
        self.sync_cursor();
        self.check_control("source", &kind.to_string());
        match kind {
            SourceKind::Microphone => self.open_microphone(),
            SourceKind::Oscillator => {
                self.close_microphone();
                let mut m = self.mapper.borrow_mut();
                if matches!(m.error(), Some(PadError::DeviceUnavailable(_))) {
                    m.clear_error();
                    status::clear(&self.document);
                }
            }
        }
    }

    fn open_microphone(self: &Rc<Self>) {
        status::show(&self.document, "Waiting for microphone permission...");
        let weak = Rc::downgrade(self);
        spawn_local(async move {
            let result = Microphone::open().await;
            match weak.upgrade() {
                Some(s) => s.microphone_opened(result),
                None => {
                    if let Ok(mic) = result {
                        mic.close();
                    }
                }
            }
        });
    }

    fn microphone_opened(&self, result: PadResult<Microphone>) {
        let mic = match result {
            Ok(mic) => mic,
            Err(e) => {
                if self.closed.get() {
                    return;
                }
                let mut m = self.mapper.borrow_mut();
                if m.report_device_error(e) {
                    if let Some(err) = m.error() {
                        status::show_error(&self.document, err);
                    }
                }
                return;
            }
        };
        // The user may have switched away (or left) while the prompt was up.
        if self.closed.get() || self.mapper.borrow().route().source != SourceKind::Microphone {
            mic.close();
            return;
        }
        let attached = {
            let mut m = self.mapper.borrow_mut();
            attach(&mut m, &mic)
        };
        match attached {
            Ok(()) => {
                self.mapper.borrow_mut().clear_error();
                status::clear(&self.document);
                if let Some(old) = self.mic.replace(Some(mic)) {
                    old.close();
                }
            }
            Err(e) => {
                mic.close();
                status::show_error(&self.document, &e);
                let mut m = self.mapper.borrow_mut();
                m.audio_mut().detach_microphone();
                m.report_error(e);
            }
        }
    }

    fn close_microphone(&self) {
        if let Some(mic) = self.mic.borrow_mut().take() {
            mic.close();
        }
        self.mapper.borrow_mut().audio_mut().detach_microphone();
    }

    /// Reflect a selection made elsewhere (e.g. a shortcut) in the form.
    fn check_control(&self, name: &str, value: &str) {
        let selector = format!("input[name=\"{}\"][value=\"{}\"]", name, value);
        if let Ok(Some(el)) = self.document.query_selector(&selector) {
            if let Ok(input) = el.dyn_into::<web::HtmlInputElement>() {
                input.set_checked(true);
            }
        }
    }

    /// Stop rendering, silence the pad, and release the audio devices.
    /// Only the first call does anything.
    pub fn teardown(&self) {
        if self.closed.replace(true) {
            return;
        }
        self.renderer.borrow_mut().stop();
        self.release();
        self.close_microphone();
        self.mapper.borrow().audio().suspend();
        // drop the frame closures; they hold the analyser and canvas
        self.renderer.borrow().tick().scheduler().clear_callback();
        self.mapper.borrow().scheduler().clear_callback();
        log::info!("[pad] session closed");
    }
}

fn attach(mapper: &mut WebMapper, mic: &Microphone) -> PadResult<()> {
    mapper.audio_mut().attach_microphone(mic)?;
    mapper.reattach_source()
}
