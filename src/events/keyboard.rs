use crate::core::{command_for_input, command_for_key};
use crate::dom;
use crate::session::Session;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Global shortcuts: 1-5 effect, s/t/q waveform, m microphone, Escape release.
pub fn wire_keyboard(session: &Rc<Session>) {
    let Some(window) = web::window() else { return };
    let s = session.clone();
    dom::listen(&window, "keydown", move |ev: web::KeyboardEvent| {
        if ev.repeat() || ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
            return;
        }
        // typing into a field is not a shortcut
        let in_field = ev
            .target()
            .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
            .map(|i| i.type_() == "text" || i.type_() == "number")
            .unwrap_or(false);
        if in_field {
            return;
        }
        if let Some(cmd) = command_for_key(&ev.key()) {
            log::debug!("[keys] {} -> {:?}", ev.key(), cmd);
            s.apply(cmd);
        }
    });
}

/// `change` events from `<input name="effect|waveform|source">` anywhere on
/// the page.
pub fn wire_controls(session: &Rc<Session>, document: &web::Document) {
    let s = session.clone();
    dom::listen(document, "change", move |ev: web::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
        else {
            return;
        };
        match command_for_input(&input.name(), &input.value()) {
            Ok(cmd) => s.apply(cmd),
            Err(e) => log::debug!("[keys] ignoring control: {}", e),
        }
    });
}
