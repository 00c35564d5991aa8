use crate::core::PointerSample;
use crate::dom;
use crate::session::Session;
use std::rc::Rc;
use web_sys as web;

#[inline]
fn sample(ev: &web::PointerEvent) -> PointerSample {
    PointerSample::new(ev.client_x() as f32, ev.client_y() as f32)
}

/// Press and move on the pad; release anywhere on the window so a note
/// never sticks when the pointer leaves or the tab loses focus.
pub fn wire_pointer(session: &Rc<Session>) {
    let pad = session.pad().clone();
    _ = pad.style().set_property("touch-action", "none");
    wire_pointerdown(session, &pad);
    wire_pointermove(session, &pad);
    wire_release(session);
}

fn wire_pointerdown(session: &Rc<Session>, pad: &web::HtmlElement) {
    let s = session.clone();
    let target = pad.clone();
    dom::listen(pad, "pointerdown", move |ev: web::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        ev.prevent_default();
        _ = target.set_pointer_capture(ev.pointer_id());
        s.press(sample(&ev));
    });
}

fn wire_pointermove(session: &Rc<Session>, pad: &web::HtmlElement) {
    let s = session.clone();
    dom::listen(pad, "pointermove", move |ev: web::PointerEvent| {
        s.move_to(sample(&ev));
    });
}

fn wire_release(session: &Rc<Session>) {
    let Some(window) = web::window() else { return };
    for event in ["pointerup", "pointercancel"] {
        let s = session.clone();
        dom::listen(&window, event, move |_: web::PointerEvent| s.release());
    }
    let s = session.clone();
    dom::listen(&window, "blur", move |_: web::Event| s.release());
}
