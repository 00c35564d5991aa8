use crate::core::PadRect;
use glam::Vec2;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn element_by_id<T: JsCast>(document: &web::Document, id: &str) -> anyhow::Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", id))?
        .dyn_into::<T>()
        .map_err(|e| anyhow::anyhow!("#{} has unexpected type: {:?}", id, e))
}

/// Register `handler` for `event` on `target` for the lifetime of the page.
pub fn listen<E, F>(target: &web::EventTarget, event: &str, handler: F)
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Current client-space bounds of the pad element.
#[inline]
pub fn pad_rect(pad: &web::Element) -> PadRect {
    let r = pad.get_bounding_client_rect();
    PadRect::new(
        r.left() as f32,
        r.top() as f32,
        r.width() as f32,
        r.height() as f32,
    )
}

/// `data-*` lookup over an element's dataset.
pub fn dataset_lookup(el: &web::HtmlElement) -> impl Fn(&str) -> Option<String> {
    let dataset = el.dataset();
    move |key: &str| dataset.get(key)
}

/// Show the cursor dot at `pos` (pad pixels), or hide it.
pub fn place_cursor(cursor: &web::HtmlElement, pos: Option<Vec2>, radius: f32) {
    let style = cursor.style();
    match pos {
        Some(p) => {
            _ = style.set_property("left", &format!("{:.1}px", p.x - radius));
            _ = style.set_property("top", &format!("{:.1}px", p.y - radius));
            _ = style.set_property("display", "block");
        }
        None => {
            _ = style.set_property("display", "none");
        }
    }
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}
