use crate::core::PadError;
use web_sys as web;

const STATUS_ID: &str = "pad-status";

/// Write a user-visible status line.
pub fn show(document: &web::Document, text: &str) {
    if let Some(el) = document.get_element_by_id(STATUS_ID) {
        el.set_text_content(Some(text));
        _ = el.set_attribute("data-visible", "1");
    }
}

#[inline]
pub fn clear(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(STATUS_ID) {
        el.set_text_content(None);
        _ = el.set_attribute("data-visible", "0");
    }
}

pub fn show_error(document: &web::Document, error: &PadError) {
    let text = match error {
        PadError::AudioUnavailable(_) => "Audio is blocked. Tap the pad again to retry.",
        PadError::DeviceUnavailable(_) => "Microphone unavailable. Check permissions and retry.",
        PadError::Render(_) => "Visuals unavailable in this browser.",
        PadError::GraphWiring(_) | PadError::Config(_) => "Something went wrong; see console.",
    };
    show(document, text);
}
