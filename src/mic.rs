use crate::core::{PadError, PadResult};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn device_err(context: &str, e: JsValue) -> PadError {
    PadError::DeviceUnavailable(format!("{}: {:?}", context, e))
}

/// A live microphone stream. `close` must run on teardown to release the device.
pub struct Microphone {
    stream: web::MediaStream,
}

impl Microphone {
    /// Ask the browser for an audio input stream.
    pub async fn open() -> PadResult<Self> {
        let window =
            web::window().ok_or_else(|| PadError::DeviceUnavailable("no window".into()))?;
        let devices = window
            .navigator()
            .media_devices()
            .map_err(|e| device_err("mediaDevices", e))?;
        let constraints = web::MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::TRUE);
        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| device_err("getUserMedia", e))?;
        let value = JsFuture::from(promise)
            .await
            .map_err(|e| device_err("getUserMedia rejected", e))?;
        let stream = value
            .dyn_into::<web::MediaStream>()
            .map_err(|e| device_err("unexpected stream", e))?;
        log::info!("[mic] opened stream {}", stream.id());
        Ok(Self { stream })
    }

    pub fn stream(&self) -> &web::MediaStream {
        &self.stream
    }

    /// Stop every track. Safe to call more than once.
    pub fn close(&self) {
        let tracks: js_sys::Array = self.stream.get_tracks();
        for track in tracks.iter() {
            if let Ok(t) = track.dyn_into::<web::MediaStreamTrack>() {
                t.stop();
            }
        }
        log::info!("[mic] closed");
    }
}
