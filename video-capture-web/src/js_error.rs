use wasm_bindgen::{JsCast, JsValue};
use web_sys::DomException;

use video_capture_core::DeviceError;

/// Render a rejected promise or thrown value for logs and error messages.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(exception) = value.dyn_ref::<DomException>() {
        return format!("{}: {}", exception.name(), exception.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Classify a `getUserMedia` rejection.
pub(crate) fn device_error(value: &JsValue) -> DeviceError {
    match value.dyn_ref::<DomException>().map(|e| e.name()) {
        Some(name) if name == "NotAllowedError" || name == "SecurityError" => DeviceError::PermissionDenied,
        _ => DeviceError::Unavailable(describe(value)),
    }
}
