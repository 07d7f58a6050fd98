use core::fmt;

use wasm_bindgen::JsValue;

use crate::log;

#[derive(Debug, Clone)]
pub enum DragError {
    SetupFailed(JsValue),
    HandleNotFound(String),
    /// The registration is borrowed by a handler that is still running.
    Busy,
    Destroyed,
    Other(String),
}

impl fmt::Display for DragError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DragError::SetupFailed(err) => write!(f, "Setup failed: {:?}", err),
            DragError::HandleNotFound(selector) => {
                write!(f, "Drag handle not found: {}", selector)
            }
            DragError::Busy => write!(f, "Registration is in use by a running handler"),
            DragError::Destroyed => write!(f, "Registration has been destroyed"),
            DragError::Other(msg) => write!(f, "Other error: {}", msg),
        }
    }
}

impl std::error::Error for DragError {}

impl From<JsValue> for DragError {
    fn from(value: JsValue) -> Self {
        DragError::SetupFailed(value)
    }
}

// Helper trait for converting to JsValue
pub trait IntoJsError {
    fn into_js_error(self) -> wasm_bindgen::JsValue;
}

impl IntoJsError for DragError {
    fn into_js_error(self) -> wasm_bindgen::JsValue {
        wasm_bindgen::JsValue::from_str(&self.to_string())
    }
}

pub type DragResult<T> = Result<T, DragError>;

pub fn log_and_convert_error<E: std::error::Error>(err: E) -> JsValue {
    log(&format!("Error: {:#}", err));
    JsValue::from_str(&err.to_string())
}
