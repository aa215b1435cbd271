// Typed errors with thiserror. Surface meaningful messages to JS.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Probe error types.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Target element not found: #{0}")]
    MissingElement(String),

    #[error("Host environment unavailable: {0}")]
    HostUnavailable(String),

    #[error("Failed to register {0} listener")]
    Listener(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ProbeError {
    fn from(err: serde_json::Error) -> Self {
        ProbeError::Serialization(err.to_string())
    }
}

impl From<ProbeError> for JsValue {
    fn from(err: ProbeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
