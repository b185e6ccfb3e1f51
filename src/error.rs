use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HelperError {
    /// Expected node is absent, usually because the host has not rendered it yet.
    #[error("element not found: {0}")]
    ElementNotFound(String),
    /// A previously read entry no longer matches what is in the DOM.
    #[error("stale reference: {0}")]
    StaleReference(String),
    #[error("timed out after {timeout_ms}ms waiting for `{selector}`")]
    Timeout { selector: String, timeout_ms: u32 },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for HelperError {
    fn from(value: JsValue) -> Self {
        let detail = value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}"));
        HelperError::Js(detail)
    }
}
