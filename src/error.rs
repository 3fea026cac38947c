use thiserror::Error;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("DOM error: {0}")]
    Dom(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Config error: {0}")]
    Config(String),
}

#[cfg(target_arch = "wasm32")]
impl EnhanceError {
    /// Describe a thrown JS value, which is usually an `Error` object rather than a string.
    pub fn describe(value: &wasm_bindgen::JsValue) -> String {
        value
            .as_string()
            .or_else(|| {
                value
                    .dyn_ref::<js_sys::Error>()
                    .map(|e| String::from(e.message()))
            })
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}
