use thiserror::Error;

/// Why the animation could not be mounted. Never fatal: the host is expected
/// to carry on without the animation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("no browser window available")]
    NoWindow,

    #[error("container element `{0}` not found")]
    ContainerNotFound(String),

    #[error("{0} rendering context unavailable")]
    ContextUnavailable(&'static str),

    #[error("shader failed to compile: {0}")]
    ShaderCompile(String),

    #[error("shader program failed to link: {0}")]
    ProgramLink(String),

    #[error("invalid animation config: {0}")]
    Config(String),

    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<serde_json::Error> for InitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for InitError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<InitError> for wasm_bindgen::JsValue {
    fn from(err: InitError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
