#[derive(Debug, thiserror::Error)]
pub enum PilotError {
    #[cfg(feature = "network")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("insufficient VRAM/memory: no candidate model fits the budget")]
    InsufficientCapability,

    #[error("engine failed to load: {0}")]
    EngineLoad(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PilotError>;
