use thiserror::Error;

/// Failure to load the episode index.
///
/// Surfaced to the user as a full-panel error with a manual retry action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("{0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid episode index: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for LoadError {
    fn from(e: reqwest::Error) -> Self {
        LoadError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Decode(e.to_string())
    }
}

/// Audio element failure, shown inline next to the failed control.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Audio failed to load for episode {episode_id}")]
pub struct MediaError {
    pub episode_id: String,
}

/// Embedded transcript frame failure, shown inside the modal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Transcript failed to load: {url}")]
pub struct TranscriptLoadError {
    pub url: String,
}

/// Typed application error hierarchy for everything outside the page pipeline.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Io(String),

    #[error("{0}")]
    Other(String),
}

// ── From impls ─────────────────────────────────────────────────────────────

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(e: serde_yaml::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Load(LoadError::from(e))
    }
}

/// Allows `.map_err(|e| format!("…", e))?` and `ok_or_else(|| format!(…))?`
/// to coerce into AppError without changing the call sites.
impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::Other(s)
    }
}

impl From<&str> for AppError {
    fn from(s: &str) -> Self {
        AppError::Other(s.to_string())
    }
}
