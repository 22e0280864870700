use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrackerError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("device returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("timeout waiting for device")]
    Timeout,
    #[error("malformed payload: {0}")]
    Payload(String),
    #[error("invalid mode {0:?}, expected \"auto\" or \"manual\"")]
    InvalidMode(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl TrackerError {
    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            TrackerError::Transport(_) | TrackerError::Timeout => true,
            TrackerError::Status { status, .. } => *status >= 500,
            TrackerError::Payload(_) | TrackerError::InvalidMode(_) | TrackerError::Config(_) => {
                false
            }
        }
    }
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
