use thiserror::Error;

/// Errors surfaced by the core.
///
/// Individual malformed events are never errors; they are skipped and counted
/// in [`crate::box_score::AggregationDiagnostics`]. Only user-entered text and
/// whole payloads that fail to decode end up here.
#[derive(Debug, Error)]
pub enum HoopsError {
    #[error("invalid game clock {0:?}, expected M:SS")]
    InvalidClock(String),

    #[error("invalid side {0:?}, expected \"home\" or \"away\"")]
    InvalidSide(String),

    #[error("failed to decode event list: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HoopsError>;
