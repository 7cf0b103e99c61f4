use thiserror::Error;

/// Failures surfaced to callers of the ingestion and query operations.
///
/// Numeric conversion problems never show up here: the value normalizer
/// absorbs them by keeping the input text.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Failed to parse source '{source_name}': {message}")]
    Parse {
        source_name: String,
        message: String,
    },
    #[error("No data available. Upload a file or enable the sample dataset.")]
    NoDatasetAvailable,
    #[error("No rows found for '{area}'")]
    EmptyResult { area: String },
    #[error("Invalid heuristics configuration: {0}")]
    Config(String),
    #[error("{0}")]
    Usage(String),
    #[error("Internal failure (reference {correlation_id})")]
    Internal { correlation_id: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl InsightError {
    pub fn parse(source_name: impl Into<String>, message: impl ToString) -> Self {
        InsightError::Parse {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    /// Whether the message can be shown to the caller as-is.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, InsightError::Internal { .. })
    }
}

pub type InsightResult<T> = std::result::Result<T, InsightError>;
