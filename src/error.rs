use thiserror::Error;

/// Errors surfaced by the cohort, scoring and allocation stages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("malformed record ({record}): {reason}")]
    MalformedRecord { record: String, reason: String },
}

impl EngineError {
    pub fn malformed(record: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::MalformedRecord {
            record: record.into(),
            reason: reason.into(),
        }
    }
}
