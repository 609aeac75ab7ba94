//! Error types for the core helpers

/// Standard result type for core operations
pub type CoreResult<T> = std::result::Result<T, FormatError>;

/// Errors raised while turning user-supplied timestamps into dates
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Invalid timestamp: {input}")]
    InvalidTimestamp { input: String },

    #[error("Timestamp out of range: {millis}ms")]
    OutOfRange { millis: i64 },
}

impl FormatError {
    /// Create an invalid timestamp error
    pub fn invalid_timestamp(input: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            input: input.into(),
        }
    }
}
