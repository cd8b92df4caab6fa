//! Domain error types.

/// Rejected inputs to the lot-size formula.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SizingError {
    #[error("tick_size must be positive, got {0}")]
    InvalidTickSize(f64),

    #[error("tick_value must be positive, got {0}")]
    InvalidTickValue(f64),

    #[error("conversion_rate must be positive, got {0}")]
    InvalidConversionRate(f64),

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
}

/// Top-level error type for sentinel.
#[derive(Debug, thiserror::Error)]
pub enum SentinelError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("missing input: {0}")]
    MissingInput(String),

    #[error(transparent)]
    Sizing(#[from] SizingError),

    #[error("quote error: {reason}")]
    Quote { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SentinelError> for std::process::ExitCode {
    fn from(err: &SentinelError) -> Self {
        let code: u8 = match err {
            SentinelError::Io(_) => 1,
            SentinelError::ConfigParse { .. }
            | SentinelError::ConfigMissing { .. }
            | SentinelError::ConfigInvalid { .. } => 2,
            SentinelError::UnknownSymbol(_) => 3,
            SentinelError::Sizing(_) | SentinelError::MissingInput(_) => 4,
            SentinelError::Quote { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
