//! Domain error types.

/// Top-level error type for barbt.
#[derive(Debug, thiserror::Error)]
pub enum BarbtError {
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

    #[error("unknown strategy '{name}' (expected one of: mac, momentum, mr)")]
    UnknownStrategy { name: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient history: have {points} equity points, {reason}")]
    InsufficientHistory { points: usize, reason: String },

    #[error("length mismatch: {equity} equity points but {dates} dates")]
    LengthMismatch { equity: usize, dates: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<&BarbtError> for std::process::ExitCode {
    fn from(err: &BarbtError) -> Self {
        let code: u8 = match err {
            BarbtError::Io(_) | BarbtError::Json(_) => 1,
            BarbtError::ConfigParse { .. }
            | BarbtError::ConfigMissing { .. }
            | BarbtError::ConfigInvalid { .. }
            | BarbtError::UnknownStrategy { .. } => 2,
            BarbtError::Data { .. } | BarbtError::NoData { .. } => 3,
            BarbtError::InsufficientHistory { .. } | BarbtError::LengthMismatch { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
