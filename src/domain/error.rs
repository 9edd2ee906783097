//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for pairtrader.
#[derive(Debug, thiserror::Error)]
pub enum PairtraderError {
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("no data for {series} between {start} and {end}: {reason}")]
    DataUnavailable {
        series: String,
        start: NaiveDate,
        end: NaiveDate,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

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

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PairtraderError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        PairtraderError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&PairtraderError> for std::process::ExitCode {
    fn from(err: &PairtraderError) -> Self {
        let code: u8 = match err {
            PairtraderError::Io(_) | PairtraderError::Report { .. } => 1,
            PairtraderError::ConfigParse { .. }
            | PairtraderError::ConfigMissing { .. }
            | PairtraderError::ConfigInvalid { .. } => 2,
            PairtraderError::InvalidInput { .. } => 3,
            PairtraderError::DataSource { .. } => 4,
            PairtraderError::DataUnavailable { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
