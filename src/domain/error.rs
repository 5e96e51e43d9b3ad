//! Domain error types.
//!
//! Only structural problems are errors. Arithmetic gaps (division by zero,
//! warm-up windows, missing operands) travel as `None` values and never
//! reach this type.

/// Top-level error type for the exposure engine.
#[derive(Debug, thiserror::Error)]
pub enum ExposureError {
    #[error("alignment error in {field}: {reason}")]
    Alignment { field: String, reason: String },

    #[error("missing required field: {field}")]
    MissingField { field: String },

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

    #[error("unknown signal system: {name}")]
    UnknownSystem { name: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExposureError {
    pub fn alignment(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ExposureError::Alignment {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        ExposureError::MissingField {
            field: field.into(),
        }
    }
}

impl From<&ExposureError> for std::process::ExitCode {
    fn from(err: &ExposureError) -> Self {
        let code: u8 = match err {
            ExposureError::Io(_) | ExposureError::Report { .. } => 1,
            ExposureError::ConfigParse { .. }
            | ExposureError::ConfigMissing { .. }
            | ExposureError::ConfigInvalid { .. } => 2,
            ExposureError::Data { .. } => 3,
            ExposureError::UnknownSystem { .. } => 4,
            ExposureError::Alignment { .. } | ExposureError::MissingField { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
