use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing required column '{column}' in input header")]
    MissingColumn { column: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    InputFormat,
    Serialization,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        EtlError::MissingColumn {
            column: column.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::CsvError(e) if e.is_io_error() => ErrorCategory::Io,
            EtlError::CsvError(_) | EtlError::MissingColumn { .. } => ErrorCategory::InputFormat,
            EtlError::SerializationError(_) => ErrorCategory::Serialization,
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::InputFormat => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Serialization => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for a run that ended with this error. Always non-zero.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::IoError(e) => format!("File access failed: {}", e),
            EtlError::CsvError(e) => format!("Could not read the sightings CSV: {}", e),
            EtlError::SerializationError(e) => format!("Could not encode sightings as JSON: {}", e),
            EtlError::MissingColumn { column } => {
                format!("The input CSV has no '{}' column", column)
            }
            EtlError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::IoError(_) => {
                "Check that the input file exists and the output directory is writable"
            }
            EtlError::CsvError(_) => "Make sure the input is a comma separated UTF-8 file",
            EtlError::SerializationError(_) => "Re-run with --verbose to find the offending row",
            EtlError::MissingColumn { .. } => {
                "The header must contain datetime, city, state, country, shape, \
                 duration (hours/min), comments, date posted, latitude and longitude"
            }
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
