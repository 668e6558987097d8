//! Error types for the allocation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure that can end a reconciliation or aggregation call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of failure, independent of the data carried by the error.
///
/// Callers that surface errors to people should switch on the kind rather
/// than on the error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required table could not be parsed or loaded at all.
    SourceUnreadable,
    /// A table is readable but misses required columns.
    SourceSchemaInvalid,
    /// A referential or uniqueness invariant was violated.
    SourceDataInvalid,
    /// The requested window intersects none of the supplied periods.
    NoPeriodsAvailable,
    /// Caller-supplied parameters are out of domain.
    InvalidRequest,
    /// Engine configuration could not be loaded.
    Configuration,
}

impl ErrorKind {
    /// Returns a stable code for programmatic handling.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::SourceUnreadable => "SOURCE_UNREADABLE",
            ErrorKind::SourceSchemaInvalid => "SOURCE_SCHEMA_INVALID",
            ErrorKind::SourceDataInvalid => "SOURCE_DATA_INVALID",
            ErrorKind::NoPeriodsAvailable => "NO_PERIODS_AVAILABLE",
            ErrorKind::InvalidRequest => "INVALID_REQUEST",
            ErrorKind::Configuration => "CONFIG_ERROR",
        }
    }
}

/// The main error type for the allocation engine.
///
/// # Example
///
/// ```
/// use allocation_engine::error::{EngineError, ErrorKind};
///
/// let error = EngineError::SourceSchemaInvalid {
///     source_name: "roster".to_string(),
///     missing: vec!["FTE".to_string()],
/// };
/// assert_eq!(error.kind(), ErrorKind::SourceSchemaInvalid);
/// assert_eq!(error.to_string(), "Table 'roster' is missing required columns: FTE");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A source table could not be read.
    #[error("Failed to read table '{source_name}': {message}")]
    SourceUnreadable {
        /// The logical name of the table (e.g. "roster").
        source_name: String,
        /// A description of the read failure.
        message: String,
    },

    /// A source table is missing required columns.
    #[error("Table '{source_name}' is missing required columns: {}", .missing.join(", "))]
    SourceSchemaInvalid {
        /// The logical name of the table.
        source_name: String,
        /// The required columns that were not found.
        missing: Vec<String>,
    },

    /// A source table violates a data invariant.
    #[error("Invalid data in table '{source_name}': {message}")]
    SourceDataInvalid {
        /// The logical name of the table.
        source_name: String,
        /// A description of the violation.
        message: String,
    },

    /// None of the requested periods exist in the supplied data.
    #[error("No data available for {months} month(s) starting {start}")]
    NoPeriodsAvailable {
        /// The first requested period label.
        start: String,
        /// The number of months requested.
        months: u32,
    },

    /// A request parameter was out of domain.
    #[error("Invalid request field '{field}': {message}")]
    InvalidRequest {
        /// The offending parameter.
        field: String,
        /// A description of the accepted domain.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Creates a `SourceDataInvalid` error for the named table.
    pub fn data_invalid(source_name: &str, message: impl Into<String>) -> Self {
        EngineError::SourceDataInvalid {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }

    /// Creates an `InvalidRequest` error for the named field.
    pub fn invalid_request(field: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidRequest {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::SourceUnreadable { .. } => ErrorKind::SourceUnreadable,
            EngineError::SourceSchemaInvalid { .. } => ErrorKind::SourceSchemaInvalid,
            EngineError::SourceDataInvalid { .. } => ErrorKind::SourceDataInvalid,
            EngineError::NoPeriodsAvailable { .. } => ErrorKind::NoPeriodsAvailable,
            EngineError::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ErrorKind::Configuration
            }
        }
    }

    /// Returns a short message suitable for showing to the person who
    /// supplied the input files.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::SourceUnreadable => "Input file cannot be loaded",
            ErrorKind::SourceSchemaInvalid => "Input file has error. Please check Headers and Sheets",
            ErrorKind::SourceDataInvalid => {
                "Input file has duplicated staff ID or Error in Category Order"
            }
            ErrorKind::NoPeriodsAvailable => "Database file has no data for the requested months",
            ErrorKind::InvalidRequest => "Report start month or number of months is invalid",
            ErrorKind::Configuration => "Engine configuration could not be loaded",
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_schema_invalid_lists_missing_columns() {
        let error = EngineError::SourceSchemaInvalid {
            source_name: "extract".to_string(),
            missing: vec!["CCode".to_string(), "Rank".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Table 'extract' is missing required columns: CCode, Rank"
        );
    }

    #[test]
    fn test_data_invalid_displays_table_and_message() {
        let error = EngineError::data_invalid("roster", "duplicate staff id '1'");
        assert_eq!(
            error.to_string(),
            "Invalid data in table 'roster': duplicate staff id '1'"
        );
        assert_eq!(error.kind(), ErrorKind::SourceDataInvalid);
    }

    #[test]
    fn test_no_periods_available_displays_window() {
        let error = EngineError::NoPeriodsAvailable {
            start: "202507".to_string(),
            months: 12,
        };
        assert_eq!(
            error.to_string(),
            "No data available for 12 month(s) starting 202507"
        );
    }

    #[test]
    fn test_invalid_request_displays_field() {
        let error = EngineError::invalid_request("start_month", "must be between 1 and 12");
        assert_eq!(
            error.to_string(),
            "Invalid request field 'start_month': must be between 1 and 12"
        );
    }

    #[test]
    fn test_config_errors_share_configuration_kind() {
        let not_found = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        let parse = EngineError::ConfigParseError {
            path: "/bad/engine.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(not_found.kind(), ErrorKind::Configuration);
        assert_eq!(parse.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_each_kind_has_distinct_user_message() {
        let errors = [
            EngineError::SourceUnreadable {
                source_name: "roster".to_string(),
                message: "bad".to_string(),
            },
            EngineError::SourceSchemaInvalid {
                source_name: "roster".to_string(),
                missing: vec![],
            },
            EngineError::data_invalid("roster", "dup"),
            EngineError::NoPeriodsAvailable {
                start: "202501".to_string(),
                months: 1,
            },
            EngineError::invalid_request("months", "out of range"),
            EngineError::ConfigNotFound {
                path: "x".to_string(),
            },
        ];

        let messages: HashSet<&str> = errors.iter().map(|e| e.user_message()).collect();
        assert_eq!(messages.len(), errors.len());
        let codes: HashSet<&str> = errors.iter().map(|e| e.kind().code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_data_error() -> EngineResult<()> {
            Err(EngineError::data_invalid("roster", "dup"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_data_error()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
