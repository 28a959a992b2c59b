//! Structured configuration issues.
//!
//! Configuration sources (TOML files, environment, CLI flags) are validated
//! up front and every problem found is reported as a [`ConfigIssue`] rather
//! than failing on the first one. Callers decide what to do per [`Severity`].

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A numeric value lies outside its permitted range.
    OutOfRange {
        field: String,
        value: String,
        range: String,
    },
    /// A string field does not match any of the accepted values.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A field that must be set for the selected mode is empty.
    MissingValue { field: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
