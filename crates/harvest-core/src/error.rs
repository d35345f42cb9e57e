//! Error types for the Harvest core library
//!
//! One error enum covers the crate, using thiserror for ergonomic error
//! definitions and anyhow for flexible error sources. Validation failures
//! carry every issue found, not just the first.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::HttpError;

/// A single schema violation found in a response payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaIssue {
    /// JSON pointer to the offending part of the payload
    pub path: String,
    /// Human-readable description of the violation
    pub message: String,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// A single invalid or missing field found during validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Name of the field that failed validation
    pub field: String,
    /// What was wrong with it
    pub message: String,
}

impl FieldIssue {
    pub fn new<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Main error type for Harvest operations
#[derive(Error, Debug)]
pub enum Error {
    /// A response outside the 2xx range, or one that failed schema
    /// validation; carries the endpoint and every issue found
    #[error("invalid response from '{endpoint}': {detail}{rendered}", rendered = format_schema_issues(.issues))]
    InvalidResponse {
        endpoint: String,
        detail: String,
        issues: Vec<SchemaIssue>,
    },

    /// Transport-level failure that exhausted the retry loop; the last
    /// underlying error is carried unchanged
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Upload target failure
    #[error("upload to '{target}' failed: {message}")]
    Upload {
        target: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Upload descriptor failed validation before any target was invoked
    #[error("invalid upload descriptor:{rendered}", rendered = format_field_issues(.issues))]
    InvalidDescriptor { issues: Vec<FieldIssue> },

    /// Environment configuration failed validation; fatal at startup
    #[error("invalid configuration:{rendered}", rendered = format_field_issues(.issues))]
    Configuration { issues: Vec<FieldIssue> },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation not supported by this implementation
    #[error("unsupported operation: {message}")]
    Unsupported { message: String },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

fn format_schema_issues(issues: &[SchemaIssue]) -> String {
    issues.iter().map(|issue| format!("\n  - {issue}")).collect()
}

fn format_field_issues(issues: &[FieldIssue]) -> String {
    issues.iter().map(|issue| format!("\n  - {issue}")).collect()
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_response_lists_every_issue() {
        let err = Error::InvalidResponse {
            endpoint: "metrics".to_string(),
            detail: "response failed schema validation (2 issue(s))".to_string(),
            issues: vec![
                SchemaIssue {
                    path: "/cpu".to_string(),
                    message: "not a number".to_string(),
                },
                SchemaIssue {
                    path: "/disk".to_string(),
                    message: "missing".to_string(),
                },
            ],
        };
        let rendered = err.to_string();
        assert!(rendered.contains("metrics"));
        assert!(rendered.contains("/cpu: not a number"));
        assert!(rendered.contains("/disk: missing"));
    }

    #[test]
    fn configuration_error_is_field_by_field() {
        let err = Error::Configuration {
            issues: vec![
                FieldIssue::new("SERVICE_NAME", "must not be empty"),
                FieldIssue::new("SITE_NAME", "required when SERVICE_LOCATION is 'site'"),
            ],
        };
        let rendered = err.to_string();
        assert!(rendered.contains("SERVICE_NAME: must not be empty"));
        assert!(rendered.contains("SITE_NAME: required when SERVICE_LOCATION is 'site'"));
    }
}
