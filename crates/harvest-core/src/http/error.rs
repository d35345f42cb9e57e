//! HTTP error classification and normalization
//!
//! Transport failures and non-success statuses are normalized into a single
//! shape so the retry policy can decide on them uniformly.

use std::fmt;

/// Classification of a failed attempt for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClassification {
    /// Non-retryable status (4xx other than 429, plus redirects)
    ClientError,
    /// Server errors (5xx) - should retry
    ServerError,
    /// No HTTP status at all (connect failure, timeout) - should retry
    NetworkError,
    /// Rate limiting (429) - should retry with backoff
    RateLimitError,
}

impl ErrorClassification {
    /// Check if this error type should be retried
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorClassification::ServerError
                | ErrorClassification::NetworkError
                | ErrorClassification::RateLimitError
        )
    }
}

/// Normalized transport-level error
#[derive(Debug, Clone)]
pub struct HttpError {
    status_code: Option<u16>,
    classification: ErrorClassification,
    message: String,
}

impl HttpError {
    /// Build from a non-success HTTP status and a body excerpt
    pub fn from_status(status: u16, body: &str) -> Self {
        Self {
            status_code: Some(status),
            classification: Self::classify_status(status),
            message: excerpt(body),
        }
    }

    /// Build from a request that never produced a status
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            classification: ErrorClassification::NetworkError,
            message: message.into(),
        }
    }

    /// Create from a reqwest error (connect failure, timeout, ...)
    pub fn from_request_error(error: reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            format!("request timeout: {error}")
        } else if error.is_connect() {
            format!("connection failed: {error}")
        } else {
            format!("request failed: {error}")
        };
        Self::network(message)
    }

    /// Classify an HTTP status code
    fn classify_status(status: u16) -> ErrorClassification {
        match status {
            429 => ErrorClassification::RateLimitError,
            500..=599 => ErrorClassification::ServerError,
            _ => ErrorClassification::ClientError,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn classification(&self) -> ErrorClassification {
        self.classification
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this error should trigger a retry
    pub fn is_retryable(&self) -> bool {
        self.classification.is_retryable()
    }

    /// Short status description used in terminal response errors
    pub fn status_description(&self) -> String {
        match self.status_code {
            Some(status) if self.message.is_empty() => format!("status {status}"),
            Some(status) => format!("status {status}: {}", self.message),
            None => self.message.clone(),
        }
    }
}

// Terminal errors embed the body; cap it so log lines stay readable.
fn excerpt(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.len() <= MAX {
        trimmed.to_string()
    } else {
        let mut end = MAX;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(status) => write!(f, "HTTP error [{status}]: {}", self.message),
            None => write!(f, "HTTP error [network]: {}", self.message),
        }
    }
}

impl std::error::Error for HttpError {}
