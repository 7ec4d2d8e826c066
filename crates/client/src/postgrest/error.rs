//! PostgREST client error types.

use std::sync::Arc;

/// Errors from the PostgREST client.
#[derive(Debug, thiserror::Error)]
pub enum PostgrestError {
    /// Anon key missing from configuration.
    #[error("missing API key: supabase_anon_key not set")]
    MissingApiKey,

    /// Base URL could not be turned into a table endpoint.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    /// Rejected credentials or row-level security denial.
    #[error("authentication failed: {message}")]
    Auth { message: String },

    #[error("rate limited: too many requests")]
    RateLimited,

    /// Non-success status with the message PostgREST returned, if any.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("request timeout")]
    Timeout,

    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    #[error("parse error: {0}")]
    Parse(String),

    /// The filter matched no row, so nothing was changed.
    #[error("no row with id {0}")]
    MissingRow(String),
}

impl From<reqwest::Error> for PostgrestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { PostgrestError::Timeout } else { PostgrestError::Network(Arc::new(err)) }
    }
}

/// Every client failure is an opaque remote failure to the rest of the app.
impl From<PostgrestError> for todos_core::Error {
    fn from(err: PostgrestError) -> Self {
        todos_core::Error::remote(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PostgrestError::Http { status: 400, message: "bad filter".into() };
        assert_eq!(err.to_string(), "HTTP 400: bad filter");

        let err = PostgrestError::MissingRow("42".into());
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_collapses_into_remote_failure() {
        let err: todos_core::Error = PostgrestError::RateLimited.into();
        assert!(matches!(err, todos_core::Error::Remote(msg) if msg.contains("rate limited")));
    }
}
