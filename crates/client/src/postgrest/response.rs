//! PostgREST response handling.

use serde::Deserialize;

use super::PostgrestError;

/// Error body PostgREST returns alongside 4xx/5xx statuses.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl ApiError {
    /// Best human-readable message from an error body, falling back to the
    /// raw text when it is not JSON.
    pub fn describe(body: &[u8]) -> String {
        match serde_json::from_slice::<ApiError>(body) {
            Ok(err) => {
                let mut parts: Vec<String> = Vec::new();
                if let Some(code) = err.code {
                    parts.push(format!("[{code}]"));
                }
                parts.extend(err.message);
                parts.extend(err.details);
                parts.extend(err.hint.map(|hint| format!("(hint: {hint})")));
                parts.join(" ")
            }
            Err(_) => String::from_utf8_lossy(body).trim().to_string(),
        }
    }
}

/// Total row count from a `Content-Range` header.
///
/// Accepts `*/N` and `a-b/N`; an unknown total (`*`) yields `None`.
pub fn parse_content_range(value: &str) -> Option<u64> {
    let (_, total) = value.trim().rsplit_once('/')?;
    total.parse().ok()
}

/// Decode a JSON array of rows.
pub fn parse_rows<T: for<'de> Deserialize<'de>>(body: &[u8]) -> Result<Vec<T>, PostgrestError> {
    serde_json::from_slice(body).map_err(|e| PostgrestError::Parse(e.to_string()))
}
