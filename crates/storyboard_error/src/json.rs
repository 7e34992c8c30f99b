//! JSON error types.

/// Longest body prefix quoted in a provider response parse error.
const BODY_EXCERPT_CHARS: usize = 120;

/// A provider response or storyboard document that is not the expected JSON.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} at line {} in {}", message, line, file)]
pub struct JsonError {
    /// What failed to parse, and why
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Create a JSON error at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// A 2xx provider body that does not decode, quoting the start of the body.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_error::JsonError;
    ///
    /// let err = JsonError::provider_response("expected value at line 1", "<html>quota page</html>");
    /// assert!(err.message.contains("provider response"));
    /// assert!(err.message.contains("<html>quota page</html>"));
    /// ```
    #[track_caller]
    pub fn provider_response(reason: impl std::fmt::Display, body: &str) -> Self {
        let excerpt: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
        let ellipsis = if body.chars().count() > BODY_EXCERPT_CHARS { "..." } else { "" };
        Self::new(format!(
            "Failed to parse provider response: {reason} (body: {excerpt}{ellipsis})"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        let err = JsonError::provider_response("trailing characters", &body);
        assert!(err.message.ends_with("...)"));
        assert!(err.message.len() < 250);
        assert!(err.file.ends_with("json.rs"));
    }
}
