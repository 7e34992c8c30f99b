//! HTTP error types.

/// Transport failure talking to the generation provider: connection refused,
/// TLS failure, unreadable body. Status errors are generation errors instead.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", message, line, file)]
pub struct HttpError {
    /// What the client was doing and the transport's reason
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Create an HTTP error at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// A request to a provider endpoint that never got a response.
    ///
    /// Only the path after the API version is kept, e.g. `models/veo:predictLongRunning`.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_error::HttpError;
    ///
    /// let err = HttpError::request(
    ///     "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:countTokens",
    ///     "connection refused",
    /// );
    /// assert_eq!(err.message, "Request to models/gemini-2.5-flash:countTokens failed: connection refused");
    /// ```
    #[track_caller]
    pub fn request(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::new(format!("Request to {} failed: {}", endpoint(url), reason))
    }
}

fn endpoint(url: &str) -> &str {
    url.split_once("/v1beta/")
        .map(|(_, path)| path)
        .unwrap_or(url)
}
