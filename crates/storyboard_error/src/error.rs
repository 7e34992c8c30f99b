//! Top-level error wrapper types.

use crate::{
    BuilderError, CodecError, ConfigError, GenerationError, GenerationErrorKind, HttpError,
    JsonError, RetryableError,
};

/// The foundation error enum for the storyboard workspace.
///
/// # Examples
///
/// ```
/// use storyboard_error::{StoryboardError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: StoryboardError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryboardErrorKind {
    /// HTTP transport error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Media transcoding error
    #[from(CodecError)]
    Codec(CodecError),
    /// Request builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Generation error
    #[from(GenerationError)]
    Generation(GenerationError),
}

/// Storyboard error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyboard_error::{ConfigError, StoryboardResult};
///
/// fn might_fail() -> StoryboardResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyboard Error: {}", _0)]
pub struct StoryboardError(Box<StoryboardErrorKind>);

impl StoryboardError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryboardErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryboardErrorKind {
        &self.0
    }

    /// Get the generation error kind, if this is a generation error.
    pub fn generation_kind(&self) -> Option<&GenerationErrorKind> {
        match self.kind() {
            StoryboardErrorKind::Generation(err) => Some(&err.kind),
            _ => None,
        }
    }

    /// True if this is a [`GenerationErrorKind::Precondition`] violation.
    pub fn is_precondition(&self) -> bool {
        matches!(self.generation_kind(), Some(GenerationErrorKind::Precondition(_)))
    }

    /// True if this is a [`GenerationErrorKind::Validation`] failure.
    pub fn is_validation(&self) -> bool {
        matches!(self.generation_kind(), Some(GenerationErrorKind::Validation(_)))
    }
}

// Generic From implementation for any type that converts to StoryboardErrorKind
impl<T> From<T> for StoryboardError
where
    T: Into<StoryboardErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

impl RetryableError for StoryboardError {
    fn is_retryable(&self) -> bool {
        self.generation_kind().is_some_and(GenerationErrorKind::is_retryable)
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        self.generation_kind()
            .map(GenerationErrorKind::retry_strategy_params)
            .unwrap_or((2000, 5, 60))
    }
}

/// Result type for storyboard operations.
pub type StoryboardResult<T> = std::result::Result<T, StoryboardError>;
