//! Generation error taxonomy and retry classification.

use serde::{Deserialize, Serialize};

/// Generation modality a request targets.
///
/// # Examples
///
/// ```
/// use storyboard_error::Modality;
///
/// assert_eq!(format!("{}", Modality::Video), "video");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// Structured (schema-constrained) text
    #[display("text")]
    Text,
    /// Still image
    #[display("image")]
    Image,
    /// Long-running video job
    #[display("video")]
    Video,
    /// Speech synthesis
    #[display("audio")]
    Audio,
}

/// Generation-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// No provider credential configured
    #[display("GEMINI_API_KEY (or API_KEY) environment variable not set")]
    MissingCredential,
    /// Structured output malformed or missing required fields
    #[display("Structured output rejected: {}", _0)]
    Validation(String),
    /// Provider reported an error, or no usable media in the response
    #[display("{} generation failed: {}", modality, message)]
    Generation {
        /// Modality of the failed call
        modality: Modality,
        /// Provider or extraction message
        message: String,
    },
    /// Provider rejected the request with a non-success HTTP status
    #[display("HTTP {} error: {}", status_code, message)]
    ProviderStatus {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason
        message: String,
    },
    /// Video polling exceeded the bounded attempt count
    #[display("Video job did not finish after {} polling attempts", attempts)]
    Timeout {
        /// Number of polls performed
        attempts: u32,
    },
    /// Video job finished without a result locator
    #[display("Video rejected by content policy: {}", _0)]
    SafetyRejection(String),
    /// Post-completion asset fetch failed
    #[display("Asset download failed: {}", _0)]
    Network(String),
    /// Request refused before any network call
    #[display("Precondition violated: {}", _0)]
    Precondition(String),
}

impl GenerationErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationErrorKind::ProviderStatus { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }

    /// Get retry strategy parameters for this error type.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    pub fn retry_strategy_params(&self) -> (u64, usize, u64) {
        match self {
            GenerationErrorKind::ProviderStatus { status_code, .. } => match *status_code {
                429 => (5000, 3, 40),
                503 => (2000, 5, 60),
                500 | 502 | 504 => (1000, 3, 8),
                408 => (2000, 4, 30),
                _ => (2000, 5, 60),
            },
            _ => (2000, 5, 60),
        }
    }

    /// True for the GenerationFailure class (provider error or missing media).
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            GenerationErrorKind::Generation { .. } | GenerationErrorKind::ProviderStatus { .. }
        )
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyboard_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::MissingCredential);
/// assert!(format!("{}", err).contains("GEMINI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a [`GenerationErrorKind::Generation`] failure.
    #[track_caller]
    pub fn failed(modality: Modality, message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Generation {
            modality,
            message: message.into(),
        })
    }

    /// Shorthand for a [`GenerationErrorKind::Validation`] failure.
    #[track_caller]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Validation(message.into()))
    }
}

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use storyboard_error::{GenerationError, GenerationErrorKind, RetryableError};
///
/// let err = GenerationError::new(GenerationErrorKind::ProviderStatus {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// let (backoff, retries, _max_delay) = err.retry_strategy_params();
/// assert_eq!(backoff, 2000);
/// assert_eq!(retries, 5);
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Transient errors like 503 (service unavailable) or 429 (rate limit)
    /// return true. Permanent errors like 401 or 400 return false.
    fn is_retryable(&self) -> bool;

    /// Get retry strategy parameters for this error.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        (2000, 5, 60)
    }
}

impl RetryableError for GenerationError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        self.kind.retry_strategy_params()
    }
}
