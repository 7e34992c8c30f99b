//! Configuration error types.

/// A `storyboard.toml` layer that cannot be read or does not fit the settings.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a configuration error at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_error::ConfigError;
    ///
    /// let err = ConfigError::new("polling.max_attempts must be positive");
    /// assert!(err.message.contains("max_attempts"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// The configuration sources could not be read or merged.
    ///
    /// `source` names the layer, e.g. a file path or "layered defaults".
    #[track_caller]
    pub fn unreadable(source: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        Self::new(format!("Failed to read configuration from {source}: {reason}"))
    }

    /// The merged configuration does not deserialize into the settings.
    #[track_caller]
    pub fn invalid(reason: impl std::fmt::Display) -> Self {
        Self::new(format!("Failed to parse configuration: {reason}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_name_source_and_reason() {
        let err = ConfigError::unreadable("./storyboard.toml", "expected `=`");
        assert_eq!(
            err.message,
            "Failed to read configuration from ./storyboard.toml: expected `=`"
        );

        let err = ConfigError::invalid("invalid type: string \"many\", expected u32 for key `polling.max_attempts`");
        assert!(err.message.starts_with("Failed to parse configuration"));
        assert!(err.to_string().contains("config.rs"));
    }
}
