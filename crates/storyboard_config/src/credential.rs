//! Provider credential.

use storyboard_error::{GenerationError, GenerationErrorKind, StoryboardResult};
use tracing::{debug, instrument};

/// Environment variables consulted for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// API key for the generation provider.
///
/// The key never appears in `Debug` output or logs.
///
/// # Examples
///
/// ```
/// use storyboard_config::Credential;
///
/// let credential = Credential::from_lookup(|var| match var {
///     "API_KEY" => Some("secret".to_string()),
///     _ => None,
/// })
/// .unwrap();
///
/// assert_eq!(credential.api_key(), "secret");
/// assert!(!format!("{:?}", credential).contains("secret"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    api_key: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Credential {
    /// Wrap an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Read the key from the process environment, loading `.env` first.
    ///
    /// # Errors
    ///
    /// [`GenerationErrorKind::MissingCredential`] when neither
    /// `GEMINI_API_KEY` nor `API_KEY` holds a non-blank value.
    #[instrument]
    pub fn from_env() -> StoryboardResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve the key through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StoryboardResult<Self> {
        API_KEY_VARS
            .iter()
            .find_map(|var| {
                lookup(var)
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty())
                    .inspect(|_| debug!(var, "Found provider credential"))
            })
            .map(Self::new)
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::MissingCredential).into())
    }

    /// The raw API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}
