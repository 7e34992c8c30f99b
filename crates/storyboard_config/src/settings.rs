//! TOML-backed configuration structures.

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storyboard_core::GenerationSettings;
use storyboard_error::{ConfigError, StoryboardError, StoryboardResult};
use tracing::{debug, instrument};

/// Generative Language REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Video job polling cadence.
///
/// # Example
///
/// ```toml
/// [polling]
/// interval_secs = 5
/// max_attempts = 24
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Seconds to wait before each status query
    pub interval_secs: u64,
    /// Status queries allowed before the job is declared timed out
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            max_attempts: 24,
        }
    }
}

impl PollingConfig {
    /// Polling interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Provider endpoint and retry behaviour.
///
/// # Example
///
/// ```toml
/// [provider]
/// base_url = "https://generativelanguage.googleapis.com/v1beta"
/// no_retry = false
/// max_retries = 3
/// retry_backoff_ms = 1000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// REST base URL, without trailing slash
    pub base_url: String,
    /// Disable automatic retry of transient provider statuses
    pub no_retry: bool,
    /// Override the per-status maximum retry count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<usize>,
    /// Override the per-status initial backoff
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_backoff_ms: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            no_retry: false,
            max_retries: None,
            retry_backoff_ms: None,
        }
    }
}

/// Top-level storyboard configuration.
///
/// # Example
///
/// ```no_run
/// use storyboard_config::StoryboardConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoryboardConfig::load()?;
/// println!("Scenes per story: {}", config.defaults.scene_count);
/// println!("Polling every {:?}", config.polling.interval());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct StoryboardConfig {
    /// Default generation settings for new storyboards
    #[serde(default)]
    pub defaults: GenerationSettings,
    /// Video job polling cadence
    #[serde(default)]
    pub polling: PollingConfig,
    /// Provider endpoint and retry behaviour
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl StoryboardConfig {
    /// Load configuration from a specific file path.
    ///
    /// Keys absent from the file take their built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> StoryboardResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                StoryboardError::from(ConfigError::unreadable(path.as_ref().display(), e))
            })?
            .try_deserialize()
            .map_err(|e| {
                StoryboardError::from(ConfigError::invalid(e))
            })
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped when absent.
    #[instrument]
    pub fn load() -> StoryboardResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../storyboard.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyboard/storyboard.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("storyboard").required(false));

        builder
            .build()
            .map_err(|e| {
                StoryboardError::from(ConfigError::unreadable("layered defaults", e))
            })?
            .try_deserialize()
            .map_err(|e| {
                StoryboardError::from(ConfigError::invalid(e))
            })
    }
}
