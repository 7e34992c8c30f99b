//! Configuration for the storyboard generation pipeline.
//!
//! Settings are layered from TOML sources, later sources overriding earlier:
//! 1. Bundled defaults (`storyboard.toml` shipped with the library)
//! 2. `~/.config/storyboard/storyboard.toml`
//! 3. `./storyboard.toml`
//!
//! The provider credential is read separately from the environment (after
//! loading `.env`), never from configuration files.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod credential;
mod settings;

pub use credential::{API_KEY_VARS, Credential};
pub use settings::{DEFAULT_BASE_URL, PollingConfig, ProviderConfig, StoryboardConfig};
