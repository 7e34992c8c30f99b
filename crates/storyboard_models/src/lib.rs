//! Generation provider integrations for the storyboard pipeline.
//!
//! Each provider implements [`storyboard_interface::GenerationProvider`]
//! behind its own feature flag.
//!
//! # Available Providers
//!
//! - **Gemini** (Google: Gemini, Imagen, Veo, Gemini TTS) - Enable with `gemini` feature (default)
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "gemini")]
//! # {
//! use storyboard_models::GeminiClient;
//! use storyboard_interface::GenerationProvider;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::from_env()?;
//! let tokens = client.count_tokens("gemini-2.5-flash", "test").await?;
//! println!("{} tokens", tokens);
//! # Ok(())
//! # }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiClient, protocol};
