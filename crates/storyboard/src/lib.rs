//! Storyboard - story outline to storyboard generation
//!
//! Turns a free-text story outline into a storyboard: a character registry,
//! an ordered scene breakdown, and per-scene images, video clips and voiced
//! dialogue, all produced by a remote multimodal provider.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use storyboard::{GeminiClient, GenerationFacade, GenerationSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let facade = GenerationFacade::new(Arc::new(GeminiClient::from_env()?));
//!     let settings = GenerationSettings::default();
//!
//!     let characters = facade
//!         .analyze_characters("A lone courier crosses a flooded city", &settings.text_model, settings.language)
//!         .await?;
//!     println!("{} characters", characters.len());
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `gemini` - Google Generative Language provider (default)
//! - `observability` - OpenTelemetry span export to stdout
//! - `api` - Run tests that call the live API
//!
//! # Architecture
//!
//! - `storyboard_error` - Error types
//! - `storyboard_core` - Characters, scenes, settings, media handles
//! - `storyboard_interface` - `GenerationProvider` and `Sleeper` traits
//! - `storyboard_config` - TOML configuration and credential loading
//! - `storyboard_models` - Gemini REST provider
//! - `storyboard_pipeline` - Prompting, routing, validation, video polling
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod observability;

pub use storyboard_config::*;
pub use storyboard_core::*;
pub use storyboard_error::*;
pub use storyboard_interface::*;
pub use storyboard_pipeline::*;

#[cfg(feature = "gemini")]
pub use storyboard_models::GeminiClient;

pub use observability::{LogFormat, LogSettings, init_logging};
