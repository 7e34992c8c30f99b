//! Error types for the storyboard generation pipeline.
//!
//! This crate provides the foundation error types used throughout the storyboard workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use storyboard_error::{GenerationError, GenerationErrorKind, StoryboardResult};
//!
//! fn render_video(has_image: bool) -> StoryboardResult<()> {
//!     if !has_image {
//!         Err(GenerationError::new(GenerationErrorKind::Precondition(
//!             "scene has no reference image".to_string(),
//!         )))?
//!     }
//!     Ok(())
//! }
//!
//! let err = render_video(false).unwrap_err();
//! assert!(err.is_precondition());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod codec;
mod config;
mod error;
mod generation;
mod http;
mod json;

pub use builder::BuilderError;
pub use codec::{CodecError, CodecErrorKind};
pub use config::ConfigError;
pub use error::{StoryboardError, StoryboardErrorKind, StoryboardResult};
pub use generation::{GenerationError, GenerationErrorKind, Modality, RetryableError};
pub use http::HttpError;
pub use json::JsonError;
