//! Generation orchestration for storyboards.
//!
//! Turns a story outline into characters, scenes and per-scene media by
//! composing the following components:
//!
//! - [`codec`]: base64, data URIs and PCM to WAV wrapping
//! - [`schema`]: structured-output contracts for text generation
//! - [`prompt`]: prompt text, including character consistency injection
//! - [`ModelRouter`]: per-modality call shapes and media extraction
//! - [`AsyncJobPoller`]: the video job state machine
//! - [`GenerationFacade`]: the public entry points
//!
//! Results are plain data. Callers fold them into a [`StoryboardState`],
//! either directly or through the [`GenerationEvent`]s emitted by the batch
//! helpers.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use storyboard_core::{GenerationSettings, Language};
//! use storyboard_interface::GenerationProvider;
//! use storyboard_pipeline::GenerationFacade;
//!
//! # async fn run(provider: Arc<dyn GenerationProvider>) -> storyboard_error::StoryboardResult<()> {
//! let facade = GenerationFacade::new(provider);
//! let settings = GenerationSettings::default();
//! let story = "A lone courier crosses a flooded city";
//!
//! let characters = facade
//!     .analyze_characters(story, &settings.text_model, settings.language)
//!     .await?;
//! let scenes = facade
//!     .breakdown_scenes(story, 3, &characters, &settings.text_model, Language::English)
//!     .await?;
//! let image = facade
//!     .generate_scene_image(&scenes[0], &settings, &characters)
//!     .await?;
//! println!("{}", image.mime());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod batch;
pub mod codec;
mod facade;
mod poller;
pub mod prompt;
mod router;
pub mod schema;
mod state;

pub use batch::{BatchSummary, EventOutcome, GenerationEvent, MediaTarget};
pub use facade::GenerationFacade;
pub use poller::{AsyncJobPoller, GenerationJob, JobState, PollerConfig};
pub use router::{ImageBackend, ModelRouter};
pub use schema::{FieldRule, FieldSpec, FieldType, StructuredContract};
pub use state::StoryboardState;
