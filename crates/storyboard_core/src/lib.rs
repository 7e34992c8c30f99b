//! Core data types for the storyboard generation pipeline.
//!
//! This crate provides the entities shared by every layer: the character
//! registry, scene records, generation settings and the media handles returned
//! by generation calls.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod character;
mod media;
mod scene;
mod settings;
mod suggestion;

pub use character::{Character, CharacterPatch};
pub use media::MediaAsset;
pub use scene::{Scene, ScenePatch};
pub use settings::{AspectRatio, GenerationSettings, ImageSize, Language};
pub use storyboard_error::Modality;
pub use suggestion::StorySuggestion;
