//! Generation settings shared by every call.

use serde::{Deserialize, Serialize};

/// Frame shape accepted by both image and video backends.
///
/// Only the two video-compatible values exist; anything else coerces to
/// [`AspectRatio::Landscape`].
///
/// # Examples
///
/// ```
/// use storyboard_core::AspectRatio;
///
/// assert_eq!(AspectRatio::normalize("9:16"), AspectRatio::Portrait);
/// assert_eq!(AspectRatio::normalize("4:3"), AspectRatio::Landscape);
/// assert_eq!(AspectRatio::Portrait.as_str(), "9:16");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(from = "String", into = "String")]
pub enum AspectRatio {
    /// 16:9
    #[default]
    #[display("16:9")]
    Landscape,
    /// 9:16
    #[display("9:16")]
    Portrait,
}

impl AspectRatio {
    /// Coerce any wire value to one of the two supported ratios.
    pub fn normalize(value: &str) -> Self {
        match value.trim() {
            "9:16" => AspectRatio::Portrait,
            _ => AspectRatio::Landscape,
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }
}

impl From<String> for AspectRatio {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}

impl From<&str> for AspectRatio {
    fn from(value: &str) -> Self {
        Self::normalize(value)
    }
}

impl From<AspectRatio> for String {
    fn from(value: AspectRatio) -> Self {
        value.as_str().to_string()
    }
}

/// Output resolution bucket for image models that accept one.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum ImageSize {
    /// Low resolution bucket
    #[default]
    #[serde(rename = "1K")]
    #[display("1K")]
    Low,
    /// High resolution bucket
    #[serde(rename = "2K")]
    #[display("2K")]
    High,
}

/// Language for descriptive output fields.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Language {
    /// Simplified Chinese
    #[default]
    Chinese,
    /// English
    English,
}

/// Settings applied to every generation call of a storyboard.
///
/// Serialized with camelCase names; snake_case names are accepted on input
/// so the same struct reads from TOML configuration.
///
/// # Examples
///
/// ```
/// use storyboard_core::{AspectRatio, GenerationSettings};
///
/// let settings = GenerationSettings::default();
/// assert_eq!(settings.aspect_ratio, AspectRatio::Landscape);
/// assert_eq!(settings.scene_count, 8);
/// assert_eq!(settings.image_model, "gemini-2.5-flash-image");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationSettings {
    /// Visual style tag, e.g. "Cinematic" or "Watercolor"
    pub style: String,
    /// Frame shape for images and video
    #[serde(alias = "aspect_ratio")]
    pub aspect_ratio: AspectRatio,
    /// Number of scenes to break the story into
    #[serde(alias = "scene_count")]
    pub scene_count: u32,
    /// Language of descriptive output
    pub language: Language,
    /// Structured text model
    #[serde(alias = "text_model")]
    pub text_model: String,
    /// Image model
    #[serde(alias = "image_model")]
    pub image_model: String,
    /// Resolution bucket for image models that accept one
    #[serde(alias = "image_size")]
    pub image_size: ImageSize,
    /// Video model
    #[serde(alias = "video_model")]
    pub video_model: String,
    /// Speech synthesis model
    #[serde(alias = "audio_model")]
    pub audio_model: String,
    /// Default voice identity for speech synthesis
    pub voice: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            style: "Cinematic".to_string(),
            aspect_ratio: AspectRatio::Landscape,
            scene_count: 8,
            language: Language::Chinese,
            text_model: "gemini-3-pro-preview".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            image_size: ImageSize::Low,
            video_model: "veo-3.1-fast-generate-preview".to_string(),
            audio_model: "gemini-2.5-flash-preview-tts".to_string(),
            voice: "Kore".to_string(),
        }
    }
}
