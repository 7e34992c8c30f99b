//! Character registry entries.

use serde::{Deserialize, Serialize};

/// A story character with its canonical visual definition.
///
/// `visual_prompt` is the text re-injected into every scene prompt that
/// references the character.
///
/// # Examples
///
/// ```
/// use storyboard_core::Character;
///
/// let akira = Character::new("Akira", "A courier", "Silver jacket, red visor", "Clipped, fast");
/// assert!(akira.id.starts_with("char-"));
/// assert!(akira.image_url.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Locally generated identity
    pub id: String,
    /// Display name, matched loosely against scene references
    pub name: String,
    /// Personality and role summary
    pub description: String,
    /// Canonical appearance text
    pub visual_prompt: String,
    /// Voice and performance guidance
    pub speaker_style: String,
    /// Reference image as a data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Reference image generation in flight
    #[serde(skip)]
    pub image_loading: bool,
}

impl Character {
    /// Create a character with a fresh identity and no reference image.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        visual_prompt: impl Into<String>,
        speaker_style: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("char-{}", uuid::Uuid::new_v4()),
            name: name.into(),
            description: description.into(),
            visual_prompt: visual_prompt.into(),
            speaker_style: speaker_style.into(),
            image_url: None,
            image_loading: false,
        }
    }

    /// Apply a user edit. Unset patch fields leave the character unchanged.
    pub fn apply(&mut self, patch: CharacterPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(visual_prompt) = patch.visual_prompt {
            self.visual_prompt = visual_prompt;
        }
        if let Some(speaker_style) = patch.speaker_style {
            self.speaker_style = speaker_style;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
    }
}

/// Partial update for a [`Character`], merged by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPatch {
    /// Replacement name
    pub name: Option<String>,
    /// Replacement description
    pub description: Option<String>,
    /// Replacement visual prompt
    pub visual_prompt: Option<String>,
    /// Replacement speaker style
    pub speaker_style: Option<String>,
    /// Replacement reference image
    pub image_url: Option<String>,
}
