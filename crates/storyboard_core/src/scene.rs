//! Scene records produced by the breakdown step.

use serde::{Deserialize, Serialize};

/// One storyboard scene.
///
/// Image, video and audio are filled in independently; each has its own
/// loading flag so a slow video job never blocks an image retry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Locally generated identity
    pub id: String,
    /// Ordinal position, starting at 1
    pub number: u32,
    /// What happens in the scene
    pub description: String,
    /// Key line of dialogue, or a "no dialogue" marker
    pub dialogue: String,
    /// Action summary
    pub action: String,
    /// Camera angle and framing
    pub camera: String,
    /// Image generation prompt
    pub visual_prompt: String,
    /// Names of characters appearing in the scene
    #[serde(default)]
    pub characters: Vec<String>,
    /// Sound effects and music cues
    #[serde(default)]
    pub sound_prompt: String,
    /// Estimated on-screen duration, e.g. `"5s"`
    #[serde(default)]
    pub estimated_duration: String,
    /// Transition into the next scene
    #[serde(default)]
    pub transition: String,
    /// Motion-focused prompt for video generation
    #[serde(default)]
    pub video_prompt: String,
    /// Generated still as a data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Generated clip as a data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Generated narration as a data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// Image generation in flight
    #[serde(skip)]
    pub image_loading: bool,
    /// Video generation in flight
    #[serde(skip)]
    pub video_loading: bool,
    /// Audio generation in flight
    #[serde(skip)]
    pub audio_loading: bool,
}

impl Scene {
    /// Generate a fresh scene identity.
    pub fn new_id() -> String {
        format!("scene-{}", uuid::Uuid::new_v4())
    }

    /// Apply a user edit. Unset patch fields leave the scene unchanged.
    pub fn apply(&mut self, patch: ScenePatch) {
        let ScenePatch {
            description,
            dialogue,
            action,
            camera,
            visual_prompt,
            characters,
            sound_prompt,
            estimated_duration,
            transition,
            video_prompt,
        } = patch;
        if let Some(v) = description {
            self.description = v;
        }
        if let Some(v) = dialogue {
            self.dialogue = v;
        }
        if let Some(v) = action {
            self.action = v;
        }
        if let Some(v) = camera {
            self.camera = v;
        }
        if let Some(v) = visual_prompt {
            self.visual_prompt = v;
        }
        if let Some(v) = characters {
            self.characters = v;
        }
        if let Some(v) = sound_prompt {
            self.sound_prompt = v;
        }
        if let Some(v) = estimated_duration {
            self.estimated_duration = v;
        }
        if let Some(v) = transition {
            self.transition = v;
        }
        if let Some(v) = video_prompt {
            self.video_prompt = v;
        }
    }
}

/// Partial update for the text fields of a [`Scene`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePatch {
    /// Replacement description
    pub description: Option<String>,
    /// Replacement dialogue
    pub dialogue: Option<String>,
    /// Replacement action summary
    pub action: Option<String>,
    /// Replacement camera direction
    pub camera: Option<String>,
    /// Replacement image prompt
    pub visual_prompt: Option<String>,
    /// Replacement character list
    pub characters: Option<Vec<String>>,
    /// Replacement sound prompt
    pub sound_prompt: Option<String>,
    /// Replacement duration estimate
    pub estimated_duration: Option<String>,
    /// Replacement transition
    pub transition: Option<String>,
    /// Replacement video prompt
    pub video_prompt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(Scene::new_id(), Scene::new_id());
    }

    #[test]
    fn patch_keeps_media() {
        let mut scene = Scene {
            id: Scene::new_id(),
            number: 1,
            image_url: Some("data:image/png;base64,AAAA".into()),
            ..Default::default()
        };
        scene.apply(ScenePatch {
            camera: Some("Wide shot".into()),
            ..Default::default()
        });
        assert_eq!(scene.camera, "Wide shot");
        assert!(scene.image_url.is_some());
    }
}
