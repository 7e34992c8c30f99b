//! Single owner of storyboard state.

use serde::{Deserialize, Serialize};
use storyboard_core::{
    Character, CharacterPatch, GenerationSettings, Scene, ScenePatch, StorySuggestion,
};
use tracing::debug;

use crate::batch::{EventOutcome, GenerationEvent, MediaTarget};

/// Everything a storyboard session has produced so far.
///
/// Generation results reach the state only through [`StoryboardState::apply`],
/// so concurrent tasks never write to it directly.
///
/// # Examples
///
/// ```
/// use storyboard_core::Scene;
/// use storyboard_pipeline::{GenerationEvent, MediaTarget, StoryboardState};
///
/// let mut state = StoryboardState::new("A lone courier crosses a flooded city");
/// state.replace_scenes(vec![Scene { id: "scene-1".into(), number: 1, ..Default::default() }]);
///
/// assert!(state.mark_loading(MediaTarget::SceneImage, "scene-1"));
/// state.apply(GenerationEvent::failed(MediaTarget::SceneImage, "scene-1", "blocked"));
///
/// let scene = state.scene("scene-1").unwrap();
/// assert!(!scene.image_loading);
/// assert!(scene.image_url.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardState {
    /// Story outline
    pub story: String,
    /// Settings for every generation call
    pub settings: GenerationSettings,
    /// Character registry
    pub characters: Vec<Character>,
    /// Scenes in story order
    pub scenes: Vec<Scene>,
    /// Director's suggestion, if requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<StorySuggestion>,
}

impl StoryboardState {
    /// Empty state for a story with default settings.
    pub fn new(story: impl Into<String>) -> Self {
        Self {
            story: story.into(),
            ..Default::default()
        }
    }

    /// Empty state for a story with explicit settings.
    pub fn with_settings(story: impl Into<String>, settings: GenerationSettings) -> Self {
        Self {
            story: story.into(),
            settings,
            ..Default::default()
        }
    }

    /// Character by id.
    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|character| character.id == id)
    }

    /// Scene by id.
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.id == id)
    }

    /// Replace the character registry wholesale.
    pub fn replace_characters(&mut self, characters: Vec<Character>) {
        self.characters = characters;
    }

    /// Replace the scene list wholesale.
    pub fn replace_scenes(&mut self, scenes: Vec<Scene>) {
        self.scenes = scenes;
    }

    /// Apply a user edit to a character. Returns false for an unknown id.
    pub fn update_character(&mut self, id: &str, patch: CharacterPatch) -> bool {
        match self.characters.iter_mut().find(|character| character.id == id) {
            Some(character) => {
                character.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Apply a user edit to a scene. Returns false for an unknown id.
    pub fn update_scene(&mut self, id: &str, patch: ScenePatch) -> bool {
        match self.scenes.iter_mut().find(|scene| scene.id == id) {
            Some(scene) => {
                scene.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Set the loading flag for `target` on `id`. Returns false for an
    /// unknown id.
    pub fn mark_loading(&mut self, target: MediaTarget, id: &str) -> bool {
        self.slot(target, id)
            .map(|(loading, _)| *loading = true)
            .is_some()
    }

    /// Fold a terminal event into the state.
    ///
    /// Success stores the media and clears the loading flag; failure only
    /// clears the flag. Returns false when the id is unknown.
    pub fn apply(&mut self, event: GenerationEvent) -> bool {
        let target = *event.target();
        let Some((loading, field)) = self.slot(target, event.id()) else {
            debug!(target_kind = %target, id = %event.id(), "Event for unknown entity ignored");
            return false;
        };
        *loading = false;
        if let EventOutcome::Ready(uri) = event.outcome() {
            *field = Some(uri.clone());
        }
        true
    }

    /// Loading flag and media field addressed by `target` and `id`.
    fn slot(&mut self, target: MediaTarget, id: &str) -> Option<(&mut bool, &mut Option<String>)> {
        if target == MediaTarget::CharacterImage {
            return self
                .characters
                .iter_mut()
                .find(|character| character.id == id)
                .map(|character| (&mut character.image_loading, &mut character.image_url));
        }

        let scene = self.scenes.iter_mut().find(|scene| scene.id == id)?;
        Some(match target {
            MediaTarget::SceneVideo => (&mut scene.video_loading, &mut scene.video_url),
            MediaTarget::SceneAudio => (&mut scene.audio_loading, &mut scene.audio_url),
            _ => (&mut scene.image_loading, &mut scene.image_url),
        })
    }
}
