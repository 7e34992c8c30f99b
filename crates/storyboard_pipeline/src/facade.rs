//! Public entry points of the generation pipeline.

use std::sync::Arc;

use storyboard_core::{
    AspectRatio, Character, GenerationSettings, ImageSize, Language, MediaAsset, Scene,
    StorySuggestion,
};
use storyboard_error::{GenerationError, GenerationErrorKind, StoryboardResult};
use storyboard_interface::{GenerationProvider, Sleeper, TokioSleeper};
use tracing::{debug, info, instrument, warn};

use crate::poller::{AsyncJobPoller, PollerConfig};
use crate::prompt;
use crate::router::ModelRouter;
use crate::schema::{self, StructuredContract};

/// Model used for the credential probe.
const CREDENTIAL_PROBE_MODEL: &str = "gemini-2.5-flash";
/// Sampling temperature for the director's suggestion.
const SUGGESTION_TEMPERATURE: f32 = 0.7;

/// Composes prompts, routing, validation and polling into one call per
/// generation step.
///
/// Every operation returns plain data; nothing here mutates caller state.
/// Preconditions are checked before any provider call is made.
#[derive(Debug, Clone)]
pub struct GenerationFacade {
    router: ModelRouter,
    poller: AsyncJobPoller,
}

#[track_caller]
fn precondition(message: impl Into<String>) -> GenerationError {
    GenerationError::new(GenerationErrorKind::Precondition(message.into()))
}

fn require_story(story: &str) -> StoryboardResult<()> {
    if story.trim().is_empty() {
        return Err(precondition("story outline is empty").into());
    }
    Ok(())
}

impl GenerationFacade {
    /// Facade over `provider` with the tokio timer and default polling.
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self::with_poller(provider, Arc::new(TokioSleeper), PollerConfig::default())
    }

    /// Facade with an explicit wait primitive and polling cadence.
    pub fn with_poller(
        provider: Arc<dyn GenerationProvider>,
        sleeper: Arc<dyn Sleeper>,
        config: PollerConfig,
    ) -> Self {
        Self {
            router: ModelRouter::new(provider.clone()),
            poller: AsyncJobPoller::with_sleeper(provider, sleeper, config),
        }
    }

    /// The router used for synchronous calls.
    pub fn router(&self) -> &ModelRouter {
        &self.router
    }

    /// The poller used for video jobs.
    pub fn poller(&self) -> &AsyncJobPoller {
        &self.poller
    }

    /// Extract the main characters of a story.
    ///
    /// # Errors
    ///
    /// Precondition for a blank story; validation when the response breaks
    /// the character contract; provider failures as reported.
    #[instrument(skip(self, story), fields(story_len = story.len()))]
    pub async fn analyze_characters(
        &self,
        story: &str,
        model: &str,
        language: Language,
    ) -> StoryboardResult<Vec<Character>> {
        require_story(story)?;
        let raw = self
            .router
            .generate_structured(
                model,
                prompt::character_analysis_instruction(language),
                prompt::character_analysis_content(story),
                &StructuredContract::characters(),
                None,
            )
            .await?;
        let characters = schema::parse_characters(&raw)?;
        info!(count = characters.len(), "Characters extracted");
        Ok(characters)
    }

    /// Render a character design sheet.
    #[instrument(skip(self, character), fields(character = %character.name))]
    pub async fn generate_character_image(
        &self,
        character: &Character,
        style: &str,
        aspect_ratio: AspectRatio,
        model: &str,
        size: ImageSize,
    ) -> StoryboardResult<MediaAsset> {
        if character.visual_prompt.trim().is_empty() {
            return Err(precondition(format!(
                "character '{}' has no visual prompt",
                character.name
            ))
            .into());
        }
        let image_prompt = prompt::character_image_prompt(character, style);
        self.router
            .generate_image(model, image_prompt, aspect_ratio, size)
            .await
    }

    /// Break a story into exactly `count` scenes.
    ///
    /// Character profiles are embedded in the instruction so scene prompts
    /// restate each character's appearance.
    #[instrument(skip(self, story, characters), fields(story_len = story.len(), characters = characters.len()))]
    pub async fn breakdown_scenes(
        &self,
        story: &str,
        count: u32,
        characters: &[Character],
        model: &str,
        language: Language,
    ) -> StoryboardResult<Vec<Scene>> {
        require_story(story)?;
        if count == 0 {
            return Err(precondition("scene count must be at least 1").into());
        }
        let raw = self
            .router
            .generate_structured(
                model,
                prompt::scene_breakdown_instruction(count, characters, language),
                prompt::scene_breakdown_content(story, count),
                &StructuredContract::scenes(),
                None,
            )
            .await?;
        let scenes = schema::parse_scenes(&raw, count)?;
        info!(count = scenes.len(), "Scenes generated");
        Ok(scenes)
    }

    /// Render a scene image with the named characters' visual definitions
    /// injected.
    #[instrument(skip_all, fields(scene = scene.number, model = %settings.image_model))]
    pub async fn generate_scene_image(
        &self,
        scene: &Scene,
        settings: &GenerationSettings,
        characters: &[Character],
    ) -> StoryboardResult<MediaAsset> {
        let image_prompt = prompt::scene_image_prompt(scene, &settings.style, characters);
        debug!(prompt_len = image_prompt.len(), "Scene image prompt composed");
        self.router
            .generate_image(
                &settings.image_model,
                image_prompt,
                settings.aspect_ratio,
                settings.image_size,
            )
            .await
    }

    /// Animate a scene from its image.
    ///
    /// # Errors
    ///
    /// Precondition when the scene has no image; otherwise whatever the
    /// video job ends in (failure, safety rejection, timeout, network).
    #[instrument(skip_all, fields(scene = scene.number, model = %settings.video_model))]
    pub async fn generate_scene_video(
        &self,
        scene: &Scene,
        settings: &GenerationSettings,
    ) -> StoryboardResult<MediaAsset> {
        let image_uri = scene
            .image_url
            .as_deref()
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| precondition(format!("scene {} has no image", scene.number)))?;

        let request = ModelRouter::video_request(
            &settings.video_model,
            prompt::scene_video_prompt(scene),
            image_uri,
            settings.aspect_ratio,
        )?;
        self.poller.run(&request).await
    }

    /// Voice a scene's dialogue. `voice` overrides the settings' voice.
    #[instrument(skip_all, fields(scene = scene.number, model = %settings.audio_model))]
    pub async fn generate_scene_audio(
        &self,
        scene: &Scene,
        settings: &GenerationSettings,
        voice: Option<&str>,
    ) -> StoryboardResult<MediaAsset> {
        let text = prompt::scene_audio_text(scene)
            .ok_or_else(|| precondition(format!("scene {} has no dialogue", scene.number)))?;
        let voice = voice
            .filter(|voice| !voice.trim().is_empty())
            .unwrap_or(settings.voice.as_str());
        self.router
            .synthesize_audio(&settings.audio_model, text, voice)
            .await
    }

    /// Probe the credential with a token count call.
    ///
    /// Never fails; any error reads as an invalid credential.
    #[instrument(skip(self))]
    pub async fn validate_credential(&self) -> bool {
        match self
            .router
            .provider()
            .count_tokens(CREDENTIAL_PROBE_MODEL, "test")
            .await
        {
            Ok(tokens) => {
                debug!(tokens, "Credential accepted");
                true
            }
            Err(e) => {
                warn!(error = %e, "Credential probe failed");
                false
            }
        }
    }

    /// Director's pre-analysis of a story outline.
    #[instrument(skip(self, story), fields(story_len = story.len()))]
    pub async fn suggest_story(
        &self,
        story: &str,
        scene_count: u32,
        style: &str,
        model: &str,
        language: Language,
    ) -> StoryboardResult<StorySuggestion> {
        require_story(story)?;
        let raw = self
            .router
            .generate_structured(
                model,
                prompt::suggestion_instruction(scene_count, style, language),
                prompt::suggestion_content(story),
                &StructuredContract::suggestion(),
                Some(SUGGESTION_TEMPERATURE),
            )
            .await?;
        schema::parse_suggestion(&raw)
    }
}
