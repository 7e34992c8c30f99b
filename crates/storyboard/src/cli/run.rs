//! Command handlers: configuration, provider wiring and the full pipeline.

use serde::Serialize;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use storyboard::{
    Character, Credential, GeminiClient, GenerationEvent, GenerationFacade, GenerationSettings,
    MediaTarget, PollerConfig, StoryboardConfig, StoryboardResult, StoryboardState, TokioSleeper,
};
use storyboard::prompt::scene_audio_text;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{info, instrument, warn};

/// Optional pipeline stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Ask for a director's suggestion before analysis
    pub suggest: bool,
    /// Animate scene images
    pub videos: bool,
    /// Voice scene dialogue
    pub audio: bool,
}

/// Load the explicit config file, or the layered defaults.
pub fn load_config(path: Option<&Path>) -> StoryboardResult<StoryboardConfig> {
    match path {
        Some(path) => StoryboardConfig::from_file(path),
        None => StoryboardConfig::load(),
    }
}

/// Wire the Gemini provider into a facade.
///
/// Fails before any generation when no credential is configured.
pub fn connect(config: &StoryboardConfig) -> StoryboardResult<GenerationFacade> {
    let credential = Credential::from_env()?;
    let client = GeminiClient::with_config(credential, &config.provider)?;
    Ok(GenerationFacade::with_poller(
        Arc::new(client),
        Arc::new(TokioSleeper),
        PollerConfig::from(&config.polling),
    ))
}

/// Probe the credential and fail when the provider rejects it.
pub async fn check_credential(facade: &GenerationFacade) -> Result<(), Box<dyn Error>> {
    if facade.validate_credential().await {
        info!("Credential accepted");
        Ok(())
    } else {
        Err("the provider rejected the configured API key".into())
    }
}

/// Read a character registry written by the `characters` command.
pub fn read_characters(path: &Path) -> Result<Vec<Character>, Box<dyn Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Pretty JSON to `output`, or stdout.
pub fn write_json(value: &impl Serialize, output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!(path = %path.display(), "Wrote output");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn fold(state: &mut StoryboardState, events: &mut UnboundedReceiver<GenerationEvent>) {
    while let Ok(event) = events.try_recv() {
        if !state.apply(event) {
            warn!("Dropped event for an unknown entity");
        }
    }
}

/// Ids the batch for `target` will dispatch, given the current state.
fn pending(state: &StoryboardState, target: MediaTarget) -> Vec<String> {
    match target {
        MediaTarget::CharacterImage => state.characters.iter().map(|c| c.id.clone()).collect(),
        MediaTarget::SceneImage => state
            .scenes
            .iter()
            .filter(|s| s.image_url.is_none())
            .map(|s| s.id.clone())
            .collect(),
        MediaTarget::SceneVideo => state
            .scenes
            .iter()
            .filter(|s| s.image_url.is_some() && s.video_url.is_none())
            .map(|s| s.id.clone())
            .collect(),
        MediaTarget::SceneAudio => state
            .scenes
            .iter()
            .filter(|s| s.audio_url.is_none() && scene_audio_text(s).is_some())
            .map(|s| s.id.clone())
            .collect(),
    }
}

/// Raise the loading flag on everything the next `target` batch covers.
fn mark_all(state: &mut StoryboardState, target: MediaTarget) {
    for id in pending(state, target) {
        state.mark_loading(target, &id);
    }
}

/// Generate a complete storyboard for `story`.
///
/// Character analysis and scene breakdown failures abort the run; per-entity
/// media failures are logged and leave that entity without media.
#[instrument(skip_all, fields(story_len = story.len(), scenes = settings.scene_count))]
pub async fn run_pipeline(
    facade: &GenerationFacade,
    story: &str,
    settings: GenerationSettings,
    options: PipelineOptions,
) -> StoryboardResult<StoryboardState> {
    let mut state = StoryboardState::with_settings(story, settings);
    let (tx, mut rx) = mpsc::unbounded_channel();

    if options.suggest {
        let suggestion = facade
            .suggest_story(
                &state.story,
                state.settings.scene_count,
                &state.settings.style,
                &state.settings.text_model,
                state.settings.language,
            )
            .await?;
        info!(characters = *suggestion.character_count(), "Director suggestion received");
        state.suggestion = Some(suggestion);
    }

    let characters = facade
        .analyze_characters(&state.story, &state.settings.text_model, state.settings.language)
        .await?;
    state.replace_characters(characters);

    mark_all(&mut state, MediaTarget::CharacterImage);
    facade
        .generate_character_images(&state.characters, &state.settings, &tx)
        .await;
    fold(&mut state, &mut rx);

    let scenes = facade
        .breakdown_scenes(
            &state.story,
            state.settings.scene_count,
            &state.characters,
            &state.settings.text_model,
            state.settings.language,
        )
        .await?;
    state.replace_scenes(scenes);

    mark_all(&mut state, MediaTarget::SceneImage);
    facade
        .generate_all_scene_images(&state.scenes, &state.settings, &state.characters, &tx)
        .await;
    fold(&mut state, &mut rx);

    if options.videos {
        mark_all(&mut state, MediaTarget::SceneVideo);
        facade
            .generate_all_scene_videos(&state.scenes, &state.settings, &tx)
            .await;
        fold(&mut state, &mut rx);
    }

    if options.audio {
        mark_all(&mut state, MediaTarget::SceneAudio);
        facade
            .generate_all_scene_audio(&state.scenes, &state.settings, &tx)
            .await;
        fold(&mut state, &mut rx);
    }

    info!(
        characters = state.characters.len(),
        scenes = state.scenes.len(),
        "Storyboard complete"
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyboard::Scene;

    fn scene(id: &str, dialogue: &str) -> Scene {
        Scene {
            id: id.to_string(),
            dialogue: dialogue.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn audio_stage_marks_only_scenes_with_dialogue() {
        let mut state = StoryboardState::new("Rain over the harbor");
        let mut voiced = scene("scene-3", "Already recorded");
        voiced.audio_url = Some("data:audio/wav;base64,AAAA".to_string());
        state.replace_scenes(vec![
            scene("scene-1", "Hold the light steady!"),
            scene("scene-2", "无对白"),
            voiced,
        ]);

        mark_all(&mut state, MediaTarget::SceneAudio);

        assert!(state.scene("scene-1").unwrap().audio_loading);
        assert!(!state.scene("scene-2").unwrap().audio_loading);
        assert!(!state.scene("scene-3").unwrap().audio_loading);
    }

    #[test]
    fn video_stage_skips_scenes_without_image_or_with_video() {
        let mut state = StoryboardState::new("Rain over the harbor");
        let mut imaged = scene("scene-1", "");
        imaged.image_url = Some("data:image/png;base64,AAAA".to_string());
        let mut animated = imaged.clone();
        animated.id = "scene-2".to_string();
        animated.video_url = Some("data:video/mp4;base64,AAAA".to_string());
        state.replace_scenes(vec![imaged, animated, scene("scene-3", "")]);

        assert_eq!(pending(&state, MediaTarget::SceneVideo), vec!["scene-1".to_string()]);
    }
}
