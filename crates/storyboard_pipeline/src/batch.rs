//! Batch dispatch over characters and scenes.
//!
//! Character images run in parallel, one task per character. Scene batches
//! run strictly one after another. Every entity attempted yields exactly one
//! terminal [`GenerationEvent`], and a failing entity never stops the batch.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use storyboard_core::{Character, GenerationSettings, MediaAsset, Scene};
use storyboard_error::StoryboardResult;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::codec::asset_uri;
use crate::facade::GenerationFacade;
use crate::prompt::scene_audio_text;

/// Which media field an event targets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum MediaTarget {
    /// `Character::image_url`
    #[display("character image")]
    CharacterImage,
    /// `Scene::image_url`
    #[display("scene image")]
    SceneImage,
    /// `Scene::video_url`
    #[display("scene video")]
    SceneVideo,
    /// `Scene::audio_url`
    #[display("scene audio")]
    SceneAudio,
}

/// Terminal result of one entity's generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventOutcome {
    /// Media ready, as a data URI
    Ready(String),
    /// Generation failed with this message
    Failed(String),
}

/// One entity's terminal result, addressed by identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct GenerationEvent {
    /// Media field the event addresses
    target: MediaTarget,
    /// Character or scene id
    id: String,
    /// Result of the generation
    outcome: EventOutcome,
}

impl GenerationEvent {
    /// Event for `id` from a generation result.
    pub fn from_result(
        target: MediaTarget,
        id: impl Into<String>,
        result: &StoryboardResult<MediaAsset>,
    ) -> Self {
        let outcome = match result {
            Ok(asset) => EventOutcome::Ready(asset_uri(asset)),
            Err(e) => EventOutcome::Failed(e.to_string()),
        };
        Self {
            target,
            id: id.into(),
            outcome,
        }
    }

    /// Failed event for `id`.
    pub fn failed(target: MediaTarget, id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            target,
            id: id.into(),
            outcome: EventOutcome::Failed(message.into()),
        }
    }

    /// True if the media is ready.
    pub fn is_ready(&self) -> bool {
        matches!(self.outcome, EventOutcome::Ready(_))
    }
}

/// Counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Entities dispatched
    pub attempted: usize,
    /// Entities that produced media
    pub succeeded: usize,
    /// Entities that failed
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, event: &GenerationEvent) {
        self.attempted += 1;
        if event.is_ready() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

fn emit(events: &UnboundedSender<GenerationEvent>, summary: &mut BatchSummary, event: GenerationEvent) {
    match event.outcome() {
        EventOutcome::Ready(_) => debug!(target_kind = %event.target(), id = %event.id(), "Media ready"),
        EventOutcome::Failed(message) => {
            warn!(target_kind = %event.target(), id = %event.id(), error = %message, "Generation failed")
        }
    }
    summary.record(&event);
    if events.send(event).is_err() {
        debug!("Event receiver dropped");
    }
}

impl GenerationFacade {
    /// Generate every character's design sheet in parallel.
    ///
    /// Emits one event per character on `events`, in completion order. A
    /// panicking task still yields a failed event for its character.
    #[instrument(skip_all, fields(characters = characters.len()))]
    pub async fn generate_character_images(
        &self,
        characters: &[Character],
        settings: &GenerationSettings,
        events: &UnboundedSender<GenerationEvent>,
    ) -> BatchSummary {
        let mut tasks = JoinSet::new();
        let mut owners = HashMap::new();

        for character in characters {
            let facade = self.clone();
            let character = character.clone();
            let settings = settings.clone();
            let character_id = character.id.clone();
            let handle = tasks.spawn(async move {
                let result = facade
                    .generate_character_image(
                        &character,
                        &settings.style,
                        settings.aspect_ratio,
                        &settings.image_model,
                        settings.image_size,
                    )
                    .await;
                GenerationEvent::from_result(MediaTarget::CharacterImage, character.id, &result)
            });
            owners.insert(handle.id(), character_id);
        }

        let mut summary = BatchSummary::default();
        while let Some(joined) = tasks.join_next_with_id().await {
            let event = match joined {
                Ok((_, event)) => event,
                Err(e) => {
                    let id = owners.get(&e.id()).cloned().unwrap_or_default();
                    GenerationEvent::failed(MediaTarget::CharacterImage, id, e.to_string())
                }
            };
            emit(events, &mut summary, event);
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Character images finished"
        );
        summary
    }

    /// Generate images for scenes that have none, one scene at a time.
    #[instrument(skip_all, fields(scenes = scenes.len()))]
    pub async fn generate_all_scene_images(
        &self,
        scenes: &[Scene],
        settings: &GenerationSettings,
        characters: &[Character],
        events: &UnboundedSender<GenerationEvent>,
    ) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for scene in scenes.iter().filter(|scene| scene.image_url.is_none()) {
            let result = self.generate_scene_image(scene, settings, characters).await;
            emit(
                events,
                &mut summary,
                GenerationEvent::from_result(MediaTarget::SceneImage, &scene.id, &result),
            );
        }
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Scene images finished"
        );
        summary
    }

    /// Generate videos for scenes that have an image and no video, one scene
    /// at a time.
    #[instrument(skip_all, fields(scenes = scenes.len()))]
    pub async fn generate_all_scene_videos(
        &self,
        scenes: &[Scene],
        settings: &GenerationSettings,
        events: &UnboundedSender<GenerationEvent>,
    ) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for scene in scenes
            .iter()
            .filter(|scene| scene.image_url.is_some() && scene.video_url.is_none())
        {
            let result = self.generate_scene_video(scene, settings).await;
            emit(
                events,
                &mut summary,
                GenerationEvent::from_result(MediaTarget::SceneVideo, &scene.id, &result),
            );
        }
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Scene videos finished"
        );
        summary
    }

    /// Voice every scene that has dialogue and no audio, one scene at a time.
    #[instrument(skip_all, fields(scenes = scenes.len()))]
    pub async fn generate_all_scene_audio(
        &self,
        scenes: &[Scene],
        settings: &GenerationSettings,
        events: &UnboundedSender<GenerationEvent>,
    ) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for scene in scenes
            .iter()
            .filter(|scene| scene.audio_url.is_none() && scene_audio_text(scene).is_some())
        {
            let result = self.generate_scene_audio(scene, settings, None).await;
            emit(
                events,
                &mut summary,
                GenerationEvent::from_result(MediaTarget::SceneAudio, &scene.id, &result),
            );
        }
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Scene audio finished"
        );
        summary
    }
}
