//! Scripted generation provider for testing.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use storyboard_error::{GenerationError, GenerationErrorKind, StoryboardResult};
use storyboard_interface::{
    ContentPart, GenerationProvider, ImageRequest, ImageResponse, Sleeper, SpeechRequest,
    StructuredRequest, VideoOperation, VideoRequest,
};

/// Base64 of a tiny PNG-like payload returned by default image calls.
const DEFAULT_IMAGE_BASE64: &str = "iVBORw0KGgo=";
/// Base64 of four bytes of silence returned by default speech calls.
const DEFAULT_PCM_BASE64: &str = "AAAAAA==";

/// Scripted provider.
///
/// Each call type pops its next scripted reply; when the script is empty a
/// default reply is used (an inline PNG for images, a pending operation for
/// polls, eight bytes for downloads). Every call is recorded.
#[derive(Default)]
pub struct MockProvider {
    structured: Mutex<VecDeque<Result<String, GenerationErrorKind>>>,
    images: Mutex<VecDeque<Result<ImageResponse, GenerationErrorKind>>>,
    image_failures: Mutex<Vec<String>>,
    polls: Mutex<VecDeque<VideoOperation>>,
    submit_done: Mutex<Option<VideoOperation>>,
    media: Mutex<Option<Result<Vec<u8>, GenerationErrorKind>>>,
    speech: Mutex<Option<Vec<ContentPart>>>,
    token_error: Mutex<Option<GenerationErrorKind>>,
    calls: Mutex<Vec<&'static str>>,
    structured_requests: Mutex<Vec<StructuredRequest>>,
    image_requests: Mutex<Vec<ImageRequest>>,
    video_requests: Mutex<Vec<VideoRequest>>,
    speech_requests: Mutex<Vec<SpeechRequest>>,
}

impl MockProvider {
    /// Provider with default replies only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a structured text reply.
    pub fn with_structured(self, text: impl Into<String>) -> Self {
        self.structured.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queue a structured text failure.
    #[allow(dead_code)]
    pub fn with_structured_error(self, kind: GenerationErrorKind) -> Self {
        self.structured.lock().unwrap().push_back(Err(kind));
        self
    }

    /// Queue an image reply.
    #[allow(dead_code)]
    pub fn with_image(self, response: ImageResponse) -> Self {
        self.images.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Fail every image call whose prompt contains `marker`.
    #[allow(dead_code)]
    pub fn failing_images_containing(self, marker: impl Into<String>) -> Self {
        self.image_failures.lock().unwrap().push(marker.into());
        self
    }

    /// Queue video poll replies, in order.
    #[allow(dead_code)]
    pub fn with_polls(self, polls: Vec<VideoOperation>) -> Self {
        self.polls.lock().unwrap().extend(polls);
        self
    }

    /// Make the submission itself report this terminal operation.
    #[allow(dead_code)]
    pub fn with_submit_result(self, operation: VideoOperation) -> Self {
        *self.submit_done.lock().unwrap() = Some(operation);
        self
    }

    /// Fail the media download.
    #[allow(dead_code)]
    pub fn with_media_error(self, kind: GenerationErrorKind) -> Self {
        *self.media.lock().unwrap() = Some(Err(kind));
        self
    }

    /// Return these bytes from the media download.
    #[allow(dead_code)]
    pub fn with_media(self, bytes: Vec<u8>) -> Self {
        *self.media.lock().unwrap() = Some(Ok(bytes));
        self
    }

    /// Return these parts from speech synthesis.
    #[allow(dead_code)]
    pub fn with_speech(self, parts: Vec<ContentPart>) -> Self {
        *self.speech.lock().unwrap() = Some(parts);
        self
    }

    /// Fail token counting.
    #[allow(dead_code)]
    pub fn with_token_error(self, kind: GenerationErrorKind) -> Self {
        *self.token_error.lock().unwrap() = Some(kind);
        self
    }

    /// Number of calls of `method` (e.g. "poll_video").
    pub fn calls(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|called| **called == method)
            .count()
    }

    /// Number of calls of any method.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Structured requests received so far.
    #[allow(dead_code)]
    pub fn structured_requests(&self) -> Vec<StructuredRequest> {
        self.structured_requests.lock().unwrap().clone()
    }

    /// Image requests received so far.
    #[allow(dead_code)]
    pub fn image_requests(&self) -> Vec<ImageRequest> {
        self.image_requests.lock().unwrap().clone()
    }

    /// Video requests received so far.
    #[allow(dead_code)]
    pub fn video_requests(&self) -> Vec<VideoRequest> {
        self.video_requests.lock().unwrap().clone()
    }

    /// Speech requests received so far.
    #[allow(dead_code)]
    pub fn speech_requests(&self) -> Vec<SpeechRequest> {
        self.speech_requests.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str) {
        self.calls.lock().unwrap().push(method);
    }
}

fn fail<T>(kind: GenerationErrorKind) -> StoryboardResult<T> {
    Err(GenerationError::new(kind).into())
}

#[async_trait]
impl GenerationProvider for MockProvider {
    fn provider_name(&self) -> &'static str {
        "mock"
    }

    async fn generate_structured(&self, req: &StructuredRequest) -> StoryboardResult<String> {
        self.record("generate_structured");
        self.structured_requests.lock().unwrap().push(req.clone());
        let next = self.structured.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(kind)) => fail(kind),
            None => fail(GenerationErrorKind::ProviderStatus {
                status_code: 500,
                message: "mock structured script exhausted".to_string(),
            }),
        }
    }

    async fn generate_image(&self, req: &ImageRequest) -> StoryboardResult<ImageResponse> {
        self.record("generate_image");
        self.image_requests.lock().unwrap().push(req.clone());

        let blocked = self
            .image_failures
            .lock()
            .unwrap()
            .iter()
            .any(|marker| req.prompt().contains(marker.as_str()));
        if blocked {
            return fail(GenerationErrorKind::ProviderStatus {
                status_code: 400,
                message: "prompt blocked".to_string(),
            });
        }

        let next = self.images.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(kind)) => fail(kind),
            None => Ok(ImageResponse::Content(vec![ContentPart::InlineData {
                mime: "image/png".to_string(),
                data: DEFAULT_IMAGE_BASE64.to_string(),
            }])),
        }
    }

    async fn submit_video(&self, req: &VideoRequest) -> StoryboardResult<VideoOperation> {
        self.record("submit_video");
        self.video_requests.lock().unwrap().push(req.clone());
        let done = self.submit_done.lock().unwrap().clone();
        Ok(done.unwrap_or_else(|| VideoOperation::pending("models/veo/operations/mock-1")))
    }

    async fn poll_video(&self, operation: &VideoOperation) -> StoryboardResult<VideoOperation> {
        self.record("poll_video");
        let next = self.polls.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| VideoOperation::pending(operation.name.clone())))
    }

    async fn fetch_media(&self, _locator: &str) -> StoryboardResult<Vec<u8>> {
        self.record("fetch_media");
        let media = self.media.lock().unwrap().clone();
        match media {
            Some(Ok(bytes)) => Ok(bytes),
            Some(Err(kind)) => fail(kind),
            None => Ok(vec![0, 0, 0, 24, b'f', b't', b'y', b'p']),
        }
    }

    async fn synthesize_speech(&self, req: &SpeechRequest) -> StoryboardResult<Vec<ContentPart>> {
        self.record("synthesize_speech");
        self.speech_requests.lock().unwrap().push(req.clone());
        let parts = self.speech.lock().unwrap().clone();
        Ok(parts.unwrap_or_else(|| {
            vec![ContentPart::InlineData {
                mime: "audio/L16;codec=pcm;rate=24000".to_string(),
                data: DEFAULT_PCM_BASE64.to_string(),
            }]
        }))
    }

    async fn count_tokens(&self, _model: &str, _text: &str) -> StoryboardResult<u64> {
        self.record("count_tokens");
        let error = self.token_error.lock().unwrap().clone();
        match error {
            Some(kind) => fail(kind),
            None => Ok(1),
        }
    }
}

/// Sleeper that records requested waits without waiting.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Waits requested so far.
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

/// Character extraction reply for the flooded-city courier story.
#[allow(dead_code)]
pub fn courier_characters_json() -> String {
    json!([
        {
            "name": "Akira",
            "description": "A stubborn courier who never misses a delivery",
            "visualPrompt": "Young woman, red visor, black waterproof bodysuit, courier satchel",
            "speakerStyle": "Clipped and impatient"
        },
        {
            "name": "Mina",
            "description": "Keeper of the last dry bridge",
            "visualPrompt": "Elderly man, yellow raincoat, lantern, grey beard"
        }
    ])
    .to_string()
}

/// Scene breakdown reply with `count` scenes, all featuring `character`.
#[allow(dead_code)]
pub fn scenes_json(count: u32, character: &str) -> String {
    let scenes: Vec<Value> = (1..=count)
        .map(|n| {
            json!({
                "number": n * 10,
                "description": format!("Beat {n} of the crossing"),
                "dialogue": if n == 1 { "The package goes through." } else { "No dialogue" },
                "action": "Wading through waist-deep water",
                "camera": "Wide tracking shot",
                "visualPrompt": format!("{character} crossing a flooded avenue, beat {n}"),
                "videoPrompt": "Slow tracking shot following the courier through rain",
                "soundPrompt": "Rain and distant sirens",
                "estimatedDuration": "5s",
                "characters": [character]
            })
        })
        .collect();
    Value::Array(scenes).to_string()
}
