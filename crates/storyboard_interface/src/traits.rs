//! Trait definition for generation providers.

use crate::{
    ContentPart, ImageRequest, ImageResponse, SpeechRequest, StructuredRequest, VideoOperation,
    VideoRequest,
};
use async_trait::async_trait;
use storyboard_error::StoryboardResult;

/// Remote multimodal generation capability.
///
/// Implementations are thin transports: they shape requests for the wire and
/// hand back the provider's payload without interpreting it. Media extraction,
/// validation and polling policy live in the pipeline.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Schema-constrained text generation. Returns the raw response text.
    async fn generate_structured(&self, req: &StructuredRequest) -> StoryboardResult<String>;

    /// Image generation through either backend variant.
    async fn generate_image(&self, req: &ImageRequest) -> StoryboardResult<ImageResponse>;

    /// Submit a long-running video job.
    async fn submit_video(&self, req: &VideoRequest) -> StoryboardResult<VideoOperation>;

    /// Re-query a video job by its handle.
    async fn poll_video(&self, operation: &VideoOperation) -> StoryboardResult<VideoOperation>;

    /// Credentialed download of a result locator.
    ///
    /// A non-success response must surface as a network failure.
    async fn fetch_media(&self, locator: &str) -> StoryboardResult<Vec<u8>>;

    /// Speech synthesis. Returns the response content parts (raw PCM inline).
    async fn synthesize_speech(&self, req: &SpeechRequest) -> StoryboardResult<Vec<ContentPart>>;

    /// Count tokens for `text`; used as a cheap credential probe.
    async fn count_tokens(&self, model: &str, text: &str) -> StoryboardResult<u64>;
}
