//! [`GenerationProvider`] implementation over the REST endpoints.

use async_trait::async_trait;
use storyboard_error::{GenerationError, Modality, StoryboardResult};
use storyboard_interface::{
    ContentPart, GenerationProvider, ImageRequest, ImageResponse, SpeechRequest,
    StructuredRequest, VideoOperation, VideoRequest,
};
use tracing::{debug, instrument};

use super::GeminiClient;
use super::protocol::{
    Content, CountTokensRequest, CountTokensResponse, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, ImageConfig, Operation, PredictInstance,
    PredictParameters, PredictRequest, PredictResponse, SpeechConfig, VideoImage, VideoInstance,
    VideoParameters, VideoSubmitRequest,
};

#[async_trait]
impl GenerationProvider for GeminiClient {
    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, req), fields(provider = "gemini", model = %req.model()))]
    async fn generate_structured(&self, req: &StructuredRequest) -> StoryboardResult<String> {
        let body = GenerateContentRequest {
            system_instruction: Some(Content::text(req.system_instruction())),
            contents: vec![Content::user_text(req.user_content())],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(req.schema().clone()),
                temperature: *req.temperature(),
                ..Default::default()
            }),
        };

        let url = self.model_url(req.model(), "generateContent");
        let response: GenerateContentResponse = self.post_json(&url, &body).await?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(GenerationError::failed(Modality::Text, response.empty_reason()).into());
        }
        debug!(chars = text.len(), "Received structured output");
        Ok(text)
    }

    #[instrument(skip(self, req), fields(provider = "gemini", model = %req.model()))]
    async fn generate_image(&self, req: &ImageRequest) -> StoryboardResult<ImageResponse> {
        match req {
            ImageRequest::Dedicated {
                model,
                prompt,
                aspect_ratio,
                output_mime,
            } => {
                let body = PredictRequest {
                    instances: vec![PredictInstance {
                        prompt: prompt.clone(),
                    }],
                    parameters: PredictParameters {
                        sample_count: 1,
                        aspect_ratio: aspect_ratio.as_str().to_string(),
                        output_mime_type: output_mime.clone(),
                    },
                };
                let url = self.model_url(model, "predict");
                let response: PredictResponse = self.post_json(&url, &body).await?;
                debug!(images = response.predictions.len(), "Received predictions");
                Ok(ImageResponse::Encoded(
                    response.predictions.into_iter().map(Into::into).collect(),
                ))
            }
            ImageRequest::Content {
                model,
                prompt,
                aspect_ratio,
                image_size,
            } => {
                let body = GenerateContentRequest {
                    system_instruction: None,
                    contents: vec![Content::user_text(prompt.clone())],
                    generation_config: Some(GenerationConfig {
                        image_config: Some(ImageConfig {
                            aspect_ratio: aspect_ratio.as_str().to_string(),
                            image_size: image_size.map(|size| size.to_string()),
                        }),
                        ..Default::default()
                    }),
                };
                let url = self.model_url(model, "generateContent");
                let response: GenerateContentResponse = self.post_json(&url, &body).await?;
                let parts = response.content_parts();
                debug!(parts = parts.len(), "Received content parts");
                Ok(ImageResponse::Content(parts))
            }
        }
    }

    #[instrument(skip(self, req), fields(provider = "gemini", model = %req.model()))]
    async fn submit_video(&self, req: &VideoRequest) -> StoryboardResult<VideoOperation> {
        let body = VideoSubmitRequest {
            instances: vec![VideoInstance {
                prompt: req.prompt().clone(),
                image: VideoImage {
                    bytes_base64_encoded: req.image_base64().clone(),
                    mime_type: req.image_mime().clone(),
                },
            }],
            parameters: VideoParameters {
                aspect_ratio: req.aspect_ratio().as_str().to_string(),
                resolution: req.resolution().clone(),
            },
        };

        let url = self.model_url(req.model(), "predictLongRunning");
        let operation: Operation = self.post_json(&url, &body).await?;
        debug!(operation = %operation.name, done = operation.done, "Video job submitted");
        Ok(operation.into())
    }

    #[instrument(skip(self), fields(provider = "gemini", operation = %operation.name))]
    async fn poll_video(&self, operation: &VideoOperation) -> StoryboardResult<VideoOperation> {
        let url = self.operation_url(&operation.name);
        let polled: Operation = self.get_json(&url).await?;
        debug!(done = polled.done, "Video job status");

        let mut next = VideoOperation::from(polled);
        if next.name.is_empty() {
            next.name = operation.name.clone();
        }
        Ok(next)
    }

    async fn fetch_media(&self, locator: &str) -> StoryboardResult<Vec<u8>> {
        self.download(locator).await
    }

    #[instrument(skip(self, req), fields(provider = "gemini", model = %req.model(), voice = %req.voice()))]
    async fn synthesize_speech(&self, req: &SpeechRequest) -> StoryboardResult<Vec<ContentPart>> {
        let body = GenerateContentRequest {
            system_instruction: None,
            contents: vec![Content::user_text(req.text().clone())],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(SpeechConfig::prebuilt(req.voice().clone())),
                ..Default::default()
            }),
        };

        let url = self.model_url(req.model(), "generateContent");
        let response: GenerateContentResponse = self.post_json(&url, &body).await?;
        Ok(response.content_parts())
    }

    #[instrument(skip(self, text), fields(provider = "gemini", text_len = text.len()))]
    async fn count_tokens(&self, model: &str, text: &str) -> StoryboardResult<u64> {
        let body = CountTokensRequest {
            contents: vec![Content::user_text(text)],
        };
        let url = self.model_url(model, "countTokens");
        let response: CountTokensResponse = self.post_json(&url, &body).await?;
        debug!(token_count = response.total_tokens, "Counted tokens");
        Ok(response.total_tokens)
    }
}
