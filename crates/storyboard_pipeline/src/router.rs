//! Per-modality call shapes and media extraction.

use std::sync::Arc;

use storyboard_core::{AspectRatio, ImageSize, MediaAsset, Modality};
use storyboard_error::{BuilderError, GenerationError, StoryboardResult};
use storyboard_interface::{
    ContentPart, GenerationProvider, ImageRequest, ImageResponse, SpeechRequest,
    StructuredRequest, VideoRequest,
};
use tracing::{debug, instrument};

use crate::codec::{DataUri, build_data_uri, decode_base64, pcm_to_wav};
use crate::schema::StructuredContract;

/// Output encoding requested from the dedicated image endpoint.
const DEDICATED_IMAGE_MIME: &str = "image/jpeg";
/// MIME assumed for inline images without an image MIME type.
const FALLBACK_IMAGE_MIME: &str = "image/png";
/// Only content model that accepts a resolution bucket.
const SIZED_IMAGE_MODEL: &str = "gemini-3-pro-image-preview";

/// Which image endpoint serves a model.
///
/// # Examples
///
/// ```
/// use storyboard_pipeline::ImageBackend;
///
/// assert_eq!(ImageBackend::for_model("imagen-4.0-generate-001"), ImageBackend::Dedicated);
/// assert_eq!(ImageBackend::for_model("gemini-2.5-flash-image"), ImageBackend::Content);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, strum::EnumIter)]
pub enum ImageBackend {
    /// Single-shot endpoint returning encoded images
    #[display("dedicated")]
    Dedicated,
    /// Multimodal content endpoint returning mixed parts
    #[display("content")]
    Content,
}

impl ImageBackend {
    /// Select the backend from the model identifier.
    pub fn for_model(model: &str) -> Self {
        if model.contains("imagen") {
            ImageBackend::Dedicated
        } else {
            ImageBackend::Content
        }
    }

    /// Whether `model` accepts a resolution bucket.
    pub fn supports_image_size(model: &str) -> bool {
        model == SIZED_IMAGE_MODEL
    }
}

/// Issues provider calls in the shape each modality and model expects, and
/// pulls the usable media out of the responses.
#[derive(Clone)]
pub struct ModelRouter {
    provider: Arc<dyn GenerationProvider>,
}

impl std::fmt::Debug for ModelRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRouter")
            .field("provider", &self.provider.provider_name())
            .finish()
    }
}

impl ModelRouter {
    /// Route calls through `provider`.
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self { provider }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &Arc<dyn GenerationProvider> {
        &self.provider
    }

    /// Build the image request for `model`.
    pub fn image_request(
        model: &str,
        prompt: impl Into<String>,
        aspect_ratio: AspectRatio,
        size: ImageSize,
    ) -> ImageRequest {
        match ImageBackend::for_model(model) {
            ImageBackend::Dedicated => ImageRequest::Dedicated {
                model: model.to_string(),
                prompt: prompt.into(),
                aspect_ratio,
                output_mime: DEDICATED_IMAGE_MIME.to_string(),
            },
            ImageBackend::Content => ImageRequest::Content {
                model: model.to_string(),
                prompt: prompt.into(),
                aspect_ratio,
                image_size: ImageBackend::supports_image_size(model).then_some(size),
            },
        }
    }

    /// Schema-constrained text call; returns the raw response text.
    #[instrument(skip(self, instruction, content, contract))]
    pub async fn generate_structured(
        &self,
        model: &str,
        instruction: String,
        content: String,
        contract: &StructuredContract,
        temperature: Option<f32>,
    ) -> StoryboardResult<String> {
        let request = StructuredRequest::builder()
            .model(model)
            .system_instruction(instruction)
            .user_content(content)
            .schema(contract.schema())
            .temperature(temperature)
            .build()
            .map_err(BuilderError::from)?;
        self.provider.generate_structured(&request).await
    }

    /// Generate one image and return it as a data URI asset.
    #[instrument(skip(self, prompt), fields(backend = %ImageBackend::for_model(model)))]
    pub async fn generate_image(
        &self,
        model: &str,
        prompt: String,
        aspect_ratio: AspectRatio,
        size: ImageSize,
    ) -> StoryboardResult<MediaAsset> {
        let request = Self::image_request(model, prompt, aspect_ratio, size);
        let response = self.provider.generate_image(&request).await?;
        let (mime, data) = extract_image(response)?;
        debug!(%mime, bytes_base64 = data.len(), "Image extracted");
        Ok(MediaAsset::Embedded {
            uri: build_data_uri(&mime, &data),
            mime,
        })
    }

    /// Build the video job request, conditioned on an image data URI.
    pub fn video_request(
        model: &str,
        prompt: String,
        image_uri: &str,
        aspect_ratio: AspectRatio,
    ) -> StoryboardResult<VideoRequest> {
        let image = DataUri::parse(image_uri)?;
        let request = VideoRequest::builder()
            .model(model)
            .prompt(prompt)
            .image_base64(image.data)
            .image_mime(image.mime)
            .aspect_ratio(aspect_ratio)
            .build()
            .map_err(BuilderError::from)?;
        Ok(request)
    }

    /// Synthesize speech and wrap the returned PCM as WAV.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn synthesize_audio(
        &self,
        model: &str,
        text: String,
        voice: &str,
    ) -> StoryboardResult<MediaAsset> {
        let request = SpeechRequest::builder()
            .model(model)
            .text(text)
            .voice(voice)
            .build()
            .map_err(BuilderError::from)?;
        let parts = self.provider.synthesize_speech(&request).await?;

        let pcm_base64 = parts
            .into_iter()
            .find_map(|part| match part {
                ContentPart::InlineData { data, .. } if !data.is_empty() => Some(data),
                _ => None,
            })
            .ok_or_else(|| GenerationError::failed(Modality::Audio, "no audio data in response"))?;

        let pcm = decode_base64(&pcm_base64)?;
        let wav = pcm_to_wav(&pcm)?;
        debug!(pcm_bytes = pcm.len(), wav_bytes = wav.len(), "Speech wrapped as WAV");
        Ok(MediaAsset::Blob {
            mime: "audio/wav".to_string(),
            bytes: wav,
        })
    }
}

/// MIME type and base64 payload of the first usable image.
fn extract_image(response: ImageResponse) -> StoryboardResult<(String, String)> {
    let found = match response {
        ImageResponse::Encoded(images) => images.into_iter().find_map(|image| {
            let data = image.bytes_base64.filter(|data| !data.is_empty())?;
            let mime = image
                .mime
                .filter(|mime| !mime.is_empty())
                .unwrap_or_else(|| DEDICATED_IMAGE_MIME.to_string());
            Some((mime, data))
        }),
        ImageResponse::Content(parts) => parts.into_iter().find_map(|part| match part {
            ContentPart::InlineData { mime, data } if !data.is_empty() => {
                let mime = if mime.starts_with("image/") {
                    mime
                } else {
                    FALLBACK_IMAGE_MIME.to_string()
                };
                Some((mime, data))
            }
            _ => None,
        }),
    };
    found.ok_or_else(|| GenerationError::failed(Modality::Image, "no image data in response").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyboard_interface::EncodedImage;

    #[test]
    fn image_size_only_for_sized_model() {
        let sized = ModelRouter::image_request(
            "gemini-3-pro-image-preview",
            "p",
            AspectRatio::Portrait,
            ImageSize::High,
        );
        assert!(matches!(
            sized,
            ImageRequest::Content {
                image_size: Some(ImageSize::High),
                ..
            }
        ));

        let unsized_request =
            ModelRouter::image_request("gemini-2.5-flash-image", "p", AspectRatio::Portrait, ImageSize::High);
        assert!(matches!(
            unsized_request,
            ImageRequest::Content {
                image_size: None,
                ..
            }
        ));
    }

    #[test]
    fn imagen_requests_jpeg() {
        let request = ModelRouter::image_request(
            "imagen-4.0-generate-001",
            "p",
            AspectRatio::Landscape,
            ImageSize::Low,
        );
        match request {
            ImageRequest::Dedicated { output_mime, .. } => assert_eq!(output_mime, "image/jpeg"),
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn content_parts_skip_text_and_default_mime() {
        let (mime, data) = extract_image(ImageResponse::Content(vec![
            ContentPart::Text("Here is your image".to_string()),
            ContentPart::InlineData {
                mime: String::new(),
                data: "AAAA".to_string(),
            },
        ]))
        .unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(data, "AAAA");
    }

    #[test]
    fn encoded_images_default_to_jpeg() {
        let (mime, _) = extract_image(ImageResponse::Encoded(vec![EncodedImage {
            bytes_base64: Some("AAAA".to_string()),
            mime: None,
        }]))
        .unwrap();
        assert_eq!(mime, "image/jpeg");
    }

    #[test]
    fn empty_responses_are_image_failures() {
        for response in [
            ImageResponse::Encoded(vec![EncodedImage::default()]),
            ImageResponse::Content(vec![ContentPart::Text("refused".to_string())]),
        ] {
            let err = extract_image(response).unwrap_err();
            assert!(err.to_string().contains("image generation failed"));
        }
    }

    #[test]
    fn video_request_splits_data_uri() {
        let request = ModelRouter::video_request(
            "veo-3.1-fast-generate-preview",
            "Dolly in".to_string(),
            "data:image/jpeg;base64,/9j/",
            AspectRatio::Portrait,
        )
        .unwrap();
        assert_eq!(request.image_mime(), "image/jpeg");
        assert_eq!(request.image_base64(), "/9j/");
        assert_eq!(request.resolution(), "720p");
    }

    #[test]
    fn video_request_rejects_non_data_uri() {
        let err = ModelRouter::video_request(
            "veo",
            "p".to_string(),
            "https://example.com/frame.png",
            AspectRatio::Landscape,
        )
        .unwrap_err();
        assert!(matches!(
            err.kind(),
            storyboard_error::StoryboardErrorKind::Codec(_)
        ));
    }
}
