//! Request and response shapes for the provider call contracts.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use storyboard_core::{AspectRatio, ImageSize};

/// Schema-constrained text generation request.
///
/// # Examples
///
/// ```
/// use storyboard_interface::StructuredRequest;
/// use serde_json::json;
///
/// let req = StructuredRequest::builder()
///     .model("gemini-2.5-flash")
///     .system_instruction("Extract the characters.")
///     .user_content("A lone courier crosses a flooded city")
///     .schema(json!({"type": "ARRAY"}))
///     .build()
///     .unwrap();
///
/// assert_eq!(req.model(), "gemini-2.5-flash");
/// assert!(req.temperature().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct StructuredRequest {
    /// Model identifier
    model: String,
    /// System instruction
    system_instruction: String,
    /// User turn content
    user_content: String,
    /// Output schema in the provider's schema dialect
    schema: serde_json::Value,
    /// Sampling temperature
    #[builder(default)]
    temperature: Option<f32>,
}

impl StructuredRequest {
    /// Creates a new request builder.
    pub fn builder() -> StructuredRequestBuilder {
        StructuredRequestBuilder::default()
    }
}

/// Image generation request, one variant per backend shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageRequest {
    /// Dedicated single-shot image endpoint returning encoded bytes.
    Dedicated {
        /// Model identifier
        model: String,
        /// Image prompt
        prompt: String,
        /// Normalized aspect ratio
        aspect_ratio: AspectRatio,
        /// Requested output encoding, e.g. `image/jpeg`
        output_mime: String,
    },
    /// General multimodal content endpoint returning mixed parts.
    Content {
        /// Model identifier
        model: String,
        /// Image prompt
        prompt: String,
        /// Normalized aspect ratio
        aspect_ratio: AspectRatio,
        /// Resolution bucket, only for models that accept one
        image_size: Option<ImageSize>,
    },
}

impl ImageRequest {
    /// Model identifier of either variant.
    pub fn model(&self) -> &str {
        match self {
            ImageRequest::Dedicated { model, .. } | ImageRequest::Content { model, .. } => model,
        }
    }

    /// Prompt of either variant.
    pub fn prompt(&self) -> &str {
        match self {
            ImageRequest::Dedicated { prompt, .. } | ImageRequest::Content { prompt, .. } => {
                prompt
            }
        }
    }

    /// Aspect ratio of either variant.
    pub fn aspect_ratio(&self) -> AspectRatio {
        match self {
            ImageRequest::Dedicated { aspect_ratio, .. }
            | ImageRequest::Content { aspect_ratio, .. } => *aspect_ratio,
        }
    }
}

/// One image from the dedicated endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    /// Base64 image bytes, absent when the provider filtered the image
    pub bytes_base64: Option<String>,
    /// MIME type reported by the provider
    pub mime: Option<String>,
}

/// A part of a multimodal content response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentPart {
    /// Text part
    Text(String),
    /// Inline binary part
    InlineData {
        /// MIME type of the data
        mime: String,
        /// Base64 payload
        data: String,
    },
}

/// Image generation response, mirroring the request variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageResponse {
    /// Encoded images from the dedicated endpoint
    Encoded(Vec<EncodedImage>),
    /// Content parts from the multimodal endpoint
    Content(Vec<ContentPart>),
}

/// Video job submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct VideoRequest {
    /// Model identifier
    model: String,
    /// Motion-focused prompt
    prompt: String,
    /// Conditioning image, base64
    image_base64: String,
    /// Conditioning image MIME type
    image_mime: String,
    /// Normalized aspect ratio
    aspect_ratio: AspectRatio,
    /// Output resolution, e.g. `720p`
    #[builder(default = "\"720p\".to_string()")]
    resolution: String,
}

impl VideoRequest {
    /// Creates a new request builder.
    pub fn builder() -> VideoRequestBuilder {
        VideoRequestBuilder::default()
    }
}

/// Provider-side failure reported on a video job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    /// Provider status code
    pub code: Option<i32>,
    /// Provider message
    pub message: String,
}

/// Opaque video job handle plus its last observed status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoOperation {
    /// Provider-issued handle
    pub name: String,
    /// Whether the job reached a terminal status
    pub done: bool,
    /// Error payload, if the job failed
    pub error: Option<OperationError>,
    /// Result locator, if the job produced a video
    pub video_uri: Option<String>,
}

impl VideoOperation {
    /// A freshly submitted, still-running job.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Speech synthesis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct SpeechRequest {
    /// Model identifier
    model: String,
    /// Text to speak
    text: String,
    /// Prebuilt voice identity
    voice: String,
}

impl SpeechRequest {
    /// Creates a new request builder.
    pub fn builder() -> SpeechRequestBuilder {
        SpeechRequestBuilder::default()
    }
}

macro_rules! builder_error_from {
    ($($err:ty),* $(,)?) => {
        $(
            impl From<$err> for storyboard_error::BuilderError {
                #[track_caller]
                fn from(err: $err) -> Self {
                    storyboard_error::BuilderError::new(err.to_string())
                }
            }
        )*
    };
}

builder_error_from!(
    StructuredRequestBuilderError,
    VideoRequestBuilderError,
    SpeechRequestBuilderError,
);
