//! Wire types for the Generative Language REST API (v1beta).
//!
//! Field names follow the API's camelCase JSON. Only the fields the
//! storyboard pipeline reads or writes are modelled.

use serde::{Deserialize, Serialize};
use storyboard_interface::{ContentPart, EncodedImage, OperationError, VideoOperation};

//
// ─── generateContent ────────────────────────────────────────────────────────────
//

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// System instruction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    /// Conversation turns
    pub contents: Vec<Content>,
    /// Output configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// A turn of content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Turn author, `user` or `model`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Parts of the turn
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A user turn holding a single text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::text(text)],
        }
    }

    /// A role-less content block holding a single text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

/// One part of a turn; exactly one field is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline binary content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    /// A text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }
}

/// Base64 payload with its MIME type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type of the payload
    #[serde(default)]
    pub mime_type: String,
    /// Base64 payload
    #[serde(default)]
    pub data: String,
}

/// Output configuration of a `generateContent` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Output MIME type, `application/json` for structured output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// Output schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Requested output modalities, e.g. `["AUDIO"]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    /// Voice selection for speech output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
    /// Frame configuration for image output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

/// Speech output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    /// Voice selection
    pub voice_config: VoiceConfig,
}

impl SpeechConfig {
    /// Select a prebuilt voice by name.
    pub fn prebuilt(voice_name: impl Into<String>) -> Self {
        Self {
            voice_config: VoiceConfig {
                prebuilt_voice_config: PrebuiltVoiceConfig {
                    voice_name: voice_name.into(),
                },
            },
        }
    }
}

/// Voice selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    /// Prebuilt voice
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

/// Prebuilt voice identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    /// Voice name, e.g. `Kore`
    pub voice_name: String,
}

/// Image output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// Aspect ratio, `16:9` or `9:16`
    pub aspect_ratio: String,
    /// Resolution bucket, `1K` or `2K`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<String>,
}

/// Response body of `generateContent`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate completions
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Prompt-level safety feedback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// A candidate completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    /// Why generation stopped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Prompt-level safety feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Parts of the first candidate, empty when there is none.
    pub fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or_default()
    }

    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> String {
        self.first_parts()
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect()
    }

    /// First candidate's parts as pipeline content parts.
    pub fn content_parts(&self) -> Vec<ContentPart> {
        self.first_parts()
            .iter()
            .filter_map(|part| match (&part.inline_data, &part.text) {
                (Some(inline), _) => Some(ContentPart::InlineData {
                    mime: inline.mime_type.clone(),
                    data: inline.data.clone(),
                }),
                (None, Some(text)) => Some(ContentPart::Text(text.clone())),
                (None, None) => None,
            })
            .collect()
    }

    /// Human-readable reason for an empty response.
    pub fn empty_reason(&self) -> String {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_ref())
        {
            return format!("prompt blocked: {}", reason);
        }
        match self
            .candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_ref())
        {
            Some(reason) => format!("no content returned (finish reason {})", reason),
            None => "no candidates returned".to_string(),
        }
    }
}

//
// ─── predict (Imagen) ───────────────────────────────────────────────────────────
//

/// Request body for `models/{model}:predict`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    /// Prompts
    pub instances: Vec<PredictInstance>,
    /// Output parameters
    pub parameters: PredictParameters,
}

/// One image prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictInstance {
    /// Image prompt
    pub prompt: String,
}

/// Output parameters for dedicated image generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters {
    /// Number of images
    pub sample_count: u32,
    /// Aspect ratio
    pub aspect_ratio: String,
    /// Output encoding
    pub output_mime_type: String,
}

/// Response body of `predict`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    /// Generated images
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

/// One generated image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Base64 image bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_base64_encoded: Option<String>,
    /// Image MIME type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl From<Prediction> for EncodedImage {
    fn from(prediction: Prediction) -> Self {
        EncodedImage {
            bytes_base64: prediction.bytes_base64_encoded,
            mime: prediction.mime_type,
        }
    }
}

//
// ─── predictLongRunning (Veo) ───────────────────────────────────────────────────
//

/// Request body for `models/{model}:predictLongRunning`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSubmitRequest {
    /// Prompt plus conditioning image
    pub instances: Vec<VideoInstance>,
    /// Output parameters
    pub parameters: VideoParameters,
}

/// One video prompt with its conditioning image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInstance {
    /// Motion prompt
    pub prompt: String,
    /// Conditioning image
    pub image: VideoImage,
}

/// Conditioning image bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoImage {
    /// Base64 image bytes
    pub bytes_base64_encoded: String,
    /// Image MIME type
    pub mime_type: String,
}

/// Output parameters for video generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoParameters {
    /// Aspect ratio
    pub aspect_ratio: String,
    /// Output resolution
    pub resolution: String,
}

/// A long-running operation as returned by submit and poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Operation resource name
    #[serde(default)]
    pub name: String,
    /// Whether the operation finished
    #[serde(default)]
    pub done: bool,
    /// Failure status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
    /// Result payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<OperationResult>,
}

/// Result payload of a finished video operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    /// Video generation result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_video_response: Option<GenerateVideoResponse>,
}

/// Generated videos.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    /// Generated samples
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
    /// Count of samples removed by content filtering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rai_media_filtered_count: Option<u32>,
}

/// One generated video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSample {
    /// Video reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoRef>,
}

/// Downloadable video reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRef {
    /// Download URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl From<Operation> for VideoOperation {
    fn from(operation: Operation) -> Self {
        let video_uri = operation
            .response
            .and_then(|result| result.generate_video_response)
            .and_then(|videos| videos.generated_samples.into_iter().next())
            .and_then(|sample| sample.video)
            .and_then(|video| video.uri);

        VideoOperation {
            name: operation.name,
            done: operation.done,
            error: operation.error.map(|status| OperationError {
                code: status.code,
                message: status.message,
            }),
            video_uri,
        }
    }
}

//
// ─── countTokens and errors ─────────────────────────────────────────────────────
//

/// Request body for `models/{model}:countTokens`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountTokensRequest {
    /// Content to count
    pub contents: Vec<Content>,
}

/// Response body of `countTokens`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountTokensResponse {
    /// Total token count
    #[serde(default)]
    pub total_tokens: u64,
}

/// API status payload, used both for operation failures and error bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// Numeric status code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    /// Status message
    #[serde(default)]
    pub message: String,
    /// Canonical status name, e.g. `INVALID_ARGUMENT`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Error body of a non-success response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Error status
    pub error: Status,
}

/// Extract the provider's message from an error body, if it has the standard shape.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
        .filter(|message| !message.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_request_uses_camel_case() {
        let request = GenerateContentRequest {
            system_instruction: Some(Content::text("Be terse")),
            contents: vec![Content::user_text("Story")],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(json!({"type": "ARRAY"})),
                ..Default::default()
            }),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "Be terse");
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(value["generationConfig"].get("temperature").is_none());
        assert!(value["systemInstruction"].get("role").is_none());
    }

    #[test]
    fn speech_config_nests_voice_name() {
        let config = GenerationConfig {
            response_modalities: Some(vec!["AUDIO".to_string()]),
            speech_config: Some(SpeechConfig::prebuilt("Kore")),
            ..Default::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Kore"
        );
        assert_eq!(value["responseModalities"][0], "AUDIO");
    }

    #[test]
    fn content_response_extracts_inline_data_and_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Here is your image"},
                        {"inlineData": {"mimeType": "image/png", "data": "AAAA"}}
                    ]
                },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        assert_eq!(response.text(), "Here is your image");
        assert_eq!(
            response.content_parts(),
            vec![
                ContentPart::Text("Here is your image".to_string()),
                ContentPart::InlineData {
                    mime: "image/png".to_string(),
                    data: "AAAA".to_string(),
                },
            ]
        );
    }

    #[test]
    fn empty_response_reports_block_reason() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert!(response.first_parts().is_empty());
        assert_eq!(response.empty_reason(), "prompt blocked: SAFETY");
    }

    #[test]
    fn finished_operation_yields_video_uri() {
        let operation: Operation = serde_json::from_value(json!({
            "name": "models/veo/operations/abc",
            "done": true,
            "response": {
                "generateVideoResponse": {
                    "generatedSamples": [{"video": {"uri": "https://example.test/v.mp4"}}]
                }
            }
        }))
        .unwrap();

        let op = VideoOperation::from(operation);
        assert!(op.done);
        assert_eq!(op.video_uri.as_deref(), Some("https://example.test/v.mp4"));
        assert!(op.error.is_none());
    }

    #[test]
    fn filtered_operation_has_no_uri() {
        let operation: Operation = serde_json::from_value(json!({
            "name": "operations/xyz",
            "done": true,
            "response": {"generateVideoResponse": {"raiMediaFilteredCount": 1}}
        }))
        .unwrap();

        let op = VideoOperation::from(operation);
        assert!(op.done);
        assert!(op.video_uri.is_none());
    }

    #[test]
    fn failed_operation_carries_status() {
        let operation: Operation = serde_json::from_value(json!({
            "name": "operations/xyz",
            "done": true,
            "error": {"code": 3, "message": "image rejected"}
        }))
        .unwrap();

        let op = VideoOperation::from(operation);
        let error = op.error.unwrap();
        assert_eq!(error.code, Some(3));
        assert_eq!(error.message, "image rejected");
    }

    #[test]
    fn error_body_message() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(error_message(body).as_deref(), Some("Quota exceeded"));
        assert_eq!(error_message("<html>bad gateway</html>"), None);
    }
}
