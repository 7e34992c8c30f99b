#![cfg(feature = "gemini")]

// Tests for the Gemini REST client.
//
// Offline tests exercise construction and transport failure mapping. Tests
// marked with `#[cfg_attr(not(feature = "api"), ignore)]` hit the real API
// and need GEMINI_API_KEY.

use storyboard_config::{Credential, ProviderConfig};
use storyboard_core::AspectRatio;
use storyboard_error::{GenerationErrorKind, StoryboardErrorKind};
use storyboard_interface::{
    GenerationProvider, ImageRequest, ImageResponse, SpeechRequest, StructuredRequest,
};
use storyboard_models::GeminiClient;

//
// ─── OFFLINE TESTS ──────────────────────────────────────────────────────────────
//

#[test]
fn test_provider_name() -> anyhow::Result<()> {
    let client = GeminiClient::new(Credential::new("test-key"))?;
    assert_eq!(client.provider_name(), "gemini");
    Ok(())
}

#[tokio::test]
async fn test_unreachable_endpoint_is_http_error() -> anyhow::Result<()> {
    let config = ProviderConfig {
        base_url: "http://127.0.0.1:9/v1beta".to_string(),
        no_retry: true,
        ..Default::default()
    };
    let client = GeminiClient::with_config(Credential::new("test-key"), &config)?;

    let err = client
        .count_tokens("gemini-2.5-flash", "hello")
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), StoryboardErrorKind::Http(_)));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_download_is_network_failure() -> anyhow::Result<()> {
    let client = GeminiClient::new(Credential::new("test-key"))?;

    let err = client
        .fetch_media("http://127.0.0.1:9/video.mp4")
        .await
        .unwrap_err();
    assert!(matches!(
        err.generation_kind(),
        Some(GenerationErrorKind::Network(_))
    ));
    Ok(())
}

//
// ─── LIVE API TESTS ─────────────────────────────────────────────────────────────
//

fn live_client() -> anyhow::Result<GeminiClient> {
    let _ = dotenvy::dotenv();
    Ok(GeminiClient::from_env()?)
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_live_count_tokens() -> anyhow::Result<()> {
    let client = live_client()?;
    let tokens = client.count_tokens("gemini-2.5-flash", "test").await?;
    assert!(tokens > 0);
    Ok(())
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_live_structured_output() -> anyhow::Result<()> {
    let client = live_client()?;
    let request = StructuredRequest::builder()
        .model("gemini-2.5-flash")
        .system_instruction("List the named characters in the story.")
        .user_content("Mina and her brother Jun fix a lighthouse.")
        .schema(serde_json::json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {"name": {"type": "STRING"}},
                "required": ["name"]
            }
        }))
        .build()?;

    let text = client.generate_structured(&request).await?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    assert!(value.is_array());
    Ok(())
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_live_content_image() -> anyhow::Result<()> {
    let client = live_client()?;
    let request = ImageRequest::Content {
        model: "gemini-2.5-flash-image".to_string(),
        prompt: "A red paper boat on a puddle".to_string(),
        aspect_ratio: AspectRatio::Landscape,
        image_size: None,
    };

    let response = client.generate_image(&request).await?;
    assert!(matches!(response, ImageResponse::Content(parts) if !parts.is_empty()));
    Ok(())
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_live_speech() -> anyhow::Result<()> {
    let client = live_client()?;
    let request = SpeechRequest::builder()
        .model("gemini-2.5-flash-preview-tts")
        .text("The tide is coming in.")
        .voice("Kore")
        .build()?;

    let parts = client.synthesize_speech(&request).await?;
    assert!(!parts.is_empty());
    Ok(())
}
