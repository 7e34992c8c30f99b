// Tests for the video job state machine.

mod test_utils;

use std::sync::Arc;
use std::time::Duration;

use storyboard_core::AspectRatio;
use storyboard_error::GenerationErrorKind;
use storyboard_interface::{OperationError, VideoOperation, VideoRequest};
use storyboard_pipeline::{AsyncJobPoller, JobState, PollerConfig};
use test_utils::{MockProvider, RecordingSleeper};

const OPERATION: &str = "models/veo/operations/mock-1";

fn request() -> anyhow::Result<VideoRequest> {
    Ok(VideoRequest::builder()
        .model("veo-3.1-fast-generate-preview")
        .prompt("Slow dolly forward")
        .image_base64("iVBORw0KGgo=")
        .image_mime("image/png")
        .aspect_ratio(AspectRatio::Landscape)
        .build()?)
}

fn finished(uri: &str) -> VideoOperation {
    VideoOperation {
        name: OPERATION.to_string(),
        done: true,
        error: None,
        video_uri: Some(uri.to_string()),
    }
}

fn poller(
    provider: &Arc<MockProvider>,
    sleeper: &Arc<RecordingSleeper>,
    max_attempts: u32,
) -> AsyncJobPoller {
    AsyncJobPoller::with_sleeper(
        provider.clone(),
        sleeper.clone(),
        PollerConfig::new(Duration::from_secs(5), max_attempts),
    )
}

#[tokio::test]
async fn test_polling_stops_after_max_attempts() -> anyhow::Result<()> {
    let provider = Arc::new(MockProvider::new());
    let sleeper = Arc::new(RecordingSleeper::default());
    let poller = poller(&provider, &sleeper, 3);

    let mut job = poller.submit(&request()?).await?;
    let err = poller.drive(&mut job).await.unwrap_err();

    assert!(matches!(
        err.generation_kind(),
        Some(GenerationErrorKind::Timeout { attempts: 3 })
    ));
    assert_eq!(*job.state(), JobState::TimedOut);
    assert_eq!(*job.attempts(), 3);
    assert_eq!(provider.calls("poll_video"), 3);
    assert_eq!(provider.calls("fetch_media"), 0);
    assert_eq!(sleeper.waits(), vec![Duration::from_secs(5); 3]);
    Ok(())
}

#[tokio::test]
async fn test_success_after_polls_fetches_bytes() -> anyhow::Result<()> {
    let provider = Arc::new(
        MockProvider::new()
            .with_polls(vec![
                VideoOperation::pending(OPERATION),
                finished("https://media.test/clip.mp4"),
            ])
            .with_media(vec![7; 32]),
    );
    let sleeper = Arc::new(RecordingSleeper::default());

    let clip = poller(&provider, &sleeper, 24).run(&request()?).await?;
    assert_eq!(clip.mime(), "video/mp4");
    assert_eq!(storyboard_pipeline::codec::asset_bytes(&clip)?, vec![7; 32]);
    assert_eq!(provider.calls("submit_video"), 1);
    assert_eq!(provider.calls("poll_video"), 2);
    assert_eq!(provider.calls("fetch_media"), 1);
    assert_eq!(sleeper.waits().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_completed_submission_skips_polling() -> anyhow::Result<()> {
    let provider = Arc::new(
        MockProvider::new().with_submit_result(finished("https://media.test/clip.mp4")),
    );
    let sleeper = Arc::new(RecordingSleeper::default());

    poller(&provider, &sleeper, 24).run(&request()?).await?;
    assert_eq!(provider.calls("poll_video"), 0);
    assert!(sleeper.waits().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_error_payload_fails_with_provider_message() -> anyhow::Result<()> {
    let provider = Arc::new(MockProvider::new().with_polls(vec![VideoOperation {
        name: OPERATION.to_string(),
        done: true,
        error: Some(OperationError {
            code: Some(3),
            message: "Input image violates policy".to_string(),
        }),
        video_uri: None,
    }]));
    let sleeper = Arc::new(RecordingSleeper::default());

    let err = poller(&provider, &sleeper, 24)
        .run(&request()?)
        .await
        .unwrap_err();
    assert!(matches!(
        err.generation_kind(),
        Some(GenerationErrorKind::Generation { .. })
    ));
    assert!(err.to_string().contains("Input image violates policy"));
    Ok(())
}

#[tokio::test]
async fn test_done_without_result_is_safety_rejection() -> anyhow::Result<()> {
    let provider = Arc::new(MockProvider::new().with_polls(vec![VideoOperation {
        name: OPERATION.to_string(),
        done: true,
        ..Default::default()
    }]));
    let sleeper = Arc::new(RecordingSleeper::default());

    let err = poller(&provider, &sleeper, 24)
        .run(&request()?)
        .await
        .unwrap_err();
    assert!(matches!(
        err.generation_kind(),
        Some(GenerationErrorKind::SafetyRejection(_))
    ));
    assert_eq!(provider.calls("fetch_media"), 0);
    Ok(())
}

#[tokio::test]
async fn test_fetch_failures_are_network_failures() -> anyhow::Result<()> {
    let provider = Arc::new(
        MockProvider::new()
            .with_polls(vec![finished("https://media.test/clip.mp4")])
            .with_media_error(GenerationErrorKind::ProviderStatus {
                status_code: 403,
                message: "forbidden".to_string(),
            }),
    );
    let sleeper = Arc::new(RecordingSleeper::default());
    let err = poller(&provider, &sleeper, 24)
        .run(&request()?)
        .await
        .unwrap_err();
    assert!(matches!(
        err.generation_kind(),
        Some(GenerationErrorKind::Network(_))
    ));

    let empty = Arc::new(
        MockProvider::new()
            .with_polls(vec![finished("https://media.test/clip.mp4")])
            .with_media(Vec::new()),
    );
    let err = poller(&empty, &sleeper, 24)
        .run(&request()?)
        .await
        .unwrap_err();
    assert!(matches!(
        err.generation_kind(),
        Some(GenerationErrorKind::Network(_))
    ));
    Ok(())
}
