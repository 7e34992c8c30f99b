//! Long-running video job lifecycle: submit, poll, fetch.

use std::sync::Arc;
use std::time::Duration;

use storyboard_config::PollingConfig;
use storyboard_core::{MediaAsset, Modality};
use storyboard_error::{GenerationError, GenerationErrorKind, StoryboardResult};
use storyboard_interface::{GenerationProvider, Sleeper, TokioSleeper, VideoOperation, VideoRequest};
use tracing::{debug, info, instrument, warn};

/// Lifecycle state of a [`GenerationJob`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, strum::EnumIter)]
pub enum JobState {
    /// Submitted, status not yet queried
    Created,
    /// Waiting for the provider to finish
    Polling,
    /// Finished with a result locator
    Done,
    /// Finished with an error or without a result
    Failed,
    /// Gave up after the attempt cap
    TimedOut,
}

impl JobState {
    /// True once no further polling will happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Failed | JobState::TimedOut)
    }
}

/// Polling cadence and cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_getters::Getters)]
pub struct PollerConfig {
    /// Wait before each status query
    interval: Duration,
    /// Status queries allowed before timing out
    max_attempts: u32,
}

impl PollerConfig {
    /// Poll every `interval`, at most `max_attempts` times.
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self::from(&PollingConfig::default())
    }
}

impl From<&PollingConfig> for PollerConfig {
    fn from(config: &PollingConfig) -> Self {
        Self::new(config.interval(), config.max_attempts)
    }
}

/// One video job: the provider handle plus the local poll count.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct GenerationJob {
    /// Last observed operation status
    operation: VideoOperation,
    /// Polls performed so far
    attempts: u32,
    /// Lifecycle state
    state: JobState,
}

impl GenerationJob {
    /// A job for a freshly submitted operation.
    pub fn new(operation: VideoOperation) -> Self {
        Self {
            operation,
            attempts: 0,
            state: JobState::Created,
        }
    }

    /// Fold the latest observed status into the job.
    ///
    /// Returns the result locator once the job is done, `None` while it is
    /// still running, and an error for the failed terminal states.
    fn settle(&mut self, operation: VideoOperation) -> StoryboardResult<Option<String>> {
        self.operation = operation;

        if let Some(error) = &self.operation.error {
            self.state = JobState::Failed;
            return Err(GenerationError::failed(Modality::Video, error.message.clone()).into());
        }

        if !self.operation.done {
            self.state = JobState::Polling;
            return Ok(None);
        }

        match self.operation.video_uri.clone().filter(|uri| !uri.is_empty()) {
            Some(uri) => {
                self.state = JobState::Done;
                Ok(Some(uri))
            }
            None => {
                self.state = JobState::Failed;
                Err(GenerationError::new(GenerationErrorKind::SafetyRejection(
                    "video job finished without a result, likely filtered".to_string(),
                ))
                .into())
            }
        }
    }
}

/// Drives video jobs from submission to downloaded bytes.
///
/// Waits between polls go through the injected [`Sleeper`]. Polling is
/// bounded: after `max_attempts` polls without completion the job times out.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use storyboard_interface::{GenerationProvider, VideoRequest};
/// use storyboard_pipeline::AsyncJobPoller;
///
/// # async fn run(provider: Arc<dyn GenerationProvider>, request: VideoRequest) -> storyboard_error::StoryboardResult<()> {
/// let poller = AsyncJobPoller::new(provider);
/// let clip = poller.run(&request).await?;
/// assert_eq!(clip.mime(), "video/mp4");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AsyncJobPoller {
    provider: Arc<dyn GenerationProvider>,
    sleeper: Arc<dyn Sleeper>,
    config: PollerConfig,
}

impl std::fmt::Debug for AsyncJobPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncJobPoller")
            .field("provider", &self.provider.provider_name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AsyncJobPoller {
    /// Poll with the tokio timer and default cadence.
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self::with_sleeper(provider, Arc::new(TokioSleeper), PollerConfig::default())
    }

    /// Poll with an explicit wait primitive and cadence.
    pub fn with_sleeper(
        provider: Arc<dyn GenerationProvider>,
        sleeper: Arc<dyn Sleeper>,
        config: PollerConfig,
    ) -> Self {
        Self {
            provider,
            sleeper,
            config,
        }
    }

    /// Polling cadence in use.
    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Submit, poll to completion and download the video.
    #[instrument(skip(self, request), fields(model = %request.model()))]
    pub async fn run(&self, request: &VideoRequest) -> StoryboardResult<MediaAsset> {
        let mut job = self.submit(request).await?;
        let locator = self.drive(&mut job).await?;
        let bytes = self.fetch(&locator).await?;
        info!(
            operation = %job.operation().name,
            attempts = job.attempts(),
            bytes = bytes.len(),
            "Video ready"
        );
        Ok(MediaAsset::Blob {
            mime: "video/mp4".to_string(),
            bytes,
        })
    }

    /// Submit the job.
    pub async fn submit(&self, request: &VideoRequest) -> StoryboardResult<GenerationJob> {
        let operation = self.provider.submit_video(request).await?;
        debug!(operation = %operation.name, done = operation.done, "Video job created");
        Ok(GenerationJob::new(operation))
    }

    /// Poll `job` until it reaches a terminal state; returns the result locator.
    #[instrument(skip(self, job), fields(operation = %job.operation().name))]
    pub async fn drive(&self, job: &mut GenerationJob) -> StoryboardResult<String> {
        let submitted = job.operation.clone();
        if let Some(locator) = job.settle(submitted)? {
            return Ok(locator);
        }

        loop {
            if job.attempts >= self.config.max_attempts {
                job.state = JobState::TimedOut;
                warn!(attempts = job.attempts, "Video job timed out");
                return Err(GenerationError::new(GenerationErrorKind::Timeout {
                    attempts: job.attempts,
                })
                .into());
            }

            self.sleeper.sleep(self.config.interval).await;
            let polled = self.provider.poll_video(&job.operation).await?;
            job.attempts += 1;
            debug!(attempt = job.attempts, done = polled.done, "Polled video job");

            if let Some(locator) = job.settle(polled)? {
                return Ok(locator);
            }
        }
    }

    /// Download the finished video.
    ///
    /// Every failure here, including an empty body, is a network failure.
    pub async fn fetch(&self, locator: &str) -> StoryboardResult<Vec<u8>> {
        let bytes = self.provider.fetch_media(locator).await.map_err(|err| {
            match err.generation_kind() {
                Some(GenerationErrorKind::Network(_)) => err,
                _ => GenerationError::new(GenerationErrorKind::Network(err.to_string())).into(),
            }
        })?;
        if bytes.is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::Network(
                "downloaded video is empty".to_string(),
            ))
            .into());
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyboard_interface::OperationError;

    #[test]
    fn running_operation_keeps_polling() {
        let mut job = GenerationJob::new(VideoOperation::pending("op"));
        assert_eq!(job.settle(VideoOperation::pending("op")).unwrap(), None);
        assert_eq!(*job.state(), JobState::Polling);
    }

    #[test]
    fn error_payload_fails_job() {
        let mut job = GenerationJob::new(VideoOperation::pending("op"));
        let err = job
            .settle(VideoOperation {
                name: "op".to_string(),
                done: true,
                error: Some(OperationError {
                    code: Some(3),
                    message: "invalid image".to_string(),
                }),
                video_uri: None,
            })
            .unwrap_err();
        assert_eq!(*job.state(), JobState::Failed);
        assert!(err.to_string().contains("invalid image"));
    }

    #[test]
    fn done_without_locator_is_safety_rejection() {
        let mut job = GenerationJob::new(VideoOperation::pending("op"));
        let err = job
            .settle(VideoOperation {
                name: "op".to_string(),
                done: true,
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(
            err.generation_kind(),
            Some(GenerationErrorKind::SafetyRejection(_))
        ));
        assert!(job.state().is_terminal());
    }

    #[test]
    fn config_converts_from_settings() {
        let config = PollerConfig::from(&PollingConfig {
            interval_secs: 2,
            max_attempts: 3,
        });
        assert_eq!(*config.interval(), Duration::from_secs(2));
        assert_eq!(*config.max_attempts(), 3);
        assert_eq!(*PollerConfig::default().max_attempts(), 24);
    }
}
