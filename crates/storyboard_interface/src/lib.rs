//! Provider call contracts for the storyboard generation pipeline.
//!
//! The orchestration layer never talks HTTP directly. It issues the four
//! generation calls (structured text, image, video job, speech) through
//! [`GenerationProvider`], and waits through [`Sleeper`], so both can be
//! replaced by test doubles.

mod clock;
mod traits;
mod types;

pub use clock::{Sleeper, TokioSleeper};
pub use traits::GenerationProvider;
pub use types::{
    ContentPart, EncodedImage, ImageRequest, ImageResponse, OperationError, SpeechRequest,
    SpeechRequestBuilder, StructuredRequest, StructuredRequestBuilder, VideoOperation,
    VideoRequest, VideoRequestBuilder,
};
