//! Media transcoding errors.

/// Specific media codec error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CodecErrorKind {
    /// Input was not a `data:<mime>;base64,<payload>` URI
    #[display("Malformed data URI: {}", _0)]
    MalformedDataUri(String),
    /// Base64 payload could not be decoded
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
    /// PCM payload cannot be framed as 16-bit samples
    #[display("Invalid PCM payload: {}", _0)]
    InvalidPcm(String),
}

/// Media codec error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Codec Error: {} at line {} in {}", kind, line, file)]
pub struct CodecError {
    /// The specific error condition
    pub kind: CodecErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl CodecError {
    /// Create a new codec error with caller location tracking.
    #[track_caller]
    pub fn new(kind: CodecErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
