//! Media transcoding: base64, data URIs and PCM to WAV.
//!
//! Images travel as self-describing `data:<mime>;base64,<payload>` URIs.
//! Synthesized speech arrives as raw signed 16-bit little-endian mono PCM at
//! 24 kHz and is wrapped in a 44-byte RIFF/WAVE header to become playable.

use base64::{Engine, engine::general_purpose::STANDARD};
use storyboard_core::MediaAsset;
use storyboard_error::{CodecError, CodecErrorKind};

/// Sample rate of synthesized speech.
pub const PCM_SAMPLE_RATE: u32 = 24_000;
/// Channel count of synthesized speech.
pub const PCM_CHANNELS: u16 = 1;
/// Bits per sample of synthesized speech.
pub const PCM_BITS_PER_SAMPLE: u16 = 16;
/// Length of the canonical WAV header.
pub const WAV_HEADER_LEN: usize = 44;
/// MIME type assumed when a data URI omits one.
pub const DEFAULT_DATA_URI_MIME: &str = "image/png";

/// Decode standard-alphabet base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>, CodecError> {
    STANDARD
        .decode(data.trim())
        .map_err(|e| CodecError::new(CodecErrorKind::Base64Decode(e.to_string())))
}

/// Encode bytes as standard-alphabet base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// The two halves of a base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// MIME type from the URI header
    pub mime: String,
    /// Base64 payload
    pub data: String,
}

impl DataUri {
    /// Split a `data:<mime>;base64,<payload>` URI.
    ///
    /// A missing MIME type defaults to [`DEFAULT_DATA_URI_MIME`].
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_pipeline::codec::DataUri;
    ///
    /// let uri = DataUri::parse("data:image/jpeg;base64,/9j/4A==").unwrap();
    /// assert_eq!(uri.mime, "image/jpeg");
    /// assert_eq!(uri.data, "/9j/4A==");
    ///
    /// let bare = DataUri::parse("data:;base64,AAAA").unwrap();
    /// assert_eq!(bare.mime, "image/png");
    /// ```
    pub fn parse(uri: &str) -> Result<Self, CodecError> {
        let malformed = |reason: &str| {
            CodecError::new(CodecErrorKind::MalformedDataUri(reason.to_string()))
        };

        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| malformed("missing data: scheme"))?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| malformed("missing payload separator"))?;
        if data.is_empty() {
            return Err(malformed("empty payload"));
        }

        let mime = header.split(';').next().unwrap_or_default().trim();
        let mime = if mime.is_empty() {
            DEFAULT_DATA_URI_MIME
        } else {
            mime
        };

        Ok(Self {
            mime: mime.to_string(),
            data: data.to_string(),
        })
    }

    /// Rebuild the URI string.
    pub fn to_uri(&self) -> String {
        build_data_uri(&self.mime, &self.data)
    }

    /// Decode the payload.
    pub fn bytes(&self) -> Result<Vec<u8>, CodecError> {
        decode_base64(&self.data)
    }
}

/// Assemble a data URI from a MIME type and a base64 payload.
pub fn build_data_uri(mime: &str, base64: &str) -> String {
    format!("data:{};base64,{}", mime, base64)
}

/// Wrap raw PCM in a WAV container.
///
/// The payload is read as 16-bit mono samples at [`PCM_SAMPLE_RATE`]; a
/// trailing partial sample is kept as is. The output is exactly
/// `pcm.len() + 44` bytes.
///
/// # Examples
///
/// ```
/// use storyboard_pipeline::codec::pcm_to_wav;
///
/// let wav = pcm_to_wav(&[0u8; 480]).unwrap();
/// assert_eq!(wav.len(), 524);
/// assert_eq!(&wav[0..4], b"RIFF");
/// assert_eq!(&wav[8..12], b"WAVE");
/// ```
pub fn pcm_to_wav(pcm: &[u8]) -> Result<Vec<u8>, CodecError> {
    let block_align = PCM_CHANNELS * PCM_BITS_PER_SAMPLE / 8;
    let data_len = u32::try_from(pcm.len())
        .ok()
        .filter(|len| len.checked_add(36).is_some())
        .ok_or_else(|| {
            CodecError::new(CodecErrorKind::InvalidPcm(format!(
                "{} bytes exceeds the WAV size limit",
                pcm.len()
            )))
        })?;
    let byte_rate = PCM_SAMPLE_RATE * u32::from(block_align);

    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&PCM_CHANNELS.to_le_bytes());
    wav.extend_from_slice(&PCM_SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&PCM_BITS_PER_SAMPLE.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend_from_slice(pcm);
    Ok(wav)
}

/// Data URI form of an asset; blobs are base64-encoded.
pub fn asset_uri(asset: &MediaAsset) -> String {
    match asset {
        MediaAsset::Embedded { uri, .. } => uri.clone(),
        MediaAsset::Blob { mime, bytes } => build_data_uri(mime, &encode_base64(bytes)),
    }
}

/// Raw bytes of an asset; embedded URIs are decoded.
pub fn asset_bytes(asset: &MediaAsset) -> Result<Vec<u8>, CodecError> {
    match asset {
        MediaAsset::Embedded { uri, .. } => DataUri::parse(uri)?.bytes(),
        MediaAsset::Blob { bytes, .. } => Ok(bytes.clone()),
    }
}
