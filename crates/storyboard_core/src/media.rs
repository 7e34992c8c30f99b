//! Media handles returned by generation calls.

/// The result of a generation call.
///
/// Images come back embedded as data URIs; video and synthesized audio are
/// held as in-memory blobs. Both always carry a MIME type. Conversion between
/// the two forms lives in the pipeline's media codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaAsset {
    /// `data:<mime>;base64,<payload>` URI
    Embedded {
        /// MIME type of the payload
        mime: String,
        /// Complete data URI
        uri: String,
    },
    /// Raw bytes held in memory
    Blob {
        /// MIME type of the bytes
        mime: String,
        /// Media bytes
        bytes: Vec<u8>,
    },
}

impl MediaAsset {
    /// MIME type of the asset.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_core::MediaAsset;
    ///
    /// let clip = MediaAsset::Blob { mime: "video/mp4".into(), bytes: vec![0, 1] };
    /// assert_eq!(clip.mime(), "video/mp4");
    /// ```
    pub fn mime(&self) -> &str {
        match self {
            MediaAsset::Embedded { mime, .. } | MediaAsset::Blob { mime, .. } => mime,
        }
    }

    /// True if the asset is held as raw bytes.
    pub fn is_blob(&self) -> bool {
        matches!(self, MediaAsset::Blob { .. })
    }
}
