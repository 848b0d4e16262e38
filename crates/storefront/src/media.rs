//! Local image handling for uploads and previews.
//!
//! The shell hands the selected file over as raw bytes or as the data URL
//! a file reader produced; either way it becomes a [`LocalImage`] the
//! try-on and analysis views can preview and upload.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

/// Errors decoding a user-selected image.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The string is not a `data:<mime>;base64,<payload>` URL.
    #[error("Invalid data URL")]
    InvalidDataUrl,

    /// The base64 payload failed to decode.
    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// An image selected from the viewer's device, held in memory until upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImage {
    /// Original file name, for display only.
    pub file_name: String,
    /// MIME type (e.g. `image/jpeg`).
    pub content_type: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

impl LocalImage {
    /// Create an image from raw bytes.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Parse a `data:` URL produced by a file reader.
    ///
    /// # Errors
    ///
    /// Returns `MediaError` if the URL is malformed or the payload is not
    /// valid base64.
    pub fn from_data_url(file_name: impl Into<String>, data_url: &str) -> Result<Self, MediaError> {
        let rest = data_url
            .strip_prefix("data:")
            .ok_or(MediaError::InvalidDataUrl)?;
        let (header, payload) = rest.split_once(',').ok_or(MediaError::InvalidDataUrl)?;
        let content_type = header
            .strip_suffix(";base64")
            .ok_or(MediaError::InvalidDataUrl)?;

        let bytes = BASE64.decode(payload)?;
        Ok(Self::new(file_name, content_type, bytes))
    }

    /// Re-encode as a `data:` URL for an inline preview.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            BASE64.encode(&self.bytes)
        )
    }
}
