//! Image attachments stored inline in notes as `data:` URIs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::ValidationError;

/// Largest accepted image, measured on the raw (decoded) bytes.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    mime: String,
    bytes: Vec<u8>,
}

impl Attachment {
    /// Wraps raw image bytes picked by the user.
    pub fn new(mime: &str, bytes: Vec<u8>) -> Result<Self, ValidationError> {
        let mime = mime.trim().to_ascii_lowercase();
        if !mime.starts_with("image/") || mime.len() == "image/".len() {
            return Err(ValidationError::UnsupportedImage);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ValidationError::ImageTooLarge {
                size: bytes.len(),
                limit: MAX_IMAGE_BYTES,
            });
        }
        Ok(Self { mime, bytes })
    }

    /// Parses and checks a `data:<mime>;base64,<payload>` URI.
    pub fn from_data_uri(uri: &str) -> Result<Self, ValidationError> {
        let rest = uri.strip_prefix("data:").ok_or(ValidationError::UnsupportedImage)?;
        let (header, payload) = rest.split_once(',').ok_or(ValidationError::UnsupportedImage)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(ValidationError::UnsupportedImage)?;

        // Reject oversized payloads before decoding them.
        if payload.len() / 4 * 3 > MAX_IMAGE_BYTES + 2 {
            return Err(ValidationError::ImageTooLarge {
                size: payload.len() / 4 * 3,
                limit: MAX_IMAGE_BYTES,
            });
        }
        let bytes = STANDARD
            .decode(payload)
            .map_err(|_| ValidationError::UnsupportedImage)?;
        Self::new(mime, bytes)
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}
