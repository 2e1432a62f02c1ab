use crate::error::{EditorError, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// Image formats accepted at the upload boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Some(ImageFormat::Png)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Some(ImageFormat::WebP)
        } else {
            None
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }
}

/// A self-describing encoded image: declared MIME type plus the raw base64
/// payload with no data-URI prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub mime_type: String,
    pub data: String,
}

impl ImageData {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn from_bytes(format: ImageFormat, bytes: &[u8]) -> Self {
        Self {
            mime_type: format.mime_type().to_string(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Parses a `data:image/<subtype>;base64,<payload>` string.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let invalid = || EditorError::InvalidFormat("image".into());

        let rest = uri.strip_prefix("data:").ok_or_else(invalid)?;
        let (mime_type, payload) = rest.split_once(";base64,").ok_or_else(invalid)?;

        let subtype = mime_type.strip_prefix("image/").ok_or_else(invalid)?;
        if subtype.is_empty() || !subtype.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(invalid());
        }

        if STANDARD.decode(payload).is_err() {
            return Err(invalid());
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: payload.to_string(),
        })
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decodes the base64 payload back into raw image bytes.
    pub fn decode_bytes(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.data)
            .map_err(|_| EditorError::InvalidFormat("image".into()))
    }
}
