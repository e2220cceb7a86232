use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::ImageUnavailable;

/// Decoded hero image returned inline by the image model.
#[derive(Clone, PartialEq, Eq)]
pub struct HeroImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for HeroImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeroImage")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl HeroImage {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Build from an `inlineData` part (`mimeType` plus base64 `data`).
    pub fn from_inline(mime_type: &str, encoded: &str) -> Result<Self, ImageUnavailable> {
        if !mime_type.starts_with("image/") {
            return Err(ImageUnavailable::new(format!(
                "inline part has non-image mime type `{mime_type}`"
            )));
        }

        let data = STANDARD
            .decode(encoded.trim())
            .map_err(|err| ImageUnavailable::new(format!("invalid base64 image data: {err}")))?;

        if data.is_empty() {
            return Err(ImageUnavailable::new("inline image is empty"));
        }

        Ok(Self::new(mime_type, data))
    }

    /// `data:` URI suitable for an `<img src>`.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}
