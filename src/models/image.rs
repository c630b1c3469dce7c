use crate::error::{Result, StudioError};
use crate::models::{AspectRatio, ImageSize, Tier};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROMPT: &str = "Professional commercial advertisement photography";
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// Encoded image blob, always held as base64 without any data-url prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String,
}

impl ImagePayload {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, STANDARD.encode(bytes))
    }

    /// Accepts either bare base64 or a `data:<mime>;base64,<data>` url.
    pub fn from_data_url(raw: &str) -> Self {
        match raw.split_once(',') {
            Some((prefix, data)) => {
                let mime_type = prefix
                    .strip_prefix("data:")
                    .and_then(|rest| rest.split(';').next())
                    .filter(|mime| !mime.is_empty())
                    .unwrap_or(DEFAULT_MIME_TYPE);
                Self::new(mime_type, data)
            }
            None => Self::new(DEFAULT_MIME_TYPE, raw),
        }
    }

    pub fn decode_bytes(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| StudioError::DecodeError(e.to_string()))
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Plain,
    /// Product and background assets blended into one scene.
    Composite,
    /// A previous render is modified instead of composing from scratch.
    Refine,
}

/// A fully resolved submission. Never mutated once handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub image_size: ImageSize,
    pub style_preset: String,
    pub angle_preset: String,
    pub theme_preset: String,
    pub tier: Tier,
    pub batch_count: usize,
    pub product_images: Vec<ImagePayload>,
    pub background_images: Vec<ImagePayload>,
    pub reference_image: Option<ImagePayload>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            aspect_ratio: AspectRatio::default(),
            image_size: ImageSize::default(),
            style_preset: String::new(),
            angle_preset: String::new(),
            theme_preset: String::new(),
            tier: Tier::default(),
            batch_count: 4,
            product_images: Vec::new(),
            background_images: Vec::new(),
            reference_image: None,
        }
    }
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_batch_count(mut self, count: usize) -> Self {
        self.batch_count = count;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_image_size(mut self, image_size: ImageSize) -> Self {
        self.image_size = image_size;
        self
    }

    pub fn with_presets(
        mut self,
        style: impl Into<String>,
        angle: impl Into<String>,
        theme: impl Into<String>,
    ) -> Self {
        self.style_preset = style.into();
        self.angle_preset = angle.into();
        self.theme_preset = theme.into();
        self
    }

    pub fn with_product_images(mut self, images: Vec<ImagePayload>) -> Self {
        self.product_images = images;
        self
    }

    pub fn with_background_images(mut self, images: Vec<ImagePayload>) -> Self {
        self.background_images = images;
        self
    }

    pub fn with_reference_image(mut self, image: Option<ImagePayload>) -> Self {
        self.reference_image = image;
        self
    }

    pub fn effective_prompt(&self) -> &str {
        let trimmed = self.prompt.trim();
        if trimmed.is_empty() {
            DEFAULT_PROMPT
        } else {
            trimmed
        }
    }

    pub fn mode(&self) -> GenerationMode {
        if self.reference_image.is_some() {
            GenerationMode::Refine
        } else if !self.product_images.is_empty() && !self.background_images.is_empty() {
            GenerationMode::Composite
        } else {
            GenerationMode::Plain
        }
    }

    pub fn has_assets(&self) -> bool {
        !self.product_images.is_empty()
            || !self.background_images.is_empty()
            || self.reference_image.is_some()
    }
}

/// A history entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub id: String,
    pub image: ImagePayload,
    pub prompt_used: String,
    pub created_at: DateTime<Utc>,
    pub aspect_ratio: AspectRatio,
    pub originating_request: GenerationRequest,
}
