pub mod auth;
pub mod gemini;

use crate::{
    error::Result,
    models::{AspectRatio, ImagePayload, ImageSize},
};
use async_trait::async_trait;

pub use auth::{CredentialGate, EnvCredentialGate};
pub use gemini::GeminiClient;

/// One element of the ordered attachment list sent with a call.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Image(ImagePayload),
    Text(String),
}

/// A single-image generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCall {
    pub model: String,
    pub parts: Vec<Part>,
    pub aspect_ratio: AspectRatio,
    /// Present only on the Pro tier.
    pub image_size: Option<ImageSize>,
}

impl ImageCall {
    pub fn image_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, Part::Image(_)))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextCall {
    pub model: String,
    pub parts: Vec<Part>,
}

/// The external image service. Implementations classify their own failures
/// into `StudioError` variants; callers never look at message text.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate_image(&self, call: &ImageCall) -> Result<ImagePayload>;

    async fn generate_text(&self, call: &TextCall) -> Result<String>;
}
