use crate::{
    config::StudioConfig,
    error::{Result, StudioError},
    models::{ImagePayload, DEFAULT_MIME_TYPE},
    provider::{ImageCall, ImageProvider, Part, TextCall},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(rename = "inlineData", alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType", alias = "mime_type")]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// `generateContent` adapter for the Gemini image models.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_base: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &StudioConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| StudioError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
        })
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        let model = model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }

    fn wire_parts(parts: &[Part]) -> Vec<Value> {
        parts
            .iter()
            .map(|part| match part {
                Part::Image(image) => json!({
                    "inlineData": {
                        "mimeType": image.mime_type,
                        "data": image.data,
                    }
                }),
                Part::Text(text) => json!({ "text": text }),
            })
            .collect()
    }

    fn build_image_payload(call: &ImageCall) -> Value {
        let mut image_config = Map::new();
        image_config.insert(
            "aspectRatio".to_string(),
            Value::String(call.aspect_ratio.as_str().to_string()),
        );
        if let Some(size) = call.image_size {
            image_config.insert(
                "imageSize".to_string(),
                Value::String(size.as_str().to_string()),
            );
        }

        json!({
            "contents": [{
                "role": "user",
                "parts": Self::wire_parts(&call.parts),
            }],
            "generationConfig": {
                "imageConfig": Value::Object(image_config),
            }
        })
    }

    async fn post(&self, model: &str, payload: &Value) -> Result<GenerateContentResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| StudioError::AuthError("No API key selected".into()))?;
        let endpoint = self.endpoint_for_model(model);

        log::debug!("POST {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .query(&[("key", api_key)])
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                let e = StudioError::from(e);
                log::error!("Gemini request to {} failed: {}", model, e);
                e
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) if envelope.error.status.is_empty() => envelope.error.message,
                Ok(envelope) => format!("{} ({})", envelope.error.message, envelope.error.status),
                Err(_) => body,
            };
            log::error!("Gemini service error {}: {}", status.as_u16(), message);
            return Err(StudioError::classify_provider_failure(
                Some(status.as_u16()),
                &message,
            ));
        }

        serde_json::from_str(&body).map_err(|e| StudioError::SerializationError(e.to_string()))
    }
}

#[async_trait]
impl ImageProvider for GeminiClient {
    async fn generate_image(&self, call: &ImageCall) -> Result<ImagePayload> {
        log::info!(
            "Generating image with model: {} ({} attachments)",
            call.model,
            call.image_count()
        );

        let payload = Self::build_image_payload(call);
        let response = self.post(&call.model, &payload).await?;

        let inline = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| {
                content
                    .parts
                    .into_iter()
                    .find_map(|part| part.inline_data.filter(|data| !data.data.is_empty()))
            })
            .ok_or(StudioError::EmptyResponse)?;

        Ok(ImagePayload::new(
            inline
                .mime_type
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
            inline.data,
        ))
    }

    async fn generate_text(&self, call: &TextCall) -> Result<String> {
        log::info!("Invoking text model: {}", call.model);

        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": Self::wire_parts(&call.parts),
            }]
        });
        let response = self.post(&call.model, &payload).await?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(StudioError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}
