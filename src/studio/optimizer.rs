use crate::{
    models::GenerationRequest,
    provider::{ImageProvider, Part, TextCall},
};
use std::sync::Arc;

const DEFAULT_DRAFT: &str = "A professional product shot";

/// Rewrites a draft prompt with the text model. Fail-soft: any error hands
/// the draft back unchanged.
#[derive(Clone)]
pub struct PromptOptimizer {
    provider: Arc<dyn ImageProvider>,
    model: String,
}

impl PromptOptimizer {
    pub fn new(provider: Arc<dyn ImageProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub async fn optimize(&self, context: &GenerationRequest, draft: &str) -> String {
        let call = self.build_call(context, draft);

        match self.provider.generate_text(&call).await {
            Ok(optimized) if !optimized.trim().is_empty() => {
                log::info!("Prompt optimized ({} chars)", optimized.trim().len());
                optimized.trim().to_string()
            }
            Ok(_) => {
                log::warn!("Prompt optimizer returned nothing; keeping draft");
                draft.to_string()
            }
            Err(e) => {
                log::warn!("Prompt optimization failed, keeping draft: {}", e);
                draft.to_string()
            }
        }
    }

    fn build_call(&self, context: &GenerationRequest, draft: &str) -> TextCall {
        let mut parts = Vec::new();

        for (idx, image) in context.product_images.iter().enumerate() {
            parts.push(Part::Image(image.clone()));
            parts.push(Part::Text(format!("Product reference {}", idx + 1)));
        }
        for (idx, image) in context.background_images.iter().enumerate() {
            parts.push(Part::Image(image.clone()));
            parts.push(Part::Text(format!("Background reference {}", idx + 1)));
        }
        if let Some(reference) = &context.reference_image {
            parts.push(Part::Image(reference.clone()));
            parts.push(Part::Text(
                "The previously generated image to refine.".to_string(),
            ));
        }
        parts.push(Part::Text(instruction(context, draft)));

        TextCall {
            model: self.model.clone(),
            parts,
        }
    }
}

fn or_default(value: &str) -> &str {
    if value.trim().is_empty() {
        "Default"
    } else {
        value
    }
}

fn instruction(context: &GenerationRequest, draft: &str) -> String {
    let draft = if draft.trim().is_empty() {
        DEFAULT_DRAFT
    } else {
        draft
    };

    format!(
        "You are a professional AI Prompt Engineer for commercial photography.
Your task is to create a highly detailed and effective image generation prompt in ENGLISH.

Context:
- User wants to create a commercial ad.
- Angle: {angle}
- Theme: {theme}
- Style: {style}
- User input: \"{draft}\"

Goal:
- Describe the product features based on the provided images.
- Describe a perfect commercial environment blending the provided background ideas.
- If a 'refine' image is provided, focus on improving its lighting, composition, or specific user requests.
- Use technical terms: 'volumetric lighting', 'subsurface scattering', 'depth of field', '8k resolution', 'raytracing'.
- Keep output under 80 words.
- Return ONLY the optimized prompt text.",
        angle = or_default(&context.angle_preset),
        theme = or_default(&context.theme_preset),
        style = or_default(&context.style_preset),
        draft = draft,
    )
}
