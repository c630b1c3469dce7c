//! Turns a `GenerationRequest` into the single-image call sent to the provider.

use crate::{
    models::{GenerationMode, GenerationRequest},
    provider::{ImageCall, Part},
};

/// Wire payload caps, independent of the slot capacity.
pub const MAX_WIRE_PRODUCT_IMAGES: usize = 3;
pub const MAX_WIRE_BACKGROUND_IMAGES: usize = 2;

const REFINE_PREAMBLE: &str = "REFINEMENT TASK: Use the provided image as a base. Modify it according to this new request:";
const REFINE_SUFFIX: &str = "Keep the core product and layout but improve quality and lighting.";
const COMPOSITE_PREAMBLE: &str = "COMPOSITING TASK: Take the product features from the first few images and place them realistically into the environment from the subsequent images.";

/// Non-empty preset fragments in angle, theme, style order.
pub fn modifier_fragments(request: &GenerationRequest) -> Vec<&str> {
    [
        request.angle_preset.as_str(),
        request.theme_preset.as_str(),
        request.style_preset.as_str(),
    ]
    .into_iter()
    .map(str::trim)
    .filter(|fragment| !fragment.is_empty())
    .collect()
}

pub fn compose_instruction(request: &GenerationRequest) -> String {
    let prompt = request.effective_prompt();
    let base = match request.mode() {
        GenerationMode::Refine => format!("{} {}. {}", REFINE_PREAMBLE, prompt, REFINE_SUFFIX),
        GenerationMode::Composite => format!("{} {}.", COMPOSITE_PREAMBLE, prompt),
        GenerationMode::Plain => prompt.to_string(),
    };

    let mut instruction = base;
    if !instruction.ends_with('.') {
        instruction.push('.');
    }

    let modifiers = modifier_fragments(request);
    if !modifiers.is_empty() {
        instruction.push_str(&format!(" [Artistic Context: {}]", modifiers.join(", ")));
    }
    instruction
}

/// Attachments go product images, background images, reference, then the text.
pub fn build_image_call(request: &GenerationRequest, model: &str) -> ImageCall {
    let mut parts: Vec<Part> = request
        .product_images
        .iter()
        .take(MAX_WIRE_PRODUCT_IMAGES)
        .chain(
            request
                .background_images
                .iter()
                .take(MAX_WIRE_BACKGROUND_IMAGES),
        )
        .chain(request.reference_image.iter())
        .cloned()
        .map(Part::Image)
        .collect();
    parts.push(Part::Text(compose_instruction(request)));

    ImageCall {
        model: model.to_string(),
        parts,
        aspect_ratio: request.aspect_ratio,
        image_size: request.tier.is_pro().then_some(request.image_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImagePayload, ImageSize, Tier, DEFAULT_PROMPT};

    fn images(tag: &str, n: usize) -> Vec<ImagePayload> {
        (0..n)
            .map(|i| ImagePayload::new("image/png", format!("{}{}", tag, i)))
            .collect()
    }

    #[test]
    fn test_plain_instruction_with_modifiers() {
        let request = GenerationRequest::new("blue sneaker").with_presets(
            "cinematic lighting",
            "top-down view",
            "",
        );
        assert_eq!(
            compose_instruction(&request),
            "blue sneaker. [Artistic Context: top-down view, cinematic lighting]"
        );
    }

    #[test]
    fn test_empty_prompt_uses_default() {
        let request = GenerationRequest::new("");
        assert_eq!(compose_instruction(&request), format!("{}.", DEFAULT_PROMPT));
    }

    #[test]
    fn test_composite_and_refine_preambles() {
        let composite = GenerationRequest::new("on a beach")
            .with_product_images(images("p", 1))
            .with_background_images(images("b", 1));
        let text = compose_instruction(&composite);
        assert!(text.starts_with("COMPOSITING TASK:"));
        assert!(text.ends_with("on a beach."));

        let refine = composite.with_reference_image(Some(ImagePayload::new("image/png", "r")));
        let text = compose_instruction(&refine);
        assert!(text.starts_with("REFINEMENT TASK:"));
        assert!(text.contains("new request: on a beach."));
    }

    #[test]
    fn test_wire_caps_and_order() {
        let reference = ImagePayload::new("image/png", "ref");
        let request = GenerationRequest::new("x")
            .with_product_images(images("p", 5))
            .with_background_images(images("b", 5))
            .with_reference_image(Some(reference.clone()));

        let call = build_image_call(&request, "flash-model");
        assert_eq!(call.image_count(), 6);

        let data: Vec<&str> = call
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::Image(image) => Some(image.data.as_str()),
                Part::Text(_) => None,
            })
            .collect();
        assert_eq!(data, vec!["p0", "p1", "p2", "b0", "b1", "ref"]);
        assert!(matches!(call.parts.last(), Some(Part::Text(_))));
        assert_eq!(call.model, "flash-model");
    }

    #[test]
    fn test_image_size_only_on_pro() {
        let request = GenerationRequest::new("x").with_image_size(ImageSize::FourK);
        assert_eq!(build_image_call(&request, "m").image_size, None);

        let request = request.with_tier(Tier::Pro);
        assert_eq!(
            build_image_call(&request, "m").image_size,
            Some(ImageSize::FourK)
        );
    }
}
