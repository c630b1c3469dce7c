use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub prompt: &'static str,
}

const fn preset(id: &'static str, name: &'static str, prompt: &'static str) -> Preset {
    Preset { id, name, prompt }
}

pub const STYLE_PRESETS: &[Preset] = &[
    preset("none", "Original", ""),
    preset(
        "cinematic",
        "Cinematic",
        "cinematic lighting, dramatic shadows, professional photography, high contrast",
    ),
    preset(
        "minimalist",
        "Minimalist",
        "minimalist design, clean background, soft lighting, elegant, simple",
    ),
    preset(
        "luxury",
        "Luxury",
        "luxury aesthetic, gold accents, premium material texture, expensive feel, high-end",
    ),
    preset(
        "vibrant",
        "Vibrant",
        "vibrant colors, energetic atmosphere, bright pop, commercial studio lighting",
    ),
    preset(
        "organic",
        "Organic",
        "natural elements, eco-friendly vibe, soft daylight, earthy tones, sustainable look",
    ),
    preset(
        "cyberpunk",
        "Cyberpunk",
        "neon lights, high-tech, futuristic aesthetic, dark background with blue and pink glows",
    ),
];

pub const ANGLE_PRESETS: &[Preset] = &[
    preset("none", "Auto Angle", ""),
    preset("eye-level", "Eye Level", "eye level shot, straight-on perspective"),
    preset("top-down", "Top Down", "top-down view, flat lay photography"),
    preset(
        "low-angle",
        "Low Angle",
        "low angle hero shot, looking up at the product",
    ),
    preset(
        "close-up",
        "Close-up",
        "macro photography, close-up shot, shallow depth of field",
    ),
    preset("side-view", "Side View", "side profile view, side perspective"),
    preset(
        "isometric",
        "Isometric",
        "isometric perspective, 45 degree angle view",
    ),
];

pub const THEME_PRESETS: &[Preset] = &[
    preset("none", "Default", ""),
    preset(
        "tech",
        "Tech/Modern",
        "modern technology lab, futuristic workbench, clean digital aesthetic",
    ),
    preset(
        "nature",
        "Nature/Garden",
        "lush garden setting, morning sunlight through leaves, natural outdoors",
    ),
    preset(
        "cosmetics",
        "Beauty/Cosmetic",
        "high-end cosmetic display, liquid ripples, soft pastel colors, elegant lighting",
    ),
    preset(
        "beverage",
        "Beverage/Ice",
        "chilled environment, condensation droplets, ice cubes, refreshing splashing water",
    ),
    preset(
        "urban",
        "Urban/Street",
        "gritty urban street, concrete textures, blurred city bokeh background",
    ),
    preset(
        "home",
        "Interior/Home",
        "cozy modern living room, soft home interior lighting, lifestyle background",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetKind {
    Style,
    Angle,
    Theme,
}

impl PresetKind {
    pub fn catalog(&self) -> &'static [Preset] {
        match self {
            PresetKind::Style => STYLE_PRESETS,
            PresetKind::Angle => ANGLE_PRESETS,
            PresetKind::Theme => THEME_PRESETS,
        }
    }

    pub fn find(&self, id: &str) -> Option<&'static Preset> {
        self.catalog().iter().find(|preset| preset.id == id)
    }

    /// Prompt fragment for a preset id; unknown ids and "none" yield "".
    pub fn resolve(&self, id: &str) -> &'static str {
        self.find(id).map(|preset| preset.prompt).unwrap_or("")
    }
}
