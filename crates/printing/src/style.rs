use log::debug;
use piecraft_core::Recipe;

use crate::display::{Color, TextRole};

/// Fixed colours of the recipe document.
pub mod palette {
    use crate::display::Color;

    /// Full-page background.
    pub const NAVY: Color = Color::new(12.0 / 255.0, 18.0 / 255.0, 55.0 / 255.0, 1.0);
    /// Card drawn over the background, inset from the paper edge.
    pub const PEACH: Color = Color::new(254.0 / 255.0, 222.0 / 255.0, 180.0 / 255.0, 1.0);
    pub const PURPLE: Color = Color::new(126.0 / 255.0, 105.0 / 255.0, 171.0 / 255.0, 1.0);
    pub const TEXT: Color = Color::new(80.0 / 255.0, 80.0 / 255.0, 80.0 / 255.0, 1.0);
    pub const SUBHEADING: Color = Color::new(60.0 / 255.0, 60.0 / 255.0, 60.0 / 255.0, 1.0);
    pub const DIVIDER: Color = Color::new(200.0 / 255.0, 200.0 / 255.0, 200.0 / 255.0, 1.0);
}

/// Font size set chosen from the amount of content. Ordered from largest to smallest.
/// 依內容量挑選的字級組合，由大到小排列。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FontTier {
    Roomy,
    Standard,
    Compact,
    Dense,
}

impl FontTier {
    pub const ALL: [FontTier; 4] = [
        FontTier::Roomy,
        FontTier::Standard,
        FontTier::Compact,
        FontTier::Dense,
    ];

    pub const fn title_size(self) -> f32 {
        match self {
            FontTier::Roomy => 24.0,
            FontTier::Standard => 22.0,
            FontTier::Compact => 20.0,
            FontTier::Dense => 18.0,
        }
    }

    pub const fn heading_size(self) -> f32 {
        match self {
            FontTier::Roomy => 16.0,
            FontTier::Standard => 15.0,
            FontTier::Compact => 14.0,
            FontTier::Dense => 13.0,
        }
    }

    pub const fn subheading_size(self) -> f32 {
        match self {
            FontTier::Roomy => 13.0,
            FontTier::Standard => 12.0,
            FontTier::Compact => 11.0,
            FontTier::Dense => 10.0,
        }
    }

    pub const fn body_size(self) -> f32 {
        match self {
            FontTier::Roomy => 11.0,
            FontTier::Standard => 10.0,
            FontTier::Compact => 9.5,
            FontTier::Dense => 8.5,
        }
    }

    /// Line height as a multiple of the font size.
    pub const fn line_spacing(self) -> f32 {
        match self {
            FontTier::Roomy => 1.35,
            FontTier::Standard => 1.3,
            FontTier::Compact => 1.25,
            FontTier::Dense => 1.2,
        }
    }

    /// Next tier down, or `None` at `Dense`.
    pub const fn smaller(self) -> Option<FontTier> {
        match self {
            FontTier::Roomy => Some(FontTier::Standard),
            FontTier::Standard => Some(FontTier::Compact),
            FontTier::Compact => Some(FontTier::Dense),
            FontTier::Dense => None,
        }
    }

    /// Size and colour for a run of the given role at this tier.
    pub fn style(self, role: TextRole) -> TextStyle {
        let (size_pt, color) = match role {
            TextRole::Title => (self.title_size(), palette::PURPLE),
            TextRole::TypeLabel => (self.heading_size(), palette::TEXT),
            TextRole::Heading => (self.heading_size(), palette::TEXT),
            TextRole::Subheading => (self.subheading_size(), palette::SUBHEADING),
            TextRole::Details | TextRole::Body | TextRole::Marker => {
                (self.body_size(), palette::TEXT)
            }
            TextRole::Footer => (10.0, palette::PURPLE),
        };
        TextStyle {
            size_pt,
            line_height_pt: size_pt * self.line_spacing(),
            color,
            role,
        }
    }
}

/// Drawing state for one run of text, handed to every draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_pt: f32,
    pub line_height_pt: f32,
    pub color: Color,
    pub role: TextRole,
}

impl TextStyle {
    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    pub fn with_role(self, role: TextRole) -> Self {
        Self { role, ..self }
    }
}

/// Rough measure of how much a recipe has to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentVolume {
    /// Characters across all ingredients and instructions.
    pub chars: usize,
    pub ingredients: usize,
    pub instructions: usize,
}

impl ContentVolume {
    pub fn of(recipe: &Recipe) -> Self {
        let chars = recipe
            .all_ingredients()
            .chain(recipe.instructions.iter().map(String::as_str))
            .map(|text| text.chars().count())
            .sum();
        Self {
            chars,
            ingredients: recipe.ingredients.len(),
            instructions: recipe.instructions.len(),
        }
    }
}

struct Threshold {
    tier: FontTier,
    chars: usize,
    ingredients: usize,
    instructions: usize,
}

const THRESHOLDS: [Threshold; 3] = [
    Threshold {
        tier: FontTier::Dense,
        chars: 3000,
        ingredients: 20,
        instructions: 15,
    },
    Threshold {
        tier: FontTier::Compact,
        chars: 2500,
        ingredients: 15,
        instructions: 12,
    },
    Threshold {
        tier: FontTier::Standard,
        chars: 2000,
        ingredients: 12,
        instructions: 10,
    },
];

/// Step function from content volume to tier. A value sitting exactly on a
/// threshold picks the smaller font.
pub fn select_tier(volume: ContentVolume) -> FontTier {
    let tier = THRESHOLDS
        .iter()
        .find(|threshold| {
            volume.chars >= threshold.chars
                || volume.ingredients >= threshold.ingredients
                || volume.instructions >= threshold.instructions
        })
        .map(|threshold| threshold.tier)
        .unwrap_or(FontTier::Roomy);
    debug!(
        "content volume {} chars / {} ingredients / {} instructions -> {:?}",
        volume.chars, volume.ingredients, volume.instructions, tier
    );
    tier
}
