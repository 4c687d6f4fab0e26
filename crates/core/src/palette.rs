use crate::color::{color_to_hsl, hex_to_color, hsl_to_rgb, rgb_to_hex, Hsl};
use crate::ThemePair;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DESATURATION: f64 = 0.9;

/// Scale saturation by `1 - reduction`. Unparseable input is returned as is.
pub fn desaturate(hex: &str, reduction: f64) -> String {
    let Some(color) = hex_to_color(hex) else {
        return hex.to_string();
    };
    let hsl = color_to_hsl(color);
    let s = (hsl.s * (1.0 - reduction)).clamp(0.0, 1.0);
    hsl_to_hex(Hsl { s, ..hsl })
}

/// Per-channel interpolation toward `neutral_hex`. A weight of 0 keeps the
/// color, 1 yields the neutral.
pub fn mix_with_neutral(hex: &str, neutral_hex: &str, weight: f64) -> String {
    let (Some(color), Some(neutral)) = (hex_to_color(hex), hex_to_color(neutral_hex)) else {
        return hex.to_string();
    };
    let weight = if weight.is_nan() {
        0.0
    } else {
        weight.clamp(0.0, 1.0)
    };
    let blend = |channel: u8, toward: u8| {
        f64::from(channel) * (1.0 - weight) + f64::from(toward) * weight
    };
    rgb_to_hex(
        blend(color.r, neutral.r),
        blend(color.g, neutral.g),
        blend(color.b, neutral.b),
    )
}

pub fn lighten(hex: &str, delta: f64) -> String {
    let Some(color) = hex_to_color(hex) else {
        return hex.to_string();
    };
    let hsl = color_to_hsl(color);
    let l = (hsl.l + delta).clamp(0.0, 1.0);
    hsl_to_hex(Hsl { l, ..hsl })
}

fn hsl_to_hex(hsl: Hsl) -> String {
    let (r, g, b) = hsl_to_rgb(hsl);
    rgb_to_hex(r, g, b)
}

/// One pass of the muted-tone pipeline: desaturate, blend toward a dark
/// neutral, then lift the lightness back up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToneRecipe {
    #[serde(default = "default_reduction")]
    pub reduction: f64,
    pub neutral: String,
    pub weight: f64,
    pub lighten: f64,
}

fn default_reduction() -> f64 {
    DEFAULT_DESATURATION
}

impl ToneRecipe {
    pub fn new(neutral: &str, weight: f64, lighten: f64) -> Self {
        Self {
            reduction: DEFAULT_DESATURATION,
            neutral: neutral.to_string(),
            weight,
            lighten,
        }
    }

    pub fn apply(&self, hex: &str) -> String {
        tone(hex, self)
    }
}

pub fn tone(hex: &str, recipe: &ToneRecipe) -> String {
    let muted = desaturate(hex, recipe.reduction);
    let mixed = mix_with_neutral(&muted, &recipe.neutral, recipe.weight);
    lighten(&mixed, recipe.lighten)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToneRecipes {
    pub gradient_base: ToneRecipe,
    pub gradient_accent: ToneRecipe,
    pub aura: ToneRecipe,
    pub placeholder_primary: ToneRecipe,
    pub placeholder_accent: ToneRecipe,
}

impl Default for ToneRecipes {
    fn default() -> Self {
        Self {
            gradient_base: ToneRecipe::new("#050810", 0.38, 0.4),
            gradient_accent: ToneRecipe::new("#0f1824", 0.24, 0.3),
            aura: ToneRecipe::new("#08101f", 0.3, 0.24),
            placeholder_primary: ToneRecipe::new("#060a12", 0.35, 0.38),
            placeholder_accent: ToneRecipe::new("#101625", 0.22, 0.28),
        }
    }
}

/// Derived tones a card is painted with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardPalette {
    pub gradient_base: String,
    pub gradient_accent: String,
    pub aura: String,
}

impl CardPalette {
    pub fn derive(theme: &ThemePair, recipes: &ToneRecipes) -> Self {
        let base = theme.base.to_hex();
        let accent = theme.accent.to_hex();
        Self {
            gradient_base: recipes.gradient_base.apply(&base),
            gradient_accent: recipes.gradient_accent.apply(&accent),
            aura: recipes.aura.apply(&accent),
        }
    }

    /// CSS background for the logo tile.
    pub fn linear_gradient(&self) -> String {
        format!(
            "linear-gradient(135deg, {}, {})",
            self.gradient_base, self.gradient_accent
        )
    }
}
