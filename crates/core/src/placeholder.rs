//! Self-contained fallback logos. Every card gets one at catalog build time so
//! a broken or missing logo can always be swapped for something on-brand.

use crate::palette::ToneRecipes;
use crate::ThemePair;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

pub const SVG_DATA_URI_PREFIX: &str = "data:image/svg+xml;base64,";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaceholderConfig {
    pub size: u32,
    pub corner_radius: u32,
    pub font_size: u32,
    pub font_family: String,
    pub text_color: String,
    /// Shown when the name yields no initials.
    pub fallback_initials: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            size: 240,
            corner_radius: 28,
            font_size: 64,
            font_family:
                "SF Pro Display, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif"
                    .to_string(),
            text_color: "#ffffff".to_string(),
            fallback_initials: "NY".to_string(),
        }
    }
}

/// Uppercased first character of the first two words.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn render_svg(
    name: &str,
    theme: &ThemePair,
    recipes: &ToneRecipes,
    config: &PlaceholderConfig,
) -> String {
    let primary = recipes.placeholder_primary.apply(&theme.base.to_hex());
    let accent = recipes.placeholder_accent.apply(&theme.accent.to_hex());
    let mut label = initials(name);
    if label.is_empty() {
        label = config.fallback_initials.clone();
    }
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#,
            r#"<defs><linearGradient id="grad" x1="0%" y1="0%" x2="100%" y2="100%">"#,
            r#"<stop offset="0%" stop-color="{primary}"/>"#,
            r#"<stop offset="100%" stop-color="{accent}"/>"#,
            r#"</linearGradient></defs>"#,
            r#"<rect width="100%" height="100%" rx="{radius}" ry="{radius}" fill="url(#grad)"/>"#,
            r#"<text x="50%" y="52%" text-anchor="middle" dominant-baseline="middle" "#,
            r#"font-family="{font}" font-size="{font_size}" fill="{fill}" font-weight="600" letter-spacing="6">"#,
            r#"{label}</text></svg>"#
        ),
        size = config.size,
        primary = escape_xml(&primary),
        accent = escape_xml(&accent),
        radius = config.corner_radius,
        font = escape_xml(&config.font_family),
        font_size = config.font_size,
        fill = escape_xml(&config.text_color),
        label = escape_xml(&label),
    )
}

pub fn fallback_image(
    name: &str,
    theme: &ThemePair,
    recipes: &ToneRecipes,
    config: &PlaceholderConfig,
) -> String {
    let svg = render_svg(name, theme, recipes, config);
    format!("{SVG_DATA_URI_PREFIX}{}", STANDARD.encode(svg.as_bytes()))
}

/// Recover the markup from a payload produced by [`fallback_image`].
pub fn decode_fallback_image(payload: &str) -> Option<String> {
    let encoded = payload.strip_prefix(SVG_DATA_URI_PREFIX)?;
    let bytes = STANDARD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
