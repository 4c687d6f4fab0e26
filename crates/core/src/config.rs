use crate::palette::ToneRecipes;
use crate::placeholder::PlaceholderConfig;
use crate::{hex_to_color, BoardMode, SlotSpec, ThemePair};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WORD_BUDGET: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeDefaults {
    pub base: String,
    pub accent: String,
}

impl Default for ThemeDefaults {
    fn default() -> Self {
        Self {
            base: "#0e141f".to_string(),
            accent: "#a5b9ff".to_string(),
        }
    }
}

impl ThemeDefaults {
    /// Configured fallback colors; an unparseable entry falls back to the
    /// built-in pair.
    pub fn resolve(&self) -> ThemePair {
        let builtin = ThemePair::default();
        ThemePair {
            base: hex_to_color(&self.base).unwrap_or(builtin.base),
            accent: hex_to_color(&self.accent).unwrap_or(builtin.accent),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Prefix for relative logo paths.
    pub base_path: String,
    pub word_budget: usize,
    pub theme: ThemeDefaults,
    pub default_category: String,
    pub default_quote: String,
    pub default_notes: String,
    pub placeholder: PlaceholderConfig,
    pub tones: ToneRecipes,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            word_budget: DEFAULT_WORD_BUDGET,
            theme: ThemeDefaults::default(),
            default_category: "Independent".to_string(),
            default_quote: "Stay curious, trust the signal.".to_string(),
            default_notes: "Founder-friendly partner focused on momentum.".to_string(),
            placeholder: PlaceholderConfig::default(),
            tones: ToneRecipes::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoardConfig {
    pub catalog: CatalogConfig,
    pub mode: BoardMode,
}

/// Named slot layouts the surfaces can switch to without a config file.
pub fn board_preset(name: &str) -> Option<BoardMode> {
    let slots = match name {
        "free" => return Some(BoardMode::Free),
        "top_picks" | "top-picks" => vec![
            SlotSpec::new("pick-1", "First pick", 1),
            SlotSpec::new("pick-2", "Second pick", 1),
            SlotSpec::new("pick-3", "Third pick", 1),
        ],
        "stage_tiers" | "stage-tiers" => vec![
            SlotSpec::new("pre-seed", "Pre-Seed", 3),
            SlotSpec::new("seed", "Seed", 3),
            SlotSpec::new("series-a", "Series A+", 3),
        ],
        "ranking_lanes" | "ranking-lanes" => vec![
            SlotSpec::new("hot", "Hot", 2),
            SlotSpec::new("warm", "Warm", 2),
            SlotSpec::new("later", "Later", 3),
        ],
        _ => return None,
    };
    Some(BoardMode::Slotted { slots })
}

pub const BOARD_PRESETS: &[&str] = &["free", "top_picks", "stage_tiers", "ranking_lanes"];
