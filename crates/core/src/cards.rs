use crate::color::Color;
use crate::content::SourceId;
use crate::palette::CardPalette;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub const PREFIX: &'static str = "firm-";

    pub fn from_source(id: &SourceId) -> Self {
        Self(format!("{}{id}", Self::PREFIX))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CardId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThemePair {
    pub base: Color,
    pub accent: Color,
}

impl Default for ThemePair {
    fn default() -> Self {
        Self {
            base: Color::new(0x0e, 0x14, 0x1f),
            accent: Color::new(0xa5, 0xb9, 0xff),
        }
    }
}

/// Immutable display unit. Where a card sits on the board is tracked by the
/// placement store, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub id: CardId,
    pub source_id: SourceId,
    pub name: String,
    pub category: String,
    pub address: String,
    pub website: String,
    pub website_label: String,
    pub logo: Option<String>,
    pub theme: ThemePair,
    pub palette: CardPalette,
    pub stage: Option<String>,
    pub round_stage: Option<String>,
    pub investment_range: Option<String>,
    pub quote: String,
    pub notes: String,
    pub summary: String,
    pub fallback_image: String,
}

impl Card {
    /// Logo to show first; the fallback image when there is none.
    pub fn image_source(&self) -> &str {
        self.logo.as_deref().unwrap_or(&self.fallback_image)
    }
}
