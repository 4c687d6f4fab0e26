use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a record in the source dataset; either numeric or text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(untagged)]
pub enum SourceId {
    Number(u64),
    Text(String),
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<u64> for SourceId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for SourceId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A firm exactly as it appears in the dataset. Only `id` and `firm_name` are
/// required; everything else is defaulted when the catalog is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawFirm {
    pub id: SourceId,
    pub firm_name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub hq_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub bg_color: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default)]
    pub focus_stage: Option<String>,
    #[serde(default)]
    pub round_stage: Option<String>,
    #[serde(default)]
    pub typical_check_size: Option<String>,
    #[serde(default)]
    pub required_capital_usd: Option<String>,
    #[serde(default)]
    pub sector_focus: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub quote_style_line: Option<String>,
}

impl RawFirm {
    pub fn new(id: impl Into<SourceId>, firm_name: &str) -> Self {
        Self {
            id: id.into(),
            firm_name: firm_name.to_string(),
            category: None,
            hq_address: None,
            city: None,
            state: None,
            website: None,
            logo_url: None,
            bg_color: None,
            accent_color: None,
            focus_stage: None,
            round_stage: None,
            typical_check_size: None,
            required_capital_usd: None,
            sector_focus: None,
            notes: None,
            quote_style_line: None,
        }
    }
}

/// `Some` only for values with visible content. Empty strings in the dataset
/// count as missing.
pub fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
