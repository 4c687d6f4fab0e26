use crate::color::hex_to_color;
use crate::content::{present, RawFirm, SourceId};
use crate::palette::CardPalette;
use crate::placeholder::fallback_image;
use crate::{Card, CardId, CatalogConfig, Color, ThemePair};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

pub const ELLIPSIS: char = '…';
pub const ALL_FACET: &str = "All";

/// Cards in dataset order with an id index.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    cards: Vec<Card>,
    #[serde(skip)]
    index: HashMap<CardId, usize>,
}

impl Catalog {
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let index = cards
            .iter()
            .enumerate()
            .map(|(idx, card)| (card.id.clone(), idx))
            .collect();
        Self { cards, index }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn ids(&self) -> impl Iterator<Item = &CardId> + '_ {
        self.cards.iter().map(|card| &card.id)
    }

    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.index.get(id).map(|idx| &self.cards[*idx])
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Filter chip labels: `All` followed by categories in first-seen order.
    pub fn category_options(&self) -> Vec<String> {
        facet_options(self.cards.iter().map(|card| Some(card.category.as_str())))
    }

    /// `All` followed by the distinct round stages.
    pub fn stage_options(&self) -> Vec<String> {
        facet_options(self.cards.iter().map(|card| card.round_stage.as_deref()))
    }
}

fn facet_options<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut options = vec![ALL_FACET.to_string()];
    for value in values.flatten() {
        if !value.is_empty() && !options.iter().any(|existing| existing == value) {
            options.push(value.to_string());
        }
    }
    options
}

pub struct CatalogBuilder<'a> {
    config: &'a CatalogConfig,
    descriptions: HashMap<CardId, String>,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(config: &'a CatalogConfig) -> Self {
        Self {
            config,
            descriptions: HashMap::new(),
        }
    }

    /// Hand-written descriptions keyed by source record id. They replace the
    /// generated summary of the matching card.
    pub fn with_descriptions(mut self, descriptions: HashMap<SourceId, String>) -> Self {
        self.descriptions = descriptions
            .into_iter()
            .map(|(id, text)| (CardId::from_source(&id), text))
            .collect();
        self
    }

    pub fn build(&self, records: &[RawFirm]) -> Catalog {
        let cards = records.iter().map(|firm| self.build_card(firm)).collect();
        Catalog::from_cards(cards)
    }

    pub fn build_card(&self, firm: &RawFirm) -> Card {
        let config = self.config;
        let id = CardId::from_source(&firm.id);
        let defaults = config.theme.resolve();
        let theme = ThemePair {
            base: theme_color(&id, "base", &firm.bg_color, defaults.base),
            accent: theme_color(&id, "accent", &firm.accent_color, defaults.accent),
        };

        let website = present(&firm.website).unwrap_or_default().to_string();
        let summary = match self.descriptions.get(&id) {
            Some(text) => trim_words(text, config.word_budget),
            None => build_summary(firm, config.word_budget),
        };

        Card {
            website_label: strip_scheme(&website).to_string(),
            website,
            name: firm.firm_name.trim().to_string(),
            category: present(&firm.category)
                .unwrap_or(config.default_category.as_str())
                .to_string(),
            address: present(&firm.hq_address).unwrap_or_default().to_string(),
            logo: build_image_url(&config.base_path, firm.logo_url.as_deref().unwrap_or_default()),
            palette: CardPalette::derive(&theme, &config.tones),
            fallback_image: fallback_image(
                &firm.firm_name,
                &theme,
                &config.tones,
                &config.placeholder,
            ),
            theme,
            stage: present(&firm.focus_stage)
                .or(present(&firm.round_stage))
                .map(str::to_string),
            round_stage: present(&firm.round_stage).map(str::to_string),
            investment_range: present(&firm.required_capital_usd).map(str::to_string),
            quote: present(&firm.quote_style_line)
                .unwrap_or(config.default_quote.as_str())
                .to_string(),
            notes: present(&firm.notes)
                .unwrap_or(config.default_notes.as_str())
                .to_string(),
            summary,
            source_id: firm.id.clone(),
            id,
        }
    }
}

fn theme_color(id: &CardId, role: &str, value: &Option<String>, default: Color) -> Color {
    if let Some(raw) = present(value) {
        if let Some(color) = hex_to_color(raw) {
            return color;
        }
        debug!(card = %id, role, value = raw, "invalid theme color, using default");
    }
    default
}

/// Absolute http(s) URLs pass through; anything else is joined to `base`.
/// Empty paths mean there is no image.
pub fn build_image_url(base: &str, path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    if has_http_scheme(path) {
        return Some(path.to_string());
    }
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{base}{path}"))
    } else {
        Some(format!("{base}/{path}"))
    }
}

fn has_http_scheme(text: &str) -> bool {
    let lower = text.get(..8).unwrap_or(text).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub fn strip_scheme(url: &str) -> &str {
    if !has_http_scheme(url) {
        return url;
    }
    url.find("://").map_or(url, |idx| &url[idx + 3..])
}

/// Keep at most `limit` words, marking truncation with an ellipsis. Words are
/// never split.
pub fn trim_words(text: &str, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        return text.trim().to_string();
    }
    let mut trimmed = words[..limit].join(" ");
    trimmed.push(ELLIPSIS);
    trimmed
}

pub fn build_summary(firm: &RawFirm, word_budget: usize) -> String {
    let city_line = match present(&firm.city) {
        Some(city) => format!("{city}, {}", present(&firm.state).unwrap_or("NY")),
        None => "New York".to_string(),
    };
    let stage = present(&firm.focus_stage)
        .or(present(&firm.round_stage))
        .unwrap_or("growth rounds");
    let checks = present(&firm.typical_check_size)
        .or(present(&firm.required_capital_usd))
        .unwrap_or("flexible commitments");
    let sector = present(&firm.sector_focus).unwrap_or("multi-sector");
    let notes = present(&firm.notes).unwrap_or_default();
    let quote = present(&firm.quote_style_line).unwrap_or_default();
    let narrative = format!(
        "{} anchors {stage} founders from {city_line}, pairing {checks} capital with {sector} instincts. {notes} {quote}",
        firm.firm_name.trim()
    );
    trim_words(&narrative, word_budget)
}
