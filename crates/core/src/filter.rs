use crate::catalog::ALL_FACET;
use crate::{Card, CardId, Catalog, PlacementStore};
use serde::{Deserialize, Serialize};

/// One filter dimension: everything, or a single chosen value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Facet {
    #[default]
    All,
    Only(String),
}

impl Facet {
    /// Blank input, `All` and the `All Firms`/`All Stages` chip labels (any
    /// case) mean no restriction. Other names starting with "All" are values.
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        let lower = label.to_ascii_lowercase();
        if label.is_empty() || matches!(lower.as_str(), "all" | "all firms" | "all stages") {
            Self::All
        } else {
            Self::Only(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_FACET,
            Self::Only(value) => value,
        }
    }

    /// The option after this one in `options`, wrapping around. Options are
    /// compared by label.
    pub fn cycle(&self, options: &[String], forward: bool) -> Self {
        if options.is_empty() {
            return Self::All;
        }
        let current = options
            .iter()
            .position(|option| option.trim() == self.label())
            .unwrap_or(0);
        let len = options.len();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        Self::parse(&options[next])
    }
}

impl From<String> for Facet {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Facet> for String {
    fn from(value: Facet) -> Self {
        value.label().to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterSelection {
    pub category: Facet,
    pub stage: Facet,
}

impl FilterSelection {
    pub fn new(category: &str, stage: &str) -> Self {
        Self {
            category: Facet::parse(category),
            stage: Facet::parse(stage),
        }
    }

    /// Category must match exactly; stage matches by case-insensitive
    /// containment so `Seed` also picks up `Pre-Seed`.
    pub fn matches(&self, card: &Card) -> bool {
        let category_ok = match &self.category {
            Facet::All => true,
            Facet::Only(category) => card.category == *category,
        };
        let stage_ok = match &self.stage {
            Facet::All => true,
            Facet::Only(stage) => card
                .stage
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&stage.to_lowercase()),
        };
        category_ok && stage_ok
    }
}

/// Cards passing the filter, in catalog order.
pub fn visible<'a>(catalog: &'a Catalog, selection: &FilterSelection) -> Vec<&'a Card> {
    catalog
        .cards()
        .iter()
        .filter(|card| selection.matches(card))
        .collect()
}

/// Cards passing the filter, in the order given by `ids` (a free board's
/// current sequence). Unknown ids are skipped.
pub fn visible_in<'a>(
    catalog: &'a Catalog,
    ids: &[CardId],
    selection: &FilterSelection,
) -> Vec<&'a Card> {
    ids.iter()
        .filter_map(|id| catalog.get(id))
        .filter(|card| selection.matches(card))
        .collect()
}

/// Visible cards not held by any slot.
pub fn available_pool<'a>(
    catalog: &'a Catalog,
    selection: &FilterSelection,
    store: &PlacementStore,
) -> Vec<&'a Card> {
    let assigned = store.assigned_ids();
    visible(catalog, selection)
        .into_iter()
        .filter(|card| !assigned.contains(&card.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoardMode, CatalogBuilder, CatalogConfig, RawFirm, SlotId, SlotSpec};

    fn catalog() -> Catalog {
        let rows = [
            (1, "Alpha", "VC", "Seed"),
            (2, "Beta", "Angel", "Pre-Seed"),
            (3, "Gamma", "VC", "Series A"),
            (4, "Delta", "Growth", "Series B"),
            (5, "Epsilon", "CVC", "Seed"),
        ];
        let records: Vec<RawFirm> = rows
            .iter()
            .map(|(id, name, category, stage)| {
                let mut firm = RawFirm::new(*id, name);
                firm.category = Some(category.to_string());
                firm.round_stage = Some(stage.to_string());
                firm
            })
            .collect();
        CatalogBuilder::new(&CatalogConfig::default()).build(&records)
    }

    fn names(cards: &[&Card]) -> Vec<String> {
        cards.iter().map(|card| card.name.clone()).collect()
    }

    #[test]
    fn category_filter_keeps_relative_order() {
        let catalog = catalog();
        let shown = visible(&catalog, &FilterSelection::new("VC", "All"));
        assert_eq!(names(&shown), vec!["Alpha", "Gamma"]);
    }

    #[test]
    fn stage_filter_is_case_insensitive_containment() {
        let catalog = catalog();
        let shown = visible(&catalog, &FilterSelection::new("All", "seed"));
        assert_eq!(names(&shown), vec!["Alpha", "Beta", "Epsilon"]);
        let both = visible(&catalog, &FilterSelection::new("VC", "Seed"));
        assert_eq!(names(&both), vec!["Alpha"]);
    }

    #[test]
    fn chip_labels_parse_as_all() {
        assert_eq!(Facet::parse("All Firms"), Facet::All);
        assert_eq!(Facet::parse("all stages"), Facet::All);
        assert_eq!(Facet::parse(""), Facet::All);
        assert_eq!(Facet::parse("Allied"), Facet::Only("Allied".to_string()));
        assert_eq!(
            Facet::parse("All Seasons Capital"),
            Facet::Only("All Seasons Capital".to_string())
        );
    }

    fn catalog_with_all_prefixed_category() -> Catalog {
        let records: Vec<RawFirm> = [(1, "Alpha", "All Seasons Capital"), (2, "Beta", "VC")]
            .iter()
            .map(|(id, name, category)| {
                let mut firm = RawFirm::new(*id, name);
                firm.category = Some(category.to_string());
                firm
            })
            .collect();
        CatalogBuilder::new(&CatalogConfig::default()).build(&records)
    }

    #[test]
    fn category_starting_with_all_is_a_real_value() {
        let catalog = catalog_with_all_prefixed_category();
        let selection = FilterSelection::new("All Seasons Capital", "All");
        assert_eq!(
            selection.category,
            Facet::Only("All Seasons Capital".to_string())
        );
        assert_eq!(names(&visible(&catalog, &selection)), vec!["Alpha"]);
    }

    #[test]
    fn cycling_passes_through_all_prefixed_option() {
        let options = catalog_with_all_prefixed_category().category_options();
        assert_eq!(options, vec!["All", "All Seasons Capital", "VC"]);
        let first = Facet::All.cycle(&options, true);
        assert_eq!(first, Facet::Only("All Seasons Capital".to_string()));
        let second = first.cycle(&options, true);
        assert_eq!(second, Facet::Only("VC".to_string()));
        assert_eq!(second.cycle(&options, true), Facet::All);
        assert_eq!(Facet::All.cycle(&options, false), Facet::Only("VC".to_string()));
    }

    #[test]
    fn facet_cycles_through_options() {
        let options = catalog().category_options();
        let next = Facet::All.cycle(&options, true);
        assert_eq!(next, Facet::Only("VC".to_string()));
        assert_eq!(Facet::All.cycle(&options, false), Facet::Only("CVC".to_string()));
    }

    #[test]
    fn available_pool_excludes_assigned_cards() {
        let catalog = catalog();
        let mode = BoardMode::Slotted {
            slots: vec![SlotSpec::new("top", "Top", 2)],
        };
        let mut store = PlacementStore::new(&mode, catalog.ids().cloned()).expect("layout");
        store
            .assign_to_slot(&CardId::from("firm-1"), &SlotId::from("top"))
            .expect("assign");
        let pool = available_pool(&catalog, &FilterSelection::new("VC", "All"), &store);
        assert_eq!(names(&pool), vec!["Gamma"]);
    }

    #[test]
    fn facet_serializes_as_label() {
        let selection = FilterSelection::new("VC", "All");
        let json = serde_json::to_string(&selection).expect("serialize");
        assert_eq!(json, r#"{"category":"VC","stage":"All"}"#);
        let back: FilterSelection = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, selection);
    }
}
