use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use tarotboard_core::{
    BoardConfig, BoardMode, CatalogConfig, PlaceholderConfig, RawFirm, SlotSpec, SourceId,
    ThemeDefaults, ToneRecipe, ToneRecipes,
};

/// `descriptions.json`: hand-written card text keyed by source record id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DescriptionFile(pub HashMap<String, String>);

impl DescriptionFile {
    /// Keys that look numeric are matched against numeric record ids.
    pub fn into_source_map(self) -> HashMap<SourceId, String> {
        self.0
            .into_iter()
            .map(|(key, text)| {
                let id = match key.trim().parse::<u64>() {
                    Ok(value) => SourceId::Number(value),
                    Err(_) => SourceId::Text(key),
                };
                (id, text)
            })
            .collect()
    }
}
