use crate::schema::DescriptionFile;
use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tarotboard_core::{
    board_preset, BoardConfig, BoardMode, Catalog, CatalogBuilder, PlacementStore, RawFirm,
    SourceId,
};
use tracing::{debug, info, warn};

pub const FIRMS_FILE: &str = "firms.json";
pub const BOARD_CONFIG_FILE: &str = "board.json";
pub const DESCRIPTIONS_FILE: &str = "descriptions.json";
pub const ASSETS_ENV: &str = "TAROTBOARD_ASSETS";
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Explicit path first, then `TAROTBOARD_ASSETS`, then `./assets`.
pub fn resolve_assets_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(path) = std::env::var_os(ASSETS_ENV) {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_ASSETS_DIR)
}

pub fn load_firms(path: &Path) -> anyhow::Result<Vec<RawFirm>> {
    let firms: Vec<RawFirm> = load_json(path)?;
    Ok(firms)
}

/// `board.json` is optional; a missing file means every default.
pub fn load_board_config(dir: &Path) -> anyhow::Result<BoardConfig> {
    let path = dir.join(BOARD_CONFIG_FILE);
    if !path.exists() {
        debug!(path = %path.display(), "no board config, using defaults");
        return Ok(BoardConfig::default());
    }
    let config: BoardConfig = load_json(&path)?;
    if let BoardMode::Slotted { slots } = &config.mode {
        // Surface layout mistakes while loading rather than when the board mounts.
        PlacementStore::new(&config.mode, std::iter::empty())
            .with_context(|| format!("validate slots in {}", path.display()))?;
        debug!(slots = slots.len(), "slotted board layout");
    }
    Ok(config)
}

pub fn load_descriptions(dir: &Path) -> anyhow::Result<HashMap<SourceId, String>> {
    let path = dir.join(DESCRIPTIONS_FILE);
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let file: DescriptionFile = load_json(&path)?;
    Ok(file.into_source_map())
}

#[derive(Debug)]
pub struct LoadedBoard {
    pub config: BoardConfig,
    pub catalog: Catalog,
    pub warnings: Vec<String>,
}

/// Read everything a board needs from `dir`. `preset` names a built-in slot
/// layout that overrides the mode in `board.json`.
pub fn load_board(dir: &Path, preset: Option<&str>) -> anyhow::Result<LoadedBoard> {
    let mut config = load_board_config(dir)?;
    if let Some(name) = preset {
        let Some(mode) = board_preset(name) else {
            bail!("unknown board preset {name}");
        };
        config.mode = mode;
    }
    let firms_path = dir.join(FIRMS_FILE);
    let firms = load_firms(&firms_path)?;
    let warnings = check_firms(&firms);
    for warning in &warnings {
        warn!("{}: {warning}", firms_path.display());
    }
    let descriptions = load_descriptions(dir)?;
    let catalog = CatalogBuilder::new(&config.catalog)
        .with_descriptions(descriptions)
        .build(&firms);
    info!(
        cards = catalog.len(),
        mode = if config.mode.is_slotted() { "slotted" } else { "free" },
        "catalog loaded"
    );
    Ok(LoadedBoard {
        config,
        catalog,
        warnings,
    })
}

/// Problems the catalog tolerates but the dataset should not have.
pub fn check_firms(firms: &[RawFirm]) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();
    for firm in firms {
        if !seen.insert(&firm.id) {
            warnings.push(format!("duplicate firm id {}", firm.id));
        }
        if firm.firm_name.trim().is_empty() {
            warnings.push(format!("firm {} has no name", firm.id));
        }
        for (field, value) in [("bg_color", &firm.bg_color), ("accent_color", &firm.accent_color)] {
            if let Some(raw) = tarotboard_core::present(value) {
                if tarotboard_core::hex_to_color(raw).is_none() {
                    warnings.push(format!("firm {} has invalid {field} {raw:?}", firm.id));
                }
            }
        }
    }
    warnings
}

fn load_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
