use outs_core::OutsSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const SAVE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedOuts {
    pub version: u32,
    pub outs: OutsSet,
}

pub fn default_state_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("OUTS_SAVE") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".outs_state.json"))
}

pub fn save_outs_file(outs: &OutsSet, path: &Path) -> Result<(), String> {
    let payload = SavedOuts {
        version: SAVE_SCHEMA_VERSION,
        outs: outs.clone(),
    };
    let body = serde_json::to_string_pretty(&payload).map_err(|err| err.to_string())?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| err.to_string())?;
    }
    fs::write(path, body).map_err(|err| err.to_string())
}

pub fn load_outs_file(path: &Path) -> Result<OutsSet, String> {
    let body = fs::read_to_string(path).map_err(|err| err.to_string())?;
    let payload: SavedOuts = serde_json::from_str(&body).map_err(|err| err.to_string())?;
    if payload.version != SAVE_SCHEMA_VERSION {
        return Err(format!(
            "unsupported save version {} (expected {})",
            payload.version, SAVE_SCHEMA_VERSION
        ));
    }
    Ok(payload.outs)
}

/// Restores saved outs, or starts empty when nothing was saved yet.
pub fn restore_outs(path: &Path) -> Result<OutsSet, String> {
    if !path.exists() {
        return Ok(OutsSet::new());
    }
    load_outs_file(path)
}
