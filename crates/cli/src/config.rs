//! Configuration for the `outs` front end.
//!
//! TOML file, optional. Lookup order:
//! 1. `--config` on the command line
//! 2. `$OUTS_CONFIG`
//! 3. `$HOME/.config/outs/config.toml`

use clap::ValueEnum;
use outs_core::{
    DeckEntry, DeckError, DeckRegistry, DeliveryRoute, PlatformCapabilities, DECK_SIZE,
    INITIAL_DRAW_SIZE,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),

    #[error(transparent)]
    Deck(#[from] DeckError),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub locale: Option<String>,
    pub deck: DeckConfig,
    pub draw: DrawConfig,
    pub compose: ComposeConfig,
    pub clipboard: ClipboardConfig,
    pub persistence: PersistenceConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct DeckConfig {
    /// Directory card images are read from.
    pub dir: PathBuf,
    /// Extension for the numbered layout `1.png` .. `36.png`.
    pub extension: String,
    /// Explicit image list, in deck order. Overrides the numbered layout.
    pub entries: Vec<String>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("cards"),
            extension: "png".to_string(),
            entries: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct DrawConfig {
    pub initial_size: usize,
    pub seed: Option<u64>,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            initial_size: INITIAL_DRAW_SIZE,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ComposeConfig {
    /// Image loads allowed in flight at once; 1 loads strictly one by one.
    pub load_concurrency: usize,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            load_concurrency: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlatformSetting {
    /// Probe the system clipboard at startup.
    #[default]
    Auto,
    /// Copy straight to the clipboard.
    Unattended,
    /// Show a preview and copy after confirmation.
    Gesture,
    /// Show a preview only; copy it by hand.
    Manual,
}

impl PlatformSetting {
    /// Fixed capabilities for forced settings; `None` means probe.
    pub fn capabilities(self) -> Option<PlatformCapabilities> {
        match self {
            Self::Auto => None,
            Self::Unattended => Some(DeliveryRoute::Unattended.capabilities()),
            Self::Gesture => Some(DeliveryRoute::GestureConfirm.capabilities()),
            Self::Manual => Some(DeliveryRoute::ManualSave.capabilities()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ClipboardConfig {
    pub platform: PlatformSetting,
    /// Where preview images are written. Defaults to the system temp dir.
    pub preview_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct PersistenceConfig {
    /// Keep drawn cards across runs. Off unless asked for.
    pub enabled: bool,
    pub path: Option<PathBuf>,
}

impl AppConfig {
    /// Missing files yield the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        log::info!("loading config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("OUTS_CONFIG") {
            return PathBuf::from(path);
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config/outs/config.toml")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=DECK_SIZE).contains(&self.draw.initial_size) {
            return Err(ConfigError::Validation(format!(
                "draw.initial_size must be between 1 and {DECK_SIZE}, got {}",
                self.draw.initial_size
            )));
        }
        if !(1..=DECK_SIZE).contains(&self.compose.load_concurrency) {
            return Err(ConfigError::Validation(format!(
                "compose.load_concurrency must be between 1 and {DECK_SIZE}, got {}",
                self.compose.load_concurrency
            )));
        }
        if self.deck.entries.is_empty() && self.deck.extension.trim().is_empty() {
            return Err(ConfigError::Validation(
                "deck.extension must not be empty".to_string(),
            ));
        }
        if !self.deck.entries.is_empty() && self.deck.entries.len() != DECK_SIZE {
            return Err(ConfigError::Validation(format!(
                "deck.entries must list exactly {DECK_SIZE} images, got {}",
                self.deck.entries.len()
            )));
        }
        Ok(())
    }

    /// Deck references are relative to `deck.dir`; the loader resolves them.
    pub fn deck_registry(&self) -> Result<DeckRegistry, ConfigError> {
        if self.deck.entries.is_empty() {
            return Ok(DeckRegistry::numbered("", &self.deck.extension));
        }
        let entries = self.deck.entries.iter().map(DeckEntry::new).collect();
        Ok(DeckRegistry::from_entries(entries)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::parse("").expect("parse");
        assert_eq!(config.draw.initial_size, 6);
        assert_eq!(config.compose.load_concurrency, 1);
        assert_eq!(config.clipboard.platform, PlatformSetting::Auto);
        assert!(!config.persistence.enabled);
        assert_eq!(config.deck.dir, PathBuf::from("cards"));
    }

    #[test]
    fn full_file_parses() {
        let config = AppConfig::parse(
            r#"
locale = "ru"

[deck]
dir = "/srv/deck"
extension = "jpg"

[draw]
initial_size = 4
seed = 99

[compose]
load_concurrency = 3

[clipboard]
platform = "gesture"

[persistence]
enabled = true
path = "/tmp/outs.json"
"#,
        )
        .expect("parse");
        assert_eq!(config.locale.as_deref(), Some("ru"));
        assert_eq!(config.draw.seed, Some(99));
        assert_eq!(config.clipboard.platform, PlatformSetting::Gesture);
        assert_eq!(
            config.clipboard.platform.capabilities(),
            Some(PlatformCapabilities::GESTURE)
        );
        let deck = config.deck_registry().expect("deck");
        let first = outs_core::CardIndex::new(1).expect("index");
        assert_eq!(deck.entry(first).as_str(), "1.jpg");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            AppConfig::parse("[draw]\nsize = 3\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        assert!(matches!(
            AppConfig::parse("[draw]\ninitial_size = 0\n"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            AppConfig::parse("[compose]\nload_concurrency = 100\n"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            AppConfig::parse("[deck]\nentries = [\"a.png\", \"b.png\"]\n"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn missing_file_is_default() {
        let path = std::env::temp_dir().join("outs_config_test_missing_dir/none.toml");
        let config = AppConfig::load_from(&path).expect("load");
        assert_eq!(config.draw.initial_size, 6);
    }
}
