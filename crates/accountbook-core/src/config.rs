//! Store configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::account::DEFAULT_SLOT;
use crate::{Error, Result};

/// Directory name used under the platform data directory.
const APP_DIR: &str = "accountbook";

/// Where and under which slot the account list is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the storage files.
    pub data_dir: PathBuf,
    /// Slot name of the account list.
    pub slot: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR),
            slot: DEFAULT_SLOT.to_string(),
        }
    }
}

impl StoreConfig {
    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Sets the slot name.
    #[must_use]
    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    /// Load configuration from a JSON file.
    ///
    /// A missing file yields the default configuration; missing keys take
    /// their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or names an
    /// empty slot.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        if config.slot.trim().is_empty() {
            return Err(Error::Config(format!(
                "empty slot name in {}",
                path.display()
            )));
        }

        info!("Loaded store configuration from {:?}", path);
        Ok(config)
    }
}
