//! RON configuration.
//!
//! ```ron
//! (
//!     namespaces: [
//!         (name: "scratch"),
//!         (name: "fixtures", read_only: true),
//!     ],
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Per-instance options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsConfig {
    /// Start the instance read-only.
    pub read_only: bool,
}

impl FsConfig {
    pub fn read_only() -> Self {
        Self { read_only: true }
    }
}

/// A namespace to register at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceConfig {
    pub name: String,
    #[serde(default)]
    pub read_only: bool,
}

impl NamespaceConfig {
    pub fn options(&self) -> FsConfig {
        FsConfig {
            read_only: self.read_only,
        }
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub namespaces: Vec<NamespaceConfig>,
}

impl RegistryConfig {
    /// Parse a RON document.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Read and parse a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_ron(&text)
    }
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}
