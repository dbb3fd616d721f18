use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, IoResultExt, Result};

/// repository configuration stored in .vcs/config.toml
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// glob patterns skipped by `stage_all`, matched against repo-relative paths
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
    /// fsync objects, index and head after writing
    #[serde(default = "default_fsync")]
    pub fsync: bool,
}

fn default_fsync() -> bool {
    true
}

impl Config {
    /// load config from file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).with_path(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_path(path)?;
        Ok(())
    }

    /// compile the ignore patterns
    pub fn ignore_patterns(&self) -> Result<Vec<glob::Pattern>> {
        self.ignore
            .iter()
            .map(|p| {
                glob::Pattern::new(p).map_err(|e| Error::InvalidIgnorePattern(format!("{}: {}", p, e)))
            })
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore: vec![],
            fsync: true,
        }
    }
}
