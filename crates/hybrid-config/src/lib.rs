use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read editor config {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid editor config {}: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
}

/// Behaviour flags for a hybrid editor region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Reparse the token list after every token edit
    pub auto_reparse: bool,
    /// Reprint tokens whenever the value is replaced or a watched sub-value changes
    pub auto_reprint: bool,
    /// Menu completion offers only additional items, never plain tokens
    pub hide_tokens_in_menu: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            auto_reparse: true,
            auto_reprint: true,
            hide_tokens_in_menu: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub editor: EditorSettings,
}

impl Config {
    /// Read the config at `path`. A missing file is `Ok(None)`.
    pub fn read(path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn read_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::read(path)?.unwrap_or_default())
    }

    /// The user's config, or the defaults when they have none.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Self::read_or_default(Self::path())
    }

    pub fn write(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.write(Self::path())
    }

    /// `~/.config/hybrid-editor/config.toml`, with `~` expanded.
    pub fn path() -> PathBuf {
        PathBuf::from(shellexpand::tilde("~/.config/hybrid-editor/config.toml").as_ref())
    }
}
