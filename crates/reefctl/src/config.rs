//! TOML configuration for `reefctl`.
//!
//! Every section is optional; missing values fall back to the ring's
//! defaults (271 partitions, 20 vnodes per member, load factor 1.25).

use std::path::Path;

use anyhow::{Context, bail};
use reef_placement::RingConfig;
use serde::Deserialize;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Ring parameters.
    pub ring: RingConfig,
    /// Hash function selection.
    pub hasher: HasherSection,
    /// Initial members.
    pub members: MembersSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[hasher]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HasherSection {
    /// `"blake3"` (default) or `"xxh3"`.
    pub kind: String,
}

impl Default for HasherSection {
    fn default() -> Self {
        Self {
            kind: "blake3".to_string(),
        }
    }
}

/// Hash functions selectable from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HasherKind {
    Blake3,
    Xxh3,
}

/// `[members]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MembersSection {
    /// Member ids placed on the ring at startup.
    pub ids: Vec<String>,
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, or use defaults if no path given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)
                    .with_context(|| format!("failed to read {}", p.display()))?;
                Self::from_toml(&content)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a TOML string.
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        let config: CliConfig = toml::from_str(s)?;
        config.ring.validate()?;
        config.hasher_kind()?;
        Ok(config)
    }

    /// The configured hash function.
    pub fn hasher_kind(&self) -> anyhow::Result<HasherKind> {
        match self.hasher.kind.to_ascii_lowercase().as_str() {
            "blake3" => Ok(HasherKind::Blake3),
            "xxh3" => Ok(HasherKind::Xxh3),
            other => bail!("unknown hasher kind {other:?} (expected \"blake3\" or \"xxh3\")"),
        }
    }
}
