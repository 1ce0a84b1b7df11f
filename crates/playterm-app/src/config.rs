use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use playterm_client::ClientConfig;
use playterm_types::Geometry;

use crate::cli::Cli;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "playterm.toml";

/// Contents of `playterm.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub cols: Option<u16>,
    pub rows: Option<u16>,
    pub transcript_dir: Option<PathBuf>,
    pub user_agent: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

/// Effective settings after merging file values with flags
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub transcript_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve from CLI flags, env and the optional config file
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    FileConfig::load(default_path)?
                } else {
                    FileConfig::default()
                }
            }
        };

        Ok(Self::merge(file, cli.base_url.clone(), cli.transcript_dir.clone()))
    }

    /// Flags win over file values; file values win over built-in defaults
    pub fn merge(
        file: FileConfig,
        base_url: Option<String>,
        transcript_dir: Option<PathBuf>,
    ) -> Self {
        let mut client = match base_url.or(file.base_url) {
            Some(url) => ClientConfig::new(url),
            None => ClientConfig::default(),
        };

        let defaults = Geometry::default();
        client.default_geometry = Geometry::new(
            file.cols.unwrap_or(defaults.cols),
            file.rows.unwrap_or(defaults.rows),
        );
        client.user_agent = file.user_agent;

        Self {
            client,
            transcript_dir: transcript_dir.or(file.transcript_dir),
        }
    }
}
