//! Configuration management for searchdex

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::index::writer;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub build: BuildConfig,
    pub search: SearchConfig,
    pub validate: ValidateConfig,
    #[serde(skip)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Variable name the generated files assign to.
    pub var_name: String,
    /// Prefix for page references; index files usually live in `search/`
    /// one level below the pages.
    pub page_prefix: String,
    /// Emit one `all_<hex>.js` per first character instead of a single file.
    pub split: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default match mode: prefix, substring or fuzzy.
    pub mode: String,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateConfig {
    /// Require anchors on every target and globally unique tokens.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            build: BuildConfig {
                var_name: writer::DEFAULT_VAR_NAME.to_string(),
                page_prefix: writer::DEFAULT_PAGE_PREFIX.to_string(),
                split: false,
            },
            search: SearchConfig {
                mode: "prefix".to_string(),
                limit: 10,
            },
            validate: ValidateConfig { strict: false },
            verbose: false,
        }
    }
}

/// Get the configuration file path
fn config_path() -> Result<PathBuf> {
    let config_dir = directories::ProjectDirs::from("io", "searchdex", "searchdex")
        .context("Failed to determine config directory")?
        .config_dir()
        .to_path_buf();

    Ok(config_dir.join("config.toml"))
}

/// Load configuration from file or use defaults
pub fn load_config(custom_path: Option<&str>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        PathBuf::from(p)
    } else {
        config_path()?
    };

    if path.exists() {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))?;
        Ok(config)
    } else {
        Ok(Config::default())
    }
}

/// Initialize configuration file with defaults
pub fn init_config() -> Result<()> {
    let path = config_path()?;

    if path.exists() {
        println!("Configuration file already exists at {:?}", path);
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {:?}", parent))?;
    }

    let default_config = Config::default();
    let content = toml::to_string_pretty(&default_config)
        .context("Failed to serialize default config")?;

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write config to {:?}", path))?;

    println!("Configuration initialized at {:?}", path);
    Ok(())
}

/// Show current configuration
pub fn show_config(config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .context("Failed to serialize config")?;
    println!("{}", content);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.build.var_name, "searchData");
        assert_eq!(parsed.build.page_prefix, "../");
        assert_eq!(parsed.search.mode, "prefix");
        assert_eq!(parsed.search.limit, 10);
        assert!(!parsed.validate.strict);
    }

    #[test]
    fn test_load_custom_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[build]\nvar_name = \"searchData\"\npage_prefix = \"\"\nsplit = true\n\n[search]\nmode = \"fuzzy\"\nlimit = 25\n\n[validate]\nstrict = true\n",
        )
        .unwrap();

        let config = load_config(Some(path.to_str().unwrap())).unwrap();
        assert!(config.build.split);
        assert_eq!(config.search.limit, 25);
        assert!(config.validate.strict);
    }
}
