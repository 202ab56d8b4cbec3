#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for nutforge
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/nutforge/config.toml)
//! - Environment variables
//! - CLI flags
//!
//! Every path the pipeline touches (cellar root, work directory, dependency
//! search roots, user config root) lives here and is injected into the
//! components, so tests can point the whole installer at temporary
//! directories.

use nutforge_errors::{ConfigError, Error};
use nutforge_types::{ColorChoice, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub paths: PathConfig,

    #[serde(default)]
    pub network: NetworkConfig,
}

/// General application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: OutputFormat::Tty,
            color: ColorChoice::Auto,
        }
    }
}

/// Path configuration
///
/// Unset values fall back to the accessor defaults on [`Config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    /// Root under which versioned install prefixes are created
    pub cellar: Option<PathBuf>,
    /// Scratch directory for downloads and source trees
    pub work_dir: Option<PathBuf>,
    /// Override for the per-user configuration root (testing hook)
    pub user_root: Option<PathBuf>,
    /// Roots searched for native dependencies (`<root>/<name>/{include,lib}`)
    #[serde(default = "default_search_roots")]
    pub search_roots: Vec<PathBuf>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            cellar: None,
            work_dir: None,
            user_root: None,
            search_roots: default_search_roots(),
        }
    }
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
        }
    }
}

impl Config {
    /// Default configuration file path
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".config").join("nutforge").join("config.toml"))
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ReadFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        let config: Self = toml::from_str(&text).map_err(|e| ConfigError::ParseFailed {
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load from the given path, or from the default path, or fall back to
    /// defaults when no file exists
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file fails to read or parse.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        let candidate = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if fs::try_exists(&candidate).await.unwrap_or(false) {
            Self::load(&candidate).await
        } else if path.is_some() {
            // An explicitly requested file must exist
            Err(ConfigError::ReadFailed {
                path: candidate.display().to_string(),
                message: "file not found".to_string(),
            }
            .into())
        } else {
            Ok(Self::default())
        }
    }

    /// Merge environment variable overrides into this configuration
    ///
    /// # Errors
    ///
    /// Returns an error if an override value fails to parse.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(value) = std::env::var("NUTFORGE_CELLAR") {
            self.paths.cellar = Some(PathBuf::from(value));
        }
        if let Ok(value) = std::env::var("NUTFORGE_WORK_DIR") {
            self.paths.work_dir = Some(PathBuf::from(value));
        }
        if let Ok(value) = std::env::var("NUTFORGE_USER_ROOT") {
            self.paths.user_root = Some(PathBuf::from(value));
        }
        if let Ok(value) = std::env::var("NUTFORGE_SEARCH_ROOTS") {
            self.paths.search_roots = std::env::split_paths(&value).collect();
        }
        if let Ok(value) = std::env::var("NUTFORGE_TIMEOUT") {
            self.network.timeout =
                value
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        field: "NUTFORGE_TIMEOUT".to_string(),
                        message: format!("expected seconds, got {value:?}"),
                    })?;
        }
        Ok(())
    }

    /// Cellar root under which versioned prefixes live
    #[must_use]
    pub fn cellar_path(&self) -> PathBuf {
        self.paths
            .cellar
            .clone()
            .unwrap_or_else(|| PathBuf::from("/opt/nutforge/cellar"))
    }

    /// Scratch directory for downloads and source trees
    #[must_use]
    pub fn work_path(&self) -> PathBuf {
        self.paths
            .work_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("nutforge"))
    }

    /// Versioned install prefix for one package
    #[must_use]
    pub fn prefix_path(&self, name: &str, version: &str) -> PathBuf {
        self.cellar_path().join(name).join(version)
    }

    /// Per-user configuration root (`~/.{app}` unless overridden)
    ///
    /// # Errors
    ///
    /// Returns an error if no override is set and the home directory cannot
    /// be determined.
    pub fn user_config_root(&self, app: &str) -> Result<PathBuf, Error> {
        if let Some(root) = &self.paths.user_root {
            return Ok(root.clone());
        }
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(format!(".{app}")))
    }

    /// Dependency search roots
    #[must_use]
    pub fn search_roots(&self) -> &[PathBuf] {
        &self.paths.search_roots
    }
}

// Default value functions for serde
fn default_output_format() -> OutputFormat {
    OutputFormat::Tty
}

fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_search_roots() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/opt/homebrew/opt"),
        PathBuf::from("/usr/local/opt"),
        PathBuf::from("/usr"),
    ]
}

fn default_timeout() -> u64 {
    300 // 5 minutes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.network.timeout, 300);
        assert_eq!(config.paths.search_roots.len(), 3);
        assert_eq!(config.general.color, ColorChoice::Auto);
    }

    #[test]
    fn test_prefix_path() {
        let mut config: Config = toml::from_str("").unwrap();
        config.paths.cellar = Some(PathBuf::from("/tmp/cellar"));
        assert_eq!(
            config.prefix_path("nutshell", "0.0.4"),
            PathBuf::from("/tmp/cellar/nutshell/0.0.4")
        );
    }

    #[test]
    fn test_user_root_override() {
        let mut config: Config = toml::from_str("").unwrap();
        config.paths.user_root = Some(PathBuf::from("/tmp/home/.nutshell"));
        let root = config.user_config_root("nutshell").unwrap();
        assert_eq!(root, PathBuf::from("/tmp/home/.nutshell"));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[paths]\ncellar = \"/tmp/cellar\"\n\n[network]\ntimeout = 10"
        )
        .unwrap();

        let config = Config::load(file.path()).await.unwrap();
        assert_eq!(config.paths.cellar, Some(PathBuf::from("/tmp/cellar")));
        assert_eq!(config.network.timeout, 10);
    }

    #[tokio::test]
    async fn test_explicit_missing_file_is_an_error() {
        let err = Config::load_or_default(Some(Path::new("/nonexistent/config.toml")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::ReadFailed { .. })
        ));
    }
}
