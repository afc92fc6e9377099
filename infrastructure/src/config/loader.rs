//! Configuration loader with multi-source merging

use super::file_config::{ConfigValidationError, FileConfig, ResolvedConfig};
use crate::backend::BackendSettings;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "legal-mad";
const PROJECT_FILES: [&str; 2] = ["legal-mad.toml", ".legal-mad.toml"];
const ENV_PREFIX: &str = "LEGAL_MAD_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid configuration:\n{}", format_issues(.0))]
    Invalid(Vec<ConfigValidationError>),

    #[error("API key not found: set the {env} environment variable")]
    MissingApiKey { env: String },
}

fn format_issues(issues: &[ConfigValidationError]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {}", issue))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. `LEGAL_MAD_*` environment variables (`__` separates sections,
    ///    e.g. `LEGAL_MAD_DEBATE__MODE=irac`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./legal-mad.toml` or `./.legal-mad.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/legal-mad/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        let mut files = Vec::new();
        if let Some(global) = Self::global_config_path()
            && global.exists()
        {
            files.push(global);
        }
        if let Some(project) = Self::project_config_path() {
            files.push(project);
        }
        if let Some(path) = config_path {
            files.push(path.to_path_buf());
        }

        Self::layered(&files)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Defaults overlaid with `files`, later files winning
    fn layered(files: &[PathBuf]) -> Figment {
        files.iter().fold(
            Figment::new().merge(Serialized::defaults(FileConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Validate a loaded configuration and convert it for the layers.
    pub fn resolve(config: &FileConfig) -> Result<ResolvedConfig, ConfigError> {
        config.resolve().map_err(ConfigError::Invalid)
    }

    /// Read the API key from the environment variable the settings name.
    pub fn api_key(settings: &BackendSettings) -> Result<String, ConfigError> {
        std::env::var(&settings.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey {
                env: settings.api_key_env.clone(),
            })
    }

    /// `$XDG_CONFIG_HOME/legal-mad/config.toml` (or the platform equivalent)
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// The first project-level config file that exists
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [ env ] {}* variables", ENV_PREFIX);

        match Self::project_config_path() {
            Some(path) => println!("  [FOUND] Project: {}", path.display()),
            None => println!("  [     ] Project: ./legal-mad.toml or ./.legal-mad.toml"),
        }

        if let Some(path) = Self::global_config_path() {
            let marker = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", marker, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}
