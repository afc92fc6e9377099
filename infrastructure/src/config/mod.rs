//! Configuration file loading for legal-mad
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources. The priority order (highest to lowest):
//!
//! 1. `LEGAL_MAD_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./legal-mad.toml` or `./.legal-mad.toml`
//! 4. Global: `$XDG_CONFIG_HOME/legal-mad/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBackendConfig, FileBaselineConfig, FileBatchConfig, FileConfig,
    FileDebateConfig, FileGatewayConfig, FileSelfConsistencyConfig, ResolvedConfig,
};
pub use loader::{ConfigError, ConfigLoader};
