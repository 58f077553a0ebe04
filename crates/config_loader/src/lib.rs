//! # Config Loader
//!
//! Reads a jobs file (`[rpc]`, `[[pipelines]]`, `[[dispatch]]`), rejects
//! inconsistent ones and turns the dispatch rules into a [`DispatchTable`]
//! that answers default pipeline lookups.
//!
//! # Example
//!
//! ```no_run
//! use config_loader::{ConfigLoader, DispatchTable};
//! use contracts::PipelineLookup;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("jobs.toml")).unwrap();
//! let table = DispatchTable::from_config(&config);
//! println!("{:?}", table.default_pipeline("app-jobs-mail"));
//! ```

mod dispatch;
mod parser;
mod validator;

pub use contracts::JobsConfig;
pub use dispatch::DispatchTable;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;
use tracing::debug;

/// Entry point for reading jobs files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a jobs file, picking the format from its extension.
    ///
    /// # Errors
    /// [`ContractError::Io`] when unreadable, `ConfigParse` for an unknown
    /// extension or bad syntax, `ConfigValidation` for inconsistent rules.
    pub fn load_from_path(path: &Path) -> Result<JobsConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        let config = Self::load_from_str(&content, format)?;
        debug!(
            path = %path.display(),
            pipelines = config.pipelines.len(),
            rules = config.dispatch.len(),
            "jobs config loaded"
        );
        Ok(config)
    }

    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<JobsConfig, ContractError> {
        Self::parse_and_validate(content, format)
    }

    /// Render a config back to TOML, e.g. for `info`
    pub fn to_toml(config: &JobsConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    pub fn to_json(config: &JobsConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<JobsConfig, ContractError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }
}
