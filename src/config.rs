//! Configuration for liquor
//!
//! Settings come from, in increasing precedence: built-in defaults, a TOML
//! file, `LIQUOR_*` environment variables and finally command-line flags
//! applied by the caller.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use liquor_runtime::{RenderContext, SyntaxCompatibility};
use liquor_shared::{NamingConvention, Object, Value};

/// Environment variable overriding the naming convention
pub const ENV_NAMING_CONVENTION: &str = "LIQUOR_NAMING_CONVENTION";
/// Environment variable overriding the syntax-compatibility level
pub const ENV_SYNTAX_COMPATIBILITY: &str = "LIQUOR_SYNTAX_COMPATIBILITY";

const CONFIG_NAMES: [&str; 2] = ["liquor.toml", ".liquor.toml"];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`Config`]
    #[error("Invalid TOML config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The file could not be written
    #[error("Failed to write config file {path}: {source}")]
    Write {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// An environment variable holds an unusable value
    #[error("Invalid value for {variable}: {message}")]
    Env {
        /// Variable name
        variable: &'static str,
        /// Parse diagnostic
        message: String,
    },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Runtime settings for rendering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Naming convention used for operator, filter and member lookups
    pub naming_convention: NamingConvention,
    /// Template language version to emulate
    pub syntax_compatibility: SyntaxCompatibility,
    /// Variables seeded into the global scope of every render
    pub variables: serde_json::Map<String, serde_json::Value>,
}

impl Config {
    /// Configuration with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration file on top of the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Defaults, then the first config file found in the standard locations,
    /// then the environment
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file(None) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Look for `liquor.toml` or `.liquor.toml` in `dir` (default: the current
    /// directory), then in `$HOME/.config/liquor` and `$HOME`
    pub fn find_config_file(dir: Option<&Path>) -> Option<PathBuf> {
        let dir = dir
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        let mut candidates: Vec<PathBuf> = CONFIG_NAMES.iter().map(|name| dir.join(name)).collect();
        if let Ok(home) = std::env::var("HOME") {
            let home = Path::new(&home);
            for name in CONFIG_NAMES {
                candidates.push(home.join(".config").join("liquor").join(name));
                candidates.push(home.join(name));
            }
        }
        candidates.into_iter().find(|path| path.exists())
    }

    /// Apply `LIQUOR_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with_reader(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `env_reader`
    pub fn apply_env_with_reader<F>(&mut self, env_reader: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = env_reader(ENV_NAMING_CONVENTION) {
            self.naming_convention = val.parse().map_err(|message| ConfigError::Env {
                variable: ENV_NAMING_CONVENTION,
                message,
            })?;
        }
        if let Some(val) = env_reader(ENV_SYNTAX_COMPATIBILITY) {
            self.syntax_compatibility = val.parse().map_err(|message| ConfigError::Env {
                variable: ENV_SYNTAX_COMPATIBILITY,
                message,
            })?;
        }
        Ok(())
    }

    /// Install the naming convention as the process default.
    ///
    /// Must not run while other threads are rendering.
    pub fn apply_global(&self) {
        NamingConvention::set_global(self.naming_convention);
    }

    /// Configured variables as template values
    pub fn variables_as_object(&self) -> Object {
        self.variables
            .iter()
            .map(|(name, json)| (name.clone(), Value::from_json(json.clone())))
            .collect()
    }

    /// A render context using this configuration
    pub fn new_context(&self) -> RenderContext {
        RenderContext::with_naming(self.naming_convention)
            .with_syntax(self.syntax_compatibility)
            .with_variables(self.variables_as_object())
    }

    /// Write the configuration as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
