//! Configuration file loading and layering.
//!
//! Values are taken, in order of precedence, from command line flags (which
//! also read `API_URL` / `API_TOKEN` from the environment), then from the TOML
//! config file, then from built-in defaults.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use cube_validate::{RunConfig, RunSettings};

/// Config file looked up in the working directory when none is named.
pub const DEFAULT_CONFIG_FILE: &str = "cube-guardian.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("API URL is not set (use --api-url, API_URL, or api_url in the config file)")]
    MissingApiUrl,
    #[error("API token is not set (use --api-token, API_TOKEN, or api_token in the config file)")]
    MissingApiToken,
}

/// Contents of the TOML config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub concurrency: Option<usize>,
    pub fail_fast: Option<bool>,
    pub cubes: Option<Vec<String>>,
}

impl FileConfig {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Loads the named file, or the default file in `working_dir` if present.
    ///
    /// A named file must exist; a missing default file yields an empty config.
    pub fn discover(explicit: Option<&Path>, working_dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = working_dir.join(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            tracing::debug!(path = %default_path.display(), "Using default config file");
            Self::load(&default_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub concurrency: Option<usize>,
    pub fail_fast: bool,
    pub cubes: Option<Vec<String>>,
}

/// Merges overrides over the file config into a run configuration.
pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<RunConfig, ConfigError> {
    let api_url = non_blank(overrides.api_url)
        .or_else(|| non_blank(file.api_url))
        .ok_or(ConfigError::MissingApiUrl)?;
    let credential = non_blank(overrides.api_token)
        .or_else(|| non_blank(file.api_token))
        .ok_or(ConfigError::MissingApiToken)?;

    let defaults = RunSettings::default();
    let settings = RunSettings {
        concurrency_limit: overrides
            .concurrency
            .or(file.concurrency)
            .unwrap_or(defaults.concurrency_limit),
        cube_filter: overrides
            .cubes
            .or(file.cubes)
            .map(|names| names.into_iter().collect::<BTreeSet<_>>()),
        fail_fast: overrides.fail_fast || file.fail_fast.unwrap_or(defaults.fail_fast),
    };

    Ok(RunConfig::new(api_url, credential).with_settings(settings))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
