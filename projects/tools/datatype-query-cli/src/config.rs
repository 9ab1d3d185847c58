//! Settings file and the precedence rules applied on top of it.

use crate::error::CliError;
use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory name used under the platform config and data directories.
pub const APP_DIR: &str = "datatype-query";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DESCRIPTORS_ENV: &str = "DATATYPE_DESCRIPTORS";
pub const LOG_ENV: &str = "DATATYPE_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";
pub const VERBOSE_LOG_FILTER: &str = "debug";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the descriptor files.
    pub descriptor_dir: Option<PathBuf>,
    /// Program that runs script tools.
    pub script_host: Option<String>,
    /// `EnvFilter` directive used when `DATATYPE_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Config {
    /// `<config dir>/datatype-query/config.toml`, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
    }

    /// Load the config file.
    ///
    /// An `explicit` path must exist. The default file is optional; when it is
    /// missing, the default config is returned.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        match explicit {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) => match Self::read(&path) {
                    Err(CliError::ConfigRead { source, .. })
                        if source.kind() == io::ErrorKind::NotFound =>
                    {
                        Ok(Self::default())
                    }
                    other => other,
                },
                None => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse config text; `path` is only used in errors.
    pub fn parse(text: &str, path: &Path) -> Result<Self, CliError> {
        toml::from_str(text).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `<data dir>/datatype-query/descriptors`, if the platform has a data directory.
pub fn default_descriptor_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join("descriptors"))
}

/// Pick the descriptor directory: flag, then environment, then config, then `default`.
///
/// An empty environment value counts as unset.
pub fn descriptor_dir(
    flag: Option<PathBuf>,
    env: Option<OsString>,
    config: &Config,
    default: Option<PathBuf>,
) -> Option<PathBuf> {
    flag.or_else(|| env.filter(|value| !value.is_empty()).map(PathBuf::from))
        .or_else(|| config.descriptor_dir.clone())
        .or(default)
}

/// Pick the log filter directive: `--verbose`, then environment, then config, then `warn`.
pub fn log_filter(verbose: bool, env: Option<String>, config: &Config) -> String {
    if verbose {
        return VERBOSE_LOG_FILTER.to_owned();
    }
    env.filter(|value| !value.trim().is_empty())
        .or_else(|| config.log_filter.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned())
}
