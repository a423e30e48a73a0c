//! Command-line interface parsing for the user table
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a `StartupConfig` the binary builds its store, client and logging from.

use clap::Parser;
use reqwest::Url;
use std::path::PathBuf;
use thiserror::Error;

use crate::cache::{CacheStore, FileStore, MemoryStore};
use crate::data::DEFAULT_ENDPOINT;

/// Name of the log file written inside the cache directory
const LOG_FILE_NAME: &str = "usertable.log";

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The endpoint is not an absolute http(s) URL
    #[error("Invalid endpoint: '{0}'. Expected an http:// or https:// URL")]
    InvalidEndpoint(String),
}

/// User table - browse a remote user directory with a local cache
#[derive(Parser, Debug)]
#[command(name = "usertable")]
#[command(about = "Browse a remote user directory with a one-minute local cache")]
#[command(version)]
pub struct Cli {
    /// URL of the user service (GET, returns a JSON array of users)
    #[arg(long, value_name = "URL", default_value = DEFAULT_ENDPOINT, value_parser = parse_endpoint_arg)]
    pub endpoint: String,

    /// Directory for the cache file instead of the platform cache directory
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Keep the cache in memory only
    #[arg(long)]
    pub no_persist: bool,

    /// File to write logs to (defaults to usertable.log in the cache directory)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Load users immediately on start
    #[arg(long)]
    pub load: bool,
}

/// Where the users cache lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Files under the given directory
    Dir(PathBuf),
    /// Platform cache directory, if one can be determined
    Default,
    /// Process memory
    Memory,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Validated user service URL
    pub endpoint: String,
    /// Cache storage selection
    pub store: StoreConfig,
    /// Log destination, if logging is enabled
    pub log_file: Option<PathBuf>,
    /// Whether to trigger a load before the first key press
    pub load_on_start: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            store: StoreConfig::Default,
            log_file: None,
            load_on_start: false,
        }
    }
}

/// Checks that `s` is an absolute http or https URL
pub fn parse_endpoint_arg(s: &str) -> Result<String, CliError> {
    match Url::parse(s) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(s.to_string()),
        _ => Err(CliError::InvalidEndpoint(s.to_string())),
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the endpoint is not a usable URL
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let endpoint = parse_endpoint_arg(&cli.endpoint)?;

        let store = if cli.no_persist {
            StoreConfig::Memory
        } else if let Some(dir) = &cli.cache_dir {
            StoreConfig::Dir(dir.clone())
        } else {
            StoreConfig::Default
        };

        let log_file = cli.log_file.clone().or_else(|| {
            let dir = match &store {
                StoreConfig::Dir(dir) => Some(dir.clone()),
                _ => FileStore::new().map(|s| s.dir().to_path_buf()),
            };
            dir.map(|d| d.join(LOG_FILE_NAME))
        });

        Ok(StartupConfig {
            endpoint,
            store,
            log_file,
            load_on_start: cli.load,
        })
    }

    /// Builds the cache store this configuration selects
    ///
    /// Falls back to an in-memory store when no platform cache directory exists.
    pub fn build_store(&self) -> Box<dyn CacheStore> {
        match &self.store {
            StoreConfig::Dir(dir) => Box::new(FileStore::with_dir(dir.clone())),
            StoreConfig::Default => match FileStore::new() {
                Some(store) => Box::new(store),
                None => Box::new(MemoryStore::new()),
            },
            StoreConfig::Memory => Box::new(MemoryStore::new()),
        }
    }
}
