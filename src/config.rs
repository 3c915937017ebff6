//! Configuration for jsontab
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{JsontabError, Result};

/// Main configuration for a jsontab instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for table files and seed files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── Users.json       (one file per table)
    ///     └── orders.json      (seed file, loaded at startup)
    pub data_dir: PathBuf,

    /// Extra seed filenames (relative to `data_dir`) loaded at startup
    pub seed_files: Vec<String>,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Line that ends a request
    pub terminator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./dbJsons"),
            seed_files: Vec::new(),
            listen_addr: "127.0.0.1:3030".to_string(),
            terminator: "END".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.listen_addr.trim().is_empty() {
            return Err(JsontabError::Config("listen address is empty".to_string()));
        }
        if self.terminator.is_empty() {
            return Err(JsontabError::Config("request terminator is empty".to_string()));
        }
        if self.terminator.contains('\n') || self.terminator.contains('\r') {
            return Err(JsontabError::Config(
                "request terminator must be a single line".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all table files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Add one extra seed filename
    pub fn seed_file(mut self, name: impl Into<String>) -> Self {
        self.config.seed_files.push(name.into());
        self
    }

    /// Replace the extra seed filenames
    pub fn seed_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.seed_files = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the request terminator line
    pub fn terminator(mut self, terminator: impl Into<String>) -> Self {
        self.config.terminator = terminator.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
