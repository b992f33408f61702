//! Configuration for patronkv
//!
//! Centralized configuration with sensible defaults. Passed once at startup
//! to both the store and the service.

use std::path::PathBuf;

use crate::clock::DayBoundary;
use crate::error::{PatronError, Result};
use crate::key::EntityKind;
use crate::store::Registry;

/// Main configuration for a patronkv instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Snapshot file backing the in-memory store.
    /// `None` keeps everything in memory for the life of the process.
    pub data_file: Option<PathBuf>,

    /// Entity kinds the store must know how to (de)serialize
    pub registry: Registry,

    // -------------------------------------------------------------------------
    // Calendar Configuration
    // -------------------------------------------------------------------------
    /// Time zone whose midnight ends a day when computing vacation windows
    pub day_boundary: DayBoundary,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            registry: Registry::standard(),
            day_boundary: DayBoundary::Local,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the config can drive a `UserService`
    pub fn validate(&self) -> Result<()> {
        if !self.registry.contains(EntityKind::User) {
            return Err(PatronError::Config(
                "registry must include the User kind".to_string(),
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
    /// Set the snapshot file
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = Some(path.into());
        self
    }

    /// Replace the entity registry
    pub fn registry(mut self, registry: Registry) -> Self {
        self.config.registry = registry;
        self
    }

    /// Set the day boundary used for midnight truncation
    pub fn day_boundary(mut self, boundary: DayBoundary) -> Self {
        self.config.day_boundary = boundary;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
