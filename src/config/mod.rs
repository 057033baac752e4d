//! Configuration management

use crate::domain::session::directory::{default_contacts, Contact, ContactDirectory};
use ::config::{ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub session: SessionConfig,
    pub directory: Vec<Contact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is not set
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Entries kept by the call audit log
    pub audit_capacity: usize,
    /// Delay between simulated network events
    pub event_interval_ms: u64,
    /// Delay between UI refreshes
    pub ui_interval_ms: u64,
    /// Simulated events before the demo exits
    pub demo_steps: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            session: SessionConfig::default(),
            directory: default_contacts(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            audit_capacity: 1000,
            event_interval_ms: 1500,
            ui_interval_ms: 1000,
            demo_steps: 40,
        }
    }
}

impl Config {
    /// Defaults, overlaid by the TOML file at `path` (if given), overlaid by
    /// `SOFTPHONE__SECTION__KEY` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config: Self = builder
            .add_source(Environment::with_prefix("SOFTPHONE").separator("__"))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document on top of the defaults
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ::config::Config::builder()
            .add_source(File::from_str(source, ::config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Timer periods must be non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.event_interval_ms == 0 {
            return Err(ConfigError::Message(
                "session.event_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.session.ui_interval_ms == 0 {
            return Err(ConfigError::Message(
                "session.ui_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn contact_directory(&self) -> ContactDirectory {
        ContactDirectory::new(self.directory.clone())
    }
}
