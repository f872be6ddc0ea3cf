//! Client configuration.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! `MANIFACTORY_*` environment variables (nested keys separated by `__`, e.g.
//! `MANIFACTORY_NETWORK__TIMEOUT=60`). Command-line flags are applied on top
//! by the caller.

use crate::auth::{AuthMode, Credentials};
use crate::client::ClientConfig;
use crate::error::{Result, RegistryError};
use config::{Config as ConfigRs, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;


/// Prefix of environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "MANIFACTORY";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub auth: Auth,
}

impl Config {
    /// Parses a `Config` from a YAML string, on top of the defaults.
    ///
    /// This function is primarily used for testing.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let builder = Self::defaults()?.add_source(File::from_str(s, FileFormat::Yaml));

        Self::from_builder(builder, None)
    }

    /// Loads a `Config` from an optional YAML file plus environment overrides.
    ///
    /// A path that is given must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::defaults()?;

        if let Some(p) = path {
            builder = builder.add_source(File::from(p).format(FileFormat::Yaml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Self::from_builder(builder, path)
    }

    /// Returns the HTTP client configuration described by these settings.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_timeout(self.network.timeout)
            .with_insecure(self.network.insecure)
            .with_auth_mode(self.auth.mode)
    }

    /// Returns the login credentials described by these settings.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.auth.username.clone(), self.auth.password.clone())
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = ConfigRs::try_from(&Config::default()).map_err(|e| {
            RegistryError::config_with_source("Failed to build default configuration", None, e)
        })?;

        Ok(ConfigRs::builder().add_source(defaults))
    }

    /// Creates a `Config` from a `config::ConfigBuilder`.
    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        path: Option<&Path>,
    ) -> Result<Self> {
        builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                RegistryError::config_with_source(
                    "Failed to deserialize configuration".to_string(),
                    path.map(|p| p.display().to_string()),
                    e,
                )
            })
    }
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    /// Per-request timeout in seconds
    #[serde(default = "default_network_timeout")]
    pub timeout: u64,

    /// Skip TLS certificate validation
    #[serde(default)]
    pub insecure: bool,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            timeout: default_network_timeout(),
            insecure: false,
        }
    }
}

fn default_network_timeout() -> u64 {
    30
}

/// Authentication settings.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Auth {
    #[serde(default)]
    pub mode: AuthMode,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("mode", &self.mode)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
