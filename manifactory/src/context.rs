//! Application context that holds resolved configuration
//!
//! The context is built following the precedence order:
//! 1. Default values
//! 2. Config file values
//! 3. Environment variables (`MANIFACTORY_*`)
//! 4. CLI flags
//!
//! Once built, the context is passed as read-only throughout the application.

use anyhow::Context as _;
use libmanifactory::{AuthMode, Config, Registry};
use std::path::Path;

/// Connection flags shared by every subcommand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionFlags {
    pub username: Option<String>,
    pub password: Option<String>,
    pub insecure: bool,
    pub basic_auth: bool,
    pub timeout: Option<u64>,
}

/// Application context with resolved configuration
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Resolved configuration
    pub config: Config,
}

impl AppContext {
    /// Build context with precedence: defaults > config file > env vars > CLI flags
    pub fn build(config_path: Option<&Path>, flags: &ConnectionFlags) -> anyhow::Result<Self> {
        let config = Config::load(config_path).context("can not load configuration")?;
        Ok(Self::with_flags(config, flags))
    }

    /// Applies CLI flags on top of an already loaded configuration.
    pub fn with_flags(mut config: Config, flags: &ConnectionFlags) -> Self {
        if let Some(username) = &flags.username {
            config.auth.username = username.clone();
        }
        if let Some(password) = &flags.password {
            config.auth.password = password.clone();
        }
        // Flags can only switch these on; a config file may already have.
        if flags.insecure {
            config.network.insecure = true;
        }
        if flags.basic_auth {
            config.auth.mode = AuthMode::Basic;
        }
        if let Some(timeout) = flags.timeout {
            config.network.timeout = timeout;
        }

        Self { config }
    }

    /// Connects a registry client for `registry_url` with the resolved settings.
    pub fn registry(&self, registry_url: &str) -> anyhow::Result<Registry> {
        Registry::connect(
            registry_url,
            self.config.credentials(),
            self.config.client_config(),
        )
        .with_context(|| format!("incorrect registry URL '{}'", registry_url))
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
