//! manifactory - Container Registry Client Library
//!
//! A small blocking client for the Docker/OCI Distribution HTTP API v2. It
//! lists the repositories of a registry catalog, lists tags per repository and
//! fetches image manifests.
//!
//! # Quick Start
//!
//! ```no_run
//! use libmanifactory::{ClientConfig, Credentials, Registry};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut registry = Registry::connect(
//!         "https://registry.example.com",
//!         Credentials::new("user", "pass"),
//!         ClientConfig::default(),
//!     )?;
//!
//!     for repo in registry.catalog()? {
//!         for tag in registry.tags(&repo)? {
//!             println!("{}/{}", repo, tag);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Authentication
//!
//! In the default Bearer mode the client runs the registry's token handshake
//! once per scope and reuses the token for the client's lifetime. Two scopes
//! are used: [`auth::CATALOG_SCOPE`] for the catalog and
//! [`auth::REPOSITORY_SCOPE`] for tags and manifests. In Basic mode the
//! credentials are sent with every request and no token is negotiated.
//!
//! # Architecture
//!
//! - [`registry`] - catalog, tags and manifest operations
//! - [`client`] - transport configuration and the request dispatcher
//! - [`token`] - version check and Bearer challenge-response handshake
//! - [`cache`] - scope-keyed token cache
//! - [`auth`] - credentials and `WWW-Authenticate` parsing
//! - [`manifest`] - manifest and descriptor types
//! - [`config`] - layered configuration loading
//! - [`error`] - error taxonomy

#![warn(clippy::all)]

/// Returns the libmanifactory crate version.
///
/// # Examples
///
/// ```
/// let version = libmanifactory::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod token;

// Re-export commonly used types for convenience
pub use auth::{AuthMode, Credentials};
pub use client::{Client, ClientConfig};
pub use config::Config;
pub use error::{RegistryError, Result};
pub use manifest::{Descriptor, Manifest, ManifestOrList};
pub use registry::Registry;
