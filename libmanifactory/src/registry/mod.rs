//! Registry operations module.
//!
//! This module provides the three read operations of the Distribution API:
//! listing the catalog, listing the tags of a repository and fetching a
//! manifest. Each operation builds its endpoint, picks the authorization
//! scope, dispatches through the [`Client`] and decodes the JSON body.
//!
//! Listings are single-page; `Link` pagination headers are not followed.

use crate::auth::{CATALOG_SCOPE, Credentials, REPOSITORY_SCOPE};
use crate::client::{Client, ClientConfig};
use crate::error::{Result, RegistryError};
use crate::manifest::{MANIFEST_V2_MEDIA_TYPE, Manifest, ManifestOrList};
use serde::{Deserialize, Serialize};


/// Response from the catalog endpoint listing repositories.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogResponse {
    /// List of repository names.
    #[serde(default)]
    pub repositories: Option<Vec<String>>,
}

/// Response from the tags endpoint listing tags for a repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagsResponse {
    /// Repository name.
    #[serde(default)]
    pub name: String,
    /// List of tags; registries send `null` for a repository without tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// High-level registry client running the catalog, tags and manifest operations.
#[derive(Debug)]
pub struct Registry {
    /// HTTP client for registry communication.
    client: Client,
}

impl Registry {
    /// Creates a new `Registry` from a configured client.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifactory::auth::Credentials;
    /// use libmanifactory::client::Client;
    /// use libmanifactory::registry::Registry;
    ///
    /// let client = Client::new("https://registry.example.com", Credentials::default()).unwrap();
    /// let registry = Registry::new(client);
    /// ```
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client and wraps it in one step.
    pub fn connect(registry_url: &str, credentials: Credentials, config: ClientConfig) -> Result<Self> {
        Client::with_config(registry_url, credentials, config).map(Self::new)
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Lists all repositories in the registry (catalog operation).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use libmanifactory::auth::Credentials;
    /// # use libmanifactory::client::ClientConfig;
    /// # use libmanifactory::registry::Registry;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut registry = Registry::connect(
    ///     "https://registry.example.com",
    ///     Credentials::new("user", "pass"),
    ///     ClientConfig::default(),
    /// )?;
    ///
    /// for repo in registry.catalog()? {
    ///     println!("{}", repo);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn catalog(&mut self) -> Result<Vec<String>> {
        let endpoint = self.client.endpoint("v2/_catalog")?;
        let body = self.client.request(&endpoint, CATALOG_SCOPE, &[])?;

        let catalog: CatalogResponse = serde_json::from_slice(&body)
            .map_err(|e| RegistryError::decode_with_source("Failed to parse catalog response", e))?;

        Ok(catalog.repositories.unwrap_or_default())
    }

    /// Lists all tags for a specific repository.
    ///
    /// # Arguments
    ///
    /// * `repository` - The name of the repository (e.g., "alpine", "library/ubuntu")
    pub fn tags(&mut self, repository: &str) -> Result<Vec<String>> {
        let endpoint = self
            .client
            .endpoint(&format!("v2/{}/tags/list/", repository))?;
        let body = self.client.request(&endpoint, REPOSITORY_SCOPE, &[])?;

        let response: TagsResponse = serde_json::from_slice(&body)
            .map_err(|e| RegistryError::decode_with_source("Failed to parse tags response", e))?;

        let tags = response.tags.unwrap_or_default();
        tracing::debug!(repository = %response.name, count = tags.len(), "listed tags");
        Ok(tags)
    }

    /// Fetches the manifest of `repository:tag`.
    ///
    /// A manifest list is not an error: it is logged and reported as
    /// [`ManifestOrList::SkippedList`].
    pub fn manifest(&mut self, repository: &str, tag: &str) -> Result<ManifestOrList> {
        let endpoint = self
            .client
            .endpoint(&format!("v2/{}/manifests/{}", repository, tag))?;
        let body = self
            .client
            .request(&endpoint, REPOSITORY_SCOPE, &[MANIFEST_V2_MEDIA_TYPE])?;

        let manifest: Manifest = serde_json::from_slice(&body)
            .map_err(|e| RegistryError::decode_with_source("Failed to parse manifest", e))?;

        let outcome = ManifestOrList::from_manifest(manifest);
        if let ManifestOrList::SkippedList { media_type } = &outcome {
            tracing::warn!(repository, tag, media_type = %media_type, "manifest list skipped");
        }

        Ok(outcome)
    }
}
