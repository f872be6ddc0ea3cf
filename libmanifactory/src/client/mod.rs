//! HTTP client for registry communication.
//!
//! This module provides a thin blocking HTTP client built on reqwest. It owns
//! the transport configuration, the login credentials and the token cache, and
//! dispatches authenticated GET requests against a single registry.

use crate::auth::{self, AuthMode, Credentials};
use crate::cache::CredentialCache;
use crate::error::{Result, RegistryError};
use crate::token::TokenNegotiator;
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::time::Duration;
use url::Url;


/// Request timeout used when none (or zero) is configured.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use libmanifactory::auth::AuthMode;
/// use libmanifactory::client::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_timeout(60)
///     .with_insecure(true)
///     .with_auth_mode(AuthMode::Basic);
/// assert_eq!(config.timeout_seconds, 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Per-request timeout in seconds (default: 30, zero means default)
    pub timeout_seconds: u64,
    /// Skip TLS certificate validation (default: false)
    pub insecure: bool,
    /// Basic or Bearer authorization (default: Bearer)
    pub auth_mode: AuthMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            insecure: false,
            auth_mode: AuthMode::Bearer,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Enables or disables TLS certificate validation.
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Sets the authorization mode.
    pub fn with_auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }
}

/// HTTP client bound to one registry and one set of login credentials.
#[derive(Debug)]
pub struct Client {
    /// The underlying HTTP client
    http_client: HttpClient,
    /// Base registry URL, always ending in `/`
    registry_url: Url,
    credentials: Credentials,
    auth_mode: AuthMode,
    tokens: CredentialCache,
}

impl Client {
    /// Creates a new client for the registry with default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifactory::auth::Credentials;
    /// use libmanifactory::client::Client;
    ///
    /// let client = Client::new("registry.example.com", Credentials::default()).unwrap();
    /// assert_eq!(client.registry_url(), "https://registry.example.com");
    /// ```
    pub fn new(registry_url: &str, credentials: Credentials) -> Result<Self> {
        Self::with_config(registry_url, credentials, ClientConfig::default())
    }

    /// Creates a new client for the registry with custom configuration.
    pub fn with_config(
        registry_url: &str,
        credentials: Credentials,
        config: ClientConfig,
    ) -> Result<Self> {
        let registry_url = Self::normalize_url(registry_url)?;

        let timeout_seconds = match config.timeout_seconds {
            0 => DEFAULT_TIMEOUT_SECONDS,
            seconds => seconds,
        };

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(|e| RegistryError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            registry_url,
            credentials,
            auth_mode: config.auth_mode,
            tokens: CredentialCache::new(),
        })
    }

    /// Normalizes a registry URL: trims it, adds `https://` when no scheme is
    /// given, and makes the path end in `/` so endpoints join beneath it.
    fn normalize_url(url: &str) -> Result<Url> {
        let url = url.trim();

        if url.is_empty() {
            return Err(RegistryError::invalid_url("Registry URL cannot be empty"));
        }

        let url = if !url.starts_with("http://") && !url.starts_with("https://") {
            format!("https://{}", url)
        } else {
            url.to_string()
        };

        let mut parsed = Url::parse(&url).map_err(|e| {
            RegistryError::invalid_url_with_source(format!("Invalid registry URL '{}'", url), e)
        })?;

        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }

        Ok(parsed)
    }

    /// Returns the base registry URL without a trailing slash.
    pub fn registry_url(&self) -> &str {
        self.registry_url.as_str().trim_end_matches('/')
    }

    /// Returns the authorization mode.
    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    /// Returns the token cache.
    pub fn tokens(&self) -> &CredentialCache {
        &self.tokens
    }

    /// Joins a registry-relative path such as `v2/_catalog` onto the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.registry_url.join(path).map_err(|e| {
            RegistryError::invalid_url_with_source(
                format!("Cannot join '{}' onto {}", path, self.registry_url),
                e,
            )
        })
    }

    /// Issues an authenticated GET and returns the response body.
    ///
    /// In Basic mode the credentials are sent directly. In Bearer mode a token
    /// for `scope` is taken from the cache, negotiating it on the first use.
    /// Each entry of `accept` becomes its own `Accept` header. Any status other
    /// than `200 OK` is an error; nothing is retried.
    pub fn request(&mut self, endpoint: &Url, scope: &str, accept: &[&str]) -> Result<Vec<u8>> {
        let mut request = self.http_client.get(endpoint.clone());

        for media_type in accept {
            request = request.header(ACCEPT, *media_type);
        }

        let authorization = match self.auth_mode {
            AuthMode::Basic => self.credentials.basic_header(),
            AuthMode::Bearer => {
                // Field borrows only: the cache below is borrowed mutably.
                let negotiator =
                    TokenNegotiator::new(&self.http_client, &self.registry_url, &self.credentials);
                let token = self
                    .tokens
                    .resolve(scope, |scope| negotiator.negotiate(scope))?;
                auth::bearer_header(token)
            }
        };
        request = request.header(AUTHORIZATION, authorization);

        tracing::debug!(url = %endpoint, scope, "GET");
        let response = request
            .send()
            .map_err(|e| translate_reqwest_error(e, endpoint.as_str()))?;
        let response = check_response_status(response)?;

        read_body(response)
    }
}

/// Rejects any response whose status is not `200 OK`.
pub(crate) fn check_response_status(response: Response) -> Result<Response> {
    let status = response.status();

    if status == StatusCode::OK {
        return Ok(response);
    }

    tracing::debug!(url = %response.url(), status = status.as_u16(), "unexpected status");
    Err(RegistryError::status(status.as_u16(), response.url().as_str()))
}

/// Reads the full body of a response.
pub(crate) fn read_body(response: Response) -> Result<Vec<u8>> {
    let url = response.url().to_string();
    response
        .bytes()
        .map(|bytes| bytes.to_vec())
        .map_err(|e| RegistryError::network_with_source(format!("Failed to read body from {}", url), e))
}

/// Translates a reqwest error into a RegistryError.
pub(crate) fn translate_reqwest_error(error: reqwest::Error, url: &str) -> RegistryError {
    if error.is_timeout() {
        RegistryError::network_with_source(format!("Request to {} timed out", url), error)
    } else if error.is_connect() {
        RegistryError::network_with_source(format!("Failed to connect to {}", url), error)
    } else if error.is_request() {
        RegistryError::network_with_source(format!("Failed to send request to {}", url), error)
    } else {
        RegistryError::network_with_source(format!("Network error communicating with {}", url), error)
    }
}
