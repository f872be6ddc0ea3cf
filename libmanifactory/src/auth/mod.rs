//! Authentication handling for container registries.
//!
//! A client authenticates in one of two ways: HTTP Basic on every request, or
//! Bearer tokens obtained through the registry's challenge-response handshake
//! (see [`crate::token`]). This module holds the credential types and the
//! parser for the `WWW-Authenticate` challenge.

use crate::error::{Result, RegistryError};
use serde::{Deserialize, Serialize};


/// Scope granting read access to the whole registry catalog.
pub const CATALOG_SCOPE: &str = "registry:catalog:*";

/// Scope granting pull access to any repository.
pub const REPOSITORY_SCOPE: &str = "repository:*:pull";

/// How requests are authorized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Send the username and password on every request.
    Basic,
    /// Negotiate a scoped token once and send it as a Bearer credential.
    #[default]
    Bearer,
}

/// Login credentials for a registry.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Username for authentication
    pub username: String,
    /// Password for authentication
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Creates credentials from a username and password.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifactory::auth::Credentials;
    ///
    /// let creds = Credentials::new("username", "password");
    /// assert_eq!(creds.username, "username");
    /// ```
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the `Authorization` header value for HTTP Basic authentication.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifactory::auth::Credentials;
    ///
    /// let creds = Credentials::new("user", "pass");
    /// assert_eq!(creds.basic_header(), "Basic dXNlcjpwYXNz");
    /// ```
    pub fn basic_header(&self) -> String {
        use base64::{Engine as _, engine::general_purpose};
        let credentials = format!("{}:{}", self.username, self.password);
        let encoded = general_purpose::STANDARD.encode(credentials);
        format!("Basic {}", encoded)
    }
}

/// Returns the `Authorization` header value for a Bearer token.
pub fn bearer_header(token: &str) -> String {
    format!("Bearer {}", token)
}

const CHALLENGE_PREFIX: &str = "Bearer realm=\"";
const CHALLENGE_SEPARATOR: &str = "\",service=\"";
const CHALLENGE_SUFFIX: &str = "\"";

/// Realm and service parsed from a `WWW-Authenticate` Bearer challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChallenge {
    /// URL of the token service
    pub realm: String,
    /// Service identifier to pass to the token service
    pub service: String,
}

impl AuthChallenge {
    /// Parses a `WWW-Authenticate` header value.
    ///
    /// Only the exact form `Bearer realm="<realm>",service="<service>"` is
    /// accepted: no whitespace around the comma, no extra parameters, both
    /// values double-quoted, non-empty and free of quotes.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifactory::auth::AuthChallenge;
    ///
    /// let header = r#"Bearer realm="https://auth.example.com/token",service="registry.example.com""#;
    /// let challenge = AuthChallenge::parse(header).unwrap();
    /// assert_eq!(challenge.realm, "https://auth.example.com/token");
    /// assert_eq!(challenge.service, "registry.example.com");
    /// ```
    pub fn parse(header: &str) -> Result<Self> {
        let unexpected = || {
            RegistryError::auth_discovery(format!(
                "unexpected authentication challenge: {}",
                header
            ))
        };

        let rest = header.strip_prefix(CHALLENGE_PREFIX).ok_or_else(unexpected)?;
        let (realm, rest) = rest.split_once(CHALLENGE_SEPARATOR).ok_or_else(unexpected)?;
        let service = rest.strip_suffix(CHALLENGE_SUFFIX).ok_or_else(unexpected)?;

        let valid = |value: &str| !value.is_empty() && !value.contains('"');
        if !valid(realm) || !valid(service) {
            return Err(unexpected());
        }

        Ok(Self {
            realm: realm.to_string(),
            service: service.to_string(),
        })
    }

    /// Picks the first parsable challenge out of several header values.
    pub fn from_headers<'a, I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        values
            .into_iter()
            .find_map(|value| Self::parse(value).ok())
            .ok_or_else(|| {
                RegistryError::auth_discovery("missing or unexpected authentication challenge")
            })
    }
}
