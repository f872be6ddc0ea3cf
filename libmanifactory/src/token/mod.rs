//! Bearer token negotiation.
//!
//! Implements the registry token handshake
//! (<https://docs.docker.com/registry/spec/api/#api-version-check>):
//!
//! 1. `GET /v2/` without credentials. The registry must advertise
//!    `Docker-Distribution-Api-Version: registry/2.0` and answer with either
//!    `200` or `401`.
//! 2. Read the `WWW-Authenticate` challenge to discover the token realm and
//!    service.
//! 3. `GET <realm>?service=<service>&scope=<scope>` with HTTP Basic
//!    credentials and decode the token from the JSON body.

use crate::auth::{AuthChallenge, Credentials};
use crate::client::{check_response_status, read_body, translate_reqwest_error};
use crate::error::{Result, RegistryError};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use serde::Deserialize;
use url::Url;

#[cfg(test)]
mod tests;

/// Header advertising the Distribution API version.
pub const API_VERSION_HEADER: &str = "Docker-Distribution-Api-Version";

/// Value of [`API_VERSION_HEADER`] for a v2 registry.
pub const API_VERSION: &str = "registry/2.0";

/// Body returned by the token service.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(rename = "Token", default)]
    capitalized_token: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

impl TokenResponse {
    /// First non-empty of `Token`, `token`, `access_token`.
    fn into_token(self) -> Option<String> {
        [self.capitalized_token, self.token, self.access_token]
            .into_iter()
            .flatten()
            .find(|token| !token.is_empty())
    }
}

/// Performs the version check and challenge-response handshake for one registry.
pub struct TokenNegotiator<'a> {
    http_client: &'a HttpClient,
    registry_url: &'a Url,
    credentials: &'a Credentials,
}

impl<'a> TokenNegotiator<'a> {
    /// Creates a negotiator borrowing the client's transport and credentials.
    pub fn new(
        http_client: &'a HttpClient,
        registry_url: &'a Url,
        credentials: &'a Credentials,
    ) -> Self {
        Self {
            http_client,
            registry_url,
            credentials,
        }
    }

    /// Negotiates a Bearer token for `scope`.
    pub fn negotiate(&self, scope: &str) -> Result<String> {
        let challenge = self.discover()?;
        tracing::debug!(
            realm = %challenge.realm,
            service = %challenge.service,
            scope,
            "requesting token"
        );
        self.request_token(&challenge, scope)
    }

    /// Runs the version check and returns the registry's auth challenge.
    pub fn discover(&self) -> Result<AuthChallenge> {
        let endpoint = self.registry_url.join("v2/").map_err(|e| {
            RegistryError::invalid_url_with_source("Cannot build version check URL", e)
        })?;

        let response = self
            .http_client
            .get(endpoint.clone())
            .send()
            .map_err(|e| translate_reqwest_error(e, endpoint.as_str()))?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::UNAUTHORIZED {
            return Err(RegistryError::status(status.as_u16(), endpoint.as_str()));
        }

        let headers = response.headers();

        let supports_v2 = headers
            .get_all(API_VERSION_HEADER)
            .iter()
            .any(|value| value.to_str().is_ok_and(|v| v == API_VERSION));
        if !supports_v2 {
            return Err(RegistryError::auth_discovery(
                "missing or unexpected registry version header",
            ));
        }

        AuthChallenge::from_headers(
            headers
                .get_all(WWW_AUTHENTICATE)
                .iter()
                .filter_map(|value| value.to_str().ok()),
        )
    }

    /// Requests a token from the challenge's realm.
    fn request_token(&self, challenge: &AuthChallenge, scope: &str) -> Result<String> {
        let mut realm = Url::parse(&challenge.realm).map_err(|e| {
            RegistryError::invalid_url_with_source(
                format!("Invalid token realm '{}'", challenge.realm),
                e,
            )
        })?;
        realm
            .query_pairs_mut()
            .append_pair("service", &challenge.service)
            .append_pair("scope", scope);

        let response = self
            .http_client
            .get(realm.clone())
            .header(AUTHORIZATION, self.credentials.basic_header())
            .send()
            .map_err(|e| translate_reqwest_error(e, realm.as_str()))?;
        let body = read_body(check_response_status(response)?)?;

        let token: TokenResponse = serde_json::from_slice(&body)
            .map_err(|e| RegistryError::decode_with_source("Failed to parse token response", e))?;

        token
            .into_token()
            .ok_or_else(|| RegistryError::decode("Token response did not contain a token"))
    }
}
