//! Error types for registry operations.
//!
//! Every failure in the client surfaces as a [`RegistryError`]. Nothing is
//! retried or swallowed inside the library; callers decide what to do with a
//! failed operation.

use thiserror::Error;


/// Main error type for registry operations
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Malformed registry or realm URL, or an endpoint that could not be joined
    #[error("Invalid URL: {message}")]
    InvalidUrl {
        message: String,
        #[source]
        source: Option<url::ParseError>,
    },

    /// Transport errors (connection, TLS, timeout, body read)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Any HTTP response other than 200 OK
    #[error("Unexpected status code {status_code} from {url}")]
    Status { status_code: u16, url: String },

    /// The registry does not look like a v2 registry, or its auth challenge is unusable
    #[error("Authentication discovery error: {message}")]
    AuthDiscovery { message: String },

    /// Response body is not valid JSON or does not match the expected shape
    #[error("Decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid config file, bad environment override)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

impl RegistryError {
    /// Creates a new URL error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifactory::error::RegistryError;
    ///
    /// let err = RegistryError::invalid_url("registry URL cannot be empty");
    /// assert!(matches!(err, RegistryError::InvalidUrl { .. }));
    /// ```
    pub fn invalid_url<S: Into<String>>(message: S) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new URL error wrapping a parse failure.
    pub fn invalid_url_with_source<S: Into<String>>(message: S, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Creates a new network error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifactory::error::RegistryError;
    ///
    /// let err = RegistryError::network("connection refused");
    /// assert!(matches!(err, RegistryError::Network { .. }));
    /// ```
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new network error with a source error.
    pub fn network_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new status error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifactory::error::RegistryError;
    ///
    /// let err = RegistryError::status(404, "https://registry.example.com/v2/_catalog");
    /// assert_eq!(err.status_code(), Some(404));
    /// ```
    pub fn status<S: Into<String>>(status_code: u16, url: S) -> Self {
        Self::Status {
            status_code,
            url: url.into(),
        }
    }

    /// Creates a new authentication discovery error.
    pub fn auth_discovery<S: Into<String>>(message: S) -> Self {
        Self::AuthDiscovery {
            message: message.into(),
        }
    }

    /// Creates a new decode error.
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new decode error with a source error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifactory::error::RegistryError;
    ///
    /// let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
    /// let err = RegistryError::decode_with_source("failed to parse catalog response", json_err);
    /// assert!(matches!(err, RegistryError::Decode { .. }));
    /// ```
    pub fn decode_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Decode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error with a source error.
    pub fn config_with_source<S, E>(message: S, path: Option<S>, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the HTTP status code carried by a status error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}
