//! Scope-keyed credential cache.
//!
//! Tokens are negotiated lazily, once per scope, and kept for the lifetime of
//! the owning client. Entries are never evicted or replaced. Mutation goes
//! through `&mut self`; sharing a cache across threads needs an outer lock.

use crate::error::Result;
use std::collections::HashMap;


/// A negotiated token and the scope it was granted for.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Scope the token grants
    pub scope: String,
    /// Bearer token value
    pub token: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("scope", &self.scope)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Maps an authorization scope to the credential negotiated for it.
#[derive(Debug, Default)]
pub struct CredentialCache {
    entries: HashMap<String, Credential>,
}

impl CredentialCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the token for `scope`, calling `negotiate` only on a miss.
    ///
    /// A failed negotiation leaves the cache untouched and returns the error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifactory::cache::CredentialCache;
    ///
    /// let mut cache = CredentialCache::new();
    /// let token = cache.resolve("registry:catalog:*", |_| Ok("abc".to_string())).unwrap();
    /// assert_eq!(token, "abc");
    ///
    /// // Second lookup is served from the cache.
    /// let token = cache
    ///     .resolve("registry:catalog:*", |_| panic!("not negotiated twice"))
    ///     .unwrap();
    /// assert_eq!(token, "abc");
    /// ```
    pub fn resolve<F>(&mut self, scope: &str, negotiate: F) -> Result<&str>
    where
        F: FnOnce(&str) -> Result<String>,
    {
        if !self.entries.contains_key(scope) {
            let token = negotiate(scope)?;
            tracing::debug!(scope, "stored negotiated token");
            self.entries.insert(
                scope.to_string(),
                Credential {
                    scope: scope.to_string(),
                    token,
                },
            );
        } else {
            tracing::trace!(scope, "token cache hit");
        }

        Ok(self.entries[scope].token.as_str())
    }

    /// Returns true if a token has been negotiated for `scope`.
    pub fn contains(&self, scope: &str) -> bool {
        self.entries.contains_key(scope)
    }

    /// Number of cached scopes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no token has been negotiated yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
