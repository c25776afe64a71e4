//! Authorization grant decoding for engine login

use crate::error::{MirrorError, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use url::Url;

/// Short-lived token issued by the destination control plane
#[derive(Clone)]
pub struct AuthGrant {
    /// Base64 of `user:password`
    pub token: String,
    pub proxy_endpoint: String,
    /// Expiry as seconds since the Unix epoch, when reported
    pub expires_at: Option<i64>,
}

impl AuthGrant {
    pub fn new(token: impl Into<String>, proxy_endpoint: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            proxy_endpoint: proxy_endpoint.into(),
            expires_at: None,
        }
    }

    pub fn with_expires_at(mut self, expires_at: Option<i64>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Decode the token into the credential pair used for `docker login`.
    pub fn credentials(&self) -> Result<EngineCredentials> {
        if self.token.is_empty() {
            return Err(MirrorError::Credentials("empty authorization token".to_string()));
        }

        let decoded = STANDARD
            .decode(self.token.trim())
            .map_err(|e| MirrorError::Credentials(format!("unable to decode authorization token: {}", e)))?;
        if decoded.is_empty() {
            return Err(MirrorError::Credentials("empty authorization token".to_string()));
        }

        let pair = String::from_utf8(decoded).map_err(|_| {
            MirrorError::Credentials("authorization token is not valid UTF-8".to_string())
        })?;

        match pair.split_once(':') {
            Some((username, password)) if !username.is_empty() && !password.is_empty() => {
                Ok(EngineCredentials::new(username.to_string(), password.to_string()))
            }
            _ => Err(MirrorError::Credentials(
                "authorization token is not a user:password pair".to_string(),
            )),
        }
    }

    /// Validated registry endpoint to log the engine into.
    pub fn endpoint(&self) -> Result<&str> {
        if self.proxy_endpoint.is_empty() {
            return Err(MirrorError::Credentials(
                "authorization grant has no proxy endpoint".to_string(),
            ));
        }
        Url::parse(&self.proxy_endpoint).map_err(|e| {
            MirrorError::Credentials(format!(
                "invalid proxy endpoint '{}': {}",
                self.proxy_endpoint, e
            ))
        })?;
        Ok(&self.proxy_endpoint)
    }

    /// Remaining validity, or `None` when no expiry was reported or it has passed.
    pub fn remaining_validity(&self) -> Option<Duration> {
        let expires_at = u64::try_from(self.expires_at?).ok()?;
        let now = SystemTime::now().duration_since(UNIX_EPOCH).ok()?.as_secs();
        expires_at.checked_sub(now).map(Duration::from_secs)
    }
}

impl fmt::Debug for AuthGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGrant")
            .field("token", &"<redacted>")
            .field("proxy_endpoint", &self.proxy_endpoint)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Username/password pair handed to `docker login`
#[derive(Clone, PartialEq, Eq)]
pub struct EngineCredentials {
    pub username: String,
    pub password: String,
}

impl EngineCredentials {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }
}

impl fmt::Debug for EngineCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
