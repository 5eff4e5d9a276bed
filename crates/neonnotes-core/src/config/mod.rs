//! Client configuration for reaching the notes backend.
//!
//! Values resolve in order: explicit argument, environment variable, default.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
/// Django REST Framework token authentication keyword.
pub const DEFAULT_AUTH_SCHEME: &str = "Token";

pub const ENV_API_URL: &str = "NEONNOTES_API_URL";
pub const ENV_AUTH_SCHEME: &str = "NEONNOTES_AUTH_SCHEME";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to, without trailing slash.
    pub api_base_url: String,
    /// Keyword placed before the token in the `Authorization` header.
    pub auth_scheme: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl AsRef<str>, auth_scheme: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            api_base_url: normalize_base_url(api_base_url.as_ref())?,
            auth_scheme: normalize_auth_scheme(auth_scheme.as_ref())?,
        })
    }

    /// Resolve from explicit values, then the process environment, then defaults.
    pub fn resolve(api_base_url: Option<String>, auth_scheme: Option<String>) -> Result<Self> {
        Self::resolve_with(api_base_url, auth_scheme, |key| std::env::var(key).ok())
    }

    /// Same as [`resolve`](Self::resolve) with an injectable environment lookup.
    pub fn resolve_with(
        api_base_url: Option<String>,
        auth_scheme: Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let api_base_url = normalize_text_option(api_base_url)
            .or_else(|| normalize_text_option(env(ENV_API_URL)))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let auth_scheme = normalize_text_option(auth_scheme)
            .or_else(|| normalize_text_option(env(ENV_AUTH_SCHEME)))
            .unwrap_or_else(|| DEFAULT_AUTH_SCHEME.to_string());
        Self::new(api_base_url, auth_scheme)
    }

    /// Full URL for an endpoint path such as `/notes/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

pub fn normalize_base_url(raw: &str) -> Result<String> {
    let base = raw.trim().trim_end_matches('/').to_string();
    if base.is_empty() {
        return Err(Error::Config("API base URL must not be empty".to_string()));
    }
    if !is_http_url(&base) {
        return Err(Error::Config(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(base)
}

fn normalize_auth_scheme(raw: &str) -> Result<String> {
    let scheme = raw.trim();
    if scheme.is_empty() {
        return Err(Error::Config("Auth scheme must not be empty".to_string()));
    }
    if scheme.chars().any(char::is_whitespace) {
        return Err(Error::Config(
            "Auth scheme must be a single word (e.g. Token or Bearer)".to_string(),
        ));
    }
    Ok(scheme.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_point_at_local_backend() {
        let config = ClientConfig::resolve_with(None, None, no_env).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000/api");
        assert_eq!(config.auth_scheme, "Token");
    }

    #[test]
    fn explicit_values_win_over_env() {
        let config = ClientConfig::resolve_with(
            Some("https://notes.example.com/api/".to_string()),
            Some("Bearer".to_string()),
            |_| Some("http://ignored.example.com".to_string()),
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://notes.example.com/api");
        assert_eq!(config.auth_scheme, "Bearer");
    }

    #[test]
    fn env_values_fill_missing_explicit_values() {
        let config = ClientConfig::resolve_with(Some("  ".to_string()), None, |key| match key {
            ENV_API_URL => Some("https://env.example.com/api".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.api_base_url, "https://env.example.com/api");
        assert_eq!(config.auth_scheme, DEFAULT_AUTH_SCHEME);
    }

    #[test]
    fn normalize_base_url_rejects_invalid_values() {
        assert!(normalize_base_url("").is_err());
        assert!(normalize_base_url("example.com/api").is_err());
    }

    #[test]
    fn auth_scheme_must_be_single_word() {
        assert!(ClientConfig::new(DEFAULT_API_BASE_URL, "Bearer token").is_err());
        assert!(ClientConfig::new(DEFAULT_API_BASE_URL, " ").is_err());
    }

    #[test]
    fn endpoint_joins_paths() {
        let config = ClientConfig::default();
        assert_eq!(
            config.endpoint("/notes/3/"),
            "http://127.0.0.1:8000/api/notes/3/"
        );
        assert_eq!(config.endpoint("login/"), "http://127.0.0.1:8000/api/login/");
    }
}
