//! Draw configuration parsed from environment variables.

use std::sync::Arc;

use url::Url;

use crate::pool::{Pool, PoolError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
pub const DEFAULT_QUERY_PARAM: &str = "s";

pub const BASE_URL_ENV: &str = "DRAW_BASE_URL";
pub const QUERY_PARAM_ENV: &str = "DRAW_QUERY_PARAM";
pub const POOL_ENV: &str = "DRAW_POOL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL '{value}': {source}")]
    InvalidBaseUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("base URL '{0}' cannot carry a query string")]
    OpaqueBaseUrl(String),
    #[error("query parameter name must not be blank")]
    BlankQueryParam,
    #[error("invalid pool: {0}")]
    Pool(#[from] PoolError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawConfig {
    /// Page that share links point at.
    pub base_url: Url,
    /// Query parameter carrying the token.
    pub query_param: String,
    pub pool: Arc<Pool>,
}

impl DrawConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `DRAW_BASE_URL`: default `http://localhost:8080/`
    /// - `DRAW_QUERY_PARAM`: default `s`
    /// - `DRAW_POOL`: comma-separated labels, default the built-in nine-item pool
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when any variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(
            env_opt(BASE_URL_ENV),
            env_opt(QUERY_PARAM_ENV),
            env_opt(POOL_ENV),
        )
    }

    /// Build config from optional raw values, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a provided value is invalid.
    pub fn from_sources(
        base_url: Option<String>,
        query_param: Option<String>,
        pool: Option<String>,
    ) -> Result<Self, ConfigError> {
        let raw_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let base_url = match Url::parse(raw_url.trim()) {
            Ok(url) => url,
            Err(source) => {
                return Err(ConfigError::InvalidBaseUrl {
                    value: raw_url,
                    source,
                });
            }
        };
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::OpaqueBaseUrl(raw_url));
        }

        let query_param = query_param
            .as_deref()
            .unwrap_or(DEFAULT_QUERY_PARAM)
            .trim()
            .to_owned();
        if query_param.is_empty() {
            return Err(ConfigError::BlankQueryParam);
        }

        let pool = match pool {
            Some(raw) => Pool::parse_list(&raw)?,
            None => Pool::reference(),
        };

        Ok(Self {
            base_url,
            query_param,
            pool: Arc::new(pool),
        })
    }
}

fn env_opt(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
