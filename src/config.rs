//! Codec configuration.
//!
//! `CodecConfig` controls how a [`CookieJar`](crate::cookies::CookieJar)
//! encodes and decodes cookies. It provides defaults via [`Default`] and a
//! fluent [`CodecConfig::builder()`] for customization with validation.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use es_cookie::config::CodecConfig;
//! use es_cookie::cookies::EncodingScheme;
//! let cfg = CodecConfig::default();
//! assert_eq!(cfg.scheme, EncodingScheme::Minimal);
//! assert_eq!(cfg.default_path.as_deref(), Some("/"));
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use es_cookie::config::CodecConfig;
//! use es_cookie::cookies::EncodingScheme;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = CodecConfig::builder()
//!     .scheme(EncodingScheme::UriComponent)
//!     .default_path("/app")
//!     .validate_attributes(false)
//!     .build()?; // returns Result<CodecConfig, CookieError>
//! # Ok(()) }
//! ```
//!
//! # Fields (summary)
//! - `scheme`: escaping scheme for names and values (default: `Minimal`).
//! - `default_path`: `Path` injected by `CookieJar::set` when the caller leaves
//!   it unset (default: `/`). `None` disables injection.
//! - `validate_attributes`: reject `SameSite=None` / `Partitioned` without
//!   `Secure` in `CookieJar::set` (default: `true`).
//!
//! # Errors
//!
//! Validation returns [`CookieError::InvalidConfig`] when `default_path` is
//! empty or does not start with `/`.

use serde::{Deserialize, Serialize};

use crate::cookies::EncodingScheme;
use crate::errors::CookieError;

const DEFAULT_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub scheme: EncodingScheme,
    pub default_path: Option<String>,
    pub validate_attributes: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            scheme: EncodingScheme::Minimal,
            default_path: Some(DEFAULT_PATH.to_string()),
            validate_attributes: true,
        }
    }
}

impl CodecConfig {
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder::default()
    }

    /// Loads a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CookieError> {
        let config: CodecConfig =
            serde_json::from_str(json).map_err(|e| CookieError::InvalidConfig(e.to_string()))?;
        validate(&config)?;
        Ok(config)
    }
}

/// Builder for [`CodecConfig`].
#[derive(Debug, Clone, Default)]
pub struct CodecConfigBuilder {
    inner: CodecConfig,
}

impl CodecConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut CodecConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn scheme(self, scheme: EncodingScheme) -> Self { self.map(|c| c.scheme = scheme) }
    pub fn default_path<S: Into<String>>(self, path: S) -> Self { self.map(|c| c.default_path = Some(path.into())) }
    pub fn no_default_path(self) -> Self { self.map(|c| c.default_path = None) }
    pub fn validate_attributes(self, on: bool) -> Self { self.map(|c| c.validate_attributes = on) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut CodecConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<CodecConfig, CookieError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

fn validate(c: &CodecConfig) -> Result<(), CookieError> {
    if let Some(path) = &c.default_path {
        if !path.starts_with('/') {
            return Err(CookieError::InvalidConfig(format!(
                "default_path {path:?} must start with '/'"
            )));
        }
    }
    Ok(())
}
