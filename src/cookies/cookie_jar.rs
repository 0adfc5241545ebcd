//! Convenience layer over the codec and a [`CookieStore`](crate::cookies::CookieStore).
//!
//! ```text
//! set(name, value, attrs)  = store.write(encode(name, value, { path: "/", ..attrs }))
//! remove(name, attrs)      = set(name, "", { ..attrs, expires: -1 day })
//! get_all()                = decode(store.read())
//! get(name)                = get_all()[name]
//! ```
use std::collections::HashMap;

use crate::config::CodecConfig;
use crate::cookies::attributes::{CookieAttributes, Expires};
use crate::cookies::codec::{decode_with, encode_with};
use crate::cookies::store::CookieStoreHandle;
use crate::errors::CookieError;

/// Reads and writes cookies of one [`CookieStore`](crate::cookies::CookieStore).
pub struct CookieJar {
    config: CodecConfig,
    store: CookieStoreHandle,
}

impl CookieJar {
    /// Creates a jar with the default [`CodecConfig`].
    pub fn new(store: CookieStoreHandle) -> Self {
        Self::with_config(CodecConfig::default(), store)
    }

    pub fn with_config(config: CodecConfig, store: CookieStoreHandle) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// All cookies visible in the store. Malformed cookies are left out.
    pub fn get_all(&self) -> HashMap<String, String> {
        decode_with(&self.store.read(), self.config.scheme)
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.get_all().remove(name)
    }

    /// Writes a cookie.
    ///
    /// `attrs` is copied; the configured default path is only injected into
    /// the copy when `attrs.path` is `None`.
    pub fn set(&self, name: &str, value: &str, attrs: &CookieAttributes) -> Result<(), CookieError> {
        let mut attrs = attrs.clone();
        if attrs.path.is_none() {
            attrs.path = self.config.default_path.clone();
        }

        if self.config.validate_attributes {
            attrs.validate()?;
        }

        self.store.write(&encode_with(self.config.scheme, name, value, &attrs));
        Ok(())
    }

    /// Deletes a cookie by writing an expired one. `attrs` must carry the same
    /// `Domain` and `Path` the cookie was written with.
    pub fn remove(&self, name: &str, attrs: &CookieAttributes) -> Result<(), CookieError> {
        let attrs = CookieAttributes {
            expires: Some(Expires::Days(-1.0)),
            ..attrs.clone()
        };
        self.set(name, "", &attrs)
    }
}
