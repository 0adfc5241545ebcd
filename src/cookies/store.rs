//! Cookie store collaborator.
//!
//! A **cookie store** owns the ambient cookie state of a page, the way a
//! browser's `document.cookie` does:
//! - [`CookieStore::read`] returns the current cookie header (`name=value` pairs
//!   joined by `"; "`, no attributes).
//! - [`CookieStore::write`] accepts one encoded cookie string (pair plus
//!   attributes) and applies it: add, replace, or delete when already expired.
//!
//! The codec never talks to a store directly. [`CookieJar`](crate::cookies::CookieJar)
//! composes the two, and tests inject [`InMemoryCookieStore`] instead of a
//! live browser.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use es_cookie::cookies::{CookieAttributes, CookieJar, CookieStore, InMemoryCookieStore};
//!
//! let store = Arc::new(InMemoryCookieStore::new("https://example.com/".parse().unwrap()));
//! let jar = CookieJar::new(store.clone());
//!
//! jar.set("session", "abc;123", &CookieAttributes::default()).unwrap();
//! assert_eq!(store.read(), "session=abc%3B123");
//! assert_eq!(jar.get("session").as_deref(), Some("abc;123"));
//! ```
mod in_memory;

use std::sync::Arc;

pub use in_memory::InMemoryCookieStore;

/// A handle to a cookie store trait.
///
/// Store implementations must be **`Send + Sync` and internally synchronized**,
/// since callers hold only `&self` when invoking trait methods.
pub type CookieStoreHandle = Arc<dyn CookieStore + Send + Sync>;

/// Ambient cookie state the codec reads from and writes to.
pub trait CookieStore: Send + Sync {
    /// Returns the raw cookie header currently visible to the page.
    fn read(&self) -> String;

    /// Applies one encoded cookie string.
    ///
    /// Stores decide on their own whether to accept a cookie (domain, secure
    /// context, ...). Rejections are silent, like in a browser.
    fn write(&self, cookie: &str);
}
