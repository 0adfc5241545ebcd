//! Cookies: codec, attribute serializer, [`CookieStore`] and the [`CookieJar`] convenience layer.
//!
//! The codec is a pair of pure functions:
//! - [`encode`] turns a name, a value and a [`CookieAttributes`] bag into one
//!   cookie string, e.g. `c=v; Path=/; Secure`.
//! - [`decode`] turns a cookie header (`a=1; b=2`) back into a name/value map.
//!
//! How names and values are escaped is chosen with [`EncodingScheme`]. Where
//! the string ends up is up to a [`CookieStore`].
//!
//! ```rust
//! use es_cookie::cookies::{decode, encode, CookieAttributes};
//!
//! let attrs = CookieAttributes { secure: true, ..Default::default() };
//! assert_eq!(encode("c", "a;b", &attrs), "c=a%3Bb; Secure");
//! assert_eq!(decode("c=a%3Bb; d=1")["c"], "a;b");
//! ```

mod attributes;
mod codec;
mod cookie_jar;
mod scheme;
mod serializer;
mod store;

pub use attributes::{CookieAttributes, CookieAttributesBuilder, Expires, SameSite};
pub use codec::{decode, decode_segment, decode_with, encode, encode_at, encode_with, SEGMENT_SEPARATOR};
pub use cookie_jar::CookieJar;
pub use scheme::EncodingScheme;
pub use serializer::{http_date, resolve_expires, serialize, serialize_at};
pub use store::{CookieStore, CookieStoreHandle, InMemoryCookieStore};
