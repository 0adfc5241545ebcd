pub mod config;
pub mod cookies;
pub mod errors;

pub use config::CodecConfig;
pub use cookies::{CookieAttributes, CookieJar, CookieStore, EncodingScheme};
pub use errors::{CookieError, DecodeError};
