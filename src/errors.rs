/// Errors surfaced to callers of the cookie layer.
#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    #[error("Invalid attribute combination: {reason}")]
    InvalidAttributeCombination { reason: &'static str },

    #[error("Unknown SameSite value: {0}")]
    UnknownSameSite(String),

    #[error("Invalid codec configuration: {0}")]
    InvalidConfig(String),
}

/// Failure to decode a single `name=value` segment of a cookie header.
///
/// These never escape [`decode`](crate::cookies::decode); the segment is
/// dropped and the remaining segments are still decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Malformed percent escape in {input:?}")]
    MalformedEscape { input: String },

    #[error("Percent escape in {input:?} does not decode to UTF-8")]
    InvalidUtf8 { input: String },
}
