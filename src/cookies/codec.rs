//! Encoding of a single cookie and decoding of a whole cookie header.
//!
//! ```text
//! encode:  name=value[; Expires=..][; Domain=..][; Path=..][; Secure][; SameSite=..][; Partitioned]
//! decode:  name=value; name=value; ...  ->  { name: value, ... }
//! ```
//!
//! Decoding never fails as a whole. Each segment is decoded on its own and a
//! segment that cannot be decoded is dropped, so one malformed cookie written
//! by somebody else does not hide all the others.
use std::collections::HashMap;

use time::OffsetDateTime;

use crate::cookies::attributes::CookieAttributes;
use crate::cookies::scheme::EncodingScheme;
use crate::cookies::serializer;
use crate::errors::DecodeError;

/// Separator between segments of a cookie header. A bare `;` does not split.
pub const SEGMENT_SEPARATOR: &str = "; ";

/// Encodes a cookie with the default [`EncodingScheme`].
pub fn encode(name: &str, value: &str, attrs: &CookieAttributes) -> String {
    encode_with(EncodingScheme::default(), name, value, attrs)
}

pub fn encode_with(scheme: EncodingScheme, name: &str, value: &str, attrs: &CookieAttributes) -> String {
    encode_at(scheme, name, value, attrs, OffsetDateTime::now_utc())
}

/// Encodes a cookie, resolving relative expiry against `now`.
pub fn encode_at(
    scheme: EncodingScheme,
    name: &str,
    value: &str,
    attrs: &CookieAttributes,
    now: OffsetDateTime,
) -> String {
    let cookie = format!(
        "{}={}{}",
        scheme.escape_name(name),
        scheme.escape_value(value),
        serializer::serialize_at(attrs, now)
    );
    log::trace!("encoded cookie {cookie:?}");
    cookie
}

/// Decodes a cookie header with the default [`EncodingScheme`].
pub fn decode(header: &str) -> HashMap<String, String> {
    decode_with(header, EncodingScheme::default())
}

/// Decodes a cookie header into a name/value map. The last occurrence of a
/// name wins.
pub fn decode_with(header: &str, scheme: EncodingScheme) -> HashMap<String, String> {
    segments(header)
        .filter_map(|segment| match decode_segment(segment, scheme) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("dropping cookie segment {segment:?}: {e}");
                None
            }
        })
        .collect()
}

/// Decodes one `name=value` segment.
///
/// Only the first `=` separates name from value. A segment without `=` is
/// a name with an empty value. A value wrapped in double quotes loses exactly
/// one quote on each side.
pub fn decode_segment(segment: &str, scheme: EncodingScheme) -> Result<(String, String), DecodeError> {
    let (raw_name, raw_value) = segment.split_once('=').unwrap_or((segment, ""));
    let raw_value = strip_quotes(raw_value);

    let name = scheme.unescape_name(raw_name)?;
    let value = scheme.unescape_value(raw_value)?;
    log::trace!("decoded cookie segment {name:?}={value:?}");

    Ok((name, value))
}

fn segments(header: &str) -> impl Iterator<Item = &str> {
    // `split` would yield one empty segment for an empty header.
    (!header.is_empty())
        .then(|| header.split(SEGMENT_SEPARATOR))
        .into_iter()
        .flatten()
}

fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::attributes::{Expires, SameSite};
    use proptest::prelude::*;
    use time::macros::datetime;

    fn map(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn encode_plain_pair() {
        assert_eq!(encode("c", "v", &CookieAttributes::default()), "c=v");
    }

    #[test]
    fn encode_with_expiry_in_days() {
        let now = datetime!(2024-03-01 08:00:00 UTC);
        let attrs = CookieAttributes { expires: Some(Expires::Days(21.0)), ..Default::default() };
        assert_eq!(
            encode_at(EncodingScheme::Minimal, "c", "v", &attrs, now),
            "c=v; Expires=Fri, 22 Mar 2024 08:00:00 GMT"
        );
    }

    #[test]
    fn encode_secure_flag() {
        let secure = CookieAttributes { secure: true, ..Default::default() };
        assert_eq!(encode("c", "v", &secure), "c=v; Secure");

        let insecure = CookieAttributes { secure: false, ..Default::default() };
        assert_eq!(encode("c", "v", &insecure), "c=v");

        let with_path = CookieAttributes { path: Some("/".into()), secure: false, ..Default::default() };
        assert_eq!(encode("c", "v", &with_path), "c=v; Path=/");
    }

    #[test]
    fn encode_same_site() {
        let strict = CookieAttributes { same_site: Some(SameSite::Strict), ..Default::default() };
        assert_eq!(encode("c", "v", &strict), "c=v; SameSite=strict");

        let lax = CookieAttributes { same_site: Some(SameSite::Lax), ..Default::default() };
        assert_eq!(encode("c", "v", &lax), "c=v; SameSite=lax");

        let none = CookieAttributes { same_site: Some(SameSite::None), secure: true, ..Default::default() };
        assert_eq!(encode("c", "v", &none), "c=v; Secure; SameSite=none");
    }

    #[test]
    fn encode_domain() {
        let attrs = CookieAttributes { domain: Some("localhost".into()), ..Default::default() };
        assert_eq!(encode("c", "v", &attrs), "c=v; Domain=localhost");
    }

    #[test]
    fn encode_escapes_per_scheme() {
        let attrs = CookieAttributes::default();
        assert_eq!(encode("a;b=", "x;y=z", &attrs), "a%3Bb%3D=x%3By=z");
        assert_eq!(
            encode_with(EncodingScheme::UriComponent, "(a)", "x y;", &attrs),
            "%28a%29=x%20y%3B"
        );
    }

    #[test]
    fn decode_header() {
        assert_eq!(decode("c=v; name=value"), map(&[("c", "v"), ("name", "value")]));
    }

    #[test]
    fn decode_empty_header_is_empty() {
        assert!(decode("").is_empty());
    }

    #[test]
    fn decode_keeps_everything_after_first_equals() {
        assert_eq!(decode("c=foo=bar"), map(&[("c", "foo=bar")]));
        assert_eq!(decode("c==="), map(&[("c", "==")]));
    }

    #[test]
    fn decode_segment_without_equals() {
        assert_eq!(decode("flag; c=v"), map(&[("flag", ""), ("c", "v")]));
    }

    #[test]
    fn decode_splits_only_on_semicolon_space() {
        assert_eq!(decode("a=1;b=2"), map(&[("a", "1;b=2")]));
    }

    #[test]
    fn decode_strips_one_pair_of_quotes() {
        assert_eq!(decode("c=\"v\""), map(&[("c", "v")]));
        assert_eq!(decode("c=\"\"v\"\""), map(&[("c", "\"v\"")]));
        assert_eq!(decode("c=\""), map(&[("c", "\"")]));
        assert_eq!(decode("c=\"v"), map(&[("c", "\"v")]));
        assert_eq!(decode("c=v\""), map(&[("c", "v\"")]));
    }

    #[test]
    fn decode_last_occurrence_wins() {
        assert_eq!(decode("c=1; d=2; c=3"), map(&[("c", "3"), ("d", "2")]));
    }

    #[test]
    fn decode_drops_malformed_segments_only() {
        let header = "a=1; bad%ZZ=2; c=%C3%A3; d=%A1; e=5";
        assert_eq!(
            decode_with(header, EncodingScheme::UriComponent),
            map(&[("a", "1"), ("c", "ã"), ("e", "5")])
        );

        assert_eq!(
            decode_segment("bad%ZZ=2", EncodingScheme::UriComponent),
            Err(DecodeError::MalformedEscape { input: "bad%ZZ".into() })
        );
    }

    #[test]
    fn minimal_scheme_never_drops_segments() {
        assert_eq!(decode("%ZZ=%A1; c=v"), map(&[("%ZZ", "%A1"), ("c", "v")]));
    }

    #[test]
    fn semicolons_and_equals_round_trip() {
        let attrs = CookieAttributes::default();
        assert_eq!(decode(&encode("c", ";", &attrs)), map(&[("c", ";")]));
        assert_eq!(decode(&encode("c", "foo=bar", &attrs)), map(&[("c", "foo=bar")]));
        assert_eq!(decode(&encode("c=", "foo", &attrs)), map(&[("c=", "foo")]));
        assert_eq!(decode(&encode("%ok", "baz%", &attrs)), map(&[("%ok", "baz%")]));
    }

    proptest! {
        #[test]
        fn minimal_round_trip(name in "[^%]*", value in "[^%\"]*") {
            let encoded = encode_with(EncodingScheme::Minimal, &name, &value, &CookieAttributes::default());
            let decoded = decode_with(&encoded, EncodingScheme::Minimal);
            prop_assert_eq!(decoded.len(), 1);
            prop_assert_eq!(decoded.get(&name), Some(&value));
        }

        #[test]
        fn uri_component_round_trip(name in "\\PC*", value in "\\PC*") {
            let encoded = encode_with(EncodingScheme::UriComponent, &name, &value, &CookieAttributes::default());
            let decoded = decode_with(&encoded, EncodingScheme::UriComponent);
            prop_assert_eq!(decoded.len(), 1);
            prop_assert_eq!(decoded.get(&name), Some(&value));
        }
    }
}
