//! Renders a [`CookieAttributes`] bag into the `; Name=Value` suffix of a cookie string.
//!
//! Emission order is fixed: `Expires`, `Domain`, `Path`, `Secure`, `SameSite`,
//! `Partitioned`. Absent or empty attributes produce nothing; there are no
//! error conditions.
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::cookies::attributes::{CookieAttributes, Expires, SameSite};

const MS_PER_DAY: f64 = 864e5;

/// Largest instant (in ms from the epoch) an ECMAScript `Date` can hold.
const MAX_TIME_MS: f64 = 864e13;

/// Serializes `attrs`, resolving relative expiry against the current time.
pub fn serialize(attrs: &CookieAttributes) -> String {
    serialize_at(attrs, OffsetDateTime::now_utc())
}

/// Serializes `attrs`, resolving relative expiry against `now`.
///
/// `attrs` is only borrowed; the resolved expiry never leaks back into it.
pub fn serialize_at(attrs: &CookieAttributes, now: OffsetDateTime) -> String {
    let mut out = String::new();

    if let Some(at) = attrs.expires.and_then(|expires| resolve_expires(expires, now)) {
        match http_date(at) {
            Ok(date) => push_value(&mut out, "Expires", Some(date.as_str())),
            Err(e) => log::warn!("omitting Expires attribute, cannot render {at}: {e}"),
        }
    }

    push_value(&mut out, "Domain", attrs.domain.as_deref());
    push_value(&mut out, "Path", attrs.path.as_deref());
    push_flag(&mut out, "Secure", attrs.secure);
    push_value(&mut out, "SameSite", attrs.same_site.as_ref().map(SameSite::as_str));
    push_flag(&mut out, "Partitioned", attrs.partitioned);

    out
}

/// Turns an [`Expires`] into an absolute instant.
///
/// Relative offsets are truncated to whole milliseconds and clamped to the
/// ECMAScript time range. Returns `None` for a NaN offset.
pub fn resolve_expires(expires: Expires, now: OffsetDateTime) -> Option<OffsetDateTime> {
    match expires {
        Expires::At(at) => Some(at),
        Expires::Days(days) => {
            let now_ms = now.unix_timestamp_nanos().div_euclid(1_000_000) as f64;
            let ms = (now_ms + days * MS_PER_DAY).clamp(-MAX_TIME_MS, MAX_TIME_MS);
            if ms.is_nan() {
                return None;
            }
            OffsetDateTime::from_unix_timestamp_nanos(ms.trunc() as i128 * 1_000_000).ok()
        }
    }
}

/// Formats `at` as an IMF-fixdate, e.g. `Fri, 22 Mar 2024 12:30:45 GMT`.
///
/// The year is written without a sign so dates past 9999 look the way
/// browsers print them.
pub fn http_date(at: OffsetDateTime) -> Result<String, time::error::Format> {
    let at = at.to_offset(UtcOffset::UTC);
    let day_and_month = at.format(format_description!("[weekday repr:short], [day] [month repr:short]"))?;
    let clock = at.format(format_description!("[hour]:[minute]:[second]"))?;

    let year = at.year();
    let year = if year < 0 {
        format!("-{:04}", -year)
    } else {
        format!("{year:04}")
    };

    Ok(format!("{day_and_month} {year} {clock} GMT"))
}

fn push_value(out: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        out.push_str("; ");
        out.push_str(name);
        out.push('=');
        out.push_str(value);
    }
}

// Boolean attributes carry no value.
fn push_flag(out: &mut String, name: &str, on: bool) {
    if on {
        out.push_str("; ");
        out.push_str(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use time::Duration;

    const NOW: OffsetDateTime = datetime!(2024-03-01 12:30:45.250 UTC);

    #[test]
    fn empty_bag_serializes_to_nothing() {
        assert_eq!(serialize_at(&CookieAttributes::default(), NOW), "");
    }

    #[test]
    fn relative_expiry_in_days() {
        let attrs = CookieAttributes { expires: Some(Expires::Days(21.0)), ..Default::default() };
        assert_eq!(serialize_at(&attrs, NOW), "; Expires=Fri, 22 Mar 2024 12:30:45 GMT");
    }

    #[test]
    fn fractional_days_resolve_to_hours() {
        let resolved = resolve_expires(Expires::Days(0.5), NOW).unwrap();
        assert_eq!(resolved, NOW + Duration::hours(12));
    }

    #[test]
    fn negative_and_zero_days_still_render() {
        let yesterday = CookieAttributes { expires: Some(Expires::Days(-1.0)), ..Default::default() };
        assert_eq!(serialize_at(&yesterday, NOW), "; Expires=Thu, 29 Feb 2024 12:30:45 GMT");

        let now = CookieAttributes { expires: Some(Expires::Days(0.0)), ..Default::default() };
        assert_eq!(serialize_at(&now, NOW), "; Expires=Fri, 01 Mar 2024 12:30:45 GMT");
    }

    #[test]
    fn relative_expiry_is_clamped() {
        let resolved = resolve_expires(Expires::Days(1e12), NOW).unwrap();
        assert_eq!(resolved.unix_timestamp(), 8_640_000_000_000);
        assert_eq!(http_date(resolved).unwrap(), "Sat, 13 Sep 275760 00:00:00 GMT");

        assert_eq!(resolve_expires(Expires::Days(f64::NAN), NOW), None);
    }

    #[test]
    fn absolute_expiry_is_rendered_in_gmt() {
        let at = datetime!(2024-03-01 14:00:00 +02:00);
        let attrs = CookieAttributes { expires: Some(at.into()), ..Default::default() };
        assert_eq!(serialize_at(&attrs, NOW), "; Expires=Fri, 01 Mar 2024 12:00:00 GMT");
    }

    #[test]
    fn attributes_follow_fixed_order() {
        let attrs = CookieAttributes {
            expires: Some(Expires::Days(1.0)),
            domain: Some("example.com".into()),
            path: Some("/".into()),
            secure: true,
            same_site: Some(SameSite::Strict),
            partitioned: true,
        };
        assert_eq!(
            serialize_at(&attrs, NOW),
            "; Expires=Sat, 02 Mar 2024 12:30:45 GMT; Domain=example.com; Path=/; Secure; SameSite=strict; Partitioned"
        );
    }

    #[test]
    fn empty_strings_and_false_flags_are_omitted() {
        let attrs = CookieAttributes {
            domain: Some(String::new()),
            path: Some(String::new()),
            secure: false,
            partitioned: false,
            ..Default::default()
        };
        assert_eq!(serialize_at(&attrs, NOW), "");
    }

    #[test]
    fn serializing_leaves_bag_untouched() {
        let attrs = CookieAttributes { expires: Some(Expires::Days(3.0)), path: Some("/".into()), ..Default::default() };
        let before = attrs.clone();
        let _ = serialize(&attrs);
        assert_eq!(attrs, before);
    }
}
