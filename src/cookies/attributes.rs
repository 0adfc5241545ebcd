use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::errors::CookieError;

/// SameSite policy of a cookie. Rendered lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    /// Cross-site allowed. Browsers only accept this together with `Secure`.
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "strict",
            SameSite::Lax => "lax",
            SameSite::None => "none",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SameSite {
    type Err = CookieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("strict") {
            Ok(SameSite::Strict)
        } else if s.eq_ignore_ascii_case("lax") {
            Ok(SameSite::Lax)
        } else if s.eq_ignore_ascii_case("none") {
            Ok(SameSite::None)
        } else {
            Err(CookieError::UnknownSameSite(s.to_string()))
        }
    }
}

/// When a cookie expires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expires {
    /// Absolute point in time.
    At(OffsetDateTime),
    /// Days from the moment the cookie is encoded. Fractions and negative
    /// values are allowed; a negative offset produces an already-expired cookie.
    Days(f64),
}

impl From<OffsetDateTime> for Expires {
    fn from(at: OffsetDateTime) -> Self {
        Expires::At(at)
    }
}

/// Attributes appended after the encoded `name=value` pair.
///
/// Fields are public and unchecked: the codec writes whatever it is given.
/// Use [`CookieAttributes::builder`] to get a bag that browsers will accept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieAttributes {
    pub expires: Option<Expires>,
    pub domain: Option<String>,
    /// `None` lets [`CookieJar::set`](crate::cookies::CookieJar::set) inject
    /// its default path; `Some("")` suppresses the attribute entirely.
    pub path: Option<String>,
    pub secure: bool,
    pub same_site: Option<SameSite>,
    pub partitioned: bool,
}

impl CookieAttributes {
    pub fn builder() -> CookieAttributesBuilder {
        CookieAttributesBuilder::default()
    }

    /// Checks that `SameSite=None` and `Partitioned` are only used on secure cookies.
    pub fn validate(&self) -> Result<(), CookieError> {
        if self.same_site == Some(SameSite::None) && !self.secure {
            return Err(CookieError::InvalidAttributeCombination {
                reason: "SameSite=None requires Secure",
            });
        }
        if self.partitioned && !self.secure {
            return Err(CookieError::InvalidAttributeCombination {
                reason: "Partitioned requires Secure",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CookieAttributesBuilder {
    inner: CookieAttributes,
}

impl CookieAttributesBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut CookieAttributes)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn expires_at(self, at: OffsetDateTime) -> Self { self.map(|a| a.expires = Some(Expires::At(at))) }
    pub fn expires_in_days(self, days: f64) -> Self { self.map(|a| a.expires = Some(Expires::Days(days))) }
    pub fn domain<S: Into<String>>(self, domain: S) -> Self { self.map(|a| a.domain = Some(domain.into())) }
    pub fn path<S: Into<String>>(self, path: S) -> Self { self.map(|a| a.path = Some(path.into())) }
    pub fn secure(self, on: bool) -> Self { self.map(|a| a.secure = on) }
    pub fn same_site(self, same_site: SameSite) -> Self { self.map(|a| a.same_site = Some(same_site)) }
    pub fn partitioned(self, on: bool) -> Self { self.map(|a| a.partitioned = on) }

    /// Validate and build the final attribute bag.
    pub fn build(self) -> Result<CookieAttributes, CookieError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
