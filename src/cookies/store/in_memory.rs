use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};
use url::Url;

use crate::cookies::attributes::SameSite;
use crate::cookies::codec::SEGMENT_SEPARATOR;
use crate::cookies::store::CookieStore;

/// A cookie as held by [`InMemoryCookieStore`].
#[derive(Debug, Clone, PartialEq)]
struct Cookie {
    name: String,
    /// Raw (still encoded) value.
    value: String,
    /// Effective domain: the `Domain` attribute, or the page host.
    domain: String,
    /// Set when the cookie carried no `Domain` and only matches `domain` exactly.
    host_only: bool,
    path: String,
    secure: bool,
    /// Session cookie when `None`.
    expires: Option<OffsetDateTime>,
    same_site: Option<SameSite>,
    partitioned: bool,
}

impl Cookie {
    fn same_slot(&self, other: &Cookie) -> bool {
        self.name == other.name && self.domain == other.domain && self.path == other.path
    }

    fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires.is_some_and(|at| at <= now)
    }

    fn matches_host(&self, host: &str) -> bool {
        if self.host_only {
            self.domain == host
        } else {
            domain_matches(host, &self.domain)
        }
    }
}

/// In-memory cookie store that behaves like `document.cookie` for one page.
///
/// Cookies are keyed by `(name, domain, path)`, where a host-only cookie's
/// domain is the page host. Writes that a browser would
/// refuse (foreign `Domain`, `Secure` from an insecure page, `SameSite=None`
/// or `Partitioned` without `Secure`) are ignored, and
/// writing an already-expired cookie deletes the stored one.
pub struct InMemoryCookieStore {
    /// Page the store acts for.
    url: Url,
    cookies: RwLock<Vec<Cookie>>,
}

impl InMemoryCookieStore {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            cookies: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored cookies, including ones that expired since they were written.
    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.write_guard().clear();
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, Vec<Cookie>> {
        self.cookies.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Vec<Cookie>> {
        self.cookies.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn host(&self) -> String {
        self.url.host_str().unwrap_or_default().to_ascii_lowercase()
    }

    fn is_secure_context(&self) -> bool {
        self.url.scheme() == "https" || matches!(self.url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"))
    }

    /// Directory of the page path, used when a cookie carries no `Path`.
    fn default_path(&self) -> &str {
        self.url
            .path()
            .rsplit_once('/')
            .map_or("/", |(dir, _)| if dir.is_empty() { "/" } else { dir })
    }

    fn parse(&self, cookie_str: &str) -> Option<Cookie> {
        let mut parts = cookie_str.split(';');
        let pair = parts.next()?;
        let (name, value) = pair.split_once('=').unwrap_or(("", pair));

        let mut cookie = Cookie {
            name: name.trim().to_string(),
            value: value.trim().to_string(),
            domain: self.host(),
            host_only: true,
            path: self.default_path().to_string(),
            secure: false,
            expires: None,
            same_site: None,
            partitioned: false,
        };

        for part in parts {
            let part = part.trim();
            if let Some((k, v)) = part.split_once('=') {
                let v = v.trim();
                match k.trim().to_ascii_lowercase().as_str() {
                    "path" if v.starts_with('/') => cookie.path = v.to_string(),
                    "domain" if !v.is_empty() => {
                        cookie.domain = v.trim_start_matches('.').to_ascii_lowercase();
                        cookie.host_only = false;
                    }
                    "expires" => cookie.expires = parse_http_date(v),
                    "samesite" => cookie.same_site = v.parse().ok(),
                    _ => {}
                }
            } else if part.eq_ignore_ascii_case("secure") {
                cookie.secure = true;
            } else if part.eq_ignore_ascii_case("partitioned") {
                cookie.partitioned = true;
            }
        }

        Some(cookie)
    }
}

impl CookieStore for InMemoryCookieStore {
    fn read(&self) -> String {
        let now = OffsetDateTime::now_utc();
        let host = self.host();
        let path = self.url.path();
        let secure = self.is_secure_context();

        self.read_guard()
            .iter()
            .filter(|cookie| !cookie.is_expired(now))
            .filter(|cookie| cookie.matches_host(&host))
            .filter(|cookie| path_matches(path, &cookie.path))
            .filter(|cookie| !cookie.secure || secure)
            .map(|cookie| match cookie.name.as_str() {
                "" => cookie.value.clone(),
                name => format!("{name}={}", cookie.value),
            })
            .collect::<Vec<_>>()
            .join(SEGMENT_SEPARATOR)
    }

    fn write(&self, cookie_str: &str) {
        let Some(cookie) = self.parse(cookie_str) else {
            log::debug!("ignoring unparsable cookie {cookie_str:?}");
            return;
        };

        if !cookie.host_only && !domain_matches(&self.host(), &cookie.domain) {
            log::debug!("rejecting cookie {:?}: domain {} does not match {}", cookie.name, cookie.domain, self.url);
            return;
        }

        if cookie.secure && !self.is_secure_context() {
            log::debug!("rejecting secure cookie {:?} from insecure page {}", cookie.name, self.url);
            return;
        }

        if !cookie.secure && (cookie.partitioned || cookie.same_site == Some(SameSite::None)) {
            log::debug!("rejecting cookie {:?}: SameSite=None and Partitioned require Secure", cookie.name);
            return;
        }

        let mut cookies = self.write_guard();
        let existing = cookies.iter().position(|c| c.same_slot(&cookie));

        if cookie.is_expired(OffsetDateTime::now_utc()) {
            if let Some(idx) = existing {
                log::debug!("expiring cookie {:?}", cookie.name);
                cookies.remove(idx);
            }
            return;
        }

        // Replace in place so read order stays stable.
        match existing {
            Some(idx) => cookies[idx] = cookie,
            None => cookies.push(cookie),
        }
    }
}

fn domain_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

fn path_matches(request_path: &str, cookie_path: &str) -> bool {
    if request_path == cookie_path {
        return true;
    }
    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/') || request_path[cookie_path.len()..].starts_with('/'))
}

/// Parses an IMF-fixdate. Anything else yields `None` and the cookie is kept
/// as a session cookie.
fn parse_http_date(value: &str) -> Option<OffsetDateTime> {
    PrimitiveDateTime::parse(
        value,
        format_description!("[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"),
    )
    .ok()
    .map(PrimitiveDateTime::assume_utc)
}
