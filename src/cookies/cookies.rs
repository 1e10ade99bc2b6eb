//! Cookie core types.
//!
//! This module defines the immutable [`Cookie`] record, its identity
//! [`CookieKey`], and the type-erased handles used by the jar.
//!
//! # Concurrency model
//! - [`CookiePersistorHandle`] is `Arc<dyn CookiePersistor>`. Persistors take
//!   `&self` and manage their **own internal synchronization**.
//! - [`ClockHandle`] is `Arc<dyn Clock>`.
//! - The cache is *not* shared: a jar owns its cache behind its own mutex.
//!
//! # Example
//! ```rust
//! use gosub_cookie_jar::cookies::Cookie;
//!
//! let c = Cookie::builder("session", "abc123")
//!     .domain("example.com")
//!     .path("/")
//!     .expires_at(1_900_000_000_000)
//!     .secure(true)
//!     .http_only(true)
//!     .build();
//!
//! assert!(c.persistent());
//! assert!(c.matches(&"https://www.example.com/account".parse().unwrap()));
//! ```

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use url::Url;

use crate::cookies::clock::Clock;
use crate::cookies::store::CookiePersistor;

/// A handle to a cookie persistor.
///
/// Persistor implementations must be **`Send + Sync` and internally synchronized**,
/// since callers hold only `&self` when invoking trait methods.
pub type CookiePersistorHandle = Arc<dyn CookiePersistor>;

/// A handle to the clock a jar uses to decide expiry.
pub type ClockHandle = Arc<dyn Clock>;

/// Latest expiry a cookie may carry: 9999-12-31T23:59:59.999Z in epoch milliseconds.
pub const MAX_EXPIRES_AT: i64 = 253_402_300_799_999;

/// A cookie as held by the jar and written by persistors.
///
/// Cookies are immutable once built; the jar only ever replaces them. Two cookies
/// with the same [`CookieKey`] cannot coexist in a jar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cookie {
    name: String,
    value: String,
    /// Absolute expiry in epoch milliseconds. `None` marks a session cookie.
    expires_at: Option<i64>,
    domain: String,
    path: String,
    secure: bool,
    http_only: bool,
    host_only: bool,
}

impl Cookie {
    /// Starts building a cookie. Without further calls this is a session cookie
    /// on path `/` with no domain, which matches no request.
    pub fn builder(name: impl Into<String>, value: impl Into<String>) -> CookieBuilder {
        CookieBuilder {
            inner: Cookie {
                name: name.into(),
                value: value.into(),
                expires_at: None,
                domain: String::new(),
                path: "/".to_string(),
                secure: false,
                http_only: false,
                host_only: false,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Expiry in epoch milliseconds, or `None` for a session cookie.
    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    pub fn http_only(&self) -> bool {
        self.http_only
    }

    pub fn host_only(&self) -> bool {
        self.host_only
    }

    /// True when the cookie carries a real expiry and therefore survives restarts.
    pub fn persistent(&self) -> bool {
        self.expires_at.is_some()
    }

    /// True when the expiry lies strictly before `now_millis`. Session cookies
    /// never expire here.
    pub fn is_expired(&self, now_millis: i64) -> bool {
        matches!(self.expires_at, Some(at) if at < now_millis)
    }

    /// Identity of this cookie inside a cache or persistor.
    pub fn key(&self) -> CookieKey {
        CookieKey {
            name: self.name.clone(),
            domain: self.domain.clone(),
            path: self.path.clone(),
        }
    }

    /// Whether this cookie should be sent with a request to `url`.
    ///
    /// Applies domain matching (exact for host-only cookies, suffix otherwise),
    /// path matching, and the `Secure` scheme restriction.
    pub fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };

        let domain_match = if self.host_only {
            host.eq_ignore_ascii_case(&self.domain)
        } else {
            domain_match(host, &self.domain)
        };

        domain_match && path_match(url.path(), &self.path) && (!self.secure || url.scheme() == "https")
    }

    /// `name=value` as sent in a `Cookie` request header.
    pub fn header_pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if let Some(at) = self.expires_at {
            write!(f, "; expires_at={at}")?;
        }
        if !self.host_only {
            write!(f, "; domain={}", self.domain)?;
        }
        write!(f, "; path={}", self.path)?;
        if self.secure {
            f.write_str("; secure")?;
        }
        if self.http_only {
            f.write_str("; httponly")?;
        }
        Ok(())
    }
}

/// Builder for [`Cookie`].
#[derive(Debug, Clone)]
pub struct CookieBuilder {
    inner: Cookie,
}

impl CookieBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut Cookie)) -> Self {
        f(&mut self.inner);
        self
    }

    /// Domain-scoped cookie (sent to `domain` and its subdomains).
    pub fn domain<S: Into<String>>(self, domain: S) -> Self {
        self.map(|c| {
            c.domain = normalize_domain(&domain.into());
            c.host_only = false;
        })
    }

    /// Host-only cookie (sent to exactly `host`).
    pub fn host_only_domain<S: Into<String>>(self, host: S) -> Self {
        self.map(|c| {
            c.domain = normalize_domain(&host.into());
            c.host_only = true;
        })
    }

    pub fn path<S: Into<String>>(self, path: S) -> Self { self.map(|c| c.path = path.into()) }
    pub fn secure(self, on: bool) -> Self { self.map(|c| c.secure = on) }
    pub fn http_only(self, on: bool) -> Self { self.map(|c| c.http_only = on) }

    /// Absolute expiry in epoch milliseconds; clamped to [`MAX_EXPIRES_AT`].
    pub fn expires_at(self, millis: i64) -> Self { self.map(|c| c.expires_at = Some(millis.min(MAX_EXPIRES_AT))) }

    /// Turns the cookie back into a session cookie.
    pub fn session(self) -> Self { self.map(|c| c.expires_at = None) }

    pub fn build(self) -> Cookie {
        self.inner
    }
}

/// Identity of a cookie: `(name, domain, path)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CookieKey {
    pub name: String,
    pub domain: String,
    pub path: String,
}

impl fmt::Display for CookieKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}|{}", self.domain, self.path, self.name)
    }
}

pub(crate) fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Suffix domain match: `host` equals `domain` or is a subdomain of it. IP
/// addresses only match exactly.
pub(crate) fn domain_match(host: &str, domain: &str) -> bool {
    if host.eq_ignore_ascii_case(domain) {
        return true;
    }

    let host = host.to_ascii_lowercase();
    host.ends_with(domain)
        && host.len() > domain.len()
        && host.as_bytes()[host.len() - domain.len() - 1] == b'.'
        && host.trim_matches(|c| c == '[' || c == ']').parse::<IpAddr>().is_err()
}

fn path_match(request_path: &str, cookie_path: &str) -> bool {
    if request_path == cookie_path {
        return true;
    }

    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/') || request_path.as_bytes().get(cookie_path.len()) == Some(&b'/'))
}
