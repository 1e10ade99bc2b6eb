//! `Set-Cookie` parsing.
//!
//! Turns response headers into [`Cookie`] records the jar can store. The parser
//! handles a subset of RFC 6265:
//! - `Expires` (IMF-fixdate, plus the common `dd-Mon-yyyy` variant),
//! - `Max-Age` (wins over `Expires`; zero or negative means already expired),
//! - `Domain` (leading dot stripped, must domain-match the request host),
//! - `Path` (must start with `/`, otherwise the default path is used),
//! - `Secure` and `HttpOnly`.
//!
//! Unknown attributes (including `SameSite`) are ignored. There is no
//! public-suffix check.

use http::HeaderMap;
use time::macros::format_description;
use time::PrimitiveDateTime;
use url::Url;

use crate::cookies::clock::{Clock, SystemClock};
use crate::cookies::cookies::{domain_match, normalize_domain, Cookie, MAX_EXPIRES_AT};

impl Cookie {
    /// Parses a single `Set-Cookie` value received from `url`, using the
    /// system clock to resolve `Max-Age`.
    ///
    /// Returns `None` when the header is not a valid cookie for `url`.
    pub fn parse(url: &Url, set_cookie: &str) -> Option<Cookie> {
        Self::parse_at(SystemClock.now_millis(), url, set_cookie)
    }

    /// Like [`Cookie::parse`], with `now_millis` as the current time.
    pub fn parse_at(now_millis: i64, url: &Url, set_cookie: &str) -> Option<Cookie> {
        let host = url.host_str()?;

        let mut parts = set_cookie.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut expires: Option<i64> = None;
        let mut max_age: Option<i64> = None;
        let mut domain: Option<String> = None;
        let mut path: Option<String> = None;
        let mut secure = false;
        let mut http_only = false;

        for part in parts {
            let part = part.trim();
            let (attr, attr_value) = match part.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim()),
                None => (part, ""),
            };

            match attr.to_ascii_lowercase().as_str() {
                "expires" => {
                    if let Some(at) = parse_http_date(attr_value) {
                        expires = Some(at);
                    }
                }
                "max-age" => {
                    if let Some(seconds) = parse_max_age(attr_value) {
                        max_age = Some(seconds);
                    }
                }
                "domain" => {
                    let d = normalize_domain(attr_value);
                    if !d.is_empty() {
                        domain = Some(d);
                    }
                }
                "path" => {
                    if attr_value.starts_with('/') {
                        path = Some(attr_value.to_string());
                    }
                }
                "secure" => secure = true,
                "httponly" => http_only = true,
                _ => {}
            }
        }

        let expires_at = match max_age {
            Some(seconds) if seconds <= 0 => Some(i64::MIN),
            Some(seconds) => Some(now_millis.saturating_add(seconds.saturating_mul(1000)).min(MAX_EXPIRES_AT)),
            None => expires,
        };

        let builder = Cookie::builder(name, value.trim());
        let builder = match domain {
            Some(d) if domain_match(host, &d) => builder.domain(d),
            Some(d) => {
                log::debug!("Rejecting cookie '{}': domain '{}' does not match host '{}'", name, d, host);
                return None;
            }
            None => builder.host_only_domain(host),
        };

        let builder = builder
            .path(path.unwrap_or_else(|| default_path(url)))
            .secure(secure)
            .http_only(http_only);

        Some(match expires_at {
            Some(at) => builder.expires_at(at).build(),
            None => builder.build(),
        })
    }

    /// Parses every `Set-Cookie` header in `headers`, skipping invalid ones.
    pub fn parse_all(url: &Url, headers: &HeaderMap) -> Vec<Cookie> {
        let now = SystemClock.now_millis();
        headers
            .get_all(http::header::SET_COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .filter_map(|h| Cookie::parse_at(now, url, h))
            .collect()
    }
}

/// Directory of the request path, as used when a cookie has no `Path`.
fn default_path(url: &Url) -> String {
    url.path()
        .rsplit_once('/')
        .map_or("/", |(dir, _)| if dir.is_empty() { "/" } else { dir })
        .to_string()
}

fn parse_max_age(value: &str) -> Option<i64> {
    match value.parse::<i64>() {
        Ok(seconds) => Some(seconds),
        // All digits but too large for i64.
        Err(_) if !value.is_empty() && value.trim_start_matches('-').bytes().all(|b| b.is_ascii_digit()) => {
            Some(if value.starts_with('-') { i64::MIN } else { i64::MAX })
        }
        Err(_) => None,
    }
}

/// Parses an HTTP date into epoch milliseconds.
fn parse_http_date(value: &str) -> Option<i64> {
    let parsed = PrimitiveDateTime::parse(
        value,
        format_description!("[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            value,
            format_description!("[weekday repr:short], [day]-[month repr:short]-[year] [hour]:[minute]:[second] GMT"),
        )
    })
    .ok()?;

    Some(parsed.assume_utc().unix_timestamp().saturating_mul(1000).min(MAX_EXPIRES_AT))
}
