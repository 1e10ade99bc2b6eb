//! Cookie jar abstraction.
//!
//! A **cookie jar** is what an HTTP client talks to at two hook points:
//! - before sending a request: [`CookieJar::load_for_request`] returns the
//!   cookies to attach;
//! - after receiving a response: [`CookieJar::save_from_response`] stores the
//!   cookies the server set.
//!
//! Implementations take `&self` and are internally synchronized, so a single jar
//! can be shared (`Arc<dyn CookieJar>`) by every connection of a client.
//!
//! See also: RFC 6265bis (HTTP State Management Mechanism).
use url::Url;

use crate::cookies::Cookie;

/// A cookie jar that can be shared between concurrent requests.
pub trait CookieJar: Send + Sync {
    /// Stores the cookies received in a response from `url`.
    ///
    /// Cookies replace existing cookies with the same `(name, domain, path)`.
    /// Never fails; persistence problems are logged.
    fn save_from_response(&self, url: &Url, cookies: &[Cookie]);

    /// Returns the unexpired cookies to send with a request to `url`.
    ///
    /// Expired cookies found along the way are evicted.
    fn load_for_request(&self, url: &Url) -> Vec<Cookie>;

    /// Drops all session cookies, keeping the persisted ones.
    fn clear_session(&self);

    /// Drops every cookie, in memory and on disk.
    fn clear(&self);

    /// Returns all cookies currently held, for inspection.
    fn all_cookies(&self) -> Vec<Cookie>;

    /// Removes every cookie that would be sent to `url`.
    fn remove_cookies_for_url(&self, url: &Url);
}
