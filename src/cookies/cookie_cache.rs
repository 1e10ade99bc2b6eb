//! In-memory cookie cache.
//!
//! A **cookie cache** holds the cookies a jar currently knows about, keyed by
//! [`CookieKey`]. Adding a cookie whose key is already present replaces the old
//! one.
//!
//! The cache is **not** internally synchronized. A
//! [`PersistentCookieJar`](crate::cookies::PersistentCookieJar) owns its cache
//! behind its own mutex, and never mutates the cache while iterating it: keys to
//! drop are collected during a scan and removed afterwards.

use indexmap::IndexMap;

use crate::cookies::{Cookie, CookieKey};

/// Container of the jar's current cookies.
pub trait CookieCache: Send {
    /// Inserts every cookie, replacing any existing cookie with the same key.
    fn add_all(&mut self, cookies: &[Cookie]);

    /// Removes the cookies with the same keys as `cookies`. Absent keys are ignored.
    fn remove_all(&mut self, cookies: &[Cookie]);

    /// Removes all cookies.
    fn clear(&mut self);

    /// Iterates the cached cookies in cache order.
    fn iter(&self) -> Box<dyn Iterator<Item = &Cookie> + '_>;

    /// Number of cached cookies.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Default cache: a set of cookies keyed by `(name, domain, path)`.
///
/// Iteration follows insertion order. A replaced cookie keeps the position of
/// the cookie it replaced.
#[derive(Debug, Clone, Default)]
pub struct SetCookieCache {
    cookies: IndexMap<CookieKey, Cookie>,
}

impl SetCookieCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieCache for SetCookieCache {
    fn add_all(&mut self, cookies: &[Cookie]) {
        for cookie in cookies {
            self.cookies.insert(cookie.key(), cookie.clone());
        }
    }

    fn remove_all(&mut self, cookies: &[Cookie]) {
        for cookie in cookies {
            self.cookies.shift_remove(&cookie.key());
        }
    }

    fn clear(&mut self) {
        self.cookies.clear();
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &Cookie> + '_> {
        Box::new(self.cookies.values())
    }

    fn len(&self) -> usize {
        self.cookies.len()
    }
}
