//! A persistent cookie jar for HTTP clients.
//!
//! Cookies received in responses are cached in memory and, when they carry an
//! expiry, written through to a durable [`CookiePersistor`](cookies::CookiePersistor).
//! On the next start the jar reloads them, so logins survive restarts while
//! per-request lookups stay in memory.
//!
//! ```rust
//! use std::sync::Arc;
//! use gosub_cookie_jar::cookies::{Cookie, CookieJar, InMemoryCookiePersistor, PersistentCookieJar};
//!
//! let jar = PersistentCookieJar::new(Arc::new(InMemoryCookiePersistor::new()));
//! let url = "https://example.com/".parse().unwrap();
//!
//! let sid = Cookie::parse(&url, "sid=abc; Max-Age=3600").unwrap();
//! jar.save_from_response(&url, &[sid]);
//!
//! assert_eq!(jar.load_for_request(&url).len(), 1);
//! ```

pub mod config;
pub mod cookies;
pub mod errors;

pub use cookies::*;
