//! `reqwest` integration.
//!
//! [`PersistentCookieJar`] implements [`reqwest::cookie::CookieStore`], so a client
//! can use it as its cookie provider:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gosub_cookie_jar::cookies::{JsonCookiePersistor, PersistentCookieJar};
//!
//! let jar = Arc::new(PersistentCookieJar::new(Arc::new(JsonCookiePersistor::new(
//!     "cookies.json".into(),
//! ))));
//! let client = reqwest::Client::builder()
//!     .cookie_provider(jar.clone())
//!     .build()
//!     .expect("client");
//! ```

use http::HeaderValue;
use url::Url;

use crate::cookies::{Cookie, CookieJar, PersistentCookieJar};

impl reqwest::cookie::CookieStore for PersistentCookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let now = self.now_millis();
        let cookies: Vec<Cookie> = cookie_headers
            .filter_map(|h| h.to_str().ok())
            .filter_map(|h| Cookie::parse_at(now, url, h))
            .collect();

        if !cookies.is_empty() {
            self.save_from_response(url, &cookies);
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let header = self
            .load_for_request(url)
            .iter()
            .map(Cookie::header_pair)
            .collect::<Vec<_>>()
            .join("; ");

        if header.is_empty() {
            return None;
        }

        match HeaderValue::from_str(&header) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Dropping cookie header for {}: {}", url, e);
                None
            }
        }
    }
}
