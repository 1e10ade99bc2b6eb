//! Cookie persistence infrastructure.
//!
//! A **cookie persistor** is the durable side of a
//! [`PersistentCookieJar`](crate::cookies::PersistentCookieJar). It only ever
//! holds *persistent* cookies; session cookies live in the jar's cache alone.
//!
//! This module exports these implementations:
//! - [`InMemoryCookiePersistor`]: no durability, for tests and private profiles.
//! - [`JsonCookiePersistor`]: one JSON file of codec records (simple setups).
//! - [`SqliteCookiePersistor`]: SQLite database of codec records (feature
//!   `sqlite_cookie_store`, good for concurrency and scale).
//! - [`BlockingPersistor`]: drives an [`AsyncCookiePersistor`] to completion so
//!   async backends can sit behind the synchronous jar.
//!
//! ## Design notes
//! - Implementations must be `Send + Sync` and internally synchronized.
//! - `remove_all` of absent cookies and repeated `clear` calls must be no-ops.
//! - A record that fails to decode is skipped (and logged) by `load_all`; it
//!   never fails the whole load.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use gosub_cookie_jar::cookies::{JsonCookiePersistor, PersistentCookieJar};
//!
//! let persistor = Arc::new(JsonCookiePersistor::new("cookies.json".into()));
//! let jar = PersistentCookieJar::new(persistor);
//! ```
mod blocking;
mod in_memory;
mod json;
#[cfg(feature = "sqlite_cookie_store")]
mod sqlite;

use crate::cookies::Cookie;
use crate::errors::PersistorError;

pub use blocking::{AsyncCookiePersistor, BlockingPersistor};
/// In-memory persistor (no durability).
pub use in_memory::InMemoryCookiePersistor;
/// File-backed JSON persistor.
pub use json::JsonCookiePersistor;
/// SQLite-backed persistor.
#[cfg(feature = "sqlite_cookie_store")]
pub use sqlite::SqliteCookiePersistor;

/// Durable store for persistent cookies.
///
/// Cookies are identified by [`Cookie::key`]; saving a cookie whose key is
/// already stored replaces it.
pub trait CookiePersistor: Send + Sync {
    /// Returns every stored cookie. Records that cannot be decoded are skipped.
    fn load_all(&self) -> Result<Vec<Cookie>, PersistorError>;

    /// Stores `cookies`, replacing stored cookies with the same keys.
    fn save_all(&self, cookies: &[Cookie]) -> Result<(), PersistorError>;

    /// Removes the stored cookies with the same keys as `cookies`.
    fn remove_all(&self, cookies: &[Cookie]) -> Result<(), PersistorError>;

    /// Removes every stored cookie.
    fn clear(&self) -> Result<(), PersistorError>;
}
