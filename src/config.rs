//! Cookie jar configuration.
//!
//! `CookieJarConfig` controls how a [`PersistentCookieJar`](crate::cookies::PersistentCookieJar)
//! schedules persistor I/O relative to its cache lock. It provides defaults via
//! [`Default`] and a fluent [`CookieJarConfig::builder()`].
//!
//! # Examples
//!
//! ```rust
//! use gosub_cookie_jar::config::{CookieJarConfig, PersistenceMode};
//!
//! let cfg = CookieJarConfig::builder()
//!     .persistence(PersistenceMode::Deferred)
//!     .build();
//! assert_eq!(cfg.persistence, PersistenceMode::Deferred);
//! ```

/// When persistor I/O runs relative to the jar's cache lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistenceMode {
    /// Persistor calls run while the cache lock is held. The persistor is never
    /// observed lagging behind the cache.
    #[default]
    Locked,
    /// The cache lock is released before persistor calls. A second lock keeps
    /// persistor calls in the same order as the cache mutations that caused them,
    /// but the persistor may briefly trail the cache. `clear` and `clear_session`
    /// still hold both locks.
    Deferred,
}

/// Configuration of a single cookie jar.
#[derive(Debug, Clone)]
pub struct CookieJarConfig {
    /// Scheduling of persistor I/O (default: [`PersistenceMode::Locked`]).
    pub persistence: PersistenceMode,
    /// Load the persisted cookies when the jar is built (default: `true`).
    pub initialize_on_build: bool,
}

impl Default for CookieJarConfig {
    fn default() -> Self {
        Self {
            persistence: PersistenceMode::default(),
            initialize_on_build: true,
        }
    }
}

impl CookieJarConfig {
    pub fn builder() -> CookieJarConfigBuilder {
        CookieJarConfigBuilder::default()
    }
}

/// Builder for [`CookieJarConfig`].
#[derive(Debug, Clone)]
pub struct CookieJarConfigBuilder {
    inner: CookieJarConfig,
}

impl Default for CookieJarConfigBuilder {
    fn default() -> Self {
        Self { inner: CookieJarConfig::default() }
    }
}

impl CookieJarConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut CookieJarConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn persistence(self, mode: PersistenceMode) -> Self { self.map(|c| c.persistence = mode) }
    pub fn initialize_on_build(self, on: bool) -> Self { self.map(|c| c.initialize_on_build = on) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut CookieJarConfig)) -> Self { self.map(f) }

    pub fn build(self) -> CookieJarConfig {
        self.inner
    }
}
