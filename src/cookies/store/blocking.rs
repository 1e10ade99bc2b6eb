//! Adapter for asynchronous persistence backends.
//!
//! The jar's persistor calls are synchronous and must complete before the jar
//! call returns, otherwise the persistor could end up holding cookies the cache
//! no longer has. [`BlockingPersistor`] satisfies that by driving each future of
//! an [`AsyncCookiePersistor`] to completion on the calling thread.
//!
//! The wrapped futures must not depend on being polled by a specific runtime
//! (e.g. tokio I/O resources); run those backends on their own runtime and
//! hand results over through a channel instead.

use futures::executor::block_on;

use crate::cookies::store::CookiePersistor;
use crate::cookies::Cookie;
use crate::errors::PersistorError;

/// Asynchronous counterpart of [`CookiePersistor`].
#[async_trait::async_trait]
pub trait AsyncCookiePersistor: Send + Sync {
    async fn load_all(&self) -> Result<Vec<Cookie>, PersistorError>;
    async fn save_all(&self, cookies: &[Cookie]) -> Result<(), PersistorError>;
    async fn remove_all(&self, cookies: &[Cookie]) -> Result<(), PersistorError>;
    async fn clear(&self) -> Result<(), PersistorError>;
}

/// Exposes an [`AsyncCookiePersistor`] as a synchronous [`CookiePersistor`].
#[derive(Debug, Default)]
pub struct BlockingPersistor<P> {
    inner: P,
}

impl<P: AsyncCookiePersistor> BlockingPersistor<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: AsyncCookiePersistor> CookiePersistor for BlockingPersistor<P> {
    fn load_all(&self) -> Result<Vec<Cookie>, PersistorError> {
        block_on(self.inner.load_all())
    }

    fn save_all(&self, cookies: &[Cookie]) -> Result<(), PersistorError> {
        block_on(self.inner.save_all(cookies))
    }

    fn remove_all(&self, cookies: &[Cookie]) -> Result<(), PersistorError> {
        block_on(self.inner.remove_all(cookies))
    }

    fn clear(&self) -> Result<(), PersistorError> {
        block_on(self.inner.clear())
    }
}
