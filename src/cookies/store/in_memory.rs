use std::sync::{Mutex, PoisonError};

use indexmap::IndexMap;

use crate::cookies::store::CookiePersistor;
use crate::cookies::{Cookie, CookieKey};
use crate::errors::PersistorError;

/// Persistor that keeps cookies in memory only. Used for private profiles and tests.
#[derive(Debug, Default)]
pub struct InMemoryCookiePersistor {
    cookies: Mutex<IndexMap<CookieKey, Cookie>>,
}

impl InMemoryCookiePersistor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored cookies.
    pub fn len(&self) -> usize {
        self.cookies.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CookiePersistor for InMemoryCookiePersistor {
    fn load_all(&self) -> Result<Vec<Cookie>, PersistorError> {
        let cookies = self.cookies.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(cookies.values().cloned().collect())
    }

    fn save_all(&self, cookies: &[Cookie]) -> Result<(), PersistorError> {
        let mut stored = self.cookies.lock().unwrap_or_else(PoisonError::into_inner);
        for cookie in cookies {
            stored.insert(cookie.key(), cookie.clone());
        }
        Ok(())
    }

    fn remove_all(&self, cookies: &[Cookie]) -> Result<(), PersistorError> {
        let mut stored = self.cookies.lock().unwrap_or_else(PoisonError::into_inner);
        for cookie in cookies {
            stored.shift_remove(&cookie.key());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistorError> {
        self.cookies.lock().unwrap_or_else(PoisonError::into_inner).clear();
        Ok(())
    }
}
