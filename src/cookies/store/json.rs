//! JSON-backed cookie persistor.
//!
//! `JsonCookiePersistor` keeps all persistent cookies in a single JSON file on
//! disk. Each cookie is stored as one codec record next to the fields of its
//! [`CookieKey`](crate::cookies::CookieKey):
//!
//! ```json
//! { "version": 1, "cookies": [
//!     { "name": "sid", "domain": "example.com", "path": "/", "record": "0100000003736964..." }
//! ] }
//! ```
//!
//! ### Concurrency
//! - Internally synchronized via a `Mutex`; every operation is a full
//!   read-modify-write of the file under that lock.
//!
//! ### I/O characteristics & caveats
//! - Every write **rewrites** the whole file. For large cookie sets, consider the
//!   SQLite-backed persistor.
//! - Writes go to a temporary file in the same directory which is then renamed
//!   over the target, so a crash never leaves a half-written file.
//! - A missing file reads as empty. A file that is not valid JSON is an error;
//!   a single record that fails to decode is skipped.
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::cookies::codec::{BinaryCookieCodec, CookieCodec};
use crate::cookies::store::CookiePersistor;
use crate::cookies::{Cookie, CookieKey};
use crate::errors::PersistorError;

const FILE_VERSION: u8 = 1;

/// On-disk representation of the persisted cookies.
#[derive(Debug, Serialize, Deserialize)]
struct CookieFile {
    version: u8,
    cookies: Vec<CookieEntry>,
}

impl Default for CookieFile {
    fn default() -> Self {
        Self { version: FILE_VERSION, cookies: Vec::new() }
    }
}

/// One stored cookie. The key fields are kept apart so no two keys can share
/// an entry.
#[derive(Debug, Serialize, Deserialize)]
struct CookieEntry {
    name: String,
    domain: String,
    path: String,
    record: String,
}

impl CookieEntry {
    fn key(&self) -> CookieKey {
        CookieKey {
            name: self.name.clone(),
            domain: self.domain.clone(),
            path: self.path.clone(),
        }
    }
}

/// Codec records by cookie key, in file order.
type Records = IndexMap<CookieKey, String>;

/// A JSON-file cookie persistor.
pub struct JsonCookiePersistor {
    /// Path to the JSON file where cookies are stored.
    path: PathBuf,
    /// Record format for single cookies.
    codec: Box<dyn CookieCodec>,
    /// Serializes read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl JsonCookiePersistor {
    /// Creates a persistor for `path` using [`BinaryCookieCodec`] records.
    ///
    /// The file is not touched until the first operation.
    pub fn new(path: PathBuf) -> Self {
        Self::with_codec(path, Box::new(BinaryCookieCodec))
    }

    pub fn with_codec(path: PathBuf, codec: Box<dyn CookieCodec>) -> Self {
        Self { path, codec, lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_file(&self) -> Result<CookieFile, PersistorError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CookieFile::default()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(CookieFile::default());
        }

        Ok(serde_json::from_str(&contents)?)
    }

    fn save_file(&self, file: &CookieFile) -> Result<(), PersistorError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let contents = serde_json::to_vec_pretty(file)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&contents)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Records) -> Result<(), PersistorError>) -> Result<(), PersistorError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let file = self.load_file()?;

        let mut records: Records = file.cookies.into_iter().map(|e| (e.key(), e.record)).collect();
        f(&mut records)?;

        let cookies = records
            .into_iter()
            .map(|(key, record)| CookieEntry {
                name: key.name,
                domain: key.domain,
                path: key.path,
                record,
            })
            .collect();
        self.save_file(&CookieFile { version: FILE_VERSION, cookies })
    }
}

impl CookiePersistor for JsonCookiePersistor {
    fn load_all(&self) -> Result<Vec<Cookie>, PersistorError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let file = self.load_file()?;

        let cookies = file
            .cookies
            .iter()
            .filter_map(|entry| match self.codec.decode(&entry.record) {
                Ok(cookie) => Some(cookie),
                Err(e) => {
                    log::warn!("Skipping cookie record '{}' in {}: {}", entry.key(), self.path.display(), e);
                    None
                }
            })
            .collect();

        Ok(cookies)
    }

    fn save_all(&self, cookies: &[Cookie]) -> Result<(), PersistorError> {
        if cookies.is_empty() {
            return Ok(());
        }

        self.update(|records| {
            for cookie in cookies {
                records.insert(cookie.key(), self.codec.encode(cookie)?);
            }
            Ok(())
        })
    }

    fn remove_all(&self, cookies: &[Cookie]) -> Result<(), PersistorError> {
        if cookies.is_empty() {
            return Ok(());
        }

        self.update(|records| {
            for cookie in cookies {
                records.shift_remove(&cookie.key());
            }
            Ok(())
        })
    }

    fn clear(&self) -> Result<(), PersistorError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.save_file(&CookieFile::default())
    }
}
