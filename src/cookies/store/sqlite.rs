//! SQLite-backed cookie persistor.
//!
//! `SqliteCookiePersistor` stores every persistent cookie as one row in a
//! single SQLite database.
//!
//! ## Design
//! - One **table** (`cookies`) keyed by `(name, domain, path)`; the cookie itself
//!   lives in a codec `record` column so a damaged row can be skipped alone.
//! - Database access is via an `r2d2` pool for safe multi-threaded use.
//! - `save_all` and `remove_all` run in one transaction each.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use gosub_cookie_jar::cookies::{PersistentCookieJar, SqliteCookiePersistor};
//!
//! let persistor = SqliteCookiePersistor::new("cookies.sqlite".into()).expect("cookie database");
//! let jar = PersistentCookieJar::new(Arc::new(persistor));
//! ```

use std::path::PathBuf;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::rusqlite::{params, OpenFlags};
use r2d2_sqlite::SqliteConnectionManager;

use crate::cookies::codec::{BinaryCookieCodec, CookieCodec};
use crate::cookies::store::CookiePersistor;
use crate::cookies::Cookie;
use crate::errors::PersistorError;

/// A SQLite-based cookie persistor.
pub struct SqliteCookiePersistor {
    /// Connection pool for SQLite database (so it can run multithreaded)
    pool: Pool<SqliteConnectionManager>,
    /// Record format for the `record` column.
    codec: Box<dyn CookieCodec>,
}

impl SqliteCookiePersistor {
    /// Opens (or creates) a SQLite database at `path` and ensures the schema exists.
    pub fn new(path: PathBuf) -> Result<Self, PersistorError> {
        Self::with_codec(path, Box::new(BinaryCookieCodec))
    }

    pub fn with_codec(path: PathBuf, codec: Box<dyn CookieCodec>) -> Result<Self, PersistorError> {
        let manager = SqliteConnectionManager::file(path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
            .with_init(|c| {
                c.busy_timeout(Duration::from_millis(500))?;
                c.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
                Ok(())
            });

        let pool = Pool::builder()
            .max_size(8)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;

        pool.get()?.execute_batch(
            "CREATE TABLE IF NOT EXISTS cookies (
                name TEXT NOT NULL,
                domain TEXT NOT NULL,
                path TEXT NOT NULL,
                record TEXT NOT NULL,
                PRIMARY KEY (name, domain, path)
            );",
        )?;

        Ok(Self { pool, codec })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, PersistorError> {
        Ok(self.pool.get()?)
    }
}

impl CookiePersistor for SqliteCookiePersistor {
    fn load_all(&self) -> Result<Vec<Cookie>, PersistorError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT name, domain, path, record FROM cookies ORDER BY rowid")?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut cookies = Vec::new();
        for row in rows {
            let (name, domain, path, record) = row?;
            match self.codec.decode(&record) {
                Ok(cookie) => cookies.push(cookie),
                Err(e) => log::warn!("Skipping cookie record {}{}|{}: {}", domain, path, name, e),
            }
        }

        Ok(cookies)
    }

    fn save_all(&self, cookies: &[Cookie]) -> Result<(), PersistorError> {
        if cookies.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO cookies (name, domain, path, record) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(name, domain, path) DO UPDATE SET record = excluded.record",
            )?;

            for cookie in cookies {
                let record = self.codec.encode(cookie)?;
                stmt.execute(params![cookie.name(), cookie.domain(), cookie.path(), record])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn remove_all(&self, cookies: &[Cookie]) -> Result<(), PersistorError> {
        if cookies.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare("DELETE FROM cookies WHERE name = ?1 AND domain = ?2 AND path = ?3")?;
            for cookie in cookies {
                stmt.execute(params![cookie.name(), cookie.domain(), cookie.path()])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistorError> {
        self.conn()?.execute("DELETE FROM cookies", [])?;
        Ok(())
    }
}
