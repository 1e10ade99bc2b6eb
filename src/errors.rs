/// Errors raised while encoding or decoding a single cookie record.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Invalid hex in cookie record: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("Unknown cookie record version {0}")]
    UnknownVersion(u8),

    #[error("Cookie record is truncated")]
    Truncated,

    #[error("Malformed cookie record: {0}")]
    Malformed(String),

    #[error("Cookie field too long to encode ({0} bytes)")]
    FieldTooLong(usize),

    #[error("JSON cookie record error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a cookie persistor.
///
/// The jar never hands these to its callers: it logs them and keeps serving
/// cookies from memory.
#[derive(Debug, thiserror::Error)]
pub enum PersistorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cookie file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[cfg(feature = "sqlite_cookie_store")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] r2d2_sqlite::rusqlite::Error),

    #[cfg(feature = "sqlite_cookie_store")]
    #[error("SQLite pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Persistor unavailable: {0}")]
    Unavailable(String),
}
