//! Cookie record codecs.
//!
//! A codec turns one [`Cookie`] into a durable text record and back. Persistors
//! use a codec per record, so a single damaged record can be skipped without
//! losing the rest of the store.
//!
//! Two formats are provided, both versioned so the layout can evolve:
//! - [`BinaryCookieCodec`]: fixed-order binary fields, hex encoded.
//! - [`JsonCookieCodec`]: a JSON object with a `"v"` tag.

use serde::{Deserialize, Serialize};

use crate::cookies::Cookie;
use crate::errors::CodecError;

/// Current record version written by both codecs.
pub const RECORD_VERSION: u8 = 1;

/// `expires_at` value written for session cookies.
const NO_EXPIRY: i64 = -1;

/// Encodes and decodes a single cookie record.
pub trait CookieCodec: Send + Sync {
    fn encode(&self, cookie: &Cookie) -> Result<String, CodecError>;
    fn decode(&self, encoded: &str) -> Result<Cookie, CodecError>;
}

/// Binary record, hex encoded.
///
/// Layout (big-endian): version `u8`, `name`, `value`, `expires_at` as `i64`
/// (`-1` when the cookie has no expiry), `domain`, `path`, then `secure`,
/// `http_only`, `host_only` as one byte each. Strings are a `u32` byte length
/// followed by UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCookieCodec;

impl CookieCodec for BinaryCookieCodec {
    fn encode(&self, cookie: &Cookie) -> Result<String, CodecError> {
        let mut buf = Vec::with_capacity(64);
        buf.push(RECORD_VERSION);
        put_str(&mut buf, cookie.name())?;
        put_str(&mut buf, cookie.value())?;
        buf.extend_from_slice(&cookie.expires_at().unwrap_or(NO_EXPIRY).to_be_bytes());
        put_str(&mut buf, cookie.domain())?;
        put_str(&mut buf, cookie.path())?;
        buf.push(cookie.secure() as u8);
        buf.push(cookie.http_only() as u8);
        buf.push(cookie.host_only() as u8);

        Ok(hex::encode(buf))
    }

    fn decode(&self, encoded: &str) -> Result<Cookie, CodecError> {
        let bytes = hex::decode(encoded.trim())?;
        let mut reader = Reader { bytes: &bytes };

        let version = reader.u8()?;
        if version != RECORD_VERSION {
            return Err(CodecError::UnknownVersion(version));
        }

        let name = reader.string()?;
        let value = reader.string()?;
        let expires_at = reader.i64()?;
        let domain = reader.string()?;
        let path = reader.string()?;
        let secure = reader.bool()?;
        let http_only = reader.bool()?;
        let host_only = reader.bool()?;

        if !reader.bytes.is_empty() {
            return Err(CodecError::Malformed(format!("{} trailing bytes", reader.bytes.len())));
        }

        Ok(assemble(name, value, expires_at, domain, path, secure, http_only, host_only))
    }
}

fn put_str(buf: &mut Vec<u8>, s: &str) -> Result<(), CodecError> {
    let len = u32::try_from(s.len()).map_err(|_| CodecError::FieldTooLong(s.len()))?;
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.bytes.len() < n {
            return Err(CodecError::Truncated);
        }
        let (head, tail) = self.bytes.split_at(n);
        self.bytes = tail;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    fn bool(&mut self) -> Result<bool, CodecError> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::Malformed(format!("invalid flag byte {other}"))),
        }
    }

    fn i64(&mut self) -> Result<i64, CodecError> {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(self.take(8)?);
        Ok(i64::from_be_bytes(raw))
    }

    fn string(&mut self) -> Result<String, CodecError> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.take(4)?);
        let len = u32::from_be_bytes(raw) as usize;
        let s = self.take(len)?;
        String::from_utf8(s.to_vec()).map_err(|e| CodecError::Malformed(e.to_string()))
    }
}

/// JSON representation of a cookie record.
#[derive(Debug, Serialize, Deserialize)]
struct CookieRecord {
    v: u8,
    name: String,
    value: String,
    expires_at: i64,
    domain: String,
    path: String,
    secure: bool,
    http_only: bool,
    host_only: bool,
}

/// JSON record codec: `{"v":1,"name":...,"expires_at":-1,...}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCookieCodec;

impl CookieCodec for JsonCookieCodec {
    fn encode(&self, cookie: &Cookie) -> Result<String, CodecError> {
        let record = CookieRecord {
            v: RECORD_VERSION,
            name: cookie.name().to_string(),
            value: cookie.value().to_string(),
            expires_at: cookie.expires_at().unwrap_or(NO_EXPIRY),
            domain: cookie.domain().to_string(),
            path: cookie.path().to_string(),
            secure: cookie.secure(),
            http_only: cookie.http_only(),
            host_only: cookie.host_only(),
        };
        Ok(serde_json::to_string(&record)?)
    }

    fn decode(&self, encoded: &str) -> Result<Cookie, CodecError> {
        // Check the version before the field layout so a future format reports
        // as such instead of as a missing field.
        let value: serde_json::Value = serde_json::from_str(encoded)?;
        let version = value.get("v").and_then(serde_json::Value::as_u64);
        if version != Some(RECORD_VERSION as u64) {
            return Err(CodecError::UnknownVersion(version.map_or(0, |v| v.min(u8::MAX as u64) as u8)));
        }

        let r: CookieRecord = serde_json::from_value(value)?;
        Ok(assemble(r.name, r.value, r.expires_at, r.domain, r.path, r.secure, r.http_only, r.host_only))
    }
}

#[allow(clippy::too_many_arguments)]
fn assemble(
    name: String,
    value: String,
    expires_at: i64,
    domain: String,
    path: String,
    secure: bool,
    http_only: bool,
    host_only: bool,
) -> Cookie {
    let builder = Cookie::builder(name, value);
    let builder = if host_only {
        builder.host_only_domain(domain)
    } else {
        builder.domain(domain)
    };
    let builder = builder.path(path).secure(secure).http_only(http_only);

    if expires_at == NO_EXPIRY {
        builder.build()
    } else {
        builder.expires_at(expires_at).build()
    }
}
