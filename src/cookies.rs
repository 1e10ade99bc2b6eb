//! Cookies: [`PersistentCookieJar`], its [`CookieCache`], [`CookiePersistor`]s and codecs.

mod clock;
mod codec;
mod cookie_cache;
mod cookie_jar;
mod cookies;
mod persistent_cookie_jar;
mod reqwest_store;
mod set_cookie;
mod store;

pub use clock::{Clock, SystemClock};
pub use codec::{BinaryCookieCodec, CookieCodec, JsonCookieCodec, RECORD_VERSION};
pub use cookie_cache::{CookieCache, SetCookieCache};
pub use cookie_jar::CookieJar;
pub use cookies::{ClockHandle, Cookie, CookieBuilder, CookieKey, CookiePersistorHandle, MAX_EXPIRES_AT};
pub use persistent_cookie_jar::{PersistentCookieJar, PersistentCookieJarBuilder};

pub use store::{AsyncCookiePersistor, BlockingPersistor, CookiePersistor, InMemoryCookiePersistor, JsonCookiePersistor};
#[cfg(feature = "sqlite_cookie_store")]
pub use store::SqliteCookiePersistor;
