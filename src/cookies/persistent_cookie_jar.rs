//! Persistent cookie jar.
//!
//! [`PersistentCookieJar`] keeps an in-memory [`CookieCache`] in sync with a
//! [`CookiePersistor`]:
//! - on build, the cache is filled from the persistor;
//! - [`save_from_response`](CookieJar::save_from_response) caches every cookie
//!   and persists only the persistent ones. A session cookie that replaces a
//!   persisted one removes it from the persistor;
//! - [`load_for_request`](CookieJar::load_for_request) evicts expired cookies
//!   from both sides and returns the unexpired cookies matching the URL;
//! - [`clear_session`](CookieJar::clear_session) rebuilds the cache from the
//!   persistor; [`clear`](CookieJar::clear) empties both.
//!
//! After every call the cache holds everything the persistor would return, plus
//! the session cookies that only live in memory.
//!
//! # Locking
//! One mutex guards the cache and every operation runs as a single critical
//! section on it, including the initial load. Persistor I/O is scheduled by
//! [`PersistenceMode`]:
//! - `Locked`: I/O runs while the cache lock is held.
//! - `Deferred`: the `io` lock is taken before the cache lock is released, then
//!   I/O runs holding `io` only. Persistor calls keep the order of the cache
//!   mutations that caused them. `clear_session`, `clear` and `initialize` hold
//!   both locks throughout.
//!
//! Locks are always taken cache first, then `io`.
//!
//! # Failures
//! Persistor errors never reach the caller. They are logged and the jar keeps
//! working from memory: at worst cookies lose durability and behave as session
//! cookies.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use url::Url;

use crate::config::{CookieJarConfig, PersistenceMode};
use crate::cookies::clock::SystemClock;
use crate::cookies::cookie_cache::{CookieCache, SetCookieCache};
use crate::cookies::store::CookiePersistor;
use crate::cookies::{ClockHandle, Cookie, CookieJar, CookieKey, CookiePersistorHandle};
use crate::errors::PersistorError;

type CacheGuard<'a> = MutexGuard<'a, Box<dyn CookieCache>>;

/// A cookie jar whose persistent cookies survive process restarts.
pub struct PersistentCookieJar {
    config: CookieJarConfig,
    clock: ClockHandle,
    persistor: CookiePersistorHandle,
    cache: Mutex<Box<dyn CookieCache>>,
    /// Orders persistor I/O that runs after the cache lock is released.
    io: Mutex<()>,
}

impl PersistentCookieJar {
    /// Creates a jar over `persistor` with a [`SetCookieCache`], the system clock
    /// and the default configuration, and loads the persisted cookies.
    pub fn new(persistor: CookiePersistorHandle) -> Self {
        Self::builder(persistor).build()
    }

    pub fn builder(persistor: CookiePersistorHandle) -> PersistentCookieJarBuilder {
        PersistentCookieJarBuilder {
            persistor,
            cache: None,
            clock: None,
            config: CookieJarConfig::default(),
        }
    }

    pub fn config(&self) -> &CookieJarConfig {
        &self.config
    }

    /// Current time according to the jar's clock.
    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Adds every persisted cookie to the cache.
    ///
    /// A persistor failure is logged and the jar continues as if the store were
    /// empty.
    pub fn initialize(&self) {
        let mut cache = self.lock_cache();
        let _io = self.lock_io();
        self.load_into(&mut **cache);
    }

    fn lock_cache(&self) -> CacheGuard<'_> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_io(&self) -> MutexGuard<'_, ()> {
        self.io.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load_into(&self, cache: &mut dyn CookieCache) {
        match self.persistor.load_all() {
            Ok(cookies) => {
                log::debug!("Loaded {} persisted cookies", cookies.len());
                cache.add_all(&cookies);
            }
            Err(e) => {
                log::error!("Failed to load persisted cookies, continuing without them: {}", e);
            }
        }
    }

    /// Runs a persistor write on behalf of the mutation guarded by `cache`,
    /// releasing `cache` before the I/O in deferred mode.
    fn persist(
        &self,
        cache: CacheGuard<'_>,
        what: &str,
        op: impl FnOnce(&dyn CookiePersistor) -> Result<(), PersistorError>,
    ) {
        let result = match self.config.persistence {
            PersistenceMode::Locked => {
                let result = op(self.persistor.as_ref());
                drop(cache);
                result
            }
            PersistenceMode::Deferred => {
                let _io = self.lock_io();
                drop(cache);
                op(self.persistor.as_ref())
            }
        };

        if let Err(e) = result {
            log::warn!("Failed to {}, cookies remain in memory only: {}", what, e);
        }
    }
}

impl CookieJar for PersistentCookieJar {
    fn save_from_response(&self, url: &Url, cookies: &[Cookie]) {
        let mut cache = self.lock_cache();
        let displaced = displaced_by_session(&**cache, cookies);
        cache.add_all(cookies);

        let persistent: Vec<Cookie> = cookies.iter().filter(|c| c.persistent()).cloned().collect();
        log::debug!(
            "Stored {} cookies from {} ({} persistent, {} displaced)",
            cookies.len(),
            url,
            persistent.len(),
            displaced.len()
        );

        if persistent.is_empty() && displaced.is_empty() {
            return;
        }

        self.persist(cache, "persist cookies", |p| {
            if !persistent.is_empty() {
                p.save_all(&persistent)?;
            }
            if !displaced.is_empty() {
                p.remove_all(&displaced)?;
            }
            Ok(())
        });
    }

    fn load_for_request(&self, url: &Url) -> Vec<Cookie> {
        let mut cache = self.lock_cache();
        let now = self.clock.now_millis();

        let mut expired = Vec::new();
        let mut valid = Vec::new();
        for cookie in cache.iter() {
            if cookie.is_expired(now) {
                expired.push(cookie.clone());
            } else if cookie.matches(url) {
                valid.push(cookie.clone());
            }
        }

        if expired.is_empty() {
            return valid;
        }

        log::debug!("Evicting {} expired cookies", expired.len());
        cache.remove_all(&expired);
        self.persist(cache, "remove expired cookies", |p| p.remove_all(&expired));

        valid
    }

    fn clear_session(&self) {
        let mut cache = self.lock_cache();
        let _io = self.lock_io();

        cache.clear();
        self.load_into(&mut **cache);
    }

    fn clear(&self) {
        let mut cache = self.lock_cache();
        let _io = self.lock_io();

        cache.clear();
        if let Err(e) = self.persistor.clear() {
            log::warn!("Failed to clear persisted cookies: {}", e);
        }
    }

    fn all_cookies(&self) -> Vec<Cookie> {
        self.lock_cache().iter().cloned().collect()
    }

    fn remove_cookies_for_url(&self, url: &Url) {
        let mut cache = self.lock_cache();

        let matching: Vec<Cookie> = cache.iter().filter(|c| c.matches(url)).cloned().collect();
        if matching.is_empty() {
            return;
        }
        cache.remove_all(&matching);

        let persistent: Vec<Cookie> = matching.into_iter().filter(|c| c.persistent()).collect();
        if persistent.is_empty() {
            return;
        }

        self.persist(cache, "remove cookies", |p| p.remove_all(&persistent));
    }
}

/// Session cookies in `cookies` that end up replacing a persistent cookie,
/// either one already cached or one earlier in the same batch. Their keys must
/// leave the persistor so it never holds a cookie the cache no longer has.
fn displaced_by_session(cache: &dyn CookieCache, cookies: &[Cookie]) -> Vec<Cookie> {
    if cookies.iter().all(Cookie::persistent) {
        return Vec::new();
    }

    let mut persisted: HashSet<CookieKey> = cache.iter().filter(|c| c.persistent()).map(Cookie::key).collect();
    let mut last: IndexMap<CookieKey, &Cookie> = IndexMap::new();
    for cookie in cookies {
        if cookie.persistent() {
            persisted.insert(cookie.key());
        }
        last.insert(cookie.key(), cookie);
    }

    last.into_iter()
        .filter(|(key, c)| !c.persistent() && persisted.contains(key))
        .map(|(_, c)| c.clone())
        .collect()
}

/// Builder for [`PersistentCookieJar`].
pub struct PersistentCookieJarBuilder {
    persistor: CookiePersistorHandle,
    cache: Option<Box<dyn CookieCache>>,
    clock: Option<ClockHandle>,
    config: CookieJarConfig,
}

impl PersistentCookieJarBuilder {
    /// Uses `cache` instead of an empty [`SetCookieCache`].
    pub fn cache(mut self, cache: impl CookieCache + 'static) -> Self {
        self.cache = Some(Box::new(cache));
        self
    }

    /// Uses `clock` instead of the system clock for expiry decisions.
    pub fn clock(mut self, clock: ClockHandle) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn config(mut self, config: CookieJarConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the jar, loading persisted cookies unless
    /// [`CookieJarConfig::initialize_on_build`] is off.
    pub fn build(self) -> PersistentCookieJar {
        let initialize = self.config.initialize_on_build;
        let jar = PersistentCookieJar {
            config: self.config,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            persistor: self.persistor,
            cache: Mutex::new(self.cache.unwrap_or_else(|| Box::new(SetCookieCache::new()))),
            io: Mutex::new(()),
        };

        if initialize {
            jar.initialize();
        }

        jar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::clock::tests::ManualClock;
    use crate::cookies::store::{InMemoryCookiePersistor, JsonCookiePersistor};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    const NOW: i64 = 1_700_000_000_000;
    const HOUR: i64 = 3_600_000;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn url(s: &str) -> Url {
        Url::parse(s).expect("valid URL")
    }

    fn persistent(name: &str, value: &str, expires_at: i64) -> Cookie {
        Cookie::builder(name, value).domain("example.com").expires_at(expires_at).build()
    }

    fn session(name: &str, value: &str) -> Cookie {
        Cookie::builder(name, value).domain("example.com").build()
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        LoadAll,
        SaveAll(Vec<Cookie>),
        RemoveAll(Vec<Cookie>),
        Clear,
    }

    /// Persistor that records every call and can be switched into failing.
    #[derive(Default)]
    struct RecordingPersistor {
        inner: InMemoryCookiePersistor,
        calls: Mutex<Vec<Call>>,
        failing: AtomicBool,
    }

    impl RecordingPersistor {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn writes(&self) -> Vec<Call> {
            self.calls().into_iter().filter(|c| *c != Call::LoadAll).collect()
        }

        fn record(&self, call: Call) -> Result<(), PersistorError> {
            self.calls.lock().unwrap().push(call);
            if self.failing.load(Ordering::SeqCst) {
                return Err(PersistorError::Unavailable("disk on fire".into()));
            }
            Ok(())
        }
    }

    impl CookiePersistor for RecordingPersistor {
        fn load_all(&self) -> Result<Vec<Cookie>, PersistorError> {
            self.record(Call::LoadAll)?;
            self.inner.load_all()
        }

        fn save_all(&self, cookies: &[Cookie]) -> Result<(), PersistorError> {
            self.record(Call::SaveAll(cookies.to_vec()))?;
            self.inner.save_all(cookies)
        }

        fn remove_all(&self, cookies: &[Cookie]) -> Result<(), PersistorError> {
            self.record(Call::RemoveAll(cookies.to_vec()))?;
            self.inner.remove_all(cookies)
        }

        fn clear(&self) -> Result<(), PersistorError> {
            self.record(Call::Clear)?;
            self.inner.clear()
        }
    }

    fn jar_with(persistor: Arc<RecordingPersistor>) -> PersistentCookieJar {
        PersistentCookieJar::builder(persistor)
            .clock(Arc::new(ManualClock::at(NOW)))
            .build()
    }

    #[test]
    fn build_loads_persisted_cookies() {
        let persistor = Arc::new(RecordingPersistor::default());
        persistor.inner.save_all(&[persistent("sid", "1", NOW + HOUR)]).unwrap();

        let jar = jar_with(persistor.clone());

        assert_eq!(persistor.calls(), vec![Call::LoadAll]);
        assert_eq!(jar.all_cookies(), vec![persistent("sid", "1", NOW + HOUR)]);
    }

    #[test]
    fn save_persists_only_persistent_cookies() {
        let persistor = Arc::new(RecordingPersistor::default());
        let jar = jar_with(persistor.clone());
        let a = persistent("sid", "1", NOW + HOUR);
        let b = session("tmp", "2");

        jar.save_from_response(&url("https://example.com/"), &[a.clone(), b.clone()]);

        assert_eq!(persistor.writes(), vec![Call::SaveAll(vec![a.clone()])]);
        assert_eq!(jar.all_cookies(), vec![a, b]);
    }

    #[test]
    fn save_of_session_cookies_skips_persistor() {
        let persistor = Arc::new(RecordingPersistor::default());
        let jar = jar_with(persistor.clone());

        jar.save_from_response(&url("https://example.com/"), &[session("tmp", "2")]);

        assert!(persistor.writes().is_empty());
        assert_eq!(jar.all_cookies(), vec![session("tmp", "2")]);
    }

    #[test]
    fn save_replaces_cookie_with_same_key() {
        let persistor = Arc::new(RecordingPersistor::default());
        let jar = jar_with(persistor.clone());

        jar.save_from_response(&url("https://example.com/"), &[persistent("sid", "old", NOW + HOUR)]);
        jar.save_from_response(&url("https://example.com/"), &[persistent("sid", "new", NOW + HOUR)]);

        assert_eq!(jar.all_cookies(), vec![persistent("sid", "new", NOW + HOUR)]);
        assert_eq!(persistor.inner.load_all().unwrap(), vec![persistent("sid", "new", NOW + HOUR)]);
    }

    #[test]
    fn session_cookie_replacing_persistent_removes_stale_record() {
        let persistor = Arc::new(RecordingPersistor::default());
        let jar = jar_with(persistor.clone());
        let site = url("https://example.com/");

        jar.save_from_response(&site, &[persistent("sid", "old", NOW + HOUR)]);
        jar.save_from_response(&site, &[session("sid", "new")]);

        assert_eq!(persistor.writes().last(), Some(&Call::RemoveAll(vec![session("sid", "new")])));
        assert!(persistor.inner.is_empty());
        assert_eq!(jar.load_for_request(&site), vec![session("sid", "new")]);

        jar.clear_session();
        assert!(jar.load_for_request(&site).is_empty());

        let restarted = jar_with(persistor);
        assert!(restarted.all_cookies().is_empty());
    }

    #[test]
    fn session_cookie_later_in_batch_wins_over_persistent() {
        let persistor = Arc::new(RecordingPersistor::default());
        let jar = jar_with(persistor.clone());
        let site = url("https://example.com/");

        jar.save_from_response(&site, &[persistent("sid", "old", NOW + HOUR), session("sid", "new")]);
        assert!(persistor.inner.is_empty());
        assert_eq!(jar.all_cookies(), vec![session("sid", "new")]);

        jar.save_from_response(&site, &[session("sid", "tmp"), persistent("sid", "kept", NOW + HOUR)]);
        assert_eq!(persistor.inner.load_all().unwrap(), vec![persistent("sid", "kept", NOW + HOUR)]);
    }

    #[test]
    fn load_returns_only_matching_cookies() {
        let persistor = Arc::new(RecordingPersistor::default());
        let jar = jar_with(persistor.clone());
        let other = Cookie::builder("o", "1").domain("other.org").build();
        let secure = Cookie::builder("s", "1").domain("example.com").secure(true).build();

        jar.save_from_response(
            &url("https://example.com/"),
            &[session("tmp", "1"), other.clone(), secure.clone()],
        );

        assert_eq!(
            jar.load_for_request(&url("https://www.example.com/page")),
            vec![session("tmp", "1"), secure]
        );
        assert_eq!(jar.load_for_request(&url("http://example.com/")), vec![session("tmp", "1")]);
        assert!(jar.load_for_request(&url("https://unrelated.net/")).is_empty());
        assert!(persistor.writes().is_empty());
    }

    #[test]
    fn expired_cookie_is_evicted_from_cache_and_persistor() {
        let persistor = Arc::new(RecordingPersistor::default());
        let jar = jar_with(persistor.clone());
        let expired = persistent("sid", "1", NOW - 1_000);
        let expired_elsewhere = Cookie::builder("x", "1").domain("other.org").expires_at(NOW - 1).build();
        let live = persistent("keep", "1", NOW + HOUR);

        jar.save_from_response(
            &url("https://example.com/"),
            &[expired.clone(), expired_elsewhere.clone(), live.clone()],
        );

        let cookies = jar.load_for_request(&url("https://example.com/"));

        assert_eq!(cookies, vec![live.clone()]);
        assert_eq!(
            persistor.writes().last(),
            Some(&Call::RemoveAll(vec![expired, expired_elsewhere]))
        );
        assert_eq!(jar.all_cookies(), vec![live.clone()]);
        assert_eq!(persistor.inner.load_all().unwrap(), vec![live]);
    }

    #[test]
    fn cookie_expiring_exactly_now_is_still_sent() {
        let persistor = Arc::new(RecordingPersistor::default());
        let clock = Arc::new(ManualClock::at(NOW));
        let jar = PersistentCookieJar::builder(persistor.clone()).clock(clock.clone()).build();
        let c = persistent("sid", "1", NOW);

        jar.save_from_response(&url("https://example.com/"), std::slice::from_ref(&c));
        assert_eq!(jar.load_for_request(&url("https://example.com/")), vec![c.clone()]);

        clock.advance(1);
        assert!(jar.load_for_request(&url("https://example.com/")).is_empty());
        assert_eq!(persistor.writes().last(), Some(&Call::RemoveAll(vec![c])));
    }

    #[test]
    fn unqueried_expired_cookie_stays_until_next_load() {
        let persistor = Arc::new(RecordingPersistor::default());
        let clock = Arc::new(ManualClock::at(NOW));
        let jar = PersistentCookieJar::builder(persistor.clone()).clock(clock.clone()).build();
        jar.save_from_response(&url("https://example.com/"), &[persistent("sid", "1", NOW + 10)]);

        clock.advance(HOUR);

        assert_eq!(jar.all_cookies().len(), 1);
        assert_eq!(persistor.inner.len(), 1);
    }

    #[test]
    fn clear_session_keeps_persisted_cookies() {
        let persistor = Arc::new(RecordingPersistor::default());
        let jar = jar_with(persistor.clone());
        let a = persistent("sid", "1", NOW + HOUR);

        jar.save_from_response(&url("https://example.com/"), &[a.clone(), session("tmp", "2")]);
        let writes_before = persistor.writes();

        jar.clear_session();

        assert_eq!(jar.load_for_request(&url("https://example.com/")), vec![a]);
        assert_eq!(persistor.writes(), writes_before);
    }

    #[test]
    fn clear_empties_cache_and_persistor() {
        let persistor = Arc::new(RecordingPersistor::default());
        let jar = jar_with(persistor.clone());
        jar.save_from_response(
            &url("https://example.com/"),
            &[persistent("sid", "1", NOW + HOUR), session("tmp", "2")],
        );

        jar.clear();

        assert!(jar.all_cookies().is_empty());
        assert_eq!(persistor.writes().last(), Some(&Call::Clear));

        jar.initialize();
        assert!(jar.all_cookies().is_empty());

        let restarted = jar_with(persistor);
        assert!(restarted.all_cookies().is_empty());
    }

    #[test]
    fn remove_cookies_for_url_removes_from_both_sides() {
        let persistor = Arc::new(RecordingPersistor::default());
        let jar = jar_with(persistor.clone());
        let a = persistent("sid", "1", NOW + HOUR);
        let b = session("tmp", "2");
        let other = Cookie::builder("o", "1").domain("other.org").expires_at(NOW + HOUR).build();
        jar.save_from_response(&url("https://example.com/"), &[a.clone(), b, other.clone()]);

        jar.remove_cookies_for_url(&url("https://example.com/"));

        assert_eq!(jar.all_cookies(), vec![other.clone()]);
        assert_eq!(persistor.writes().last(), Some(&Call::RemoveAll(vec![a])));
        assert_eq!(persistor.inner.load_all().unwrap(), vec![other]);
    }

    #[test]
    fn failing_persistor_degrades_to_memory() {
        init_logging();
        let persistor = Arc::new(RecordingPersistor::default());
        persistor.failing.store(true, Ordering::SeqCst);

        let jar = jar_with(persistor.clone());
        assert!(jar.all_cookies().is_empty());

        let a = persistent("sid", "1", NOW + HOUR);
        jar.save_from_response(&url("https://example.com/"), std::slice::from_ref(&a));
        assert_eq!(jar.load_for_request(&url("https://example.com/")), vec![a]);

        jar.clear();
        assert!(jar.all_cookies().is_empty());
    }

    #[test]
    fn skipped_initialize_leaves_cache_empty_until_called() {
        let persistor = Arc::new(RecordingPersistor::default());
        persistor.inner.save_all(&[persistent("sid", "1", NOW + HOUR)]).unwrap();

        let jar = PersistentCookieJar::builder(persistor.clone())
            .clock(Arc::new(ManualClock::at(NOW)))
            .config(CookieJarConfig::builder().initialize_on_build(false).build())
            .build();
        assert!(jar.all_cookies().is_empty());

        jar.initialize();
        assert_eq!(jar.all_cookies().len(), 1);
    }

    #[test]
    fn cookies_survive_restart_with_json_file() {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        let a = persistent("sid", "1", NOW + HOUR);

        {
            let jar = PersistentCookieJar::builder(Arc::new(JsonCookiePersistor::new(path.clone())))
                .clock(Arc::new(ManualClock::at(NOW)))
                .build();
            jar.save_from_response(&url("https://example.com/"), &[a.clone(), session("tmp", "2")]);
        }

        let restarted = PersistentCookieJar::builder(Arc::new(JsonCookiePersistor::new(path)))
            .clock(Arc::new(ManualClock::at(NOW)))
            .build();
        assert_eq!(restarted.load_for_request(&url("https://example.com/")), vec![a]);
    }

    fn hammer(mode: PersistenceMode, clear_sessions: bool) {
        let persistor = Arc::new(RecordingPersistor::default());
        let jar = Arc::new(
            PersistentCookieJar::builder(persistor.clone())
                .clock(Arc::new(ManualClock::at(NOW)))
                .config(CookieJarConfig::builder().persistence(mode).build())
                .build(),
        );

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let jar = jar.clone();
                thread::spawn(move || {
                    let site = url("https://example.com/");
                    for i in 0..50 {
                        let name = format!("c{}", i % 10);
                        // Odd rounds write cookies that are already expired.
                        let expires = if i % 2 == 0 { NOW + HOUR } else { NOW - 1 };
                        let value = format!("{t}-{i}");
                        jar.save_from_response(
                            &site,
                            &[persistent(&name, &value, expires), session(&format!("s{t}"), &value)],
                        );
                        jar.load_for_request(&site);
                    }
                })
            })
            .collect();

        let clearer = clear_sessions.then(|| {
            let jar = jar.clone();
            thread::spawn(move || {
                for _ in 0..20 {
                    jar.clear_session();
                    thread::yield_now();
                }
            })
        });

        for h in handles {
            h.join().unwrap();
        }
        if let Some(h) = clearer {
            h.join().unwrap();
        }

        // One final sweep so both sides have seen the same evictions.
        jar.load_for_request(&url("https://example.com/"));

        let mut cached: Vec<Cookie> = jar.all_cookies().into_iter().filter(|c| c.persistent()).collect();
        let mut stored = persistor.inner.load_all().unwrap();
        cached.sort_by_key(|c| c.key());
        stored.sort_by_key(|c| c.key());
        assert_eq!(cached, stored);
        assert!(stored.iter().all(|c| !c.is_expired(NOW)));
        if !clear_sessions {
            assert_eq!(jar.all_cookies().iter().filter(|c| !c.persistent()).count(), 8);
        }
    }

    #[test]
    fn concurrent_calls_keep_cache_and_persistor_consistent() {
        hammer(PersistenceMode::Locked, false);
    }

    #[test]
    fn concurrent_calls_keep_cache_and_persistor_consistent_when_deferred() {
        hammer(PersistenceMode::Deferred, false);
    }

    #[test]
    fn clear_session_is_exclusive_with_concurrent_calls() {
        hammer(PersistenceMode::Locked, true);
    }

    #[test]
    fn clear_session_is_exclusive_with_concurrent_calls_when_deferred() {
        hammer(PersistenceMode::Deferred, true);
    }
}
