//! Page-output cache with per-route single-flight regeneration.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::route::RouteKey;

/// Freshness of a cached render at lookup time.
#[derive(Debug, Clone)]
pub enum CacheState {
    /// Younger than the revalidation window; serve as-is, no fetch.
    Fresh(Arc<str>),
    /// Past the window; serve immediately, regenerate in the background.
    Stale(Arc<str>),
    /// No render exists yet; the caller must fetch before responding.
    Missing,
}

struct Entry {
    html: Arc<str>,
    rendered_at: Instant,
}

/// Cache of rendered page output, keyed by route.
///
/// This is the only shared mutable state in the system: written by the
/// regeneration path, read by every request handler. Entries never expire out
/// of the map; they only transition from fresh to stale as they age, and a
/// stale render stays servable until a newer one replaces it.
///
/// Regeneration is single-flight per route: callers must hold the route's
/// [refresh lock](Self::refresh_lock) across the fetch-and-insert, so N
/// concurrent requests against a stale or missing route produce exactly one
/// upstream fetch.
#[derive(Default)]
pub struct PageCache {
    entries: RwLock<HashMap<RouteKey, Entry>>,
    refresh_locks: Mutex<HashMap<RouteKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify the cached render for `route` against the revalidation window.
    pub fn lookup(&self, route: &RouteKey, window: Duration) -> CacheState {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        match entries.get(route) {
            Some(entry) if entry.rendered_at.elapsed() < window => {
                CacheState::Fresh(Arc::clone(&entry.html))
            }
            Some(entry) => CacheState::Stale(Arc::clone(&entry.html)),
            None => CacheState::Missing,
        }
    }

    /// Store a newly rendered page, atomically replacing any previous entry
    /// and resetting its age to zero.
    pub fn insert(&self, route: RouteKey, html: Arc<str>) {
        debug!(%route, bytes = html.len(), "caching rendered page");
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            route,
            Entry {
                html,
                rendered_at: Instant::now(),
            },
        );
    }

    /// The regeneration lock for `route`.
    ///
    /// Background refreshes should `try_lock` it and stand down when it is
    /// already held; first-render paths `lock().await` so concurrent misses
    /// coalesce onto the one fetch instead of each querying upstream.
    pub fn refresh_lock(&self, route: &RouteKey) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .refresh_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(route.clone()).or_default())
    }

    /// Number of cached routes. Used for startup logging and tests.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    const WINDOW: Duration = Duration::from_millis(50);

    fn home() -> RouteKey {
        RouteKey::Home
    }

    #[test]
    fn test_missing_until_first_insert() {
        let cache = PageCache::new();
        assert!(matches!(cache.lookup(&home(), WINDOW), CacheState::Missing));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_fresh_within_window() {
        let cache = PageCache::new();
        cache.insert(home(), Arc::from("<html>v1</html>"));
        match cache.lookup(&home(), WINDOW) {
            CacheState::Fresh(html) => assert_eq!(&*html, "<html>v1</html>"),
            other => panic!("expected fresh, got {other:?}"),
        }
    }

    #[test]
    fn test_stale_past_window_still_serves_old_render() {
        let cache = PageCache::new();
        cache.insert(home(), Arc::from("<html>v1</html>"));
        std::thread::sleep(WINDOW + Duration::from_millis(10));
        match cache.lookup(&home(), WINDOW) {
            CacheState::Stale(html) => assert_eq!(&*html, "<html>v1</html>"),
            other => panic!("expected stale, got {other:?}"),
        }
    }

    #[test]
    fn test_insert_resets_age() {
        let cache = PageCache::new();
        cache.insert(home(), Arc::from("v1"));
        std::thread::sleep(WINDOW + Duration::from_millis(10));
        cache.insert(home(), Arc::from("v2"));
        match cache.lookup(&home(), WINDOW) {
            CacheState::Fresh(html) => assert_eq!(&*html, "v2"),
            other => panic!("expected fresh after replace, got {other:?}"),
        }
    }

    #[test]
    fn test_routes_age_independently() {
        let cache = PageCache::new();
        let detail = RouteKey::Article("a".to_string());
        cache.insert(home(), Arc::from("home"));
        std::thread::sleep(WINDOW + Duration::from_millis(10));
        cache.insert(detail.clone(), Arc::from("detail"));

        assert!(matches!(cache.lookup(&home(), WINDOW), CacheState::Stale(_)));
        assert!(matches!(
            cache.lookup(&detail, WINDOW),
            CacheState::Fresh(_)
        ));
    }

    #[tokio::test]
    async fn test_try_lock_admits_exactly_one_refresher() {
        let cache = PageCache::new();
        let lock = cache.refresh_lock(&home());

        let guard = lock.try_lock().expect("first claim succeeds");
        assert!(cache.refresh_lock(&home()).try_lock().is_err());
        drop(guard);
        assert!(cache.refresh_lock(&home()).try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_distinct_routes_refresh_concurrently() {
        let cache = PageCache::new();
        let home_lock = cache.refresh_lock(&home());
        let detail_lock = cache.refresh_lock(&RouteKey::Article("a".to_string()));

        let _home_guard = home_lock.try_lock().expect("home claim");
        assert!(detail_lock.try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_claims_admit_one_winner() {
        let cache = Arc::new(PageCache::new());
        let wins = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let cache = Arc::clone(&cache);
            let wins = Arc::clone(&wins);
            tasks.push(tokio::spawn(async move {
                let lock = cache.refresh_lock(&RouteKey::Home);
                if let Ok(_guard) = lock.try_lock_owned() {
                    wins.fetch_add(1, Ordering::SeqCst);
                    // Hold the slot long enough for every other task to try.
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }));
        }
        for task in tasks {
            task.await.expect("task");
        }

        assert_eq!(wins.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_awaited_lock_coalesces_misses() {
        // Two tasks race a missing route: the loser of the lock must observe
        // the winner's insert instead of fetching again.
        let cache = Arc::new(PageCache::new());
        let fetches = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let fetches = Arc::clone(&fetches);
            tasks.push(tokio::spawn(async move {
                let lock = cache.refresh_lock(&RouteKey::Home);
                let _guard = lock.lock().await;
                if matches!(cache.lookup(&RouteKey::Home, WINDOW), CacheState::Missing) {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    cache.insert(RouteKey::Home, Arc::from("rendered"));
                }
            }));
        }
        for task in tasks {
            task.await.expect("task");
        }

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }
}
