//! Masthead page-output cache.
//!
//! Implements the regeneration policy: each route's rendered HTML is cached
//! and served unconditionally while younger than its revalidation window
//! (`FRESH`), served-then-refreshed once past it (`STALE`), and rendered
//! synchronously on first request (`MISSING`). A per-route lock makes
//! regeneration single-flight so a burst of requests against a stale page
//! costs one upstream fetch, not N.

pub mod page_cache;
pub mod route;

pub use page_cache::{CacheState, PageCache};
pub use route::RouteKey;
