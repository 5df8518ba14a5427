//! HTTP server: routes, request handlers, and the page-regeneration flow.
//!
//! Each route's handler runs the transition model from the regeneration
//! policy: a fresh cached render is served as-is; a stale one is served
//! immediately while a single background refresh regenerates it; a missing
//! one blocks the request on a synchronous fetch.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use masthead_cache::{CacheState, PageCache, RouteKey};
use masthead_client::{ContentClient, ListQuery};
use masthead_core::{Error, Result, Settings};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::views;

/// Shared application state: settings, the content client, and the
/// page-output cache.
pub struct AppState {
    pub settings: Settings,
    pub client: ContentClient,
    pub cache: PageCache,
}

impl AppState {
    /// Build state from settings, constructing the content client.
    pub fn new(settings: Settings) -> Result<Self> {
        let client = ContentClient::new(&settings)?;
        Ok(Self::with_client(settings, client))
    }

    /// Assemble state around an existing client. Tests use this to aim the
    /// site at a mock content source.
    pub fn with_client(settings: Settings, client: ContentClient) -> Self {
        Self {
            settings,
            client,
            cache: PageCache::new(),
        }
    }

    fn window_for(&self, route: &RouteKey) -> Duration {
        match route {
            RouteKey::Home => Duration::from_secs(self.settings.home_revalidate_secs),
            RouteKey::Article(_) => Duration::from_secs(self.settings.article_revalidate_secs),
        }
    }
}

/// Build the site router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/articles/{id}", get(article_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home_handler(State(state): State<Arc<AppState>>) -> Response {
    serve_route(state, RouteKey::Home).await
}

async fn article_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    serve_route(state, RouteKey::Article(id)).await
}

async fn serve_route(state: Arc<AppState>, route: RouteKey) -> Response {
    let window = state.window_for(&route);
    match state.cache.lookup(&route, window) {
        CacheState::Fresh(html) => Html(html.to_string()).into_response(),
        CacheState::Stale(html) => {
            spawn_refresh(&state, &route);
            Html(html.to_string()).into_response()
        }
        CacheState::Missing => first_render(&state, &route, window).await,
    }
}

/// Kick off one background regeneration unless one is already in flight for
/// this route.
fn spawn_refresh(state: &Arc<AppState>, route: &RouteKey) {
    let Ok(guard) = state.cache.refresh_lock(route).try_lock_owned() else {
        // Another request already triggered this refresh.
        return;
    };

    let state = Arc::clone(state);
    let route = route.clone();
    tokio::spawn(async move {
        let _guard = guard;
        match render_into_cache(&state, &route).await {
            Ok(_) => info!(%route, "regenerated page"),
            Err(err) => warn!(%route, %err, "refresh failed; keeping stale render"),
        }
    });
}

/// Block the first request for a route on a synchronous render. Concurrent
/// misses for the same route coalesce onto one fetch via the refresh lock.
async fn first_render(state: &Arc<AppState>, route: &RouteKey, window: Duration) -> Response {
    let lock = state.cache.refresh_lock(route);
    let _guard = lock.lock().await;

    // Another request may have rendered this route while we waited.
    match state.cache.lookup(route, window) {
        CacheState::Fresh(html) | CacheState::Stale(html) => {
            return Html(html.to_string()).into_response();
        }
        CacheState::Missing => {}
    }

    match render_into_cache(state, route).await {
        Ok(html) => Html(html.to_string()).into_response(),
        // Nothing is cached for an unknown id, so an article published later
        // under this id shows up on the next request.
        Err(Error::NotFound { .. }) => {
            (StatusCode::NOT_FOUND, Html(views::not_found_page())).into_response()
        }
        Err(err) => {
            error!(%route, %err, "page generation failed with no cached fallback");
            (StatusCode::BAD_GATEWAY, Html(views::error_page())).into_response()
        }
    }
}

/// Query the content source and cache a fresh render for `route`.
async fn render_into_cache(state: &Arc<AppState>, route: &RouteKey) -> Result<Arc<str>> {
    let html: Arc<str> = match route {
        RouteKey::Home => {
            let query = ListQuery::new().limit(state.settings.listing_limit);
            let list = state.client.list_articles(&query).await?;
            Arc::from(views::home_page(&list.contents))
        }
        RouteKey::Article(id) => {
            let article = state.client.get_article(id).await?;
            Arc::from(views::article_page(&article))
        }
    };
    state.cache.insert(route.clone(), Arc::clone(&html));
    Ok(html)
}

/// Pre-render the listing page and the most recent article pages.
///
/// Failures are logged and skipped; an unreachable source at startup must not
/// keep the server from coming up, it only means pages render lazily.
pub async fn prewarm(state: &Arc<AppState>) {
    if let Err(err) = render_into_cache(state, &RouteKey::Home).await {
        warn!(%err, "could not pre-render listing page");
    }

    let ids = match state
        .client
        .list_article_ids(state.settings.prerender_cap)
        .await
    {
        Ok(ids) => ids,
        Err(err) => {
            warn!(%err, "could not collect article ids; detail pages render lazily");
            return;
        }
    };

    for id in ids {
        let route = RouteKey::Article(id);
        if let Err(err) = render_into_cache(state, &route).await {
            warn!(%route, %err, "pre-render failed; page renders lazily");
        }
    }
    info!(pages = state.cache.len(), "pre-rendered pages");
}
