//! Async client for the remote content source.

use std::time::Duration;

use masthead_core::{Article, ArticleList, Error, Result, Settings};
use serde::Deserialize;
use tracing::debug;

use crate::query::{ListQuery, DEFAULT_ORDERS};

/// Header carrying the access credential on every request.
const API_KEY_HEADER: &str = "X-MICROCMS-API-KEY";

/// Sole point of contact with the external content source.
///
/// Strictly read-only: two query operations plus an id-collection helper used
/// for pre-rendering. Performs no retries and holds no cache state; staleness
/// handling lives entirely in the page-output layer.
pub struct ContentClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ContentClient {
    /// Create a client from process settings.
    ///
    /// Fails with a configuration error before any network call when either
    /// credential is missing.
    pub fn new(settings: &Settings) -> Result<Self> {
        if settings.service_domain.is_empty() {
            return Err(Error::config("service_domain must not be empty"));
        }
        if settings.api_key.is_empty() {
            return Err(Error::config("api_key must not be empty"));
        }

        Self::with_base_url(
            format!("https://{}.microcms.io/api/v1", settings.service_domain),
            &settings.api_key,
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    /// Create a client against an explicit base URL.
    ///
    /// Used by tests to point at a local mock of the content source.
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    /// List articles in the source's sort order (newest published first unless
    /// the query overrides it). No client-side re-sorting or filtering.
    pub async fn list_articles(&self, query: &ListQuery) -> Result<ArticleList> {
        let url = self.articles_url();
        self.fetch_json(&url, &query.to_params()).await
    }

    /// Fetch one article by content id.
    ///
    /// An upstream 404 maps to [`Error::NotFound`]; every other failure is a
    /// [`Error::ContentSource`].
    pub async fn get_article(&self, id: &str) -> Result<Article> {
        if id.is_empty() {
            return Err(Error::not_found(id));
        }

        let url = format!("{}/{}", self.articles_url(), id);
        self.fetch_json(&url, &[]).await.map_err(|err| match err {
            Error::ContentSource {
                status: Some(404), ..
            } => Error::not_found(id),
            other => other,
        })
    }

    /// Collect the ids of the `cap` most recent articles, for pre-rendering.
    pub async fn list_article_ids(&self, cap: usize) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct IdOnly {
            id: String,
        }
        #[derive(Deserialize)]
        struct IdList {
            contents: Vec<IdOnly>,
        }

        let params = [
            ("orders", DEFAULT_ORDERS.to_string()),
            ("limit", cap.to_string()),
            ("fields", "id".to_string()),
        ];
        let url = self.articles_url();
        let list: IdList = self.fetch_json(&url, &params).await?;
        Ok(list.contents.into_iter().map(|c| c.id).collect())
    }

    fn articles_url(&self) -> String {
        format!("{}/articles", self.base_url)
    }

    /// Authenticated GET returning decoded JSON.
    async fn fetch_json<T>(&self, url: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        debug!(%url, "querying content source");

        let response = self
            .http
            .get(url)
            .query(params)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(url)
                } else {
                    Error::transport(&e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::upstream_status(status.as_u16(), &detail));
        }

        response.json::<T>().await.map_err(|e| Error::decode(&e))
    }
}
