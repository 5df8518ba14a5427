//! Query parameters accepted by the source's list endpoint.

/// Default sort specification: newest published first.
pub const DEFAULT_ORDERS: &str = "-publishedAt";

/// Parameters for [`ContentClient::list_articles`].
///
/// All fields are optional; unset fields are omitted from the request so the
/// source applies its own defaults. The one exception is the sort order, which
/// defaults to [`DEFAULT_ORDERS`] unless overridden.
///
/// [`ContentClient::list_articles`]: crate::ContentClient::list_articles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Maximum number of items to return.
    pub limit: Option<usize>,
    /// Number of items to skip.
    pub offset: Option<usize>,
    /// Sort specification, e.g. `-publishedAt` or `publishedAt`.
    pub orders: Option<String>,
    /// Raw filter expression, passed through verbatim.
    pub filters: Option<String>,
}

impl ListQuery {
    /// Create an empty query (source defaults, newest-first sort).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of items to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the number of items to skip.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Override the sort order.
    pub fn orders(mut self, orders: impl Into<String>) -> Self {
        self.orders = Some(orders.into());
        self
    }

    /// Set a filter expression.
    pub fn filters(mut self, filters: impl Into<String>) -> Self {
        self.filters = Some(filters.into());
        self
    }

    /// Render the query as request parameters.
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![(
            "orders",
            self.orders
                .clone()
                .unwrap_or_else(|| DEFAULT_ORDERS.to_string()),
        )];
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }
        if let Some(filters) = &self.filters {
            params.push(("filters", filters.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_still_sorts_newest_first() {
        let params = ListQuery::new().to_params();
        assert_eq!(params, vec![("orders", "-publishedAt".to_string())]);
    }

    #[test]
    fn test_builder_sets_all_params() {
        let params = ListQuery::new()
            .limit(9)
            .offset(18)
            .orders("publishedAt")
            .filters("tags[contains]t1")
            .to_params();
        assert_eq!(
            params,
            vec![
                ("orders", "publishedAt".to_string()),
                ("limit", "9".to_string()),
                ("offset", "18".to_string()),
                ("filters", "tags[contains]t1".to_string()),
            ]
        );
    }
}
