//! Route identities used as cache keys.

use std::fmt;

/// Identity of one cacheable page.
///
/// The page-output cache is keyed by route: the single listing route plus one
/// key per article id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteKey {
    /// The article listing page at `/`.
    Home,
    /// One article detail page at `/articles/{id}`.
    Article(String),
}

impl RouteKey {
    /// The article id for detail routes.
    pub fn article_id(&self) -> Option<&str> {
        match self {
            Self::Home => None,
            Self::Article(id) => Some(id),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("/"),
            Self::Article(id) => write!(f, "/articles/{id}"),
        }
    }
}
