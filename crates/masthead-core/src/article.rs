//! Article data model, owned by the remote content source.
//!
//! These types mirror the wire shape of the source's `articles` collection.
//! The site only ever reads them; creation, update, and deletion happen
//! entirely on the source side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tag attached to an article.
///
/// Source order is display order; the site never re-sorts tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Content id of the tag entry.
    pub id: String,
    /// Tag name as shown to readers.
    pub name: String,
}

/// Cover image reference. Dimensions are optional on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// An article as returned by the content source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Stable content id; doubles as the URL path segment.
    pub id: String,

    /// Article title.
    pub title: String,

    /// Rich-editor output: a pre-rendered HTML fragment.
    pub body: String,

    /// Optional summary, used for document metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional cover image; absence degrades to a placeholder visual.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<CoverImage>,

    /// Optional ordered tag list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Absent for unpublished drafts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Date shown to readers: publication date, falling back to creation date
    /// for drafts.
    pub fn display_date(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }

    /// Tags in source order; empty slice when the field is absent.
    pub fn display_tags(&self) -> &[Tag] {
        self.tags.as_deref().unwrap_or_default()
    }
}

/// Result envelope of the source's list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleList {
    /// Articles in the source's sort order.
    pub contents: Vec<Article>,
    /// Total number of articles matching the query, ignoring pagination.
    pub total_count: usize,
    pub offset: usize,
    pub limit: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_ARTICLE: &str = r#"{
        "id": "first-post",
        "title": "Hello",
        "body": "<p>Welcome</p>",
        "description": "An introduction",
        "coverImage": { "url": "https://img.example/cover.png", "width": 600, "height": 338 },
        "tags": [
            { "id": "t2", "name": "news" },
            { "id": "t1", "name": "intro" }
        ],
        "createdAt": "2024-01-01T09:00:00.000Z",
        "updatedAt": "2024-01-02T09:00:00.000Z",
        "publishedAt": "2024-01-03T09:00:00.000Z",
        "revisedAt": "2024-01-04T09:00:00.000Z"
    }"#;

    const MINIMAL_ARTICLE: &str = r#"{
        "id": "draft",
        "title": "Draft",
        "body": "<p>wip</p>",
        "createdAt": "2024-02-01T00:00:00.000Z",
        "updatedAt": "2024-02-01T00:00:00.000Z"
    }"#;

    #[test]
    fn test_deserialize_full_article() {
        let article: Article = serde_json::from_str(FULL_ARTICLE).expect("parse");
        assert_eq!(article.id, "first-post");
        assert_eq!(article.description.as_deref(), Some("An introduction"));

        let image = article.cover_image.as_ref().expect("cover image");
        assert_eq!(image.url, "https://img.example/cover.png");
        assert_eq!(image.width, Some(600));

        // Source order preserved.
        let names: Vec<&str> = article
            .display_tags()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["news", "intro"]);
    }

    #[test]
    fn test_deserialize_minimal_article() {
        let article: Article = serde_json::from_str(MINIMAL_ARTICLE).expect("parse");
        assert!(article.cover_image.is_none());
        assert!(article.tags.is_none());
        assert!(article.description.is_none());
        assert!(article.published_at.is_none());
        assert!(article.display_tags().is_empty());
    }

    #[test]
    fn test_display_date_prefers_published_at() {
        let article: Article = serde_json::from_str(FULL_ARTICLE).expect("parse");
        assert_eq!(
            article.display_date(),
            article.published_at.expect("published")
        );
    }

    #[test]
    fn test_display_date_falls_back_to_created_at() {
        let article: Article = serde_json::from_str(MINIMAL_ARTICLE).expect("parse");
        assert_eq!(article.display_date(), article.created_at);
    }

    #[test]
    fn test_deserialize_list_envelope() {
        let json = format!(
            r#"{{ "contents": [{FULL_ARTICLE}], "totalCount": 5, "offset": 0, "limit": 9 }}"#
        );
        let list: ArticleList = serde_json::from_str(&json).expect("parse");
        assert_eq!(list.contents.len(), 1);
        assert_eq!(list.total_count, 5);
        assert_eq!(list.limit, 9);
    }
}
