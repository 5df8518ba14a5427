//! Masthead core library.
//!
//! Shared types for the site server: the article data model as returned by the
//! remote content source, process configuration, and the error taxonomy.

pub mod article;
pub mod config;
pub mod error;

pub use article::{Article, ArticleList, CoverImage, Tag};
pub use config::Settings;
pub use error::{Error, Result, SourceErrorCode};
