//! Masthead content client.
//!
//! Wraps the remote content source's read-only HTTP API (a list endpoint and a
//! get-by-id endpoint over the `articles` collection) behind typed operations.
//! All other code talks to the source exclusively through [`ContentClient`].

pub mod client;
pub mod query;

pub use client::ContentClient;
pub use query::{ListQuery, DEFAULT_ORDERS};
