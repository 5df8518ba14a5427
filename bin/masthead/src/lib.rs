//! Masthead site server.
//!
//! A small server-rendered marketing/blog site: a listing page and per-article
//! detail pages, backed by a headless content API and statically regenerated
//! on a timer.
//!
//! # Modules
//!
//! - [`server`] - Router, handlers, and the page-regeneration flow
//! - [`views`] - HTML views for every page
//! - [`template`] - String-interpolation template primitives

pub mod server;
pub mod template;
pub mod views;

pub use server::AppState;

/// Initialize tracing with the specified verbosity level.
///
/// `verbose` maps 0 to WARN, 1 to INFO, 2 to DEBUG, and anything higher to
/// TRACE; `RUST_LOG` directives still apply on top.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
