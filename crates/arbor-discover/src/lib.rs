#![forbid(unsafe_code)]

//! Offline course-discovery pipeline: fetch external catalogs, cache them,
//! estimate durations, match courses to credentials, and suggest prerequisite
//! edges.
//!
//! Everything in here is explicitly heuristic. Individual fetch or parse
//! failures skip the item and are counted, never fatal; the only hard errors
//! are I/O and cache-format problems.

pub mod cache;
pub mod catalog;
pub mod estimate;
pub mod matching;
pub mod prereq;
pub mod scrape;

pub use catalog::CatalogCourse;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("model endpoint is not configured")]
    ModelUnconfigured,

    #[error("model reply had no usable content")]
    EmptyReply,
}

pub type Result<T> = std::result::Result<T, Error>;
