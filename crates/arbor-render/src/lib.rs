#![forbid(unsafe_code)]

//! Headless layout drivers + SVG renderer for Arbor Temporis diagrams.

pub mod credential;
pub mod interaction;
pub mod model;
pub mod svg;
pub mod vine;

pub use interaction::Interaction;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid semantic model: {message}")]
    InvalidModel { message: String },

    #[error(transparent)]
    Layout(#[from] arbor_layout::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
