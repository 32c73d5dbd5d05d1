#![forbid(unsafe_code)]

//! Pure layout math for Arbor Temporis diagrams.
//!
//! Everything here is deterministic and I/O-free: scalar axis mappers, the
//! per-lane overlap resolver, the pan/zoom viewport controller, and the layered
//! DAG engine behind the external-layout boundary types.

pub mod adapter;
pub mod engine;
pub mod overlap;
pub mod temporal;
pub mod viewport;

pub use viewport::{Bounds, Point, Viewport};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("layout input contains a cycle through {id}")]
    CyclicInput { id: String },

    #[error("layout engine produced no position for {id}")]
    MissingPosition { id: String },
}

pub type Result<T> = std::result::Result<T, Error>;
