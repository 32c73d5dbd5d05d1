#![forbid(unsafe_code)]

//! Domain model + data loading for Arbor Temporis (headless).
//!
//! Design goals:
//! - immutable graphs, validated once at construction
//! - deterministic, testable outputs (no I/O below `data`)
//! - renderer-agnostic: positions and SVG live in sibling crates

pub mod data;
pub mod error;
pub mod model;
pub mod theme;

pub use data::{load_credential_graph, load_vine_graph};
pub use error::{Error, Result};
pub use model::{
    Braid, Cadence, Connection, ConnectionKind, Credential, CredentialGraph, CredentialRelation,
    LevelBand, RelationKind, TemporalBand, Vine, VineGraph, VineNode,
};
