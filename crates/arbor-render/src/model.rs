//! Serializable layout output types. Positions are centers; sizes are full
//! extents. `Bounds` comes from the layout crate so both diagram families share
//! one box type.

use arbor_core::{Cadence, ConnectionKind, LevelBand, RelationKind};
use serde::Serialize;

pub use arbor_layout::viewport::Bounds;

#[derive(Debug, Clone, Serialize)]
pub struct LaneColumn {
    pub vine: String,
    pub x: f64,
    pub width: f64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BandMarker {
    pub band: String,
    pub symbol: String,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeLayout {
    pub id: String,
    pub title: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: String,
    pub band_symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_label: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionLayout {
    pub id: String,
    pub from: String,
    pub to: String,
    pub kind: ConnectionKind,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BraidOverlay {
    pub id: String,
    pub name: String,
    pub bounds: Bounds,
    pub color: String,
    pub intensity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VineDiagramLayout {
    pub bounds: Bounds,
    pub lanes: Vec<LaneColumn>,
    pub band_markers: Vec<BandMarker>,
    pub nodes: Vec<NodeLayout>,
    pub connections: Vec<ConnectionLayout>,
    pub braids: Vec<BraidOverlay>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CredentialNodeLayout {
    pub id: String,
    pub title: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub cadence: Cadence,
    pub level: LevelBand,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationLayout {
    pub id: String,
    pub from: String,
    pub to: String,
    pub kind: RelationKind,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CredentialDiagramLayout {
    pub bounds: Bounds,
    pub nodes: Vec<CredentialNodeLayout>,
    pub relations: Vec<RelationLayout>,
}
