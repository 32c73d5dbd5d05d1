//! Adapter between the credential domain model and the layout-engine boundary.
//!
//! Builds the engine's input graph (declared card sizes, layer hints from the
//! level-band ordering, priority from cadence), runs the engine, and copies the
//! assigned centers back into an id-keyed map. An engine failure is logged and
//! surfaces as `None`; callers render a placeholder instead of retrying.
//!
//! The async wrapper is a plain future: dropping it abandons the computation,
//! which is the whole cancellation story for a torn-down view.

use crate::engine::{
    ChildOptions, LayoutChild, LayoutEdge, LayoutEngine, LayoutGraph, LayoutOptions,
};
use crate::viewport::Point;
use crate::{Error, Result};
use arbor_core::{Cadence, CredentialGraph};
use rustc_hash::FxHashMap;

pub const CARD_WIDTH: f64 = 180.0;
pub const CARD_HEIGHT: f64 = 64.0;

/// Positions read back from one engine run.
#[derive(Debug, Clone, Default)]
pub struct PositionMap {
    positions: FxHashMap<String, Point>,
}

impl PositionMap {
    pub fn get(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Engine input for a credential graph.
pub fn credential_layout_input(graph: &CredentialGraph, options: LayoutOptions) -> LayoutGraph {
    let children = graph
        .credentials()
        .iter()
        .map(|c| LayoutChild {
            id: c.id.clone(),
            width: CARD_WIDTH,
            height: CARD_HEIGHT,
            layout_options: Some(ChildOptions {
                layer_hint: Some(c.level.rank()),
                priority: Some(match c.cadence {
                    Cadence::Seasonal => 1,
                    Cadence::Monthly => 0,
                }),
            }),
            x: None,
            y: None,
        })
        .collect();

    let edges = graph
        .relations()
        .iter()
        .enumerate()
        .map(|(i, r)| LayoutEdge {
            id: format!("rel-{i}"),
            sources: vec![r.from.clone()],
            targets: vec![r.to.clone()],
        })
        .collect();

    LayoutGraph {
        id: "credentials".to_string(),
        children,
        edges,
        layout_options: options,
    }
}

/// Runs the engine and reads back positions, one entry per input child.
pub fn apply_layout(engine: &dyn LayoutEngine, input: LayoutGraph) -> Result<PositionMap> {
    let output = engine.layout(input)?;
    let mut positions = FxHashMap::default();
    for child in &output.children {
        let (Some(x), Some(y)) = (child.x, child.y) else {
            return Err(Error::MissingPosition {
                id: child.id.clone(),
            });
        };
        positions.insert(child.id.clone(), Point::new(x, y));
    }
    Ok(PositionMap { positions })
}

/// Like [`apply_layout`], but degrades an engine failure into an absent layout
/// after logging it. This is the surface interactive views use.
pub fn apply_layout_or_absent(engine: &dyn LayoutEngine, input: LayoutGraph) -> Option<PositionMap> {
    match apply_layout(engine, input) {
        Ok(map) => Some(map),
        Err(err) => {
            tracing::error!(%err, "layout engine failed; leaving layout absent");
            None
        }
    }
}

/// Async wrapper over [`apply_layout_or_absent`]; the work itself is CPU-bound.
pub async fn apply_layout_async(
    engine: &dyn LayoutEngine,
    input: LayoutGraph,
) -> Option<PositionMap> {
    apply_layout_or_absent(engine, input)
}
