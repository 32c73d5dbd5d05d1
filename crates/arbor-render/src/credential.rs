//! Layout driver for the credential DAG diagram.
//!
//! The positioning itself is delegated to a [`LayoutEngine`] through the
//! adapter boundary; this module only prepares the input and reads positions
//! back. An engine failure has already been logged by the adapter and surfaces
//! here as `Ok(None)`, the caller's "layout unavailable" state.

use crate::model::{CredentialDiagramLayout, CredentialNodeLayout, RelationLayout};
use crate::Result;
use arbor_core::{theme, CredentialGraph};
use arbor_layout::adapter::{
    apply_layout_or_absent, credential_layout_input, CARD_HEIGHT, CARD_WIDTH,
};
use arbor_layout::engine::{LayoutEngine, LayoutOptions};
use arbor_layout::viewport::{node_bounds, Point};

#[derive(Debug, Clone, Default)]
pub struct CredentialLayoutOptions {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub engine_options: LayoutOptions,
}

impl CredentialLayoutOptions {
    pub fn with_viewport(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            viewport_width,
            viewport_height,
            engine_options: LayoutOptions::default(),
        }
    }
}

pub fn layout_credential_diagram(
    graph: &CredentialGraph,
    engine: &dyn LayoutEngine,
    options: &CredentialLayoutOptions,
) -> Result<Option<CredentialDiagramLayout>> {
    let input = credential_layout_input(graph, options.engine_options.clone());
    let Some(positions) = apply_layout_or_absent(engine, input) else {
        return Ok(None);
    };

    let mut nodes = Vec::with_capacity(graph.credentials().len());
    for credential in graph.credentials() {
        let Some(point) = positions.get(&credential.id) else {
            continue;
        };
        nodes.push(CredentialNodeLayout {
            id: credential.id.clone(),
            title: credential.title.clone(),
            x: point.x,
            y: point.y,
            width: CARD_WIDTH,
            height: CARD_HEIGHT,
            color: theme::college_color(&credential.category).to_string(),
            cadence: credential.cadence,
            level: credential.level,
        });
    }

    let relations = graph
        .relations()
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            let from = positions.get(&r.from)?;
            let to = positions.get(&r.to)?;
            Some(RelationLayout {
                id: format!("rel-{i}"),
                from: r.from.clone(),
                to: r.to.clone(),
                kind: r.kind,
                x1: from.x,
                y1: from.y + CARD_HEIGHT / 2.0,
                x2: to.x,
                y2: to.y - CARD_HEIGHT / 2.0,
            })
        })
        .collect();

    let bounds = node_bounds(
        nodes
            .iter()
            .map(|n| (Point::new(n.x, n.y), n.width, n.height)),
        options.viewport_width,
        options.viewport_height,
    );

    Ok(Some(CredentialDiagramLayout {
        bounds,
        nodes,
        relations,
    }))
}
