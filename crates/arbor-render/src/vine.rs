//! Layout driver for the temporal "tree of vines" diagram.

use crate::model::{
    BandMarker, BraidOverlay, ConnectionLayout, LaneColumn, NodeLayout, VineDiagramLayout,
};
use crate::Result;
use arbor_core::{theme, TemporalBand, VineGraph};
use arbor_layout::overlap::{resolve_vine_overlaps, DEFAULT_MIN_SPACING};
use arbor_layout::temporal::{LaneScale, TemporalScale};
use arbor_layout::viewport::{node_bounds, Point};
use rustc_hash::FxHashMap;

pub const NODE_RADIUS: f64 = 16.0;
const TOP_BOTTOM_PADDING: f64 = 100.0;
const BRAID_PADDING: f64 = NODE_RADIUS * 2.0;

#[derive(Debug, Clone)]
pub struct VineLayoutOptions {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub min_spacing: f64,
    pub padding: f64,
}

impl Default for VineLayoutOptions {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            min_spacing: DEFAULT_MIN_SPACING,
            padding: TOP_BOTTOM_PADDING,
        }
    }
}

pub fn layout_vine_diagram(
    graph: &VineGraph,
    options: &VineLayoutOptions,
) -> Result<VineDiagramLayout> {
    let lane_scale = LaneScale::of_vines(options.viewport_width);
    let lanes: Vec<LaneColumn> = arbor_core::Vine::ALL
        .iter()
        .map(|&vine| LaneColumn {
            vine: vine.name().to_string(),
            x: lane_scale.x(vine.name()),
            width: lane_scale.lane_width(),
            color: theme::vine_color(vine).to_string(),
        })
        .collect();

    let Some((min_time, max_time)) = graph.time_range() else {
        // Degenerate input: no nodes. Full-viewport bounds, empty content.
        return Ok(VineDiagramLayout {
            bounds: node_bounds(
                std::iter::empty(),
                options.viewport_width,
                options.viewport_height,
            ),
            lanes,
            band_markers: Vec::new(),
            nodes: Vec::new(),
            connections: Vec::new(),
            braids: Vec::new(),
        });
    };

    // The temporal scale requires a non-degenerate range; single-timestamp data
    // gets a widened window so the precondition always holds.
    let (min_time, max_time) = if max_time > min_time {
        (min_time, max_time)
    } else {
        (min_time - 1.0, max_time + 1.0)
    };
    let scale = TemporalScale::new(
        min_time,
        max_time,
        options.viewport_height,
        options.padding,
    );
    let resolved = resolve_vine_overlaps(graph, &scale, options.min_spacing);

    let mut positions: FxHashMap<&str, Point> = FxHashMap::default();
    let mut nodes = Vec::with_capacity(graph.nodes().len());
    for node in graph.nodes() {
        let point = Point::new(
            lane_scale.x(node.vine.name()),
            resolved.y(&node.id, node.time_height),
        );
        positions.insert(node.id.as_str(), point);
        nodes.push(NodeLayout {
            id: node.id.clone(),
            title: node.title.clone(),
            x: point.x,
            y: point.y,
            radius: NODE_RADIUS,
            color: theme::vine_color(node.vine).to_string(),
            band_symbol: theme::band_symbol(node.band()).to_string(),
            date_label: node.date_label.clone(),
        });
    }

    let connections = graph
        .connections()
        .iter()
        .filter_map(|c| {
            let from = positions.get(c.from.as_str())?;
            let to = positions.get(c.to.as_str())?;
            Some(ConnectionLayout {
                id: c.id.clone(),
                from: c.from.clone(),
                to: c.to.clone(),
                kind: c.kind,
                x1: from.x,
                y1: from.y,
                x2: to.x,
                y2: to.y,
                strength: c.strength,
            })
        })
        .collect();

    let band_markers = band_markers(&scale, min_time, max_time);

    let braids = graph
        .braids()
        .iter()
        .filter_map(|braid| {
            let member_rects = braid.members.iter().filter_map(|m| {
                positions
                    .get(m.as_str())
                    .map(|&p| (p, NODE_RADIUS * 2.0, NODE_RADIUS * 2.0))
            });
            let raw = node_bounds(member_rects, options.viewport_width, options.viewport_height);
            if braid.members.is_empty() {
                return None;
            }
            let base = braid
                .vines
                .first()
                .map(|&v| theme::vine_color(v))
                .unwrap_or(theme::DEFAULT_COLLEGE_COLOR);
            Some(BraidOverlay {
                id: braid.id.clone(),
                name: braid.name.clone(),
                bounds: raw.expand(BRAID_PADDING),
                color: theme::mix_hex(base, "#ffffff", 1.0 - braid.intensity.clamp(0.0, 1.0)),
                intensity: braid.intensity,
            })
        })
        .collect();

    let bounds = node_bounds(
        nodes
            .iter()
            .map(|n| (Point::new(n.x, n.y), n.radius * 2.0, n.radius * 2.0)),
        options.viewport_width,
        options.viewport_height,
    );

    Ok(VineDiagramLayout {
        bounds,
        lanes,
        band_markers,
        nodes,
        connections,
        braids,
    })
}

/// One marker per band whose lower edge falls inside the visible time range,
/// plus the band the range opens in.
fn band_markers(scale: &TemporalScale, min_time: f64, max_time: f64) -> Vec<BandMarker> {
    let mut markers = Vec::new();
    for band in TemporalBand::ALL {
        let start = band.start();
        let anchor = if start.is_infinite() || start < min_time {
            if band != TemporalBand::from_time_height(min_time) {
                continue;
            }
            min_time
        } else if start > max_time {
            continue;
        } else {
            start
        };
        markers.push(BandMarker {
            band: band.name().to_string(),
            symbol: theme::band_symbol(band).to_string(),
            y: scale.y(anchor),
        });
    }
    markers
}
