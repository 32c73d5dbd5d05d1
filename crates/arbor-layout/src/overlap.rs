//! Per-lane overlap resolution.
//!
//! A greedy pass over each lane's chronologically sorted nodes: every node gets
//! its ideal temporal Y unless that lands within `min_spacing` of the previous
//! node's *assigned* Y, in which case it is pushed to exactly
//! `previous - min_spacing` (later = higher, so later nodes are pushed up).
//!
//! Guarantees, per lane: assigned Ys are strictly decreasing in time order and
//! pairwise separated by at least `min_spacing`. Nothing is guaranteed across
//! lanes, and the resolved extent may exceed the viewport; zoom-to-fit absorbs
//! that.

use crate::temporal::TemporalScale;
use arbor_core::{VineGraph, VineNode};
use rustc_hash::FxHashMap;

pub const DEFAULT_MIN_SPACING: f64 = 70.0;

/// Final per-node Y positions. Lookups for ids the resolver never saw fall back
/// to the raw temporal mapping.
#[derive(Debug, Clone)]
pub struct ResolvedPositions {
    positions: FxHashMap<String, f64>,
    scale: TemporalScale,
}

impl ResolvedPositions {
    pub fn y(&self, id: &str, time_height: f64) -> f64 {
        self.positions
            .get(id)
            .copied()
            .unwrap_or_else(|| self.scale.y(time_height))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Resolves one lane. `nodes` are `(id, time_height)` pairs in any order.
pub fn resolve_lane(
    nodes: &[(&str, f64)],
    scale: &TemporalScale,
    min_spacing: f64,
    out: &mut FxHashMap<String, f64>,
) {
    let mut sorted: Vec<(&str, f64)> = nodes.to_vec();
    sorted.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut prev: Option<f64> = None;
    for (id, t) in sorted {
        let ideal = scale.y(t);
        let assigned = match prev {
            Some(p) => ideal.min(p - min_spacing),
            None => ideal,
        };
        out.insert(id.to_string(), assigned);
        prev = Some(assigned);
    }
}

/// Resolves every lane of a vine graph independently.
pub fn resolve_vine_overlaps(
    graph: &VineGraph,
    scale: &TemporalScale,
    min_spacing: f64,
) -> ResolvedPositions {
    let mut by_lane: FxHashMap<&str, Vec<(&str, f64)>> = FxHashMap::default();
    for node in graph.nodes() {
        by_lane
            .entry(lane_of(node))
            .or_default()
            .push((node.id.as_str(), node.time_height));
    }

    let mut positions = FxHashMap::default();
    for nodes in by_lane.values() {
        resolve_lane(nodes, scale, min_spacing, &mut positions);
    }

    ResolvedPositions {
        positions,
        scale: *scale,
    }
}

fn lane_of(node: &VineNode) -> &str {
    node.vine.name()
}
