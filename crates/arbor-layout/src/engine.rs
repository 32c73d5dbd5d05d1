//! The external layout-engine boundary.
//!
//! `LayoutGraph` is the wire shape exchanged with a DAG layout engine: children
//! with declared sizes (and optional layer/priority hints), edges with
//! source/target id lists, and a fixed option set. Engines assign `x`/`y`
//! centers to children and are otherwise opaque; the built-in [`LayeredEngine`]
//! does longest-path ranking with stable in-rank ordering and makes no
//! crossing-minimization promises.

use crate::{Error, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

const MARGIN: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    /// Layers grow top to bottom.
    #[default]
    Down,
    Up,
    Right,
    Left,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    pub direction: LayoutDirection,
    pub node_sep: f64,
    pub layer_sep: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::Down,
            node_sep: 50.0,
            layer_sep: 90.0,
        }
    }
}

/// Per-child hints derived from domain ordering (e.g. level-band rank).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_hint: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutChild {
    pub id: String,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_options: Option<ChildOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEdge {
    pub id: String,
    pub sources: Vec<String>,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutGraph {
    pub id: String,
    pub children: Vec<LayoutChild>,
    pub edges: Vec<LayoutEdge>,
    pub layout_options: LayoutOptions,
}

pub trait LayoutEngine {
    fn layout(&self, graph: LayoutGraph) -> Result<LayoutGraph>;
}

/// Built-in layered engine: longest-path ranks (layer hints raise the floor),
/// in-rank order by priority then insertion, centers packed per layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredEngine;

impl LayoutEngine for LayeredEngine {
    fn layout(&self, mut graph: LayoutGraph) -> Result<LayoutGraph> {
        let n = graph.children.len();
        if n == 0 {
            return Ok(graph);
        }

        let index: FxHashMap<String, usize> = graph
            .children
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();

        let mut out: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut indegree = vec![0usize; n];
        for edge in &graph.edges {
            for source in &edge.sources {
                for target in &edge.targets {
                    let (Some(&s), Some(&t)) = (index.get(source), index.get(target)) else {
                        tracing::warn!(edge = %edge.id, "skipping edge with unknown endpoint");
                        continue;
                    };
                    out[s].push(t);
                    indegree[t] += 1;
                }
            }
        }

        // Longest-path ranks; a layer hint is a floor, not an override.
        let mut rank: Vec<usize> = graph
            .children
            .iter()
            .map(|c| c.layout_options.and_then(|o| o.layer_hint).unwrap_or(0))
            .collect();
        let mut queue: std::collections::VecDeque<usize> =
            (0..n).filter(|&i| indegree[i] == 0).collect();
        let mut seen = 0usize;
        while let Some(u) = queue.pop_front() {
            seen += 1;
            for &v in &out[u] {
                rank[v] = rank[v].max(rank[u] + 1);
                indegree[v] -= 1;
                if indegree[v] == 0 {
                    queue.push_back(v);
                }
            }
        }
        if seen != n {
            let id = indegree
                .iter()
                .position(|&d| d > 0)
                .map(|i| graph.children[i].id.clone())
                .unwrap_or_default();
            return Err(Error::CyclicInput { id });
        }

        // Stable in-rank order: higher priority first, insertion order breaks ties.
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&i| {
            let priority = graph.children[i]
                .layout_options
                .and_then(|o| o.priority)
                .unwrap_or(0);
            (rank[i], std::cmp::Reverse(priority), i)
        });

        let max_rank = rank.iter().copied().max().unwrap_or(0);
        let mut layer_heights = vec![0.0f64; max_rank + 1];
        for &i in &order {
            layer_heights[rank[i]] = layer_heights[rank[i]].max(graph.children[i].height);
        }

        let opts = graph.layout_options.clone();
        let mut layer_y = vec![0.0f64; max_rank + 1];
        let mut y_cursor = MARGIN;
        for (r, height) in layer_heights.iter().enumerate() {
            layer_y[r] = y_cursor + height / 2.0;
            y_cursor += height + opts.layer_sep;
        }
        let total_extent = y_cursor - opts.layer_sep + MARGIN;

        let mut x_cursor = vec![MARGIN; max_rank + 1];
        for &i in &order {
            let r = rank[i];
            let w = graph.children[i].width;
            let cx = x_cursor[r] + w / 2.0;
            x_cursor[r] += w + opts.node_sep;

            let (x, y) = match opts.direction {
                LayoutDirection::Down => (cx, layer_y[r]),
                LayoutDirection::Up => (cx, total_extent - layer_y[r]),
                LayoutDirection::Right => (layer_y[r], cx),
                LayoutDirection::Left => (total_extent - layer_y[r], cx),
            };
            graph.children[i].x = Some(x);
            graph.children[i].y = Some(y);
        }

        Ok(graph)
    }
}
