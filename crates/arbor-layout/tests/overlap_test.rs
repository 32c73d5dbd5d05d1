use arbor_core::{Vine, VineGraph, VineNode};
use arbor_layout::overlap::{resolve_lane, resolve_vine_overlaps};
use arbor_layout::temporal::TemporalScale;
use rustc_hash::FxHashMap;

fn node(id: &str, vine: Vine, t: f64) -> VineNode {
    VineNode {
        id: id.to_string(),
        title: id.to_uppercase(),
        vine,
        time_height: t,
        date_label: None,
        tags: Vec::new(),
        description: String::new(),
        roots: Vec::new(),
        shoots: Vec::new(),
        tendrils: Vec::new(),
    }
}

#[test]
fn well_spread_nodes_keep_their_ideal_positions() {
    // Scenario: times 0, 1, 2 over a tall viewport; ideal gaps are already 400px.
    let scale = TemporalScale::new(0.0, 2.0, 1000.0, 100.0);
    let mut out = FxHashMap::default();
    resolve_lane(&[("a", 0.0), ("b", 1.0), ("c", 2.0)], &scale, 70.0, &mut out);

    assert_eq!(out["a"], 900.0);
    assert_eq!(out["b"], 500.0);
    assert_eq!(out["c"], 100.0);
}

#[test]
fn resolved_positions_decrease_with_gaps_of_at_least_min_spacing() {
    let scale = TemporalScale::new(0.0, 2.0, 1000.0, 100.0);
    let mut out = FxHashMap::default();
    resolve_lane(&[("a", 0.0), ("b", 1.0), ("c", 2.0)], &scale, 70.0, &mut out);

    assert!(out["a"] > out["b"] && out["b"] > out["c"]);
    assert!(out["a"] - out["b"] >= 70.0);
    assert!(out["b"] - out["c"] >= 70.0);
}

#[test]
fn crowded_nodes_are_pushed_apart_by_exactly_min_spacing() {
    let scale = TemporalScale::new(0.0, 100.0, 1000.0, 100.0);
    // Nearly coincident in time; ideals are ~0.08px apart.
    let mut out = FxHashMap::default();
    resolve_lane(
        &[("a", 0.0), ("b", 0.01), ("c", 0.02)],
        &scale,
        70.0,
        &mut out,
    );

    assert_eq!(out["a"], 900.0);
    assert!((out["a"] - out["b"] - 70.0).abs() < 1e-9);
    assert!((out["b"] - out["c"] - 70.0).abs() < 1e-9);
}

#[test]
fn input_order_does_not_matter() {
    let scale = TemporalScale::new(0.0, 100.0, 1000.0, 100.0);
    let mut sorted = FxHashMap::default();
    let mut shuffled = FxHashMap::default();
    resolve_lane(&[("a", 1.0), ("b", 2.0), ("c", 3.0)], &scale, 70.0, &mut sorted);
    resolve_lane(&[("c", 3.0), ("a", 1.0), ("b", 2.0)], &scale, 70.0, &mut shuffled);
    assert_eq!(sorted, shuffled);
}

#[test]
fn lanes_are_resolved_independently() {
    let graph = VineGraph::new(
        vec![
            node("h1", Vine::History, 0.0),
            node("h2", Vine::History, 0.1),
            node("s1", Vine::Science, 0.05),
        ],
        Vec::new(),
    )
    .unwrap();
    let scale = TemporalScale::new(0.0, 100.0, 1000.0, 100.0);
    let resolved = resolve_vine_overlaps(&graph, &scale, 70.0);

    // History pair is pushed apart; the science node stays at its ideal even
    // though it sits between them in time.
    assert!((resolved.y("h1", 0.0) - resolved.y("h2", 0.1)).abs() >= 70.0);
    assert_eq!(resolved.y("s1", 0.05), scale.y(0.05));
}

#[test]
fn missing_ids_fall_back_to_the_raw_temporal_mapping() {
    let graph = VineGraph::new(vec![node("a", Vine::History, 0.0)], Vec::new()).unwrap();
    let scale = TemporalScale::new(0.0, 10.0, 1000.0, 100.0);
    let resolved = resolve_vine_overlaps(&graph, &scale, 70.0);
    assert_eq!(resolved.y("never-seen", 5.0), scale.y(5.0));
}
