use arbor_core::{Cadence, Credential, CredentialGraph, CredentialRelation, LevelBand, RelationKind};
use arbor_layout::adapter::{
    apply_layout, apply_layout_or_absent, credential_layout_input, CARD_HEIGHT, CARD_WIDTH,
};
use arbor_layout::engine::{
    ChildOptions, LayeredEngine, LayoutChild, LayoutDirection, LayoutEdge, LayoutEngine,
    LayoutGraph, LayoutOptions,
};

fn child(id: &str) -> LayoutChild {
    LayoutChild {
        id: id.to_string(),
        width: CARD_WIDTH,
        height: CARD_HEIGHT,
        layout_options: None,
        x: None,
        y: None,
    }
}

fn edge(id: &str, from: &str, to: &str) -> LayoutEdge {
    LayoutEdge {
        id: id.to_string(),
        sources: vec![from.to_string()],
        targets: vec![to.to_string()],
    }
}

fn graph(children: Vec<LayoutChild>, edges: Vec<LayoutEdge>) -> LayoutGraph {
    LayoutGraph {
        id: "test".to_string(),
        children,
        edges,
        layout_options: LayoutOptions::default(),
    }
}

#[test]
fn chain_is_stacked_in_rank_order() {
    let out = LayeredEngine
        .layout(graph(
            vec![child("a"), child("b"), child("c")],
            vec![edge("e1", "a", "b"), edge("e2", "b", "c")],
        ))
        .unwrap();

    let y = |id: &str| {
        out.children
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.y)
            .unwrap()
    };
    assert!(y("a") < y("b"));
    assert!(y("b") < y("c"));
}

#[test]
fn siblings_share_a_layer_and_do_not_overlap() {
    let out = LayeredEngine
        .layout(graph(
            vec![child("root"), child("left"), child("right")],
            vec![edge("e1", "root", "left"), edge("e2", "root", "right")],
        ))
        .unwrap();

    let get = |id: &str| out.children.iter().find(|c| c.id == id).unwrap();
    assert_eq!(get("left").y, get("right").y);
    let dx = (get("left").x.unwrap() - get("right").x.unwrap()).abs();
    assert!(dx >= CARD_WIDTH);
}

#[test]
fn layer_hints_raise_the_rank_floor() {
    let mut hinted = child("late");
    hinted.layout_options = Some(ChildOptions {
        layer_hint: Some(3),
        priority: None,
    });
    let out = LayeredEngine
        .layout(graph(vec![child("early"), hinted], Vec::new()))
        .unwrap();

    let y = |id: &str| {
        out.children
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.y)
            .unwrap()
    };
    assert!(y("early") < y("late"));
}

#[test]
fn up_direction_flips_the_layer_axis() {
    let mut g = graph(
        vec![child("a"), child("b")],
        vec![edge("e1", "a", "b")],
    );
    g.layout_options.direction = LayoutDirection::Up;
    let out = LayeredEngine.layout(g).unwrap();
    let get = |id: &str| out.children.iter().find(|c| c.id == id).unwrap();
    assert!(get("a").y.unwrap() > get("b").y.unwrap());
}

#[test]
fn cyclic_input_is_an_error_and_degrades_to_absent() {
    let g = graph(
        vec![child("a"), child("b")],
        vec![edge("e1", "a", "b"), edge("e2", "b", "a")],
    );
    assert!(LayeredEngine.layout(g.clone()).is_err());
    assert!(apply_layout_or_absent(&LayeredEngine, g).is_none());
}

#[test]
fn credential_input_carries_level_hints_and_positions_come_back_keyed() {
    let creds = vec![
        Credential {
            id: "counting".to_string(),
            title: "Counting".to_string(),
            cadence: Cadence::Seasonal,
            category: "MATH".to_string(),
            level: LevelBand::K1,
            duration_weeks: 9,
            parent_seasonal: None,
        },
        Credential {
            id: "algebra-1".to_string(),
            title: "Algebra 1".to_string(),
            cadence: Cadence::Seasonal,
            category: "MATH".to_string(),
            level: LevelBand::High,
            duration_weeks: 12,
            parent_seasonal: None,
        },
    ];
    let rels = vec![CredentialRelation {
        from: "counting".to_string(),
        to: "algebra-1".to_string(),
        kind: RelationKind::Prereq,
    }];
    let graph = CredentialGraph::new(creds, rels).unwrap();

    let input = credential_layout_input(&graph, LayoutOptions::default());
    assert_eq!(input.children.len(), 2);
    assert_eq!(
        input.children[0].layout_options.unwrap().layer_hint,
        Some(LevelBand::K1.rank())
    );

    let positions = apply_layout(&LayeredEngine, input).unwrap();
    assert_eq!(positions.len(), 2);
    let k1 = positions.get("counting").unwrap();
    let high = positions.get("algebra-1").unwrap();
    assert!(k1.y < high.y);
}

#[test]
fn unknown_edge_endpoints_are_skipped_not_fatal() {
    let out = LayeredEngine
        .layout(graph(vec![child("a")], vec![edge("e1", "a", "ghost")]))
        .unwrap();
    assert!(out.children[0].x.is_some());
}

#[test]
fn empty_graph_lays_out_to_itself() {
    let out = LayeredEngine.layout(graph(Vec::new(), Vec::new())).unwrap();
    assert!(out.children.is_empty());
}
