use louvain_communities::prelude::*;

fn triangle_pair() -> Graph {
    // Two disjoint triangles: 0-1-2 and 3-4-5.
    Graph::from_edges(&[
        Edge::new(0, 1),
        Edge::new(1, 2),
        Edge::new(0, 2),
        Edge::new(3, 4),
        Edge::new(4, 5),
        Edge::new(3, 5),
    ])
    .expect("valid edges")
}

/// `cliques` cliques of `size` nodes, bridged into a ring by single edges.
fn ring_of_cliques(cliques: u64, size: u64) -> Graph {
    let mut edges = Vec::new();
    for c in 0..cliques {
        let base = c * size;
        for u in 0..size {
            for v in (u + 1)..size {
                edges.push(Edge::new(base + u, base + v));
            }
        }
        let next = ((c + 1) % cliques) * size;
        edges.push(Edge::new(base + size - 1, next));
    }
    Graph::from_edges(&edges).expect("valid edges")
}

#[test]
fn two_disjoint_triangles_split_cleanly() {
    let clustering = detect_communities(triangle_pair(), &LouvainConfig::default()).unwrap();

    assert_eq!(clustering.assignments.len(), 6);
    let community = |id: u64| *clustering.assignments.get(&id).unwrap();
    assert_eq!(community(0), community(1));
    assert_eq!(community(1), community(2));
    assert_eq!(community(3), community(4));
    assert_eq!(community(4), community(5));
    assert_ne!(community(0), community(3));
    assert!((clustering.modularity - 0.5).abs() < 1e-9);
}

#[test]
fn isolated_nodes_stay_singletons() {
    let nodes: Vec<u64> = (0..5).collect();
    let graph = Graph::from_nodes_and_edges(&nodes, &[]).unwrap();
    let clustering = detect_communities(graph, &LouvainConfig::default()).unwrap();

    assert_eq!(clustering.assignments.len(), 5);
    assert_eq!(clustering.assignments.community_count(), 5);
    assert_eq!(clustering.modularity, 0.0);
}

#[test]
fn a_single_self_loop_has_zero_modularity() {
    let graph = Graph::from_edges(&[Edge::weighted(9, 9, 2.5)]).unwrap();
    let clustering = detect_communities(graph, &LouvainConfig::default()).unwrap();

    assert_eq!(clustering.assignments.len(), 1);
    assert!(clustering.assignments.get(&9).is_some());
    assert!(clustering.modularity.abs() < 1e-12);
}

#[test]
fn empty_input_yields_an_empty_mapping() {
    let clustering =
        detect_communities(Graph::from_edges(&[]).unwrap(), &LouvainConfig::default()).unwrap();
    assert!(clustering.assignments.is_empty());
    assert_eq!(clustering.levels, 0);
    assert_eq!(clustering.modularity, 0.0);
}

#[test]
fn weighted_edges_steer_the_split() {
    // Heavy pairs joined by a light bridge: 0=1 .. 2=3.
    let graph = Graph::from_edges(&[
        Edge::weighted(0, 1, 10.0),
        Edge::weighted(1, 2, 0.1),
        Edge::weighted(2, 3, 10.0),
    ])
    .unwrap();
    let clustering = detect_communities(graph, &LouvainConfig::default()).unwrap();

    let community = |id: u64| *clustering.assignments.get(&id).unwrap();
    assert_eq!(community(0), community(1));
    assert_eq!(community(2), community(3));
    assert_ne!(community(0), community(2));
}

#[test]
fn higher_resolution_never_yields_fewer_communities() {
    let low = detect_communities(
        ring_of_cliques(4, 4),
        &LouvainConfig {
            resolution: 0.5,
            ..Default::default()
        },
    )
    .unwrap();
    let high = detect_communities(
        ring_of_cliques(4, 4),
        &LouvainConfig {
            resolution: 2.0,
            ..Default::default()
        },
    )
    .unwrap();

    assert!(
        high.assignments.community_count() >= low.assignments.community_count(),
        "resolution 2.0 found {} communities, 0.5 found {}",
        high.assignments.community_count(),
        low.assignments.community_count()
    );
}

#[test]
fn sparse_original_ids_all_appear_in_the_mapping() {
    let graph = Graph::from_edges(&[
        Edge::new(100, 7),
        Edge::new(7, 9_000),
        Edge::new(9_000, 100),
        Edge::new(42, 42),
    ])
    .unwrap();
    let clustering = detect_communities(graph, &LouvainConfig::default()).unwrap();

    assert_eq!(clustering.assignments.len(), 4);
    for id in [7u64, 42, 100, 9_000] {
        assert!(clustering.assignments.get(&id).is_some(), "id {id} missing");
    }
}

#[test]
fn runs_are_reproducible_under_a_fixed_seed() {
    let config = LouvainConfig {
        rng_seed: 7,
        ..Default::default()
    };
    let first = detect_communities(ring_of_cliques(4, 5), &config).unwrap();
    let second = detect_communities(ring_of_cliques(4, 5), &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn clustering_round_trips_through_serde() {
    let clustering = detect_communities(triangle_pair(), &LouvainConfig::default()).unwrap();
    let json = serde_json::to_string(&clustering).unwrap();
    let back: Clustering = serde_json::from_str(&json).unwrap();
    assert_eq!(back, clustering);
}
