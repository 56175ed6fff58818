use fibrinet_degradation::{
    DegradationStrategy, NoPhysicsStrategy, RelaxationParams, SpringForceStrategy, Strategy,
    StrategyKind,
};
use fibrinet_network::{builtin, Edge, EdgeId, Network, Node, NodeId};
use proptest::prelude::*;

/// Path 0 - 1 - ... - (len - 1) along the x axis
fn path(len: i64) -> Network {
    let mut net = Network::new(builtin::network_2d());
    let mut x = 0.0;
    for i in 0..len {
        net.add_node(Node::planar(i, x, 0.0)).unwrap();
        x += 1.0;
    }
    for i in 1..len {
        net.add_edge(Edge::new(i, i - 1, i)).unwrap();
    }
    net
}

fn anchored_chain(free_x: f64, left_rest: f64, right_rest: f64) -> Network {
    let mut net = Network::new(builtin::network_2d());
    net.add_node(Node::fixable(1, 0.0, 0.0, true)).unwrap();
    net.add_node(Node::fixable(2, free_x, 0.0, false)).unwrap();
    net.add_node(Node::fixable(3, 3.0, 0.0, true)).unwrap();
    net.add_edge(Edge::with_rest_length(1, 1, 2, left_rest)).unwrap();
    net.add_edge(Edge::with_rest_length(2, 2, 3, right_rest)).unwrap();
    net
}

#[test]
fn test_node_degradation_prune_asymmetry() {
    // 1 - 2 - 3: removing the middle node isolates both ends
    let net = path(3);

    let graph_only = NoPhysicsStrategy::new().degrade_node(&net, NodeId(1)).unwrap();
    assert_eq!(graph_only.node_count(), 0);

    let physical = SpringForceStrategy::new().degrade_node(&net, NodeId(1)).unwrap();
    assert_eq!(physical.node_count(), 2);
    assert_eq!(physical.edge_count(), 0);
}

#[test]
fn test_strategies_swap_by_name() {
    let net = path(4);
    for kind in StrategyKind::ALL {
        let strategy = Strategy::from_name(kind.as_str(), RelaxationParams::default()).unwrap();
        let out = strategy.degrade_edge(&net, EdgeId(2)).unwrap();
        assert_eq!(out.edge_count(), 2, "{kind}");
        assert_eq!(strategy.kind(), kind);
    }
    assert!(Strategy::from_name("spring", RelaxationParams::default()).is_err());
}

#[test]
fn test_no_physics_report_is_empty() {
    let (out, report) = Strategy::default().relax_with_report(&path(3)).unwrap();
    assert_eq!(out, path(3));
    assert_eq!(report.iterations, 0);
    assert!(report.converged);
}

#[test]
fn test_iteration_cap_is_honored() {
    let params = RelaxationParams::default().with_max_iterations(5);
    let (_, report) = SpringForceStrategy::with_params(params)
        .relax_with_report(&anchored_chain(1.2, 1.0, 1.0))
        .unwrap();
    assert_eq!(report.iterations, 5);
    assert_eq!(report.force_history.len(), 5);
    assert!(!report.converged);
}

proptest! {
    #[test]
    fn prop_cascading_prune_leaves_no_isolated_nodes(
        len in 2_i64..15,
        target in 1_i64..15,
    ) {
        let net = path(len);
        prop_assume!(target < len);

        let out = NoPhysicsStrategy::new().degrade_edge(&net, EdgeId(target)).unwrap();
        let connected = out.connected_node_ids();
        for node in out.nodes() {
            prop_assert!(connected.contains(&node.id()));
        }
        // pruning is idempotent
        let mut again = out.clone();
        prop_assert!(again.prune_isolated_nodes().is_empty());
        prop_assert_eq!(again, out);
    }

    #[test]
    fn prop_anchored_chain_converges_monotonically(
        free_x in 0.2_f64..2.8,
        left_rest in 0.5_f64..1.5,
        right_rest in 0.5_f64..1.5,
    ) {
        let net = anchored_chain(free_x, left_rest, right_rest);
        let (relaxed, report) = SpringForceStrategy::new().relax_with_report(&net).unwrap();

        prop_assert!(report.converged);
        prop_assert!(report.force_history.windows(2).all(|w| w[1] <= w[0] + 1e-12));

        let expected = (3.0 + left_rest - right_rest) / 2.0;
        let x = relaxed.get_node(NodeId(2)).and_then(Node::position).map(|p| p.x);
        prop_assert!(x.is_some_and(|x| (x - expected).abs() < 1e-4));
    }
}
