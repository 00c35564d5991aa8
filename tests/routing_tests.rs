// Host-side tests for the routing planner and graph model.

use playing_pad::core::*;

fn live_graph(route: Route) -> RoutingGraph {
    let mut g = RoutingGraph::new();
    g.apply_all(&plan_initial(route)).expect("initial plan applies");
    g
}

#[test]
fn initial_chain_reaches_output() {
    let g = live_graph(Route::new(SourceKind::Oscillator, EffectKind::Reverb));
    let path = g.path_from(Node::Synth);
    assert_eq!(
        path.as_slice(),
        &[Node::Synth, Node::Reverb, Node::Analyser, Node::Output]
    );
}

#[test]
fn every_effect_switch_routes_through_exactly_the_new_chain() {
    for source in [SourceKind::Oscillator, SourceKind::Microphone] {
        for from in EffectKind::ALL {
            for to in EffectKind::ALL {
                let old = Route::new(source, from);
                let new = Route::new(source, to);
                let mut g = live_graph(old);
                g.apply_all(&plan_rewire(old, new))
                    .unwrap_or_else(|e| panic!("{from} -> {to}: {e}"));

                let src = Node::for_source(source);
                let fx = g.effects_on_path(src);
                let expected: Vec<Node> = Node::for_effect(to).into_iter().collect();
                assert_eq!(fx.as_slice(), expected.as_slice(), "{from} -> {to}");
                assert_eq!(g.path_from(src).last(), Some(&Node::Output));
                assert!(g.is_connected(Node::Analyser, Node::Output));
            }
        }
    }
}

#[test]
fn rewire_disconnects_before_any_connect() {
    let old = Route::new(SourceKind::Oscillator, EffectKind::Delay);
    let new = Route::new(SourceKind::Oscillator, EffectKind::PitchShift);
    let plan = plan_rewire(old, new);
    let first_connect = plan
        .iter()
        .position(|op| matches!(op, WireOp::Connect(..)))
        .expect("plan connects the new chain");
    assert!(plan[..first_connect]
        .iter()
        .all(|op| matches!(op, WireOp::Disconnect(_))));
    assert!(plan.contains(&WireOp::Disconnect(Node::Delay)));
    assert!(!plan.contains(&WireOp::Disconnect(Node::Analyser)));
}

#[test]
fn same_route_plans_nothing() {
    let r = Route::new(SourceKind::Oscillator, EffectKind::Lowpass);
    assert!(plan_rewire(r, r).is_empty());
}

#[test]
fn connecting_without_disconnect_is_rejected() {
    let mut g = live_graph(Route::new(SourceKind::Oscillator, EffectKind::Delay));
    let err = g
        .apply(WireOp::Connect(Node::Synth, Node::Reverb))
        .expect_err("double routing must be rejected");
    assert!(matches!(err, PadError::GraphWiring(_)));
    assert!(!err.is_recoverable());
    assert!(g
        .apply(WireOp::Connect(Node::Reverb, Node::Reverb))
        .is_err());
}

#[test]
fn source_swap_moves_the_effect_chain() {
    let old = Route::new(SourceKind::Oscillator, EffectKind::Reverb);
    let new = Route::new(SourceKind::Microphone, EffectKind::Reverb);
    let mut g = live_graph(old);
    g.apply_all(&plan_rewire(old, new)).expect("swap applies");
    assert_eq!(g.path_from(Node::Synth).as_slice(), &[Node::Synth]);
    assert_eq!(
        g.effects_on_path(Node::Microphone).as_slice(),
        &[Node::Reverb]
    );
}

#[test]
fn reattach_replays_only_the_source_edge() {
    let route = Route::new(SourceKind::Microphone, EffectKind::Delay);
    let plan = plan_reattach(route);
    assert_eq!(
        plan.as_slice(),
        &[
            WireOp::Disconnect(Node::Microphone),
            WireOp::Connect(Node::Microphone, Node::Delay)
        ]
    );
    let mut g = live_graph(route);
    let before = g.edges().len();
    g.apply_all(&plan).expect("reattach applies on a live graph");
    assert_eq!(g.edges().len(), before);
}
