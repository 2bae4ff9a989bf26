//! Fan-out dispatch: join semantics and merge ordering.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use weft::graph::{Branch, RunConfig, StateGraph, END, START};

use crate::common::{TraceState, TraceUpdate, VisitNode};

/// Three branches where the first-dispatched sleeps longest, so completion
/// order is the reverse of dispatch order.
fn fanout_graph() -> StateGraph<TraceState> {
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("split", Arc::new(VisitNode::named("split")));
    graph.add_node(
        "github",
        Arc::new(VisitNode::slow("github", Duration::from_millis(60))),
    );
    graph.add_node(
        "notion",
        Arc::new(VisitNode::slow("notion", Duration::from_millis(20))),
    );
    graph.add_node("slack", Arc::new(VisitNode::named("slack")));
    graph.add_node("merge", Arc::new(VisitNode::silent("merge")));
    graph.add_edge(START, "split");
    graph.add_fanout_edges(
        "split",
        Arc::new(|_: &TraceState| {
            vec![
                Branch::new("github", json!({"q": "q1"})),
                Branch::new("notion", json!({"q": "q2"})),
                Branch::new("slack", json!({"q": "q3"})),
            ]
        }),
        &["github", "notion", "slack"],
    );
    graph.add_edge("github", "merge");
    graph.add_edge("notion", "merge");
    graph.add_edge("slack", "merge");
    graph.add_edge("merge", END);
    graph
}

#[tokio::test]
async fn append_field_collects_every_branch_once_in_dispatch_order() {
    let out = fanout_graph()
        .compile()
        .unwrap()
        .invoke(TraceUpdate::default(), RunConfig::default())
        .await
        .unwrap();

    // Branch patches merge in dispatch order even though completion order is
    // reversed by the sleeps; the fan-in node runs only after all branches.
    assert_eq!(
        out.visited,
        vec!["split", "github:q1", "notion:q2", "slack:q3", "merge"]
    );
}

#[tokio::test]
async fn replace_field_is_deterministic_across_completion_orders() {
    // Run several times: the label must always come from the last-dispatched
    // branch ("slack"), never from whichever branch happened to finish last.
    // The merge node leaves the label untouched.
    for _ in 0..5 {
        let out = fanout_graph()
            .compile()
            .unwrap()
            .invoke(TraceUpdate::default(), RunConfig::default())
            .await
            .unwrap();
        assert_eq!(out.label, "slack");
    }
}

#[tokio::test]
async fn empty_dispatch_proceeds_to_fanin_node() {
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("split", Arc::new(VisitNode::named("split")));
    graph.add_node("a", Arc::new(VisitNode::named("a")));
    graph.add_node("merge", Arc::new(VisitNode::named("merge")));
    graph.add_edge(START, "split");
    graph.add_fanout_edges("split", Arc::new(|_: &TraceState| vec![]), &["a"]);
    graph.add_edge("a", "merge");
    graph.add_edge("merge", END);

    let out = graph
        .compile()
        .unwrap()
        .invoke(TraceUpdate::default(), RunConfig::default())
        .await
        .unwrap();
    assert_eq!(out.visited, vec!["split", "merge"]);
}

#[tokio::test]
async fn dispatch_to_unregistered_node_is_unknown_route() {
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("split", Arc::new(VisitNode::named("split")));
    graph.add_node("a", Arc::new(VisitNode::named("a")));
    graph.add_node("merge", Arc::new(VisitNode::named("merge")));
    graph.add_edge(START, "split");
    graph.add_fanout_edges(
        "split",
        Arc::new(|_: &TraceState| vec![Branch::new("reddit", json!({}))]),
        &["a"],
    );
    graph.add_edge("a", "merge");
    graph.add_edge("merge", END);

    let err = graph
        .compile()
        .unwrap()
        .invoke(TraceUpdate::default(), RunConfig::default())
        .await
        .unwrap_err();
    match err {
        weft::GraphError::UnknownRoute { label, .. } => assert_eq!(label, "reddit"),
        other => panic!("expected UnknownRoute, got {:?}", other),
    }
}
