//! StateGraph compile failure cases.

use std::sync::Arc;

use weft::graph::{CompilationError, StateGraph, END, START};

use crate::common::{TraceState, VisitNode};

#[test]
fn compile_fails_when_edge_refers_to_unknown_node() {
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("first", Arc::new(VisitNode::named("first")));
    graph.add_edge(START, "first");
    graph.add_edge("first", "missing");

    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "missing"),
        other => panic!("expected NodeNotFound, got {:?}", other.err()),
    }
}

#[test]
fn compile_fails_without_entry_edge() {
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("first", Arc::new(VisitNode::named("first")));
    graph.add_edge("first", END);

    assert_eq!(graph.compile().err(), Some(CompilationError::MissingEntry));
}

#[test]
fn compile_fails_on_two_outgoing_edges() {
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("first", Arc::new(VisitNode::named("first")));
    graph.add_node("second", Arc::new(VisitNode::named("second")));
    graph.add_edge(START, "first");
    graph.add_edge("first", "second");
    graph.add_edge("first", END);
    graph.add_edge("second", END);

    assert_eq!(
        graph.compile().err(),
        Some(CompilationError::DuplicateEdge("first".into()))
    );
}

#[test]
fn compile_fails_when_fanout_branches_diverge() {
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("split", Arc::new(VisitNode::named("split")));
    graph.add_node("a", Arc::new(VisitNode::named("a")));
    graph.add_node("b", Arc::new(VisitNode::named("b")));
    graph.add_node("merge", Arc::new(VisitNode::named("merge")));
    graph.add_edge(START, "split");
    graph.add_fanout_edges("split", Arc::new(|_: &TraceState| vec![]), &["a", "b"]);
    graph.add_edge("a", "merge");
    graph.add_edge("b", END);
    graph.add_edge("merge", END);

    match graph.compile() {
        Err(CompilationError::FanOutJoin { from, .. }) => assert_eq!(from, "split"),
        other => panic!("expected FanOutJoin, got {:?}", other.err()),
    }
}

#[test]
fn compile_fails_when_fanout_branch_has_no_static_edge() {
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("split", Arc::new(VisitNode::named("split")));
    graph.add_node("a", Arc::new(VisitNode::named("a")));
    graph.add_edge(START, "split");
    graph.add_fanout_edges("split", Arc::new(|_: &TraceState| vec![]), &["a"]);

    match graph.compile() {
        Err(CompilationError::FanOutJoin { reason, .. }) => {
            assert!(reason.contains("static edge"), "{}", reason)
        }
        other => panic!("expected FanOutJoin, got {:?}", other.err()),
    }
}
