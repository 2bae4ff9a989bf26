//! Per-node checkpointing and thread resumption.

use std::sync::Arc;

use weft::checkpoint::MemorySaver;
use weft::graph::{RunConfig, StateGraph, END, START};
use weft::{Checkpointer, GraphError};

use crate::common::{FailingNode, TraceState, TraceUpdate, VisitNode};

#[tokio::test]
async fn second_invoke_resumes_from_saved_state() {
    let saver = Arc::new(MemorySaver::<TraceState>::new());
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("first", Arc::new(VisitNode::named("first")));
    graph.add_edge(START, "first");
    graph.add_edge("first", END);
    let compiled = graph.compile_with_checkpointer(saver).unwrap();

    let turn1 = compiled
        .invoke(TraceUpdate::default(), RunConfig::for_thread("t-1"))
        .await
        .unwrap();
    assert_eq!(turn1.visited, vec!["first"]);

    // Same thread: history is loaded, not replayed.
    let turn2 = compiled
        .invoke(TraceUpdate::default(), RunConfig::for_thread("t-1"))
        .await
        .unwrap();
    assert_eq!(turn2.visited, vec!["first", "first"]);

    // Different thread: nothing leaks across.
    let other = compiled
        .invoke(TraceUpdate::default(), RunConfig::for_thread("t-2"))
        .await
        .unwrap();
    assert_eq!(other.visited, vec!["first"]);
}

#[tokio::test]
async fn checkpoint_is_saved_after_every_node_not_only_at_end() {
    let saver = Arc::new(MemorySaver::<TraceState>::new());
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("first", Arc::new(VisitNode::named("first")));
    graph.add_node("broken", Arc::new(FailingNode));
    graph.add_edge(START, "first");
    graph.add_edge("first", "broken");
    graph.add_edge("broken", END);
    let compiled = graph.compile_with_checkpointer(saver.clone()).unwrap();

    let err = compiled
        .invoke(TraceUpdate::default(), RunConfig::for_thread("t-crash"))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Execution(_)));

    // The crash lost only the in-flight node; the first node's effect is durable.
    let checkpoint = saver.load("t-crash").await.unwrap().expect("checkpoint");
    assert_eq!(checkpoint.state.visited, vec!["first"]);
}

#[tokio::test]
async fn unknown_route_fails_without_applying_any_state_change() {
    let saver = Arc::new(MemorySaver::<TraceState>::new());
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("decide", Arc::new(VisitNode::named("decide")));
    graph.add_node("left", Arc::new(VisitNode::named("left")));
    graph.add_edge(START, "decide");
    graph.add_conditional_edges(
        "decide",
        Arc::new(|_: &TraceState| "nowhere".to_string()),
        &[("go_left", "left")],
    );
    graph.add_edge("left", END);
    let compiled = graph.compile_with_checkpointer(saver.clone()).unwrap();

    let err = compiled
        .invoke(TraceUpdate::default(), RunConfig::for_thread("t-route"))
        .await
        .unwrap_err();
    match err {
        GraphError::UnknownRoute { node, label } => {
            assert_eq!(node, "decide");
            assert_eq!(label, "nowhere");
        }
        other => panic!("expected UnknownRoute, got {:?}", other),
    }

    // The routing failure itself changed nothing: the checkpoint holds exactly
    // the decide node's own effect.
    let checkpoint = saver.load("t-route").await.unwrap().expect("checkpoint");
    assert_eq!(checkpoint.state.visited, vec!["decide"]);
}

#[tokio::test]
async fn runs_without_thread_id_do_not_checkpoint() {
    let saver = Arc::new(MemorySaver::<TraceState>::new());
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("first", Arc::new(VisitNode::named("first")));
    graph.add_edge(START, "first");
    graph.add_edge("first", END);
    let compiled = graph.compile_with_checkpointer(saver.clone()).unwrap();

    let _ = compiled
        .invoke(TraceUpdate::default(), RunConfig::default())
        .await
        .unwrap();
    assert!(saver.load("").await.unwrap().is_none());
}
