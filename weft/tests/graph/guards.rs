//! Recursion limit, cancellation, and step timeout.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use weft::checkpoint::MemorySaver;
use weft::graph::{RunConfig, StateGraph, END, START};
use weft::{Checkpointer, GraphError};

use crate::common::{TraceState, TraceUpdate, VisitNode};

#[tokio::test]
async fn self_loop_hits_recursion_limit_instead_of_spinning() {
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("again", Arc::new(VisitNode::named("again")));
    graph.add_edge(START, "again");
    graph.add_conditional_edges(
        "again",
        Arc::new(|_: &TraceState| "loop".to_string()),
        &[("loop", "again"), ("done", END)],
    );

    let err = graph
        .compile()
        .unwrap()
        .invoke(
            TraceUpdate::default(),
            RunConfig::default().with_recursion_limit(5),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::RecursionLimit(5)));
}

#[tokio::test]
async fn cancellation_aborts_in_flight_node_without_partial_effects() {
    let saver = Arc::new(MemorySaver::<TraceState>::new());
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("fast", Arc::new(VisitNode::named("fast")));
    graph.add_node(
        "slow",
        Arc::new(VisitNode::slow("slow", Duration::from_secs(30))),
    );
    graph.add_edge(START, "fast");
    graph.add_edge("fast", "slow");
    graph.add_edge("slow", END);
    let compiled = graph.compile_with_checkpointer(saver.clone()).unwrap();

    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
    });

    let err = compiled
        .invoke(
            TraceUpdate::default(),
            RunConfig::for_thread("t-cancel").with_cancellation(token),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Cancelled));

    // The slow node's effect was never applied; the last checkpoint is the
    // resumption point.
    let checkpoint = saver.load("t-cancel").await.unwrap().expect("checkpoint");
    assert_eq!(checkpoint.state.visited, vec!["fast"]);
}

#[tokio::test]
async fn step_timeout_names_the_offending_node() {
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node(
        "slow",
        Arc::new(VisitNode::slow("slow", Duration::from_secs(30))),
    );
    graph.add_edge(START, "slow");
    graph.add_edge("slow", END);

    let err = graph
        .compile()
        .unwrap()
        .invoke(
            TraceUpdate::default(),
            RunConfig::default().with_step_timeout(Duration::from_millis(20)),
        )
        .await
        .unwrap_err();
    match err {
        GraphError::StepTimeout(node) => assert_eq!(node, "slow"),
        other => panic!("expected StepTimeout, got {:?}", other),
    }
}

#[tokio::test]
async fn independent_threads_run_concurrently() {
    let saver = Arc::new(MemorySaver::<TraceState>::new());
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node(
        "work",
        Arc::new(VisitNode::slow("work", Duration::from_millis(50))),
    );
    graph.add_edge(START, "work");
    graph.add_edge("work", END);
    let compiled = Arc::new(graph.compile_with_checkpointer(saver).unwrap());

    let started = std::time::Instant::now();
    let mut handles = Vec::new();
    for i in 0..4 {
        let graph = Arc::clone(&compiled);
        handles.push(tokio::spawn(async move {
            graph
                .invoke(TraceUpdate::default(), RunConfig::for_thread(format!("t-{i}")))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    // Four 50ms runs in well under 4 × 50ms: no shared state blocks them.
    assert!(
        started.elapsed() < Duration::from_millis(180),
        "threads appear serialized: {:?}",
        started.elapsed()
    );
}
