//! RAG workflows: plain QA, graded retrieval, loop termination.

use std::sync::Arc;

use serde_json::json;

use weft::graph::RunConfig;
use weft::message::{Message, ToolCall};
use weft::model::{ChatResponse, MockChatModel};
use weft::state::ChatState;
use weft::GraphError;

use weft_workflows::agent;
use weft_workflows::rag::{self, Grade, RagState};
use weft_workflows::retrieval::{Document, HashEmbedder, VectorIndex};

async fn indexed_corpus() -> Arc<VectorIndex> {
    let index = VectorIndex::new(Arc::new(HashEmbedder::default()));
    index
        .add_all([
            Document {
                source: "https://example.com/agents".into(),
                content: "Task decomposition splits a hard task into smaller steps the \
                          agent can plan over."
                    .into(),
            },
            Document {
                source: "https://example.com/prompting".into(),
                content: "Few-shot prompting conditions the model with examples.".into(),
            },
        ])
        .await
        .unwrap();
    Arc::new(index)
}

#[tokio::test]
async fn qa_agent_retrieves_then_answers() {
    let index = indexed_corpus().await;
    let model = Arc::new(MockChatModel::scripted([
        ChatResponse::with_tool_calls(
            "",
            vec![ToolCall::new(
                "c1",
                "retrieve",
                json!({"query": "task decomposition"}),
            )],
        ),
        ChatResponse::text("Task decomposition splits hard tasks into steps."),
    ]));

    let graph = rag::qa_agent(model, index, "task decomposition").unwrap();
    let out = graph
        .invoke(agent::user_turn("What is task decomposition?"), RunConfig::default())
        .await
        .unwrap();

    let tool_result = out
        .messages
        .iter()
        .find_map(|m| match m {
            Message::Tool { content, .. } => Some(content.clone()),
            _ => None,
        })
        .expect("retrieval result in log");
    assert!(tool_result.contains("Source: https://example.com/agents"));
    assert_eq!(
        agent::final_text(&out),
        "Task decomposition splits hard tasks into steps."
    );
}

#[tokio::test]
async fn graded_pipeline_generates_when_context_is_relevant() {
    let index = indexed_corpus().await;
    let model = Arc::new(
        MockChatModel::scripted([
            // generate_query_or_respond: ask for retrieval.
            ChatResponse::with_tool_calls(
                "",
                vec![ToolCall::new(
                    "c1",
                    "retrieve",
                    json!({"query": "task decomposition"}),
                )],
            ),
            // generate: final answer from the graded context.
            ChatResponse::text("It breaks a hard task into smaller plannable steps."),
        ])
        .with_extractions([json!({"binary_score": "yes"})]),
    );

    let graph = rag::graded_rag_graph(model, index).unwrap();
    let out: RagState = graph
        .invoke(
            RagState::messages_update(vec![Message::user("What is task decomposition?")]),
            RunConfig::default(),
        )
        .await
        .unwrap();

    assert_eq!(out.relevance, Some(Grade::Yes));
    assert_eq!(
        out.messages.last().map(|m| m.content().to_string()),
        Some("It breaks a hard task into smaller plannable steps.".to_string())
    );
}

#[tokio::test]
async fn not_relevant_grade_routes_through_rewrite_and_retries() {
    let index = indexed_corpus().await;
    let model = Arc::new(
        MockChatModel::scripted([
            // First attempt: retrieve.
            ChatResponse::with_tool_calls(
                "",
                vec![ToolCall::new("c1", "retrieve", json!({"query": "vague"}))],
            ),
            // rewrite output.
            ChatResponse::text("How does task decomposition work for agents?"),
            // Second attempt: retrieve again.
            ChatResponse::with_tool_calls(
                "",
                vec![ToolCall::new(
                    "c2",
                    "retrieve",
                    json!({"query": "task decomposition for agents"}),
                )],
            ),
            // generate.
            ChatResponse::text("It splits the task into steps."),
        ])
        .with_extractions([
            json!({"binary_score": "no"}),
            json!({"binary_score": "yes"}),
        ]),
    );

    let graph = rag::graded_rag_graph(model, index).unwrap();
    let out = graph
        .invoke(
            RagState::messages_update(vec![Message::user("huh?")]),
            RunConfig::default(),
        )
        .await
        .unwrap();

    assert_eq!(out.relevance, Some(Grade::Yes));
    assert_eq!(
        out.messages.last().map(|m| m.content().to_string()),
        Some("It splits the task into steps.".to_string())
    );
}

#[tokio::test]
async fn grader_that_never_accepts_terminates_via_recursion_limit() {
    let index = indexed_corpus().await;
    // The model always asks to retrieve; the grader always says "no". Without
    // the step budget this would cycle forever.
    let model = Arc::new(
        MockChatModel::scripted([])
            .with_fallback(ChatResponse::with_tool_calls(
                "",
                vec![ToolCall::new("c", "retrieve", json!({"query": "x"}))],
            ))
            .with_extraction_fallback(json!({"binary_score": "no"})),
    );

    let graph = rag::graded_rag_graph(model, index).unwrap();
    let err = graph
        .invoke(
            RagState::messages_update(vec![Message::user("loop forever")]),
            RunConfig::default().with_recursion_limit(12),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, GraphError::RecursionLimit(12)));
}
