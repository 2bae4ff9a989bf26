//! Router workflow: classification fan-out and synthesis.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use weft::graph::RunConfig;
use weft::message::Message;
use weft::model::{ChatModel, ChatResponse, MockChatModel, ModelError};
use weft::tool::{ToolRegistry, ToolSpec};

use weft_workflows::agent::{self, AgentState};
use weft_workflows::router::{self, query_input, SourceKey};

/// Fixed-answer model that sleeps first, to force branch completion order.
struct SlowFixed {
    delay: Duration,
    text: &'static str,
}

#[async_trait]
impl ChatModel for SlowFixed {
    async fn complete(
        &self,
        _messages: &[Message],
        _tools: &[ToolSpec],
    ) -> Result<ChatResponse, ModelError> {
        tokio::time::sleep(self.delay).await;
        Ok(ChatResponse::text(self.text))
    }

    async fn extract(&self, _messages: &[Message], _schema: &Value) -> Result<Value, ModelError> {
        Err(ModelError::Unavailable("not used".into()))
    }
}

fn vertical(delay_ms: u64, text: &'static str) -> weft::CompiledGraph<AgentState> {
    agent::react_agent(
        Arc::new(SlowFixed {
            delay: Duration::from_millis(delay_ms),
            text,
        }),
        Arc::new(ToolRegistry::new()),
        "vertical stub",
    )
    .unwrap()
}

#[tokio::test]
async fn fan_out_collects_one_result_per_source_regardless_of_finish_order() {
    // github is dispatched first but finishes last.
    let router_model = Arc::new(
        MockChatModel::scripted([ChatResponse::text("Combined: auth uses JWT middleware.")])
            .with_extractions([json!({
                "classifications": [
                    {"source": "github", "query": "auth middleware code"},
                    {"source": "notion", "query": "auth setup guide"}
                ]
            })]),
    );
    let graph = router::router_graph(
        router_model,
        vertical(60, "GitHub: JWT middleware in src/auth"),
        vertical(0, "Notion: see the API Authentication Guide"),
        vertical(0, "Slack: unused"),
    )
    .unwrap();

    let out = graph
        .invoke(query_input("How do I authenticate API requests?"), RunConfig::default())
        .await
        .unwrap();

    assert_eq!(out.results.len(), 2);
    // Merge order follows dispatch order, not completion order.
    assert_eq!(out.results[0].source, SourceKey::Github);
    assert_eq!(out.results[1].source, SourceKey::Notion);
    assert_eq!(out.final_answer, "Combined: auth uses JWT middleware.");
}

#[tokio::test]
async fn no_relevant_sources_yields_the_fallback_answer() {
    let router_model = Arc::new(
        MockChatModel::fixed("unused").with_extractions([json!({"classifications": []})]),
    );
    let graph = router::router_graph(
        router_model,
        vertical(0, "unused"),
        vertical(0, "unused"),
        vertical(0, "unused"),
    )
    .unwrap();

    let out = graph
        .invoke(query_input("What's for lunch?"), RunConfig::default())
        .await
        .unwrap();

    assert!(out.results.is_empty());
    assert_eq!(
        out.final_answer,
        "No relevant information was found in any knowledge source."
    );
}

#[tokio::test]
async fn full_workflow_with_stub_tools_answers_from_vertical_results() {
    // One shared model: extraction routes to github only; then the github
    // vertical agent calls its search tool and answers; then synthesis runs.
    let model = Arc::new(
        MockChatModel::scripted([
            // github vertical agent: search, then answer.
            ChatResponse::with_tool_calls(
                "",
                vec![weft::message::ToolCall::new(
                    "c1",
                    "search_code",
                    json!({"query": "jwt auth"}),
                )],
            ),
            ChatResponse::text("Auth lives in src/auth/middleware.rs (see PR #156)."),
            // synthesize.
            ChatResponse::text("Check src/auth/middleware.rs; PR #156 added JWT auth."),
        ])
        .with_extractions([json!({
            "classifications": [{"source": "github", "query": "jwt auth"}]
        })]),
    );

    let graph = router::router_workflow(model).unwrap();
    let out = graph
        .invoke(query_input("Where is auth implemented?"), RunConfig::default())
        .await
        .unwrap();

    assert_eq!(out.results.len(), 1);
    assert!(out.results[0].result.contains("src/auth/middleware.rs"));
    assert!(out.final_answer.contains("PR #156"));
}
