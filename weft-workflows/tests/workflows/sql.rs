//! SQL assistant: progressive skill disclosure.

use std::sync::Arc;

use serde_json::json;

use weft::checkpoint::MemorySaver;
use weft::message::{Message, ToolCall};
use weft::model::{ChatResponse, MockChatModel};

use weft_workflows::agent::AgentState;
use weft_workflows::sql;

#[tokio::test]
async fn loads_the_skill_before_writing_the_query() {
    let model = Arc::new(MockChatModel::scripted([
        ChatResponse::with_tool_calls(
            "",
            vec![ToolCall::new(
                "c1",
                "load_skill",
                json!({"skill_name": "sales_analytics"}),
            )],
        ),
        ChatResponse::text(
            "```sql\nSELECT SUM(total_amount) FROM orders WHERE status = 'completed';\n```",
        ),
    ]));
    let assistant = sql::sql_assistant(
        model.clone(),
        Arc::new(MemorySaver::<AgentState>::new()),
    )
    .unwrap();

    let state = assistant
        .turn("What was our revenue last quarter?", "t-sql")
        .await
        .unwrap();

    // The full schema appears in the log only after the explicit load.
    let loaded = state
        .messages
        .iter()
        .find_map(|m| match m {
            Message::Tool { content, .. } => Some(content.clone()),
            _ => None,
        })
        .expect("load_skill result");
    assert!(loaded.contains("# Sales Analytics Schema"));
    assert!(loaded.contains("status = 'completed'"));

    // Both tools were offered to the model.
    assert_eq!(model.seen()[0].tool_names, vec!["load_skill", "execute_sql"]);

    let reply = state
        .messages
        .last()
        .map(|m| m.content().to_string())
        .unwrap();
    assert!(reply.contains("SELECT SUM(total_amount)"));
}

#[tokio::test]
async fn unknown_skill_name_is_answered_with_the_catalog() {
    let model = Arc::new(MockChatModel::scripted([
        ChatResponse::with_tool_calls(
            "",
            vec![ToolCall::new(
                "c1",
                "load_skill",
                json!({"skill_name": "finance_analytics"}),
            )],
        ),
        ChatResponse::text("That vertical doesn't exist; did you mean sales_analytics?"),
    ]));
    let assistant = sql::sql_assistant(model, Arc::new(MemorySaver::<AgentState>::new())).unwrap();

    let state = assistant.turn("query the finance data", "t-sql2").await.unwrap();
    let answer = state
        .messages
        .iter()
        .find_map(|m| match m {
            Message::Tool { content, .. } => Some(content.clone()),
            _ => None,
        })
        .unwrap();
    assert!(answer.contains("not found"));
    assert!(answer.contains("sales_analytics, inventory_management, hr_analytics"));
}

#[tokio::test]
async fn execute_sql_dry_runs_the_query() {
    let model = Arc::new(MockChatModel::scripted([
        ChatResponse::with_tool_calls(
            "",
            vec![ToolCall::new(
                "c1",
                "execute_sql",
                json!({
                    "query": "SELECT 1;",
                    "skill": "sales_analytics"
                }),
            )],
        ),
        ChatResponse::text("Ran it."),
    ]));
    let assistant = sql::sql_assistant(model, Arc::new(MemorySaver::<AgentState>::new())).unwrap();

    let state = assistant.turn("run SELECT 1", "t-sql3").await.unwrap();
    let result = state
        .messages
        .iter()
        .find_map(|m| match m {
            Message::Tool { content, .. } => Some(content.clone()),
            _ => None,
        })
        .unwrap();
    assert!(result.contains("[DRY RUN]"));
    assert!(result.contains("SELECT 1;"));
}
