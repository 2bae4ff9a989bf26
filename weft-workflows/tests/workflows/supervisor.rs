//! Supervisor workflow: delegation to calendar and email sub-agents.

use std::sync::Arc;

use serde_json::json;

use weft::graph::RunConfig;
use weft::message::{Message, ToolCall};
use weft::model::{ChatResponse, MockChatModel};
use weft::tool::ToolRegistry;

use weft_workflows::agent::{self, AgentState};
use weft_workflows::supervisor;

fn stub_agent(reply: &'static str) -> weft::CompiledGraph<AgentState> {
    agent::react_agent(
        Arc::new(MockChatModel::fixed(reply)),
        Arc::new(ToolRegistry::new()),
        "stub",
    )
    .unwrap()
}

#[tokio::test]
async fn supervisor_delegates_both_actions_in_one_turn() {
    let supervisor_model = Arc::new(MockChatModel::scripted([
        ChatResponse::with_tool_calls(
            "",
            vec![
                ToolCall::new(
                    "c1",
                    "schedule_event",
                    json!({"request": "team meeting next Tuesday at 2pm for 1 hour"}),
                ),
                ToolCall::new(
                    "c2",
                    "manage_email",
                    json!({"request": "remind the design team about the mockup review"}),
                ),
            ],
        ),
        ChatResponse::text("Meeting scheduled and reminder sent."),
    ]));

    let graph = supervisor::supervisor_with_agents(
        supervisor_model,
        stub_agent("Scheduled \"team meeting\" for Tuesday 14:00-15:00."),
        stub_agent("Email sent to design-team@example.com."),
    )
    .unwrap();

    let out = graph
        .invoke(
            agent::user_turn("set up the team meeting and remind design"),
            RunConfig::default(),
        )
        .await
        .unwrap();

    let tool_results: Vec<_> = out
        .messages
        .iter()
        .filter_map(|m| match m {
            Message::Tool {
                content,
                tool_call_id,
            } => Some((tool_call_id.clone(), content.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(tool_results.len(), 2);
    assert_eq!(tool_results[0].0, "c1");
    assert!(tool_results[0].1.contains("Tuesday 14:00"));
    assert_eq!(tool_results[1].0, "c2");
    assert!(tool_results[1].1.contains("design-team@example.com"));
    assert_eq!(agent::final_text(&out), "Meeting scheduled and reminder sent.");
}

#[tokio::test]
async fn calendar_sub_agent_drives_its_raw_tools() {
    let model = Arc::new(MockChatModel::scripted([
        ChatResponse::with_tool_calls(
            "",
            vec![ToolCall::new(
                "c1",
                "create_calendar_event",
                json!({
                    "title": "Design review",
                    "start_time": "2025-03-10T14:00:00",
                    "end_time": "2025-03-10T15:00:00",
                    "attendees": ["alice@example.com", "bob@example.com"],
                    "location": "Room 4"
                }),
            )],
        ),
        ChatResponse::text("Booked the design review for March 10th, 2-3pm in Room 4."),
    ]));

    let graph = supervisor::calendar_agent(model).unwrap();
    let out = graph
        .invoke(
            agent::user_turn("book the design review for March 10 at 2pm"),
            RunConfig::default(),
        )
        .await
        .unwrap();

    let created = out
        .messages
        .iter()
        .find_map(|m| match m {
            Message::Tool { content, .. } => Some(content.clone()),
            _ => None,
        })
        .unwrap();
    assert!(created.contains("\"Design review\""));
    assert!(created.contains("at Room 4"));
    assert!(created.contains("2 attendee(s)"));
}

#[tokio::test]
async fn email_sub_agent_formats_cc_recipients() {
    let model = Arc::new(MockChatModel::scripted([
        ChatResponse::with_tool_calls(
            "",
            vec![ToolCall::new(
                "c1",
                "send_email",
                json!({
                    "to": ["dana@example.com"],
                    "subject": "Mockup review tomorrow",
                    "body": "Reminder: mockup review at 10am.",
                    "cc": ["lee@example.com"]
                }),
            )],
        ),
        ChatResponse::text("Sent the reminder."),
    ]));

    let graph = supervisor::email_agent(model).unwrap();
    let out = graph
        .invoke(
            agent::user_turn("remind dana about the mockup review, cc lee"),
            RunConfig::default(),
        )
        .await
        .unwrap();

    let sent = out
        .messages
        .iter()
        .find_map(|m| match m {
            Message::Tool { content, .. } => Some(content.clone()),
            _ => None,
        })
        .unwrap();
    assert!(sent.contains("dana@example.com"));
    assert!(sent.contains("(cc: lee@example.com)"));
    assert!(sent.contains("Mockup review tomorrow"));
}
