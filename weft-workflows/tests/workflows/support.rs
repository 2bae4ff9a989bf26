//! Support workflow: transitions, tool subsets, persistence.

use std::sync::Arc;

use serde_json::json;

use weft::checkpoint::MemorySaver;
use weft::message::{Message, ToolCall};
use weft::model::{ChatResponse, MockChatModel};

use weft_workflows::support::{
    SupportAssistant, SupportState, SupportStep, WarrantyStatus,
};

#[tokio::test]
async fn recording_warranty_status_advances_the_step() {
    let model = Arc::new(MockChatModel::scripted([
        ChatResponse::with_tool_calls(
            "",
            vec![ToolCall::new(
                "call-1",
                "record_warranty_status",
                json!({"status": "out_of_warranty"}),
            )],
        ),
        ChatResponse::text("Got it. What issue are you seeing?"),
    ]));
    let assistant = SupportAssistant::new(
        model.clone(),
        Arc::new(MemorySaver::<SupportState>::new()),
    )
    .unwrap();

    let state = assistant
        .turn("My device is out of warranty", "t-1")
        .await
        .unwrap();

    assert_eq!(state.current_step, SupportStep::IssueClassifier);
    assert_eq!(state.warranty_status, Some(WarrantyStatus::OutOfWarranty));

    // The tool's answer is in the log, correlated to the originating call.
    let recorded = state
        .messages
        .iter()
        .find_map(|m| match m {
            Message::Tool {
                content,
                tool_call_id,
            } if tool_call_id == "call-1" => Some(content.clone()),
            _ => None,
        })
        .expect("tool result correlated to call-1");
    assert!(recorded.contains("out_of_warranty"), "{}", recorded);
}

#[tokio::test]
async fn each_step_exposes_only_its_own_tools() {
    let model = Arc::new(MockChatModel::scripted([
        ChatResponse::with_tool_calls(
            "",
            vec![ToolCall::new(
                "call-1",
                "record_warranty_status",
                json!({"status": "in_warranty"}),
            )],
        ),
        ChatResponse::text("Thanks! Tell me about the issue."),
    ]));
    let assistant = SupportAssistant::new(
        model.clone(),
        Arc::new(MemorySaver::<SupportState>::new()),
    )
    .unwrap();

    let _ = assistant.turn("hi", "t-tools").await.unwrap();

    let seen = model.seen();
    // First call: warranty step, only its transition tool visible.
    assert_eq!(seen[0].tool_names, vec!["record_warranty_status"]);
    // After the command advanced the step, the classifier's tool is visible.
    assert_eq!(seen[1].tool_names, vec!["record_issue_type"]);
}

#[tokio::test]
async fn step_and_facts_persist_across_turns() {
    let model = Arc::new(MockChatModel::scripted([
        // Turn 1: record warranty, then reply.
        ChatResponse::with_tool_calls(
            "",
            vec![ToolCall::new(
                "call-1",
                "record_warranty_status",
                json!({"status": "in_warranty"}),
            )],
        ),
        ChatResponse::text("What issue are you seeing?"),
        // Turn 2: classify, then reply.
        ChatResponse::with_tool_calls(
            "",
            vec![ToolCall::new(
                "call-2",
                "record_issue_type",
                json!({"issue_type": "software"}),
            )],
        ),
        ChatResponse::text("Let's try reinstalling the app."),
    ]));
    let assistant = SupportAssistant::new(
        model.clone(),
        Arc::new(MemorySaver::<SupportState>::new()),
    )
    .unwrap();

    let turn1 = assistant.turn("it's under warranty", "t-2").await.unwrap();
    assert_eq!(turn1.current_step, SupportStep::IssueClassifier);

    let turn2 = assistant.turn("the app keeps crashing", "t-2").await.unwrap();
    assert_eq!(turn2.current_step, SupportStep::ResolutionSpecialist);
    assert_eq!(turn2.warranty_status, Some(WarrantyStatus::InWarranty));
    // Turn 2 grew on top of turn 1's conversation instead of restarting it.
    assert!(turn2.messages.len() > turn1.messages.len());
}

#[tokio::test]
async fn go_back_clears_the_corrected_fact() {
    let model = Arc::new(MockChatModel::scripted([
        ChatResponse::with_tool_calls(
            "",
            vec![
                ToolCall::new(
                    "call-1",
                    "record_warranty_status",
                    json!({"status": "in_warranty"}),
                ),
            ],
        ),
        ChatResponse::with_tool_calls(
            "",
            vec![ToolCall::new(
                "call-2",
                "record_issue_type",
                json!({"issue_type": "hardware"}),
            )],
        ),
        ChatResponse::with_tool_calls(
            "",
            vec![ToolCall::new("call-3", "go_back_to_warranty", json!({}))],
        ),
        ChatResponse::text("Let's re-check your warranty. Is the device covered?"),
    ]));
    let assistant = SupportAssistant::new(
        model,
        Arc::new(MemorySaver::<SupportState>::new()),
    )
    .unwrap();

    let state = assistant
        .turn("actually I was wrong about the warranty", "t-3")
        .await
        .unwrap();

    assert_eq!(state.current_step, SupportStep::WarrantyCollector);
    assert!(state.warranty_status.is_none());
    assert!(state.issue_type.is_none());
}
