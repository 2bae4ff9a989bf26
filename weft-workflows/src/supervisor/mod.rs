//! Supervisor: a personal assistant delegating to sub-agents.
//!
//! The calendar and email sub-agents are full react agents over their raw
//! API tools; the supervisor sees them only as the high-level tools
//! `schedule_event` and `manage_email`, each of which runs a complete
//! sub-agent conversation and returns its final text.

mod tools;

pub use tools::{CreateCalendarEvent, GetAvailableTimeSlots, SendEmail};

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use weft::graph::{CompilationError, CompiledGraph, NodeContext, RunConfig};
use weft::model::ChatModel;
use weft::tool::{self, Tool, ToolError, ToolOutput, ToolRegistry, ToolSpec};

use crate::agent::{self, AgentState};

const CALENDAR_PROMPT: &str = "You are a calendar scheduling assistant.
Parse natural language scheduling requests (e.g. \"next Tuesday at 2pm\")
into proper ISO datetime formats (YYYY-MM-DDTHH:MM:SS).
Use get_available_time_slots to check availability when needed.
Use create_calendar_event to schedule events.
Always confirm what was scheduled in your final response.";

const EMAIL_PROMPT: &str = "You are an email assistant.
Compose professional emails based on natural language requests.
Extract recipient information and craft appropriate subject lines and body text.
Use send_email to send the message.
Always confirm what was sent in your final response.";

const SUPERVISOR_PROMPT: &str = "You are a helpful personal assistant.
You can schedule calendar events and send emails.
Break user requests into appropriate tool calls and coordinate results.
When a request involves multiple actions, call multiple tools.";

/// Builds the calendar sub-agent over the raw calendar tools.
pub fn calendar_agent(
    model: Arc<dyn ChatModel>,
) -> Result<CompiledGraph<AgentState>, CompilationError> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(CreateCalendarEvent));
    registry.register(Arc::new(GetAvailableTimeSlots));
    agent::react_agent(model, Arc::new(registry), CALENDAR_PROMPT)
}

/// Builds the email sub-agent over the raw email tool.
pub fn email_agent(
    model: Arc<dyn ChatModel>,
) -> Result<CompiledGraph<AgentState>, CompilationError> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(SendEmail));
    agent::react_agent(model, Arc::new(registry), EMAIL_PROMPT)
}

#[derive(Deserialize)]
struct RequestArgs {
    request: String,
}

/// A sub-agent wrapped as a single high-level tool: the call runs a whole
/// agent conversation and the tool result is its final reply.
struct AgentTool {
    name: &'static str,
    description: &'static str,
    request_description: &'static str,
    agent: CompiledGraph<AgentState>,
}

#[async_trait]
impl Tool<AgentState> for AgentTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name.into(),
            description: Some(self.description.into()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "request": {"type": "string", "description": self.request_description}
                },
                "required": ["request"]
            }),
        }
    }

    async fn call(
        &self,
        raw: Value,
        _state: &AgentState,
        _ctx: &NodeContext,
    ) -> Result<ToolOutput<AgentState>, ToolError> {
        let args: RequestArgs = tool::args(self.name, raw)?;
        let out = self
            .agent
            .invoke(agent::user_turn(args.request), RunConfig::default())
            .await
            .map_err(|e| ToolError::Execution {
                tool: self.name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(ToolOutput::Text(agent::final_text(&out)))
    }
}

/// Builds the supervisor agent over the two sub-agent tools.
pub fn supervisor_agent(
    model: Arc<dyn ChatModel>,
) -> Result<CompiledGraph<AgentState>, CompilationError> {
    supervisor_with_agents(
        Arc::clone(&model),
        calendar_agent(Arc::clone(&model))?,
        email_agent(model)?,
    )
}

/// Supervisor over explicit sub-agents. Tests inject stubbed ones here.
pub fn supervisor_with_agents(
    model: Arc<dyn ChatModel>,
    calendar: CompiledGraph<AgentState>,
    email: CompiledGraph<AgentState>,
) -> Result<CompiledGraph<AgentState>, CompilationError> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(AgentTool {
        name: "schedule_event",
        description: "Schedule calendar events using natural language. Use when the user \
                      wants to create, modify, or check appointments. Handles date/time \
                      parsing, availability checking, and event creation.",
        request_description: "Natural language scheduling request",
        agent: calendar,
    }));
    registry.register(Arc::new(AgentTool {
        name: "manage_email",
        description: "Send emails using natural language. Use when the user wants to send \
                      notifications, reminders, or any email communication. Handles \
                      recipient extraction, subject generation, and body composition.",
        request_description: "Natural language email request",
        agent: email,
    }));
    agent::react_agent(model, Arc::new(registry), SUPERVISOR_PROMPT)
}
