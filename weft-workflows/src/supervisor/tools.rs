//! Low-level calendar and email tools (stubbed API adapters).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use weft::graph::NodeContext;
use weft::tool::{self, Tool, ToolError, ToolOutput, ToolSpec};

use crate::agent::AgentState;

#[derive(Deserialize)]
struct CreateEventArgs {
    title: String,
    start_time: String,
    end_time: String,
    attendees: Vec<String>,
    location: Option<String>,
}

/// Create a calendar event; requires exact ISO datetimes.
pub struct CreateCalendarEvent;

#[async_trait]
impl Tool<AgentState> for CreateCalendarEvent {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "create_calendar_event".into(),
            description: Some(
                "Create a calendar event. Requires exact ISO datetime format \
                 (YYYY-MM-DDTHH:MM:SS)."
                    .into(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string", "description": "Title of the event"},
                    "start_time": {
                        "type": "string",
                        "description": "Start time in ISO format, e.g. '2025-03-10T14:00:00'"
                    },
                    "end_time": {
                        "type": "string",
                        "description": "End time in ISO format, e.g. '2025-03-10T15:00:00'"
                    },
                    "attendees": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "List of attendee email addresses"
                    },
                    "location": {"type": "string", "description": "Optional event location"}
                },
                "required": ["title", "start_time", "end_time", "attendees"]
            }),
        }
    }

    async fn call(
        &self,
        raw: Value,
        _state: &AgentState,
        _ctx: &NodeContext,
    ) -> Result<ToolOutput<AgentState>, ToolError> {
        let args: CreateEventArgs = tool::args("create_calendar_event", raw)?;
        // Stub: replace with a Google Calendar / Outlook API call.
        let location = args
            .location
            .map(|l| format!(" at {l}"))
            .unwrap_or_default();
        Ok(ToolOutput::Text(format!(
            "Event created: \"{}\" from {} to {}{} with {} attendee(s).",
            args.title,
            args.start_time,
            args.end_time,
            location,
            args.attendees.len()
        )))
    }
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct AvailabilityArgs {
    attendees: Vec<String>,
    date: String,
    duration_minutes: u32,
}

/// Check calendar availability for attendees on a date.
pub struct GetAvailableTimeSlots;

#[async_trait]
impl Tool<AgentState> for GetAvailableTimeSlots {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "get_available_time_slots".into(),
            description: Some(
                "Check calendar availability for a list of attendees on a specific date."
                    .into(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "attendees": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "List of attendee email addresses"
                    },
                    "date": {"type": "string", "description": "Date in ISO format, e.g. '2025-03-10'"},
                    "duration_minutes": {
                        "type": "integer",
                        "description": "Desired meeting duration in minutes"
                    }
                },
                "required": ["attendees", "date", "duration_minutes"]
            }),
        }
    }

    async fn call(
        &self,
        raw: Value,
        _state: &AgentState,
        _ctx: &NodeContext,
    ) -> Result<ToolOutput<AgentState>, ToolError> {
        let _args: AvailabilityArgs = tool::args("get_available_time_slots", raw)?;
        // Stub: replace with a calendar availability API call.
        Ok(ToolOutput::Text("Available slots: 09:00, 14:00, 16:00".into()))
    }
}

#[derive(Deserialize)]
struct SendEmailArgs {
    to: Vec<String>,
    subject: String,
    #[allow(dead_code)]
    body: String,
    cc: Option<Vec<String>>,
}

/// Send an email.
pub struct SendEmail;

#[async_trait]
impl Tool<AgentState> for SendEmail {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "send_email".into(),
            description: Some(
                "Send an email. Requires properly formatted email addresses and a \
                 well-written body."
                    .into(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "to": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "List of recipient email addresses"
                    },
                    "subject": {"type": "string", "description": "Email subject line"},
                    "body": {"type": "string", "description": "Full email body text"},
                    "cc": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Optional list of CC email addresses"
                    }
                },
                "required": ["to", "subject", "body"]
            }),
        }
    }

    async fn call(
        &self,
        raw: Value,
        _state: &AgentState,
        _ctx: &NodeContext,
    ) -> Result<ToolOutput<AgentState>, ToolError> {
        let args: SendEmailArgs = tool::args("send_email", raw)?;
        // Stub: replace with a SendGrid / Gmail API call.
        let cc = match args.cc.as_deref() {
            Some(cc) if !cc.is_empty() => format!(" (cc: {})", cc.join(", ")),
            _ => String::new(),
        };
        Ok(ToolOutput::Text(format!(
            "Email sent to {}{} — Subject: \"{}\"",
            args.to.join(", "),
            cc,
            args.subject
        )))
    }
}
