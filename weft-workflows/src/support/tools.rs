//! Support tools: state transitions, back-navigation, and resolution stubs.
//!
//! The transition tools return commands: a tool message for the log plus a
//! patch that records the fact and moves `current_step`, so the workflow's
//! phase advances the moment the model records an answer.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use weft::graph::NodeContext;
use weft::state::Slot;
use weft::tool::{self, Tool, ToolError, ToolOutput, ToolRegistry, ToolSpec};

use super::state::{IssueType, SupportState, SupportStep, SupportUpdate, WarrantyStatus};

#[derive(Deserialize)]
struct WarrantyArgs {
    status: WarrantyStatus,
}

/// Step 1 → 2: record warranty status and advance to issue classification.
pub struct RecordWarrantyStatus;

#[async_trait]
impl Tool<SupportState> for RecordWarrantyStatus {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "record_warranty_status".into(),
            description: Some(
                "Record the customer's warranty status and advance to the issue \
                 classification step."
                    .into(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "status": {
                        "type": "string",
                        "enum": ["in_warranty", "out_of_warranty"],
                        "description": "Whether the device is under warranty"
                    }
                },
                "required": ["status"]
            }),
        }
    }

    async fn call(
        &self,
        raw: Value,
        _state: &SupportState,
        _ctx: &NodeContext,
    ) -> Result<ToolOutput<SupportState>, ToolError> {
        let args: WarrantyArgs = tool::args("record_warranty_status", raw)?;
        Ok(ToolOutput::Command {
            message: format!(
                "Warranty status recorded as: {}. Moving to issue classification.",
                args.status
            ),
            update: SupportUpdate {
                warranty_status: Slot::set(Some(args.status)),
                current_step: Slot::set(SupportStep::IssueClassifier),
                ..Default::default()
            },
        })
    }
}

#[derive(Deserialize)]
struct IssueArgs {
    issue_type: IssueType,
}

/// Step 2 → 3: record the issue type and advance to resolution.
pub struct RecordIssueType;

#[async_trait]
impl Tool<SupportState> for RecordIssueType {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "record_issue_type".into(),
            description: Some(
                "Classify the issue as hardware or software and advance to the \
                 resolution step."
                    .into(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "issue_type": {
                        "type": "string",
                        "enum": ["hardware", "software"],
                        "description": "The type of issue the customer is experiencing"
                    }
                },
                "required": ["issue_type"]
            }),
        }
    }

    async fn call(
        &self,
        raw: Value,
        _state: &SupportState,
        _ctx: &NodeContext,
    ) -> Result<ToolOutput<SupportState>, ToolError> {
        let args: IssueArgs = tool::args("record_issue_type", raw)?;
        Ok(ToolOutput::Command {
            message: format!(
                "Issue type recorded as: {}. Moving to resolution.",
                args.issue_type
            ),
            update: SupportUpdate {
                issue_type: Slot::set(Some(args.issue_type)),
                current_step: Slot::set(SupportStep::ResolutionSpecialist),
                ..Default::default()
            },
        })
    }
}

/// Resolution → warranty collection; clears everything collected since.
pub struct GoBackToWarranty;

#[async_trait]
impl Tool<SupportState> for GoBackToWarranty {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "go_back_to_warranty".into(),
            description: Some(
                "Go back to the warranty verification step so the customer can correct \
                 that information."
                    .into(),
            ),
            input_schema: json!({"type": "object", "properties": {}}),
        }
    }

    async fn call(
        &self,
        _raw: Value,
        _state: &SupportState,
        _ctx: &NodeContext,
    ) -> Result<ToolOutput<SupportState>, ToolError> {
        Ok(ToolOutput::Command {
            message: "Returning to warranty verification to correct the information.".into(),
            update: SupportUpdate {
                current_step: Slot::set(SupportStep::WarrantyCollector),
                warranty_status: Slot::set(None),
                issue_type: Slot::set(None),
                ..Default::default()
            },
        })
    }
}

/// Resolution → issue classification; clears the recorded issue type.
pub struct GoBackToClassifier;

#[async_trait]
impl Tool<SupportState> for GoBackToClassifier {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "go_back_to_classifier".into(),
            description: Some(
                "Go back to the issue classification step so the customer can correct \
                 the issue type."
                    .into(),
            ),
            input_schema: json!({"type": "object", "properties": {}}),
        }
    }

    async fn call(
        &self,
        _raw: Value,
        _state: &SupportState,
        _ctx: &NodeContext,
    ) -> Result<ToolOutput<SupportState>, ToolError> {
        Ok(ToolOutput::Command {
            message: "Returning to issue classification to correct the information.".into(),
            update: SupportUpdate {
                current_step: Slot::set(SupportStep::IssueClassifier),
                issue_type: Slot::set(None),
                ..Default::default()
            },
        })
    }
}

#[derive(Deserialize)]
struct SolutionArgs {
    solution: String,
}

/// Provide troubleshooting steps or repair instructions to the customer.
pub struct ProvideSolution;

#[async_trait]
impl Tool<SupportState> for ProvideSolution {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "provide_solution".into(),
            description: Some(
                "Provide troubleshooting steps or warranty repair instructions to the \
                 customer."
                    .into(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "solution": {
                        "type": "string",
                        "description": "The full solution or repair instructions to share"
                    }
                },
                "required": ["solution"]
            }),
        }
    }

    async fn call(
        &self,
        raw: Value,
        _state: &SupportState,
        _ctx: &NodeContext,
    ) -> Result<ToolOutput<SupportState>, ToolError> {
        let args: SolutionArgs = tool::args("provide_solution", raw)?;
        // Stub: in production, log to CRM, send a follow-up email, etc.
        Ok(ToolOutput::Text(format!("Solution provided: {}", args.solution)))
    }
}

#[derive(Deserialize)]
struct EscalateArgs {
    reason: String,
}

/// Escalate the case to a human specialist.
pub struct EscalateToHuman;

#[async_trait]
impl Tool<SupportState> for EscalateToHuman {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "escalate_to_human".into(),
            description: Some(
                "Escalate the case to a human specialist (used for out-of-warranty \
                 hardware issues)."
                    .into(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "reason": {
                        "type": "string",
                        "description": "Brief reason for the escalation"
                    }
                },
                "required": ["reason"]
            }),
        }
    }

    async fn call(
        &self,
        raw: Value,
        _state: &SupportState,
        _ctx: &NodeContext,
    ) -> Result<ToolOutput<SupportState>, ToolError> {
        let args: EscalateArgs = tool::args("escalate_to_human", raw)?;
        // Stub: in production, open a ticket and page on-call support.
        Ok(ToolOutput::Text(format!(
            "Case escalated to human support specialist.\nReason: {}\n\
             A team member will contact you within 24 hours.",
            args.reason
        )))
    }
}

/// All support tools. The model node's step filter decides which subset is
/// visible at any moment; the dispatch side always knows them all.
pub fn support_tools() -> ToolRegistry<SupportState> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(RecordWarrantyStatus));
    registry.register(Arc::new(RecordIssueType));
    registry.register(Arc::new(ProvideSolution));
    registry.register(Arc::new(EscalateToHuman));
    registry.register(Arc::new(GoBackToWarranty));
    registry.register(Arc::new(GoBackToClassifier));
    registry
}
