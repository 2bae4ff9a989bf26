//! State and per-step prompts for the support-ticket workflow.

use std::fmt;

use serde::{Deserialize, Serialize};

use weft::message::Message;
use weft::state::{reducers, ChatState, GraphState, Slot};

/// Workflow steps, in the order a ticket normally moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportStep {
    #[default]
    WarrantyCollector,
    IssueClassifier,
    ResolutionSpecialist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarrantyStatus {
    InWarranty,
    OutOfWarranty,
}

impl fmt::Display for WarrantyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WarrantyStatus::InWarranty => "in_warranty",
            WarrantyStatus::OutOfWarranty => "out_of_warranty",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Hardware,
    Software,
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IssueType::Hardware => "hardware",
            IssueType::Software => "software",
        })
    }
}

/// Conversation plus the facts collected so far. `current_step` drives both
/// the system prompt and which tools the model may call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupportState {
    pub messages: Vec<Message>,
    pub current_step: SupportStep,
    /// Set by the warranty_collector step.
    pub warranty_status: Option<WarrantyStatus>,
    /// Set by the issue_classifier step.
    pub issue_type: Option<IssueType>,
}

#[derive(Debug, Default)]
pub struct SupportUpdate {
    pub messages: Vec<Message>,
    pub current_step: Slot<SupportStep>,
    pub warranty_status: Slot<Option<WarrantyStatus>>,
    pub issue_type: Slot<Option<IssueType>>,
}

impl GraphState for SupportState {
    type Update = SupportUpdate;

    fn apply(&mut self, update: Self::Update) {
        reducers::append(&mut self.messages, update.messages);
        reducers::replace(&mut self.current_step, update.current_step);
        reducers::replace(&mut self.warranty_status, update.warranty_status);
        reducers::replace(&mut self.issue_type, update.issue_type);
    }
}

impl ChatState for SupportState {
    fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn messages_update(messages: Vec<Message>) -> Self::Update {
        SupportUpdate {
            messages,
            ..Default::default()
        }
    }
}

/// System prompt template for a step. `{warranty_status}` and `{issue_type}`
/// render from state, falling back to "unknown" while still uncollected.
pub fn step_prompt(step: SupportStep) -> &'static str {
    match step {
        SupportStep::WarrantyCollector => {
            "You are a customer support agent helping with device issues.

CURRENT STAGE: Warranty verification

At this step you need to:
1. Greet the customer warmly.
2. Ask if their device is still under warranty.
3. Use record_warranty_status to record their answer and advance to the next step.

Be conversational and friendly. Ask only one question at a time."
        }
        SupportStep::IssueClassifier => {
            "You are a customer support agent helping with device issues.

CURRENT STAGE: Issue classification
CUSTOMER INFO: Warranty status is {warranty_status}

At this step you need to:
1. Ask the customer to describe their issue.
2. Determine if it's a HARDWARE issue (physical damage, broken parts) or SOFTWARE issue (app crashes, slow performance, OS bugs).
3. Use record_issue_type to record the classification and advance to the next step.

Ask clarifying questions before classifying if the type is unclear."
        }
        SupportStep::ResolutionSpecialist => {
            "You are a customer support agent helping with device issues.

CURRENT STAGE: Resolution
CUSTOMER INFO: Warranty status is {warranty_status}, issue type is {issue_type}

At this step you need to:
- SOFTWARE issues: provide troubleshooting steps via provide_solution.
- HARDWARE + IN WARRANTY: explain the warranty repair process via provide_solution.
- HARDWARE + OUT OF WARRANTY: escalate to a human specialist via escalate_to_human.

If the customer says information was wrong use:
- go_back_to_warranty to correct warranty status.
- go_back_to_classifier to correct issue type.

Be specific and helpful."
        }
    }
}

/// Tool names the model may call at a step. Anything else is not exposed.
pub fn step_tools(step: SupportStep) -> &'static [&'static str] {
    match step {
        SupportStep::WarrantyCollector => &["record_warranty_status"],
        SupportStep::IssueClassifier => &["record_issue_type"],
        SupportStep::ResolutionSpecialist => &[
            "provide_solution",
            "escalate_to_human",
            "go_back_to_warranty",
            "go_back_to_classifier",
        ],
    }
}
