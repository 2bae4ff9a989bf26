//! State for the query-router workflow.

use std::fmt;

use serde::{Deserialize, Serialize};

use weft::state::{reducers, GraphState, Slot};

/// The supported knowledge verticals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKey {
    Github,
    Notion,
    Slack,
}

impl SourceKey {
    pub const ALL: [SourceKey; 3] = [SourceKey::Github, SourceKey::Notion, SourceKey::Slack];
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKey::Github => "github",
            SourceKey::Notion => "notion",
            SourceKey::Slack => "slack",
        };
        f.write_str(s)
    }
}

/// One routing decision: which vertical, with a sub-question tailored to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub source: SourceKey,
    pub query: String,
}

/// Result returned by one vertical agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub source: SourceKey,
    pub result: String,
}

/// Router state. `results` uses the append policy so parallel branches
/// accumulate into one list regardless of completion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouterState {
    /// Original user query.
    pub query: String,
    /// Routing decisions produced by the classify node.
    pub classifications: Vec<Classification>,
    /// Results collected from vertical agents.
    pub results: Vec<AgentResult>,
    /// Final synthesized answer.
    pub final_answer: String,
}

#[derive(Debug, Default)]
pub struct RouterUpdate {
    pub query: Slot<String>,
    pub classifications: Slot<Vec<Classification>>,
    pub results: Vec<AgentResult>,
    pub final_answer: Slot<String>,
}

impl GraphState for RouterState {
    type Update = RouterUpdate;

    fn apply(&mut self, update: Self::Update) {
        reducers::replace(&mut self.query, update.query);
        reducers::replace(&mut self.classifications, update.classifications);
        reducers::append(&mut self.results, update.results);
        reducers::replace(&mut self.final_answer, update.final_answer);
    }
}

/// The input patch for a router run.
pub fn query_input(query: impl Into<String>) -> RouterUpdate {
    RouterUpdate {
        query: Slot::set(query.into()),
        ..Default::default()
    }
}
