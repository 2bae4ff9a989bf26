//! Query router: classify → parallel vertical agents → synthesize.
//!
//! ```text
//! START → classify ──(fan-out)──► github ──┐
//!                              ├─ notion ──┤ → synthesize → END
//!                              └─ slack  ──┘
//! ```
//!
//! The classify node picks the relevant verticals via structured output, the
//! fan-out dispatches one branch per classification (each branch receives its
//! tailored sub-question as branch input), and synthesize runs only after
//! every branch has merged its result.

mod state;
mod tools;

pub use state::{query_input, AgentResult, Classification, RouterState, RouterUpdate, SourceKey};
pub use tools::{github_tools, notion_tools, slack_tools};

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use weft::graph::{
    Branch, CompilationError, CompiledGraph, Node, NodeContext, NodeOutput, RunConfig, StateGraph,
    END, START,
};
use weft::message::Message;
use weft::model::{extract_as, ChatModel};
use weft::state::Slot;
use weft::GraphError;

use crate::agent::{self, AgentState};

const CLASSIFY_PROMPT: &str = "Analyze the user query and decide which knowledge sources to consult.
For each relevant source generate a targeted sub-question optimized for that domain.

Available sources:
- github : Source code, implementation details, issues, pull requests
- notion : Internal documentation, onboarding guides, policies, wikis
- slack  : Team discussions, informal knowledge sharing, recent conversations

Return ONLY the relevant sources. Omit sources that are unlikely to have useful information.";

const GITHUB_AGENT_PROMPT: &str = "You are a GitHub expert.
Answer questions about code, API references, and implementation details by
searching repositories, issues, and pull requests.
Always cite the specific file, issue number, or PR you found information in.";

const NOTION_AGENT_PROMPT: &str = "You are a Notion documentation expert.
Answer questions about internal processes, policies, setup guides, and team wikis
by searching the organization's Notion workspace.
Always reference the specific page or section you found information in.";

const SLACK_AGENT_PROMPT: &str = "You are a Slack knowledge expert.
Answer questions by searching relevant threads and discussions where team members
have shared knowledge, solutions, and informal guidance.
Always mention the channel and author when citing information.";

#[derive(Deserialize)]
struct ClassifyResult {
    classifications: Vec<Classification>,
}

/// Decides which verticals to consult, each with a tailored sub-question.
pub struct ClassifyNode {
    model: Arc<dyn ChatModel>,
}

impl ClassifyNode {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Node<RouterState> for ClassifyNode {
    async fn run(
        &self,
        state: &RouterState,
        _ctx: &NodeContext,
    ) -> Result<NodeOutput<RouterState>, GraphError> {
        let schema = json!({
            "type": "object",
            "properties": {
                "classifications": {
                    "type": "array",
                    "description": "Knowledge sources to query, each with a targeted sub-question. Only include sources that are genuinely relevant.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "source": {"type": "string", "enum": ["github", "notion", "slack"]},
                            "query": {"type": "string"}
                        },
                        "required": ["source", "query"]
                    }
                }
            },
            "required": ["classifications"]
        });
        let messages = [
            Message::system(CLASSIFY_PROMPT),
            Message::user(state.query.clone()),
        ];
        let result: ClassifyResult = extract_as(self.model.as_ref(), &messages, &schema).await?;
        debug!(count = result.classifications.len(), "classified query");
        Ok(NodeOutput::update(RouterUpdate {
            classifications: Slot::set(result.classifications),
            ..Default::default()
        }))
    }
}

/// One vertical: runs its sub-agent on the branch's sub-question and appends
/// the result. Receives the query via branch input; falls back to the
/// original query when invoked outside a fan-out.
pub struct SourceAgentNode {
    source: SourceKey,
    agent: CompiledGraph<AgentState>,
}

impl SourceAgentNode {
    pub fn new(source: SourceKey, agent: CompiledGraph<AgentState>) -> Self {
        Self { source, agent }
    }
}

#[async_trait]
impl Node<RouterState> for SourceAgentNode {
    async fn run(
        &self,
        state: &RouterState,
        ctx: &NodeContext,
    ) -> Result<NodeOutput<RouterState>, GraphError> {
        let query = ctx
            .branch_input
            .as_ref()
            .and_then(|input| input.get("query"))
            .and_then(|q| q.as_str())
            .unwrap_or(&state.query)
            .to_string();

        let out = self
            .agent
            .invoke(agent::user_turn(query), RunConfig::default())
            .await?;
        Ok(NodeOutput::update(RouterUpdate {
            results: vec![AgentResult {
                source: self.source,
                result: agent::final_text(&out),
            }],
            ..Default::default()
        }))
    }
}

/// Combines all collected vertical results into one answer.
pub struct SynthesizeNode {
    model: Arc<dyn ChatModel>,
}

impl SynthesizeNode {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Node<RouterState> for SynthesizeNode {
    async fn run(
        &self,
        state: &RouterState,
        _ctx: &NodeContext,
    ) -> Result<NodeOutput<RouterState>, GraphError> {
        if state.results.is_empty() {
            return Ok(NodeOutput::update(RouterUpdate {
                final_answer: Slot::set(
                    "No relevant information was found in any knowledge source.".to_string(),
                ),
                ..Default::default()
            }));
        }

        let formatted = state
            .results
            .iter()
            .map(|r| format!("**{} result:**\n{}", r.source, r.result))
            .collect::<Vec<_>>()
            .join("\n\n");
        let system = format!(
            "Synthesize the following search results to answer the original question:\n\
             \"{}\"\n\n\
             Guidelines:\n\
             - Combine information from all sources without unnecessary repetition.\n\
             - Highlight the most relevant and actionable information first.\n\
             - Cite the source (GitHub / Notion / Slack) when attributing specific facts.\n\
             - Keep the response well-organized and concise.",
            state.query
        );
        let response = self
            .model
            .complete(
                &[Message::system(system), Message::user(formatted)],
                &[],
            )
            .await?;
        Ok(NodeOutput::update(RouterUpdate {
            final_answer: Slot::set(response.content),
            ..Default::default()
        }))
    }
}

/// Assembles the router graph from explicit sub-agents. Tests inject
/// per-vertical stubs here.
pub fn router_graph(
    model: Arc<dyn ChatModel>,
    github: CompiledGraph<AgentState>,
    notion: CompiledGraph<AgentState>,
    slack: CompiledGraph<AgentState>,
) -> Result<CompiledGraph<RouterState>, CompilationError> {
    let mut graph = StateGraph::new();
    graph.add_node("classify", Arc::new(ClassifyNode::new(Arc::clone(&model))));
    graph.add_node(
        "github",
        Arc::new(SourceAgentNode::new(SourceKey::Github, github)),
    );
    graph.add_node(
        "notion",
        Arc::new(SourceAgentNode::new(SourceKey::Notion, notion)),
    );
    graph.add_node(
        "slack",
        Arc::new(SourceAgentNode::new(SourceKey::Slack, slack)),
    );
    graph.add_node("synthesize", Arc::new(SynthesizeNode::new(model)));

    graph.add_edge(START, "classify");
    graph.add_fanout_edges(
        "classify",
        Arc::new(|state: &RouterState| {
            state
                .classifications
                .iter()
                .map(|c| Branch::new(c.source.to_string(), json!({"query": c.query})))
                .collect()
        }),
        &["github", "notion", "slack"],
    );
    graph.add_edge("github", "synthesize");
    graph.add_edge("notion", "synthesize");
    graph.add_edge("slack", "synthesize");
    graph.add_edge("synthesize", END);

    graph.compile()
}

/// The full workflow with the stub vertical tools, one shared model.
pub fn router_workflow(
    model: Arc<dyn ChatModel>,
) -> Result<CompiledGraph<RouterState>, CompilationError> {
    let github = agent::react_agent(
        Arc::clone(&model),
        Arc::new(github_tools()),
        GITHUB_AGENT_PROMPT,
    )?;
    let notion = agent::react_agent(
        Arc::clone(&model),
        Arc::new(notion_tools()),
        NOTION_AGENT_PROMPT,
    )?;
    let slack = agent::react_agent(
        Arc::clone(&model),
        Arc::new(slack_tools()),
        SLACK_AGENT_PROMPT,
    )?;
    router_graph(model, github, notion, slack)
}
