//! Stub search tools for the three knowledge verticals.
//!
//! Each returns canned results shaped like the real service's output; swap in
//! Octokit / Notion / Slack API adapters by replacing these registrations.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use weft::graph::NodeContext;
use weft::tool::{self, Tool, ToolError, ToolOutput, ToolRegistry, ToolSpec};

use crate::agent::AgentState;

#[derive(Deserialize)]
struct QueryArgs {
    query: String,
}

macro_rules! query_tool {
    ($name:ident, $tool_name:literal, $description:literal, $body:expr) => {
        pub struct $name;

        #[async_trait]
        impl Tool<AgentState> for $name {
            fn spec(&self) -> ToolSpec {
                ToolSpec {
                    name: $tool_name.into(),
                    description: Some($description.into()),
                    input_schema: json!({
                        "type": "object",
                        "properties": {"query": {"type": "string"}},
                        "required": ["query"]
                    }),
                }
            }

            async fn call(
                &self,
                raw: Value,
                _state: &AgentState,
                _ctx: &NodeContext,
            ) -> Result<ToolOutput<AgentState>, ToolError> {
                let args: QueryArgs = tool::args($tool_name, raw)?;
                let render: fn(&str) -> String = $body;
                Ok(ToolOutput::Text(render(&args.query)))
            }
        }
    };
}

query_tool!(
    SearchCode,
    "search_code",
    "Search source code across repositories.",
    |query| {
        format!(
            "[GitHub Code] Searched '{query}':\n\
             \u{2022} src/auth/middleware.rs — bearer token validation\n\
             \u{2022} src/auth/jwt.rs — JWT sign / verify helpers\n\
             \u{2022} src/auth/oauth.rs — OAuth2 authorization code flow"
        )
    }
);

query_tool!(
    SearchIssues,
    "search_issues",
    "Search issues for bug reports and feature requests.",
    |query| {
        format!(
            "[GitHub Issues] Matching '{query}':\n\
             \u{2022} #142 — Add API auth docs to README (open)\n\
             \u{2022} #89 — OAuth2 flow broken for mobile clients (closed)\n\
             \u{2022} #203 — Token refresh not handled gracefully (open)"
        )
    }
);

query_tool!(
    SearchPrs,
    "search_prs",
    "Search pull requests for implementation history.",
    |query| {
        format!(
            "[GitHub PRs] Matching '{query}':\n\
             \u{2022} PR #156 — feat: add JWT authentication middleware (merged)\n\
             \u{2022} PR #178 — fix: widen OAuth scopes for calendar access (merged)\n\
             \u{2022} PR #201 — docs: update auth setup guide (open)"
        )
    }
);

query_tool!(
    SearchNotion,
    "search_notion",
    "Search internal documentation, guides, and wikis.",
    |query| {
        format!(
            "[Notion Search] Results for '{query}':\n\
             \u{2022} \"API Authentication Guide\" — OAuth2, API keys, JWT overview\n\
             \u{2022} \"Backend Onboarding\" — auth setup for new services\n\
             \u{2022} \"Security Policy\" — token rotation requirements"
        )
    }
);

query_tool!(
    SearchSlack,
    "search_slack",
    "Search Slack messages and threads for team knowledge.",
    |query| {
        format!(
            "[Slack Search] Messages matching '{query}':\n\
             \u{2022} #engineering (3 days ago) @alice: \"Use Bearer tokens; see Notion for the refresh flow\"\n\
             \u{2022} #backend-help (1 week ago) @bob: \"Had issues with JWT expiry — PR #156 fixed it\"\n\
             \u{2022} #api-team (2 weeks ago) @carol: \"Rate-limit headers are set in the auth middleware\""
        )
    }
);

/// Tools for the GitHub vertical agent.
pub fn github_tools() -> ToolRegistry<AgentState> {
    let mut registry = ToolRegistry::new();
    registry.register(std::sync::Arc::new(SearchCode));
    registry.register(std::sync::Arc::new(SearchIssues));
    registry.register(std::sync::Arc::new(SearchPrs));
    registry
}

/// Tools for the Notion vertical agent.
pub fn notion_tools() -> ToolRegistry<AgentState> {
    let mut registry = ToolRegistry::new();
    registry.register(std::sync::Arc::new(SearchNotion));
    registry
}

/// Tools for the Slack vertical agent.
pub fn slack_tools() -> ToolRegistry<AgentState> {
    let mut registry = ToolRegistry::new();
    registry.register(std::sync::Arc::new(SearchSlack));
    registry
}
