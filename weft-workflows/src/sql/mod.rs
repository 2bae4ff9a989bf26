//! Schema-aware SQL assistant with progressively disclosed skills.
//!
//! The system prompt carries only each skill's one-line description; the
//! model calls `load_skill` for the full schema before writing a query, and
//! `execute_sql` to (dry-)run it. The checkpointer keeps loaded skills in
//! conversation history, so a skill fetched once is not reloaded next turn.

mod skills;

pub use skills::sql_skills;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use weft::graph::{CompilationError, CompiledGraph, NodeContext, RunConfig};
use weft::model::ChatModel;
use weft::skill::LoadSkillTool;
use weft::tool::{self, Tool, ToolError, ToolOutput, ToolRegistry, ToolSpec};
use weft::{Checkpointer, GraphError};

use crate::agent::{self, AgentState};

const SQL_SYSTEM_PROMPT: &str = "You are a SQL query assistant that helps users write accurate, efficient SQL
queries against business databases.

## Instructions

1. When a user asks for a SQL query, identify which skill vertical it belongs to.
2. Call load_skill with the correct skill name to retrieve the full schema and
   business logic BEFORE writing any query.
3. Write the query using only tables and columns that exist in the loaded schema.
4. Follow all business rules defined in the skill (e.g. \"only completed orders
   count as revenue\", \"exclude discontinued products\").
5. Always show the final SQL in a fenced ```sql code block.
6. If asked to run the query, call execute_sql after confirming it is correct.";

#[derive(Deserialize)]
struct ExecuteSqlArgs {
    query: String,
    skill: String,
}

/// Dry-run SQL execution stub; wire a real driver here in production.
pub struct ExecuteSql;

#[async_trait]
impl Tool<AgentState> for ExecuteSql {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "execute_sql".into(),
            description: Some(
                "Execute a SQL query against the production database for the given skill \
                 vertical. Only call this after loading the skill and confirming the \
                 query is correct."
                    .into(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "The SQL query to execute"},
                    "skill": {
                        "type": "string",
                        "description": "The skill vertical the query targets, e.g. 'sales_analytics'"
                    }
                },
                "required": ["query", "skill"]
            }),
        }
    }

    async fn call(
        &self,
        raw: Value,
        _state: &AgentState,
        _ctx: &NodeContext,
    ) -> Result<ToolOutput<AgentState>, ToolError> {
        let args: ExecuteSqlArgs = tool::args("execute_sql", raw)?;
        Ok(ToolOutput::Text(format!(
            "[DRY RUN] Executed against the '{}' database:\n\n```sql\n{}\n```\n\n\
             (Stub: no real DB connected — wire up your DB driver here)",
            args.skill,
            args.query.trim()
        )))
    }
}

/// Builds the SQL assistant agent over the standard skill set.
pub fn sql_assistant(
    model: Arc<dyn ChatModel>,
    checkpointer: Arc<dyn Checkpointer<AgentState>>,
) -> Result<SqlAssistant, CompilationError> {
    let skills = Arc::new(sql_skills());
    let mut registry: ToolRegistry<AgentState> = ToolRegistry::new();
    registry.register(Arc::new(LoadSkillTool::<AgentState>::new(Arc::clone(&skills))));
    registry.register(Arc::new(ExecuteSql));

    let system = format!("{SQL_SYSTEM_PROMPT}\n\n{}", skills.catalog_prompt());
    let graph =
        agent::react_agent_with_checkpointer(model, Arc::new(registry), system, checkpointer)?;
    Ok(SqlAssistant { graph })
}

/// The SQL assistant: one `reply` call per user message.
pub struct SqlAssistant {
    graph: CompiledGraph<AgentState>,
}

impl SqlAssistant {
    pub fn graph(&self) -> &CompiledGraph<AgentState> {
        &self.graph
    }

    pub async fn turn(&self, text: &str, thread_id: &str) -> Result<AgentState, GraphError> {
        self.graph
            .invoke(agent::user_turn(text), RunConfig::for_thread(thread_id))
            .await
    }

    pub async fn reply(&self, text: &str, thread_id: &str) -> Result<String, GraphError> {
        Ok(agent::final_text(&self.turn(text, thread_id).await?))
    }
}
