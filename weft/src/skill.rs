//! Skills: progressive disclosure of reference content.
//!
//! A skill's one-line description is always visible in the system prompt;
//! its full content (schemas, business rules) is revealed only when the
//! model explicitly asks for it through the `load_skill` tool. This keeps
//! prompt size bounded no matter how much reference material exists.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::graph::NodeContext;
use crate::state::GraphState;
use crate::tool::{self, Tool, ToolError, ToolOutput, ToolSpec};

/// A self-contained unit of reference material.
#[derive(Debug, Clone)]
pub struct Skill {
    /// Unique identifier used to load the skill.
    pub name: String,
    /// One-two sentence description shown in the system prompt upfront.
    pub description: String,
    /// Full content, loaded on demand via the `load_skill` tool.
    pub content: String,
}

impl Skill {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            content: content.into(),
        }
    }
}

/// Ordered skill registry.
pub struct SkillSet {
    skills: Vec<Skill>,
}

impl SkillSet {
    pub fn new(skills: Vec<Skill>) -> Self {
        Self { skills }
    }

    pub fn get(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.skills.iter().map(|s| s.name.as_str()).collect()
    }

    /// The always-visible catalog section for a system prompt.
    pub fn catalog_prompt(&self) -> String {
        let lines: Vec<String> = self
            .skills
            .iter()
            .map(|s| format!("  - **{}**: {}", s.name, s.description))
            .collect();
        format!(
            "## Available Skills\n\n\
             Use the `load_skill` tool to get the full content of any of the \
             following skills before relying on it:\n\n{}\n\n\
             Always load the relevant skill before answering from it.",
            lines.join("\n")
        )
    }
}

#[derive(Deserialize)]
struct LoadSkillArgs {
    skill_name: String,
}

/// The `load_skill` tool: reveals a skill's full content on request.
///
/// An unknown name is answered with the list of available skills; the model
/// is expected to correct itself, so this is a result, not an error.
pub struct LoadSkillTool<S> {
    skills: Arc<SkillSet>,
    _state: PhantomData<fn() -> S>,
}

impl<S> LoadSkillTool<S> {
    pub fn new(skills: Arc<SkillSet>) -> Self {
        Self {
            skills,
            _state: PhantomData,
        }
    }
}

#[async_trait]
impl<S: GraphState> Tool<S> for LoadSkillTool<S> {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "load_skill".into(),
            description: Some(
                "Load the full content of a specific skill. Call this before relying on \
                 a skill's details. Use the skill name exactly as shown in the Available \
                 Skills list."
                    .into(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "skill_name": {
                        "type": "string",
                        "description": "Exact name of the skill to load"
                    }
                },
                "required": ["skill_name"]
            }),
        }
    }

    async fn call(
        &self,
        raw: Value,
        _state: &S,
        _ctx: &NodeContext,
    ) -> Result<ToolOutput<S>, ToolError> {
        let args: LoadSkillArgs = tool::args("load_skill", raw)?;
        match self.skills.get(&args.skill_name) {
            Some(skill) => Ok(ToolOutput::Text(format!(
                "Skill loaded: **{}**\n\n{}",
                skill.name, skill.content
            ))),
            None => Ok(ToolOutput::Text(format!(
                "Skill '{}' not found.\nAvailable skills: {}\n\n\
                 Use one of the available skill names exactly as listed.",
                args.skill_name,
                self.skills.names().join(", ")
            ))),
        }
    }
}
