//! Nodes of the self-correcting RAG graph: grade, rewrite, generate.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use weft::graph::{Node, NodeContext, NodeOutput};
use weft::message::Message;
use weft::model::{extract_as, ChatModel};
use weft::prompt::{PromptTemplate, TemplateVars};
use weft::state::{ChatState, Slot};
use weft::GraphError;

use super::state::{context, question, Grade, RagState, RagUpdate};

const GRADE_PROMPT: &str = "You are a grader assessing the relevance of retrieved documents to a user question.

Retrieved documents:
-------
{context}
-------

User question: {question}

Give a binary score: 'yes' if the documents are relevant to the question, 'no' if they are not.";

const REWRITE_PROMPT: &str = "Look at the input question and reason about its underlying semantic intent.

Initial question:
-------
{question}
-------

Formulate an improved question that will work better for semantic search:";

const GENERATE_PROMPT: &str = "You are an assistant for question-answering tasks.
Use the following retrieved context to answer the question.
If you don't know the answer, say \"I don't know.\"
Keep the answer concise — three sentences maximum.

Question: {question}
Context: {context}";

fn render(template: &str, state: &RagState) -> Message {
    let vars = TemplateVars::from([
        ("question".to_string(), question(state).to_string()),
        ("context".to_string(), context(state).to_string()),
    ]);
    Message::user(PromptTemplate::new(template).render(&vars))
}

#[derive(Deserialize)]
struct GradeResult {
    binary_score: Grade,
}

/// Grades the retrieved context against the original question via structured
/// output and records the verdict; the edge after this node routes on it.
pub struct GradeNode {
    model: Arc<dyn ChatModel>,
}

impl GradeNode {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Node<RagState> for GradeNode {
    async fn run(
        &self,
        state: &RagState,
        _ctx: &NodeContext,
    ) -> Result<NodeOutput<RagState>, GraphError> {
        let schema = json!({
            "type": "object",
            "properties": {
                "binary_score": {
                    "type": "string",
                    "enum": ["yes", "no"],
                    "description": "'yes' if the docs are relevant to the question, else 'no'"
                }
            },
            "required": ["binary_score"]
        });
        let result: GradeResult =
            extract_as(self.model.as_ref(), &[render(GRADE_PROMPT, state)], &schema).await?;
        debug!(score = ?result.binary_score, "graded retrieved documents");
        Ok(NodeOutput::update(RagUpdate {
            relevance: Slot::set(Some(result.binary_score)),
            ..Default::default()
        }))
    }
}

/// The retriever came back with irrelevant context: rewrite the question to
/// better reflect its semantic intent and loop back to the model node.
pub struct RewriteNode {
    model: Arc<dyn ChatModel>,
}

impl RewriteNode {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Node<RagState> for RewriteNode {
    async fn run(
        &self,
        state: &RagState,
        _ctx: &NodeContext,
    ) -> Result<NodeOutput<RagState>, GraphError> {
        let response = self
            .model
            .complete(&[render(REWRITE_PROMPT, state)], &[])
            .await?;
        debug!(improved = %response.content, "rewrote retrieval question");
        Ok(NodeOutput::update(RagState::messages_update(vec![
            Message::assistant(response.content),
        ])))
    }
}

/// The context passed the relevance check: generate the final answer.
pub struct GenerateNode {
    model: Arc<dyn ChatModel>,
}

impl GenerateNode {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Node<RagState> for GenerateNode {
    async fn run(
        &self,
        state: &RagState,
        _ctx: &NodeContext,
    ) -> Result<NodeOutput<RagState>, GraphError> {
        let response = self
            .model
            .complete(&[render(GENERATE_PROMPT, state)], &[])
            .await?;
        Ok(NodeOutput::update(RagState::messages_update(vec![
            Message::assistant(response.content),
        ])))
    }
}
