//! Model node: render prompt, invoke the LLM, append one assistant message.
//!
//! The system prompt is selected and rendered from current state just before
//! the call (so a step-driven workflow can swap prompts as its phase field
//! changes), and the tool list the model sees can be narrowed per state;
//! a restricted tool is simply not exposed, which is the whole enforcement.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::ChatModel;
use crate::error::GraphError;
use crate::graph::{Node, NodeContext, NodeOutput};
use crate::message::Message;
use crate::prompt::{PromptTemplate, TemplateVars};
use crate::state::ChatState;
use crate::tool::{ToolRegistry, ToolSpec};

/// A system prompt ready to render: template plus the variables computed from
/// state. Substitution happens once, synchronously, before the model call.
pub struct SystemPrompt {
    template: PromptTemplate,
    vars: TemplateVars,
}

impl SystemPrompt {
    pub fn new(template: PromptTemplate, vars: TemplateVars) -> Self {
        Self { template, vars }
    }

    /// A prompt with no placeholders.
    pub fn fixed(text: impl Into<String>) -> Self {
        Self {
            template: PromptTemplate::new(text),
            vars: TemplateVars::new(),
        }
    }

    fn render(&self) -> String {
        self.template.render(&self.vars)
    }
}

type SystemFn<S> = Arc<dyn Fn(&S) -> SystemPrompt + Send + Sync>;
type ToolFilter<S> = Arc<dyn Fn(&S, Vec<ToolSpec>) -> Vec<ToolSpec> + Send + Sync>;

/// Generic model step for any [`ChatState`].
///
/// **Interaction**: pairs with [`ToolNode`](crate::tool::ToolNode) under a
/// conditional edge on [`tool_router`](crate::graph::routes::tool_router) to
/// form the canonical model ⇄ tools loop.
pub struct ModelNode<S: ChatState> {
    model: Arc<dyn ChatModel>,
    system: Option<SystemFn<S>>,
    tools: Option<Arc<ToolRegistry<S>>>,
    tool_filter: Option<ToolFilter<S>>,
}

impl<S: ChatState> ModelNode<S> {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            system: None,
            tools: None,
            tool_filter: None,
        }
    }

    /// Fixed system prompt, same for every run.
    pub fn with_system(self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.with_system_fn(move |_| SystemPrompt::fixed(text.clone()))
    }

    /// System prompt selected and templated from current state.
    pub fn with_system_fn<F>(mut self, select: F) -> Self
    where
        F: Fn(&S) -> SystemPrompt + Send + Sync + 'static,
    {
        self.system = Some(Arc::new(select));
        self
    }

    /// Exposes the registry's tools to the model.
    pub fn with_tools(mut self, registry: Arc<ToolRegistry<S>>) -> Self {
        self.tools = Some(registry);
        self
    }

    /// Narrows the exposed tools per state (e.g. only the current step's
    /// tools). Filtered-out tools are invisible to the model, not rejected
    /// after the fact.
    pub fn with_tool_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&S, Vec<ToolSpec>) -> Vec<ToolSpec> + Send + Sync + 'static,
    {
        self.tool_filter = Some(Arc::new(filter));
        self
    }
}

#[async_trait]
impl<S: ChatState> Node<S> for ModelNode<S> {
    async fn run(&self, state: &S, _ctx: &NodeContext) -> Result<NodeOutput<S>, GraphError> {
        let mut messages = Vec::with_capacity(state.messages().len() + 1);
        if let Some(system) = &self.system {
            messages.push(Message::system(system(state).render()));
        }
        messages.extend_from_slice(state.messages());

        let mut specs = match &self.tools {
            Some(registry) => registry.specs(),
            None => Vec::new(),
        };
        if let Some(filter) = &self.tool_filter {
            specs = filter(state, specs);
        }

        debug!(tools = specs.len(), messages = messages.len(), "invoking model");
        let response = self.model.complete(&messages, &specs).await?;
        let assistant = Message::assistant_with_tools(response.content, response.tool_calls);
        Ok(NodeOutput::update(S::messages_update(vec![assistant])))
    }
}
