//! Workflow driver: pick a workflow, send one message, print the turn.
//!
//! Without the `openai` feature (or without `OPENAI_API_KEY`) each workflow
//! runs against a scripted mock model that walks its tools once, so the
//! binary demonstrates every graph offline.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;

use weft::checkpoint::MemorySaver;
use weft::message::{Message, ToolCall};
use weft::model::{ChatModel, ChatResponse, MockChatModel};
use weft::state::ChatState;
use weft::RunConfig;

use weft_workflows::agent::{self, AgentState};
use weft_workflows::rag;
use weft_workflows::retrieval::{Document, HashEmbedder, VectorIndex};
use weft_workflows::router::{self, query_input};
use weft_workflows::sql;
use weft_workflows::supervisor;
use weft_workflows::support::{SupportAssistant, SupportState};

#[derive(Parser, Debug)]
#[command(name = "weft")]
#[command(about = "Agent workflows: support, router, rag, sql, supervisor")]
struct Cli {
    /// Conversation thread id (checkpointed workflows resume it).
    #[arg(long, global = true, default_value = "cli")]
    thread: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Multi-step support assistant (warranty → issue → resolution).
    Support {
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Route a question across knowledge verticals in parallel.
    Router {
        #[arg(trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// Retrieval QA with relevance grading.
    Rag {
        #[arg(trailing_var_arg = true)]
        question: Vec<String>,
    },
    /// Schema-aware SQL assistant.
    Sql {
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Personal assistant delegating to calendar/email sub-agents.
    Supervisor {
        #[arg(trailing_var_arg = true)]
        request: Vec<String>,
    },
}

fn text_or(words: &[String], fallback: &str) -> String {
    if words.is_empty() {
        fallback.to_string()
    } else {
        words.join(" ")
    }
}

/// Real backend when available, otherwise the given scripted mock.
fn chat_model(demo: MockChatModel) -> Arc<dyn ChatModel> {
    #[cfg(feature = "openai")]
    {
        let _ = dotenv::dotenv();
        match weft::ChatOpenAI::from_env() {
            Ok(client) => return Arc::new(client),
            Err(e) => eprintln!("note: {e}; falling back to the scripted mock model"),
        }
    }
    Arc::new(demo)
}

fn print_messages(messages: &[Message]) {
    for message in messages {
        match message {
            Message::System { .. } => {}
            Message::User { content } => println!("[User] {content}"),
            Message::Assistant { content, tool_calls } => {
                for call in tool_calls {
                    println!("[Assistant → {}] {}", call.name, call.arguments);
                }
                if !content.is_empty() {
                    println!("[Assistant] {content}");
                }
            }
            Message::Tool { content, .. } => println!("[Tool] {content}"),
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Support { message } => {
            let input = text_or(&message, "Hi, my phone screen is cracked.");
            let model = chat_model(MockChatModel::scripted([
                ChatResponse::with_tool_calls(
                    "",
                    vec![ToolCall::new(
                        "demo-1",
                        "record_warranty_status",
                        json!({"status": "in_warranty"}),
                    )],
                ),
                ChatResponse::text(
                    "Noted — your device is in warranty. Can you describe the issue?",
                ),
            ]));
            let assistant =
                SupportAssistant::new(model, Arc::new(MemorySaver::<SupportState>::new()))?;
            let state = assistant.turn(&input, &cli.thread).await?;
            print_messages(&state.messages);
            println!("---");
            println!(
                "step: {:?}, warranty: {:?}, issue: {:?}",
                state.current_step, state.warranty_status, state.issue_type
            );
        }
        Command::Router { query } => {
            let input = text_or(&query, "How do I authenticate API requests?");
            let model = chat_model(
                MockChatModel::scripted([])
                    .with_fallback(ChatResponse::text(
                        "Auth is JWT middleware in src/auth; see the Notion guide for setup.",
                    ))
                    .with_extraction_fallback(json!({
                        "classifications": [
                            {"source": "github", "query": input.clone()},
                            {"source": "notion", "query": input.clone()}
                        ]
                    })),
            );
            let graph = router::router_workflow(model)?;
            let out = graph.invoke(query_input(&input), RunConfig::default()).await?;
            for result in &out.results {
                println!("[{}] {}", result.source, result.result);
            }
            println!("---");
            println!("{}", out.final_answer);
        }
        Command::Rag { question } => {
            let input = text_or(&question, "What is task decomposition?");
            let index = VectorIndex::new(Arc::new(HashEmbedder::default()));
            index
                .add_all([
                    Document {
                        source: "notes/agents.md".into(),
                        content: "Task decomposition splits a hard task into smaller steps \
                                  the agent can plan and execute one at a time."
                            .into(),
                    },
                    Document {
                        source: "notes/prompting.md".into(),
                        content: "Few-shot prompting conditions the model with worked \
                                  examples."
                            .into(),
                    },
                ])
                .await?;
            let model = chat_model(
                MockChatModel::scripted([
                    ChatResponse::with_tool_calls(
                        "",
                        vec![ToolCall::new(
                            "demo-1",
                            "retrieve",
                            json!({"query": input.clone()}),
                        )],
                    ),
                    ChatResponse::text(
                        "Task decomposition breaks a hard task into smaller plannable steps.",
                    ),
                ])
                .with_extraction_fallback(json!({"binary_score": "yes"})),
            );
            let graph = rag::graded_rag_graph(model, Arc::new(index))?;
            let out = graph
                .invoke(
                    rag::RagState::messages_update(vec![Message::user(&input)]),
                    RunConfig::default(),
                )
                .await?;
            print_messages(&out.messages);
        }
        Command::Sql { message } => {
            let input = text_or(&message, "What was our revenue last quarter?");
            let model = chat_model(MockChatModel::scripted([
                ChatResponse::with_tool_calls(
                    "",
                    vec![ToolCall::new(
                        "demo-1",
                        "load_skill",
                        json!({"skill_name": "sales_analytics"}),
                    )],
                ),
                ChatResponse::text(
                    "```sql\nSELECT SUM(total_amount) AS revenue\nFROM orders\n\
                     WHERE status = 'completed'\n  AND order_date >= CURRENT_DATE - INTERVAL '3 months';\n```",
                ),
            ]));
            let assistant =
                sql::sql_assistant(model, Arc::new(MemorySaver::<AgentState>::new()))?;
            let state = assistant.turn(&input, &cli.thread).await?;
            print_messages(&state.messages);
        }
        Command::Supervisor { request } => {
            let input = text_or(
                &request,
                "Schedule a team meeting next Tuesday at 2pm and remind the design team.",
            );
            let model = chat_model(
                MockChatModel::scripted([
                    ChatResponse::with_tool_calls(
                        "",
                        vec![ToolCall::new(
                            "demo-1",
                            "schedule_event",
                            json!({"request": input.clone()}),
                        )],
                    ),
                    ChatResponse::text("All set — the meeting is on the calendar."),
                ])
                .with_fallback(ChatResponse::text(
                    "Event created: \"team meeting\" on Tuesday 14:00.",
                )),
            );
            let graph = supervisor::supervisor_agent(model)?;
            let out = graph
                .invoke(agent::user_turn(&input), RunConfig::default())
                .await?;
            print_messages(&out.messages);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
