//! # Weft workflows
//!
//! Five agent workflows built on the `weft` engine, each a thin composition
//! of a model, a tool registry, and a graph:
//!
//! - [`rag`]: retrieval QA, plus a self-correcting variant that grades
//!   retrieved context and rewrites the query when it misses.
//! - [`router`]: classifies a question into knowledge verticals, fans out to
//!   one sub-agent per vertical in parallel, and synthesizes the results.
//! - [`sql`]: schema-aware SQL assistant with progressively disclosed skills.
//! - [`supervisor`]: a personal assistant that delegates to calendar and
//!   email sub-agents wrapped as tools.
//! - [`support`]: a multi-step support-ticket state machine whose tools
//!   advance (or rewind) the current step.
//!
//! [`agent`] holds the shared react-agent loop and [`retrieval`] the
//! embedding/vector-index adapters the RAG workflows plug in.

pub mod agent;
pub mod rag;
pub mod retrieval;
pub mod router;
pub mod sql;
pub mod supervisor;
pub mod support;
