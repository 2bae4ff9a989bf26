//! Retrieval adapters: embeddings, a similarity index, and ingestion.
//!
//! These sit outside the engine behind small traits so the backends are
//! swappable: [`Embedder`] for the vector service, [`DocumentLoader`] for
//! page loading. [`HashEmbedder`] is a deterministic stand-in that makes the
//! pipeline runnable offline: identical text embeds identically, shared
//! tokens overlap, so similarity ordering is meaningful enough for tests.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use weft::graph::NodeContext;
use weft::tool::{self, Tool, ToolError, ToolOutput, ToolSpec};
use weft::ChatState;

/// Text → vector service.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ToolError>;
}

/// Deterministic bag-of-tokens embedder for dev and tests: each token hashes
/// into one dimension of a fixed-size vector.
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ToolError> {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut vector = vec![0.0f32; self.dimensions];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            vector[(hasher.finish() as usize) % self.dimensions] += 1.0;
        }
        Ok(vector)
    }
}

/// One indexed document chunk.
#[derive(Debug, Clone)]
pub struct Document {
    pub source: String,
    pub content: String,
}

/// A scored search hit.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

struct IndexEntry {
    vector: Vec<f32>,
    document: Document,
}

/// In-memory cosine-similarity index over embedded chunks.
pub struct VectorIndex {
    embedder: Arc<dyn Embedder>,
    entries: RwLock<Vec<IndexEntry>>,
}

impl VectorIndex {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub async fn add(&self, document: Document) -> Result<(), ToolError> {
        let vector = self.embedder.embed(&document.content).await?;
        self.entries
            .write()
            .expect("vector index lock")
            .push(IndexEntry { vector, document });
        Ok(())
    }

    pub async fn add_all(
        &self,
        documents: impl IntoIterator<Item = Document>,
    ) -> Result<(), ToolError> {
        for document in documents {
            self.add(document).await?;
        }
        Ok(())
    }

    /// Top-k documents by cosine similarity to the query.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>, ToolError> {
        let query_vector = self.embedder.embed(query).await?;
        let entries = self.entries.read().expect("vector index lock");
        let mut scored: Vec<ScoredDocument> = entries
            .iter()
            .map(|entry| ScoredDocument {
                document: entry.document.clone(),
                score: cosine_similarity(&entry.vector, &query_vector),
            })
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}

/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Splits text into chunks of at most `chunk_size` characters with
/// `overlap` characters carried between consecutive chunks.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    assert!(chunk_size > 0, "chunk_size must be positive");
    assert!(overlap < chunk_size, "overlap must be smaller than chunk_size");

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let stride = chunk_size - overlap;
    let mut start = 0;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += stride;
    }
    chunks
}

/// Page-loading service used at ingestion time.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<String, ToolError>;
}

/// Serves fixed text per URL; the offline stand-in for a web loader.
pub struct StaticLoader {
    pages: Vec<(String, String)>,
}

impl StaticLoader {
    pub fn new(pages: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
        }
    }
}

#[async_trait]
impl DocumentLoader for StaticLoader {
    async fn load(&self, url: &str) -> Result<String, ToolError> {
        self.pages
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| ToolError::Execution {
                tool: "load".into(),
                reason: format!("no page for url '{url}'"),
            })
    }
}

/// Loads, splits, and indexes a set of pages.
pub async fn ingest(
    loader: &dyn DocumentLoader,
    index: &VectorIndex,
    urls: &[&str],
    chunk_size: usize,
    overlap: usize,
) -> Result<usize, ToolError> {
    let mut total = 0;
    for url in urls {
        let text = loader.load(url).await?;
        for chunk in split_text(&text, chunk_size, overlap) {
            index
                .add(Document {
                    source: url.to_string(),
                    content: chunk,
                })
                .await?;
            total += 1;
        }
    }
    Ok(total)
}

#[derive(Deserialize)]
struct RetrieveArgs {
    query: String,
}

/// The `retrieve` tool: semantic search over the index, serialized for the
/// conversation log.
pub struct RetrieveTool<S> {
    index: Arc<VectorIndex>,
    top_k: usize,
    _state: std::marker::PhantomData<fn() -> S>,
}

impl<S> RetrieveTool<S> {
    pub fn new(index: Arc<VectorIndex>) -> Self {
        Self {
            index,
            top_k: 2,
            _state: std::marker::PhantomData,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

#[async_trait]
impl<S: ChatState> Tool<S> for RetrieveTool<S> {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "retrieve".into(),
            description: Some("Retrieve information related to a query.".into()),
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
        _state: &S,
        _ctx: &NodeContext,
    ) -> Result<ToolOutput<S>, ToolError> {
        let args: RetrieveArgs = tool::args("retrieve", raw)?;
        let hits = self.index.search(&args.query, self.top_k).await?;
        let serialized = hits
            .iter()
            .map(|hit| {
                format!(
                    "Source: {}\nContent: {}",
                    hit.document.source, hit.document.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(ToolOutput::Text(serialized))
    }
}
