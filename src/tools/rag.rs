//! Retrieval-augmented query tool.
//!
//! Combines two lookups per query: free-text chunks scored against the query
//! terms (a deterministic stand-in for an embedding search) and structured
//! rows fetched from a SQLite store by the chunks' source document ids. The
//! store is opened per invocation so a missing or corrupt database surfaces
//! as a normal tool failure, subject to fallback handling.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rusqlite::Connection;
use serde_json::{json, Value};

use crate::types::Payload;

use super::base_tool::{Tool, ToolError};

/// Number of chunk matches returned when the caller does not say otherwise.
const DEFAULT_TOP_N: usize = 3;

// ---------------------------------------------------------------------------
// KnowledgeStore
// ---------------------------------------------------------------------------

/// A retrieved text chunk with its provenance.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub source_document_id: String,
    pub text: String,
    pub description: Option<String>,
}

/// A structured fact row tied to a source document.
#[derive(Debug, Clone)]
pub struct Fact {
    pub category: String,
    pub data: Value,
}

/// SQLite-backed store of knowledge chunks and structured facts.
pub struct KnowledgeStore {
    conn: Connection,
}

impl KnowledgeStore {
    /// Open (and if necessary initialize) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS knowledge_sources (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 source_document_id TEXT NOT NULL,
                 chunk_text TEXT NOT NULL,
                 source_description TEXT
             );
             CREATE TABLE IF NOT EXISTS structured_facts (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 source_document_id TEXT NOT NULL,
                 category TEXT NOT NULL,
                 data_json TEXT NOT NULL
             );",
        )?;
        Ok(Self { conn })
    }

    /// Insert a free-text chunk for later retrieval.
    pub fn add_chunk(
        &self,
        source_document_id: &str,
        chunk_text: &str,
        source_description: Option<&str>,
    ) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO knowledge_sources (source_document_id, chunk_text, source_description)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![source_document_id, chunk_text, source_description],
        )?;
        Ok(())
    }

    /// Insert a structured fact tied to a source document.
    pub fn add_fact(
        &self,
        source_document_id: &str,
        category: &str,
        data: &Value,
    ) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO structured_facts (source_document_id, category, data_json)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![source_document_id, category, data.to_string()],
        )?;
        Ok(())
    }

    /// All stored chunks.
    pub fn chunks(&self) -> Result<Vec<Chunk>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT source_document_id, chunk_text, source_description FROM knowledge_sources",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Chunk {
                source_document_id: row.get(0)?,
                text: row.get(1)?,
                description: row.get(2)?,
            })
        })?;
        rows.collect()
    }

    /// Structured facts for one source document.
    pub fn facts_for_source(&self, source_document_id: &str) -> Result<Vec<Fact>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT category, data_json FROM structured_facts WHERE source_document_id = ?1",
        )?;
        let rows = stmt.query_map([source_document_id], |row| {
            let category: String = row.get(0)?;
            let raw: String = row.get(1)?;
            Ok((category, raw))
        })?;
        let mut facts = Vec::new();
        for row in rows {
            let (category, raw) = row?;
            let data = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
            facts.push(Fact { category, data });
        }
        Ok(facts)
    }
}

// ---------------------------------------------------------------------------
// Retrieval scoring
// ---------------------------------------------------------------------------

/// Score a chunk against a lowercased query: the number of distinct query
/// terms (length >= 3) appearing in the chunk text.
fn score_chunk(query_lower: &str, chunk_text: &str) -> usize {
    let chunk_lower = chunk_text.to_lowercase();
    let mut seen: Vec<&str> = Vec::new();
    query_lower
        .split_whitespace()
        .filter(|term| term.len() >= 3)
        .filter(|term| {
            if seen.contains(term) {
                false
            } else {
                seen.push(term);
                chunk_lower.contains(*term)
            }
        })
        .count()
}

// ---------------------------------------------------------------------------
// RagQueryTool
// ---------------------------------------------------------------------------

/// Retrieval-augmented lookup over the knowledge store.
#[derive(Debug, Clone)]
pub struct RagQueryTool {
    db_path: PathBuf,
}

impl RagQueryTool {
    /// Create the tool against the store at `db_path`.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

#[async_trait]
impl Tool for RagQueryTool {
    fn name(&self) -> &str {
        "rag_query"
    }

    async fn run(&self, input: Payload) -> Result<Payload, ToolError> {
        let query = match input.get("query").and_then(Value::as_str) {
            Some(q) if !q.is_empty() => q.to_string(),
            _ => {
                let mut output = Payload::new();
                output.insert("error".into(), json!("No query provided for RAG module."));
                output.insert("status".into(), json!("Error - No query"));
                return Ok(output);
            }
        };
        let top_n = input
            .get("top_n_results")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_TOP_N);

        let store = KnowledgeStore::open(&self.db_path)
            .map_err(|e| ToolError::new("StorageError", e.to_string()))?;

        let query_lower = query.to_lowercase();
        let mut scored: Vec<(usize, Chunk)> = store
            .chunks()
            .map_err(|e| ToolError::new("StorageError", e.to_string()))?
            .into_iter()
            .map(|chunk| (score_chunk(&query_lower, &chunk.text), chunk))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.truncate(top_n);

        let mut output = Payload::new();
        output.insert("query_received".into(), json!(query));

        if scored.is_empty() {
            let summary = format!(
                "No relevant documents found in the knowledge store for query: '{}'",
                query
            );
            output.insert("status".into(), json!("No matching documents found."));
            output.insert("retrieval_summary".into(), json!([]));
            output.insert("retrieved_sql_data".into(), json!({}));
            output.insert("combined_summary".into(), json!(summary));
            return Ok(output);
        }

        let mut retrieval_summary: Vec<Value> = Vec::new();
        let mut sql_data = serde_json::Map::new();
        for (score, chunk) in &scored {
            let preview: String = chunk.text.chars().take(120).collect();
            retrieval_summary.push(json!({
                "source_document_id": chunk.source_document_id,
                "score": score,
                "text_preview": preview,
                "source_description": chunk.description,
            }));
            if !sql_data.contains_key(&chunk.source_document_id) {
                let facts = store
                    .facts_for_source(&chunk.source_document_id)
                    .map_err(|e| ToolError::new("StorageError", e.to_string()))?;
                let rows: Vec<Value> = facts
                    .into_iter()
                    .map(|f| json!({ "category": f.category, "data": f.data }))
                    .collect();
                sql_data.insert(chunk.source_document_id.clone(), Value::Array(rows));
            }
        }

        let summary = format!(
            "Found {} matching chunks across {} source documents for query: '{}'",
            scored.len(),
            sql_data.len(),
            query
        );
        output.insert("status".into(), json!("RAG query complete."));
        output.insert("retrieval_summary".into(), Value::Array(retrieval_summary));
        output.insert("retrieved_sql_data".into(), Value::Object(sql_data));
        output.insert("combined_summary".into(), json!(summary));
        Ok(output)
    }
}
