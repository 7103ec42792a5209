//! Semantic search over the document store.
//!
//! Vector KNN via sqlite-vec, joined back to `documents` for content and
//! file metadata. Distance is sqlite-vec's L2 distance over L2-normalized
//! embeddings — lower is closer.

use anyhow::Result;
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::embedding::embedding_to_bytes;

/// One ranked search hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub filename: String,
    pub path: String,
    pub content: String,
    pub distance: f64,
}

/// Nearest-neighbor search over indexed documentation.
///
/// Returns up to `n_results` hits ordered by ascending distance. An empty
/// store yields an empty list, not an error.
pub fn semantic_search(
    conn: &Connection,
    query_embedding: &[f32],
    n_results: usize,
) -> Result<Vec<SearchHit>> {
    let mut stmt = conn.prepare(
        "SELECT d.filename, d.path, d.content, v.distance \
         FROM (SELECT id, distance FROM documents_vec \
               WHERE embedding MATCH ?1 ORDER BY distance LIMIT ?2) v \
         JOIN documents d ON d.id = v.id ORDER BY v.distance",
    )?;

    let hits = stmt
        .query_map(
            params![embedding_to_bytes(query_embedding), n_results as i64],
            |row| {
                Ok(SearchHit {
                    filename: row.get(0)?,
                    path: row.get(1)?,
                    content: row.get(2)?,
                    distance: row.get(3)?,
                })
            },
        )?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(hits)
}

/// Count of indexed documents (used by stats and doctor).
pub fn document_count(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents_vec", [], |row| row.get(0))?;
    Ok(count as u64)
}
