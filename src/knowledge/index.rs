//! Indexing path — scan markdown documentation, embed it, store it.
//!
//! [`index_docs`] is the single entry point. One row per file keyed by the
//! file stem; re-indexing a file replaces both the document row and its
//! vector inside one transaction.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::embedding::{embedding_to_bytes, EmbeddingProvider};

/// Outcome of an indexing run.
#[derive(Debug, Default)]
pub struct IndexReport {
    /// Documents embedded and written (new or replaced).
    pub indexed: usize,
    /// Files skipped because they were below the size floor.
    pub skipped_small: usize,
    /// Files that could not be read.
    pub unreadable: usize,
}

/// Embed all `*.md` files in `dir` into the document store.
///
/// Files smaller than `min_doc_bytes` are skipped (tiny stubs add noise to
/// nearest-neighbor results). Unreadable files are logged and skipped rather
/// than failing the whole run.
pub fn index_docs(
    conn: &mut Connection,
    provider: &dyn EmbeddingProvider,
    dir: &Path,
    min_doc_bytes: usize,
) -> Result<IndexReport> {
    anyhow::ensure!(
        dir.is_dir(),
        "docs directory not found: {}",
        dir.display()
    );

    let mut report = IndexReport::default();
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read docs directory {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("md"))
        .collect();
    entries.sort();

    tracing::info!(dir = %dir.display(), files = entries.len(), "indexing markdown documentation");

    for path in entries {
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read file");
                report.unreadable += 1;
                continue;
            }
        };

        if content.len() < min_doc_bytes {
            report.skipped_small += 1;
            continue;
        }

        let embedding = provider
            .embed(&content)
            .with_context(|| format!("failed to embed {}", path.display()))?;

        store_document(conn, &path, &content, &embedding)?;
        report.indexed += 1;
    }

    tracing::info!(
        indexed = report.indexed,
        skipped = report.skipped_small,
        unreadable = report.unreadable,
        "indexing complete"
    );
    Ok(report)
}

/// Upsert one document and its vector. vec0 tables reject INSERT OR REPLACE,
/// so the stale vector row is deleted explicitly first.
pub fn store_document(
    conn: &mut Connection,
    path: &Path,
    content: &str,
    embedding: &[f32],
) -> Result<()> {
    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed")
        .to_string();
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed")
        .to_string();
    let now = chrono::Utc::now().to_rfc3339();

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT OR REPLACE INTO documents (id, filename, path, size, content, indexed_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            filename,
            path.to_string_lossy(),
            content.len() as i64,
            content,
            now,
        ],
    )?;
    tx.execute("DELETE FROM documents_vec WHERE id = ?1", params![id])?;
    tx.execute(
        "INSERT INTO documents_vec (id, embedding) VALUES (?1, ?2)",
        params![id, embedding_to_bytes(embedding)],
    )?;
    tx.commit()?;

    Ok(())
}
