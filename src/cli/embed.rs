use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::BrainConfig;

/// Index markdown documentation into the vector store.
pub async fn embed(config: &BrainConfig, dir: Option<PathBuf>) -> Result<()> {
    let db_path = config.resolved_db_path();
    let docs_dir = dir.unwrap_or_else(|| config.resolved_docs_dir());
    let min_doc_bytes = config.search.min_doc_bytes;

    let provider = crate::embedding::create_provider(&config.embedding)?;
    let provider: Arc<dyn crate::embedding::EmbeddingProvider> = Arc::from(provider);

    println!("Indexing markdown files in {}...", docs_dir.display());

    // The whole run is blocking (file IO + inference), so move it off the runtime.
    let model = config.embedding.model.clone();
    let report = tokio::task::spawn_blocking(move || -> Result<_> {
        let mut conn = crate::db::open_database(&db_path)?;
        let report = crate::knowledge::index::index_docs(
            &mut conn,
            provider.as_ref(),
            &docs_dir,
            min_doc_bytes,
        )?;
        // record what actually produced the vectors, for doctor's mismatch check
        crate::db::migrations::set_embedding_model(&conn, &model)?;
        Ok(report)
    })
    .await??;

    println!("Indexed {} document(s)", report.indexed);
    if report.skipped_small > 0 {
        println!("Skipped {} file(s) below the size floor", report.skipped_small);
    }
    if report.unreadable > 0 {
        println!("Could not read {} file(s) — see logs", report.unreadable);
    }

    Ok(())
}
