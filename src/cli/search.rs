use anyhow::Result;
use std::sync::Arc;

use crate::config::BrainConfig;

/// Run a semantic search from the terminal.
pub async fn search(config: &BrainConfig, query: &str, n_results: Option<usize>) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = crate::db::open_database(&db_path)?;

    let provider = crate::embedding::create_provider(&config.embedding)?;
    let embedding_provider: Arc<dyn crate::embedding::EmbeddingProvider> = Arc::from(provider);

    // Embed the query off the async runtime
    let query_text = query.to_string();
    let ep = Arc::clone(&embedding_provider);
    let query_embedding = tokio::task::spawn_blocking(move || ep.embed(&query_text)).await??;

    let n = n_results.unwrap_or(config.search.n_results);
    let hits = crate::knowledge::search::semantic_search(&conn, &query_embedding, n)?;

    if hits.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!("Search results for: {query}\n");
    for (i, hit) in hits.iter().enumerate() {
        let preview = if hit.content.len() > 150 {
            let end = hit
                .content
                .char_indices()
                .take_while(|(idx, _)| *idx < 150)
                .last()
                .map(|(idx, c)| idx + c.len_utf8())
                .unwrap_or(150);
            format!("{}...", &hit.content[..end])
        } else {
            hit.content.clone()
        };

        println!("  {}. {} (distance: {:.3})", i + 1, hit.filename, hit.distance);
        println!("     {preview}");
        println!();
    }

    Ok(())
}
