pub mod check;
pub mod doctor;
pub mod embed;
pub mod reset;
pub mod search;
pub mod state;
pub mod stats;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Files the local embedding provider needs, with their upstream sources.
const MODEL_FILES: &[(&str, &str)] = &[
    (
        "model.onnx",
        "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/onnx/model.onnx",
    ),
    (
        "tokenizer.json",
        "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/tokenizer.json",
    ),
];

/// Fetch the embedding model and tokenizer into the cache directory.
///
/// Files already present are left alone, so an interrupted run resumes where
/// it stopped instead of re-downloading the ~90MB model.
pub async fn model_download(config: &crate::config::EmbeddingConfig) -> Result<()> {
    let cache_dir = crate::config::expand_tilde(&config.cache_dir);
    std::fs::create_dir_all(&cache_dir)
        .with_context(|| format!("failed to create cache dir: {}", cache_dir.display()))?;

    let client = reqwest::Client::new();
    for (name, url) in MODEL_FILES {
        let dest = cache_dir.join(name);
        if dest.exists() {
            println!("{name} already present, skipping");
            continue;
        }
        println!("Fetching {name}...");
        fetch_to_file(&client, url, &dest)
            .await
            .with_context(|| format!("failed to download {name}"))?;
        println!("  saved to {}", dest.display());
    }

    println!("Embedding model ready. Run `brain embed` to index documentation.");
    Ok(())
}

/// Stream a URL to disk, chunk by chunk, behind a progress bar. Writes go
/// through a `.part` file so an interrupted download never leaves a
/// truncated model at the final path.
async fn fetch_to_file(client: &reqwest::Client, url: &str, dest: &Path) -> Result<()> {
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("HTTP request failed for {url}"))?
        .error_for_status()?;

    let bar = match response.content_length() {
        Some(total) => {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("  {bar:40.cyan/blue} {bytes}/{total_bytes} ({eta})")?
                    .progress_chars("##-"),
            );
            bar
        }
        None => ProgressBar::new_spinner(),
    };

    let partial = dest.with_extension("part");
    let mut file = tokio::fs::File::create(&partial)
        .await
        .with_context(|| format!("failed to create {}", partial.display()))?;

    while let Some(chunk) = response.chunk().await.context("error reading response")? {
        file.write_all(&chunk).await.context("error writing to file")?;
        bar.inc(chunk.len() as u64);
    }

    file.flush().await?;
    drop(file);
    tokio::fs::rename(&partial, dest)
        .await
        .context("failed to move download into place")?;

    bar.finish_and_clear();
    Ok(())
}
