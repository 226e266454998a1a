//! Upload and source commands.
//!
//! `run_upload` wires the store, the HTTP transports, and the pipeline
//! together, feeds lifecycle records to the configured progress reporter,
//! and prints the persisted document. The document id is derived from the
//! file content (SHA-256), so re-uploading identical content collides
//! loudly instead of creating a duplicate.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::db;
use crate::pipeline::{UploadPipeline, UploadRequest};
use crate::progress::ProgressMode;
use crate::store::DocumentStore;
use crate::transport::{HttpTransport, StatusTransport};

pub async fn run_upload(
    config: &Config,
    file: &Path,
    group_id: i64,
    title: Option<String>,
    mode: ProgressMode,
) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = DocumentStore::new(pool.clone());

    // Fail on an unknown group before any bytes move
    store.get_group(group_id).await?;

    let transport = Arc::new(HttpTransport::new(&config.indexer)?);
    let pipeline = UploadPipeline::new(
        store,
        transport.clone(),
        transport,
        Duration::from_secs(config.indexer.poll_interval_secs),
    );

    let document_id = content_id(file)?;
    let title = match title {
        Some(title) => title,
        None => file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| document_id.clone()),
    };

    let mut handle = pipeline.upload(UploadRequest {
        file: file.to_path_buf(),
        document_id,
        group_id,
        title,
    });

    let reporter = mode.reporter();
    while let Some(state) = handle.next_state().await {
        reporter.report(&state);
    }
    let document = handle.finish().await?;

    println!(
        "uploaded document {} \"{}\" to group {}",
        document.id, document.title, document.group.name
    );

    pool.close().await;
    Ok(())
}

pub async fn run_source_status(config: &Config, id: &str) -> Result<()> {
    let transport = HttpTransport::new(&config.indexer)?;
    let source = transport.status(id).await?;

    println!("{:<38} STATUS", "ID");
    println!("{:<38} {}", source.id, source.status);

    Ok(())
}

pub async fn run_source_delete(config: &Config, id: &str) -> Result<()> {
    let transport = HttpTransport::new(&config.indexer)?;
    transport.delete(id).await?;
    println!("deleted source {}", id);

    Ok(())
}

/// SHA-256 of the file bytes, hex-encoded. Used as the document id.
fn content_id(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_id_is_stable_hex() {
        let tmp = std::env::temp_dir().join("docshelf-content-id-test");
        std::fs::write(&tmp, b"hello").unwrap();
        let id = content_id(&tmp).unwrap();
        assert_eq!(
            id,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        std::fs::remove_file(&tmp).ok();
    }
}
