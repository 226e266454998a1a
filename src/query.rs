//! Remote semantic queries.
//!
//! Queries run against the indexing service, not the local store: the
//! service searches the indexed content of a group's uploaded sources and
//! returns scored passages with the owning document attached.

use anyhow::Result;
use serde::Deserialize;

use crate::config::Config;
use crate::models::Document;
use crate::transport::HttpTransport;

/// One scored passage returned by the indexing service.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResultItem {
    /// Relevance in `[0.0, 1.0]`.
    pub score: f64,
    /// The matched passage text.
    pub content: String,
    /// Section headers leading to the passage, outermost first.
    pub headers: Vec<String>,
    pub document: Document,
}

/// CLI entry point — runs a query and prints ranked results to stdout.
pub async fn run_query(config: &Config, group_id: i64, text: &str, limit: Option<i64>) -> Result<()> {
    let transport = HttpTransport::new(&config.indexer)?;
    let limit = limit.unwrap_or(config.indexer.query_limit);

    let results = transport.query(group_id, text, limit).await?;

    if results.is_empty() {
        println!("no results");
        return Ok(());
    }

    for (rank, result) in results.iter().enumerate() {
        let pct = (result.score * 100.0).round() as i64;
        println!("{}. [{:>3}%] {}", rank + 1, pct, result.document.title);
        if !result.headers.is_empty() {
            println!("   {}", result.headers.join(" / "));
        }
        println!("   {}", result.content.replace('\n', "\n   "));
        println!();
    }

    Ok(())
}
