//! Document CRUD commands.

use anyhow::Result;
use uuid::Uuid;

use crate::config::Config;
use crate::db;
use crate::models::{DocumentInput, DocumentPatch};
use crate::store::DocumentStore;

pub async fn run_list_documents(config: &Config, group_id: i64) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = DocumentStore::new(pool.clone());

    let documents = store.list_documents(group_id).await?;

    println!("{:<38} {:<8} TITLE", "ID", "GROUP");
    for document in &documents {
        println!(
            "{:<38} {:<8} {}",
            document.id, document.group_id, document.title
        );
    }

    pool.close().await;
    Ok(())
}

pub async fn run_get_document(config: &Config, id: &str) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = DocumentStore::new(pool.clone());

    let document = store.get_document(id).await?;

    println!("--- Document ---");
    println!("id:     {}", document.id);
    println!("title:  {}", document.title);
    println!("group:  {} ({})", document.group.name, document.group.id);

    pool.close().await;
    Ok(())
}

/// Adds a document with a caller-supplied id, or a fresh UUID when none is
/// given.
pub async fn run_add_document(
    config: &Config,
    id: Option<String>,
    group_id: i64,
    title: &str,
) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = DocumentStore::new(pool.clone());

    let document = store
        .add_document(DocumentInput {
            id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            group_id,
            title: title.to_string(),
        })
        .await?;
    println!(
        "created document {} \"{}\" in group {}",
        document.id, document.title, document.group.name
    );

    pool.close().await;
    Ok(())
}

pub async fn run_move_document(
    config: &Config,
    id: &str,
    group_id: i64,
    title: Option<String>,
) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = DocumentStore::new(pool.clone());

    let document = store
        .update_document(DocumentPatch {
            id: id.to_string(),
            group_id,
            title,
        })
        .await?;
    println!(
        "updated document {} \"{}\" (group {})",
        document.id, document.title, document.group.name
    );

    pool.close().await;
    Ok(())
}

pub async fn run_delete_document(config: &Config, id: &str) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = DocumentStore::new(pool.clone());

    store.delete_document(id).await?;
    println!("deleted document {}", id);

    pool.close().await;
    Ok(())
}
