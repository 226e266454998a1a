//! Group CRUD commands.
//!
//! Thin CLI wrappers over [`DocumentStore`]; each opens the pool, runs one
//! store operation, and prints the result.

use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::models::{GroupInput, GroupPatch};
use crate::store::DocumentStore;

pub async fn run_list_groups(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = DocumentStore::new(pool.clone());

    let groups = store.list_groups().await?;

    println!("{:<8} NAME", "ID");
    for group in &groups {
        println!("{:<8} {}", group.id, group.name);
    }

    pool.close().await;
    Ok(())
}

pub async fn run_add_group(config: &Config, name: &str) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = DocumentStore::new(pool.clone());

    let group = store
        .add_group(GroupInput {
            name: name.to_string(),
        })
        .await?;
    println!("created group {} \"{}\"", group.id, group.name);

    pool.close().await;
    Ok(())
}

pub async fn run_rename_group(config: &Config, id: i64, name: &str) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = DocumentStore::new(pool.clone());

    let group = store
        .update_group(GroupPatch {
            id: Some(id),
            name: Some(name.to_string()),
        })
        .await?;
    println!("renamed group {} to \"{}\"", group.id, group.name);

    pool.close().await;
    Ok(())
}

pub async fn run_delete_group(config: &Config, id: i64) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = DocumentStore::new(pool.clone());

    store.delete_group(id).await?;
    println!("deleted group {} (and its documents)", id);

    pool.close().await;
    Ok(())
}
