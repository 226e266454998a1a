//! Integration tests for the relational store.
//!
//! Exercises the full persistence surface against a real SQLite database
//! in a temp directory: group and document CRUD, referential integrity,
//! cascading delete, and the NotFound / InvalidArgument error paths.

use docshelf::config::{Config, DbConfig, IndexerConfig};
use docshelf::db;
use docshelf::error::StoreError;
use docshelf::migrate;
use docshelf::models::{DocumentInput, DocumentPatch, GroupInput, GroupPatch};
use docshelf::store::DocumentStore;
use tempfile::TempDir;

async fn test_store() -> (TempDir, DocumentStore) {
    let tmp = TempDir::new().unwrap();
    let config = Config {
        db: DbConfig {
            path: tmp.path().join("shelf.sqlite"),
        },
        indexer: IndexerConfig::default(),
    };
    migrate::run_migrations(&config).await.unwrap();
    let pool = db::connect(&config).await.unwrap();
    (tmp, DocumentStore::new(pool))
}

fn group_input(name: &str) -> GroupInput {
    GroupInput {
        name: name.to_string(),
    }
}

fn document_input(id: &str, group_id: i64, title: &str) -> DocumentInput {
    DocumentInput {
        id: id.to_string(),
        group_id,
        title: title.to_string(),
    }
}

// ─── Groups ─────────────────────────────────────────────────────────

#[tokio::test]
async fn list_groups_empty() {
    let (_tmp, store) = test_store().await;
    assert!(store.list_groups().await.unwrap().is_empty());
}

#[tokio::test]
async fn add_group_assigns_id() {
    let (_tmp, store) = test_store().await;
    let group = store.add_group(group_input("test")).await.unwrap();
    assert!(group.id > 0);
    assert_eq!(group.name, "test");
}

#[tokio::test]
async fn list_returns_added_group() {
    let (_tmp, store) = test_store().await;
    let group = store.add_group(group_input("test")).await.unwrap();
    assert_eq!(store.list_groups().await.unwrap(), vec![group]);
}

#[tokio::test]
async fn get_group_round_trips() {
    let (_tmp, store) = test_store().await;
    let group = store.add_group(group_input("test")).await.unwrap();
    assert_eq!(store.get_group(group.id).await.unwrap(), group);
}

#[tokio::test]
async fn get_missing_group_is_not_found() {
    let (_tmp, store) = test_store().await;
    let err = store.get_group(42).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "group", .. }));
}

#[tokio::test]
async fn update_group_merges_name() {
    let (_tmp, store) = test_store().await;
    let group = store.add_group(group_input("test")).await.unwrap();

    let updated = store
        .update_group(GroupPatch {
            id: Some(group.id),
            name: Some("updated".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(updated.id, group.id);
    assert_eq!(updated.name, "updated");
    assert_eq!(store.get_group(group.id).await.unwrap(), updated);
}

#[tokio::test]
async fn update_group_without_id_is_invalid_argument() {
    let (_tmp, store) = test_store().await;
    let err = store
        .update_group(GroupPatch {
            id: None,
            name: Some("test".to_string()),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));
}

#[tokio::test]
async fn update_missing_group_is_not_found() {
    let (_tmp, store) = test_store().await;
    let err = store
        .update_group(GroupPatch {
            id: Some(42),
            name: Some("test".to_string()),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "group", .. }));
}

#[tokio::test]
async fn delete_group_removes_it() {
    let (_tmp, store) = test_store().await;
    let group = store.add_group(group_input("test")).await.unwrap();
    store.delete_group(group.id).await.unwrap();
    assert!(store.get_group(group.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn delete_missing_group_is_silent() {
    let (_tmp, store) = test_store().await;
    store.delete_group(42).await.unwrap();
}

// ─── Documents ──────────────────────────────────────────────────────

#[tokio::test]
async fn list_documents_empty_for_existing_group() {
    let (_tmp, store) = test_store().await;
    let group = store.add_group(group_input("test")).await.unwrap();
    assert!(store.list_documents(group.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_documents_for_missing_group_is_not_found() {
    let (_tmp, store) = test_store().await;
    let err = store.list_documents(42).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "group", .. }));
}

#[tokio::test]
async fn add_document_attaches_group() {
    let (_tmp, store) = test_store().await;
    let group = store.add_group(group_input("test")).await.unwrap();

    let document = store
        .add_document(document_input("uuid-1", group.id, "test"))
        .await
        .unwrap();

    assert_eq!(document.id, "uuid-1");
    assert_eq!(document.title, "test");
    assert_eq!(document.group_id, group.id);
    assert_eq!(document.group, group);
}

#[tokio::test]
async fn add_document_for_missing_group_is_not_found() {
    let (_tmp, store) = test_store().await;
    let err = store
        .add_document(document_input("uuid-1", 42, "test"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "group", .. }));
}

#[tokio::test]
async fn add_document_with_taken_id_is_conflict() {
    let (_tmp, store) = test_store().await;
    let group = store.add_group(group_input("test")).await.unwrap();
    store
        .add_document(document_input("uuid-1", group.id, "first"))
        .await
        .unwrap();

    let err = store
        .add_document(document_input("uuid-1", group.id, "second"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict { .. }));

    // The original document is untouched
    let stored = store.get_document("uuid-1").await.unwrap();
    assert_eq!(stored.title, "first");
}

#[tokio::test]
async fn list_returns_added_document_with_group() {
    let (_tmp, store) = test_store().await;
    let group = store.add_group(group_input("test")).await.unwrap();
    let document = store
        .add_document(document_input("uuid-1", group.id, "test"))
        .await
        .unwrap();

    let documents = store.list_documents(group.id).await.unwrap();
    assert_eq!(documents, vec![document]);
    assert_eq!(documents[0].group, group);
}

#[tokio::test]
async fn get_document_round_trips() {
    let (_tmp, store) = test_store().await;
    let group = store.add_group(group_input("test")).await.unwrap();
    let document = store
        .add_document(document_input("uuid-1", group.id, "test"))
        .await
        .unwrap();

    let fetched = store.get_document("uuid-1").await.unwrap();
    assert_eq!(fetched, document);
    assert_eq!(fetched.group, group);
}

#[tokio::test]
async fn get_missing_document_is_not_found() {
    let (_tmp, store) = test_store().await;
    let err = store.get_document("uuid-1").await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound {
            entity: "document",
            ..
        }
    ));
}

#[tokio::test]
async fn update_document_retitles() {
    let (_tmp, store) = test_store().await;
    let group = store.add_group(group_input("test")).await.unwrap();
    store
        .add_document(document_input("uuid-1", group.id, "test"))
        .await
        .unwrap();

    let updated = store
        .update_document(DocumentPatch {
            id: "uuid-1".to_string(),
            group_id: group.id,
            title: Some("updated".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(updated.title, "updated");
    assert_eq!(updated.group, group);
    assert_eq!(store.get_document("uuid-1").await.unwrap(), updated);
}

#[tokio::test]
async fn update_document_moves_between_groups() {
    let (_tmp, store) = test_store().await;
    let first = store.add_group(group_input("first")).await.unwrap();
    let second = store.add_group(group_input("second")).await.unwrap();
    store
        .add_document(document_input("uuid-1", first.id, "test"))
        .await
        .unwrap();

    let moved = store
        .update_document(DocumentPatch {
            id: "uuid-1".to_string(),
            group_id: second.id,
            title: None,
        })
        .await
        .unwrap();

    assert_eq!(moved.group_id, second.id);
    assert_eq!(moved.group, second);
    // Title untouched by a group-only patch
    assert_eq!(moved.title, "test");
}

#[tokio::test]
async fn update_missing_document_is_not_found() {
    let (_tmp, store) = test_store().await;
    // A live group isolates the failure to the document id
    let group = store.add_group(group_input("test")).await.unwrap();

    let err = store
        .update_document(DocumentPatch {
            id: "uuid-1".to_string(),
            group_id: group.id,
            title: Some("test".to_string()),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound {
            entity: "document",
            ..
        }
    ));
}

#[tokio::test]
async fn update_document_with_missing_group_changes_nothing() {
    let (_tmp, store) = test_store().await;
    let group = store.add_group(group_input("test")).await.unwrap();
    let document = store
        .add_document(document_input("uuid-1", group.id, "test"))
        .await
        .unwrap();

    let err = store
        .update_document(DocumentPatch {
            id: "uuid-1".to_string(),
            group_id: 42,
            title: Some("updated".to_string()),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "group", .. }));

    // Atomic: neither title nor group changed
    let stored = store.get_document("uuid-1").await.unwrap();
    assert_eq!(stored, document);
}

#[tokio::test]
async fn delete_document_removes_it() {
    let (_tmp, store) = test_store().await;
    let group = store.add_group(group_input("test")).await.unwrap();
    store
        .add_document(document_input("uuid-1", group.id, "test"))
        .await
        .unwrap();

    store.delete_document("uuid-1").await.unwrap();
    assert!(store
        .get_document("uuid-1")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn delete_missing_document_is_silent() {
    let (_tmp, store) = test_store().await;
    store.delete_document("uuid-1").await.unwrap();
}

#[tokio::test]
async fn deleting_group_cascades_to_documents() {
    let (_tmp, store) = test_store().await;
    let group = store.add_group(group_input("test")).await.unwrap();
    let document = store
        .add_document(document_input("uuid-1", group.id, "test"))
        .await
        .unwrap();

    assert_eq!(
        store.list_documents(group.id).await.unwrap(),
        vec![document]
    );

    store.delete_group(group.id).await.unwrap();

    assert!(store
        .get_document("uuid-1")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn clear_tables_empties_both() {
    let (_tmp, store) = test_store().await;
    let group = store.add_group(group_input("test")).await.unwrap();
    store
        .add_document(document_input("uuid-1", group.id, "test"))
        .await
        .unwrap();

    store.clear_tables().await.unwrap();

    assert!(store.list_groups().await.unwrap().is_empty());
    assert!(store.get_document("uuid-1").await.unwrap_err().is_not_found());
}
