//! Embedded relational store for groups and documents.
//!
//! Wraps a SQLite pool behind the full persistence surface of the
//! application: group CRUD, document CRUD, and the referential-integrity
//! rules between them. Every document references a live group at every
//! mutation boundary, deleting a group cascades to its documents, and
//! reads attach the owning group as a denormalized snapshot (a read-time
//! join, never persisted).
//!
//! The store is constructed once per process from a connected pool and
//! passed by reference to every consumer; there is no ambient instance.

use sqlx::{Row, SqlitePool};

use crate::error::StoreError;
use crate::models::{Document, DocumentInput, DocumentPatch, Group, GroupInput, GroupPatch};

/// Durable, queryable storage for groups and documents.
///
/// Cloning is cheap; clones share the underlying pool.
#[derive(Clone)]
pub struct DocumentStore {
    pool: SqlitePool,
}

impl DocumentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns all groups in storage order.
    pub async fn list_groups(&self) -> Result<Vec<Group>, StoreError> {
        let rows = sqlx::query("SELECT id, name FROM groups")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| Group {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    /// Persists a new group and returns it with its store-assigned id.
    pub async fn add_group(&self, input: GroupInput) -> Result<Group, StoreError> {
        let result = sqlx::query("INSERT INTO groups (name) VALUES (?)")
            .bind(&input.name)
            .execute(&self.pool)
            .await?;

        Ok(Group {
            id: result.last_insert_rowid(),
            name: input.name,
        })
    }

    /// Fetches a group by id.
    pub async fn get_group(&self, id: i64) -> Result<Group, StoreError> {
        let row = sqlx::query("SELECT id, name FROM groups WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Group {
                id: row.get("id"),
                name: row.get("name"),
            }),
            None => Err(StoreError::group_not_found(id)),
        }
    }

    /// Applies a partial update and returns the merged record.
    ///
    /// Fails with `InvalidArgument` when the patch carries no id and with
    /// `NotFound` when the id does not resolve.
    pub async fn update_group(&self, patch: GroupPatch) -> Result<Group, StoreError> {
        let id = patch
            .id
            .ok_or_else(|| StoreError::InvalidArgument("group id missing".to_string()))?;

        let result = sqlx::query("UPDATE groups SET name = COALESCE(?, name) WHERE id = ?")
            .bind(&patch.name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::group_not_found(id));
        }

        self.get_group(id).await
    }

    /// Deletes a group and every document referencing it.
    ///
    /// Idempotent: deleting an absent id succeeds silently. The cascade and
    /// the group deletion commit in one transaction.
    pub async fn delete_group(&self, id: i64) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM documents WHERE group_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM groups WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Returns all documents of a group, each with the group attached.
    ///
    /// Fails with `NotFound` when the group does not exist, even if the
    /// result would be empty.
    pub async fn list_documents(&self, group_id: i64) -> Result<Vec<Document>, StoreError> {
        let group = self.get_group(group_id).await?;

        let rows = sqlx::query("SELECT id, group_id, title FROM documents WHERE group_id = ?")
            .bind(group_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| Document {
                id: row.get("id"),
                group_id: row.get("group_id"),
                title: row.get("title"),
                group: group.clone(),
            })
            .collect())
    }

    /// Persists a document under its caller-supplied id.
    ///
    /// Fails with `NotFound` when `group_id` does not resolve and with
    /// `Conflict` when the id is already taken.
    pub async fn add_document(&self, input: DocumentInput) -> Result<Document, StoreError> {
        let group = self.get_group(input.group_id).await?;

        let result = sqlx::query("INSERT INTO documents (id, group_id, title) VALUES (?, ?, ?)")
            .bind(&input.id)
            .bind(input.group_id)
            .bind(&input.title)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(Document {
                id: input.id,
                group_id: input.group_id,
                title: input.title,
                group,
            }),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Conflict { id: input.id })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fetches a document by id, with its owning group attached.
    pub async fn get_document(&self, id: &str) -> Result<Document, StoreError> {
        let row = sqlx::query("SELECT id, group_id, title FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let row = match row {
            Some(row) => row,
            None => return Err(StoreError::document_not_found(id)),
        };

        let group_id: i64 = row.get("group_id");
        // The group must exist; documents never outlive their group.
        let group = self.get_group(group_id).await?;

        Ok(Document {
            id: row.get("id"),
            group_id,
            title: row.get("title"),
            group,
        })
    }

    /// Updates a document, re-validating the (possibly changed) group first.
    ///
    /// All-or-nothing: when the new `group_id` does not resolve, the stored
    /// document is left entirely unmodified and `NotFound` is raised.
    pub async fn update_document(&self, patch: DocumentPatch) -> Result<Document, StoreError> {
        let group = self.get_group(patch.group_id).await?;

        let result = sqlx::query(
            "UPDATE documents SET group_id = ?, title = COALESCE(?, title) WHERE id = ?",
        )
        .bind(patch.group_id)
        .bind(&patch.title)
        .bind(&patch.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::document_not_found(&patch.id));
        }

        let row = sqlx::query("SELECT id, group_id, title FROM documents WHERE id = ?")
            .bind(&patch.id)
            .fetch_one(&self.pool)
            .await?;

        Ok(Document {
            id: row.get("id"),
            group_id: row.get("group_id"),
            title: row.get("title"),
            group,
        })
    }

    /// Deletes a document. Idempotent: absent ids succeed silently.
    pub async fn delete_document(&self, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Empties both tables. Documents go first to satisfy the foreign key.
    pub async fn clear_tables(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM documents").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM groups").execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(())
    }
}
