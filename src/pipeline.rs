//! Upload/index lifecycle orchestration.
//!
//! Drives a file from local selection to a fully indexed, queryable
//! server-side artifact:
//!
//! 1. **pending** — emitted once when the upload starts.
//! 2. **in_progress (transfer)** — progress percentages derived from
//!    transport events, clamped to non-decreasing.
//! 3. **in_progress (awaiting index)** — after the transfer resolves a
//!    [`SourceReference`], the status endpoint is polled on a fixed
//!    interval (first poll immediate); progress holds at 100.
//! 4. **done** — emitted exactly once when the server reports `indexed`;
//!    carries the [`Document`] persisted through the store.
//!
//! An `aborted` or `not found` poll status terminates the stream as
//! [`UploadError::Indexing`] instead of a false success. Cancelling the
//! handle (or dropping it) abandons in-flight requests at the next
//! suspension point and persists nothing.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::StoreError;
use crate::events::{InteractionAction, InteractionHub};
use crate::models::{Document, DocumentInput, SourceReference, SourceStatus, UploadState};
use crate::store::DocumentStore;
use crate::transport::{BinaryTransport, StatusTransport, TransferProgress};

/// Terminal failure of one upload invocation.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The upload or status transport failed; surfaced unchanged, no retry.
    #[error("transfer failed: {0}")]
    Transport(anyhow::Error),

    /// Polling observed a status that can no longer reach `indexed`.
    #[error("indexing failed with status '{0}'")]
    Indexing(SourceStatus),

    /// Persisting the document metadata failed (e.g. the group was deleted
    /// while the upload was running).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The caller cancelled the upload or abandoned the handle.
    #[error("upload cancelled")]
    Cancelled,
}

/// One file to upload and the document metadata to persist once indexed.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: PathBuf,
    /// Caller-generated document id (UUID or content-derived).
    pub document_id: String,
    pub group_id: i64,
    pub title: String,
}

/// Handle to a running upload.
///
/// Lifecycle records arrive through [`next_state`](UploadHandle::next_state);
/// the terminal outcome through [`finish`](UploadHandle::finish). Dropping
/// the handle cancels the upload.
pub struct UploadHandle {
    states: mpsc::Receiver<UploadState>,
    cancel: CancellationToken,
    task: JoinHandle<Result<Document, UploadError>>,
}

impl UploadHandle {
    /// Receives the next lifecycle record, or `None` once the stream has
    /// terminated (after `done` or a failure).
    pub async fn next_state(&mut self) -> Option<UploadState> {
        self.states.recv().await
    }

    /// Requests cooperative cancellation. In-flight transport calls are
    /// abandoned, not awaited, and no partial document is persisted.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the upload to finish and returns the persisted document.
    pub async fn finish(mut self) -> Result<Document, UploadError> {
        // Drain remaining lifecycle records so the worker never blocks on
        // a full channel.
        while self.states.recv().await.is_some() {}
        match self.task.await {
            Ok(result) => result,
            Err(_) => Err(UploadError::Cancelled),
        }
    }
}

/// Orchestrates uploads against one store and one pair of transports.
pub struct UploadPipeline {
    store: DocumentStore,
    transport: Arc<dyn BinaryTransport>,
    status: Arc<dyn StatusTransport>,
    poll_interval: Duration,
    interactions: InteractionHub<Document>,
}

impl UploadPipeline {
    pub fn new(
        store: DocumentStore,
        transport: Arc<dyn BinaryTransport>,
        status: Arc<dyn StatusTransport>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            store,
            transport,
            status,
            poll_interval,
            interactions: InteractionHub::new(),
        }
    }

    /// Interaction events for documents persisted by this pipeline.
    /// Multicast, replay-none.
    pub fn interactions(&self) -> &InteractionHub<Document> {
        &self.interactions
    }

    /// Starts an upload and returns its handle.
    ///
    /// Each invocation owns a private lifecycle stream; records are never
    /// shared between invocations.
    pub fn upload(&self, request: UploadRequest) -> UploadHandle {
        let (tx, rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();

        let worker = Worker {
            store: self.store.clone(),
            transport: Arc::clone(&self.transport),
            status: Arc::clone(&self.status),
            poll_interval: self.poll_interval,
            interactions: self.interactions.clone(),
            cancel: cancel.clone(),
            tx,
        };
        let task = tokio::spawn(worker.run(request));

        UploadHandle {
            states: rx,
            cancel,
            task,
        }
    }
}

struct Worker {
    store: DocumentStore,
    transport: Arc<dyn BinaryTransport>,
    status: Arc<dyn StatusTransport>,
    poll_interval: Duration,
    interactions: InteractionHub<Document>,
    cancel: CancellationToken,
    tx: mpsc::Sender<UploadState>,
}

impl Worker {
    async fn run(self, request: UploadRequest) -> Result<Document, UploadError> {
        self.emit(UploadState::pending()).await?;

        let reference = self.transfer(&request).await?;
        self.await_indexed(&reference.id).await?;

        if self.cancel.is_cancelled() {
            return Err(UploadError::Cancelled);
        }

        let document = self
            .store
            .add_document(DocumentInput {
                id: request.document_id,
                group_id: request.group_id,
                title: request.title,
            })
            .await?;

        self.emit(UploadState::done(document.clone())).await?;
        self.interactions
            .publish(InteractionAction::Created, document.clone());

        Ok(document)
    }

    /// Streams the file out, translating transport progress into clamped
    /// `in_progress` records, and resolves the content reference.
    async fn transfer(&self, request: &UploadRequest) -> Result<SourceReference, UploadError> {
        let (ptx, mut prx) = mpsc::channel::<TransferProgress>(32);
        let mut transfer = Box::pin(self.transport.send(&request.file, &[], ptx));

        let mut progress = 0u8;
        let mut progress_closed = false;

        let reference = loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return Err(UploadError::Cancelled),
                _ = self.tx.closed() => return Err(UploadError::Cancelled),
                result = &mut transfer => break result.map_err(UploadError::Transport)?,
                event = prx.recv(), if !progress_closed => {
                    match event {
                        Some(p) => self.emit_progress(&mut progress, p).await?,
                        None => progress_closed = true,
                    }
                }
            }
        };

        // Flush progress events buffered before the transport resolved
        while let Ok(p) = prx.try_recv() {
            self.emit_progress(&mut progress, p).await?;
        }

        // The transfer is complete even if the transport under-reported
        if progress < 100 {
            self.emit(UploadState::in_progress(100)).await?;
        }

        Ok(reference)
    }

    /// Polls the status endpoint until the source is indexed.
    async fn await_indexed(&self, reference_id: &str) -> Result<(), UploadError> {
        let mut ticker = tokio::time::interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return Err(UploadError::Cancelled),
                _ = self.tx.closed() => return Err(UploadError::Cancelled),
                _ = ticker.tick() => {}
            }

            let source = tokio::select! {
                _ = self.cancel.cancelled() => return Err(UploadError::Cancelled),
                _ = self.tx.closed() => return Err(UploadError::Cancelled),
                result = self.status.status(reference_id) => {
                    result.map_err(UploadError::Transport)?
                }
            };

            match source.status {
                status if status.is_in_progress() => {
                    self.emit(UploadState::in_progress(100)).await?;
                }
                SourceStatus::Indexed => return Ok(()),
                status => return Err(UploadError::Indexing(status)),
            }
        }
    }

    /// Emits one `in_progress` record, clamped to non-decreasing progress.
    /// Duplicate and out-of-order percentages are suppressed.
    async fn emit_progress(
        &self,
        current: &mut u8,
        event: TransferProgress,
    ) -> Result<(), UploadError> {
        let pct = if event.total > 0 {
            ((100 * event.loaded) / event.total).min(100) as u8
        } else {
            *current
        };

        if pct <= *current {
            return Ok(());
        }

        *current = pct;
        self.emit(UploadState::in_progress(pct)).await
    }

    async fn emit(&self, state: UploadState) -> Result<(), UploadError> {
        // A closed receiver means the caller abandoned the stream
        self.tx
            .send(state)
            .await
            .map_err(|_| UploadError::Cancelled)
    }
}
