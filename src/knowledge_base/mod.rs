//! Locally cached view of the server-side knowledge base.
//!
//! The store owns the only copy of the document listing. Every mutation
//! (refresh, remove, post-upload refresh) goes through it, so consumers
//! never drift apart on what "the documents" are. Readers get an `Arc`
//! snapshot; replacement is atomic, so a reader holds either the old
//! listing or the new one, never a partial mix.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::TransportResult;
use crate::transport::{DocumentRecord, Transport};

/// One document as the client knows it.
///
/// Created on upload acknowledgment, destroyed on delete
/// acknowledgment, immutable in between. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Server-assigned opaque identifier.
    pub id: String,
    /// File name shown to the user.
    pub display_name: String,
    /// `None` when the server sent no date or one we cannot parse.
    pub uploaded_at: Option<DateTime<Utc>>,
    /// Size on upload, when the server reports it.
    pub size_bytes: Option<u64>,
    /// Number of ingested chunks, when the server reports it.
    pub chunk_count: Option<u32>,
}

impl From<DocumentRecord> for Document {
    fn from(record: DocumentRecord) -> Self {
        let uploaded_at = record.upload_date.as_deref().and_then(parse_upload_date);
        if record.upload_date.is_some() && uploaded_at.is_none() {
            warn!(id = %record.id, "Unparseable upload_date on document record");
        }
        Self {
            id: record.id,
            display_name: record.name,
            uploaded_at,
            size_bytes: record.size,
            chunk_count: record.chunk_count,
        }
    }
}

/// The server emits either RFC 3339 or a naive ISO timestamp; naive
/// values are taken as UTC.
fn parse_upload_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Owner of the cached document listing.
pub struct KnowledgeBaseStore {
    transport: Arc<dyn Transport>,
    snapshot: RwLock<Arc<Vec<Document>>>,
    revision: watch::Sender<u64>,
}

impl KnowledgeBaseStore {
    /// Create an empty store; call [`refresh`](Self::refresh) to populate it.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            transport,
            snapshot: RwLock::new(Arc::new(Vec::new())),
            revision,
        }
    }

    /// Fetch the authoritative listing and replace the snapshot.
    ///
    /// The new listing is assembled in full before the swap; on any
    /// failure the previous snapshot stays in place untouched.
    pub async fn refresh(&self) -> TransportResult<()> {
        let listing = self.transport.list_documents().await?;
        let documents: Vec<Document> = listing.documents.into_iter().map(Document::from).collect();

        info!(documents = documents.len(), "Knowledge base refreshed");
        self.replace(documents);
        Ok(())
    }

    /// Current documents in server-provided order.
    ///
    /// The order is display order only, not an identity guarantee.
    pub fn snapshot(&self) -> Arc<Vec<Document>> {
        self.snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Request server-side deletion, then re-sync from the server.
    ///
    /// No optimistic removal: a failed delete leaves the snapshot
    /// exactly as it was and the error goes to the caller.
    pub async fn remove(&self, id: &str) -> TransportResult<()> {
        self.transport.delete_document(id).await?;
        self.refresh().await
    }

    /// Watch channel that observes a bump on every snapshot replacement.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn replace(&self, documents: Vec<Document>) {
        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(documents);
        drop(guard);
        self.revision.send_modify(|rev| *rev += 1);
    }
}
