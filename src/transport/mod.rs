//! HTTP transport for the document-chat backend.
//!
//! This module defines the [`Transport`] trait (one async method per
//! logical backend operation) and the production [`HttpTransport`]
//! implementation over reqwest. All failures are normalized into
//! [`TransportError`](crate::error::TransportError): the call never
//! reached the server, the server answered non-2xx, or the 2xx body did
//! not parse.

mod http;
mod types;

pub use http::HttpTransport;
pub use types::{
    ChatReply, ChatRequest, DocumentListing, DocumentRecord, ErrorBody, IngestedDocument,
    SourceRecord, UploadFile, UploadSummary,
};

use async_trait::async_trait;

use crate::error::TransportResult;

/// Backend operations, one outbound call each.
///
/// Implementations are stateless and reentrant; concurrent calls are
/// independent. Everything above the transport (store, uploads,
/// conversation) talks to the backend through this trait, which is what
/// unit tests mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the authoritative knowledge-base listing.
    async fn list_documents(&self) -> TransportResult<DocumentListing>;

    /// Send a validated batch of files as a single multipart request.
    async fn upload_documents(&self, files: Vec<UploadFile>) -> TransportResult<UploadSummary>;

    /// Request server-side deletion of one document.
    async fn delete_document(&self, id: &str) -> TransportResult<()>;

    /// Submit one chat turn and receive the whole answer.
    async fn chat(&self, message: &str) -> TransportResult<ChatReply>;
}
