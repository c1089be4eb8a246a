//! Pre-flight validation and lifecycle for document uploads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::UploadConfig;
use crate::error::{UploadError, UploadResult, ValidationError};
use crate::knowledge_base::KnowledgeBaseStore;
use crate::transport::{Transport, UploadFile, UploadSummary};

/// Extensions accepted for upload: document, word-processor, and
/// plain-text formats.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "md"];

/// Validates and sends upload batches, refreshing the knowledge base on
/// success.
///
/// A batch is all-or-nothing on both sides of the wire: the first
/// validation failure aborts it before any network call, and a valid
/// batch goes out as one multipart request. Only one upload may be in
/// flight at a time; a second call gets [`UploadError::Busy`] instead
/// of being queued.
pub struct UploadCoordinator {
    transport: Arc<dyn Transport>,
    store: Arc<KnowledgeBaseStore>,
    config: UploadConfig,
    in_flight: AtomicBool,
}

impl UploadCoordinator {
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<KnowledgeBaseStore>,
        config: UploadConfig,
    ) -> Self {
        Self {
            transport,
            store,
            config,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Validate and send one batch of files.
    ///
    /// On success the knowledge base has already been refreshed when
    /// this returns. A refresh failure after an accepted batch is not
    /// an upload failure; the documents are ingested and the next
    /// refresh will pick them up, so it is only logged.
    pub async fn upload(&self, files: Vec<UploadFile>) -> UploadResult<UploadSummary> {
        self.validate(&files)?;

        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(UploadError::Busy);
        }
        let result = self.send(files).await;
        self.in_flight.store(false, Ordering::Release);
        result
    }

    /// True while a batch is on the wire.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn validate(&self, files: &[UploadFile]) -> Result<(), ValidationError> {
        if files.is_empty() {
            return Err(ValidationError::EmptyBatch);
        }
        for file in files {
            let allowed = file
                .extension()
                .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
            if !allowed {
                return Err(ValidationError::DisallowedExtension {
                    file_name: file.file_name.clone(),
                });
            }
            let size_bytes = file.bytes.len() as u64;
            if size_bytes > self.config.max_file_bytes {
                return Err(ValidationError::FileTooLarge {
                    file_name: file.file_name.clone(),
                    size_bytes,
                    limit_bytes: self.config.max_file_bytes,
                });
            }
        }
        Ok(())
    }

    async fn send(&self, files: Vec<UploadFile>) -> UploadResult<UploadSummary> {
        let count = files.len();
        let summary = self.transport.upload_documents(files).await?;
        info!(files = count, "Upload batch ingested");

        if let Err(e) = self.store.refresh().await {
            warn!(error = %e, "Post-upload refresh failed; listing is stale until the next refresh");
        }
        Ok(summary)
    }
}
