use serde::{Deserialize, Serialize};

/// Response body of `GET /documents`.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentListing {
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
}

/// One document entry as the server reports it.
///
/// The backend has shipped two spellings of this record (`id`/`name`
/// from the listing endpoint, `doc_id`/`filename` from the raw metadata
/// store), so both are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRecord {
    #[serde(alias = "doc_id")]
    pub id: String,
    #[serde(alias = "filename")]
    pub name: String,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default, rename = "type")]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub chunk_count: Option<u32>,
}

/// A file staged for upload, already read into memory.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Lowercased extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_lowercase())
    }
}

/// Response body of `POST /upload`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadSummary {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub documents: Vec<IngestedDocument>,
}

/// Per-file ingestion acknowledgment inside an [`UploadSummary`].
#[derive(Debug, Clone, Deserialize)]
pub struct IngestedDocument {
    pub filename: String,
    pub document_id: String,
    #[serde(default)]
    pub chunks_count: Option<u32>,
}

/// Request body of `POST /chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Response body of `POST /chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub sources: Vec<SourceRecord>,
}

/// One retrieved passage backing a chat answer, as sent by the server.
///
/// `document_name` is optional here because malformed records are the
/// evidence formatter's problem, not a reason to fail the whole turn.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceRecord {
    #[serde(default)]
    pub document_name: Option<String>,
    #[serde(default)]
    pub chunk_text: String,
    #[serde(default)]
    pub score: f64,
}

/// Error body the server attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<String>,
}
