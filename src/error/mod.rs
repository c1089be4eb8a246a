use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Conversation error: {0}")]
    Conversation(#[from] ConversationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of a single HTTP call, normalized across operations.
///
/// Every transport operation resolves into exactly one of these classes:
/// the call never reached the server, the server answered non-2xx, or
/// the server answered 2xx with a body of the wrong shape.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Cannot reach the server: {message}")]
    NetworkUnavailable { message: String },

    #[error("Server error: {status}{}", .detail.as_deref().map(|d| format!(" - {d}")).unwrap_or_default())]
    Server { status: u16, detail: Option<String> },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },
}

impl TransportError {
    /// Message suitable for showing to an end user.
    ///
    /// `Server` detail is surfaced verbatim when the server supplied one;
    /// `MalformedResponse` renders as a server failure since the
    /// distinction only matters for diagnostics.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::NetworkUnavailable { .. } => {
                "Cannot connect to the server. Please check that the backend is running."
                    .to_string()
            }
            TransportError::Server {
                detail: Some(detail),
                ..
            } => detail.clone(),
            TransportError::Server { status, .. } => {
                format!("The server rejected the request (status {status}).")
            }
            TransportError::MalformedResponse { .. } => {
                "The server returned an unexpected response.".to_string()
            }
        }
    }

    /// True when the call never reached the server.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, TransportError::NetworkUnavailable { .. })
    }
}

/// Client-side pre-flight rejection of an upload batch.
///
/// These never produce a network call.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("File type not allowed: {file_name}")]
    DisallowedExtension { file_name: String },

    #[error("File too large: {file_name} ({size_bytes} bytes, limit {limit_bytes})")]
    FileTooLarge {
        file_name: String,
        size_bytes: u64,
        limit_bytes: u64,
    },

    #[error("No files to upload")]
    EmptyBatch,
}

/// Upload coordinator errors
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Another upload is already in progress")]
    Busy,

    #[error("Upload failed: {0}")]
    Transport(#[from] TransportError),
}

/// Conversation manager errors
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("Message is empty")]
    EmptyInput,
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type alias for upload operations
pub type UploadResult<T> = Result<T, UploadError>;
