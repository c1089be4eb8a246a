use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use super::types::{ChatReply, ChatRequest, DocumentListing, ErrorBody, UploadFile, UploadSummary};
use super::Transport;
use crate::config::ApiConfig;
use crate::error::{AppError, TransportError, TransportResult};

/// Production [`Transport`] over reqwest.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport against the configured base endpoint.
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let client = builder.build().map_err(|e| AppError::Config {
            message: format!("Failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base endpoint this transport talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Classify a reqwest failure: anything that kept the request from
    /// producing a response means the server was never reached.
    fn classify_send_error(err: reqwest::Error) -> TransportError {
        TransportError::NetworkUnavailable {
            message: err.to_string(),
        }
    }

    /// Turn a non-2xx response into a `Server` error, pulling the
    /// `{detail}` field out of the body when the server sent one.
    async fn server_error(status: StatusCode, response: Response) -> TransportError {
        let detail = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
            .and_then(|body| body.detail);

        TransportError::Server {
            status: status.as_u16(),
            detail,
        }
    }

    async fn read_json<T: DeserializeOwned>(
        operation: &str,
        response: Response,
    ) -> TransportResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::server_error(status, response).await);
        }

        response
            .json()
            .await
            .map_err(|e| TransportError::MalformedResponse {
                message: format!("Failed to parse {operation} response: {e}"),
            })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn list_documents(&self) -> TransportResult<DocumentListing> {
        debug!("Fetching document listing");
        let start = Instant::now();

        let response = self
            .client
            .get(self.url("/documents"))
            .send()
            .await
            .map_err(Self::classify_send_error)?;

        let listing: DocumentListing = Self::read_json("listing", response).await?;
        info!(
            documents = listing.documents.len(),
            latency_ms = start.elapsed().as_millis(),
            "Document listing fetched"
        );
        Ok(listing)
    }

    async fn upload_documents(&self, files: Vec<UploadFile>) -> TransportResult<UploadSummary> {
        debug!(files = files.len(), "Uploading document batch");
        let start = Instant::now();

        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str("application/octet-stream")
                .map_err(|e| TransportError::NetworkUnavailable {
                    message: format!("Failed to assemble multipart body: {e}"),
                })?;
            form = form.part("files", part);
        }

        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(Self::classify_send_error)?;

        let summary: UploadSummary = Self::read_json("upload", response).await?;
        info!(
            accepted = summary.documents.len(),
            latency_ms = start.elapsed().as_millis(),
            "Upload batch accepted"
        );
        Ok(summary)
    }

    async fn delete_document(&self, id: &str) -> TransportResult<()> {
        debug!(id = %id, "Deleting document");

        let response = self
            .client
            .delete(self.url(&format!("/documents/{id}")))
            .send()
            .await
            .map_err(Self::classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let err = Self::server_error(status, response).await;
            error!(id = %id, error = %err, "Document deletion rejected");
            return Err(err);
        }

        // Body is empty or a summary we do not need.
        info!(id = %id, "Document deleted");
        Ok(())
    }

    async fn chat(&self, message: &str) -> TransportResult<ChatReply> {
        debug!(chars = message.len(), "Submitting chat turn");
        let start = Instant::now();

        let response = self
            .client
            .post(self.url("/chat"))
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await
            .map_err(Self::classify_send_error)?;

        let reply: ChatReply = Self::read_json("chat", response).await?;
        info!(
            sources = reply.sources.len(),
            latency_ms = start.elapsed().as_millis(),
            "Chat turn answered"
        );
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ApiConfig {
            base_url: "http://localhost:8001/".to_string(),
            timeout_ms: None,
        };
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8001");
        assert_eq!(transport.url("/documents"), "http://localhost:8001/documents");
    }

    #[test]
    fn test_transport_creation_with_timeout() {
        let config = ApiConfig {
            base_url: "http://localhost:8001".to_string(),
            timeout_ms: Some(5000),
        };
        assert!(HttpTransport::new(&config).is_ok());
    }
}
