//! Integration tests for the HTTP transport
//!
//! Tests request/response behavior against a wiremock backend.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use docchat::config::ApiConfig;
use docchat::error::TransportError;
use docchat::transport::{HttpTransport, Transport, UploadFile};

fn create_transport(base_url: &str) -> HttpTransport {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_ms: Some(5000),
    };
    HttpTransport::new(&config).expect("Failed to create transport")
}

mod list_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_documents_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "documents": [
                    {"id": "d1", "name": "report.pdf", "upload_date": "2024-05-01T10:00:00", "size": 2048},
                    {"id": "d2", "name": "notes.txt", "upload_date": "2024-05-02T09:30:00"}
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = create_transport(&mock_server.uri());
        let listing = transport.list_documents().await.unwrap();

        assert_eq!(listing.documents.len(), 2);
        assert_eq!(listing.documents[0].id, "d1");
        assert_eq!(listing.documents[0].name, "report.pdf");
        assert_eq!(listing.documents[0].size, Some(2048));
        assert_eq!(listing.documents[1].size, None);
    }

    #[tokio::test]
    async fn test_list_documents_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
            .mount(&mock_server)
            .await;

        let transport = create_transport(&mock_server.uri());
        let err = transport.list_documents().await.unwrap_err();

        assert!(matches!(err, TransportError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_list_documents_server_error_with_detail() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/documents"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"detail": "vector store unavailable"})),
            )
            .mount(&mock_server)
            .await;

        let transport = create_transport(&mock_server.uri());
        let err = transport.list_documents().await.unwrap_err();

        match err {
            TransportError::Server { status, detail } => {
                assert_eq!(status, 500);
                assert_eq!(detail.as_deref(), Some("vector store unavailable"));
            }
            other => panic!("Expected Server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_unavailable() {
        // Nothing listens here.
        let transport = create_transport("http://127.0.0.1:1");
        let err = transport.list_documents().await.unwrap_err();

        assert!(err.is_connectivity(), "got {err:?}");
    }
}

mod chat_tests {
    use super::*;

    #[tokio::test]
    async fn test_chat_success_with_sources() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({"message": "What is the main topic?"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "It is X.",
                "sources": [
                    {"document_name": "a.pdf", "chunk_text": "the main topic is X", "score": 0.2}
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = create_transport(&mock_server.uri());
        let reply = transport.chat("What is the main topic?").await.unwrap();

        assert_eq!(reply.response, "It is X.");
        assert_eq!(reply.sources.len(), 1);
        assert_eq!(reply.sources[0].document_name.as_deref(), Some("a.pdf"));
        assert!((reply.sources[0].score - 0.2).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_chat_success_without_sources() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "I do not have documents to answer from."
            })))
            .mount(&mock_server)
            .await;

        let transport = create_transport(&mock_server.uri());
        let reply = transport.chat("anything").await.unwrap();

        assert!(reply.sources.is_empty());
    }

    #[tokio::test]
    async fn test_chat_server_error_without_detail() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&mock_server)
            .await;

        let transport = create_transport(&mock_server.uri());
        let err = transport.chat("hi").await.unwrap_err();

        match err {
            TransportError::Server { status, detail } => {
                assert_eq!(status, 502);
                assert!(detail.is_none());
            }
            other => panic!("Expected Server error, got {other:?}"),
        }
    }
}

mod delete_tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_success_with_summary_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/documents/d1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"message": "Document deleted successfully"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = create_transport(&mock_server.uri());
        assert!(transport.delete_document("d1").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_success_with_empty_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/documents/d1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let transport = create_transport(&mock_server.uri());
        assert!(transport.delete_document("d1").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_not_found_surfaces_detail() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/documents/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Document not found"})))
            .mount(&mock_server)
            .await;

        let transport = create_transport(&mock_server.uri());
        let err = transport.delete_document("missing").await.unwrap_err();

        assert_eq!(err.user_message(), "Document not found");
    }
}

mod upload_tests {
    use super::*;
    use wiremock::matchers::header_exists;

    #[tokio::test]
    async fn test_upload_sends_one_multipart_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/upload"))
            .and(header_exists("content-type"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Documents processed successfully",
                "documents": [
                    {"filename": "a.pdf", "document_id": "d1", "chunks_count": 4},
                    {"filename": "b.txt", "document_id": "d2", "chunks_count": 1}
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = create_transport(&mock_server.uri());
        let files = vec![
            UploadFile::new("a.pdf", b"%PDF-1.4 fake".to_vec()),
            UploadFile::new("b.txt", b"plain text".to_vec()),
        ];
        let summary = transport.upload_documents(files).await.unwrap();

        assert_eq!(summary.documents.len(), 2);
        assert_eq!(summary.documents[0].document_id, "d1");
        assert_eq!(summary.documents[1].chunks_count, Some(1));
    }

    #[tokio::test]
    async fn test_upload_rejected_batch_surfaces_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "ingestion failed"})))
            .mount(&mock_server)
            .await;

        let transport = create_transport(&mock_server.uri());
        let err = transport
            .upload_documents(vec![UploadFile::new("a.pdf", vec![1, 2, 3])])
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Server { status: 500, .. }));
    }
}
