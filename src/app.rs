//! Shared wiring for the client session.

use std::sync::Arc;

use crate::config::Config;
use crate::conversation::ConversationManager;
use crate::error::AppError;
use crate::knowledge_base::KnowledgeBaseStore;
use crate::transport::{HttpTransport, Transport};
use crate::upload::UploadCoordinator;

/// One client session: a single transport shared by the single owned
/// knowledge-base store, the upload coordinator, and the conversation
/// manager. Consumers are injected with these instances rather than
/// fetching their own copies, so two views can never drift apart on
/// document state.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// The single owned knowledge-base listing.
    pub store: Arc<KnowledgeBaseStore>,
    /// Upload validation and lifecycle.
    pub uploads: UploadCoordinator,
    /// Conversation transcript owner.
    pub conversation: ConversationManager,
}

impl AppState {
    /// Build a session against the configured backend.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config.api)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Build a session around an existing transport (tests inject
    /// fakes here).
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        let store = Arc::new(KnowledgeBaseStore::new(transport.clone()));
        let uploads =
            UploadCoordinator::new(transport.clone(), store.clone(), config.upload.clone());
        let conversation = ConversationManager::new(transport);

        Self {
            config,
            store,
            uploads,
            conversation,
        }
    }
}
