//! Ordered conversation transcript and per-turn lifecycle.
//!
//! The manager owns the transcript. Turns are append-only: a `submit`
//! call appends a complete user turn and a pending assistant turn
//! before any network activity, so transcript order always equals
//! submission order, whatever order the responses land in. Each pending
//! turn is resolved only by the response to its own request, correlated
//! by turn id.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ConversationError, TransportError};
use crate::evidence::{format_passages, Evidence};
use crate::transport::Transport;

/// Turn text shown when the chat request never reached the server.
pub const CONNECTIVITY_FAILURE_TEXT: &str =
    "Sorry, I cannot connect to the server right now. Please check if the backend is running and try again.";

/// Turn text shown when the server failed to answer the request.
pub const PROCESSING_FAILURE_TEXT: &str =
    "Sorry, I encountered an error while processing your request. Please try again.";

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// Turn typed by the user.
    User,
    /// Answer turn produced from a chat response.
    Assistant,
}

/// Lifecycle state of a turn. `Complete` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnStatus {
    /// Waiting on the network response.
    Pending,
    /// Answered; text and evidence are final.
    Complete,
    /// The request failed; text is the fixed user-safe message.
    Failed,
}

/// One entry in the transcript.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationTurn {
    /// Unique turn identifier.
    pub id: String,
    /// Who produced the turn.
    pub role: TurnRole,
    /// Displayed text. Empty while an assistant turn is pending.
    pub text: String,
    /// When the turn was appended.
    pub created_at: DateTime<Utc>,
    /// Lifecycle state.
    pub status: TurnStatus,
    /// Retrieved-passage evidence; only ever set on assistant turns.
    pub evidence: Vec<Evidence>,
    /// Underlying error detail of a `Failed` turn. Never shown as the
    /// turn text; kept for diagnostics.
    pub diagnostic: Option<String>,
}

impl ConversationTurn {
    fn new(role: TurnRole, text: String, status: TurnStatus) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            text,
            created_at: Utc::now(),
            status,
            evidence: Vec::new(),
            diagnostic: None,
        }
    }
}

/// Ids of the turn pair a `submit` call appended.
#[derive(Debug, Clone)]
pub struct TurnHandle {
    /// Id of the completed user turn.
    pub user_turn_id: String,
    /// Id of the companion assistant turn.
    pub assistant_turn_id: String,
}

/// Owner of the transcript.
///
/// Overlapping submissions are supported: each call appends its pair
/// immediately and independently, then awaits only its own request.
pub struct ConversationManager {
    transport: Arc<dyn Transport>,
    transcript: RwLock<Vec<ConversationTurn>>,
    revision: watch::Sender<u64>,
}

impl ConversationManager {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            transport,
            transcript: RwLock::new(Vec::new()),
            revision,
        }
    }

    /// Submit one question and drive it to a terminal state.
    ///
    /// Trimmed-empty input is rejected before anything is appended.
    /// Otherwise the user turn (already complete; its content is known
    /// in full at creation) and a pending assistant turn are appended
    /// synchronously, then exactly one chat request is issued carrying
    /// the submitted text. The request carries no prior history; every
    /// question is answered independently.
    pub async fn submit(&self, text: &str) -> Result<TurnHandle, ConversationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConversationError::EmptyInput);
        }

        let handle = self.append_pair(text);
        debug!(turn = %handle.assistant_turn_id, "Chat turn submitted");

        match self.transport.chat(text).await {
            Ok(reply) => {
                let evidence = format_passages(&reply.sources);
                info!(
                    turn = %handle.assistant_turn_id,
                    evidence = evidence.len(),
                    "Chat turn completed"
                );
                self.resolve(&handle.assistant_turn_id, |turn| {
                    turn.status = TurnStatus::Complete;
                    turn.text = reply.response;
                    turn.evidence = evidence;
                });
            }
            Err(e) => {
                warn!(turn = %handle.assistant_turn_id, error = %e, "Chat turn failed");
                let text = failure_text(&e);
                let diagnostic = e.to_string();
                self.resolve(&handle.assistant_turn_id, |turn| {
                    turn.status = TurnStatus::Failed;
                    turn.text = text.to_string();
                    turn.diagnostic = Some(diagnostic);
                });
            }
        }

        Ok(handle)
    }

    /// Ordered snapshot of the transcript.
    pub fn transcript(&self) -> Vec<ConversationTurn> {
        self.read_lock().clone()
    }

    /// Look up one turn by id.
    pub fn turn(&self, id: &str) -> Option<ConversationTurn> {
        self.read_lock().iter().find(|t| t.id == id).cloned()
    }

    /// Watch channel bumped on every transcript change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn append_pair(&self, text: &str) -> TurnHandle {
        let user_turn = ConversationTurn::new(TurnRole::User, text.to_string(), TurnStatus::Complete);
        let assistant_turn =
            ConversationTurn::new(TurnRole::Assistant, String::new(), TurnStatus::Pending);
        let handle = TurnHandle {
            user_turn_id: user_turn.id.clone(),
            assistant_turn_id: assistant_turn.id.clone(),
        };

        {
            let mut transcript = self.write_lock();
            transcript.push(user_turn);
            transcript.push(assistant_turn);
        }
        self.revision.send_modify(|rev| *rev += 1);
        handle
    }

    /// Apply a terminal transition to the identified turn. Terminal
    /// states are sticky: a turn that already left `Pending` is never
    /// touched again, whatever response arrives late.
    fn resolve(&self, turn_id: &str, apply: impl FnOnce(&mut ConversationTurn)) {
        {
            let mut transcript = self.write_lock();
            let Some(turn) = transcript.iter_mut().find(|t| t.id == turn_id) else {
                warn!(turn = %turn_id, "Response for unknown turn dropped");
                return;
            };
            if turn.status != TurnStatus::Pending {
                warn!(turn = %turn_id, status = ?turn.status, "Response for settled turn dropped");
                return;
            }
            apply(turn);
        }
        self.revision.send_modify(|rev| *rev += 1);
    }

    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, Vec<ConversationTurn>> {
        self.transcript
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, Vec<ConversationTurn>> {
        self.transcript
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Fixed user-safe text for a failed assistant turn.
fn failure_text(error: &TransportError) -> &'static str {
    if error.is_connectivity() {
        CONNECTIVITY_FAILURE_TEXT
    } else {
        PROCESSING_FAILURE_TEXT
    }
}
