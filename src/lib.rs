//! # docchat
//!
//! Client for a retrieval-augmented document-chat backend: upload
//! documents into a knowledge base, browse the listing, and ask
//! questions answered from those documents with retrieved-passage
//! evidence attached.
//!
//! Retrieval, embedding, chunking, and LLM inference live behind the
//! HTTP service this crate talks to; what lives here is the client-side
//! session core:
//!
//! - **Transport**: one HTTP call per operation, failures normalized
//!   into a uniform error taxonomy
//! - **Knowledge-Base Store**: the single owned document listing,
//!   atomically refreshed after every mutation
//! - **Upload Coordinator**: pre-flight validation and all-or-nothing
//!   multipart batches, one in flight at a time
//! - **Conversation Manager**: an append-only transcript whose turns
//!   move `Pending -> {Complete, Failed}` exactly once, with responses
//!   correlated to their own turns
//! - **Evidence Formatter**: display-ready truncated passages with
//!   untouched relevance scores
//!
//! ## Example
//!
//! ```ignore
//! use docchat::{AppState, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(Config::from_env()?)?;
//!     state.store.refresh().await?;
//!     let handle = state.conversation.submit("What is the main topic?").await?;
//!     let answer = state.conversation.turn(&handle.assistant_turn_id);
//!     println!("{:?}", answer);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Session wiring shared by the binary and tests.
pub mod app;
/// Configuration management for the client.
pub mod config;
/// Ordered conversation transcript and turn lifecycle.
pub mod conversation;
/// Error types and result aliases.
pub mod error;
/// Display-ready evidence derived from retrieved passages.
pub mod evidence;
/// Locally cached knowledge-base listing.
pub mod knowledge_base;
/// HTTP transport trait, wire types, and reqwest implementation.
pub mod transport;
/// Upload validation and lifecycle.
pub mod upload;

pub use app::AppState;
pub use config::Config;
pub use error::{AppError, AppResult};
