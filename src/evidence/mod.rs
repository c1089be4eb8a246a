//! Display-ready evidence derived from retrieved passages.

use serde::Serialize;
use tracing::warn;

use crate::transport::SourceRecord;

/// Passage text longer than this is cut for display.
pub const PASSAGE_DISPLAY_LIMIT: usize = 200;

const ELLIPSIS: &str = "...";

/// One retrieved passage backing an assistant answer, ready to render.
///
/// `relevance_score` is the server's score untouched; presentation may
/// round or invert it but the stored value never changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evidence {
    /// Name of the document the passage came from.
    pub source_document_name: String,
    /// Passage text, truncated for display.
    pub passage_text: String,
    /// The server's score in `[0, 1]`, untransformed.
    pub relevance_score: f64,
}

/// Map raw passage records into display-ready evidence.
///
/// Records with a missing or empty document name are dropped rather
/// than failing the turn they belong to.
pub fn format_passages(sources: &[SourceRecord]) -> Vec<Evidence> {
    sources
        .iter()
        .filter_map(|source| match source.document_name.as_deref() {
            Some(name) if !name.trim().is_empty() => Some(Evidence {
                source_document_name: name.to_string(),
                passage_text: truncate_passage(&source.chunk_text),
                relevance_score: source.score,
            }),
            _ => {
                warn!("Dropping retrieved passage without a document name");
                None
            }
        })
        .collect()
}

/// Cut passage text to [`PASSAGE_DISPLAY_LIMIT`] characters, appending
/// an ellipsis when anything was removed. Counted in characters, not
/// bytes, so multibyte text never splits mid-codepoint.
fn truncate_passage(text: &str) -> String {
    match text.char_indices().nth(PASSAGE_DISPLAY_LIMIT) {
        Some((byte_offset, _)) => format!("{}{ELLIPSIS}", &text[..byte_offset]),
        None => text.to_string(),
    }
}
