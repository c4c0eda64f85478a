#![forbid(unsafe_code)]

//! AI chunk lifecycle.
//!
//! ```text
//! (no chunk) ──convert──▶ Pending ──resolve / flip──▶ Resolved (terminal)
//!                            │
//!                            └──────unwind──────▶ (no chunk, text restored)
//! ```
//!
//! Every transition after `convert` looks the chunk up by id at the moment
//! of mutation. Nothing about its position is carried across the request.
//! Only `Pending` chunks are eligible, so a second completion for the same
//! id (or one whose chunk the user deleted) is a no-op reported as
//! [`ChunkOutcome::TargetMissing`].

use std::sync::atomic::{AtomicU64, Ordering};

use web_time::{SystemTime, UNIX_EPOCH};

use crate::document::Document;
use crate::error::ChunkError;
use crate::node::{ChunkKind, ElementKind, Marks, Node, NodeId, NodeSpec};
use crate::selection::{Path, Selection};

/// Prefix of every generated chunk id.
pub const CHUNK_ID_PREFIX: &str = "chunk_";

/// Generates `chunk_<millis>` ids that never repeat within a process, even
/// when several are requested in the same millisecond.
#[derive(Debug, Default)]
pub struct ChunkIdGenerator {
    last: AtomicU64,
}

impl ChunkIdGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Next id, based on the wall clock.
    pub fn next_id(&self) -> String {
        self.next_at(now_millis())
    }

    /// Next id for a given clock reading. Bumps past the previous id when the
    /// clock stalls or goes backwards.
    pub fn next_at(&self, millis: u64) -> String {
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = millis.max(current + 1);
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return format!("{CHUNK_ID_PREFIX}{candidate}"),
                Err(observed) => current = observed,
            }
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

static GLOBAL_IDS: ChunkIdGenerator = ChunkIdGenerator::new();

/// Next chunk id from the process-wide generator.
pub fn next_chunk_id() -> String {
    GLOBAL_IDS.next_id()
}

/// What `convert` captured from the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChunk {
    pub chunk_id: String,
    pub selected_text: String,
    /// Formatting of the first selected text run.
    pub marks: Marks,
}

/// Result of a post-request transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// The pending chunk was replaced by a resolved one.
    Resolved { chunk_id: String, path: Path },
    /// The pending chunk was turned into a resolved one in place.
    Flipped { chunk_id: String, path: Path },
    /// The request failed and the original text is back.
    Unwound { chunk_id: String, message: String },
    /// No pending chunk with this id exists any more.
    TargetMissing { chunk_id: String },
}

impl ChunkOutcome {
    #[must_use]
    pub fn chunk_id(&self) -> &str {
        match self {
            Self::Resolved { chunk_id, .. }
            | Self::Flipped { chunk_id, .. }
            | Self::Unwound { chunk_id, .. }
            | Self::TargetMissing { chunk_id } => chunk_id,
        }
    }

    /// Message for a transient notice, if the user should see one.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        match self {
            Self::Unwound { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Current path of the pending chunk `chunk_id`.
#[must_use]
pub fn locate_pending(doc: &Document, chunk_id: &str) -> Option<(NodeId, Path)> {
    let id = doc.find_chunk(chunk_id, Some(ChunkKind::Pending))?;
    let path = doc.path_of(id)?;
    Some((id, path))
}

/// Ids of all chunks of `kind`, in document order.
#[must_use]
pub fn chunk_ids(doc: &Document, kind: ChunkKind) -> Vec<String> {
    doc.find_nodes(|n| n.chunk().is_some_and(|(k, _)| k == kind))
        .into_iter()
        .filter_map(|id| doc.node(id).and_then(Node::chunk).map(|(_, c)| c.to_owned()))
        .collect()
}

fn first_run_marks(doc: &Document, chunk: NodeId) -> Marks {
    doc.node(chunk)
        .and_then(|n| n.children().first().copied())
        .and_then(|c| doc.node(c))
        .and_then(Node::text)
        .map(|(_, marks)| marks.clone())
        .unwrap_or_default()
}

/// Wrap the selection in a new pending chunk.
pub fn convert(doc: &mut Document, selection: &Selection) -> Result<PendingChunk, ChunkError> {
    convert_with(doc, selection, &GLOBAL_IDS)
}

/// [`convert`] with an explicit id generator.
pub fn convert_with(
    doc: &mut Document,
    selection: &Selection,
    ids: &ChunkIdGenerator,
) -> Result<PendingChunk, ChunkError> {
    let selected_text = doc.selection_text(selection)?;
    let marks = doc.selection_marks(selection)?;
    let chunk_id = ids.next_id();
    doc.wrap_selection(selection, ElementKind::pending(chunk_id.as_str()))?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        target: "flashdeck.chunk",
        chunk_id = %chunk_id,
        chars = selected_text.chars().count(),
        "chunk pending"
    );

    Ok(PendingChunk {
        chunk_id,
        selected_text,
        marks,
    })
}

fn missing(chunk_id: &str) -> ChunkOutcome {
    #[cfg(feature = "tracing")]
    tracing::debug!(target: "flashdeck.chunk", chunk_id, "chunk target missing");
    ChunkOutcome::TargetMissing {
        chunk_id: chunk_id.to_owned(),
    }
}

/// Replace the pending chunk with a resolved chunk holding `content`.
///
/// The resolved node keeps the id and the formatting of the first wrapped
/// run, and lands at the pending node's current path.
pub fn resolve(doc: &mut Document, chunk_id: &str, content: &str) -> ChunkOutcome {
    let Some((id, path)) = locate_pending(doc, chunk_id) else {
        return missing(chunk_id);
    };
    let marks = first_run_marks(doc, id);
    let resolved = NodeSpec::chunk(
        ChunkKind::Resolved,
        chunk_id,
        vec![NodeSpec::styled(content, marks)],
    );
    // Insert before removing so a refused insert leaves the pending text.
    if doc.insert_node(&path, resolved).is_err() {
        return missing(chunk_id);
    }
    let mut pending_path = path.clone();
    if let Some(last) = pending_path.last_mut() {
        *last += 1;
    }
    if doc.remove_node(&pending_path).is_none() {
        doc.remove_node(&path);
        return missing(chunk_id);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(target: "flashdeck.chunk", chunk_id, ?path, "chunk resolved");

    ChunkOutcome::Resolved {
        chunk_id: chunk_id.to_owned(),
        path,
    }
}

/// Flip the pending chunk to resolved in place and replace its text.
pub fn flip_resolved(doc: &mut Document, chunk_id: &str, content: &str) -> ChunkOutcome {
    let Some((id, path)) = locate_pending(doc, chunk_id) else {
        return missing(chunk_id);
    };
    let marks = first_run_marks(doc, id);
    if doc
        .set_node_properties(&path, ElementKind::resolved(chunk_id))
        .is_err()
        || doc.replace_text(id, content, marks).is_err()
    {
        return missing(chunk_id);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(target: "flashdeck.chunk", chunk_id, ?path, "chunk flipped");

    ChunkOutcome::Flipped {
        chunk_id: chunk_id.to_owned(),
        path,
    }
}

/// Put the originally wrapped text back and drop the pending chunk.
pub fn unwind(doc: &mut Document, chunk_id: &str, message: impl Into<String>) -> ChunkOutcome {
    let Some((_, path)) = locate_pending(doc, chunk_id) else {
        return missing(chunk_id);
    };
    if doc.unwrap_node(&path).is_err() {
        return missing(chunk_id);
    }
    let message = message.into();

    #[cfg(feature = "tracing")]
    tracing::info!(target: "flashdeck.chunk", chunk_id, %message, "chunk unwound");

    ChunkOutcome::Unwound {
        chunk_id: chunk_id.to_owned(),
        message,
    }
}
