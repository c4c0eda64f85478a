#![forbid(unsafe_code)]

//! Selection-to-AI round trip.
//!
//! An assist is split in two so the request can run anywhere:
//!
//! 1. [`begin`] wraps the selection in a pending chunk and builds the
//!    completion request.
//! 2. [`finish`] applies the service's answer to whatever the document looks
//!    like by then.
//!
//! The document may be edited freely between the two calls; `finish` locates
//! the chunk by id. [`run_blocking`] chains both for callers without a worker.

use flashdeck_ai::{
    CompletionRequest, CompletionResponse, CompletionService, ContextMode, RequestFailed, Target,
};

use crate::chunk::{self, ChunkIdGenerator, ChunkOutcome, PendingChunk};
use crate::document::Document;
use crate::error::ChunkError;
use crate::selection::Selection;

/// What happens to the chunk once the answer arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssistMode {
    /// Remove the pending chunk and insert a resolved one at its path.
    #[default]
    Replace,
    /// Keep the node, flip it to resolved and swap its text.
    ExplainInPlace,
}

/// Per-assist request settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistOptions {
    pub model: String,
    pub context: ContextMode,
    pub target: Target,
    pub mode: AssistMode,
}

impl AssistOptions {
    /// Card-scoped assist with focused context.
    #[must_use]
    pub fn for_card(card_id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            context: ContextMode::Focused,
            target: Target::Card(card_id.into()),
            mode: AssistMode::Replace,
        }
    }

    #[must_use]
    pub fn context(mut self, context: ContextMode) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: AssistMode) -> Self {
        self.mode = mode;
        self
    }
}

/// An assist waiting for its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAssist {
    pub chunk: PendingChunk,
    pub request: CompletionRequest,
    pub mode: AssistMode,
}

impl PendingAssist {
    #[must_use]
    pub fn chunk_id(&self) -> &str {
        &self.chunk.chunk_id
    }
}

/// Wrap the selection in a pending chunk and build its request.
pub fn begin(
    doc: &mut Document,
    selection: &Selection,
    options: &AssistOptions,
) -> Result<PendingAssist, ChunkError> {
    let chunk = chunk::convert(doc, selection)?;
    Ok(prepare(chunk, options))
}

/// [`begin`] with an explicit chunk id generator.
pub fn begin_with(
    doc: &mut Document,
    selection: &Selection,
    options: &AssistOptions,
    ids: &ChunkIdGenerator,
) -> Result<PendingAssist, ChunkError> {
    let chunk = chunk::convert_with(doc, selection, ids)?;
    Ok(prepare(chunk, options))
}

fn prepare(chunk: PendingChunk, options: &AssistOptions) -> PendingAssist {
    let request = CompletionRequest::new(
        chunk.selected_text.as_str(),
        options.model.as_str(),
        options.target.clone(),
        options.context,
    );
    PendingAssist {
        chunk,
        request,
        mode: options.mode,
    }
}

/// Apply the completion result to the pending chunk.
///
/// Success resolves (or flips) the chunk; failure unwinds it and carries the
/// message for a transient notice. A chunk that has since been deleted yields
/// [`ChunkOutcome::TargetMissing`] and leaves the document alone.
pub fn finish(
    doc: &mut Document,
    pending: &PendingAssist,
    result: Result<CompletionResponse, RequestFailed>,
) -> ChunkOutcome {
    let chunk_id = pending.chunk_id();
    match result {
        Ok(response) => match pending.mode {
            AssistMode::Replace => chunk::resolve(doc, chunk_id, &response.content),
            AssistMode::ExplainInPlace => chunk::flip_resolved(doc, chunk_id, &response.content),
        },
        Err(err) => chunk::unwind(doc, chunk_id, err.message()),
    }
}

/// Convert, ask `service`, and apply the answer in one call.
pub fn run_blocking<S>(
    doc: &mut Document,
    selection: &Selection,
    options: &AssistOptions,
    service: &S,
) -> Result<ChunkOutcome, ChunkError>
where
    S: CompletionService + ?Sized,
{
    let pending = begin(doc, selection, options)?;
    let result = service.complete(&pending.request);
    Ok(finish(doc, &pending, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ChunkKind, NodeSpec};

    struct Fixed(Result<&'static str, &'static str>);

    impl CompletionService for Fixed {
        fn complete(&self, _: &CompletionRequest) -> Result<CompletionResponse, RequestFailed> {
            match self.0 {
                Ok(content) => Ok(CompletionResponse {
                    content: content.to_owned(),
                    conversation_id: "conv-1".to_owned(),
                }),
                Err(message) => Err(RequestFailed::Service {
                    message: message.to_owned(),
                }),
            }
        }
    }

    fn doc() -> Document {
        Document::from_blocks(vec![NodeSpec::paragraph(vec![NodeSpec::text(
            "Explain photosynthesis please",
        )])])
        .expect("valid")
    }

    #[test]
    fn begin_builds_request_from_selection() {
        let mut d = doc();
        let opts = AssistOptions::for_card("card-7", "m").context(ContextMode::Broad);
        let pending = begin(&mut d, &Selection::in_text(vec![0, 0], 8, 22), &opts).expect("ok");
        assert_eq!(pending.request.content, "photosynthesis");
        assert_eq!(pending.request.card_id.as_deref(), Some("card-7"));
        assert_eq!(pending.request.mode, Some("broad"));
        assert_eq!(chunk::chunk_ids(&d, ChunkKind::Pending), vec![pending.chunk.chunk_id.clone()]);
    }

    #[test]
    fn explain_in_place_keeps_node() {
        let mut d = doc();
        let opts = AssistOptions::for_card("c", "m").mode(AssistMode::ExplainInPlace);
        let pending = begin(&mut d, &Selection::in_text(vec![0, 0], 8, 22), &opts).expect("ok");
        let before = d.find_chunk(pending.chunk_id(), None).expect("chunk");
        let outcome = finish(
            &mut d,
            &pending,
            Fixed(Ok("light to sugar")).complete(&pending.request),
        );
        assert!(matches!(outcome, ChunkOutcome::Flipped { .. }));
        assert_eq!(d.find_chunk(pending.chunk_id(), Some(ChunkKind::Resolved)), Some(before));
        assert_eq!(d.plain_text(), "Explain light to sugar please");
    }

    #[test]
    fn run_blocking_failure_unwinds() {
        let mut d = doc();
        let opts = AssistOptions::for_card("c", "m");
        let outcome = run_blocking(
            &mut d,
            &Selection::in_text(vec![0, 0], 8, 22),
            &opts,
            &Fixed(Err("quota exceeded")),
        )
        .expect("converted");
        assert_eq!(outcome.notice(), Some("quota exceeded"));
        assert_eq!(d.plain_text(), "Explain photosynthesis please");
        assert!(chunk::chunk_ids(&d, ChunkKind::Pending).is_empty());
    }

    #[test]
    fn collapsed_selection_declines() {
        let mut d = doc();
        let err = run_blocking(
            &mut d,
            &Selection::in_text(vec![0, 0], 3, 3),
            &AssistOptions::for_card("c", "m"),
            &Fixed(Ok("x")),
        )
        .expect_err("collapsed");
        assert!(matches!(err, ChunkError::InvalidSelection(_)));
        assert_eq!(d.node_count(), doc().node_count());
    }
}
