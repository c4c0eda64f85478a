//! End-to-end chunk conversions against a scripted completion service.

use std::sync::mpsc;
use std::thread;

use flashdeck_ai::{CompletionRequest, CompletionResponse, CompletionService, RequestFailed, TransportError};
use flashdeck_editor::assist::{self, AssistMode, AssistOptions};
use flashdeck_editor::chunk::{self, ChunkOutcome};
use flashdeck_editor::{ChunkError, ChunkKind, Document, NodeSpec, Selection, SelectionError};
use pretty_assertions::assert_eq;

struct Echo;

impl CompletionService for Echo {
    fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, RequestFailed> {
        Ok(CompletionResponse {
            content: request.content.to_uppercase(),
            conversation_id: "conv-echo".to_owned(),
        })
    }
}

struct Offline;

impl CompletionService for Offline {
    fn complete(&self, _: &CompletionRequest) -> Result<CompletionResponse, RequestFailed> {
        Err(TransportError::Network("connection refused".to_owned()).into())
    }
}

fn paragraph(text: &str) -> Document {
    Document::from_blocks(vec![NodeSpec::paragraph(vec![NodeSpec::text(text)])]).expect("valid")
}

fn count(doc: &Document, kind: ChunkKind) -> usize {
    chunk::chunk_ids(doc, kind).len()
}

#[test]
fn photosynthesis_resolves() {
    let mut doc = paragraph("photosynthesis");
    let selection = Selection::in_text(vec![0, 0], 0, 14);

    let pending = chunk::convert(&mut doc, &selection).expect("convert");
    assert_eq!(pending.selected_text, "photosynthesis");
    assert_eq!(count(&doc, ChunkKind::Pending), 1);
    let id = doc.find_chunk(&pending.chunk_id, Some(ChunkKind::Pending)).expect("pending");
    assert_eq!(doc.text_of(id), "photosynthesis");

    let outcome = chunk::resolve(&mut doc, &pending.chunk_id, "X");
    assert!(matches!(outcome, ChunkOutcome::Resolved { ref path, .. } if path == &vec![0, 0]));
    assert_eq!(count(&doc, ChunkKind::Pending), 0);
    let resolved = doc
        .find_chunk(&pending.chunk_id, Some(ChunkKind::Resolved))
        .expect("resolved");
    assert_eq!(doc.text_of(resolved), "X");
}

#[test]
fn photosynthesis_failure_restores_text() {
    let mut doc = paragraph("photosynthesis");
    let before = doc.to_specs();

    let outcome = assist::run_blocking(
        &mut doc,
        &Selection::in_text(vec![0, 0], 0, 14),
        &AssistOptions::for_card("card-1", "m"),
        &Offline,
    )
    .expect("converted");

    assert!(outcome.notice().is_some_and(|m| m.contains("connection refused")));
    assert_eq!(count(&doc, ChunkKind::Pending), 0);
    assert_eq!(count(&doc, ChunkKind::Resolved), 0);
    assert_eq!(doc.to_specs(), before);
}

#[test]
fn overlapping_requests_survive_edits() {
    let mut doc = paragraph("alpha beta gamma");
    let opts = AssistOptions::for_card("card-1", "m");

    let first = assist::begin(&mut doc, &Selection::in_text(vec![0, 0], 0, 5), &opts).expect("alpha");
    // Children are now [chunk("alpha"), " beta gamma"].
    let second = assist::begin(&mut doc, &Selection::in_text(vec![0, 1], 6, 11), &opts).expect("gamma");
    assert_ne!(first.chunk_id(), second.chunk_id());
    assert_eq!(count(&doc, ChunkKind::Pending), 2);

    // Shift every path while both requests are in flight.
    doc.insert_node(&[0], NodeSpec::heading(2, vec![NodeSpec::text("Notes")]))
        .expect("insert heading");

    let done = assist::finish(&mut doc, &second, Echo.complete(&second.request));
    assert!(matches!(done, ChunkOutcome::Resolved { ref path, .. } if path[0] == 1));
    let failed = assist::finish(&mut doc, &first, Offline.complete(&first.request));
    assert!(matches!(failed, ChunkOutcome::Unwound { .. }));

    assert_eq!(doc.plain_text(), "Notes\nalpha beta GAMMA");
    assert_eq!(count(&doc, ChunkKind::Pending), 0);
    assert_eq!(count(&doc, ChunkKind::Resolved), 1);
}

#[test]
fn completion_is_applied_once() {
    let mut doc = paragraph("leaf");
    let opts = AssistOptions::for_card("c", "m");
    let pending = assist::begin(&mut doc, &Selection::in_text(vec![0, 0], 0, 4), &opts).expect("ok");

    let first = assist::finish(&mut doc, &pending, Echo.complete(&pending.request));
    assert!(matches!(first, ChunkOutcome::Resolved { .. }));
    let snapshot = doc.to_specs();

    let again = assist::finish(&mut doc, &pending, Offline.complete(&pending.request));
    assert_eq!(again, ChunkOutcome::TargetMissing { chunk_id: pending.chunk_id().to_owned() });
    assert_eq!(doc.to_specs(), snapshot);
}

#[test]
fn deleted_chunk_is_reported_missing() {
    let mut doc = paragraph("chlorophyll absorbs light");
    let opts = AssistOptions::for_card("c", "m").mode(AssistMode::ExplainInPlace);
    let pending = assist::begin(&mut doc, &Selection::in_text(vec![0, 0], 0, 11), &opts).expect("ok");

    let (_, path) = chunk::locate_pending(&doc, pending.chunk_id()).expect("pending");
    doc.remove_node(&path).expect("removed");
    let text = doc.plain_text();

    let outcome = assist::finish(&mut doc, &pending, Echo.complete(&pending.request));
    assert!(matches!(outcome, ChunkOutcome::TargetMissing { .. }));
    assert_eq!(doc.plain_text(), text);
}

#[test]
fn request_runs_on_worker_thread() {
    let mut doc = paragraph("stomata open at dawn");
    let opts = AssistOptions::for_card("c", "m");
    let pending = assist::begin(&mut doc, &Selection::in_text(vec![0, 0], 0, 7), &opts).expect("ok");

    let (tx, rx) = mpsc::channel();
    let request = pending.request.clone();
    let worker = thread::spawn(move || {
        tx.send(Echo.complete(&request)).expect("send");
    });

    // The user keeps typing while the request is out.
    let tail = doc.find_text("dawn").expect("tail");
    doc.insert_text(&tail.focus, "!").expect("typed");

    let result = rx.recv().expect("result");
    worker.join().expect("worker");
    assist::finish(&mut doc, &pending, result);
    assert_eq!(doc.plain_text(), "STOMATA open at dawn!");
}

#[test]
fn selection_inside_resolved_chunk_is_declined() {
    let mut doc = Document::from_blocks(vec![NodeSpec::paragraph(vec![
        NodeSpec::text("see "),
        NodeSpec::chunk(
            ChunkKind::Resolved,
            "chunk_1",
            vec![NodeSpec::text("photosynthesis")],
        ),
    ])])
    .expect("valid");
    let before = doc.to_specs();
    let revision = doc.revision();

    let err = chunk::convert(&mut doc, &Selection::in_text(vec![0, 1, 0], 0, 14))
        .expect_err("nested chunk");
    assert!(matches!(
        err,
        ChunkError::InvalidSelection(SelectionError::InsideChunk)
    ));
    assert_eq!(doc.to_specs(), before);
    assert_eq!(doc.revision(), revision);
    assert_eq!(count(&doc, ChunkKind::Pending), 0);
    assert_eq!(doc.plain_text(), "see photosynthesis");

    // The surrounding text still converts and resolves next to the chunk.
    let pending = chunk::convert(&mut doc, &Selection::in_text(vec![0, 0], 0, 3)).expect("convert");
    let outcome = chunk::resolve(&mut doc, &pending.chunk_id, "look");
    assert!(matches!(outcome, ChunkOutcome::Resolved { ref path, .. } if path == &vec![0, 0]));
    assert_eq!(count(&doc, ChunkKind::Resolved), 2);
    assert_eq!(doc.plain_text(), "look photosynthesis");
}
