#![forbid(unsafe_code)]

//! Observability for completion requests and chunk transitions.
//!
//! This module provides:
//!
//! - **Tracing spans**: an `effect.request` span around every completion
//!   request with `target_kind`, `duration_us` and `result` fields.
//! - **Counters**: monotonic totals of requests, failed requests and chunk
//!   outcomes, readable from anywhere.
//! - [`TracedService`], a [`CompletionService`] wrapper that applies both.

use std::sync::atomic::{AtomicU64, Ordering};

use flashdeck_ai::{CompletionRequest, CompletionResponse, CompletionService, RequestFailed};
use flashdeck_editor::ChunkOutcome;
use web_time::Instant;

static REQUESTS_TOTAL: AtomicU64 = AtomicU64::new(0);
static REQUESTS_FAILED: AtomicU64 = AtomicU64::new(0);
static CHUNKS_RESOLVED: AtomicU64 = AtomicU64::new(0);
static CHUNKS_UNWOUND: AtomicU64 = AtomicU64::new(0);
static CHUNKS_MISSING: AtomicU64 = AtomicU64::new(0);

/// Completion requests issued (monotonic counter).
#[must_use]
pub fn requests_total() -> u64 {
    REQUESTS_TOTAL.load(Ordering::Relaxed)
}

/// Completion requests that failed (monotonic counter).
#[must_use]
pub fn requests_failed() -> u64 {
    REQUESTS_FAILED.load(Ordering::Relaxed)
}

/// Chunks resolved or flipped (monotonic counter).
#[must_use]
pub fn chunks_resolved() -> u64 {
    CHUNKS_RESOLVED.load(Ordering::Relaxed)
}

/// Chunks unwound after a failure (monotonic counter).
#[must_use]
pub fn chunks_unwound() -> u64 {
    CHUNKS_UNWOUND.load(Ordering::Relaxed)
}

/// Completions whose chunk had disappeared (monotonic counter).
#[must_use]
pub fn chunks_missing() -> u64 {
    CHUNKS_MISSING.load(Ordering::Relaxed)
}

fn target_kind(request: &CompletionRequest) -> &'static str {
    if request.conversation_id.is_some() {
        "conversation"
    } else {
        "card"
    }
}

/// Run a completion request inside an `effect.request` span.
pub fn trace_request_effect<F>(
    request: &CompletionRequest,
    f: F,
) -> Result<CompletionResponse, RequestFailed>
where
    F: FnOnce(&CompletionRequest) -> Result<CompletionResponse, RequestFailed>,
{
    REQUESTS_TOTAL.fetch_add(1, Ordering::Relaxed);

    let kind = target_kind(request);
    let start = Instant::now();
    let span = tracing::debug_span!(
        "effect.request",
        target_kind = kind,
        model = %request.model,
        duration_us = tracing::field::Empty,
        result = tracing::field::Empty,
    );
    let _guard = span.enter();

    tracing::debug!(
        target: "flashdeck.effect",
        target_kind = kind,
        chars = request.content.chars().count(),
        "request effect started"
    );

    let result = f(request);
    let duration_us = start.elapsed().as_micros() as u64;
    span.record("duration_us", duration_us);

    match &result {
        Ok(_) => {
            span.record("result", "ok");
            tracing::debug!(
                target: "flashdeck.effect",
                target_kind = kind,
                duration_us,
                "request effect completed"
            );
        }
        Err(err) => {
            REQUESTS_FAILED.fetch_add(1, Ordering::Relaxed);
            span.record("result", "error");
            tracing::warn!(
                target: "flashdeck.effect",
                target_kind = kind,
                duration_us,
                error = %err,
                "request effect failed"
            );
        }
    }
    result
}

/// Count a chunk transition.
pub fn record_chunk_outcome(outcome: &ChunkOutcome) {
    let counter = match outcome {
        ChunkOutcome::Resolved { .. } | ChunkOutcome::Flipped { .. } => &CHUNKS_RESOLVED,
        ChunkOutcome::Unwound { .. } => &CHUNKS_UNWOUND,
        ChunkOutcome::TargetMissing { .. } => &CHUNKS_MISSING,
    };
    counter.fetch_add(1, Ordering::Relaxed);

    tracing::debug!(
        target: "flashdeck.effect",
        chunk_id = outcome.chunk_id(),
        outcome = ?outcome,
        "chunk outcome recorded"
    );
}

/// A [`CompletionService`] whose requests are traced and counted.
#[derive(Debug, Clone)]
pub struct TracedService<S> {
    inner: S,
}

impl<S> TracedService<S> {
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: CompletionService> CompletionService for TracedService<S> {
    fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, RequestFailed> {
        trace_request_effect(request, |r| self.inner.complete(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashdeck_ai::{ContextMode, Target};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::registry::LookupSpan;

    #[derive(Debug, Clone)]
    struct CapturedEvent {
        level: tracing::Level,
        message: String,
    }

    struct Capture {
        spans: Arc<Mutex<Vec<(String, HashMap<String, String>)>>>,
        events: Arc<Mutex<Vec<CapturedEvent>>>,
    }

    struct FieldVisitor(Vec<(String, String)>);

    impl tracing::field::Visit for FieldVisitor {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            self.0.push((field.name().to_string(), format!("{value:?}")));
        }
        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            self.0.push((field.name().to_string(), value.to_string()));
        }
    }

    impl<S> tracing_subscriber::Layer<S> for Capture
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            _id: &tracing::span::Id,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut visitor = FieldVisitor(Vec::new());
            attrs.record(&mut visitor);
            self.spans
                .lock()
                .expect("span lock")
                .push((attrs.metadata().name().to_string(), visitor.0.into_iter().collect()));
        }

        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            if event.metadata().target() != "flashdeck.effect" {
                return;
            }
            let mut visitor = FieldVisitor(Vec::new());
            event.record(&mut visitor);
            let message = visitor
                .0
                .into_iter()
                .find(|(k, _)| k == "message")
                .map(|(_, v)| v)
                .unwrap_or_default();
            self.events.lock().expect("event lock").push(CapturedEvent {
                level: *event.metadata().level(),
                message,
            });
        }
    }

    struct Failing;

    impl CompletionService for Failing {
        fn complete(&self, _: &CompletionRequest) -> Result<CompletionResponse, RequestFailed> {
            Err(RequestFailed::Service {
                message: "rate limited".into(),
            })
        }
    }

    #[test]
    fn failed_request_is_traced_and_counted() {
        let spans = Arc::new(Mutex::new(Vec::new()));
        let events = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(Capture {
            spans: Arc::clone(&spans),
            events: Arc::clone(&events),
        });

        let before = requests_failed();
        let request = CompletionRequest::new(
            "osmosis",
            "m",
            Target::Conversation("conv-1".into()),
            ContextMode::Focused,
        );
        let result = tracing::subscriber::with_default(subscriber, || {
            TracedService::new(Failing).complete(&request)
        });

        assert!(result.is_err());
        assert!(requests_failed() > before);

        let spans = spans.lock().expect("span lock").clone();
        let (name, fields) = spans.first().expect("span");
        assert_eq!(name, "effect.request");
        assert_eq!(fields.get("target_kind").map(String::as_str), Some("conversation"));

        let events = events.lock().expect("event lock").clone();
        let last = events.last().expect("event");
        assert_eq!(last.level, tracing::Level::WARN);
        assert_eq!(last.message, "request effect failed");
    }

    #[test]
    fn outcomes_are_counted() {
        let before = chunks_missing();
        record_chunk_outcome(&ChunkOutcome::TargetMissing {
            chunk_id: "chunk_1".into(),
        });
        assert!(chunks_missing() > before);
    }
}
