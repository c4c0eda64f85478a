#![forbid(unsafe_code)]

//! Card editor document model and the inline AI-chunk lifecycle.
//!
//! # Role in Flashdeck
//! A card's rich text lives in a [`document::Document`]: blocks of text runs
//! with formatting marks, plus inline chunk elements. When the user sends a
//! selection to the AI, the selection is wrapped in a *pending* chunk
//! ([`chunk::convert`]). Once the completion arrives the chunk becomes
//! *resolved* ([`chunk::resolve`] / [`chunk::flip_resolved`]); if it fails the
//! original text is restored ([`chunk::unwind`]).
//!
//! Chunks are found again by id rather than by a remembered path, so the
//! document can be edited while requests are in flight and several requests
//! can overlap.
//!
//! [`assist`] ties this to a [`flashdeck_ai::CompletionService`], and [`html`]
//! converts documents to and from the stored HTML form.

pub mod assist;
pub mod chunk;
pub mod document;
pub mod error;
pub mod html;
pub mod node;
pub mod selection;

pub use assist::{AssistMode, AssistOptions, PendingAssist};
pub use chunk::{ChunkOutcome, PendingChunk};
pub use document::Document;
pub use error::{ChunkError, DocumentError, HtmlError, SelectionError};
pub use node::{ChunkKind, ElementKind, MarkFlags, Marks, NodeId, NodeSpec};
pub use selection::{Path, Selection, TextPoint};
