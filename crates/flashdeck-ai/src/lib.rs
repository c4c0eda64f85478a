#![forbid(unsafe_code)]

//! AI completion client for Flashdeck.
//!
//! # Role in Flashdeck
//! The editor's chunk lifecycle and the chat panel both ask an external
//! completion service for text. This crate owns the wire format
//! ([`request`], [`response`]), the transport seam ([`client::Transport`]),
//! and conversation bookkeeping ([`conversation::ChatSession`]).
//!
//! Networking itself is out of scope: hosts implement [`client::Transport`]
//! over whatever HTTP stack they run on.

pub mod client;
pub mod conversation;
pub mod error;
pub mod request;
pub mod response;

pub use client::{AiClient, AiClientConfig, CompletionService, Transport};
pub use conversation::{ChatSession, ChatTurn, Role};
pub use error::{RequestFailed, TransportError};
pub use request::{CompletionRequest, ContextMode, Target};
pub use response::CompletionResponse;
