#![forbid(unsafe_code)]

//! Completion request wire format.
//!
//! ```json
//! {"content": "...", "model": "...", "cardId": "...", "mode": "broad"}
//! {"content": "...", "model": "...", "conversationId": "..."}
//! ```
//!
//! Exactly one of `cardId` / `conversationId` is present. `mode` only
//! appears for broadened context.

use serde::Serialize;

/// What the request is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A card being edited.
    Card(String),
    /// An ongoing conversation.
    Conversation(String),
}

impl Target {
    /// Pick the identifier mode from a caller flag.
    #[must_use]
    pub fn select(use_conversation: bool, card_id: &str, conversation_id: &str) -> Self {
        if use_conversation {
            Self::Conversation(conversation_id.to_owned())
        } else {
            Self::Card(card_id.to_owned())
        }
    }
}

/// How much context the service should pull in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextMode {
    /// Only the supplied content.
    #[default]
    Focused,
    /// Broadened context. Changes only the `mode` marker.
    Broad,
}

/// Request body sent to the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub content: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
}

impl CompletionRequest {
    #[must_use]
    pub fn new(
        content: impl Into<String>,
        model: impl Into<String>,
        target: Target,
        context: ContextMode,
    ) -> Self {
        let (card_id, conversation_id) = match target {
            Target::Card(id) => (Some(id), None),
            Target::Conversation(id) => (None, Some(id)),
        };
        Self {
            content: content.into(),
            model: model.into(),
            card_id,
            conversation_id,
            mode: match context {
                ContextMode::Focused => None,
                ContextMode::Broad => Some("broad"),
            },
        }
    }

    /// Serialize to a JSON value for the transport.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
