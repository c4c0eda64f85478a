#![forbid(unsafe_code)]

//! Chat sessions.
//!
//! A session starts attached to a card. The first answer carries the
//! conversation id; every later message is sent against that conversation
//! instead of the card.

use crate::client::CompletionService;
use crate::error::RequestFailed;
use crate::request::{CompletionRequest, ContextMode, Target};

/// Who said it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One message in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// A conversation with the AI service.
#[derive(Debug, Clone)]
pub struct ChatSession {
    card_id: Option<String>,
    conversation_id: Option<String>,
    model: String,
    context: ContextMode,
    transcript: Vec<ChatTurn>,
}

impl ChatSession {
    /// Start a conversation about a card.
    #[must_use]
    pub fn for_card(card_id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            card_id: Some(card_id.into()),
            conversation_id: None,
            model: model.into(),
            context: ContextMode::Focused,
            transcript: Vec::new(),
        }
    }

    /// Continue an existing conversation.
    #[must_use]
    pub fn resume(conversation_id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            card_id: None,
            conversation_id: Some(conversation_id.into()),
            model: model.into(),
            context: ContextMode::Focused,
            transcript: Vec::new(),
        }
    }

    /// Use broadened context for subsequent messages.
    #[must_use]
    pub fn with_context(mut self, context: ContextMode) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    #[must_use]
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    fn target(&self) -> Target {
        match (&self.conversation_id, &self.card_id) {
            (Some(conversation), _) => Target::Conversation(conversation.clone()),
            (None, Some(card)) => Target::Card(card.clone()),
            (None, None) => Target::Card(String::new()),
        }
    }

    /// Send a user message and record the answer.
    ///
    /// On failure the user message stays out of the transcript so the
    /// caller can retry it verbatim.
    pub fn send<S>(&mut self, service: &S, content: &str) -> Result<&ChatTurn, RequestFailed>
    where
        S: CompletionService + ?Sized,
    {
        let request =
            CompletionRequest::new(content, self.model.as_str(), self.target(), self.context);
        let response = service.complete(&request)?;

        if self.conversation_id.is_none() && !response.conversation_id.is_empty() {
            self.conversation_id = Some(response.conversation_id);
        }
        self.transcript.push(ChatTurn {
            role: Role::User,
            content: content.to_owned(),
        });
        self.transcript.push(ChatTurn {
            role: Role::Assistant,
            content: response.content,
        });
        Ok(&self.transcript[self.transcript.len() - 1])
    }
}
