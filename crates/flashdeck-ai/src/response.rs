#![forbid(unsafe_code)]

//! Completion response envelope.
//!
//! ```json
//! {"success": true,  "data": {"aiMessage": {"content": "...", "chat": {"uuid": "..."}}}}
//! {"success": false, "message": "..."}
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::error::RequestFailed;

/// Decoded successful completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub content: String,
    pub conversation_id: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Data>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Data {
    ai_message: AiMessage,
}

#[derive(Debug, Deserialize)]
struct AiMessage {
    content: String,
    chat: Chat,
}

#[derive(Debug, Deserialize)]
struct Chat {
    uuid: String,
}

impl CompletionResponse {
    /// Decode the service envelope.
    pub fn from_envelope(value: Value) -> Result<Self, RequestFailed> {
        let envelope: Envelope =
            serde_json::from_value(value).map_err(|e| RequestFailed::Malformed {
                detail: e.to_string(),
            })?;

        if !envelope.success {
            return Err(RequestFailed::Service {
                message: envelope.message.unwrap_or_default(),
            });
        }

        let data = envelope.data.ok_or_else(|| RequestFailed::Malformed {
            detail: "success without data".to_owned(),
        })?;
        Ok(Self {
            content: data.ai_message.content,
            conversation_id: data.ai_message.chat.uuid,
        })
    }
}
