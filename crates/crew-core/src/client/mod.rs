//! Model client seam.
//!
//! [`ModelClient`] is the only way the relay talks to the model endpoint.
//! [`AnthropicClient`] is the production implementation; tests inject
//! [`crate::fakes::ScriptedClient`] instead.

pub mod anthropic;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use anthropic::AnthropicClient;

/// One conversational turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of a message creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub model: String,
    pub max_tokens: u32,
    /// System instructions; the role preamble.
    pub system: String,
    pub messages: Vec<Message>,
}

/// A single content block of a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    /// Any block kind the relay does not consume (tool use, thinking, ...).
    #[serde(other)]
    Other,
}

/// Token accounting reported with a reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

/// A successful reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Usage,
}

impl MessageResponse {
    /// Text of the first content block, if that block is text.
    pub fn first_text(&self) -> Option<&str> {
        match self.content.first() {
            Some(ContentBlock::Text { text }) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Build a plain-text reply (used by fakes and tests).
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            model: String::new(),
            content: vec![ContentBlock::Text { text: text.into() }],
            stop_reason: Some("end_turn".to_string()),
            usage: Usage::default(),
        }
    }
}

/// Issues one blocking-until-complete request/response cycle.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn create_message(&self, request: &MessageRequest) -> Result<MessageResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_as_messages_body() {
        let request = MessageRequest {
            model: "claude-x".to_string(),
            max_tokens: 1500,
            system: "be terse".to_string(),
            messages: vec![Message::user("hello")],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "claude-x",
                "max_tokens": 1500,
                "system": "be terse",
                "messages": [{"role": "user", "content": "hello"}],
            })
        );
    }

    #[test]
    fn test_first_text_reads_only_the_first_block() {
        let response: MessageResponse = serde_json::from_value(serde_json::json!({
            "id": "msg_1",
            "model": "claude-x",
            "content": [
                {"type": "text", "text": "first"},
                {"type": "text", "text": "second"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 2}
        }))
        .unwrap();
        assert_eq!(response.first_text(), Some("first"));
        assert_eq!(response.usage.output_tokens, 2);
    }

    #[test]
    fn test_non_text_first_block_has_no_text() {
        let response: MessageResponse = serde_json::from_value(serde_json::json!({
            "content": [
                {"type": "thinking", "thinking": "hmm", "signature": "s"},
                {"type": "text", "text": "late"}
            ]
        }))
        .unwrap();
        assert_eq!(response.content[0], ContentBlock::Other);
        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn test_empty_content_has_no_text() {
        let response: MessageResponse =
            serde_json::from_value(serde_json::json!({"content": []})).unwrap();
        assert_eq!(response.first_text(), None);
    }
}
