//! In-memory model client fake (testing only)
//!
//! `ScriptedClient` replies from a queue of scripted outcomes and records every
//! request it receives. Clones share the same queue and log, so a test can keep
//! one handle while the pipeline owns another.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::{MessageRequest, MessageResponse, ModelClient};
use crate::error::{CrewError, Result};

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<Result<MessageResponse>>,
    requests: Vec<MessageRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedClient {
    script: Arc<Mutex<Script>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a plain-text reply.
    pub fn push_text(&self, text: impl Into<String>) {
        self.push_response(MessageResponse::text(text));
    }

    pub fn push_response(&self, response: MessageResponse) {
        self.script.lock().unwrap().replies.push_back(Ok(response));
    }

    /// Queue a failure.
    pub fn push_error(&self, error: CrewError) {
        self.script.lock().unwrap().replies.push_back(Err(error));
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<MessageRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.script.lock().unwrap().requests.len()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn create_message(&self, request: &MessageRequest) -> Result<MessageResponse> {
        let mut script = self.script.lock().unwrap();
        script.requests.push(request.clone());
        script
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(CrewError::Transport("no scripted reply left".to_string())))
    }
}
