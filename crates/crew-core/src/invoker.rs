//! Agent invoker: one role, one message, one request.
//!
//! The invoker only produces data. Rendering the result is the caller's
//! concern (see [`crate::render`]).

use std::time::Instant;

use tracing::{instrument, warn};

use crate::client::{Message, MessageRequest, ModelClient};
use crate::config::ModelSettings;
use crate::error::{CrewError, Result};
use crate::exchange::Exchange;
use crate::roles::AgentRole;

/// Binds a model client to the settings shared by every role.
pub struct AgentInvoker<C> {
    client: C,
    settings: ModelSettings,
}

impl<C: ModelClient> AgentInvoker<C> {
    pub fn new(client: C, settings: ModelSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Build the request for `role` carrying `message` as the only turn.
    pub fn request_for(&self, role: AgentRole, message: &str) -> MessageRequest {
        MessageRequest {
            model: self.settings.model.clone(),
            max_tokens: self.settings.max_tokens,
            system: role.preamble().to_string(),
            messages: vec![Message::user(message)],
        }
    }

    /// Send `message` to the model as `role` and return the reply text.
    #[instrument(skip_all, fields(role = %role, message_chars = message.len()))]
    pub async fn invoke(&self, role: AgentRole, message: &str) -> Result<Exchange> {
        let request = self.request_for(role, message);
        let started = Instant::now();
        let response = self.client.create_message(&request).await?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let text = response
            .first_text()
            .ok_or(CrewError::EmptyResponse { role })?
            .to_string();

        let exchange = Exchange::new(
            role,
            text,
            if response.model.is_empty() {
                request.model
            } else {
                response.model.clone()
            },
            response.stop_reason.clone(),
            response.usage,
            elapsed_ms,
        );

        if exchange.truncated() {
            warn!(
                role = %role,
                max_tokens = self.settings.max_tokens,
                "reply hit the token ceiling and is truncated"
            );
        }

        Ok(exchange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ContentBlock, MessageResponse};
    use crate::fakes::ScriptedClient;

    fn invoker(client: ScriptedClient) -> AgentInvoker<ScriptedClient> {
        AgentInvoker::new(client, ModelSettings::new("claude-test", 64).unwrap())
    }

    #[tokio::test]
    async fn test_invoke_sends_preamble_settings_and_single_turn() {
        let client = ScriptedClient::new();
        client.push_text("done");
        let invoker = invoker(client);

        let exchange = invoker.invoke(AgentRole::Reviewer, "review this").await.unwrap();
        assert_eq!(exchange.text(), "done");
        assert_eq!(exchange.role(), AgentRole::Reviewer);

        let requests = invoker.client().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "claude-test");
        assert_eq!(requests[0].max_tokens, 64);
        assert_eq!(requests[0].system, AgentRole::Reviewer.preamble());
        assert_eq!(requests[0].messages, vec![Message::user("review this")]);
    }

    #[tokio::test]
    async fn test_reply_without_text_block_is_empty_response() {
        let client = ScriptedClient::new();
        client.push_response(MessageResponse {
            content: vec![ContentBlock::Other],
            ..MessageResponse::text("")
        });
        let err = invoker(client)
            .invoke(AgentRole::Ideator, "ideas please")
            .await
            .unwrap_err();
        assert!(matches!(err, CrewError::EmptyResponse { role: AgentRole::Ideator }));
    }

    #[tokio::test]
    async fn test_response_model_falls_back_to_requested_model() {
        let client = ScriptedClient::new();
        client.push_text("ok");
        let exchange = invoker(client).invoke(AgentRole::Implementer, "go").await.unwrap();
        assert_eq!(exchange.model(), "claude-test");
    }
}
