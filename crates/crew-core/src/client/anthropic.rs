//! HTTP client for the Anthropic Messages endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{MessageRequest, MessageResponse, ModelClient};
use crate::config::ClientConfig;
use crate::credential::Credential;
use crate::error::{CrewError, ProviderError, Result};

/// Error envelope returned on non-2xx replies.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

/// Messages API client. Holds the credential; stateless across calls otherwise.
pub struct AnthropicClient {
    config: ClientConfig,
    credential: Credential,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("config", &self.config)
            .field("credential", &self.credential)
            .finish()
    }
}

impl AnthropicClient {
    pub fn new(config: ClientConfig, credential: Credential) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("crew-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            config,
            credential,
            http_client,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// Turn a failed reply into a [`ProviderError`], keeping the raw body when it
/// is not the usual error envelope.
fn provider_error(status: u16, request_id: Option<String>, body: &str) -> ProviderError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => ProviderError {
            status,
            error_type: envelope.error.error_type,
            message: envelope.error.message,
            request_id,
        },
        Err(_) => ProviderError {
            status,
            error_type: "unknown_error".to_string(),
            message: body.trim().to_string(),
            request_id,
        },
    }
}

#[async_trait]
impl ModelClient for AnthropicClient {
    async fn create_message(&self, request: &MessageRequest) -> Result<MessageResponse> {
        let url = self.config.messages_url();
        debug!(url = %url, model = %request.model, "sending message request");

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", self.credential.expose())
            .header("anthropic-version", &self.config.api_version)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let request_id = response
            .headers()
            .get("request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CrewError::Provider(provider_error(
                status.as_u16(),
                request_id,
                &body,
            )));
        }

        let body = response.bytes().await?;
        let parsed: MessageResponse = serde_json::from_slice(&body)?;
        debug!(
            message_id = %parsed.id,
            request_id = request_id.as_deref().unwrap_or("-"),
            "message reply received"
        );
        Ok(parsed)
    }
}
