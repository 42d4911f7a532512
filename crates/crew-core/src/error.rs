//! Error taxonomy for the crew relay.

use crate::roles::AgentRole;

/// An error reply from the model endpoint, with its diagnostic context intact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("provider error ({status}): {message} [type={error_type}]{}", request_suffix(.request_id))]
pub struct ProviderError {
    /// HTTP status code of the reply.
    pub status: u16,
    /// Provider error kind, e.g. `authentication_error` or `rate_limit_error`.
    pub error_type: String,
    pub message: String,
    /// Value of the `request-id` response header, when present.
    pub request_id: Option<String>,
}

fn request_suffix(request_id: &Option<String>) -> String {
    match request_id {
        Some(id) => format!(" [request_id={id}]"),
        None => String::new(),
    }
}

/// Crew relay errors.
#[derive(Debug, thiserror::Error)]
pub enum CrewError {
    #[error("no API credential available (set {var} or enter one at the prompt)")]
    MissingCredential { var: String },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("{role} reply carried no text in its first content block")]
    EmptyResponse { role: AgentRole },

    #[error("exchange digest mismatch for {role}: expected {expected}, got {actual}")]
    DigestMismatch {
        role: AgentRole,
        expected: String,
        actual: String,
    },

    #[error("interrupted by operator")]
    Interrupted,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for CrewError {
    fn from(err: reqwest::Error) -> Self {
        CrewError::Transport(err.to_string())
    }
}

impl CrewError {
    /// Process exit status for this error.
    ///
    /// `1` for anything that stops the run before the first request, `2` when
    /// the endpoint (or the way to it) failed mid-run, `130` for an operator
    /// interrupt.
    pub fn exit_code(&self) -> u8 {
        match self {
            CrewError::MissingCredential { .. } | CrewError::Config(_) | CrewError::Io(_) => 1,
            CrewError::Provider(_)
            | CrewError::Transport(_)
            | CrewError::EmptyResponse { .. }
            | CrewError::DigestMismatch { .. }
            | CrewError::Serialization(_) => 2,
            CrewError::Interrupted => 130,
        }
    }

    /// Whether the failure came from talking to the model endpoint.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            CrewError::Provider(_) | CrewError::Transport(_) | CrewError::EmptyResponse { .. }
        )
    }
}

/// Result type for crew relay operations.
pub type Result<T> = std::result::Result<T, CrewError>;
