//! Crew Relay core library
//!
//! Three role-specialised agents share one hosted model endpoint. A task goes
//! to the implementer, its output to the reviewer, and both outputs to the
//! ideator.
//!
//! # Module layout
//!
//! - [`credential`] — `Credential`, environment/prompt resolution
//! - [`roles`] — `AgentRole`, `RoleConfig` registry
//! - [`client`] — `ModelClient` seam, `AnthropicClient`
//! - [`invoker`] — `AgentInvoker`: one role, one request
//! - [`pipeline`] — `Pipeline` driver and `PipelineObserver`
//! - [`render`] — `ConsoleRenderer` transcript
//! - [`fakes`] — `ScriptedClient` for tests

pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod exchange;
pub mod fakes;
pub mod invoker;
pub mod obs;
pub mod pipeline;
pub mod render;
pub mod roles;
pub mod task;
pub mod telemetry;

pub use client::{
    AnthropicClient, ContentBlock, Message, MessageRequest, MessageResponse, ModelClient, Usage,
};
pub use config::{ClientConfig, ModelSettings};
pub use credential::{
    resolve_from, Credential, CredentialPrompt, TerminalPrompt, DEFAULT_API_KEY_VAR,
};
pub use error::{CrewError, ProviderError, Result};
pub use exchange::Exchange;
pub use invoker::AgentInvoker;
pub use pipeline::{
    ideation_request, review_request, Pipeline, PipelineObserver, PipelineReport, PipelineState,
};
pub use render::ConsoleRenderer;
pub use roles::{AgentRole, RoleConfig};
pub use task::{load_task, DEFAULT_TASK};
pub use telemetry::init_tracing;

/// Crew Relay version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
