//! Pipeline driver: implementer → reviewer → ideator, then a summary.
//!
//! ```text
//! Start ─► ImplementDone ─► ReviewDone ─► IdeateDone ─► Finished
//!   │            │               │
//!   └────────────┴───────────────┴──────► Aborted   (any failed call)
//! ```
//!
//! Transitions never depend on what a role said, only on whether the call
//! succeeded. Each exchange is verified before it is forwarded.

use std::future::Future;
use std::time::Instant;

use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::client::ModelClient;
use crate::config::ModelSettings;
use crate::credential::{resolve_from, Credential, CredentialPrompt};
use crate::error::{CrewError, Result};
use crate::exchange::Exchange;
use crate::invoker::AgentInvoker;
use crate::obs;
use crate::roles::AgentRole;

/// Where the relay stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Start,
    ImplementDone,
    ReviewDone,
    IdeateDone,
    Finished,
    Aborted,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PipelineState::Start => "start",
            PipelineState::ImplementDone => "implement_done",
            PipelineState::ReviewDone => "review_done",
            PipelineState::IdeateDone => "ideate_done",
            PipelineState::Finished => "finished",
            PipelineState::Aborted => "aborted",
        };
        write!(f, "{s}")
    }
}

/// Receives pipeline progress. Every method defaults to a no-op.
pub trait PipelineObserver {
    fn task_announced(&mut self, _task: &str) {}
    fn stage_started(&mut self, _role: AgentRole) {}
    fn stage_finished(&mut self, _exchange: &Exchange) {}
    fn stage_failed(&mut self, _role: AgentRole, _error: &CrewError) {}
    fn finished(&mut self, _report: &PipelineReport) {}
}

impl PipelineObserver for () {}

/// The outputs of a completed relay.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub implementation: Exchange,
    pub review: Exchange,
    pub ideas: Exchange,
    pub duration_ms: u64,
}

impl PipelineReport {
    /// Exchanges in relay order.
    pub fn exchanges(&self) -> [&Exchange; 3] {
        [&self.implementation, &self.review, &self.ideas]
    }

    pub fn total_output_tokens(&self) -> u64 {
        self.exchanges()
            .iter()
            .map(|e| u64::from(e.usage().output_tokens))
            .sum()
    }
}

/// Message sent to the reviewer.
pub fn review_request(implementation: &str) -> String {
    format!(
        "Please review the code {} wrote:\n\n{implementation}",
        AgentRole::Implementer.persona()
    )
}

/// Message sent to the ideator.
pub fn ideation_request(implementation: &str, review: &str) -> String {
    format!(
        "Look at the following code and review, then propose creative extension ideas:\n\n\
         [{}'s code]\n{implementation}\n\n[{}'s review]\n{review}",
        AgentRole::Implementer.persona(),
        AgentRole::Reviewer.persona(),
    )
}

pub struct Pipeline<C> {
    invoker: AgentInvoker<C>,
    state: PipelineState,
    run_id: Uuid,
}

impl<C: ModelClient> Pipeline<C> {
    pub fn new(invoker: AgentInvoker<C>) -> Self {
        Self {
            invoker,
            state: PipelineState::Start,
            run_id: Uuid::new_v4(),
        }
    }

    /// Resolve the credential, then build the client it unlocks.
    ///
    /// `connect` is never called without a credential, so a missing one
    /// means no client and no request.
    pub fn assemble<F>(
        var: &str,
        env_value: Option<String>,
        prompt: &mut dyn CredentialPrompt,
        settings: ModelSettings,
        connect: F,
    ) -> Result<Self>
    where
        F: FnOnce(Credential) -> Result<C>,
    {
        settings.validate()?;
        let credential = resolve_from(var, env_value, prompt)?;
        let client = connect(credential)?;
        Ok(Self::new(AgentInvoker::new(client, settings)))
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn invoker(&self) -> &AgentInvoker<C> {
        &self.invoker
    }

    /// Run the relay once.
    pub async fn run(
        &mut self,
        task: &str,
        observer: &mut dyn PipelineObserver,
    ) -> Result<PipelineReport> {
        if self.state != PipelineState::Start {
            return Err(CrewError::Config(format!(
                "pipeline already ran (state: {})",
                self.state
            )));
        }

        let span = obs::run_span(&self.run_id.to_string());
        self.relay(task, observer).instrument(span).await
    }

    async fn relay(
        &mut self,
        task: &str,
        observer: &mut dyn PipelineObserver,
    ) -> Result<PipelineReport> {
        let run_id = self.run_id.to_string();
        obs::emit_pipeline_started(&run_id, &self.invoker.settings().model, task.len());
        let started = Instant::now();

        observer.task_announced(task);

        let implementation = self
            .stage(AgentRole::Implementer, task, PipelineState::ImplementDone, observer)
            .await?;

        let review = self
            .stage(
                AgentRole::Reviewer,
                &review_request(implementation.text()),
                PipelineState::ReviewDone,
                observer,
            )
            .await?;

        let ideas = self
            .stage(
                AgentRole::Ideator,
                &ideation_request(implementation.text(), review.text()),
                PipelineState::IdeateDone,
                observer,
            )
            .await?;

        let report = PipelineReport {
            run_id: self.run_id,
            implementation,
            review,
            ideas,
            duration_ms: started.elapsed().as_millis() as u64,
        };
        self.state = PipelineState::Finished;
        obs::emit_pipeline_finished(&run_id, report.duration_ms, report.total_output_tokens());
        observer.finished(&report);
        Ok(report)
    }

    /// Run the relay unless `interrupt` resolves first.
    ///
    /// On interrupt the in-flight request is dropped, no later stage runs and
    /// the result is [`CrewError::Interrupted`].
    pub async fn run_until<I>(
        &mut self,
        task: &str,
        observer: &mut dyn PipelineObserver,
        interrupt: I,
    ) -> Result<PipelineReport>
    where
        I: Future<Output = ()>,
    {
        let outcome = tokio::select! {
            biased;
            () = interrupt => None,
            result = self.run(task, observer) => Some(result),
        };

        match outcome {
            Some(result) => result,
            None => {
                let err = CrewError::Interrupted;
                obs::emit_pipeline_aborted(&self.run_id.to_string(), &self.state.to_string(), &err);
                self.state = PipelineState::Aborted;
                Err(err)
            }
        }
    }

    async fn stage(
        &mut self,
        role: AgentRole,
        message: &str,
        next: PipelineState,
        observer: &mut dyn PipelineObserver,
    ) -> Result<Exchange> {
        observer.stage_started(role);
        obs::emit_stage_started(role, message.len());

        let result = match self.invoker.invoke(role, message).await {
            Ok(exchange) => exchange.verify().map(|()| exchange),
            Err(e) => Err(e),
        };

        match result {
            Ok(exchange) => {
                obs::emit_stage_finished(&exchange);
                observer.stage_finished(&exchange);
                self.state = next;
                Ok(exchange)
            }
            Err(e) => {
                obs::emit_stage_failed(role, &e);
                obs::emit_pipeline_aborted(&self.run_id.to_string(), &self.state.to_string(), &e);
                observer.stage_failed(role, &e);
                self.state = PipelineState::Aborted;
                Err(e)
            }
        }
    }
}
