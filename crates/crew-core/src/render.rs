//! Console transcript of a relay.
//!
//! [`ConsoleRenderer`] is a [`PipelineObserver`] that writes the human-facing
//! transcript: start banner, task, one banner per role followed by the raw
//! reply, and the closing summary. Logs are not written here.

use std::io::{self, Write};

use crate::error::CrewError;
use crate::exchange::Exchange;
use crate::pipeline::{PipelineObserver, PipelineReport};
use crate::roles::AgentRole;

const RULE_WIDTH: usize = 60;
const BANNER_WIDTH: usize = 30;

pub struct ConsoleRenderer<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl ConsoleRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Hand back the writer, or the first write error seen.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn write(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|()| self.out.flush()) {
            self.error = Some(e);
        }
    }

    fn line(&mut self, text: &str) {
        self.write(text);
        self.write("\n");
    }

    /// Print a failed run's error with guidance for the operator.
    pub fn render_error(&mut self, error: &CrewError) {
        match error {
            CrewError::MissingCredential { .. } => {
                self.line("❌ An API key is required. Exiting.");
            }
            CrewError::Interrupted => {
                self.line("\n\n⏹️ Stopped by the Master.");
            }
            e if e.is_provider_failure() => {
                self.line(&format!("\n❌ API error: {e}"));
                self.line("💡 Check your API key and account balance.");
            }
            e => {
                self.line(&format!("\n❌ Error: {e}"));
            }
        }
    }
}

impl<W: Write> PipelineObserver for ConsoleRenderer<W> {
    fn task_announced(&mut self, task: &str) {
        let banner = "🎯".repeat(BANNER_WIDTH);
        self.line(&format!("\n{banner}"));
        self.line("🎯 Multi-agent collaboration demo starting!");
        self.line(&banner);
        self.line(&format!("\n📋 [Master's instruction]\n{task}"));
    }

    fn stage_started(&mut self, role: AgentRole) {
        let config = role.config();
        let rule = "=".repeat(RULE_WIDTH);
        self.line(&format!("\n{rule}"));
        self.line(&format!("{} [{}] - {}", config.emoji, config.persona, config.label));
        self.line(&rule);
        self.line("⏳ Thinking...");
    }

    fn stage_finished(&mut self, exchange: &Exchange) {
        self.line(exchange.text());
    }

    fn finished(&mut self, _report: &PipelineReport) {
        let banner = "🏁".repeat(BANNER_WIDTH);
        self.line(&format!("\n{banner}"));
        self.line("🏁 Collaboration turn 1 complete!");
        self.line(&banner);
        self.line("\n📊 Summary:");
        for role in AgentRole::ALL {
            let config = role.config();
            let label = format!("{}:", config.persona);
            self.line(&format!("  {} {label:<7} {}", config.emoji, config.completion));
        }
        self.line("\n💡 This is one turn of multi-agent collaboration.");
        self.line("   In a real project this cycle repeats to keep improving the code.");
    }
}
