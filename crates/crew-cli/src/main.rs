//! Crew Relay CLI
//!
//! The `crew` command runs one relay: the implementer answers the task, the
//! reviewer scores the answer, the ideator proposes extensions.
//!
//! ## Exit status
//!
//! - `0`: relay finished
//! - `1`: no credential, bad configuration or unreadable task file
//! - `2`: the model endpoint failed mid-relay
//! - `130`: interrupted with Ctrl-C

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, Level};

use crew_core::config::{DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crew_core::{
    init_tracing, load_task, AnthropicClient, ClientConfig, ConsoleRenderer, CrewError,
    ModelSettings, Pipeline, TerminalPrompt, DEFAULT_API_KEY_VAR,
};

#[derive(Parser, Debug)]
#[command(name = "crew")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Three-agent relay: implementer -> reviewer -> ideator", long_about = None)]
struct Cli {
    /// Model version identifier sent with every request
    #[arg(long, env = "CREW_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Response length ceiling in tokens
    #[arg(long, env = "CREW_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Base URL of the model endpoint
    #[arg(long, env = "CREW_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Value of the `anthropic-version` header
    #[arg(long, env = "CREW_API_VERSION", default_value = DEFAULT_API_VERSION)]
    api_version: String,

    /// Environment variable holding the API key
    #[arg(long, default_value = DEFAULT_API_KEY_VAR)]
    api_key_env: String,

    /// Read the task from this file instead of the built-in one
    #[arg(long, env = "CREW_TASK_FILE")]
    task_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn settings(&self) -> ModelSettings {
        ModelSettings {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
        }
    }

    fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(&self.base_url)
            .with_api_version(&self.api_version)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    init_tracing(cli.json, level);

    let mut renderer = ConsoleRenderer::stdout();
    let status = match run(&cli, &mut renderer) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let crew_err = err.downcast_ref::<CrewError>();
            match crew_err {
                // Bare relay errors get the operator-facing wording.
                Some(e) if err.chain().count() == 1 => renderer.render_error(e),
                _ => eprintln!("❌ {err:#}"),
            }
            ExitCode::from(crew_err.map_or(1, CrewError::exit_code))
        }
    };

    if let Err(e) = renderer.finish() {
        debug!(error = %e, "console output was cut short");
    }
    status
}

fn run(cli: &Cli, renderer: &mut ConsoleRenderer<std::io::Stdout>) -> Result<()> {
    let task = load_task(cli.task_file.as_deref()).with_context(|| match &cli.task_file {
        Some(path) => format!("failed to load task from {}", path.display()),
        None => "failed to load built-in task".to_string(),
    })?;

    let client_config = cli.client_config();
    let mut pipeline = Pipeline::assemble(
        &cli.api_key_env,
        std::env::var(&cli.api_key_env).ok(),
        &mut TerminalPrompt,
        cli.settings(),
        |credential| AnthropicClient::new(client_config, credential),
    )?;
    debug!(run_id = %pipeline.run_id(), model = %cli.model, "pipeline assembled");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async {
        let interrupt = async {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        pipeline.run_until(&task, renderer, interrupt).await
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_core_settings() {
        let cli = Cli::try_parse_from(["crew"]).unwrap();
        assert_eq!(cli.settings(), ModelSettings::default());
        assert_eq!(cli.client_config(), ClientConfig::default());
        assert_eq!(cli.api_key_env, "ANTHROPIC_API_KEY");
        assert!(cli.task_file.is_none());
    }

    #[test]
    fn flags_override_model_settings() {
        let cli = Cli::try_parse_from([
            "crew",
            "--model",
            "claude-custom",
            "--max-tokens",
            "300",
            "--base-url",
            "http://localhost:9000",
            "--task-file",
            "task.md",
        ])
        .unwrap();
        assert_eq!(cli.settings().model, "claude-custom");
        assert_eq!(cli.settings().max_tokens, 300);
        assert_eq!(cli.client_config().base_url, "http://localhost:9000");
        assert_eq!(cli.task_file, Some(PathBuf::from("task.md")));
    }

    #[test]
    fn non_numeric_max_tokens_is_rejected() {
        assert!(Cli::try_parse_from(["crew", "--max-tokens", "lots"]).is_err());
    }
}
