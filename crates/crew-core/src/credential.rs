//! Credential resolution: environment first, interactive prompt second.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::error::{CrewError, Result};

/// Environment variable read when no other name is configured.
pub const DEFAULT_API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Opaque API token. Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token, rejecting blank input.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Source of an interactively entered credential.
pub trait CredentialPrompt {
    /// Show `message` and return whatever the operator typed.
    fn ask(&mut self, message: &str) -> io::Result<String>;
}

impl<F> CredentialPrompt for F
where
    F: FnMut(&str) -> io::Result<String>,
{
    fn ask(&mut self, message: &str) -> io::Result<String> {
        self(message)
    }
}

/// Prompt on stderr, read one line from stdin.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl CredentialPrompt for TerminalPrompt {
    fn ask(&mut self, message: &str) -> io::Result<String> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{message}")?;
        stderr.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}

/// Resolve the credential from the value of `var`, falling back to `prompt`.
///
/// A set-but-blank variable counts as absent. A blank prompt answer, or a
/// prompt that cannot be read, yields [`CrewError::MissingCredential`].
pub fn resolve_from(
    var: &str,
    env_value: Option<String>,
    prompt: &mut dyn CredentialPrompt,
) -> Result<Credential> {
    if let Some(credential) = env_value.and_then(Credential::new) {
        debug!(var = %var, "credential taken from environment");
        return Ok(credential);
    }

    let answer = match prompt.ask("🔑 Enter your Anthropic API key: ") {
        Ok(answer) => answer,
        Err(e) => {
            debug!(error = %e, "credential prompt could not be read");
            String::new()
        }
    };

    Credential::new(answer).ok_or_else(|| CrewError::MissingCredential {
        var: var.to_string(),
    })
}
