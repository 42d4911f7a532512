//! `Exchange`: the immutable text produced by one role invocation.
//!
//! The digest is a SHA-256 hex string of the response text, taken at
//! construction. [`Exchange::verify`] re-derives it before the text is
//! forwarded to the next role.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::Digest as _;

use crate::client::Usage;
use crate::error::{CrewError, Result};
use crate::roles::AgentRole;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exchange {
    role: AgentRole,
    text: String,
    model: String,
    stop_reason: Option<String>,
    usage: Usage,
    elapsed_ms: u64,
    created_at: DateTime<Utc>,
    digest: String,
}

fn digest_of(text: &str) -> String {
    hex::encode(sha2::Sha256::digest(text.as_bytes()))
}

impl Exchange {
    pub fn new(
        role: AgentRole,
        text: String,
        model: String,
        stop_reason: Option<String>,
        usage: Usage,
        elapsed_ms: u64,
    ) -> Self {
        let digest = digest_of(&text);
        Self {
            role,
            text,
            model,
            stop_reason,
            usage,
            elapsed_ms,
            created_at: Utc::now(),
            digest,
        }
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn stop_reason(&self) -> Option<&str> {
        self.stop_reason.as_deref()
    }

    pub fn usage(&self) -> Usage {
        self.usage
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// First 12 hex characters of the digest.
    pub fn short_digest(&self) -> &str {
        &self.digest[..12]
    }

    /// Whether the reply was cut off by the token ceiling.
    pub fn truncated(&self) -> bool {
        self.stop_reason.as_deref() == Some("max_tokens")
    }

    /// Check that the text still matches the digest taken at construction.
    pub fn verify(&self) -> Result<()> {
        let actual = digest_of(&self.text);
        if actual != self.digest {
            return Err(CrewError::DigestMismatch {
                role: self.role,
                expected: self.digest.clone(),
                actual,
            });
        }
        Ok(())
    }
}
