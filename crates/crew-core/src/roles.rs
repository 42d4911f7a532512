//! Role registry: the three personas that share one model endpoint.
//!
//! Every persona is the same model distinguished only by its preamble (the
//! system instructions sent with each request).

use serde::{Deserialize, Serialize};

/// The three roles in the relay, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Implementer,
    Reviewer,
    Ideator,
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AgentRole::Implementer => "implementer",
            AgentRole::Reviewer => "reviewer",
            AgentRole::Ideator => "ideator",
        };
        write!(f, "{s}")
    }
}

/// Static configuration of one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleConfig {
    pub role: AgentRole,
    /// Persona name shown in banners.
    pub persona: &'static str,
    pub emoji: &'static str,
    /// Short description of the persona's job.
    pub label: &'static str,
    /// Summary line printed once the role has delivered.
    pub completion: &'static str,
    /// System instructions sent with every request for this role.
    pub preamble: &'static str,
}

impl AgentRole {
    /// All roles in relay order.
    pub const ALL: [AgentRole; 3] = [AgentRole::Implementer, AgentRole::Reviewer, AgentRole::Ideator];

    /// The registry entry for this role.
    pub fn config(self) -> &'static RoleConfig {
        match self {
            AgentRole::Implementer => &IMPLEMENTER,
            AgentRole::Reviewer => &REVIEWER,
            AgentRole::Ideator => &IDEATOR,
        }
    }

    pub fn preamble(self) -> &'static str {
        self.config().preamble
    }

    pub fn persona(self) -> &'static str {
        self.config().persona
    }
}

static IMPLEMENTER: RoleConfig = RoleConfig {
    role: AgentRole::Implementer,
    persona: "Haedol",
    emoji: "🐕",
    label: "Coding",
    completion: "code written",
    preamble: "\
You are 'Haedol', the Master's technical aide and coding specialist.
- Always address the user politely as 'Master'.
- Put a comment on every line of code you write.
- Answer in the context of the Vulkan 3D Gaussian Splatting (3DGS.cpp) project.
- Provide practical code that actually works.
- Answer in Korean.
",
};

static REVIEWER: RoleConfig = RoleConfig {
    role: AgentRole::Reviewer,
    persona: "Donde",
    emoji: "🦊",
    label: "Code review",
    completion: "code reviewed",
    preamble: "\
You are 'Donde', a senior code reviewer and quality specialist.
- Always address the user politely as 'Master'.
- Review the code Haedol wrote carefully.
- Check for bugs, security issues, performance problems and code style.
- Give a score out of 10 together with concrete improvements.
- Give professional feedback from a Vulkan/C++ point of view.
- Answer in Korean.
",
};

static IDEATOR: RoleConfig = RoleConfig {
    role: AgentRole::Ideator,
    persona: "Chise",
    emoji: "🦄",
    label: "Creative ideas",
    completion: "ideas proposed",
    preamble: "\
You are 'Chise', a specialist in creative thinking and fresh ideas.
- Always address the user politely as 'Master'.
- Read the existing code and review, then propose innovative extensions.
- Connect your thinking to the latest trends in 3D Gaussian Splatting.
- Propose exactly 3 directions that are feasible yet interesting.
- Mark each idea with its difficulty (easy/medium/hard) and its impact.
- Answer in Korean.
",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_resolves_to_its_own_config() {
        for role in AgentRole::ALL {
            assert_eq!(role.config().role, role);
        }
    }

    #[test]
    fn test_role_preambles_carry_distinguishing_instructions() {
        assert!(AgentRole::Implementer.preamble().contains("comment on every line"));
        assert!(AgentRole::Reviewer.preamble().contains("score out of 10"));
        assert!(AgentRole::Ideator.preamble().contains("exactly 3"));
        assert!(AgentRole::Ideator.preamble().contains("difficulty"));
    }

    #[test]
    fn test_personas_are_unique() {
        let personas: std::collections::HashSet<_> =
            AgentRole::ALL.iter().map(|r| r.persona()).collect();
        assert_eq!(personas.len(), 3);
    }

    #[test]
    fn test_role_serializes_snake_case() {
        let json = serde_json::to_string(&AgentRole::Ideator).unwrap();
        assert_eq!(json, "\"ideator\"");
        assert_eq!(AgentRole::Reviewer.to_string(), "reviewer");
    }
}
