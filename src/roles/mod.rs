//! Role rules: versioned system-instruction records keyed by role name.
//!
//! The built-in records ship in `builtin.toml`; `config.toml` may add roles
//! or replace a built-in one with an equal or newer version.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Name of the rule included in every system instruction.
pub const CORE_ROLE: &str = "CORE";

const BUILTIN_ROLES: &str = include_str!("builtin.toml");

/// One versioned rule record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRule {
    /// Role key, normalised to upper snake case.
    pub name: String,
    /// Monotonic revision of the instructions.
    pub version: u32,
    /// Instruction text sent to the model.
    pub instructions: String,
}

#[derive(Debug, Deserialize)]
struct RoleFile {
    roles: Vec<RoleRule>,
}

/// Agent roles selectable in the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Tactical analysis with Insight / Data / Action answers.
    #[default]
    Assistant,
    /// Collects facts for a new client record.
    ClientCreator,
    /// Proposes a new campaign structure.
    CampaignCreator,
}

impl AgentRole {
    /// All selectable roles.
    pub const ALL: [AgentRole; 3] = [
        AgentRole::Assistant,
        AgentRole::ClientCreator,
        AgentRole::CampaignCreator,
    ];

    /// Key of the role's rule record.
    pub fn key(self) -> &'static str {
        match self {
            Self::Assistant => "ASSISTANT",
            Self::ClientCreator => "CLIENT_CREATOR",
            Self::CampaignCreator => "CAMPAIGN_CREATOR",
        }
    }
}

impl FromStr for AgentRole {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_role_name(s);
        Self::ALL
            .into_iter()
            .find(|role| role.key() == key)
            .ok_or(RoleError::UnknownRole(key))
    }
}

/// Errors loading or overriding role rules.
#[derive(Debug, Error)]
pub enum RoleError {
    /// The embedded rule file failed to parse.
    #[error("built-in role rules are invalid: {0}")]
    Builtin(#[from] toml::de::Error),
    /// A record has a blank name.
    #[error("role rule has an empty name")]
    EmptyName,
    /// An override is older than the rule it replaces.
    #[error("role {name} override has version {configured}, older than built-in version {current}")]
    StaleVersion {
        /// Normalised role name.
        name: String,
        /// Version already loaded.
        current: u32,
        /// Version of the rejected override.
        configured: u32,
    },
    /// No role with this name.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Normalise a role name: trimmed, upper case, `-` and spaces as `_`.
pub fn normalize_role_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// Rule records keyed by normalised role name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleBook {
    rules: BTreeMap<String, RoleRule>,
}

impl RoleBook {
    /// Load the built-in rules.
    ///
    /// # Errors
    ///
    /// Returns [`RoleError::Builtin`] if the embedded file does not parse.
    pub fn builtin() -> Result<Self, RoleError> {
        let file: RoleFile = toml::from_str(BUILTIN_ROLES)?;
        let mut book = Self::default();
        for rule in file.roles {
            book.insert(rule)?;
        }
        Ok(book)
    }

    /// Load the built-in rules and apply configured overrides.
    ///
    /// # Errors
    ///
    /// Returns [`RoleError`] if the built-ins are invalid or an override is rejected.
    pub fn with_overrides(overrides: &[RoleRule]) -> Result<Self, RoleError> {
        let mut book = Self::builtin()?;
        for rule in overrides {
            book.apply_override(rule.clone())?;
        }
        Ok(book)
    }

    /// Add a new role or replace an existing one.
    ///
    /// # Errors
    ///
    /// Returns [`RoleError::StaleVersion`] if `rule` is older than the
    /// record it would replace, [`RoleError::EmptyName`] for a blank name.
    pub fn apply_override(&mut self, rule: RoleRule) -> Result<(), RoleError> {
        let name = normalize_role_name(&rule.name);
        if let Some(current) = self.rules.get(&name) {
            if rule.version < current.version {
                return Err(RoleError::StaleVersion {
                    name,
                    current: current.version,
                    configured: rule.version,
                });
            }
        }
        debug!(role = %name, version = rule.version, "role rule override applied");
        self.insert(rule)
    }

    fn insert(&mut self, mut rule: RoleRule) -> Result<(), RoleError> {
        rule.name = normalize_role_name(&rule.name);
        if rule.name.is_empty() {
            return Err(RoleError::EmptyName);
        }
        rule.instructions = rule.instructions.trim().to_owned();
        self.rules.insert(rule.name.clone(), rule);
        Ok(())
    }

    /// Look up a rule by (unnormalised) name.
    pub fn get(&self, name: &str) -> Option<&RoleRule> {
        self.rules.get(&normalize_role_name(name))
    }

    /// All rules ordered by name.
    pub fn rules(&self) -> impl Iterator<Item = &RoleRule> {
        self.rules.values()
    }

    /// System instruction for `role`: the core rule, a blank line, the role rule.
    ///
    /// Missing records are skipped, so a book without a role rule yields
    /// the core rule alone.
    pub fn system_instruction(&self, role: AgentRole) -> String {
        [self.get(CORE_ROLE), self.get(role.key())]
            .into_iter()
            .flatten()
            .map(|rule| rule.instructions.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
