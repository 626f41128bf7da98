use serde::{Deserialize, Serialize};

use scpgen_core::mode::PolicyMode;

use crate::tally::ActionTally;

pub const POLICY_VERSION: &str = "2012-10-17";
pub const POLICY_RESOURCE: &str = "*";

/// Service control policy with a single, document-level effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Statement,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub effect: PolicyMode,
    pub action: Vec<String>,
}

impl PolicyDocument {
    pub fn effect(&self) -> PolicyMode {
        self.statement.effect
    }

    pub fn actions(&self) -> &[String] {
        &self.statement.action
    }
}

pub fn synthesize(mode: PolicyMode, service: &str, tally: &ActionTally) -> PolicyDocument {
    let action = tally
        .actions()
        .map(|name| format!("{service}:{name}"))
        .collect();
    PolicyDocument {
        version: POLICY_VERSION.to_string(),
        statement: Statement {
            effect: mode,
            action,
        },
        resource: POLICY_RESOURCE.to_string(),
    }
}
