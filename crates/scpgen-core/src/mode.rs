use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScpError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum PolicyMode {
    #[default]
    Allow,
    Deny,
}

impl PolicyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyMode::Allow => "Allow",
            PolicyMode::Deny => "Deny",
        }
    }
}

impl FromStr for PolicyMode {
    type Err = ScpError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "allow" => Ok(PolicyMode::Allow),
            "deny" => Ok(PolicyMode::Deny),
            _ => Err(ScpError::InvalidMode(value.to_string())),
        }
    }
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
