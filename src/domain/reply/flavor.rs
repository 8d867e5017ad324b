//! Reply flavor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tone of the generated reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyFlavor {
    #[default]
    Shill,
    Troll,
}

impl ReplyFlavor {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyFlavor::Shill => "shill",
            ReplyFlavor::Troll => "troll",
        }
    }

    /// Upper-case action word used in the result message and its button.
    pub fn action(&self) -> &'static str {
        match self {
            ReplyFlavor::Shill => "SHILL",
            ReplyFlavor::Troll => "TROLL",
        }
    }

    pub fn gerund(&self) -> &'static str {
        match self {
            ReplyFlavor::Shill => "shilling",
            ReplyFlavor::Troll => "trolling",
        }
    }
}

impl fmt::Display for ReplyFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReplyFlavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shill" => Ok(ReplyFlavor::Shill),
            "troll" => Ok(ReplyFlavor::Troll),
            other => Err(format!("unknown reply flavor: {}", other)),
        }
    }
}
