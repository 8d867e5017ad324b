//! Command names and the command that owns a chat.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A command token recognised in an inbound text message.
///
/// Only bot commands count: the trimmed text must start with `/`. Names are
/// matched case-sensitively and a trailing `@botname` mention is accepted, so
/// `/troll@shill_bot` parses as [`CommandName::Troll`] while a plain `troll`
/// is ordinary text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    GenerateReply,
    Troll,
    Configure,
    Cancel,
    Start,
    Help,
}

impl CommandName {
    /// Parses a message text into a command, if it is one.
    pub fn parse(text: &str) -> Option<Self> {
        let token = text.trim().strip_prefix('/')?;
        let token = match token.split_once('@') {
            Some((name, _bot)) => name,
            None => token,
        };

        match token {
            "generate-reply" | "generate_reply" => Some(Self::GenerateReply),
            "troll" => Some(Self::Troll),
            "configure" => Some(Self::Configure),
            "cancel" => Some(Self::Cancel),
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            _ => None,
        }
    }

    /// The flow this command starts, if it starts one.
    ///
    /// `cancel`, `start` and `help` never take ownership of a chat.
    pub fn as_active(&self) -> Option<ActiveCommand> {
        match self {
            Self::GenerateReply => Some(ActiveCommand::GenerateReply),
            Self::Troll => Some(ActiveCommand::Troll),
            Self::Configure => Some(ActiveCommand::Configure),
            Self::Cancel | Self::Start | Self::Help => None,
        }
    }
}

/// The command currently owning a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveCommand {
    GenerateReply,
    Troll,
    Configure,
}

impl fmt::Display for ActiveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActiveCommand::GenerateReply => "generate-reply",
            ActiveCommand::Troll => "troll",
            ActiveCommand::Configure => "configure",
        };
        write!(f, "{}", s)
    }
}
