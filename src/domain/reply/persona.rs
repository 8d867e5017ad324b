//! Persona table: the voice used for generated replies, per chat.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use super::ReplyFlavor;
use crate::domain::foundation::ChatId;

const DEFAULT_SHILL: &str = "You are a crypto degen and an enthusiast of a new memecoin. \
    You love to reply to tweets related to crypto and use the opportunity to promote \
    the coin and its awesome community. \
    You are cheeky and keen to mention the massive gains the coin will bring. \
    You can disparage other coins in a friendly way. \
    Keep the number of hashtags to a maximum of four but ideally keep to two";

const DEFAULT_TROLL: &str = "You are a twitter troll who enjoys making fun of other users tweets. \
    You can verge on being rude but always keep responses light hearted. \
    You can disparage others but in a jokey way. \
    You never promote harm, racism, homophobia, transphobia \
    or have any strong political views. \
    Keep the number of hashtags to a maximum of four but ideally keep to two";

/// Errors raised while loading a persona table.
#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("Failed to read persona file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse persona file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Persona '{name}' has no {flavor} instructions")]
    MissingVariants { name: String, flavor: ReplyFlavor },
}

/// One persona: instruction variants per flavor and an optional footer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Persona {
    pub name: String,
    pub shill: Vec<String>,
    pub troll: Vec<String>,
    /// Footer appended to the result message, e.g. "Powered by ...".
    #[serde(default)]
    pub powered_by: Option<String>,
}

impl Persona {
    /// Picks one instruction variant for the flavor.
    pub fn instruction<R: Rng + ?Sized>(&self, flavor: ReplyFlavor, rng: &mut R) -> &str {
        let variants = match flavor {
            ReplyFlavor::Shill => &self.shill,
            ReplyFlavor::Troll => &self.troll,
        };
        variants.choose(rng).map(String::as_str).unwrap_or_default()
    }

    fn check(&self) -> Result<(), PersonaError> {
        for (flavor, variants) in [
            (ReplyFlavor::Shill, &self.shill),
            (ReplyFlavor::Troll, &self.troll),
        ] {
            if variants.iter().all(|v| v.trim().is_empty()) {
                return Err(PersonaError::MissingVariants {
                    name: self.name.clone(),
                    flavor,
                });
            }
        }
        Ok(())
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            shill: vec![DEFAULT_SHILL.to_string()],
            troll: vec![DEFAULT_TROLL.to_string()],
            powered_by: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PersonaFile {
    #[serde(default)]
    default: Option<Persona>,
    #[serde(default)]
    chats: Vec<ChatPersona>,
}

#[derive(Debug, Deserialize)]
struct ChatPersona {
    chat_id: i64,
    #[serde(flatten)]
    persona: Persona,
}

/// Personas keyed by chat, with a fallback default.
#[derive(Debug, Clone, Default)]
pub struct PersonaTable {
    default: Persona,
    by_chat: HashMap<ChatId, Persona>,
}

impl PersonaTable {
    pub fn new(default: Persona) -> Self {
        Self {
            default,
            by_chat: HashMap::new(),
        }
    }

    pub fn with_chat(mut self, chat_id: ChatId, persona: Persona) -> Self {
        self.by_chat.insert(chat_id, persona);
        self
    }

    /// Parses a YAML persona table.
    ///
    /// ```yaml
    /// default:
    ///   name: house
    ///   shill: ["..."]
    ///   troll: ["..."]
    /// chats:
    ///   - chat_id: -1002106403888
    ///     name: fish
    ///     shill: ["variant one", "variant two"]
    ///     troll: ["..."]
    ///     powered_by: "Powered by $FISH"
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, PersonaError> {
        let file: PersonaFile = serde_yaml::from_str(yaml)?;
        let default = file.default.unwrap_or_default();
        default.check()?;

        let mut table = Self::new(default);
        for chat in file.chats {
            chat.persona.check()?;
            let chat_id = ChatId::new(chat.chat_id);
            table.by_chat.insert(chat_id, chat.persona);
        }
        Ok(table)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersonaError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Persona for a chat, falling back to the default.
    pub fn for_chat(&self, chat_id: ChatId) -> &Persona {
        self.by_chat.get(&chat_id).unwrap_or(&self.default)
    }

    pub fn len(&self) -> usize {
        self.by_chat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_chat.is_empty()
    }
}
