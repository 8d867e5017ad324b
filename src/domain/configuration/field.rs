//! Configurable fields and their validators.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Maximum length of a community description, in characters.
pub const MAX_COMMUNITY_CHARS: usize = 500;

static TOKEN_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{L}\p{N}]+$").unwrap());

static HASHTAGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#[\p{L}\p{N}_]+)( #[\p{L}\p{N}_]+)*$").unwrap());

static CASHTAGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\$[A-Za-z0-9]+)( \$[A-Za-z0-9]+)*$").unwrap());

/// A field of the configuration record that the user can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigField {
    TokenName,
    Hashtags,
    Cashtags,
    Community,
}

impl ConfigField {
    /// Validates raw user input and returns the value to store.
    ///
    /// Token names are stored upper-cased. Every other field is stored as
    /// typed, so whitespace matters: `#a  #b` is rejected.
    pub fn validate(&self, input: &str) -> Result<String, ValidationError> {
        match self {
            ConfigField::TokenName => {
                if TOKEN_NAME.is_match(input) {
                    Ok(input.to_uppercase())
                } else {
                    Err(ValidationError::invalid_format(
                        self.key(),
                        "only letters and digits are allowed",
                    ))
                }
            }
            ConfigField::Hashtags => {
                if HASHTAGS.is_match(input) {
                    Ok(input.to_string())
                } else {
                    Err(ValidationError::invalid_format(
                        self.key(),
                        "expected space separated #tags",
                    ))
                }
            }
            ConfigField::Cashtags => {
                if CASHTAGS.is_match(input) {
                    Ok(input.to_string())
                } else {
                    Err(ValidationError::invalid_format(
                        self.key(),
                        "expected space separated $TAGS",
                    ))
                }
            }
            ConfigField::Community => {
                let len = input.chars().count();
                if len > MAX_COMMUNITY_CHARS {
                    Err(ValidationError::too_long(
                        self.key(),
                        MAX_COMMUNITY_CHARS,
                        len,
                    ))
                } else {
                    Ok(input.to_string())
                }
            }
        }
    }

    /// Whether the field can be emptied from its prompt.
    pub fn is_clearable(&self) -> bool {
        !matches!(self, ConfigField::TokenName)
    }

    /// Stable key, also used as button data and column name.
    pub fn key(&self) -> &'static str {
        match self {
            ConfigField::TokenName => "token_name",
            ConfigField::Hashtags => "hashtags",
            ConfigField::Cashtags => "cashtags",
            ConfigField::Community => "community",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "token_name" => Some(ConfigField::TokenName),
            "hashtags" => Some(ConfigField::Hashtags),
            "cashtags" => Some(ConfigField::Cashtags),
            "community" => Some(ConfigField::Community),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
