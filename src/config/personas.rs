//! Persona table location

use serde::Deserialize;
use std::path::PathBuf;

/// Where to load the persona table from.
///
/// Without a path the built-in default persona serves every chat.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonaConfig {
    /// YAML file with a default persona and per-chat personas
    pub path: Option<PathBuf>,
}
