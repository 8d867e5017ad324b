//! Configuration record persisted per chat.

use serde::{Deserialize, Serialize};

use super::ConfigField;
use crate::domain::foundation::{ChatId, Timestamp};

/// Promotion settings of one chat. Created lazily with empty fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationRecord {
    pub chat_id: ChatId,
    pub token_name: String,
    pub hashtags: String,
    pub cashtags: String,
    pub community: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ConfigurationRecord {
    /// Creates an empty record for a chat.
    pub fn new(chat_id: ChatId) -> Self {
        let now = Timestamp::now();
        Self {
            chat_id,
            token_name: String::new(),
            hashtags: String::new(),
            cashtags: String::new(),
            community: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Current value of a field; empty when unset.
    pub fn get(&self, field: ConfigField) -> &str {
        match field {
            ConfigField::TokenName => &self.token_name,
            ConfigField::Hashtags => &self.hashtags,
            ConfigField::Cashtags => &self.cashtags,
            ConfigField::Community => &self.community,
        }
    }

    /// Stores an already validated value and bumps `updated_at`.
    pub fn set(&mut self, field: ConfigField, value: String) {
        match field {
            ConfigField::TokenName => self.token_name = value,
            ConfigField::Hashtags => self.hashtags = value,
            ConfigField::Cashtags => self.cashtags = value,
            ConfigField::Community => self.community = value,
        }
        self.updated_at = Timestamp::now();
    }

    pub fn clear(&mut self, field: ConfigField) {
        self.set(field, String::new());
    }

    pub fn is_empty(&self) -> bool {
        self.token_name.is_empty()
            && self.hashtags.is_empty()
            && self.cashtags.is_empty()
            && self.community.is_empty()
    }

    /// Extra instruction context describing the configured token.
    ///
    /// Returns `None` when nothing is configured.
    pub fn prompt_context(&self) -> Option<String> {
        let mut lines = Vec::new();
        if !self.token_name.is_empty() {
            lines.push(format!(
                "The token you promote is called {}.",
                self.token_name
            ));
        }
        if !self.hashtags.is_empty() {
            lines.push(format!("Try to include these hashtags: {}.", self.hashtags));
        }
        if !self.cashtags.is_empty() {
            lines.push(format!("Try to include these cashtags: {}.", self.cashtags));
        }
        if !self.community.is_empty() {
            lines.push(format!("About the community: {}", self.community));
        }

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_empty() {
        let record = ConfigurationRecord::new(ChatId::new(5));
        assert!(record.is_empty());
        assert_eq!(record.prompt_context(), None);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn set_and_clear_touch_only_one_field() {
        let mut record = ConfigurationRecord::new(ChatId::new(5));
        record.set(ConfigField::Hashtags, "#a #b".to_string());
        record.set(ConfigField::TokenName, "FISH".to_string());
        assert_eq!(record.get(ConfigField::Hashtags), "#a #b");

        record.clear(ConfigField::Hashtags);
        assert_eq!(record.get(ConfigField::Hashtags), "");
        assert_eq!(record.get(ConfigField::TokenName), "FISH");
    }

    #[test]
    fn prompt_context_lists_configured_fields() {
        let mut record = ConfigurationRecord::new(ChatId::new(5));
        record.set(ConfigField::TokenName, "FISH".to_string());
        record.set(ConfigField::Cashtags, "$FISH".to_string());

        let context = record.prompt_context().unwrap();
        assert!(context.contains("FISH"));
        assert!(context.contains("$FISH"));
        assert!(!context.contains("hashtags"));
    }
}
