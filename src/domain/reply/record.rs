//! Persisted link and reply records.

use serde::{Deserialize, Serialize};

use super::ReplyFlavor;
use crate::domain::foundation::{ChatId, LinkId, Timestamp};

/// A generated deep link, created when a reply flow completes.
///
/// Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedLinkRecord {
    pub id: LinkId,
    pub chat_id: ChatId,
    pub tweet_id: String,
    pub tweet_link: String,
    pub tweet_text: String,
    pub flavor: ReplyFlavor,
    pub created_at: Timestamp,
}

impl GeneratedLinkRecord {
    pub fn new(
        chat_id: ChatId,
        tweet_id: impl Into<String>,
        tweet_link: impl Into<String>,
        tweet_text: impl Into<String>,
        flavor: ReplyFlavor,
    ) -> Self {
        Self {
            id: LinkId::new(),
            chat_id,
            tweet_id: tweet_id.into(),
            tweet_link: tweet_link.into(),
            tweet_text: tweet_text.into(),
            flavor,
            created_at: Timestamp::now(),
        }
    }

    /// Public URL that opens this link through the redirect endpoint.
    pub fn public_url(&self, base_url: &str) -> String {
        format!("{}/shill/{}", base_url.trim_end_matches('/'), self.id)
    }
}

/// A reply produced by the redirect endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRecord {
    pub chat_id: ChatId,
    pub tweet_id: String,
    pub link_id: LinkId,
    pub reply: String,
    pub created_at: Timestamp,
}

impl ReplyRecord {
    pub fn for_link(link: &GeneratedLinkRecord, reply: impl Into<String>) -> Self {
        Self {
            chat_id: link.chat_id,
            tweet_id: link.tweet_id.clone(),
            link_id: link.id,
            reply: reply.into(),
            created_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> GeneratedLinkRecord {
        GeneratedLinkRecord::new(
            ChatId::new(1),
            "99",
            "https://x.com/a/status/99",
            "gm",
            ReplyFlavor::Troll,
        )
    }

    #[test]
    fn public_url_ends_with_link_id() {
        let link = link();
        let url = link.public_url("https://api.example.com/");
        assert_eq!(url, format!("https://api.example.com/shill/{}", link.id));
    }

    #[test]
    fn reply_record_copies_link_identity() {
        let link = link();
        let reply = ReplyRecord::for_link(&link, "lol");
        assert_eq!(reply.chat_id, link.chat_id);
        assert_eq!(reply.tweet_id, "99");
        assert_eq!(reply.link_id, link.id);
    }
}
