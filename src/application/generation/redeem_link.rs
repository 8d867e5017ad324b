//! RedeemLinkHandler - resolves a generated link into a reply-intent redirect.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use super::{ReplyGenerationError, ReplyGenerator};
use crate::domain::foundation::{DomainError, LinkId};
use crate::domain::reply::{GeneratedLinkRecord, ReplyRecord};
use crate::ports::{LinkRepository, ReplyRepository};

const TWEET_INTENT_URL: &str = "https://twitter.com/intent/tweet";

/// Errors from redeeming a link.
#[derive(Debug, Error)]
pub enum RedeemError {
    #[error("link {0} not found")]
    NotFound(LinkId),

    #[error(transparent)]
    Generation(#[from] ReplyGenerationError),

    #[error("storage failure: {0}")]
    Storage(#[from] DomainError),
}

/// Outcome of a successful redemption.
#[derive(Debug, Clone)]
pub struct RedeemedLink {
    pub link: GeneratedLinkRecord,
    pub reply: String,
    pub redirect_url: String,
}

/// Handler for redeeming generated links.
pub struct RedeemLinkHandler {
    links: Arc<dyn LinkRepository>,
    replies: Arc<dyn ReplyRepository>,
    generator: Arc<ReplyGenerator>,
}

impl RedeemLinkHandler {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        replies: Arc<dyn ReplyRepository>,
        generator: Arc<ReplyGenerator>,
    ) -> Self {
        Self {
            links,
            replies,
            generator,
        }
    }

    pub async fn handle(&self, link_id: LinkId) -> Result<RedeemedLink, RedeemError> {
        // 1. Look up the link
        let link = self
            .links
            .find_by_id(&link_id)
            .await?
            .ok_or(RedeemError::NotFound(link_id))?;

        // 2. Generate the reply
        let reply = self.generator.generate(&link).await?;

        // 3. Record it; the user still gets the redirect if this fails
        let record = ReplyRecord::for_link(&link, reply.clone());
        if let Err(e) = self.replies.insert(&record).await {
            warn!(link_id = %link_id, error = %e, "Unable to store generated reply");
        }

        let redirect_url = intent_url(&link.tweet_id, &reply);
        info!(link_id = %link_id, chat_id = %link.chat_id, "Redeemed reply link");

        Ok(RedeemedLink {
            link,
            reply,
            redirect_url,
        })
    }
}

/// Reply intent URL with the tweet id and url-encoded reply text.
pub fn intent_url(tweet_id: &str, reply: &str) -> String {
    let params = [("in_reply_to", tweet_id), ("text", reply)];
    match Url::parse_with_params(TWEET_INTENT_URL, &params) {
        Ok(url) => url.to_string(),
        Err(_) => TWEET_INTENT_URL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::memory::{
        InMemoryConfigurationRepository, InMemoryLinkRepository, InMemoryReplyRepository,
    };
    use crate::domain::foundation::ChatId;
    use crate::domain::reply::{PersonaTable, ReplyFlavor};

    struct Fixture {
        links: Arc<InMemoryLinkRepository>,
        replies: Arc<InMemoryReplyRepository>,
        handler: RedeemLinkHandler,
    }

    fn fixture(provider: MockAIProvider, replies: InMemoryReplyRepository) -> Fixture {
        let links = Arc::new(InMemoryLinkRepository::new());
        let replies = Arc::new(replies);
        let generator = Arc::new(ReplyGenerator::new(
            Arc::new(provider),
            Arc::new(PersonaTable::default()),
            Arc::new(InMemoryConfigurationRepository::new()),
        ));
        let handler = RedeemLinkHandler::new(links.clone(), replies.clone(), generator);
        Fixture {
            links,
            replies,
            handler,
        }
    }

    async fn stored_link(links: &InMemoryLinkRepository) -> GeneratedLinkRecord {
        let link = GeneratedLinkRecord::new(
            ChatId::new(1),
            "1761",
            "https://x.com/a/status/1761",
            "gm",
            ReplyFlavor::Shill,
        );
        links.insert(&link).await.unwrap();
        link
    }

    #[test]
    fn intent_url_encodes_reply() {
        let url = intent_url("42", "to the moon & back #FISH");
        assert_eq!(
            url,
            "https://twitter.com/intent/tweet?in_reply_to=42&text=to+the+moon+%26+back+%23FISH"
        );
    }

    #[tokio::test]
    async fn redeems_link_and_records_reply() {
        let fx = fixture(
            MockAIProvider::new().with_response("\"wagmi\""),
            InMemoryReplyRepository::new(),
        );
        let link = stored_link(&fx.links).await;

        let redeemed = fx.handler.handle(link.id).await.unwrap();

        assert_eq!(redeemed.reply, "wagmi");
        assert_eq!(
            redeemed.redirect_url,
            "https://twitter.com/intent/tweet?in_reply_to=1761&text=wagmi"
        );
        let stored = fx.replies.find_by_link(&link.id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].reply, "wagmi");
    }

    #[tokio::test]
    async fn unknown_link_is_not_found() {
        let fx = fixture(MockAIProvider::new(), InMemoryReplyRepository::new());
        let id = LinkId::new();

        let err = fx.handler.handle(id).await.unwrap_err();
        assert!(matches!(
            err,
            RedeemError::NotFound(missing) if missing == id
        ));
    }

    #[tokio::test]
    async fn reply_storage_failure_still_redirects() {
        let fx = fixture(
            MockAIProvider::new().with_response("ok"),
            InMemoryReplyRepository::failing(),
        );
        let link = stored_link(&fx.links).await;

        let redeemed = fx.handler.handle(link.id).await.unwrap();
        assert!(redeemed.redirect_url.ends_with("text=ok"));
    }

    #[tokio::test]
    async fn over_long_replies_fail_the_redemption() {
        let fx = fixture(
            MockAIProvider::new().with_fallback("a".repeat(400)),
            InMemoryReplyRepository::new(),
        );
        let link = stored_link(&fx.links).await;

        let err = fx.handler.handle(link.id).await.unwrap_err();
        assert!(matches!(
            err,
            RedeemError::Generation(ReplyGenerationError::LengthExceeded { .. })
        ));
    }
}
