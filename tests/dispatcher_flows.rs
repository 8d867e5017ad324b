//! End-to-end tests for the command dispatcher.
//!
//! Drives the dispatcher with inbound updates and asserts on what the chat
//! would show, using the recording transport, in-memory stores and the mock
//! AI provider.

use futures::future::join_all;
use std::sync::Arc;

use shillbot::adapters::ai::MockAIProvider;
use shillbot::adapters::memory::{
    InMemoryConfigurationRepository, InMemoryLinkRepository, InMemoryReplyRepository,
    RecordingTransport,
};
use shillbot::application::flows::{
    set_button_data, CANCELLED_MESSAGE, DONE_BUTTON_DATA, INVALID_TWEET_LINK, TWEET_LINK_PROMPT,
};
use shillbot::application::{
    ChatStateStore, CommandDispatcher, DispatchOutcome, FlowServices, IgnoreReason,
    RedeemLinkHandler, ReplyGenerator,
};
use shillbot::domain::chat::{ActiveCommand, InboundUpdate, UserIdentity};
use shillbot::domain::configuration::ConfigField;
use shillbot::domain::foundation::{ChatId, LinkId, MessageRef, UserId};
use shillbot::domain::reply::{PersonaTable, ReplyFlavor};
use shillbot::ports::{ButtonAction, ConfigurationRepository, LinkRepository};

// =============================================================================
// Test Infrastructure
// =============================================================================

const CHAT: ChatId = ChatId::new(-1001);
const OWNER: i64 = 7;
const STRANGER: i64 = 8;

struct Harness {
    transport: Arc<RecordingTransport>,
    links: Arc<InMemoryLinkRepository>,
    configurations: Arc<InMemoryConfigurationRepository>,
    store: Arc<ChatStateStore>,
    dispatcher: CommandDispatcher,
    next_message: std::sync::atomic::AtomicI64,
}

impl Harness {
    fn new() -> Self {
        let transport = Arc::new(RecordingTransport::new());
        let links = Arc::new(InMemoryLinkRepository::new());
        let configurations = Arc::new(InMemoryConfigurationRepository::new());
        let store = Arc::new(ChatStateStore::new());
        let services = FlowServices {
            transport: transport.clone(),
            links: links.clone(),
            configurations: configurations.clone(),
            personas: Arc::new(PersonaTable::default()),
            public_url: "https://shill.example.com".to_string(),
        };
        Self {
            transport,
            links,
            configurations,
            store: store.clone(),
            dispatcher: CommandDispatcher::new(store, services),
            next_message: std::sync::atomic::AtomicI64::new(1),
        }
    }

    fn message_ref(&self) -> MessageRef {
        MessageRef::new(
            self.next_message
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst),
        )
    }

    async fn text(&self, user: i64, body: &str) -> DispatchOutcome {
        let update = InboundUpdate::text(
            CHAT,
            UserIdentity::new(UserId::new(user)),
            self.message_ref(),
            body,
        );
        self.dispatcher.dispatch(update).await
    }

    async fn press(&self, user: i64, data: &str) -> DispatchOutcome {
        let update = InboundUpdate::button(
            CHAT,
            UserIdentity::new(UserId::new(user)),
            self.message_ref(),
            data,
            format!("cb-{}", data),
        );
        self.dispatcher.dispatch(update).await
    }

    async fn visible_texts(&self) -> Vec<String> {
        self.transport
            .visible_messages(CHAT)
            .await
            .into_iter()
            .map(|m| m.text)
            .collect()
    }
}

// =============================================================================
// Reply flow
// =============================================================================

#[tokio::test]
async fn generate_reply_happy_path_leaves_one_result_message() {
    let h = Harness::new();

    assert_eq!(
        h.text(OWNER, "/generate-reply").await,
        DispatchOutcome::Started(ActiveCommand::GenerateReply)
    );
    assert_eq!(
        h.text(OWNER, "https://twitter.com/alice/status/1234567890?s=20").await,
        DispatchOutcome::Continued(ActiveCommand::GenerateReply)
    );
    assert_eq!(
        h.text(OWNER, "gm to everyone except bears").await,
        DispatchOutcome::Completed(ActiveCommand::GenerateReply)
    );

    let visible = h.transport.visible_messages(CHAT).await;
    assert_eq!(visible.len(), 1);
    let expected = "https://twitter.com/alice/status/1234567890\n\nLet's go shilling baby!!";
    assert!(visible[0].text.starts_with(expected));

    let keyboard = visible[0].keyboard.clone().unwrap();
    let button = keyboard.buttons().next().unwrap().clone();
    assert_eq!(button.label, "SHILL NOW!!");
    let ButtonAction::Url(url) = button.action else {
        panic!("expected a url button");
    };
    assert!(url.starts_with("https://shill.example.com/shill/"));

    let id: LinkId = url.rsplit('/').next().unwrap().parse().unwrap();
    let link = h.links.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(link.tweet_id, "1234567890");
    assert_eq!(
        link.tweet_link,
        "https://twitter.com/alice/status/1234567890"
    );
    assert_eq!(link.flavor, ReplyFlavor::Shill);

    assert!(h.store.resolve(CHAT).await.is_none());
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn non_owner_updates_are_dropped() {
    let h = Harness::new();
    h.text(OWNER, "/troll").await;

    let outcome = h.text(STRANGER, "https://x.com/bob/status/1").await;

    assert_eq!(outcome, DispatchOutcome::Ignored(IgnoreReason::NotOwner));
    assert_eq!(h.visible_texts().await, vec![TWEET_LINK_PROMPT]);
    assert!(h.transport.deleted_messages(CHAT).await.is_empty());

    assert_eq!(
        h.text(OWNER, "https://x.com/bob/status/1").await,
        DispatchOutcome::Continued(ActiveCommand::Troll)
    );
}

#[tokio::test]
async fn invalid_link_reprompts_without_advancing() {
    let h = Harness::new();
    h.text(OWNER, "/generate_reply").await;

    let outcome = h.text(OWNER, "https://example.com/alice/status/1").await;

    assert_eq!(
        outcome,
        DispatchOutcome::Continued(ActiveCommand::GenerateReply)
    );
    // The first instruction stays, followed by the error prompt.
    let expected = vec![TWEET_LINK_PROMPT, INVALID_TWEET_LINK];
    assert_eq!(h.visible_texts().await, expected);

    h.text(OWNER, "still wrong").await;
    assert_eq!(h.visible_texts().await, expected);
}

#[tokio::test]
async fn command_words_are_accepted_as_tweet_text() {
    for word in ["help", "cancel", "troll"] {
        let h = Harness::new();
        h.text(OWNER, "/generate-reply").await;
        h.text(OWNER, "https://x.com/bob/status/5").await;

        assert_eq!(
            h.text(OWNER, word).await,
            DispatchOutcome::Completed(ActiveCommand::GenerateReply),
            "{word}"
        );
        let visible = h.transport.visible_messages(CHAT).await;
        assert_eq!(visible.len(), 1);
        assert!(visible[0].text.starts_with("https://x.com/bob/status/5"));
    }
}

#[tokio::test]
async fn plain_command_word_does_not_start_a_flow() {
    let h = Harness::new();

    assert_eq!(
        h.text(STRANGER, "troll").await,
        DispatchOutcome::Ignored(IgnoreReason::Idle)
    );
    assert!(h.visible_texts().await.is_empty());
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn cancel_purges_prompts_and_acknowledges() {
    let h = Harness::new();
    h.text(OWNER, "/troll").await;
    h.text(OWNER, "https://x.com/bob/status/99").await;

    assert_eq!(
        h.text(OWNER, "/cancel").await,
        DispatchOutcome::Cancelled(ActiveCommand::Troll)
    );
    assert_eq!(h.visible_texts().await, vec![CANCELLED_MESSAGE]);
    assert!(h.store.resolve(CHAT).await.is_none());

    // Nothing is active anymore.
    assert_eq!(
        h.text(OWNER, "gm").await,
        DispatchOutcome::Ignored(IgnoreReason::Idle)
    );
}

#[tokio::test]
async fn cancel_button_cancels() {
    let h = Harness::new();
    h.text(OWNER, "/generate-reply").await;

    assert_eq!(
        h.press(OWNER, "cancel").await,
        DispatchOutcome::Cancelled(ActiveCommand::GenerateReply)
    );
    assert_eq!(h.visible_texts().await, vec![CANCELLED_MESSAGE]);
    assert_eq!(
        h.transport.answered_buttons().await,
        vec!["cb-cancel".to_string()]
    );
}

#[tokio::test]
async fn new_command_supersedes_the_active_one() {
    let h = Harness::new();
    h.text(OWNER, "/generate-reply").await;

    let outcome = h.text(OWNER, "/configure").await;

    assert_eq!(
        outcome,
        DispatchOutcome::Superseded {
            previous: ActiveCommand::GenerateReply,
            current: ActiveCommand::Configure,
        }
    );
    let visible = h.visible_texts().await;
    assert_eq!(visible.len(), 1);
    assert!(visible[0].starts_with("Current configuration:"));
    assert_eq!(
        h.store.resolve(CHAT).await.unwrap().active,
        Some(ActiveCommand::Configure)
    );
}

// =============================================================================
// Configure flow
// =============================================================================

#[tokio::test]
async fn invalid_hashtags_then_valid_hashtags_are_stored() {
    let h = Harness::new();
    h.text(OWNER, "/configure").await;
    let set_hashtags = set_button_data(ConfigField::Hashtags);
    h.press(OWNER, &set_hashtags).await;

    let outcome = h.text(OWNER, "FISH MOON").await;
    assert_eq!(
        outcome,
        DispatchOutcome::Continued(ActiveCommand::Configure)
    );
    let visible = h.visible_texts().await;
    assert_eq!(visible.len(), 2);
    assert!(visible[0].starts_with("Current configuration:"));
    assert_eq!(visible[1], "Invalid hashtags, please try again");

    h.text(OWNER, "#FISH #MOON").await;
    let visible = h.visible_texts().await;
    assert_eq!(visible.len(), 1);
    assert!(visible[0].contains("<b>Hashtag(s):</b> #FISH #MOON"));

    let record = h.configurations.find_by_chat(CHAT).await.unwrap().unwrap();
    assert_eq!(record.hashtags, "#FISH #MOON");

    assert_eq!(
        h.press(OWNER, DONE_BUTTON_DATA).await,
        DispatchOutcome::Completed(ActiveCommand::Configure)
    );
    assert!(h.visible_texts().await.is_empty());
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn simultaneous_invocations_have_one_owner() {
    let h = Arc::new(Harness::new());

    let outcomes = join_all([
        {
            let h = h.clone();
            tokio::spawn(async move { h.text(OWNER, "/troll").await })
        },
        {
            let h = h.clone();
            tokio::spawn(async move { h.text(STRANGER, "/generate-reply").await })
        },
    ])
    .await;

    let outcomes: Vec<DispatchOutcome> = outcomes.into_iter().map(|r| r.unwrap()).collect();
    let started = outcomes
        .iter()
        .filter(|o| matches!(o, DispatchOutcome::Started(_)))
        .count();
    let ignored = outcomes
        .iter()
        .filter(|o| **o == DispatchOutcome::Ignored(IgnoreReason::NotOwner))
        .count();
    assert_eq!((started, ignored), (1, 1));
    assert_eq!(h.visible_texts().await, vec![TWEET_LINK_PROMPT]);
}

#[tokio::test]
async fn many_chats_progress_independently() {
    let transport = Arc::new(RecordingTransport::new());
    let services = FlowServices {
        transport: transport.clone(),
        links: Arc::new(InMemoryLinkRepository::new()),
        configurations: Arc::new(InMemoryConfigurationRepository::new()),
        personas: Arc::new(PersonaTable::default()),
        public_url: "https://shill.example.com".to_string(),
    };
    let store = Arc::new(ChatStateStore::new());
    let dispatcher = Arc::new(CommandDispatcher::new(store.clone(), services));

    let tasks = (1..=20i64).map(|chat| {
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            let chat_id = ChatId::new(chat);
            let user = UserIdentity::new(UserId::new(chat * 100));
            let mut outcomes = Vec::new();
            for (i, body) in [
                "/troll",
                "https://x.com/a/status/42",
                "wen moon",
            ]
            .into_iter()
            .enumerate()
            {
                let update =
                    InboundUpdate::text(chat_id, user.clone(), MessageRef::new(i as i64 + 1), body);
                outcomes.push(dispatcher.dispatch(update).await);
            }
            outcomes
        })
    });

    for outcomes in join_all(tasks).await {
        let outcomes = outcomes.unwrap();
        assert_eq!(
            outcomes.last(),
            Some(&DispatchOutcome::Completed(ActiveCommand::Troll))
        );
    }
    assert!(store.is_empty().await);
    for chat in 1..=20 {
        assert_eq!(transport.visible_messages(ChatId::new(chat)).await.len(), 1);
    }
}

// =============================================================================
// Redemption
// =============================================================================

#[tokio::test]
async fn redeeming_a_generated_link_retries_over_long_replies() {
    let h = Harness::new();
    h.text(OWNER, "/troll").await;
    h.text(OWNER, "https://x.com/bob/status/777").await;
    h.text(OWNER, "bears are winning").await;

    let visible = h.transport.visible_messages(CHAT).await;
    let keyboard = visible[0].keyboard.clone().unwrap();
    let ButtonAction::Url(url) = keyboard.buttons().next().unwrap().action.clone() else {
        panic!("expected a url button");
    };
    let id: LinkId = url.rsplit('/').next().unwrap().parse().unwrap();

    let provider = Arc::new(
        MockAIProvider::new()
            .with_response("x".repeat(300))
            .with_response("y".repeat(281))
            .with_response("\"not today\""),
    );
    let generator = Arc::new(ReplyGenerator::new(
        provider.clone(),
        Arc::new(PersonaTable::default()),
        h.configurations.clone(),
    ));
    let replies = Arc::new(InMemoryReplyRepository::new());
    let handler = RedeemLinkHandler::new(h.links.clone(), replies.clone(), generator);

    let redeemed = handler.handle(id).await.unwrap();

    assert_eq!(provider.call_count(), 3);
    assert_eq!(redeemed.reply, "not today");
    assert_eq!(
        redeemed.redirect_url,
        "https://twitter.com/intent/tweet?in_reply_to=777&text=not+today"
    );
    assert_eq!(replies.len().await, 1);
}
