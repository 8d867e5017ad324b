//! Reply flow: collects a tweet link and its text, then hands out a deep link.
//!
//! The same flow serves `generate-reply` and `troll`; only the flavor differs.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::command_handler::{
    CancelReason, CommandHandler, FlowError, FlowServices, CANCELLED_MESSAGE,
};
use super::prompts::{cancellable, delete_best_effort, purge, reject_input, send_prompt};
use crate::domain::chat::{InboundUpdate, PromptLedger};
use crate::domain::foundation::{ChatId, StateMachine, ValidationError};
use crate::domain::reply::{GeneratedLinkRecord, ReplyFlavor, ReplyStep, TweetLink};
use crate::ports::{Button, InlineKeyboard, OutboundMessage};

pub const TWEET_LINK_PROMPT: &str = "Please provide the tweet link";
pub const TWEET_TEXT_PROMPT: &str = "Please provide the original tweet text";
pub const INVALID_TWEET_LINK: &str = "Invalid tweet link, please try again";
pub const INVALID_TWEET_TEXT: &str = "Invalid tweet text, please try again";

#[derive(Debug, Default)]
struct ReplyState {
    step: ReplyStep,
    tweet: Option<TweetLink>,
    tweet_text: Option<String>,
    ledger: PromptLedger,
    done: bool,
}

/// Handler for the reply flow of one chat.
pub struct ReplyFlow {
    chat_id: ChatId,
    flavor: ReplyFlavor,
    services: FlowServices,
    state: Mutex<ReplyState>,
}

impl ReplyFlow {
    pub fn new(chat_id: ChatId, flavor: ReplyFlavor, services: FlowServices) -> Self {
        Self {
            chat_id,
            flavor,
            services,
            state: Mutex::new(ReplyState::default()),
        }
    }

    pub fn flavor(&self) -> ReplyFlavor {
        self.flavor
    }

    async fn ask_for_link(&self, state: &mut ReplyState) -> Result<(), FlowError> {
        let next = state.step.transition_to(ReplyStep::AwaitingTweetLink)?;
        send_prompt(
            self.services.transport.as_ref(),
            self.chat_id,
            &mut state.ledger,
            cancellable(TWEET_LINK_PROMPT),
        )
        .await?;
        state.step = next;
        Ok(())
    }

    async fn receive_link(
        &self,
        state: &mut ReplyState,
        update: &InboundUpdate,
    ) -> Result<(), FlowError> {
        let Some(text) = update.text_content() else {
            return Ok(());
        };
        let transport = self.services.transport.as_ref();

        let link = match TweetLink::parse(text) {
            Ok(link) => link,
            Err(e) => {
                debug!(chat_id = %self.chat_id, error = %e, "Rejected tweet link");
                reject_input(
                    transport,
                    self.chat_id,
                    &mut state.ledger,
                    update.message_ref,
                    cancellable(INVALID_TWEET_LINK),
                )
                .await?;
                return Ok(());
            }
        };

        let next = state.step.transition_to(ReplyStep::AwaitingTweetText)?;
        delete_best_effort(transport, self.chat_id, update.message_ref).await;
        purge(transport, self.chat_id, &mut state.ledger).await;
        state.tweet = Some(link);
        state.step = next;

        send_prompt(
            transport,
            self.chat_id,
            &mut state.ledger,
            cancellable(TWEET_TEXT_PROMPT),
        )
        .await?;
        Ok(())
    }

    async fn receive_text(
        &self,
        state: &mut ReplyState,
        update: &InboundUpdate,
    ) -> Result<(), FlowError> {
        let Some(text) = update.text_content() else {
            return Ok(());
        };
        let transport = self.services.transport.as_ref();

        if text.trim().is_empty() {
            reject_input(
                transport,
                self.chat_id,
                &mut state.ledger,
                update.message_ref,
                cancellable(INVALID_TWEET_TEXT),
            )
            .await?;
            return Ok(());
        }

        delete_best_effort(transport, self.chat_id, update.message_ref).await;
        purge(transport, self.chat_id, &mut state.ledger).await;
        state.tweet_text = Some(text.to_string());

        self.complete(state).await
    }

    async fn complete(&self, state: &mut ReplyState) -> Result<(), FlowError> {
        let next = state.step.transition_to(ReplyStep::Complete)?;
        let tweet = state
            .tweet
            .as_ref()
            .ok_or_else(|| ValidationError::empty_field("tweet_link"))?;
        let tweet_text = state
            .tweet_text
            .as_deref()
            .ok_or_else(|| ValidationError::empty_field("tweet_text"))?;

        let record = GeneratedLinkRecord::new(
            self.chat_id,
            tweet.tweet_id.clone(),
            tweet.url.clone(),
            tweet_text,
            self.flavor,
        );
        self.services.links.insert(&record).await?;

        let footer = self
            .services
            .personas
            .for_chat(self.chat_id)
            .powered_by
            .as_deref();
        let message = result_message(
            &tweet.url,
            self.flavor,
            &record.public_url(&self.services.public_url),
            footer,
        );
        self.services
            .transport
            .send_message(self.chat_id, message)
            .await?;

        state.step = next;
        state.done = true;
        info!(
            chat_id = %self.chat_id,
            link_id = %record.id,
            flavor = %self.flavor,
            "Generated reply link"
        );
        Ok(())
    }
}

/// Final message of the flow: the tweet, a call to action and the deep link button.
pub fn result_message(
    tweet_url: &str,
    flavor: ReplyFlavor,
    link_url: &str,
    footer: Option<&str>,
) -> OutboundMessage {
    let footer = footer.map(|f| format!("\n\n{}", f)).unwrap_or_default();
    let text = format!(
        "{}\n\nLet's go {} baby!!\n\n\
         Just click on the {} NOW button to generate your own, AI {} reply.{}",
        tweet_url,
        flavor.gerund(),
        flavor.action(),
        flavor.action(),
        footer
    );
    let button = Button::url(format!("{} NOW!!", flavor.action()), link_url);
    OutboundMessage::text(text).with_keyboard(InlineKeyboard::new().row(vec![button]))
}

#[async_trait]
impl CommandHandler for ReplyFlow {
    async fn handle_turn(&self, update: &InboundUpdate) -> Result<(), FlowError> {
        let mut state = self.state.lock().await;
        if state.done {
            return Ok(());
        }

        match state.step {
            ReplyStep::AwaitingInvocation => self.ask_for_link(&mut state).await,
            ReplyStep::AwaitingTweetLink => self.receive_link(&mut state, update).await,
            ReplyStep::AwaitingTweetText => self.receive_text(&mut state, update).await,
            ReplyStep::Complete => Ok(()),
        }
    }

    async fn cancel(&self, reason: CancelReason) {
        let mut state = self.state.lock().await;
        if state.done && state.ledger.is_empty() {
            return;
        }

        let transport = self.services.transport.as_ref();
        purge(transport, self.chat_id, &mut state.ledger).await;
        state.done = true;

        if reason == CancelReason::Requested {
            if let Err(e) = transport
                .send_message(self.chat_id, OutboundMessage::text(CANCELLED_MESSAGE))
                .await
            {
                warn!(chat_id = %self.chat_id, error = %e, "Failed to acknowledge cancel");
            }
        }
        debug!(chat_id = %self.chat_id, ?reason, "Reply flow cancelled");
    }

    async fn reset(&self) -> Result<(), FlowError> {
        let mut state = self.state.lock().await;
        let transport = self.services.transport.as_ref();
        purge(transport, self.chat_id, &mut state.ledger).await;
        state.tweet = None;
        state.tweet_text = None;
        if state.step != ReplyStep::AwaitingInvocation {
            state.step = state.step.transition_to(ReplyStep::AwaitingInvocation)?;
        }
        self.ask_for_link(&mut state).await
    }

    async fn is_done(&self) -> bool {
        self.state.lock().await.done
    }
}
