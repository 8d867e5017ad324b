//! CommandDispatcher - routes inbound updates to the handler owning the chat.
//!
//! Per chat the dispatcher is a two-state machine: idle, or active with one
//! command owned by the user who invoked it. Only the owner can advance,
//! reset, supersede or cancel the active command; everyone else's updates are
//! dropped. Whatever happens inside a handler, the chat ends up either still
//! owned by a live, unfinished handler or idle.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::chat_state_store::{ChatState, ChatStateStore};
use super::flows::{build_handler, CancelReason, FlowError, FlowServices};
use crate::domain::chat::{ActiveCommand, CommandName, InboundUpdate, UpdatePayload};
use crate::ports::OutboundMessage;

pub const START_MESSAGE: &str = "Let's get shilling!

Send /generate_reply or /troll and I'll walk you through turning a tweet into a one-click AI reply. Use /configure to tell me about your token.";

pub const HELP_MESSAGE: &str = "Commands:
/generate_reply - create a shill reply link for a tweet
/troll - create a troll reply link for a tweet
/configure - set your token name, hashtags, cashtags and community
/cancel - cancel the current command";

/// Why an update was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No command owns the chat.
    Idle,
    /// Another user owns the chat.
    NotOwner,
}

/// What the dispatcher did with an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A new command took ownership of the chat.
    Started(ActiveCommand),
    /// The owner's previous command was cancelled and a new one started.
    Superseded {
        previous: ActiveCommand,
        current: ActiveCommand,
    },
    /// The active handler processed the update and is still running.
    Continued(ActiveCommand),
    /// The owner re-invoked the active command, which went back to its first step.
    Reset(ActiveCommand),
    /// The handler finished; the chat is idle again.
    Completed(ActiveCommand),
    /// The owner cancelled; the chat is idle again.
    Cancelled(ActiveCommand),
    /// The handler failed; the chat is idle again.
    Failed(ActiveCommand),
    /// An informational command was answered without taking ownership.
    Informational,
    Ignored(IgnoreReason),
}

/// Entry point for every inbound update.
pub struct CommandDispatcher {
    store: Arc<ChatStateStore>,
    services: FlowServices,
}

impl CommandDispatcher {
    pub fn new(store: Arc<ChatStateStore>, services: FlowServices) -> Self {
        Self { store, services }
    }

    pub fn store(&self) -> &Arc<ChatStateStore> {
        &self.store
    }

    /// Processes one update. Never fails: errors are reported to the chat.
    pub async fn dispatch(&self, update: InboundUpdate) -> DispatchOutcome {
        let chat_id = update.chat_id;

        if let UpdatePayload::Button { callback_id, .. } = &update.payload {
            if let Err(e) = self.services.transport.answer_button(callback_id).await {
                debug!(chat_id = %chat_id, error = %e, "Failed to answer button press");
            }
        }

        let command = update.text_content().and_then(CommandName::parse);
        if let Some(text) = command.and_then(informational_text) {
            self.send_best_effort(&update, text).await;
            return DispatchOutcome::Informational;
        }

        let lane = self.store.lane(chat_id).await;
        let outcome = {
            let mut state = lane.lock().await;
            self.dispatch_in_lane(&mut state, &update, command).await
        };
        drop(lane);

        if self.store.evict_if_idle(chat_id).await {
            debug!(chat_id = %chat_id, "Evicted idle chat");
        }

        debug!(chat_id = %chat_id, user_id = %update.user_id(), ?outcome, "Dispatched update");
        outcome
    }

    async fn dispatch_in_lane(
        &self,
        state: &mut ChatState,
        update: &InboundUpdate,
        command: Option<CommandName>,
    ) -> DispatchOutcome {
        let is_cancel = command == Some(CommandName::Cancel) || update.is_cancel_button();

        let (Some(active), Some(owner), Some(handler)) =
            (state.active, state.initiating_user.clone(), state.handler.clone())
        else {
            // Idle chat: only a flow command does anything.
            return match command.and_then(|c| c.as_active()) {
                Some(new_command) if !is_cancel => self.start(state, new_command, update).await,
                _ => DispatchOutcome::Ignored(IgnoreReason::Idle),
            };
        };

        if owner.id != update.user_id() {
            debug!(
                chat_id = %update.chat_id,
                user_id = %update.user_id(),
                owner_id = %owner.id,
                command = %active,
                "Dropped update from non-owner"
            );
            return DispatchOutcome::Ignored(IgnoreReason::NotOwner);
        }

        if is_cancel {
            handler.cancel(CancelReason::Requested).await;
            state.clear();
            info!(chat_id = %update.chat_id, command = %active, "Command cancelled");
            return DispatchOutcome::Cancelled(active);
        }

        match command.and_then(|c| c.as_active()) {
            Some(new_command) if new_command == active => {
                let result = handler.reset().await;
                let outcome = DispatchOutcome::Reset(active);
                self.settle(state, update, active, result, outcome).await
            }
            Some(new_command) => {
                handler.cancel(CancelReason::Superseded).await;
                state.clear();
                info!(
                    chat_id = %update.chat_id,
                    previous = %active,
                    current = %new_command,
                    "Command superseded"
                );
                match self.start(state, new_command, update).await {
                    DispatchOutcome::Started(current) => DispatchOutcome::Superseded {
                        previous: active,
                        current,
                    },
                    other => other,
                }
            }
            None => {
                let result = handler.handle_turn(update).await;
                let outcome = DispatchOutcome::Continued(active);
                self.settle(state, update, active, result, outcome).await
            }
        }
    }

    async fn start(
        &self,
        state: &mut ChatState,
        command: ActiveCommand,
        update: &InboundUpdate,
    ) -> DispatchOutcome {
        let handler = build_handler(command, update.chat_id, &self.services);
        *state = ChatState::active(command, update.user.clone(), handler.clone());
        info!(
            chat_id = %update.chat_id,
            user_id = %update.user_id(),
            command = %command,
            "Command started"
        );

        let result = handler.handle_turn(update).await;
        let outcome = DispatchOutcome::Started(command);
        self.settle(state, update, command, result, outcome).await
    }

    /// Applies the result of a handler call to the chat state.
    async fn settle(
        &self,
        state: &mut ChatState,
        update: &InboundUpdate,
        command: ActiveCommand,
        result: Result<(), FlowError>,
        running: DispatchOutcome,
    ) -> DispatchOutcome {
        let Some(handler) = state.handler.clone() else {
            state.clear();
            return DispatchOutcome::Failed(command);
        };

        match result {
            Ok(()) if handler.is_done().await => {
                state.clear();
                info!(chat_id = %update.chat_id, command = %command, "Command completed");
                DispatchOutcome::Completed(command)
            }
            Ok(()) => running,
            Err(e) => {
                warn!(
                    chat_id = %update.chat_id,
                    command = %command,
                    error = %e,
                    "Command failed"
                );
                handler.cancel(CancelReason::Failed).await;
                state.clear();
                self.send_best_effort(update, e.user_message()).await;
                DispatchOutcome::Failed(command)
            }
        }
    }

    async fn send_best_effort(&self, update: &InboundUpdate, text: &str) {
        if let Err(e) = self
            .services
            .transport
            .send_message(update.chat_id, OutboundMessage::text(text))
            .await
        {
            warn!(chat_id = %update.chat_id, error = %e, "Failed to send message");
        }
    }
}

fn informational_text(command: CommandName) -> Option<&'static str> {
    match command {
        CommandName::Start => Some(START_MESSAGE),
        CommandName::Help => Some(HELP_MESSAGE),
        _ => None,
    }
}
