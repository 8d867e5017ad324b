//! Configure flow: menu-driven editing of a chat's promotion settings.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::command_handler::{
    CancelReason, CommandHandler, FlowError, FlowServices, CANCELLED_MESSAGE,
};
use super::prompts::{delete_best_effort, purge, reject_input, send_prompt};
use crate::domain::chat::{InboundUpdate, PromptLedger, UpdatePayload, CANCEL_BUTTON_DATA};
use crate::domain::configuration::{ConfigField, ConfigStep, ConfigurationRecord};
use crate::domain::foundation::{ChatId, StateMachine};
use crate::ports::{Button, InlineKeyboard, OutboundMessage};

pub const DONE_BUTTON_DATA: &str = "done";
pub const BACK_BUTTON_DATA: &str = "back";
pub const CLEAR_BUTTON_DATA: &str = "clear";
const SET_PREFIX: &str = "set:";

const NOT_SET: &str = "<i>Not set</i>";

const HASHTAG_PROMPT: &str = "What hashtag should I use when shilling your token?

You can set multiple hashtags but I'll only use one or two at a time.

Multiple hashtags should be separated by spaces e.g.
#MyAwesomeToken #MYTOKENTOTHEMOON #MyTokenIsTheBest

Make sure your primary hashtag is set first.";

const CASHTAG_PROMPT: &str = "What cashtag should I use when shilling your token?

e.g. $MYTOKEN";

const COMMUNITY_PROMPT: &str = "Describe your community (max. 500 chars).

Your description will help me create better shill responses.";

fn field_prompt(field: ConfigField) -> &'static str {
    match field {
        ConfigField::TokenName => "What is the name of your token?",
        ConfigField::Hashtags => HASHTAG_PROMPT,
        ConfigField::Cashtags => CASHTAG_PROMPT,
        ConfigField::Community => COMMUNITY_PROMPT,
    }
}

/// Error prompt shown when a value fails validation.
pub fn invalid_field_prompt(field: ConfigField) -> &'static str {
    match field {
        ConfigField::TokenName => "Invalid token name, please try again",
        ConfigField::Hashtags => "Invalid hashtags, please try again",
        ConfigField::Cashtags => "Invalid cashtags, please try again",
        ConfigField::Community => "Invalid description, please try again",
    }
}

/// Button data that opens a field prompt.
pub fn set_button_data(field: ConfigField) -> String {
    format!("{}{}", SET_PREFIX, field.key())
}

fn set_button(label: &str, field: ConfigField) -> Button {
    Button::callback(label, set_button_data(field))
}

fn menu_keyboard() -> InlineKeyboard {
    InlineKeyboard::new()
        .row(vec![
            set_button("Set Token Name", ConfigField::TokenName),
            set_button("Describe Community", ConfigField::Community),
        ])
        .row(vec![
            set_button("Set Hashtag(s)", ConfigField::Hashtags),
            set_button("Set Cashtag(s)", ConfigField::Cashtags),
        ])
        .row(vec![Button::callback("Done", DONE_BUTTON_DATA)])
}

fn field_keyboard(field: ConfigField) -> InlineKeyboard {
    let keyboard = InlineKeyboard::new().row(vec![
        Button::callback("Back", BACK_BUTTON_DATA),
        Button::callback("Cancel", CANCEL_BUTTON_DATA),
    ]);
    if field.is_clearable() {
        keyboard.row(vec![Button::callback("Clear", CLEAR_BUTTON_DATA)])
    } else {
        keyboard
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn display_value(value: &str) -> String {
    if value.is_empty() {
        NOT_SET.to_string()
    } else {
        escape_html(value)
    }
}

/// HTML summary of a configuration record.
pub fn menu_text(record: &ConfigurationRecord) -> String {
    format!(
        "Current configuration:\n\n\
         <b>Token name:</b> {}\n\
         <b>Hashtag(s):</b> {}\n\
         <b>Cashtag(s):</b> {}\n\
         <b>Community:</b> {}",
        display_value(&record.token_name),
        display_value(&record.hashtags),
        display_value(&record.cashtags),
        display_value(&record.community),
    )
}

#[derive(Debug)]
struct ConfigState {
    step: ConfigStep,
    ledger: PromptLedger,
    done: bool,
}

/// Handler for the configure flow of one chat.
pub struct ConfigureFlow {
    chat_id: ChatId,
    services: FlowServices,
    state: Mutex<ConfigState>,
}

impl ConfigureFlow {
    pub fn new(chat_id: ChatId, services: FlowServices) -> Self {
        Self {
            chat_id,
            services,
            state: Mutex::new(ConfigState {
                step: ConfigStep::Start,
                ledger: PromptLedger::new(),
                done: false,
            }),
        }
    }

    async fn show_menu(&self, state: &mut ConfigState) -> Result<(), FlowError> {
        let next = state.step.transition_to(ConfigStep::Menu)?;
        let record = self
            .services
            .configurations
            .find_or_create(self.chat_id)
            .await?;
        let transport = self.services.transport.as_ref();

        purge(transport, self.chat_id, &mut state.ledger).await;
        send_prompt(
            transport,
            self.chat_id,
            &mut state.ledger,
            OutboundMessage::html(menu_text(&record))
                .with_keyboard(menu_keyboard()),
        )
        .await?;
        state.step = next;
        Ok(())
    }

    async fn ask_for(&self, state: &mut ConfigState, field: ConfigField) -> Result<(), FlowError> {
        let next = state.step.transition_to(ConfigStep::Awaiting(field))?;
        send_prompt(
            self.services.transport.as_ref(),
            self.chat_id,
            &mut state.ledger,
            OutboundMessage::text(field_prompt(field))
                .with_keyboard(field_keyboard(field)),
        )
        .await?;
        state.step = next;
        Ok(())
    }

    async fn finish(&self, state: &mut ConfigState) -> Result<(), FlowError> {
        let next = state.step.transition_to(ConfigStep::Closed)?;
        let transport = self.services.transport.as_ref();
        purge(transport, self.chat_id, &mut state.ledger).await;
        state.step = next;
        state.done = true;
        info!(chat_id = %self.chat_id, "Configuration closed");
        Ok(())
    }

    async fn store(&self, field: ConfigField, value: Option<String>) -> Result<(), FlowError> {
        let mut record = self
            .services
            .configurations
            .find_or_create(self.chat_id)
            .await?;
        match value {
            Some(value) => record.set(field, value),
            None => record.clear(field),
        }
        self.services.configurations.update(&record).await?;
        info!(chat_id = %self.chat_id, field = %field, "Configuration updated");
        Ok(())
    }

    async fn receive_value(
        &self,
        state: &mut ConfigState,
        field: ConfigField,
        update: &InboundUpdate,
        text: &str,
    ) -> Result<(), FlowError> {
        let transport = self.services.transport.as_ref();
        match field.validate(text) {
            Ok(value) => {
                self.store(field, Some(value)).await?;
                delete_best_effort(transport, self.chat_id, update.message_ref).await;
                self.show_menu(state).await
            }
            Err(e) => {
                debug!(
                    chat_id = %self.chat_id,
                    field = %field,
                    error = %e,
                    "Rejected configuration value"
                );
                reject_input(
                    transport,
                    self.chat_id,
                    &mut state.ledger,
                    update.message_ref,
                    OutboundMessage::text(invalid_field_prompt(field))
                        .with_keyboard(field_keyboard(field)),
                )
                .await?;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl CommandHandler for ConfigureFlow {
    async fn handle_turn(&self, update: &InboundUpdate) -> Result<(), FlowError> {
        let mut state = self.state.lock().await;
        if state.done {
            return Ok(());
        }

        match (state.step, &update.payload) {
            (ConfigStep::Start, _) => self.show_menu(&mut state).await,
            (ConfigStep::Closed, _) => Ok(()),
            (_, UpdatePayload::Button { data, .. }) if data == DONE_BUTTON_DATA => {
                self.finish(&mut state).await
            }
            (ConfigStep::Menu, UpdatePayload::Button { data, .. }) => {
                match data.strip_prefix(SET_PREFIX).and_then(ConfigField::from_key) {
                    Some(field) => self.ask_for(&mut state, field).await,
                    None => Ok(()),
                }
            }
            (ConfigStep::Menu, UpdatePayload::Text(_)) => Ok(()),
            (ConfigStep::Awaiting(_), UpdatePayload::Button { data, .. })
                if data == BACK_BUTTON_DATA =>
            {
                self.show_menu(&mut state).await
            }
            (ConfigStep::Awaiting(field), UpdatePayload::Button { data, .. })
                if data == CLEAR_BUTTON_DATA && field.is_clearable() =>
            {
                self.store(field, None).await?;
                self.show_menu(&mut state).await
            }
            (ConfigStep::Awaiting(_), UpdatePayload::Button { .. }) => Ok(()),
            (ConfigStep::Awaiting(field), UpdatePayload::Text(text)) => {
                self.receive_value(&mut state, field, update, text).await
            }
        }
    }

    async fn cancel(&self, reason: CancelReason) {
        let mut state = self.state.lock().await;
        if state.done && state.ledger.is_empty() {
            return;
        }

        let transport = self.services.transport.as_ref();
        purge(transport, self.chat_id, &mut state.ledger).await;
        state.step = ConfigStep::Closed;
        state.done = true;

        if reason == CancelReason::Requested {
            if let Err(e) = transport
                .send_message(self.chat_id, OutboundMessage::text(CANCELLED_MESSAGE))
                .await
            {
                warn!(chat_id = %self.chat_id, error = %e, "Failed to acknowledge cancel");
            }
        }
        debug!(chat_id = %self.chat_id, ?reason, "Configure flow cancelled");
    }

    async fn reset(&self) -> Result<(), FlowError> {
        let mut state = self.state.lock().await;
        self.show_menu(&mut state).await
    }

    async fn is_done(&self) -> bool {
        self.state.lock().await.done
    }
}
