//! Prompt ledger operations over the chat transport.
//!
//! Deletions are best effort: a message the user already removed must not
//! break the dialogue, so failures are logged and swallowed.

use tracing::warn;

use crate::domain::chat::{PromptLedger, CANCEL_BUTTON_DATA};
use crate::domain::foundation::{ChatId, MessageRef};
use crate::ports::{Button, ChatTransport, InlineKeyboard, OutboundMessage, TransportError};

/// Keyboard with a single Cancel button.
pub fn cancel_keyboard() -> InlineKeyboard {
    InlineKeyboard::new().row(vec![Button::callback("Cancel", CANCEL_BUTTON_DATA)])
}

/// Plain prompt carrying the Cancel button.
pub fn cancellable(text: &str) -> OutboundMessage {
    OutboundMessage::text(text).with_keyboard(cancel_keyboard())
}

/// Sends a prompt and records it in the ledger.
pub async fn send_prompt(
    transport: &dyn ChatTransport,
    chat_id: ChatId,
    ledger: &mut PromptLedger,
    message: OutboundMessage,
) -> Result<MessageRef, TransportError> {
    let sent = transport.send_message(chat_id, message).await?;
    ledger.push(sent);
    Ok(sent)
}

/// Deletes the most recent prompt.
pub async fn delete_last(
    transport: &dyn ChatTransport,
    chat_id: ChatId,
    ledger: &mut PromptLedger,
) {
    if let Some(message) = ledger.pop_last() {
        delete_best_effort(transport, chat_id, message).await;
    }
}

/// Deletes every prompt, newest first.
pub async fn purge(transport: &dyn ChatTransport, chat_id: ChatId, ledger: &mut PromptLedger) {
    for message in ledger.drain_reverse() {
        delete_best_effort(transport, chat_id, message).await;
    }
}

/// Deletes a message, logging instead of failing.
pub async fn delete_best_effort(
    transport: &dyn ChatTransport,
    chat_id: ChatId,
    message: MessageRef,
) {
    if let Err(e) = transport.delete_message(chat_id, message).await {
        warn!(
            chat_id = %chat_id,
            message = %message,
            error = %e,
            "Failed to delete message"
        );
    }
}

/// Rejects invalid input and re-prompts in place.
///
/// Deletes the offending message, deletes the previous prompt when more than
/// one is outstanding (the first instruction stays visible), then shows the
/// error prompt.
pub async fn reject_input(
    transport: &dyn ChatTransport,
    chat_id: ChatId,
    ledger: &mut PromptLedger,
    offending: MessageRef,
    error_prompt: OutboundMessage,
) -> Result<(), TransportError> {
    delete_best_effort(transport, chat_id, offending).await;
    if ledger.len() > 1 {
        delete_last(transport, chat_id, ledger).await;
    }
    send_prompt(transport, chat_id, ledger, error_prompt).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::RecordingTransport;

    const CHAT: ChatId = ChatId::new(1);

    #[tokio::test]
    async fn send_prompt_records_reference() {
        let transport = RecordingTransport::new();
        let mut ledger = PromptLedger::new();

        let sent = send_prompt(&transport, CHAT, &mut ledger, OutboundMessage::text("hi"))
            .await
            .unwrap();

        assert_eq!(ledger.last(), Some(sent));
        assert_eq!(transport.visible_messages(CHAT).await.len(), 1);
    }

    #[tokio::test]
    async fn purge_deletes_newest_first_and_tolerates_failures() {
        let transport = RecordingTransport::new();
        let mut ledger = PromptLedger::new();
        for text in ["a", "b", "c"] {
            send_prompt(&transport, CHAT, &mut ledger, OutboundMessage::text(text))
                .await
                .unwrap();
        }
        let middle = *ledger.iter().nth(1).unwrap();
        transport.fail_deletion_of(middle).await;

        purge(&transport, CHAT, &mut ledger).await;

        assert!(ledger.is_empty());
        let deleted = transport.deleted_messages(CHAT).await;
        assert_eq!(deleted.len(), 2);
        assert!(deleted[0].as_i64() > deleted[1].as_i64());
    }

    #[tokio::test]
    async fn reject_input_keeps_the_first_prompt() {
        let transport = RecordingTransport::new();
        let mut ledger = PromptLedger::new();
        let question = OutboundMessage::text("question");
        let first = send_prompt(&transport, CHAT, &mut ledger, question)
            .await
            .unwrap();

        let bad = OutboundMessage::text("bad 1");
        reject_input(&transport, CHAT, &mut ledger, MessageRef::new(500), bad)
            .await
            .unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.iter().next(), Some(&first));

        let bad = OutboundMessage::text("bad 2");
        reject_input(&transport, CHAT, &mut ledger, MessageRef::new(501), bad)
            .await
            .unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.iter().next(), Some(&first));

        let texts: Vec<String> = transport
            .visible_messages(CHAT)
            .await
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["question", "bad 2"]);
    }
}
