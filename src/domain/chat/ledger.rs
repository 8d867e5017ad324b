//! Prompt ledger: ordered record of the ephemeral prompts shown in a chat.

use crate::domain::foundation::MessageRef;

/// Outbound prompts still visible in a chat, in emission order.
///
/// The ledger only tracks references. Deleting the messages themselves is
/// the transport's job; callers pop references here and then issue the
/// deletions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptLedger {
    entries: Vec<MessageRef>,
}

impl PromptLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a newly emitted prompt.
    pub fn push(&mut self, message: MessageRef) {
        self.entries.push(message);
    }

    /// Removes and returns the most recent prompt.
    pub fn pop_last(&mut self) -> Option<MessageRef> {
        self.entries.pop()
    }

    /// Removes every prompt, newest first.
    pub fn drain_reverse(&mut self) -> Vec<MessageRef> {
        let mut drained: Vec<MessageRef> = self.entries.drain(..).collect();
        drained.reverse();
        drained
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<MessageRef> {
        self.entries.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageRef> {
        self.entries.iter()
    }
}
