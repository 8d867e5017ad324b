//! ReplyGenerator - turns a generated link into reply text.
//!
//! Selects the chat's persona, builds the instruction and asks the backend
//! for a completion, retrying while the reply is over the hard length limit.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::reply::{
    build_instruction, strip_quote_layer, GeneratedLinkRecord, PersonaTable,
    MAX_GENERATION_ATTEMPTS, MAX_REPLY_CHARS,
};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, ConfigurationRepository, RequestMetadata,
};

/// Errors from reply generation.
#[derive(Debug, Error)]
pub enum ReplyGenerationError {
    /// Every attempt produced a reply over the length limit.
    #[error("reply still {length} characters after {attempts} attempts (limit {limit})")]
    LengthExceeded {
        attempts: u32,
        length: usize,
        limit: usize,
    },

    /// The backend failed.
    #[error("generation backend failed: {0}")]
    Backend(#[from] AIError),
}

/// Generates reply text for link records.
pub struct ReplyGenerator {
    provider: Arc<dyn AIProvider>,
    personas: Arc<PersonaTable>,
    configurations: Arc<dyn ConfigurationRepository>,
}

impl ReplyGenerator {
    pub fn new(
        provider: Arc<dyn AIProvider>,
        personas: Arc<PersonaTable>,
        configurations: Arc<dyn ConfigurationRepository>,
    ) -> Self {
        Self {
            provider,
            personas,
            configurations,
        }
    }

    /// Builds the instruction for a link: persona variant, chat context, tweet.
    pub async fn instruction_for(&self, link: &GeneratedLinkRecord) -> String {
        let context = match self.configurations.find_by_chat(link.chat_id).await {
            Ok(record) => record.and_then(|r| r.prompt_context()),
            Err(e) => {
                warn!(chat_id = %link.chat_id, error = %e, "Failed to load chat configuration");
                None
            }
        };

        let persona = {
            let mut rng = rand::thread_rng();
            self.personas
                .for_chat(link.chat_id)
                .instruction(link.flavor, &mut rng)
                .to_string()
        };

        build_instruction(&persona, context.as_deref(), &link.tweet_text)
    }

    /// Generates a reply of at most [`MAX_REPLY_CHARS`] characters.
    ///
    /// Each attempt is a fresh request. Retryable backend errors consume an
    /// attempt like an over-long reply does; other backend errors end the
    /// loop at once.
    pub async fn generate(
        &self,
        link: &GeneratedLinkRecord,
    ) -> Result<String, ReplyGenerationError> {
        let instruction = self.instruction_for(link).await;
        let mut last_error: Option<AIError> = None;
        let mut last_length = 0;

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let metadata = RequestMetadata::new(link.chat_id, link.id, attempt);
            let request = CompletionRequest::new(instruction.clone(), metadata);

            match self.provider.complete(request).await {
                Ok(response) => {
                    let reply = strip_quote_layer(&response.content);
                    let length = reply.chars().count();
                    if length <= MAX_REPLY_CHARS {
                        debug!(link_id = %link.id, attempt, length, "Generated reply");
                        return Ok(reply.to_string());
                    }
                    warn!(link_id = %link.id, attempt, length, "Generated reply too long");
                    last_error = None;
                    last_length = length;
                }
                Err(e) if e.is_retryable() => {
                    warn!(link_id = %link.id, attempt, error = %e, "Generation attempt failed");
                    last_error = Some(e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        match last_error {
            Some(e) => Err(e.into()),
            None => Err(ReplyGenerationError::LengthExceeded {
                attempts: MAX_GENERATION_ATTEMPTS,
                length: last_length,
                limit: MAX_REPLY_CHARS,
            }),
        }
    }
}
