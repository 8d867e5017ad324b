//! Reply module - tweet references, generated links and reply instructions.
//!
//! # Module Organization
//!
//! - `flavor` - shill or troll
//! - `tweet` - tweet link validation, normalization and id extraction
//! - `record` - persisted link and reply records
//! - `persona` - per-chat persona table
//! - `instruction` - reply instruction and length limits
//! - `step` - step cursor of the reply dialogue

mod flavor;
mod instruction;
mod persona;
mod record;
mod step;
mod tweet;

pub use flavor::ReplyFlavor;
pub use instruction::{
    build_instruction, strip_quote_layer, MAX_GENERATION_ATTEMPTS, MAX_REPLY_CHARS,
    TARGET_REPLY_CHARS,
};
pub use persona::{Persona, PersonaError, PersonaTable};
pub use record::{GeneratedLinkRecord, ReplyRecord};
pub use step::ReplyStep;
pub use tweet::{extract_tweet_id, is_valid_tweet_reference, normalize_tweet_link, TweetLink};
