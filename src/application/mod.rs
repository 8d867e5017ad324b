//! Application layer - dispatch, conversational flows and reply generation.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! The dispatcher owns chat lifecycle; flows own their sub-state; the
//! generation handlers serve the redirect endpoint.

pub mod chat_state_store;
pub mod dispatcher;
pub mod flows;
pub mod generation;

pub use chat_state_store::{ChatLane, ChatState, ChatStateStore};
pub use dispatcher::{
    CommandDispatcher, DispatchOutcome, IgnoreReason, HELP_MESSAGE, START_MESSAGE,
};
pub use flows::{CancelReason, CommandHandler, FlowError, FlowServices};
pub use generation::{
    intent_url, RedeemError, RedeemLinkHandler, RedeemedLink, ReplyGenerationError,
    ReplyGenerator,
};
